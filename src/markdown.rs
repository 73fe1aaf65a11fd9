//! Converts the diary manuscript from markdown to HTML. This is a thin
//! wrapper over [`pulldown_cmark`]; the annotation pass treats the result as
//! opaque HTML-like text.

use pulldown_cmark::{html, Options, Parser};

/// Renders markdown to an HTML string.
///
/// Footnotes, tables, and strikethrough are enabled to cover the manuscript's
/// formatting. Smart punctuation stays off: it would rewrite apostrophes
/// inside place names (e.g. "L'Aigle") and break keyword matching against the
/// plain-ASCII keywords in the place dataset.
pub fn to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, Parser::new_ext(markdown, options));
    out
}
