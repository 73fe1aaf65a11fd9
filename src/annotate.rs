//! The tag-aware annotation pass. Walks rendered diary HTML and wraps every
//! place-keyword mention found in literal text in a
//! `<span class="location" data-place-id="...">` element, leaving everything
//! between `<` and `>` untouched. This is a lexical scan, not a markup parse:
//! the input is well-formed self-generated HTML, and a two-state scanner is
//! enough to keep matches out of tags without pulling in a parser.

use crate::index::KeywordIndex;

/// Scanner state: either inside literal text or inside a tag (between `<`
/// and the next `>`).
#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Text,
    Tag,
}

const WRAPPER_OPEN: &str = r#"<span class="location""#;
const WRAPPER_CLOSE: &str = "</span>";

/// Annotates place mentions in rendered HTML.
///
/// Invariants:
/// * Output is byte-identical to input except for inserted wrapper markup.
/// * No tag is ever split and no attribute content is ever matched.
/// * The visible text of each wrapper is the matched substring verbatim,
///   original casing included.
/// * Text already inside a location wrapper is not rescanned, so running the
///   pass on its own output changes nothing.
///
/// An unterminated trailing `<` puts the scanner in the tag state for the
/// rest of the input; everything from that point is copied through unchanged
/// and unannotated.
pub fn annotate(html: &str, index: &KeywordIndex) -> String {
    let mut out = String::with_capacity(html.len());
    let mut state = State::Text;
    let mut run_start = 0;
    let mut wrapper_depth = 0usize;

    for (i, c) in html.char_indices() {
        match state {
            State::Text => {
                if c == '<' {
                    if i > run_start {
                        push_text(&mut out, &html[run_start..i], index, wrapper_depth);
                    }
                    state = State::Tag;
                    run_start = i;
                }
            }
            State::Tag => {
                if c == '>' {
                    let tag = &html[run_start..i + 1];
                    out.push_str(tag);
                    if tag.starts_with(WRAPPER_OPEN) {
                        wrapper_depth += 1;
                    } else if tag == WRAPPER_CLOSE && wrapper_depth > 0 {
                        wrapper_depth -= 1;
                    }
                    state = State::Text;
                    run_start = i + 1;
                }
            }
        }
    }

    if run_start < html.len() {
        match state {
            State::Text => push_text(&mut out, &html[run_start..], index, wrapper_depth),
            // Unterminated tag: preserve the content, skip annotation.
            State::Tag => out.push_str(&html[run_start..]),
        }
    }

    out
}

fn push_text(out: &mut String, text: &str, index: &KeywordIndex, wrapper_depth: usize) {
    if wrapper_depth > 0 {
        out.push_str(text);
        return;
    }
    let wrapped = index.pattern().replace_all(text, |caps: &regex::Captures| {
        let matched = &caps[1];
        match index.lookup(matched) {
            Some(place) => format!(
                r#"<span class="location" data-place-id="{}">{}</span>"#,
                place.id, matched
            ),
            // Shouldn't happen: the pattern and the lookup are built from
            // the same keyword set. Leave the text alone rather than fail.
            None => matched.to_owned(),
        }
    });
    out.push_str(&wrapped);
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::place::Place;

    fn place(id: &str, keywords: &[&str]) -> Place {
        Place {
            id: id.to_owned(),
            display_name: id.to_owned(),
            keywords: keywords.iter().map(|k| (*k).to_owned()).collect(),
            lat: 0.0,
            lng: 0.0,
            country: "France".to_owned(),
            start_date: None,
            end_date: None,
            date_range: None,
            summary: None,
        }
    }

    /// Removes everything between `<` and `>`, leaving only literal text.
    fn strip_tags(html: &str) -> String {
        let mut out = String::new();
        let mut in_tag = false;
        for c in html.chars() {
            match c {
                '<' => in_tag = true,
                '>' => in_tag = false,
                _ if !in_tag => out.push(c),
                _ => {}
            }
        }
        out
    }

    #[test]
    fn test_basic_annotation() {
        let places = vec![place("caen", &["Caen"])];
        let index = KeywordIndex::build(&places).unwrap();
        assert_eq!(
            annotate("<p>He went to Caen.</p>", &index),
            r#"<p>He went to <span class="location" data-place-id="caen">Caen</span>.</p>"#,
        );
    }

    #[test]
    fn test_no_matches_inside_tags() {
        let places = vec![place("caen", &["Caen"])];
        let index = KeywordIndex::build(&places).unwrap();
        let input = r#"<a href="Caen.html" title="Caen">the city</a>"#;
        assert_eq!(annotate(input, &index), input);
    }

    #[test]
    fn test_longest_match_priority() {
        let places = vec![place("le_hamel", &["Le Hamel"]), place("hamel", &["Hamel"])];
        let index = KeywordIndex::build(&places).unwrap();
        assert_eq!(
            annotate("<p>at Le Hamel</p>", &index),
            r#"<p>at <span class="location" data-place-id="le_hamel">Le Hamel</span></p>"#,
        );
    }

    #[test]
    fn test_word_boundary_enforcement() {
        let places = vec![place("caen", &["Caen"])];
        let index = KeywordIndex::build(&places).unwrap();
        let input = "<p>Caennot a match</p>";
        assert_eq!(annotate(input, &index), input);
    }

    #[test]
    fn test_case_preserved_in_output() {
        let places = vec![place("caen", &["caen"])];
        let index = KeywordIndex::build(&places).unwrap();
        assert_eq!(
            annotate("<p>Back in CAEN at last</p>", &index),
            r#"<p>Back in <span class="location" data-place-id="caen">CAEN</span> at last</p>"#,
        );
    }

    #[test]
    fn test_multiple_mentions() {
        let places = vec![place("caen", &["Caen"]), place("bayeux", &["Bayeux"])];
        let index = KeywordIndex::build(&places).unwrap();
        assert_eq!(
            annotate("<p>From Bayeux to Caen and back to Bayeux.</p>", &index),
            concat!(
                "<p>From <span class=\"location\" data-place-id=\"bayeux\">Bayeux</span>",
                " to <span class=\"location\" data-place-id=\"caen\">Caen</span>",
                " and back to <span class=\"location\" data-place-id=\"bayeux\">Bayeux</span>.</p>",
            ),
        );
    }

    #[test]
    fn test_idempotent_on_own_output() {
        let places = vec![place("caen", &["Caen"]), place("hamel", &["Le Hamel", "Hamel"])];
        let index = KeywordIndex::build(&places).unwrap();
        let once = annotate("<p>Caen, then Le Hamel, then Caen again.</p>", &index);
        let twice = annotate(&once, &index);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_total_content_preservation() {
        let places = vec![place("caen", &["Caen"]), place("le_hamel", &["Le Hamel"])];
        let index = KeywordIndex::build(&places).unwrap();
        let input = "<h2>June 1944</h2><p>We landed near Le Hamel and pushed toward Caen, \
                     though Caennot was not a place any of us knew.</p>";
        let output = annotate(input, &index);
        assert_eq!(strip_tags(&output), strip_tags(input));
    }

    #[test]
    fn test_unterminated_tag_preserved_unannotated() {
        let places = vec![place("caen", &["Caen"])];
        let index = KeywordIndex::build(&places).unwrap();
        let input = "<p>We reached Caen.</p><em Caen and after";
        let output = annotate(input, &index);
        assert!(output.starts_with(
            r#"<p>We reached <span class="location" data-place-id="caen">Caen</span>.</p>"#
        ));
        assert!(output.ends_with("<em Caen and after"));
    }

    #[test]
    fn test_text_before_first_tag_and_after_last() {
        let places = vec![place("caen", &["Caen"])];
        let index = KeywordIndex::build(&places).unwrap();
        assert_eq!(
            annotate("Caen <em>then</em> Caen", &index),
            concat!(
                "<span class=\"location\" data-place-id=\"caen\">Caen</span>",
                " <em>then</em> ",
                "<span class=\"location\" data-place-id=\"caen\">Caen</span>",
            ),
        );
    }
}
