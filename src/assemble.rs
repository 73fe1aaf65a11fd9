//! The document assembler: merges the annotated diary HTML, the serialized
//! place and timeline datasets, and the version stamp into the final
//! self-contained page by substitution into a [`gtmpl`] template. No logic
//! lives here beyond presence checks; the interactive behavior is all
//! template text executed in the browser.

use crate::place::Place;
use crate::timeline::Timeline;
use crate::version::Version;
use gtmpl::{Context, Template, Value};
use std::collections::HashMap;
use std::fmt;

/// The page template embedded in the binary, used unless the project
/// configures its own.
pub const DEFAULT_TEMPLATE: &str = include_str!("../theme/app.html");

/// Assembles output documents from a parsed template, a page title, and a
/// version stamp.
pub struct Assembler<'a> {
    pub template: &'a Template,
    pub title: &'a str,
    pub version: &'a Version,
}

impl Assembler<'_> {
    /// Produces the complete output document. The datasets are embedded as
    /// pretty-printed JSON so the generated page remains inspectable, and
    /// the version label is injected into the diary's first `</h1>`.
    pub fn assemble(
        &self,
        diary_html: &str,
        places: &[Place],
        timeline: &Timeline,
    ) -> Result<String> {
        let mut fields: HashMap<String, Value> = HashMap::new();
        fields.insert("title".to_owned(), Value::String(self.title.to_owned()));
        fields.insert(
            "diary".to_owned(),
            Value::String(inject_version(diary_html, self.version)),
        );
        fields.insert(
            "places".to_owned(),
            Value::String(serde_json::to_string_pretty(places)?),
        );
        fields.insert(
            "timeline".to_owned(),
            Value::String(serde_json::to_string_pretty(timeline)?),
        );
        fields.insert(
            "version".to_owned(),
            Value::String(self.version.label()),
        );
        fields.insert(
            "generated".to_owned(),
            Value::String(self.version.generated.clone()),
        );

        let context = Context::from(Value::Object(fields)).map_err(Error::Template)?;
        let mut out: Vec<u8> = Vec::new();
        self.template.execute(&mut out, &context)?;
        Ok(String::from_utf8(out)?)
    }
}

/// Injects a version-indicator span into the first `</h1>` of the rendered
/// diary. A manuscript with no top-level heading is left alone.
fn inject_version(diary_html: &str, version: &Version) -> String {
    let span = format!(
        r#"<span class="version-indicator" title="Git: {} | Built: {}">{}</span>"#,
        version.hash,
        version.generated,
        version.label(),
    );
    diary_html.replacen("</h1>", &format!("{}</h1>", span), 1)
}

type Result<T> = std::result::Result<T, Error>;

/// Represents an error assembling the output document.
#[derive(Debug)]
pub enum Error {
    /// Returned when a dataset fails to serialize.
    Json(serde_json::Error),

    /// Returned for errors executing the template.
    Template(String),

    /// Returned when template output isn't valid UTF-8.
    Utf8(std::string::FromUtf8Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Json(err) => err.fmt(f),
            Error::Template(err) => err.fmt(f),
            Error::Utf8(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Json(err) => Some(err),
            Error::Template(_) => None,
            Error::Utf8(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for Error {
    /// Converts a [`serde_json::Error`] into an [`Error`]. This allows us to
    /// use the `?` operator when serializing the datasets.
    fn from(err: serde_json::Error) -> Error {
        Error::Json(err)
    }
}

impl From<String> for Error {
    /// Converts a template error message into an [`Error`]. This allows us
    /// to use the `?` operator for template execution.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl From<std::string::FromUtf8Error> for Error {
    /// Converts a [`std::string::FromUtf8Error`] into an [`Error`].
    fn from(err: std::string::FromUtf8Error) -> Error {
        Error::Utf8(err)
    }
}
