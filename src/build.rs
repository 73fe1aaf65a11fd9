//! Exports the [`build_site`] function which stitches together the
//! high-level steps of a generation run: rendering the manuscript
//! ([`crate::markdown`]), loading and validating the datasets
//! ([`crate::place`], [`crate::timeline`], [`crate::validate`]), annotating
//! place mentions ([`crate::index`], [`crate::annotate`]), and assembling
//! the single output page ([`crate::assemble`]). A failure anywhere aborts
//! the run; re-running is idempotent and cheap, so there is no partial
//! recovery.

use crate::annotate;
use crate::assemble::{Assembler, Error as AssembleError, DEFAULT_TEMPLATE};
use crate::config::Config;
use crate::index::{Error as IndexError, KeywordIndex};
use crate::markdown;
use crate::place::{self, Error as PlaceError};
use crate::timeline::{self, Error as TimelineError};
use crate::validate::{self, Error as ValidateError};
use crate::version::Version;
use gtmpl::Template;
use log::info;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Builds the output page from a [`Config`] object.
pub fn build_site(config: &Config) -> Result<()> {
    let diary_md = fs::read_to_string(&config.diary).map_err(|err| Error::ReadDiary {
        path: config.diary.clone(),
        err,
    })?;
    let diary_html = markdown::to_html(&diary_md);

    let places = place::load_places(&config.places)?;
    info!("loaded {} places from {}", places.len(), config.places.display());

    let timeline = timeline::load_timeline(&config.timeline)?;
    info!("loaded {} timeline events", timeline.events.len());

    // Verify the datasets before committing to the single output write;
    // there is no rollback once the old page has been overwritten.
    validate::validate(&places, &timeline)?;

    let index = KeywordIndex::build(&places)?;
    let annotated = annotate::annotate(&diary_html, &index);

    let version = Version::detect(&config.project_root);
    info!("version {}", version.label());

    let template = load_template(config.template.as_deref())?;
    let assembler = Assembler {
        template: &template,
        title: &config.title,
        version: &version,
    };
    let html = assembler.assemble(&annotated, &places, &timeline)?;

    fs::write(&config.output, html).map_err(|err| Error::WriteOutput {
        path: config.output.clone(),
        err,
    })?;
    info!("wrote {}", config.output.display());

    Ok(())
}

// Loads the page template: either the project's override or the one embedded
// in the binary.
fn load_template(path: Option<&Path>) -> Result<Template> {
    let contents = match path {
        Some(path) => fs::read_to_string(path).map_err(|err| Error::OpenTemplateFile {
            path: path.to_owned(),
            err,
        })?,
        None => DEFAULT_TEMPLATE.to_owned(),
    };
    let mut template = Template::default();
    template.parse(&contents).map_err(Error::ParseTemplate)?;
    Ok(template)
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building the page. Errors can be during dataset
/// loading, validation, keyword-index construction, assembly, template
/// handling, and other I/O.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors loading the place dataset.
    Place(PlaceError),

    /// Returned for errors loading the timeline dataset.
    Timeline(TimelineError),

    /// Returned when the datasets fail validation.
    Validate(ValidateError),

    /// Returned for errors building the keyword index.
    Index(IndexError),

    /// Returned for errors assembling the output document.
    Assemble(AssembleError),

    /// Returned for I/O problems reading the diary manuscript.
    ReadDiary { path: PathBuf, err: std::io::Error },

    /// Returned for I/O problems opening the template file.
    OpenTemplateFile { path: PathBuf, err: std::io::Error },

    /// Returned for errors parsing the template.
    ParseTemplate(String),

    /// Returned for I/O problems writing the output file.
    WriteOutput { path: PathBuf, err: std::io::Error },
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Place(err) => err.fmt(f),
            Error::Timeline(err) => err.fmt(f),
            Error::Validate(err) => err.fmt(f),
            Error::Index(err) => err.fmt(f),
            Error::Assemble(err) => err.fmt(f),
            Error::ReadDiary { path, err } => {
                write!(f, "Reading diary manuscript '{}': {}", path.display(), err)
            }
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::ParseTemplate(err) => err.fmt(f),
            Error::WriteOutput { path, err } => {
                write!(f, "Writing output file '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Place(err) => Some(err),
            Error::Timeline(err) => Some(err),
            Error::Validate(err) => Some(err),
            Error::Index(err) => Some(err),
            Error::Assemble(err) => Some(err),
            Error::ReadDiary { path: _, err } => Some(err),
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::ParseTemplate(_) => None,
            Error::WriteOutput { path: _, err } => Some(err),
        }
    }
}

impl From<PlaceError> for Error {
    /// Converts [`PlaceError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: PlaceError) -> Error {
        Error::Place(err)
    }
}

impl From<TimelineError> for Error {
    /// Converts [`TimelineError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: TimelineError) -> Error {
        Error::Timeline(err)
    }
}

impl From<ValidateError> for Error {
    /// Converts [`ValidateError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: ValidateError) -> Error {
        Error::Validate(err)
    }
}

impl From<IndexError> for Error {
    /// Converts [`IndexError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: IndexError) -> Error {
        Error::Index(err)
    }
}

impl From<AssembleError> for Error {
    /// Converts [`AssembleError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: AssembleError) -> Error {
        Error::Assemble(err)
    }
}
