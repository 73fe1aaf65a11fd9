//! Defines the [`Place`] type and the logic for loading the place dataset
//! from disk. A place is a named geographic location with a list of keywords
//! by which the diary text may refer to it; the keywords feed the
//! [`crate::index`] builder and ultimately the [`crate::annotate`] pass.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

/// A geographic location mentioned in the diary. Serialized verbatim into the
/// output page so the browser-side map can render markers and popups from the
/// same records the annotator matched against.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Place {
    /// Unique, stable identifier. This is the value carried by the
    /// `data-place-id` attribute on annotation wrappers.
    pub id: String,

    /// Human-readable name for map popups.
    pub display_name: String,

    /// Alias strings by which the diary text may mention this place. Matching
    /// is case-insensitive.
    pub keywords: Vec<String>,

    pub lat: f64,
    pub lng: f64,

    /// Country label, used by the map to pick a marker color.
    pub country: String,

    /// First date the diarist was present, if known. `None` means the place
    /// is always active (e.g., home).
    #[serde(default)]
    pub start_date: Option<String>,

    /// Last date the diarist was present, if known.
    #[serde(default)]
    pub end_date: Option<String>,

    /// Display string for the popup's date line (e.g., "June - July 1944").
    #[serde(default)]
    pub date_range: Option<String>,

    /// Short popup summary.
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Deserialize)]
struct PlaceFile {
    places: Vec<Place>,
}

/// Loads the place collection from a `{"places": [...]}` JSON file. A missing
/// or malformed file is fatal; there is nothing sensible to generate without
/// the place dataset.
pub fn load_places(path: &Path) -> Result<Vec<Place>> {
    let file = File::open(path).map_err(|err| Error::Open {
        path: path.to_owned(),
        err,
    })?;
    let parsed: PlaceFile = serde_json::from_reader(file).map_err(|err| Error::Parse {
        path: path.to_owned(),
        err,
    })?;
    Ok(parsed.places)
}

type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading the place dataset.
#[derive(Debug)]
pub enum Error {
    /// Returned when the places file can't be opened.
    Open { path: PathBuf, err: std::io::Error },

    /// Returned when the places file isn't valid JSON or doesn't match the
    /// expected shape.
    Parse {
        path: PathBuf,
        err: serde_json::Error,
    },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Open { path, err } => {
                write!(f, "Opening places file '{}': {}", path.display(), err)
            }
            Error::Parse { path, err } => {
                write!(f, "Parsing places file '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Open { path: _, err } => Some(err),
            Error::Parse { path: _, err } => Some(err),
        }
    }
}
