//! Defines the [`Timeline`] and [`TimelineEvent`] types and the logic for
//! loading the timeline dataset from disk. Events are authored (and enriched
//! by an offline pass) in `timeline.json`; the generator never mutates them,
//! it only validates and re-serializes them into the output page.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

/// The date range used when no timeline file exists: the span of the diary
/// itself, from embarkation leave to demobilization.
pub const DEFAULT_RANGE_START: &str = "1943-12-01";
pub const DEFAULT_RANGE_END: &str = "1946-02-18";

/// Distinguishes events drawn from the historical record from events derived
/// from the diary text itself. The browser renders them as separate marker
/// rows on the timeline.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Historical,
    Diary,
}

/// Optional map viewport for an event's detail panel.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct MapBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

/// A dated occurrence shown on the timeline. The `summary`, `key_facts`, and
/// `map_bounds` fields are filled in by a separate enrichment pass and may be
/// absent for newly-authored events.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TimelineEvent {
    pub id: String,
    pub name: String,

    /// ISO date. With `end_date` present the event spans an interval.
    pub date: String,

    #[serde(default)]
    pub end_date: Option<String>,

    #[serde(rename = "type")]
    pub kind: EventKind,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub key_facts: Vec<String>,

    /// Identifiers of [`crate::place::Place`]s this event relates to. Checked
    /// against the place collection by [`crate::validate`].
    #[serde(default)]
    pub related_places: Vec<String>,

    /// Source URL for the "read more" link.
    #[serde(default)]
    pub source: Option<String>,

    #[serde(default)]
    pub map_bounds: Option<MapBounds>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Metadata {
    pub date_range: DateRange,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Timeline {
    pub events: Vec<TimelineEvent>,
    pub metadata: Metadata,
}

impl Default for Timeline {
    /// An empty timeline spanning the diary's own date range. Substituted
    /// when the project has no timeline file.
    fn default() -> Timeline {
        Timeline {
            events: Vec::new(),
            metadata: Metadata {
                date_range: DateRange {
                    start: DEFAULT_RANGE_START.to_owned(),
                    end: DEFAULT_RANGE_END.to_owned(),
                },
            },
        }
    }
}

/// Loads the timeline dataset. An absent file is not an error (the timeline
/// is optional); a present-but-malformed file is fatal.
pub fn load_timeline(path: &Path) -> Result<Timeline> {
    if !path.exists() {
        return Ok(Timeline::default());
    }
    let file = File::open(path).map_err(|err| Error::Open {
        path: path.to_owned(),
        err,
    })?;
    serde_json::from_reader(file).map_err(|err| Error::Parse {
        path: path.to_owned(),
        err,
    })
}

type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading the timeline dataset.
#[derive(Debug)]
pub enum Error {
    /// Returned when the timeline file exists but can't be opened.
    Open { path: PathBuf, err: std::io::Error },

    /// Returned when the timeline file isn't valid JSON or doesn't match the
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
                write!(f, "Opening timeline file '{}': {}", path.display(), err)
            }
            Error::Parse { path, err } => {
                write!(f, "Parsing timeline file '{}': {}", path.display(), err)
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
