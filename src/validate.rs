//! Build-time validation of the place and timeline datasets. The datasets
//! are hand-authored (and machine-enriched) JSON, so the generator checks
//! structural and referential integrity before committing to the single
//! output write: duplicate identifiers, unparseable dates, inverted
//! intervals, and timeline events referencing places that don't exist. All
//! violations are collected and reported in one error.

use crate::place::Place;
use crate::timeline::Timeline;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::fmt;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Checks the datasets and returns every violation found, or `Ok` when the
/// build may proceed.
pub fn validate(places: &[Place], timeline: &Timeline) -> Result<(), Error> {
    let mut violations = Vec::new();

    if places.is_empty() {
        violations.push("place collection is empty".to_owned());
    }

    let mut place_ids: HashSet<&str> = HashSet::new();
    for place in places {
        if !place_ids.insert(&place.id) {
            violations.push(format!("duplicate place id '{}'", place.id));
        }
        if place.keywords.is_empty() {
            violations.push(format!("place '{}' has no keywords", place.id));
        }
        if !(-90.0..=90.0).contains(&place.lat) {
            violations.push(format!("place '{}' latitude {} out of range", place.id, place.lat));
        }
        if !(-180.0..=180.0).contains(&place.lng) {
            violations.push(format!("place '{}' longitude {} out of range", place.id, place.lng));
        }

        let start = check_date(&mut violations, &place.start_date, &place.id, "start_date");
        let end = check_date(&mut violations, &place.end_date, &place.id, "end_date");
        match (start, end) {
            (Some(start), Some(end)) if end < start => {
                violations.push(format!("place '{}' end_date precedes start_date", place.id));
            }
            (None, Some(_)) if place.start_date.is_none() => {
                violations.push(format!("place '{}' has end_date without start_date", place.id));
            }
            _ => {}
        }
    }

    let mut event_ids: HashSet<&str> = HashSet::new();
    for event in &timeline.events {
        if !event_ids.insert(&event.id) {
            violations.push(format!("duplicate event id '{}'", event.id));
        }

        let date = parse_date(&event.date);
        if date.is_none() {
            violations.push(format!("event '{}' date '{}' is not a valid date", event.id, event.date));
        }
        if let Some(end_date) = &event.end_date {
            match (date, parse_date(end_date)) {
                (_, None) => violations.push(format!(
                    "event '{}' end_date '{}' is not a valid date",
                    event.id, end_date
                )),
                (Some(date), Some(end)) if end < date => {
                    violations.push(format!("event '{}' end_date precedes date", event.id));
                }
                _ => {}
            }
        }

        for place_id in &event.related_places {
            if !place_ids.contains(place_id.as_str()) {
                violations.push(format!(
                    "event '{}' references unknown place '{}'",
                    event.id, place_id
                ));
            }
        }

        if let Some(bounds) = &event.map_bounds {
            if bounds.north <= bounds.south {
                violations.push(format!("event '{}' map_bounds north <= south", event.id));
            }
            if bounds.east <= bounds.west {
                violations.push(format!("event '{}' map_bounds east <= west", event.id));
            }
        }
    }

    let range = &timeline.metadata.date_range;
    match (parse_date(&range.start), parse_date(&range.end)) {
        (Some(start), Some(end)) => {
            if end < start {
                violations.push("timeline date_range end precedes start".to_owned());
            }
        }
        _ => violations.push(format!(
            "timeline date_range '{}'..'{}' is not a valid date interval",
            range.start, range.end
        )),
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(Error { violations })
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

fn check_date(
    violations: &mut Vec<String>,
    field: &Option<String>,
    place_id: &str,
    name: &str,
) -> Option<NaiveDate> {
    let value = field.as_ref()?;
    let parsed = parse_date(value);
    if parsed.is_none() {
        violations.push(format!(
            "place '{}' {} '{}' is not a valid date",
            place_id, name, value
        ));
    }
    parsed
}

/// The set of dataset violations that stopped a build.
#[derive(Debug)]
pub struct Error {
    pub violations: Vec<String>,
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as one line per violation.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Invalid dataset:")?;
        for violation in &self.violations {
            write!(f, "\n  {}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod test {
    use super::*;
    use crate::timeline::{DateRange, EventKind, MapBounds, Metadata, TimelineEvent};

    fn place(id: &str) -> Place {
        Place {
            id: id.to_owned(),
            display_name: id.to_owned(),
            keywords: vec![id.to_owned()],
            lat: 49.0,
            lng: 0.5,
            country: "France".to_owned(),
            start_date: None,
            end_date: None,
            date_range: None,
            summary: None,
        }
    }

    fn event(id: &str, related: &[&str]) -> TimelineEvent {
        TimelineEvent {
            id: id.to_owned(),
            name: id.to_owned(),
            date: "1944-06-06".to_owned(),
            end_date: None,
            kind: EventKind::Diary,
            description: None,
            summary: None,
            key_facts: Vec::new(),
            related_places: related.iter().map(|p| (*p).to_owned()).collect(),
            source: None,
            map_bounds: None,
        }
    }

    fn timeline(events: Vec<TimelineEvent>) -> Timeline {
        Timeline {
            events,
            metadata: Metadata {
                date_range: DateRange {
                    start: "1943-12-01".to_owned(),
                    end: "1946-02-18".to_owned(),
                },
            },
        }
    }

    #[test]
    fn test_valid_dataset_passes() {
        let places = vec![place("crepon"), place("caen")];
        let timeline = timeline(vec![event("landing", &["crepon"])]);
        assert!(validate(&places, &timeline).is_ok());
    }

    #[test]
    fn test_unknown_related_place_rejected() {
        let places = vec![place("caen")];
        let timeline = timeline(vec![event("landing", &["crepon"])]);
        let err = validate(&places, &timeline).unwrap_err();
        assert!(err
            .violations
            .iter()
            .any(|v| v.contains("unknown place 'crepon'")));
    }

    #[test]
    fn test_duplicate_place_ids_rejected() {
        let places = vec![place("caen"), place("caen")];
        let err = validate(&places, &timeline(Vec::new())).unwrap_err();
        assert!(err.violations.iter().any(|v| v.contains("duplicate place id")));
    }

    #[test]
    fn test_duplicate_event_ids_rejected() {
        let places = vec![place("caen")];
        let timeline = timeline(vec![event("landing", &[]), event("landing", &[])]);
        let err = validate(&places, &timeline).unwrap_err();
        assert!(err.violations.iter().any(|v| v.contains("duplicate event id")));
    }

    #[test]
    fn test_bad_dates_rejected() {
        let mut bad = place("caen");
        bad.start_date = Some("June 1944".to_owned());
        let err = validate(&[bad], &timeline(Vec::new())).unwrap_err();
        assert!(err.violations.iter().any(|v| v.contains("not a valid date")));
    }

    #[test]
    fn test_inverted_event_interval_rejected() {
        let places = vec![place("caen")];
        let mut e = event("retreat", &[]);
        e.end_date = Some("1944-06-01".to_owned());
        let err = validate(&places, &timeline(vec![e])).unwrap_err();
        assert!(err
            .violations
            .iter()
            .any(|v| v.contains("end_date precedes date")));
    }

    #[test]
    fn test_inverted_map_bounds_rejected() {
        let places = vec![place("caen")];
        let mut e = event("battle", &[]);
        e.map_bounds = Some(MapBounds {
            north: 49.0,
            south: 50.0,
            east: 1.0,
            west: 0.0,
        });
        let err = validate(&places, &timeline(vec![e])).unwrap_err();
        assert!(err.violations.iter().any(|v| v.contains("north <= south")));
    }

    #[test]
    fn test_place_without_keywords_rejected() {
        let mut bare = place("caen");
        bare.keywords.clear();
        let err = validate(&[bare], &timeline(Vec::new())).unwrap_err();
        assert!(err.violations.iter().any(|v| v.contains("has no keywords")));
    }
}
