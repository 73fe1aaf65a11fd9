//! Builds the keyword index: a case-insensitive mapping from place keyword to
//! owning [`Place`] plus a single compiled pattern covering every keyword of
//! every place. The index is constructed once per build invocation and passed
//! to the annotator; nothing here is global or cached across runs.

use crate::place::Place;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;

/// Lookup structure consumed by [`crate::annotate`]. Borrows the place
/// collection for the duration of a single build.
pub struct KeywordIndex<'a> {
    pattern: Regex,
    by_keyword: HashMap<String, &'a Place>,
}

impl<'a> KeywordIndex<'a> {
    /// Builds the index from the full place collection.
    ///
    /// Keywords are sorted longest-first before being joined into an
    /// alternation. The regex engine tries alternatives left to right and
    /// takes the first that matches at a position, so this ordering is what
    /// guarantees that "Le Hamel" wins over "Hamel" when both are keywords.
    /// Keywords are escaped so punctuation in place names stays literal, and
    /// the whole alternation is bracketed with `\b` so nothing matches inside
    /// a larger word.
    ///
    /// A keyword claimed by two different places is rejected with
    /// [`Error::DuplicateKeyword`] rather than silently resolving to one of
    /// them; the same keyword repeated within a single place is harmless and
    /// deduplicated.
    pub fn build(places: &'a [Place]) -> Result<KeywordIndex<'a>> {
        let mut by_keyword: HashMap<String, &'a Place> = HashMap::new();
        for place in places {
            for keyword in &place.keywords {
                let key = keyword.to_lowercase();
                if let Some(prev) = by_keyword.insert(key, place) {
                    if prev.id != place.id {
                        return Err(Error::DuplicateKeyword {
                            keyword: keyword.clone(),
                            first: prev.id.clone(),
                            second: place.id.clone(),
                        });
                    }
                }
            }
        }

        if by_keyword.is_empty() {
            // An empty alternation would match the empty string at every
            // word boundary, so refuse to build one.
            return Err(Error::NoKeywords);
        }

        let mut keywords: Vec<&str> = by_keyword.keys().map(String::as_str).collect();
        keywords.sort_unstable_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        let alternation = keywords
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<String>>()
            .join("|");
        let pattern = Regex::new(&format!(r"(?i)\b({})\b", alternation))?;

        Ok(KeywordIndex {
            pattern,
            by_keyword,
        })
    }

    /// The compiled pattern over all keywords.
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Looks up the place owning a matched span. The lookup key is the
    /// lower-cased matched text; the caller keeps the original casing for
    /// display.
    pub fn lookup(&self, matched: &str) -> Option<&'a Place> {
        self.by_keyword.get(&matched.to_lowercase()).copied()
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Represents an error building the keyword index.
#[derive(Debug)]
pub enum Error {
    /// Returned when the same keyword is claimed by two different places.
    DuplicateKeyword {
        keyword: String,
        first: String,
        second: String,
    },

    /// Returned when the place collection yields no keywords at all.
    NoKeywords,

    /// Returned when the combined pattern fails to compile.
    Pattern(regex::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::DuplicateKeyword {
                keyword,
                first,
                second,
            } => write!(
                f,
                "Keyword '{}' is claimed by both place '{}' and place '{}'",
                keyword, first, second
            ),
            Error::NoKeywords => write!(f, "Place collection contains no keywords"),
            Error::Pattern(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Pattern(err) => Some(err),
            _ => None,
        }
    }
}

impl From<regex::Error> for Error {
    /// Converts a [`regex::Error`] into an [`Error`]. This allows us to use
    /// the `?` operator when compiling the pattern.
    fn from(err: regex::Error) -> Error {
        Error::Pattern(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

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

    #[test]
    fn test_longest_keyword_wins() {
        let places = vec![place("le_hamel", &["Le Hamel"]), place("hamel", &["Hamel"])];
        let index = KeywordIndex::build(&places).unwrap();
        let m = index.pattern().find("marched to Le Hamel today").unwrap();
        assert_eq!(m.as_str(), "Le Hamel");
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let places = vec![place("caen", &["Caen"])];
        let index = KeywordIndex::build(&places).unwrap();
        assert_eq!(index.lookup("CAEN").unwrap().id, "caen");
        assert_eq!(index.lookup("caen").unwrap().id, "caen");
        assert!(index.lookup("bayeux").is_none());
    }

    #[test]
    fn test_word_boundaries() {
        let places = vec![place("caen", &["Caen"])];
        let index = KeywordIndex::build(&places).unwrap();
        assert!(index.pattern().find("Caennot").is_none());
        assert!(index.pattern().find("to Caen.").is_some());
    }

    #[test]
    fn test_punctuation_in_keywords_is_literal() {
        let places = vec![place("st_aubin", &["St. Aubin"])];
        let index = KeywordIndex::build(&places).unwrap();
        assert!(index.pattern().find("through St. Aubin at dusk").is_some());
        // The dot must not act as a wildcard.
        assert!(index.pattern().find("through StX Aubin at dusk").is_none());
    }

    #[test]
    fn test_duplicate_keyword_across_places_rejected() {
        let places = vec![place("caen", &["Caen"]), place("caen2", &["caen"])];
        match KeywordIndex::build(&places) {
            Err(Error::DuplicateKeyword { first, second, .. }) => {
                assert_eq!(first, "caen");
                assert_eq!(second, "caen2");
            }
            other => panic!("expected DuplicateKeyword, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_duplicate_keyword_within_place_tolerated() {
        let places = vec![place("caen", &["Caen", "caen"])];
        assert!(KeywordIndex::build(&places).is_ok());
    }

    #[test]
    fn test_no_keywords_rejected() {
        let places = vec![place("caen", &[])];
        assert!(matches!(
            KeywordIndex::build(&places),
            Err(Error::NoKeywords)
        ));
    }
}
