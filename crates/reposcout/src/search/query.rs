use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Sort order GitHub applies to repository search results.
///
/// Without a sort, GitHub orders by best match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchSort {
    Stars,
    Forks,
    Updated,
}

impl SearchSort {
    /// Value of the `sort` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            SearchSort::Stars => "stars",
            SearchSort::Forks => "forks",
            SearchSort::Updated => "updated",
        }
    }
}

impl fmt::Display for SearchSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stars" => Ok(SearchSort::Stars),
            "forks" => Ok(SearchSort::Forks),
            "updated" => Ok(SearchSort::Updated),
            other => Err(format!(
                "unknown sort '{}', expected one of: stars, forks, updated",
                other
            )),
        }
    }
}

/// Text typed by the user plus an optional sort.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQuery {
    text: String,
    sort: Option<SearchSort>,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sort: None,
        }
    }

    #[must_use]
    pub fn with_sort(mut self, sort: Option<SearchSort>) -> Self {
        self.sort = sort;
        self
    }

    /// Query text with surrounding whitespace removed.
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    pub fn sort(&self) -> Option<SearchSort> {
        self.sort
    }

    /// True when there is nothing to search for.
    pub fn is_blank(&self) -> bool {
        self.text().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_trims_text() {
        let query = SearchQuery::new("  tokio  ");
        assert_eq!(query.text(), "tokio");
        assert!(!query.is_blank());
        assert!(SearchQuery::new(" \t").is_blank());
        assert!(SearchQuery::default().is_blank());
    }

    #[test]
    fn test_sort_parse() {
        assert_eq!("stars".parse::<SearchSort>(), Ok(SearchSort::Stars));
        assert_eq!("Updated".parse::<SearchSort>(), Ok(SearchSort::Updated));
        assert!("best-match".parse::<SearchSort>().is_err());
        assert_eq!(SearchSort::Forks.to_string(), "forks");
    }

    #[test]
    fn test_sort_serde() {
        let json = serde_json::to_string(&SearchSort::Stars).unwrap();
        assert_eq!(json, r#""stars""#);
        let sort: SearchSort = serde_json::from_str(r#""forks""#).unwrap();
        assert_eq!(sort, SearchSort::Forks);
    }
}
