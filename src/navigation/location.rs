//! Locations and hrefs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::{form_urlencoded, Url};

/// Parsed query string.
pub type Query = BTreeMap<String, String>;

/// Base used to resolve hrefs; only the path, query and fragment are kept.
const HREF_BASE: &str = "http://router.invalid/";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("invalid href `{href}`: {source}")]
    InvalidHref {
        href: String,
        #[source]
        source: url::ParseError,
    },
}

/// A navigable location.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub pathname: String,
    /// Raw search string including the leading `?`, or empty.
    pub search: String,
    /// Raw fragment including the leading `#`, or empty.
    pub hash: String,
    /// Filled from `search` by the query middleware.
    pub query: Query,
}

impl Location {
    pub fn new(pathname: impl Into<String>) -> Self {
        Self {
            pathname: pathname.into(),
            ..Default::default()
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = if search.is_empty() || search.starts_with('?') {
            search
        } else {
            format!("?{search}")
        };
        self
    }

    /// Parse an href such as `/todos/1?filter=open#top`.
    pub fn parse(href: &str) -> Result<Self, LocationError> {
        let invalid = |source| LocationError::InvalidHref {
            href: href.to_string(),
            source,
        };
        let base = Url::parse(HREF_BASE).map_err(invalid)?;
        let url = base.join(href).map_err(invalid)?;

        Ok(Self {
            pathname: url.path().to_string(),
            search: url.query().map(|q| format!("?{q}")).unwrap_or_default(),
            hash: url.fragment().map(|f| format!("#{f}")).unwrap_or_default(),
            query: Query::new(),
        })
    }

    /// Copy with the pathname normalised; the form committed to the store.
    pub fn normalized(&self) -> Self {
        Self {
            pathname: normalize_pathname(&self.pathname),
            ..self.clone()
        }
    }

    /// Whether navigating from `self` to `other` would change anything.
    /// Only pathname and search count; hash and query are derived or ignored.
    pub fn same_target(&self, other: &Location) -> bool {
        normalize_pathname(&self.pathname) == normalize_pathname(&other.pathname)
            && self.search == other.search
    }

    pub fn href(&self) -> String {
        format!("{}{}{}", self.pathname, self.search, self.hash)
    }
}

/// Leading `/`, no doubled `/`, trailing `/`.
pub fn normalize_pathname(pathname: &str) -> String {
    let inner: Vec<&str> = pathname.split('/').filter(|s| !s.is_empty()).collect();
    if inner.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", inner.join("/"))
    }
}

/// Parse a search string (`?a=1&b=2`) into a query map. Later keys win.
pub fn parse_query(search: &str) -> Query {
    let raw = search.strip_prefix('?').unwrap_or(search);
    form_urlencoded::parse(raw.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

pub fn serialize_query(query: &Query) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(query.iter())
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_href() {
        let location = Location::parse("/todos/1?filter=open#top").unwrap();
        assert_eq!(location.pathname, "/todos/1");
        assert_eq!(location.search, "?filter=open");
        assert_eq!(location.hash, "#top");
        assert!(location.query.is_empty());

        let location = Location::parse("about").unwrap();
        assert_eq!(location.pathname, "/about");
        assert_eq!(location.href(), "/about");
    }

    #[test]
    fn test_normalize_pathname() {
        assert_eq!(normalize_pathname(""), "/");
        assert_eq!(normalize_pathname("/"), "/");
        assert_eq!(normalize_pathname("/todos/123"), "/todos/123/");
        assert_eq!(normalize_pathname("todos//123/"), "/todos/123/");
    }

    #[test]
    fn test_same_target_ignores_trailing_slash_and_hash() {
        let a = Location::new("/todos").with_search("a=1");
        let mut b = Location::new("/todos/").with_search("?a=1");
        b.hash = "#x".into();
        assert!(a.same_target(&b));
        assert!(!a.same_target(&Location::new("/todos")));
    }

    #[test]
    fn test_query_parsing() {
        let query = parse_query("?a=1&b=2&c=3");
        assert_eq!(query.len(), 3);
        assert_eq!(query.get("b").map(String::as_str), Some("2"));
        assert_eq!(parse_query("").len(), 0);
        assert_eq!(parse_query("x=hello%20world").get("x").map(String::as_str), Some("hello world"));
        assert_eq!(serialize_query(&query), "a=1&b=2&c=3");
    }
}
