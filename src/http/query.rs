//! Query-string parameters of a request URI.
//!
//! # Responsibilities
//! - Split a raw query string into ordered `&`-separated pairs
//! - Get / overwrite / remove parameters by decoded name
//! - Splice the query back into a URI
//!
//! # Design Decisions
//! - Pair order is preserved; `set` rewrites the first occurrence in place
//!   and drops the rest, so a key never ends up duplicated
//! - Pairs that are not rewritten keep their original bytes; only pairs
//!   written through `set` are form-urlencoded
//! - The URI is only rebuilt by callers that actually changed something,
//!   untouched requests keep their original encoding

use axum::http::uri::{InvalidUri, InvalidUriParts, PathAndQuery, Uri};
use thiserror::Error;
use url::form_urlencoded;

/// Error rebuilding a URI with a new query string.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid path and query: {0}")]
    PathAndQuery(#[from] InvalidUri),

    #[error("invalid uri parts: {0}")]
    Parts(#[from] InvalidUriParts),
}

/// One query pair: decoded key and value, plus the raw text it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Pair {
    key: String,
    value: String,
    /// `None` for pairs written by `set`.
    raw: Option<String>,
}

impl Pair {
    fn parse(segment: &str) -> Self {
        let (key, value) = form_urlencoded::parse(segment.as_bytes())
            .next()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .unwrap_or_default();
        Self {
            key,
            value,
            raw: Some(segment.to_string()),
        }
    }

    fn encoded(&self) -> String {
        match &self.raw {
            Some(raw) => raw.clone(),
            None => form_urlencoded::Serializer::new(String::new())
                .append_pair(&self.key, &self.value)
                .finish(),
        }
    }
}

/// Ordered query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<Pair>,
}

impl QueryParams {
    /// Split a raw query string (without the leading `?`). Empty segments
    /// between `&`s are dropped.
    pub fn parse(query: &str) -> Self {
        let pairs = query
            .split('&')
            .filter(|segment| !segment.is_empty())
            .map(Pair::parse)
            .collect();
        Self { pairs }
    }

    /// Parse the query of a URI; empty if it has none.
    pub fn from_uri(uri: &Uri) -> Self {
        uri.query().map(Self::parse).unwrap_or_default()
    }

    /// First decoded value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|pair| pair.key == key)
            .map(|pair| pair.value.as_str())
    }

    /// All decoded values for `key`, in order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |pair| pair.key == key)
            .map(|pair| pair.value.as_str())
    }

    /// Overwrite `key` with a single value.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let pair = Pair {
            key: key.to_string(),
            value: value.into(),
            raw: None,
        };
        match self.pairs.iter().position(|p| p.key == key) {
            Some(first) => {
                self.pairs[first] = pair;
                let mut index = 0;
                self.pairs.retain(|p| {
                    let keep = index <= first || p.key != key;
                    index += 1;
                    keep
                });
            }
            None => self.pairs.push(pair),
        }
    }

    /// Remove every value for `key`.
    pub fn remove(&mut self, key: &str) {
        self.pairs.retain(|p| p.key != key);
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Query string (without the leading `?`).
    pub fn to_query_string(&self) -> String {
        self.pairs
            .iter()
            .map(Pair::encoded)
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Copy of `uri` carrying these parameters as its query.
    pub fn apply_to(&self, uri: &Uri) -> Result<Uri, QueryError> {
        let path_and_query = if self.is_empty() {
            uri.path().to_string()
        } else {
            format!("{}?{}", uri.path(), self.to_query_string())
        };

        let mut parts = uri.clone().into_parts();
        parts.path_and_query = Some(PathAndQuery::try_from(path_and_query)?);
        Ok(Uri::from_parts(parts)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_get() {
        let query = QueryParams::parse("include=a%2Cb&page%5Blimit%5D=10&flag");
        assert_eq!(query.get("include"), Some("a,b"));
        assert_eq!(query.get("page[limit]"), Some("10"));
        assert_eq!(query.get("flag"), Some(""));
        assert_eq!(query.get("missing"), None);
        assert_eq!(query.len(), 3);
    }

    #[test]
    fn test_set_overwrites_in_place() {
        let mut query = QueryParams::parse("a=1&include=x&b=2&include=y");
        query.set("include", "field_flow");

        assert_eq!(query.get_all("include").collect::<Vec<_>>(), ["field_flow"]);
        assert_eq!(query.to_query_string(), "a=1&include=field_flow&b=2");
    }

    #[test]
    fn test_set_appends_missing_key() {
        let mut query = QueryParams::default();
        query.set("jsonapi_include", "1");
        assert_eq!(query.to_query_string(), "jsonapi_include=1");
    }

    #[test]
    fn test_remove() {
        let mut query = QueryParams::parse("a=1&b=2&a=3");
        query.remove("a");
        assert_eq!(query.to_query_string(), "b=2");
    }

    #[test]
    fn test_untouched_pairs_keep_raw_bytes() {
        let mut query = QueryParams::parse("filter%5Bname%5D=%FF%FE&flag&q=a%2Bb+c&&include=old");
        assert_eq!(query.get("flag"), Some(""));
        assert_eq!(query.get("q"), Some("a+b c"));

        query.set("include", "field_a,field_b");
        assert_eq!(
            query.to_query_string(),
            "filter%5Bname%5D=%FF%FE&flag&q=a%2Bb+c&include=field_a%2Cfield_b"
        );
    }

    #[test]
    fn test_apply_to_uri() {
        let uri: Uri = "http://cms.local/jsonapi/node/page?x=1".parse().unwrap();
        let mut query = QueryParams::from_uri(&uri);
        query.set("include", "field_a.field_b,field_c");

        let rewritten = query.apply_to(&uri).unwrap();
        assert_eq!(rewritten.path(), "/jsonapi/node/page");
        assert_eq!(rewritten.host(), Some("cms.local"));
        assert_eq!(
            QueryParams::from_uri(&rewritten).get("include"),
            Some("field_a.field_b,field_c")
        );
        assert_eq!(QueryParams::from_uri(&rewritten).get("x"), Some("1"));
    }

    #[test]
    fn test_apply_to_origin_form_uri() {
        let uri: Uri = "/jsonapi/node/page".parse().unwrap();
        let mut query = QueryParams::from_uri(&uri);
        assert!(query.is_empty());

        query.set("jsonapi_include", "1");
        let rewritten = query.apply_to(&uri).unwrap();
        assert_eq!(rewritten.to_string(), "/jsonapi/node/page?jsonapi_include=1");
    }
}
