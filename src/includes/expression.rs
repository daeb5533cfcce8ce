//! Include expressions.
//!
//! An include expression is an ordered list of relationship paths such as
//! `field_cta.field_analytics.field_event_category`. The wire form is the
//! comma-joined list with every whitespace character removed, which is what
//! the downstream serializer expects in the `include` query parameter.

use std::fmt;

/// Ordered relationship paths plus their canonical comma-joined form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncludeExpression {
    paths: Vec<String>,
    canonical: String,
}

impl IncludeExpression {
    /// Build an expression from a list of paths.
    ///
    /// Whitespace inside each path is dropped, elements holding commas are
    /// split, and elements left empty are skipped. Order and repeats are kept.
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let paths: Vec<String> = paths
            .into_iter()
            .flat_map(|p| {
                p.as_ref()
                    .split(',')
                    .map(|part| part.chars().filter(|c| !c.is_whitespace()).collect::<String>())
                    .collect::<Vec<_>>()
            })
            .filter(|p| !p.is_empty())
            .collect();
        let canonical = paths.join(",");

        Self { paths, canonical }
    }

    /// Parse a comma-separated expression, tolerating line breaks and indentation.
    pub fn parse(raw: &str) -> Self {
        Self::from_paths([raw])
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Canonical comma-joined form.
    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }
}

impl fmt::Display for IncludeExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl AsRef<str> for IncludeExpression {
    fn as_ref(&self) -> &str {
        &self.canonical
    }
}
