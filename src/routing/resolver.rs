//! Resource key extraction from API paths.
//!
//! Paths look like `/{prefix}/{resource_type}/{bundle}/...`. The prefix is
//! removed with a single first-occurrence replacement, the remainder is split
//! on `/`, and segments 1 and 2 are taken verbatim. Index 0 is the empty
//! segment left in front of the first separator.

use std::fmt;

/// A (resource type, bundle) pair addressed by a request.
///
/// Either half may be empty when the path does not carry that segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ResourceKey {
    pub resource_type: String,
    pub bundle: String,
}

impl ResourceKey {
    pub fn new(resource_type: impl Into<String>, bundle: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            bundle: bundle.into(),
        }
    }

    /// True when both halves are present.
    pub fn is_complete(&self) -> bool {
        !self.resource_type.is_empty() && !self.bundle.is_empty()
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}--{}", self.resource_type, self.bundle)
    }
}

/// Extract the resource key from `path` for the API mounted at `prefix`.
pub fn resolve_key(path: &str, prefix: &str) -> ResourceKey {
    let mount = format!("/{}", prefix);
    let api_path = path.replacen(&mount, "", 1);

    let mut segments = api_path.split('/').skip(1);
    let resource_type = segments.next().unwrap_or_default();
    let bundle = segments.next().unwrap_or_default();

    ResourceKey::new(resource_type, bundle)
}
