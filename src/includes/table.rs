//! Include table: (resource type, bundle) → include expression.
//!
//! # Responsibilities
//! - Parse the include data asset (TOML) into an immutable lookup table
//! - Resolve a resource key to its canonical include string
//!
//! # Design Decisions
//! - Built once at startup, shared via `Arc`, never mutated afterwards
//! - Two-level `HashMap` (resource type, then bundle) for O(1) exact lookup
//! - Within a group the first declaration of a bundle wins; later duplicates
//!   are logged and skipped
//! - A missing entry is not an error: lookups return the empty string

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::includes::expression::IncludeExpression;
use crate::routing::ResourceKey;

/// Include data compiled into the binary.
pub const EMBEDDED_TABLE: &str = include_str!("../../data/includes.toml");

/// Error type for include table loading.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to read include table {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse include table: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("group #{index} has an empty resource_type")]
    EmptyResourceType { index: usize },

    #[error("entry #{index} of resource type '{resource_type}' has an empty bundle")]
    EmptyBundle { resource_type: String, index: usize },

    #[error("no include paths configured for {key}")]
    EmptyInclude { key: ResourceKey },
}

/// Raw shape of the data asset.
#[derive(Debug, Deserialize)]
struct TableSource {
    #[serde(default)]
    group: Vec<GroupSource>,
}

#[derive(Debug, Deserialize)]
struct GroupSource {
    resource_type: String,
    #[serde(default)]
    entry: Vec<EntrySource>,
}

#[derive(Debug, Deserialize)]
struct EntrySource {
    bundle: String,
    include: IncludeSource,
}

/// `include` may be written as an array of paths or one comma-separated string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IncludeSource {
    List(Vec<String>),
    Joined(String),
}

impl From<IncludeSource> for IncludeExpression {
    fn from(source: IncludeSource) -> Self {
        match source {
            IncludeSource::List(paths) => IncludeExpression::from_paths(paths),
            IncludeSource::Joined(raw) => IncludeExpression::parse(&raw),
        }
    }
}

/// Immutable include lookup table.
#[derive(Debug, Clone, Default)]
pub struct IncludeTable {
    groups: HashMap<String, HashMap<String, IncludeExpression>>,
    len: usize,
}

impl IncludeTable {
    /// Start an empty table.
    pub fn builder() -> IncludeTableBuilder {
        IncludeTableBuilder::default()
    }

    /// Build the table from the data compiled into the binary.
    pub fn embedded() -> Result<Self, TableError> {
        Self::from_toml(EMBEDDED_TABLE)
    }

    /// Load the table from a TOML file on disk.
    pub fn load(path: &Path) -> Result<Self, TableError> {
        let content = fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse the table from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, TableError> {
        let source: TableSource = toml::from_str(content)?;
        let mut builder = Self::builder();

        for (group_index, group) in source.group.into_iter().enumerate() {
            if group.resource_type.is_empty() {
                return Err(TableError::EmptyResourceType { index: group_index });
            }

            for (entry_index, entry) in group.entry.into_iter().enumerate() {
                if entry.bundle.is_empty() {
                    return Err(TableError::EmptyBundle {
                        resource_type: group.resource_type.clone(),
                        index: entry_index,
                    });
                }

                let key = ResourceKey::new(group.resource_type.clone(), entry.bundle);
                let expression = IncludeExpression::from(entry.include);
                if expression.is_empty() {
                    return Err(TableError::EmptyInclude { key });
                }

                if !builder.insert(key.clone(), expression) {
                    tracing::warn!(
                        key = %key,
                        "Duplicate include entry ignored, first declaration wins"
                    );
                }
            }
        }

        Ok(builder.build())
    }

    /// Resolve the canonical include string for a resource type and bundle.
    ///
    /// Returns `""` if either part is empty or nothing is configured.
    pub fn lookup(&self, resource_type: &str, bundle: &str) -> &str {
        if resource_type.is_empty() || bundle.is_empty() {
            return "";
        }

        self.groups
            .get(resource_type)
            .and_then(|bundles| bundles.get(bundle))
            .map(IncludeExpression::as_str)
            .unwrap_or("")
    }

    /// Look up the full expression for a resource key.
    pub fn get(&self, key: &ResourceKey) -> Option<&IncludeExpression> {
        self.groups
            .get(&key.resource_type)
            .and_then(|bundles| bundles.get(&key.bundle))
    }

    /// Number of (resource type, bundle) entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Resource types with at least one entry, in no particular order.
    pub fn resource_types(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Number of bundles configured for a resource type.
    pub fn bundle_count(&self, resource_type: &str) -> usize {
        self.groups.get(resource_type).map(HashMap::len).unwrap_or(0)
    }
}

/// Accumulates entries for an [`IncludeTable`].
#[derive(Debug, Default)]
pub struct IncludeTableBuilder {
    table: IncludeTable,
}

impl IncludeTableBuilder {
    /// Add an entry. Returns false, leaving the table untouched, if the key
    /// is already present.
    pub fn insert(&mut self, key: ResourceKey, expression: IncludeExpression) -> bool {
        let bundles = self.table.groups.entry(key.resource_type).or_default();
        if bundles.contains_key(&key.bundle) {
            return false;
        }
        bundles.insert(key.bundle, expression);
        self.table.len += 1;
        true
    }

    pub fn build(self) -> IncludeTable {
        self.table
    }
}
