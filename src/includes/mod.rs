//! Include expression data.
//!
//! # Data Flow
//! ```text
//! data/includes.toml (embedded) or jsonapi.include_table (file)
//!     → table.rs (parse, canonicalize, first-wins dedup)
//!     → IncludeTable (immutable, Arc-shared)
//!     → lookup(resource_type, bundle) per request
//! ```
//!
//! # Design Decisions
//! - Business data lives in the asset, resolution logic never changes with it
//! - Expressions are canonicalized once at load, not per request

pub mod expression;
pub mod table;

pub use expression::IncludeExpression;
pub use table::{IncludeTable, IncludeTableBuilder, TableError};
