//! Request path routing for the JSON:API surface.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → matcher.rs (is the path under "/" + prefix?)
//!     → resolver.rs (extract resource type and bundle)
//!     → ResourceKey handed to the include table
//! ```
//!
//! # Design Decisions
//! - Prefix is passed in per call, never stored (it may be reloaded)
//! - No regex: literal prefix checks and fixed segment indices
//! - Total functions: malformed paths degrade to empty keys

pub mod matcher;
pub mod resolver;

pub use matcher::is_api_request;
pub use resolver::{resolve_key, ResourceKey};
