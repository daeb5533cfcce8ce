//! JSON:API include gateway library.
//!
//! Sits in front of a JSON:API server and injects a precomputed `include`
//! expression into requests addressed to known resource type / bundle pairs.

pub mod config;
pub mod http;
pub mod includes;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::{GatewayConfig, SharedConfig};
pub use http::middleware::IncludeInterceptor;
pub use http::HttpServer;
pub use includes::{IncludeExpression, IncludeTable};
pub use lifecycle::Shutdown;
pub use routing::ResourceKey;
