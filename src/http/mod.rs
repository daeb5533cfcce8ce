//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (assign / propagate request ID)
//!     → middleware/include.rs (inject include parameters)
//!     → server.rs proxy_handler (forward to upstream)
//!     → Send upstream response to client
//! ```

pub mod middleware;
pub mod query;
pub mod request;
pub mod server;

pub use query::QueryParams;
pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::HttpServer;
