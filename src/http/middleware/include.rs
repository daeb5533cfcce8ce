//! Include injection middleware.
//!
//! Rewrites the query of JSON:API requests so the upstream serializer embeds
//! related resources in the same response.
//!
//! ```text
//! request
//!     → is_api_request(path, prefix)    unmatched: pass through untouched
//!     → resolve_key(path, prefix)
//!     → IncludeTable::lookup            empty: pass through untouched
//!     → inject(query, include)          jsonapi_include=1, include=<expr>
//! ```
//!
//! The prefix is read from the [`PrefixSource`] on every request. A
//! caller-supplied `include` is replaced, never merged.

use std::fmt;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::config::PrefixSource;
use crate::http::query::QueryParams;
use crate::includes::IncludeTable;
use crate::observability::metrics;
use crate::routing::{is_api_request, resolve_key};

/// Query parameter carrying the include expression.
pub const INCLUDE_PARAM: &str = "include";

/// Query parameter switching on include processing downstream.
pub const INCLUDE_FLAG_PARAM: &str = "jsonapi_include";

/// Overwrite the include parameters with `include`. No-op when it is empty.
///
/// Returns whether the query was modified.
pub fn inject(query: &mut QueryParams, include: &str) -> bool {
    if include.is_empty() {
        return false;
    }

    query.set(INCLUDE_FLAG_PARAM, "1");
    query.set(INCLUDE_PARAM, include);
    true
}

/// What the interceptor did with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludeOutcome {
    /// Path outside the API surface, or no prefix configured.
    Unmatched,
    /// API request with no include configured for its resource key.
    NoMapping,
    /// Include parameters were written.
    Injected,
    /// Include resolved but the rewritten URI was rejected; request left as is.
    UriRejected,
}

impl IncludeOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncludeOutcome::Unmatched => "unmatched",
            IncludeOutcome::NoMapping => "no_mapping",
            IncludeOutcome::Injected => "injected",
            IncludeOutcome::UriRejected => "uri_rejected",
        }
    }
}

/// Per-request include injector.
///
/// Cheap to clone; the table and prefix source are shared.
#[derive(Clone)]
pub struct IncludeInterceptor {
    table: Arc<IncludeTable>,
    prefix: Arc<dyn PrefixSource>,
}

impl IncludeInterceptor {
    pub fn new(table: Arc<IncludeTable>, prefix: Arc<dyn PrefixSource>) -> Self {
        Self { table, prefix }
    }

    pub fn table(&self) -> &IncludeTable {
        &self.table
    }

    /// Run matching, resolution and injection against one request.
    pub fn intercept<B>(&self, req: &mut Request<B>) -> IncludeOutcome {
        let prefix = self.prefix.path_prefix();
        let path = req.uri().path();

        if !is_api_request(path, &prefix) {
            return IncludeOutcome::Unmatched;
        }

        let key = resolve_key(path, &prefix);
        let include = self.table.lookup(&key.resource_type, &key.bundle);
        if include.is_empty() {
            tracing::debug!(path = %path, key = %key, "No include mapping");
            return IncludeOutcome::NoMapping;
        }

        let mut query = QueryParams::from_uri(req.uri());
        if let Some(previous) = query.get(INCLUDE_PARAM) {
            tracing::debug!(key = %key, previous = %previous, "Replacing caller include");
        }
        inject(&mut query, include);

        match query.apply_to(req.uri()) {
            Ok(uri) => {
                tracing::debug!(
                    key = %key,
                    include_paths = include.split(',').count(),
                    "Include injected"
                );
                *req.uri_mut() = uri;
                IncludeOutcome::Injected
            }
            Err(e) => {
                tracing::warn!(
                    key = %key,
                    error = %e,
                    "Could not rewrite request URI, forwarding unchanged"
                );
                IncludeOutcome::UriRejected
            }
        }
    }
}

impl fmt::Debug for IncludeInterceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IncludeInterceptor")
            .field("entries", &self.table.len())
            .field("prefix", &self.prefix.path_prefix())
            .finish()
    }
}

/// Axum middleware running the [`IncludeInterceptor`] before the next handler.
pub async fn include_middleware(
    State(interceptor): State<IncludeInterceptor>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let outcome = interceptor.intercept(&mut req);
    metrics::record_include(outcome);
    next.run(req).await
}
