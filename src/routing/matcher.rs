//! API surface matching.
//!
//! # Responsibilities
//! - Decide whether a request path belongs to the JSON:API surface
//!
//! # Design Decisions
//! - The configured prefix never carries its leading separator; one `/` is
//!   always prepended before comparing
//! - Literal, case-sensitive prefix comparison (no trailing-slash handling)
//! - Empty prefix = API surface not configured, nothing matches

/// Returns true if `path` is addressed to the API mounted at `prefix`.
pub fn is_api_request(path: &str, prefix: &str) -> bool {
    if prefix.is_empty() {
        return false;
    }

    path.strip_prefix('/')
        .map(|rest| rest.starts_with(prefix))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_prefix_never_matches() {
        for path in ["", "/", "/jsonapi", "/api/node/page", "//"] {
            assert!(!is_api_request(path, ""), "path {:?} matched empty prefix", path);
        }
    }

    #[test]
    fn test_prefix_match() {
        assert!(is_api_request("/api/node/landing_page/123", "api"));
        assert!(is_api_request("/api", "api"));
        assert!(!is_api_request("/other/thing", "api"));
        assert!(!is_api_request("api/node", "api"));
    }

    #[test]
    fn test_match_is_literal() {
        // No separator normalization after the prefix.
        assert!(is_api_request("/apiv2/node", "api"));
        // Case-sensitive.
        assert!(!is_api_request("/API/node", "api"));
        // A leading slash in the prefix doubles the separator.
        assert!(!is_api_request("/api/node", "/api"));
        assert!(is_api_request("//api/node", "/api"));
    }
}
