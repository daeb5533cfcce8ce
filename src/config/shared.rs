//! Live configuration shared across request handlers.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::schema::GatewayConfig;

/// Source of the API path prefix, consulted once per request.
///
/// Implementors own their refresh policy; callers never cache the value.
pub trait PrefixSource: Send + Sync {
    fn path_prefix(&self) -> String;
}

impl PrefixSource for String {
    fn path_prefix(&self) -> String {
        self.clone()
    }
}

/// Atomically swappable configuration snapshot.
///
/// Readers are lock-free; a reload replaces the whole snapshot so a request
/// never observes a half-applied config.
#[derive(Debug, Clone)]
pub struct SharedConfig {
    inner: Arc<ArcSwap<GatewayConfig>>,
}

impl SharedConfig {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(config)),
        }
    }

    /// Current snapshot.
    pub fn current(&self) -> Arc<GatewayConfig> {
        self.inner.load_full()
    }

    /// Replace the snapshot. Returns the previous one.
    pub fn replace(&self, config: GatewayConfig) -> Arc<GatewayConfig> {
        self.inner.swap(Arc::new(config))
    }
}

impl PrefixSource for SharedConfig {
    fn path_prefix(&self) -> String {
        self.inner.load().jsonapi.path_prefix.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_follows_replacement() {
        let shared = SharedConfig::new(GatewayConfig::default());
        assert_eq!(shared.path_prefix(), "jsonapi");

        let mut updated = GatewayConfig::default();
        updated.jsonapi.path_prefix = "api".into();
        let previous = shared.replace(updated);

        assert_eq!(previous.jsonapi.path_prefix, "jsonapi");
        assert_eq!(shared.path_prefix(), "api");
        assert_eq!(shared.current().jsonapi.path_prefix, "api");
    }

    #[test]
    fn test_clones_share_state() {
        let shared = SharedConfig::new(GatewayConfig::default());
        let handle = shared.clone();

        let mut updated = GatewayConfig::default();
        updated.jsonapi.path_prefix = String::new();
        shared.replace(updated);

        assert_eq!(handle.path_prefix(), "");
    }

    #[test]
    fn test_static_prefix() {
        let source: Arc<dyn PrefixSource> = Arc::new(String::from("api"));
        assert_eq!(source.path_prefix(), "api");
    }
}
