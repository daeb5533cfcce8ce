//! Configuration file watcher for hot reload.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::{parse_config, ConfigError};
use crate::config::schema::GatewayConfig;
use crate::config::shared::SharedConfig;

/// A watcher that monitors the configuration file for changes.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<GatewayConfig>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for validated configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<GatewayConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file in a background thread.
    ///
    /// The returned handle must be kept alive for as long as reloads are wanted.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx;
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!(path = ?path, "Config file change detected, reloading");
                        reload(&path, &tx);
                    }
                }
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}

/// Read, parse and validate the file at `path`, sending it on `tx` when valid.
///
/// An empty file is skipped: editors that truncate before writing fire a
/// modify event in between, and every section has defaults. Returns whether
/// a configuration was sent.
pub fn reload(path: &Path, tx: &mpsc::UnboundedSender<GatewayConfig>) -> bool {
    let parsed = fs::read_to_string(path)
        .map_err(ConfigError::from)
        .and_then(|content| {
            if content.trim().is_empty() {
                Ok(None)
            } else {
                parse_config(&content).map(Some)
            }
        });

    match parsed {
        Ok(Some(new_config)) => tx.send(new_config).is_ok(),
        Ok(None) => {
            tracing::debug!(path = ?path, "Config file empty, waiting for the write to finish");
            false
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                "Failed to reload config, keeping current configuration"
            );
            false
        }
    }
}

/// Swap a reloaded configuration into the live snapshot.
///
/// The include table is only built at startup, so a changed
/// `jsonapi.include_table` is reported and otherwise has no effect.
pub fn apply_update(shared: &SharedConfig, new_config: GatewayConfig) {
    let previous = shared.replace(new_config);
    let current = shared.current();

    if previous.jsonapi.include_table != current.jsonapi.include_table {
        tracing::warn!(
            old = ?previous.jsonapi.include_table,
            new = ?current.jsonapi.include_table,
            "jsonapi.include_table changed; restart required to load the new table"
        );
    }

    if previous.jsonapi.path_prefix != current.jsonapi.path_prefix {
        tracing::info!(
            old = %previous.jsonapi.path_prefix,
            new = %current.jsonapi.path_prefix,
            "JSON:API path prefix updated"
        );
    }

    if previous.listener != current.listener
        || previous.timeouts != current.timeouts
        || previous.upstream.connect_timeout_secs != current.upstream.connect_timeout_secs
    {
        tracing::warn!("listener and timeout changes take effect after restart");
    }
}
