//! Configuration file watcher for hot reload.
//!
//! Editors usually emit several modify events per save, so a reload is only
//! published when the validated config differs from the last one published.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use notify::{Watcher, RecursiveMode, Event, RecommendedWatcher, Config};
use tokio::sync::mpsc;
use crate::config::loader::{load_config, ConfigError};
use crate::config::schema::AddonsConfig;

/// A watcher that monitors the configuration file for changes.
pub struct ConfigWatcher {
    path: PathBuf,
    reloader: Reloader,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher seeded with the config already in use.
    ///
    /// Returns the watcher and a receiver for validated configuration updates.
    pub fn new(path: &Path, current: AddonsConfig) -> (Self, mpsc::UnboundedReceiver<AddonsConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (Self {
            path: path.to_path_buf(),
            reloader: Reloader::new(update_tx, current),
        }, update_rx)
    }

    /// Start watching the file. Keep the returned watcher alive to keep watching.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let path = self.path.clone();
        let reloader = self.reloader;

        let mut watcher = RecommendedWatcher::new(move |res: notify::Result<Event>| {
            match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        match reloader.reload(load_config(&path)) {
                            Ok(true) => tracing::info!(path = ?path, "Config reloaded"),
                            Ok(false) => tracing::trace!(path = ?path, "Config unchanged"),
                            Err(e) => {
                                tracing::error!("Failed to reload config: {}. Keeping current configuration.", e);
                            }
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            }
        }, Config::default().with_poll_interval(Duration::from_secs(2)))?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}

/// Publishes loaded configs that differ from the previous one.
struct Reloader {
    tx: mpsc::UnboundedSender<AddonsConfig>,
    last: Mutex<AddonsConfig>,
}

impl Reloader {
    fn new(tx: mpsc::UnboundedSender<AddonsConfig>, current: AddonsConfig) -> Self {
        Self {
            tx,
            last: Mutex::new(current),
        }
    }

    /// Returns whether a new config was published.
    fn reload(&self, loaded: Result<AddonsConfig, ConfigError>) -> Result<bool, ConfigError> {
        let config = loaded?;
        let mut last = match self.last.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if *last == config {
            return Ok(false);
        }
        *last = config.clone();
        Ok(self.tx.send(config).is_ok())
    }
}
