//! Configuration file watcher for hot reload.
//!
//! The directory holding the file is watched rather than the file itself.
//! Editors that save by writing a temporary file and renaming it over the
//! original replace the file's inode, which would end a watch on the file.
//!
//! Reloaded route tables are applied on top of the live multiplexer, so
//! routes can be added or replaced while traffic is flowing.

use std::ffi::{OsStr, OsString};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::{load_config, ConfigError};
use crate::config::schema::MuxConfig;

/// Monitors the configuration file and forwards every valid revision.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<MuxConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and a receiver for configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<MuxConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching. Dropping the returned watcher stops it.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let file_name = self
            .path
            .file_name()
            .map(OsStr::to_os_string)
            .ok_or_else(|| notify::Error::generic("config path does not name a file"))?;
        let dir = parent_dir(&self.path);

        let tx = self.update_tx;
        let path = self.path.clone();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if touches(&event, &file_name) => reload(&path, &tx),
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, dir = ?dir, "Config watcher started");
        Ok(watcher)
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// True if `event` writes or creates the file called `file_name`.
fn touches(event: &Event, file_name: &OsString) -> bool {
    (event.kind.is_modify() || event.kind.is_create())
        && event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(file_name.as_os_str()))
}

fn reload(path: &Path, tx: &mpsc::UnboundedSender<MuxConfig>) {
    tracing::info!("Config file change detected, reloading...");
    match load_config(path) {
        Ok(config) => {
            let _ = tx.send(config);
        }
        // Renamed away mid-save; the replacement triggers its own event.
        Err(ConfigError::Io(e)) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = ?path, "Config file missing, waiting for replacement");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to reload config, keeping current routes");
        }
    }
}
