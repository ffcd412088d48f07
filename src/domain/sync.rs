//! Sync-related domain models and configuration.
//!
//! Contains the application configuration, the sync state machine and
//! the reports produced by a reconciliation pass.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Configuration for remote sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Interval between sync operations in seconds.
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// Whether the periodic sync is enabled.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Remote endpoint returning a JSON array.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Category assigned to every remote-derived quote.
    #[serde(default = "default_remote_category")]
    pub remote_category: String,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            enabled: default_enabled(),
            endpoint: default_endpoint(),
            remote_category: default_remote_category(),
            timeout_secs: default_timeout(),
        }
    }
}

impl SyncConfig {
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

const fn default_interval() -> u64 {
    30
}

const fn default_enabled() -> bool {
    true
}

fn default_endpoint() -> String {
    "https://jsonplaceholder.typicode.com/posts".to_string()
}

fn default_remote_category() -> String {
    "Server".to_string()
}

const fn default_timeout() -> u64 {
    10
}

/// Path configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathConfig {
    /// Base data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Remote sync configuration.
    #[serde(default)]
    pub sync: SyncConfig,

    /// Path configuration.
    #[serde(default)]
    pub paths: PathConfig,
}

impl AppConfig {
    /// Get the data directory, using default if not configured.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.paths
            .data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".quote-keeper")
    }

    /// Get the storage database path.
    #[must_use]
    pub fn storage_db_path(&self) -> PathBuf {
        self.data_dir().join("storage.db")
    }
}

/// Phase of the sync state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncState {
    #[default]
    Idle,
    Fetching,
    Reconciling,
}

impl std::fmt::Display for SyncState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Fetching => write!(f, "fetching"),
            Self::Reconciling => write!(f, "reconciling"),
        }
    }
}

/// Mutations applied by one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Remote quotes appended because no local text matched.
    pub added: usize,
    /// Local quotes whose category was overwritten by the remote value.
    pub updated: usize,
}

impl ReconcileReport {
    /// Whether anything changed.
    #[must_use]
    pub const fn changed(&self) -> bool {
        self.added > 0 || self.updated > 0
    }
}

/// Summary of a completed sync run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    /// Number of candidates the remote returned.
    pub fetched: usize,
    /// What the merge did.
    pub reconcile: ReconcileReport,
    /// Whether the merged list was written back to storage.
    pub persisted: bool,
    /// When the run finished.
    pub finished_at: DateTime<Utc>,
}

impl SyncReport {
    #[must_use]
    pub const fn changed(&self) -> bool {
        self.reconcile.changed()
    }
}

/// Outcome of requesting a sync.
#[derive(Debug, Clone)]
pub enum SyncOutcome {
    /// The sync ran to completion.
    Completed(SyncReport),
    /// Another sync was already in flight; this request was dropped.
    Skipped,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.sync.interval_secs, 30);
        assert!(config.sync.enabled);
        assert_eq!(config.sync.remote_category, "Server");
        assert_eq!(config.sync.timeout(), Duration::from_secs(10));
        assert_eq!(config.sync.interval(), Duration::from_secs(30));
    }

    #[test]
    fn test_paths_follow_data_dir() {
        let config = AppConfig {
            paths: PathConfig {
                data_dir: Some(PathBuf::from("/tmp/qk")),
            },
            ..Default::default()
        };
        assert_eq!(config.storage_db_path(), PathBuf::from("/tmp/qk/storage.db"));
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/qk"));
    }

    #[test]
    fn test_reconcile_report_changed() {
        assert!(!ReconcileReport::default().changed());
        assert!(ReconcileReport { added: 1, updated: 0 }.changed());
        assert!(ReconcileReport { added: 0, updated: 2 }.changed());
    }
}
