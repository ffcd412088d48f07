//! Infrastructure layer - external adapters (storage, config, HTTP).
//!
//! This layer handles all I/O operations and external dependencies.

pub mod config;
pub mod local_storage;
pub mod remote_source;

pub use config::{ensure_config_exists, load_config};
pub use local_storage::{KeyValueStore, LocalStorage};
pub use remote_source::{HttpQuoteSource, RemoteSource};
