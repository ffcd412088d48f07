//! Application layer - use cases and orchestration.
//!
//! This layer contains the quote store, selection, category index and the
//! sync reconciler, plus output formatting.

pub mod category_index;
pub mod formatter;
pub mod quote_store;
pub mod reconciler;
pub mod repository;
pub mod selector;
pub mod sync_service;
pub mod transfer;

pub use category_index::{categories, last_filter, matching, remember_filter};
pub use formatter::{
    format_categories, format_notice, format_quote, format_quotes, format_selection,
    format_sync_report, sync_notice, OutputFormat,
};
pub use quote_store::QuoteStore;
pub use repository::QuoteRepository;
pub use selector::pick_random;
pub use sync_service::SyncService;
pub use transfer::{export_to_file, import_from_file, DEFAULT_EXPORT_FILE};
