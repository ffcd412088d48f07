//! In-memory quote list with write-through persistence.
//!
//! The repository keeps the ordered list it last saw. Every mutation reloads
//! the stored list, applies the change and saves it as one exclusive unit, so
//! sessions sharing a database never overwrite each other's writes.

use serde_json::Value;

use crate::domain::{AppError, Quote, ReconcileReport, Result};
use crate::infrastructure::KeyValueStore;

use super::quote_store::{LoadSource, QuoteStore};
use super::reconciler::reconcile;

/// Ordered quote list. Duplicate texts are allowed.
pub struct QuoteRepository {
    quotes: Vec<Quote>,
    store: QuoteStore,
}

impl QuoteRepository {
    /// Load the list from `store`, seeding defaults if needed.
    #[must_use]
    pub fn open(store: QuoteStore) -> Self {
        let outcome = store.load();
        if let LoadSource::Seeded(reason) = outcome.source {
            tracing::debug!(?reason, "Repository started from seed quotes");
        }

        Self {
            quotes: outcome.quotes,
            store,
        }
    }

    /// Current list in insertion order.
    #[must_use]
    pub fn all(&self) -> &[Quote] {
        &self.quotes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// First quote whose text equals `text` exactly.
    #[must_use]
    pub fn find_by_text(&self, text: &str) -> Option<&Quote> {
        self.quotes.iter().find(|q| q.text == text)
    }

    /// Underlying key/value storage.
    #[must_use]
    pub fn storage(&self) -> &dyn KeyValueStore {
        self.store.storage()
    }

    /// Validate and append a user-entered quote, then persist.
    ///
    /// # Errors
    /// Returns `AppError::Validation` if the trimmed text or category is too
    /// short; the list is left unchanged.
    pub fn add(&mut self, text: &str, category: &str) -> Result<Quote> {
        let quote = Quote::validated(text, category)?;

        tracing::info!(text = %quote.text, category = %quote.category, "Adding quote");
        self.update(|quotes| {
            quotes.push(quote.clone());
            Ok(((), true))
        })?;

        Ok(quote)
    }

    /// Overwrite the category of the first quote matching `text`.
    ///
    /// Returns `true` if a quote was changed (and persisted).
    ///
    /// # Errors
    /// Returns error if the storage section cannot be opened or committed.
    pub fn replace_category(&mut self, text: &str, category: &str) -> Result<bool> {
        self.update(|quotes| {
            let changed = match quotes.iter_mut().find(|q| q.text == text) {
                Some(quote) if quote.category != category => {
                    quote.category = category.to_string();
                    true
                }
                _ => false,
            };
            Ok((changed, changed))
        })
    }

    /// Replace the whole list with an imported payload, then persist.
    ///
    /// Any array is accepted; items are neither validated against the
    /// manual-entry bounds nor required to be objects.
    ///
    /// # Errors
    /// Returns `AppError::ImportFormat` if `payload` is not an array; the list
    /// is left unchanged.
    pub fn replace_all(&mut self, payload: Value) -> Result<usize> {
        let Value::Array(items) = payload else {
            return Err(AppError::ImportFormat {
                message: "expected a JSON array of quotes".into(),
            });
        };

        let imported: Vec<Quote> = items.into_iter().map(Quote::from).collect();
        let count = imported.len();
        self.update(|quotes| {
            *quotes = imported;
            Ok(((), true))
        })?;

        tracing::info!(count, "Replaced quote list");
        Ok(count)
    }

    /// Parse `json` and replace the list with it.
    ///
    /// # Errors
    /// Returns `AppError::ImportFormat` on a parse failure or non-array
    /// document; the list is left unchanged.
    pub fn import_json(&mut self, json: &str) -> Result<usize> {
        let payload: Value = serde_json::from_str(json).map_err(|e| AppError::ImportFormat {
            message: e.to_string(),
        })?;
        self.replace_all(payload)
    }

    /// Pretty-printed JSON of the full list.
    ///
    /// # Errors
    /// Returns error if serialization fails.
    pub fn export_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.quotes).map_err(AppError::json_parse)
    }

    /// Merge a remote batch into the latest stored list. Persists only when
    /// something changed.
    ///
    /// Returns the merge report and whether the save succeeded.
    ///
    /// # Errors
    /// Returns error if the storage section cannot be opened or committed.
    pub fn apply_remote(&mut self, batch: &[Quote]) -> Result<(ReconcileReport, bool)> {
        let modified = self.store.modify(|quotes| {
            let report = reconcile(quotes, batch);
            Ok((report, report.changed()))
        })?;

        self.quotes = modified.quotes;
        Ok((modified.value, modified.persisted))
    }

    /// Run `op` against the freshly stored list and keep the result.
    fn update<T>(&mut self, op: impl FnOnce(&mut Vec<Quote>) -> Result<(T, bool)>) -> Result<T> {
        let modified = self.store.modify(op)?;
        self.quotes = modified.quotes;
        Ok(modified.value)
    }
}
