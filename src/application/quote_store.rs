//! Persistent quote list backed by a key/value store.
//!
//! Loading never fails: a missing, unreadable or malformed list is replaced
//! by the seed quotes, which are written back immediately.

use serde_json::Value;

use crate::domain::{default_quotes, Quote, Result};
use crate::infrastructure::KeyValueStore;

/// Storage key holding the JSON quote list.
pub const QUOTES_KEY: &str = "myQuotes.v1";

/// Storage key holding the last selected category filter.
pub const FILTER_KEY: &str = "selectedCategory";

/// Why the seed quotes were used instead of stored data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedReason {
    /// Nothing stored yet.
    Missing,
    /// The backend could not be read.
    ReadFailed,
    /// Stored text is not valid JSON.
    Corrupt,
    /// Stored JSON is valid but not an array.
    NotAnArray,
}

/// Where a loaded quote list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Stored,
    Seeded(SeedReason),
}

/// Result of [`QuoteStore::load`].
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub quotes: Vec<Quote>,
    pub source: LoadSource,
}

/// Result of [`QuoteStore::modify`].
#[derive(Debug)]
pub struct Modified<T> {
    /// The list as it stands after the change.
    pub quotes: Vec<Quote>,
    pub value: T,
    /// Whether the changed list was written.
    pub persisted: bool,
}

/// Reads and writes the quote list under [`QUOTES_KEY`].
pub struct QuoteStore {
    storage: Box<dyn KeyValueStore>,
}

impl QuoteStore {
    #[must_use]
    pub fn new(storage: Box<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Underlying key/value storage, shared with the category filter.
    #[must_use]
    pub fn storage(&self) -> &dyn KeyValueStore {
        self.storage.as_ref()
    }

    /// Load the stored list, seeding defaults when it is absent or unusable.
    pub fn load(&self) -> LoadOutcome {
        let raw = match self.storage.get_item(QUOTES_KEY) {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => return self.seed(SeedReason::Missing),
            Err(e) => {
                tracing::error!(error = %e, "Could not load quotes");
                return self.seed(SeedReason::ReadFailed);
            }
        };

        match parse_stored(&raw) {
            Ok(quotes) => {
                tracing::debug!(count = quotes.len(), "Loaded stored quotes");
                LoadOutcome {
                    quotes,
                    source: LoadSource::Stored,
                }
            }
            Err(reason) => self.seed(reason),
        }
    }

    /// Persist the full list. Failures are logged and reported as `false`.
    pub fn save(&self, quotes: &[Quote]) -> bool {
        let json = match serde_json::to_string(quotes) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Could not serialize quotes");
                return false;
            }
        };

        match self.storage.set_item(QUOTES_KEY, &json) {
            Ok(()) => {
                tracing::debug!(count = quotes.len(), "Saved quotes");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Could not save quotes");
                false
            }
        }
    }

    /// Load the current stored list, let `op` change it and save the result,
    /// all inside one exclusive section so concurrent writers cannot
    /// interleave. `op` returns its value and whether the list needs saving.
    ///
    /// # Errors
    /// Returns the error from `op` (nothing is written) or a storage error if
    /// the section cannot be opened or committed.
    pub fn modify<T>(
        &self,
        op: impl FnOnce(&mut Vec<Quote>) -> Result<(T, bool)>,
    ) -> Result<Modified<T>> {
        self.storage.begin_exclusive()?;

        let mut quotes = self.load().quotes;
        let (value, dirty) = match op(&mut quotes) {
            Ok(done) => done,
            Err(e) => {
                self.abandon();
                return Err(e);
            }
        };
        let persisted = dirty && self.save(&quotes);

        if let Err(e) = self.storage.commit() {
            self.abandon();
            return Err(e);
        }

        Ok(Modified {
            quotes,
            value,
            persisted,
        })
    }

    fn abandon(&self) {
        if let Err(e) = self.storage.rollback() {
            tracing::warn!(error = %e, "Could not roll back quote update");
        }
    }

    fn seed(&self, reason: SeedReason) -> LoadOutcome {
        tracing::info!(?reason, "Seeding default quotes");
        let quotes = default_quotes();
        self.save(&quotes);
        LoadOutcome {
            quotes,
            source: LoadSource::Seeded(reason),
        }
    }
}

fn parse_stored(raw: &str) -> std::result::Result<Vec<Quote>, SeedReason> {
    let value: Value = serde_json::from_str(raw).map_err(|e| {
        tracing::warn!(error = %e, "Stored quotes are not valid JSON");
        SeedReason::Corrupt
    })?;

    let Value::Array(items) = value else {
        tracing::warn!("Stored quotes are not an array");
        return Err(SeedReason::NotAnArray);
    };

    Ok(items.into_iter().map(Quote::from).collect())
}
