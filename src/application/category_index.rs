//! Distinct categories and the remembered category filter.

use std::collections::HashSet;

use crate::domain::{CategoryFilter, Quote, Result};
use crate::infrastructure::KeyValueStore;

use super::quote_store::FILTER_KEY;

/// Distinct non-empty categories in first-seen order.
#[must_use]
pub fn categories(quotes: &[Quote]) -> Vec<String> {
    let mut seen = HashSet::new();
    quotes
        .iter()
        .map(|q| q.category.as_str())
        .filter(|c| !c.is_empty() && seen.insert(*c))
        .map(str::to_string)
        .collect()
}

/// Quotes passing `filter`, in list order.
#[must_use]
pub fn matching<'a>(quotes: &'a [Quote], filter: &CategoryFilter) -> Vec<&'a Quote> {
    quotes.iter().filter(|q| filter.matches(q)).collect()
}

/// Persist the chosen filter. Choosing `All` clears the stored value.
///
/// # Errors
/// Returns error if the storage cannot be written.
pub fn remember_filter(storage: &dyn KeyValueStore, filter: &CategoryFilter) -> Result<()> {
    match filter {
        CategoryFilter::All => storage.remove_item(FILTER_KEY)?,
        CategoryFilter::Category(c) => storage.set_item(FILTER_KEY, c)?,
    }
    tracing::debug!(filter = %filter, "Remembered category filter");
    Ok(())
}

/// The last persisted filter, or `All` when none was chosen or it
/// cannot be read.
#[must_use]
pub fn last_filter(storage: &dyn KeyValueStore) -> CategoryFilter {
    match storage.get_item(FILTER_KEY) {
        Ok(Some(value)) => CategoryFilter::from(value.as_str()),
        Ok(None) => CategoryFilter::All,
        Err(e) => {
            tracing::warn!(error = %e, "Could not read category filter");
            CategoryFilter::All
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::quote_store::QUOTES_KEY;
    use crate::infrastructure::LocalStorage;

    #[test]
    fn test_categories_first_seen_order() {
        let quotes = vec![
            Quote::new("a", "Zeta"),
            Quote::new("b", "Alpha"),
            Quote::new("c", "Zeta"),
            Quote::new("d", ""),
            Quote::new("e", "alpha"),
        ];

        assert_eq!(categories(&quotes), vec!["Zeta", "Alpha", "alpha"]);
    }

    #[test]
    fn test_matching_keeps_order() {
        let quotes = vec![
            Quote::new("a", "X"),
            Quote::new("b", "Y"),
            Quote::new("c", "X"),
        ];

        let texts: Vec<&str> = matching(&quotes, &CategoryFilter::from("X"))
            .into_iter()
            .map(|q| q.text.as_str())
            .collect();
        assert_eq!(texts, vec!["a", "c"]);
        assert_eq!(matching(&quotes, &CategoryFilter::All).len(), 3);
    }

    #[test]
    fn test_filter_defaults_to_all() {
        let storage = LocalStorage::open_in_memory().unwrap();
        assert_eq!(last_filter(&storage), CategoryFilter::All);
    }

    #[test]
    fn test_filter_round_trip_is_independent_of_quotes() {
        let storage = LocalStorage::open_in_memory().unwrap();

        remember_filter(&storage, &CategoryFilter::from("Misc")).unwrap();
        assert_eq!(last_filter(&storage), CategoryFilter::Category("Misc".into()));
        assert_eq!(storage.get_item(QUOTES_KEY).unwrap(), None);

        remember_filter(&storage, &CategoryFilter::All).unwrap();
        assert_eq!(last_filter(&storage), CategoryFilter::All);
        assert_eq!(storage.get_item(FILTER_KEY).unwrap(), None);
    }
}
