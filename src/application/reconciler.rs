//! Merge of a remote quote batch onto the local list.
//!
//! Quotes are matched by exact text. Unknown texts are appended; a known
//! text whose category differs takes the remote category. No timestamps or
//! versions are consulted: the remote always wins.

use std::collections::HashMap;

use crate::domain::{Quote, ReconcileReport};

/// Apply `remote` onto `local` and report what changed.
///
/// If `remote` repeats a text, the last occurrence decides the category so
/// that re-applying the same batch is a no-op. When `local` holds several
/// quotes with the same text, only the first one is compared and updated.
pub fn reconcile(local: &mut Vec<Quote>, remote: &[Quote]) -> ReconcileReport {
    let mut report = ReconcileReport::default();

    for candidate in collapse_duplicates(remote) {
        match local.iter().position(|q| q.text == candidate.text) {
            None => {
                local.push(candidate.clone());
                report.added += 1;
            }
            Some(i) if local[i].category != candidate.category => {
                tracing::debug!(
                    text = %candidate.text,
                    from = %local[i].category,
                    to = %candidate.category,
                    "Remote category wins"
                );
                local[i].category.clone_from(&candidate.category);
                report.updated += 1;
            }
            Some(_) => {}
        }
    }

    report
}

/// First-seen order of texts, last-seen category for each.
fn collapse_duplicates(remote: &[Quote]) -> Vec<&Quote> {
    let mut slots: HashMap<&str, usize> = HashMap::with_capacity(remote.len());
    let mut out: Vec<&Quote> = Vec::with_capacity(remote.len());

    for quote in remote {
        if let Some(&slot) = slots.get(quote.text.as_str()) {
            out[slot] = quote;
        } else {
            slots.insert(quote.text.as_str(), out.len());
            out.push(quote);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_remote_category_wins() {
        let mut local = vec![Quote::new("A", "X")];
        let report = reconcile(&mut local, &[Quote::new("A", "Y")]);

        assert_eq!(local, vec![Quote::new("A", "Y")]);
        assert!(report.changed());
        assert_eq!(report, ReconcileReport { added: 0, updated: 1 });
    }

    #[test]
    fn test_addition_into_empty_list() {
        let mut local = Vec::new();
        let report = reconcile(&mut local, &[Quote::new("B", "Server")]);

        assert_eq!(local, vec![Quote::new("B", "Server")]);
        assert_eq!(report, ReconcileReport { added: 1, updated: 0 });
    }

    #[test]
    fn test_identical_item_untouched() {
        let mut local = vec![Quote::new("A", "X"), Quote::new("C", "Z")];
        let report = reconcile(&mut local, &[Quote::new("C", "Z")]);

        assert!(!report.changed());
        assert_eq!(local.len(), 2);
    }

    #[test]
    fn test_second_pass_is_idempotent() {
        let mut local = vec![
            Quote::new("A", "X"),
            Quote::new("A", "Other"),
            Quote::new("keep", "Mine"),
        ];
        let remote = vec![
            Quote::new("A", "Y"),
            Quote::new("new", "Server"),
            Quote::new("dup", "One"),
            Quote::new("dup", "Two"),
        ];

        let first = reconcile(&mut local, &remote);
        assert!(first.changed());
        let after_first = local.clone();

        let second = reconcile(&mut local, &remote);
        assert!(!second.changed());
        assert_eq!(local, after_first);
    }

    #[test]
    fn test_only_first_local_duplicate_updated() {
        let mut local = vec![Quote::new("A", "X"), Quote::new("A", "X")];
        reconcile(&mut local, &[Quote::new("A", "Y")]);

        assert_eq!(local, vec![Quote::new("A", "Y"), Quote::new("A", "X")]);
    }

    #[test]
    fn test_repeated_remote_text_last_wins() {
        let mut local = Vec::new();
        let report = reconcile(
            &mut local,
            &[Quote::new("dup", "One"), Quote::new("x", "S"), Quote::new("dup", "Two")],
        );

        assert_eq!(local, vec![Quote::new("dup", "Two"), Quote::new("x", "S")]);
        assert_eq!(report.added, 2);
    }

    #[test]
    fn test_match_is_exact_text() {
        let mut local = vec![Quote::new("Hello", "X")];
        let report = reconcile(&mut local, &[Quote::new("hello", "Y")]);

        assert_eq!(report.added, 1);
        assert_eq!(local[0], Quote::new("Hello", "X"));
    }
}
