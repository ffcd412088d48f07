//! Random quote selection.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::{CategoryFilter, Quote, Selection};

/// Draw a quote uniformly from those passing `filter`.
pub fn pick<R: Rng + ?Sized>(quotes: &[Quote], filter: &CategoryFilter, rng: &mut R) -> Selection {
    let candidates: Vec<&Quote> = quotes.iter().filter(|q| filter.matches(q)).collect();

    candidates
        .choose(rng)
        .map_or(Selection::NoQuoteAvailable, |q| Selection::Found((*q).clone()))
}

/// [`pick`] using the thread-local generator.
pub fn pick_random(quotes: &[Quote], filter: &CategoryFilter) -> Selection {
    pick(quotes, filter, &mut rand::thread_rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn quotes() -> Vec<Quote> {
        vec![
            Quote::new("one", "A"),
            Quote::new("two", "B"),
            Quote::new("three", "A"),
            Quote::new("four", "C"),
        ]
    }

    #[test]
    fn test_all_returns_member() {
        let quotes = quotes();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let Selection::Found(q) = pick(&quotes, &CategoryFilter::All, &mut rng) else {
                panic!("expected a quote");
            };
            assert!(quotes.contains(&q));
        }
    }

    #[test]
    fn test_all_eventually_hits_every_item() {
        let quotes = quotes();
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = vec![false; quotes.len()];

        for _ in 0..1_000 {
            if let Selection::Found(q) = pick(&quotes, &CategoryFilter::All, &mut rng) {
                let idx = quotes.iter().position(|x| *x == q).unwrap();
                seen[idx] = true;
            }
        }

        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_category_restricts_candidates() {
        let quotes = quotes();
        let filter = CategoryFilter::from("A");
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..100 {
            let selection = pick(&quotes, &filter, &mut rng);
            assert_eq!(selection.quote().unwrap().category, "A");
        }
    }

    #[test]
    fn test_unknown_category_is_empty_result() {
        let selection = pick_random(&quotes(), &CategoryFilter::from("a"));
        assert_eq!(selection, Selection::NoQuoteAvailable);
    }

    #[test]
    fn test_empty_list_is_empty_result() {
        assert_eq!(pick_random(&[], &CategoryFilter::All), Selection::NoQuoteAvailable);
    }
}
