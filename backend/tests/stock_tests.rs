//! Stock level store tests
//!
//! Covers the low-stock predicate, adjustment difference arithmetic, and
//! the delta-application invariants the movement documents rely on.

use proptest::prelude::*;
use std::collections::HashMap;

use shared::validation::{adjustment_difference, is_low_stock};

/// In-memory mirror of the stock level store keyed by (product, location).
/// Applies deltas with the same accumulate-on-key rule as the database
/// upsert.
#[derive(Default)]
struct StockBook {
    levels: HashMap<(u32, u32), i64>,
}

impl StockBook {
    fn apply_delta(&mut self, product: u32, location: u32, delta: i64) -> i64 {
        let entry = self.levels.entry((product, location)).or_insert(0);
        *entry += delta;
        *entry
    }

    /// Sum of quantities across all locations for a product, 0 if none
    fn total_stock(&self, product: u32) -> i64 {
        self.levels
            .iter()
            .filter(|((p, _), _)| *p == product)
            .map(|(_, quantity)| quantity)
            .sum()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_low_stock_boundary() {
        // At the threshold counts as low
        assert!(is_low_stock(10, 10));
        assert!(is_low_stock(9, 10));
        assert!(!is_low_stock(11, 10));
    }

    #[test]
    fn test_low_stock_zero_threshold() {
        // min_stock_level = 0 with zero stock is still low
        assert!(is_low_stock(0, 0));
        assert!(!is_low_stock(1, 0));
    }

    #[test]
    fn test_adjustment_difference_signed() {
        assert_eq!(adjustment_difference(42, 50), -8);
        assert_eq!(adjustment_difference(50, 42), 8);
        assert_eq!(adjustment_difference(50, 50), 0);
    }

    #[test]
    fn test_total_stock_empty() {
        let book = StockBook::default();
        assert_eq!(book.total_stock(1), 0);
    }

    #[test]
    fn test_apply_delta_accumulates() {
        let mut book = StockBook::default();
        book.apply_delta(1, 1, 50);
        book.apply_delta(1, 1, 20);
        book.apply_delta(1, 2, 30);

        assert_eq!(book.total_stock(1), 100);
    }

    /// Zero is a valid resting value; the row stays
    #[test]
    fn test_zero_resting_value() {
        let mut book = StockBook::default();
        book.apply_delta(1, 1, 25);
        let remaining = book.apply_delta(1, 1, -25);

        assert_eq!(remaining, 0);
        assert_eq!(book.total_stock(1), 0);
        assert!(book.levels.contains_key(&(1, 1)));
    }

    /// Receipt completion, then an approved shortage adjustment:
    /// create Widget with min 10, receive 50 at L1, count finds 42
    #[test]
    fn test_receipt_then_adjustment_scenario() {
        let mut book = StockBook::default();
        let widget = 1;
        let l1 = 1;
        let min_stock_level = 10;

        // Receipt line completed: +50 at L1
        book.apply_delta(widget, l1, 50);
        assert_eq!(book.total_stock(widget), 50);
        assert!(!is_low_stock(book.total_stock(widget), min_stock_level));

        // Adjustment approved: recorded 50, counted 42
        let difference = adjustment_difference(42, 50);
        assert_eq!(difference, -8);
        book.apply_delta(widget, l1, difference);
        assert_eq!(book.total_stock(widget), 42);
    }

    /// Transfer completion moves quantity without changing the total
    #[test]
    fn test_transfer_conserves_total() {
        let mut book = StockBook::default();
        book.apply_delta(1, 1, 50);

        // Transfer line completed: 10 from L1 to L2
        book.apply_delta(1, 1, -10);
        book.apply_delta(1, 2, 10);

        assert_eq!(book.total_stock(1), 50);
        assert_eq!(book.levels[&(1, 1)], 40);
        assert_eq!(book.levels[&(1, 2)], 10);
    }

    /// Shipping a delivery takes the requested quantity out of stock
    #[test]
    fn test_delivery_reduces_stock() {
        let mut book = StockBook::default();
        book.apply_delta(1, 1, 50);
        book.apply_delta(1, 1, -20);

        assert_eq!(book.total_stock(1), 30);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for delta sequences over a small key space
    fn delta_strategy() -> impl Strategy<Value = Vec<(u32, u32, i64)>> {
        prop::collection::vec((0u32..4, 0u32..4, -1000i64..=1000), 1..50)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Total stock always equals the sum of all deltas applied for the
        /// product, regardless of which locations received them
        #[test]
        fn prop_total_equals_sum_of_deltas(deltas in delta_strategy()) {
            let mut book = StockBook::default();
            let mut expected: HashMap<u32, i64> = HashMap::new();

            for (product, location, delta) in &deltas {
                book.apply_delta(*product, *location, *delta);
                *expected.entry(*product).or_insert(0) += delta;
            }

            for (product, total) in &expected {
                prop_assert_eq!(book.total_stock(*product), *total);
            }
        }

        /// Total stock equals the sum of the per-location rows at all times
        #[test]
        fn prop_total_is_row_sum(deltas in delta_strategy()) {
            let mut book = StockBook::default();
            for (product, location, delta) in &deltas {
                book.apply_delta(*product, *location, *delta);

                let row_sum: i64 = book
                    .levels
                    .iter()
                    .filter(|((p, _), _)| p == product)
                    .map(|(_, q)| q)
                    .sum();
                prop_assert_eq!(book.total_stock(*product), row_sum);
            }
        }

        /// A transfer-shaped pair of deltas never changes the product total
        #[test]
        fn prop_transfer_conserves_total(
            initial in 0i64..10_000,
            moved in 0i64..10_000
        ) {
            let mut book = StockBook::default();
            book.apply_delta(1, 1, initial);

            book.apply_delta(1, 1, -moved);
            book.apply_delta(1, 2, moved);

            prop_assert_eq!(book.total_stock(1), initial);
        }

        /// Applying the adjustment difference lands stock on the counted
        /// quantity when the recorded baseline matched
        #[test]
        fn prop_adjustment_sets_counted(
            recorded in 0i64..10_000,
            counted in 0i64..10_000
        ) {
            let mut book = StockBook::default();
            book.apply_delta(1, 1, recorded);

            book.apply_delta(1, 1, adjustment_difference(counted, recorded));

            prop_assert_eq!(book.levels[&(1, 1)], counted);
        }

        /// difference == counted - recorded exactly, including negatives
        #[test]
        fn prop_difference_exact(counted in -10_000i64..10_000, recorded in -10_000i64..10_000) {
            let difference = adjustment_difference(counted, recorded);
            prop_assert_eq!(difference, counted - recorded);
            prop_assert_eq!(difference + recorded, counted);
        }

        /// Low stock holds exactly when total <= minimum
        #[test]
        fn prop_low_stock_iff(total in -1000i64..1000, min in 0i64..1000) {
            prop_assert_eq!(is_low_stock(total, min), total <= min);
        }
    }
}

// ============================================================================
// Submission Helpers (mirroring the document services' validation rules)
// ============================================================================

#[cfg(test)]
mod submission_helpers {
    use proptest::prelude::*;

    /// A transfer names two distinct locations or is rejected outright
    pub fn validate_transfer_locations(from: u32, to: u32) -> Result<(), &'static str> {
        if from == to {
            Err("From and to locations cannot be the same")
        } else {
            Ok(())
        }
    }

    /// Validate submitted lines: every line must carry a positive quantity.
    /// Returns the stored line count, which becomes total_items.
    pub fn validate_lines(quantities: &[Option<i64>]) -> Result<usize, String> {
        if quantities.is_empty() {
            return Err("Items are required".to_string());
        }
        for (index, quantity) in quantities.iter().enumerate() {
            match quantity {
                None => return Err(format!("Line {}: quantity is required", index)),
                Some(q) if *q <= 0 => {
                    return Err(format!("Line {}: quantity must be positive", index))
                }
                Some(_) => {}
            }
        }
        Ok(quantities.len())
    }

    #[test]
    fn test_transfer_locations_must_differ() {
        assert!(validate_transfer_locations(1, 2).is_ok());
        assert!(validate_transfer_locations(1, 1).is_err());
    }

    #[test]
    fn test_empty_submission_rejected() {
        assert!(validate_lines(&[]).is_err());
    }

    /// An incomplete line fails the whole submission and names its index
    #[test]
    fn test_incomplete_line_named_in_error() {
        let err = validate_lines(&[Some(5), None, Some(3)]).unwrap_err();
        assert!(err.contains("Line 1"));

        let err = validate_lines(&[Some(5), Some(0)]).unwrap_err();
        assert!(err.contains("Line 1"));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Accepted submissions store exactly as many lines as were sent
        #[test]
        fn prop_total_items_matches_lines(quantities in prop::collection::vec(1i64..1000, 1..20)) {
            let submitted: Vec<Option<i64>> = quantities.iter().copied().map(Some).collect();
            prop_assert_eq!(validate_lines(&submitted), Ok(quantities.len()));
        }

        /// Any line missing its quantity rejects the submission
        #[test]
        fn prop_missing_line_rejects(
            quantities in prop::collection::vec(1i64..1000, 1..20),
            missing_idx in 0usize..20
        ) {
            let mut submitted: Vec<Option<i64>> = quantities.iter().copied().map(Some).collect();
            let idx = missing_idx % submitted.len();
            submitted[idx] = None;
            prop_assert!(validate_lines(&submitted).is_err());
        }
    }
}
