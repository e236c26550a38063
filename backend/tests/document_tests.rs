//! Movement document tests
//!
//! Covers status lifecycles, document numbering, and the adjustment
//! reason vocabulary.

use proptest::prelude::*;
use std::collections::HashSet;
use std::str::FromStr;

use shared::models::{
    format_document_number, AdjustmentReason, AdjustmentStatus, DeliveryStatus, DocumentKind,
    ReceiptStatus, TransferStatus,
};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_variant_prefixes() {
        assert_eq!(DocumentKind::Receipt.prefix(), "RCP");
        assert_eq!(DocumentKind::Delivery.prefix(), "DEL");
        assert_eq!(DocumentKind::Transfer.prefix(), "TRF");
        assert_eq!(DocumentKind::Adjustment.prefix(), "ADJ");
    }

    #[test]
    fn test_document_number_format() {
        let number = format_document_number(DocumentKind::Receipt, 2026, 42);
        assert_eq!(number, "RCP-2026-000042");
    }

    /// Distinct sequence values yield pairwise distinct numbers
    #[test]
    fn test_document_numbers_distinct() {
        let numbers: HashSet<String> = (1..=100)
            .map(|seq| format_document_number(DocumentKind::Delivery, 2026, seq))
            .collect();
        assert_eq!(numbers.len(), 100);
    }

    /// Numbers for different variants never collide even with equal sequences
    #[test]
    fn test_document_numbers_namespaced_by_variant() {
        let receipt = format_document_number(DocumentKind::Receipt, 2026, 7);
        let transfer = format_document_number(DocumentKind::Transfer, 2026, 7);
        assert_ne!(receipt, transfer);
    }

    #[test]
    fn test_receipt_lifecycle_order() {
        assert_eq!(ReceiptStatus::Draft.next(), Some(ReceiptStatus::Processing));
        assert_eq!(
            ReceiptStatus::Processing.next(),
            Some(ReceiptStatus::Completed)
        );
        assert_eq!(ReceiptStatus::Completed.next(), None);
        assert!(ReceiptStatus::Completed.is_terminal());
    }

    #[test]
    fn test_delivery_lifecycle_order() {
        assert_eq!(DeliveryStatus::Draft.next(), Some(DeliveryStatus::Picking));
        assert_eq!(DeliveryStatus::Picking.next(), Some(DeliveryStatus::Packing));
        assert_eq!(DeliveryStatus::Packing.next(), Some(DeliveryStatus::Shipped));
        assert_eq!(
            DeliveryStatus::Shipped.next(),
            Some(DeliveryStatus::Delivered)
        );
        assert_eq!(DeliveryStatus::Delivered.next(), None);
    }

    #[test]
    fn test_transfer_lifecycle_order() {
        assert_eq!(
            TransferStatus::Draft.next(),
            Some(TransferStatus::InTransit)
        );
        assert_eq!(
            TransferStatus::InTransit.next(),
            Some(TransferStatus::Completed)
        );
        assert!(TransferStatus::Completed.is_terminal());
    }

    #[test]
    fn test_adjustment_lifecycle_order() {
        assert_eq!(AdjustmentStatus::Draft.next(), Some(AdjustmentStatus::Review));
        assert_eq!(
            AdjustmentStatus::Review.next(),
            Some(AdjustmentStatus::Approved)
        );
        assert!(AdjustmentStatus::Approved.is_terminal());
    }

    /// Skipping a step or moving backwards is never allowed
    #[test]
    fn test_no_skipping_or_backward_transitions() {
        assert!(!ReceiptStatus::Draft.can_advance_to(ReceiptStatus::Completed));
        assert!(!ReceiptStatus::Processing.can_advance_to(ReceiptStatus::Draft));
        assert!(!DeliveryStatus::Draft.can_advance_to(DeliveryStatus::Shipped));
        assert!(!DeliveryStatus::Delivered.can_advance_to(DeliveryStatus::Draft));
        assert!(!TransferStatus::Draft.can_advance_to(TransferStatus::Completed));
        assert!(!AdjustmentStatus::Draft.can_advance_to(AdjustmentStatus::Approved));
    }

    #[test]
    fn test_status_parse_round_trip() {
        for status in [
            ReceiptStatus::Draft,
            ReceiptStatus::Processing,
            ReceiptStatus::Completed,
        ] {
            assert_eq!(ReceiptStatus::from_str(status.as_str()), Ok(status));
        }
        assert_eq!(
            TransferStatus::from_str("in_transit"),
            Ok(TransferStatus::InTransit)
        );
        assert!(ReceiptStatus::from_str("waiting").is_err());
        assert!(DeliveryStatus::from_str("ready").is_err());
    }

    #[test]
    fn test_pending_statuses_precede_stock_application() {
        // Stock is applied at completed / shipped; everything before counts
        // as pending on the dashboard.
        assert_eq!(ReceiptStatus::PENDING, &["draft", "processing"]);
        assert_eq!(DeliveryStatus::PENDING, &["draft", "picking", "packing"]);
        assert!(!ReceiptStatus::PENDING.contains(&"completed"));
        assert!(!DeliveryStatus::PENDING.contains(&"shipped"));
        assert!(!DeliveryStatus::PENDING.contains(&"delivered"));
    }

    #[test]
    fn test_adjustment_reason_vocabulary() {
        assert_eq!(AdjustmentReason::ALL.len(), 8);
        assert_eq!(
            AdjustmentReason::from_str("Cycle Count"),
            Ok(AdjustmentReason::CycleCount)
        );
        assert_eq!(
            AdjustmentReason::from_str("Quality Issue"),
            Ok(AdjustmentReason::QualityIssue)
        );
        assert!(AdjustmentReason::from_str("Shrinkage").is_err());
    }

    #[test]
    fn test_adjustment_reason_round_trip() {
        for reason in AdjustmentReason::ALL {
            assert_eq!(AdjustmentReason::from_str(reason.as_str()), Ok(*reason));
        }
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    const DELIVERY_STATUSES: [DeliveryStatus; 5] = [
        DeliveryStatus::Draft,
        DeliveryStatus::Picking,
        DeliveryStatus::Packing,
        DeliveryStatus::Shipped,
        DeliveryStatus::Delivered,
    ];

    fn kind_strategy() -> impl Strategy<Value = DocumentKind> {
        prop_oneof![
            Just(DocumentKind::Receipt),
            Just(DocumentKind::Delivery),
            Just(DocumentKind::Transfer),
            Just(DocumentKind::Adjustment),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// A delivery may only ever advance to the immediately next status
        #[test]
        fn prop_delivery_one_step_only(from_idx in 0usize..5, to_idx in 0usize..5) {
            let from = DELIVERY_STATUSES[from_idx];
            let to = DELIVERY_STATUSES[to_idx];

            if to_idx == from_idx + 1 {
                prop_assert!(from.can_advance_to(to));
            } else {
                prop_assert!(!from.can_advance_to(to));
            }
        }

        /// Distinct sequence values always produce distinct document numbers
        #[test]
        fn prop_document_numbers_distinct(
            kind in kind_strategy(),
            sequences in prop::collection::hash_set(1i64..=1_000_000, 2..100)
        ) {
            let numbers: HashSet<String> = sequences
                .iter()
                .map(|seq| format_document_number(kind, 2026, *seq))
                .collect();

            prop_assert_eq!(numbers.len(), sequences.len());
        }

        /// Every status string round-trips through parsing
        #[test]
        fn prop_delivery_status_round_trip(idx in 0usize..5) {
            let status = DELIVERY_STATUSES[idx];
            prop_assert_eq!(DeliveryStatus::from_str(status.as_str()), Ok(status));
        }

        /// Walking next() from draft always terminates at a terminal status
        #[test]
        fn prop_lifecycle_terminates(start_idx in 0usize..5) {
            let mut status = DELIVERY_STATUSES[start_idx];
            let mut steps = 0;
            while let Some(next) = status.next() {
                status = next;
                steps += 1;
                prop_assert!(steps <= 5, "lifecycle must not cycle");
            }
            prop_assert!(status.is_terminal());
        }
    }
}
