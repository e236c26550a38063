//! Catalog and user validation tests

use proptest::prelude::*;
use std::str::FromStr;

use shared::models::UserRole;
use shared::validation::{is_blank, validate_email};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank("   "));
        assert!(is_blank("\t\n"));
        assert!(!is_blank("WID-1"));
        assert!(!is_blank(" x "));
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("staff@warehouse.example.com").is_ok());
        assert!(validate_email("a@b.c").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("@no-dot").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn test_user_role_parse() {
        assert_eq!(UserRole::from_str("admin"), Ok(UserRole::Admin));
        assert_eq!(UserRole::from_str("manager"), Ok(UserRole::Manager));
        assert_eq!(
            UserRole::from_str("warehouse_staff"),
            Ok(UserRole::WarehouseStaff)
        );
        assert!(UserRole::from_str("superuser").is_err());
    }

    /// New users default to warehouse staff
    #[test]
    fn test_user_role_default() {
        assert_eq!(UserRole::default(), UserRole::WarehouseStaff);
        assert_eq!(UserRole::default().as_str(), "warehouse_staff");
    }

    #[test]
    fn test_user_role_round_trip() {
        for role in [UserRole::Admin, UserRole::Manager, UserRole::WarehouseStaff] {
            assert_eq!(UserRole::from_str(role.as_str()), Ok(role));
        }
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Whitespace padding never rescues a blank value
        #[test]
        fn prop_blank_whitespace_invariant(padding in "[ \t\n]{0,10}") {
            prop_assert!(is_blank(&padding));
        }

        /// Non-empty trimmed content is never blank
        #[test]
        fn prop_nonblank_content(content in "[a-zA-Z0-9-]{1,20}") {
            prop_assert!(!is_blank(&content));
        }

        /// Case-insensitive search terms match regardless of input casing.
        /// Mirrors the catalog search, which lowercases both sides.
        #[test]
        fn prop_search_case_insensitive(term in "[a-zA-Z]{1,12}") {
            let name = format!("Widget {}", term);
            let needle = term.to_uppercase().to_lowercase();
            prop_assert!(name.to_lowercase().contains(&needle));
        }
    }
}
