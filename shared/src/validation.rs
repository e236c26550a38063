//! Pure validation and stock-math helpers
//!
//! These functions carry the arithmetic the movement ledger depends on and
//! are exercised directly by the backend property tests.

/// True when a string is empty or whitespace only
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Signed stock adjustment difference: counted minus recorded.
///
/// Positive means surplus was found, negative means shortage.
pub fn adjustment_difference(counted_quantity: i64, recorded_quantity: i64) -> i64 {
    counted_quantity - recorded_quantity
}

/// A product is low on stock when its total on-hand quantity is at or below
/// its minimum stock level. Products with no stock rows count as zero, so a
/// product with `min_stock_level = 0` and no stock is low.
pub fn is_low_stock(total_stock: i64, min_stock_level: i64) -> bool {
    total_stock <= min_stock_level
}

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}
