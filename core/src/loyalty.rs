//! Loyalty-point arithmetic.
//!
//! Points are earned on booking spend and spent on voucher redemption.
//! The earning rule is shared between the booking orchestrator and its
//! tests, so it lives here rather than inside a query.

/// Minor units of spend that earn one loyalty point.
pub const POINTS_DIVISOR: i64 = 10_000;

/// Points earned for a booking total: `floor(total_price / 10_000)`.
///
/// Totals are validated non-negative before any transaction starts, so
/// plain integer division is the floor.
#[must_use]
pub const fn earned_points(total_price: i64) -> i64 {
    total_price / POINTS_DIVISOR
}

/// Applies a voucher discount to a booking total, flooring at zero so a
/// large voucher can never produce a negative charge.
#[must_use]
pub const fn apply_discount(total_price: i64, discount: i64) -> i64 {
    let discounted = total_price - discount;
    if discounted < 0 { 0 } else { discounted }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirty_points_for_three_hundred_thousand() {
        assert_eq!(earned_points(300_000), 30);
    }

    #[test]
    fn no_points_below_the_divisor() {
        assert_eq!(earned_points(9_999), 0);
        assert_eq!(earned_points(0), 0);
    }

    #[test]
    fn earning_floors_rather_than_rounds() {
        assert_eq!(earned_points(19_999), 1);
        assert_eq!(earned_points(20_000), 2);
    }

    #[test]
    fn discount_floors_at_zero() {
        assert_eq!(apply_discount(50_000, 20_000), 30_000);
        assert_eq!(apply_discount(10_000, 25_000), 0);
        assert_eq!(apply_discount(10_000, 0), 10_000);
    }
}
