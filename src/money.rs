//! Currency arithmetic. Every amount written to the database passes through
//! [`round`], so stored values always carry at most two fractional digits.
//!
//! Amounts are stored as `DECIMAL(12, 2)`; the checked helpers return `None`
//! for anything that would not fit instead of panicking on overflow.

use rust_decimal::{Decimal, RoundingStrategy};

pub const SCALE: u32 = 2;

/// Largest amount a `DECIMAL(12, 2)` column holds: 9 999 999 999.99.
pub fn max_amount() -> Decimal {
    Decimal::new(999_999_999_999, SCALE)
}

pub fn round(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero)
}

fn bounded(amount: Decimal) -> Option<Decimal> {
    (amount.abs() <= max_amount()).then_some(amount)
}

/// `unit_price × quantity`, rounded.
pub fn line_total(unit_price: Decimal, quantity: i32) -> Option<Decimal> {
    unit_price
        .checked_mul(Decimal::from(quantity))
        .map(round)
        .and_then(bounded)
}

/// `a + b`, rounded. Pass a negative `b` to subtract.
pub fn add(a: Decimal, b: Decimal) -> Option<Decimal> {
    a.checked_add(b).map(round).and_then(bounded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn line_total_multiplies_and_rounds() {
        assert_eq!(line_total(dec!(50.00), 2), Some(dec!(100.00)));
        assert_eq!(line_total(dec!(0.335), 1), Some(dec!(0.34)));
        assert_eq!(line_total(dec!(19.99), 0), Some(dec!(0)));
    }

    #[test]
    fn line_total_rejects_overflow() {
        assert_eq!(line_total(dec!(100000000000000000000), i32::MAX), None);
        assert_eq!(line_total(max_amount(), 2), None);
        assert_eq!(line_total(max_amount(), 1), Some(dec!(9999999999.99)));
    }

    #[test]
    fn add_stays_within_column_bounds() {
        assert_eq!(add(dec!(10.10), dec!(-0.10)), Some(dec!(10.00)));
        assert_eq!(add(max_amount(), dec!(0.01)), None);
        assert_eq!(add(Decimal::MAX, Decimal::MAX), None);
    }

    #[test]
    fn round_keeps_two_digits() {
        assert_eq!(round(dec!(10.005)), dec!(10.01));
        assert_eq!(round(dec!(-10.005)), dec!(-10.01));
        assert_eq!(round(dec!(3)), dec!(3));
    }
}
