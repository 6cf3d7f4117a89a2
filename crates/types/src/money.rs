//! Monetary values with a creation date.
//!
//! A [`Money`] is an amount stamped with the date it was denominated. Amounts
//! from different dates are not directly comparable — the currency converter
//! is the only legal way to bring two amounts onto the same date, because
//! inflation rescales the amount in the process.

use crate::date::Date;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An amount of money denominated at a particular date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Money {
    /// The amount, in model currency units.
    pub amount: f32,
    /// The date the amount was denominated.
    pub when: Date,
}

impl Money {
    /// Create an amount denominated at `when`.
    #[inline]
    pub fn new(amount: f32, when: Date) -> Self {
        Self { amount, when }
    }

    /// Zero denominated at `when`.
    #[inline]
    pub fn zero(when: Date) -> Self {
        Self { amount: 0.0, when }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2} ({})", self.amount, self.when)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_shows_denomination_date() {
        let m = Money::new(87000.0, Date::new(1986, 0));
        assert_eq!(m.to_string(), "$87000.00 (1986-01)");
    }
}
