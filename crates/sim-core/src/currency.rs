//! Currency conversion across denomination dates.
//!
//! All monetary comparisons across time go through here: a [`Money`] is
//! rescaled from its creation date to a target date using a monthly
//! inflation index. With no index configured the converter is the identity
//! on amounts and only restamps the date.

use crate::error::{MarketError, Result};
use std::collections::HashMap;
use types::{Date, Money};

/// Converts dated amounts via a monthly inflation index.
#[derive(Debug, Clone, Default)]
pub struct Currency {
    /// Rate per absolute month number. `None` means no inflation data is
    /// configured and conversion passes amounts through.
    rates: Option<HashMap<i32, f64>>,
}

impl Currency {
    /// A converter with no inflation data: conversion restamps the date and
    /// leaves the amount unchanged.
    pub fn identity() -> Self {
        Self { rates: None }
    }

    /// A converter over a monthly rate series.
    pub fn with_series<I>(series: I) -> Self
    where
        I: IntoIterator<Item = (Date, f64)>,
    {
        let rates = series
            .into_iter()
            .map(|(date, rate)| (date.months_since_epoch(), rate))
            .collect();
        Self { rates: Some(rates) }
    }

    /// Rescale `money` to the target date.
    ///
    /// Fails with [`MarketError::MissingRate`] when a series is configured
    /// and either endpoint's rate is zero or absent.
    pub fn convert(&self, money: Money, to: Date) -> Result<Money> {
        let Some(rates) = &self.rates else {
            return Ok(Money::new(money.amount, to));
        };

        let rate_to = self.rate(rates, to)?;
        let rate_from = self.rate(rates, money.when)?;
        Ok(Money::new(
            money.amount * (rate_to / rate_from) as f32,
            to,
        ))
    }

    fn rate(&self, rates: &HashMap<i32, f64>, date: Date) -> Result<f64> {
        match rates.get(&date.months_since_epoch()) {
            Some(&rate) if rate != 0.0 => Ok(rate),
            _ => Err(MarketError::MissingRate(date)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series() -> Currency {
        Currency::with_series([
            (Date::new(1986, 0), 1.00),
            (Date::new(1986, 1), 1.01),
            (Date::new(1986, 2), 1.02),
            (Date::new(1986, 3), 0.0),
        ])
    }

    #[test]
    fn test_identity_passthrough_restamps_date() {
        let currency = Currency::identity();
        let m = Money::new(500.0, Date::new(1986, 0));
        let out = currency.convert(m, Date::new(1990, 5)).unwrap();
        assert_eq!(out.amount, 500.0);
        assert_eq!(out.when, Date::new(1990, 5));
    }

    #[test]
    fn test_conversion_scales_by_rate_ratio() {
        let currency = series();
        let m = Money::new(100.0, Date::new(1986, 0));
        let out = currency.convert(m, Date::new(1986, 2)).unwrap();
        assert!((out.amount - 102.0).abs() < 1e-3);
    }

    #[test]
    fn test_round_trip_recovers_amount() {
        let currency = series();
        let m = Money::new(250.0, Date::new(1986, 0));
        let there = currency.convert(m, Date::new(1986, 2)).unwrap();
        let back = currency.convert(there, Date::new(1986, 0)).unwrap();
        assert!((back.amount - m.amount).abs() < 1e-3);
    }

    #[test]
    fn test_zero_or_absent_rate_fails() {
        let currency = series();
        let m = Money::new(100.0, Date::new(1986, 0));
        assert_eq!(
            currency.convert(m, Date::new(1986, 3)),
            Err(MarketError::MissingRate(Date::new(1986, 3)))
        );
        assert_eq!(
            currency.convert(m, Date::new(1987, 0)),
            Err(MarketError::MissingRate(Date::new(1987, 0)))
        );
    }
}
