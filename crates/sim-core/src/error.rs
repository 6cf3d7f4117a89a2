//! Error types for market operations.
//!
//! Recoverable conditions (a non-positive-definite refit matrix, missing
//! zone data while appending a sale record, an empty refit window) are
//! handled at their call sites; the variants here that reach the monthly
//! tick boundary abort that tick. User-visible failure is a single line
//! identifying the module, the error kind, and the current date.

use std::fmt;
use types::{Date, ZoneNumber};

/// Result type for market operations.
pub type Result<T> = std::result::Result<T, MarketError>;

/// Errors that can occur while running the market.
#[derive(Debug, Clone, PartialEq)]
pub enum MarketError {
    /// A required collaborator or configuration input is absent.
    ConfigMissing(&'static str),
    /// No land-use data for a zone in a context where bids cannot be
    /// produced without it.
    MissingZoneData(ZoneNumber),
    /// An inflation rate needed for currency conversion is zero or absent.
    MissingRate(Date),
    /// The refit normal matrix is not positive definite.
    NotPositiveDefinite,
    /// A buyer, seller, or category index points outside its structure —
    /// the choice-set data is corrupted.
    IndexOutOfRange {
        what: &'static str,
        index: i64,
        len: usize,
    },
    /// Dwelling or person repository is empty at the start of a year.
    EmptyPopulation(&'static str),
    /// Any unexpected state.
    Fatal(String),
}

impl MarketError {
    /// True for conditions that must abort the current monthly tick.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, MarketError::NotPositiveDefinite)
    }
}

impl fmt::Display for MarketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketError::ConfigMissing(what) => write!(f, "missing configuration: {}", what),
            MarketError::MissingZoneData(zone) => {
                write!(f, "no land-use data for zone {}", zone)
            }
            MarketError::MissingRate(date) => {
                write!(f, "no inflation rate for {}", date)
            }
            MarketError::NotPositiveDefinite => {
                write!(f, "normal matrix is not positive definite")
            }
            MarketError::IndexOutOfRange { what, index, len } => {
                write!(f, "{} index {} out of range (len {})", what, index, len)
            }
            MarketError::EmptyPopulation(what) => {
                write!(f, "{} repository is empty at yearly start", what)
            }
            MarketError::Fatal(msg) => write!(f, "fatal: {}", msg),
        }
    }
}

impl std::error::Error for MarketError {}
