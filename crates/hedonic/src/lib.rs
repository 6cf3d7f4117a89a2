//! Quantitative models for asking prices.
//!
//! `solver` holds the ridge-regularized Cholesky machinery; `estimator`
//! maintains the per-type hedonic coefficient vectors the market quotes
//! asking prices from.

pub mod solver;

mod estimator;

pub use estimator::{AskingPriceModel, FEATURE_COUNT};
