//! Market machinery for the housing-market simulation.
//!
//! This crate owns the pieces the monthly clear is built from:
//!
//! - [`Repository`]: ID-indexed entity arenas with insertion-order
//!   iteration; the cyclic entity graph is resolved through these.
//! - [`SimContext`]: every repository and collaborator in one explicitly
//!   threaded value — no ambient globals.
//! - [`RngStream`]: deterministic per-task random substreams.
//! - [`Currency`]: inflation-indexed conversion of dated amounts.
//! - [`SellerBoard`] and [`ClearingEngine`]: the category-partitioned,
//!   iterative sealed-bid auction with Vickrey second-price resolution.
//!
//! Behavioral models plug in through the [`BidModel`] capability trait;
//! the engine never depends on how bids are produced.

mod auction;
mod context;
mod currency;
mod error;
mod listings;
mod repository;
mod rng;
mod zones;

pub use auction::{BidModel, ClearingEngine, ClearingOutcome, Sale};
pub use context::SimContext;
pub use currency::Currency;
pub use error::{MarketError, Result};
pub use listings::{Bid, BidList, Buyer, Seller, SellerBoard};
pub use repository::Repository;
pub use rng::RngStream;
pub use zones::ZoneSystem;
