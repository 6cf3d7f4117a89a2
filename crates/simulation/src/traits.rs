//! Trait definitions for the market's capability seams.
//!
//! The source design organized market logic as a deep inheritance
//! hierarchy with abstract hooks; here each capability is an explicit
//! interface and the concrete subsystems are wired together by
//! composition. The traits document the seams; `Simulation` holds the
//! concrete subsystem types directly (not trait objects) — the indirection
//! buys nothing inside one binary, and the hot paths stay monomorphized.

use sim_core::{Buyer, Result, RngStream, SellerBoard, SimContext};
use types::{Date, DwellingId};

/// Enumerates the households entering the market as buyers this month.
pub trait BuyerSource {
    /// Evaluate participation for every candidate household.
    fn gather_buyers(
        &self,
        ctx: &SimContext,
        now: Date,
        birth_rate_change: f64,
        rng: &mut RngStream,
    ) -> Vec<Buyer>;
}

/// Assembles the seller board for a month, pricing every listing.
pub trait SellerSource {
    /// `opted_in` are the active dwellings of this month's fresh buyers;
    /// `carried` are unsold listings carried over from earlier months.
    fn gather_sellers(
        &self,
        ctx: &mut SimContext,
        now: Date,
        opted_in: &[DwellingId],
        carried: &[DwellingId],
    ) -> Result<SellerBoard>;
}
