//! Willingness-to-pay: how much a household offers for a dwelling.
//!
//! The bid is anchored on purchasing power — the larger of floored annual
//! income and liquid savings — adjusted for the room-count change the move
//! would bring and for the open-space and industrial character of the
//! seller's zone, then capped just under the asking price and floored back
//! at purchasing power.
//!
//! Incomes require currency conversion per job, so a monthly warm-up pass
//! caches each buyer's income and savings before the parallel choice-set
//! phase; bidding then only reads.

use sim_core::{BidModel, Buyer, MarketError, Result, SimContext};
use std::collections::HashMap;
use types::{Date, Dwelling, Household, HouseholdId};

/// Income floor applied before purchasing power is computed.
const INCOME_FLOOR: f64 = 10_000.0;

/// Cached monthly finances of one buyer household.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Purse {
    income: f64,
    savings: f64,
}

/// The production bid model.
#[derive(Debug, Default)]
pub struct WillingnessToPay {
    purses: HashMap<HouseholdId, Purse>,
    /// The month incomes are converted to; set by the warm-up pass.
    now: Date,
}

impl WillingnessToPay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Precompute incomes and savings for this month's buyers.
    pub fn warm_up(&mut self, ctx: &SimContext, buyers: &[Buyer], now: Date) -> Result<()> {
        self.now = now;
        self.purses.clear();
        self.purses.reserve(buyers.len());
        for buyer in buyers {
            let purse = Self::compute_purse(ctx, buyer.household, now)?;
            self.purses.insert(buyer.household, purse);
        }
        Ok(())
    }

    fn compute_purse(ctx: &SimContext, household: HouseholdId, now: Date) -> Result<Purse> {
        Ok(Purse {
            income: ctx.household_income(household, now)?,
            savings: ctx.household_savings(household),
        })
    }

    fn purse(&self, ctx: &SimContext, household: HouseholdId) -> Result<Purse> {
        match self.purses.get(&household) {
            Some(&purse) => Ok(purse),
            // Cache miss (a buyer outside the warmed-up list): compute
            // directly against the read-only context.
            None => Self::compute_purse(ctx, household, self.now),
        }
    }
}

impl BidModel for WillingnessToPay {
    fn bid(
        &self,
        ctx: &SimContext,
        buyer: &Household,
        dwelling: &Dwelling,
        asking: f32,
    ) -> Result<f32> {
        let purse = self.purse(ctx, buyer.id)?;
        let income = purse.income.max(INCOME_FLOOR);
        let purchasing_power = income.max(purse.savings);

        let current_rooms = buyer
            .dwelling
            .and_then(|d| ctx.dwellings.try_get(d))
            .map(|d| d.rooms as f64)
            .unwrap_or(0.0);
        let delta_rooms = dwelling.rooms as f64 - current_rooms;

        let land = ctx
            .land_use(dwelling.zone)
            .ok_or(MarketError::MissingZoneData(dwelling.zone))?;
        let open_bonus = if land.open > 0.0 {
            5_000.0 * (land.open as f64).ln()
        } else {
            0.0
        };
        let industrial_penalty = if land.industrial > 0.0 {
            8_000.0 * (land.industrial as f64).ln()
        } else {
            0.0
        };

        let base_bid = 4.0 * purchasing_power;
        let space_value = 10_000.0 * delta_rooms;
        let ceiling = asking as f64 * 0.97;
        let bid = ceiling
            .min(base_bid + space_value + open_bonus - industrial_penalty)
            .max(purchasing_power);
        Ok(bid as f32)
    }
}
