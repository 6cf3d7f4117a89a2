//! Seller gathering and asking-price maintenance.
//!
//! Owns the hedonic estimator. Each month it refreshes the estimator
//! (zone value cache + refit), then assembles the seller board from three
//! sources: the active dwellings of this month's opt-in buyers, listings
//! carried over from earlier months, and every vacant or non-active owned
//! dwelling — the route by which yearly construction reaches the market.

use crate::traits::SellerSource;
use hedonic::AskingPriceModel;
use sim_core::{Result, Seller, SellerBoard, SimContext};
use std::collections::HashSet;
use types::{Date, DwellingId, DwellingType};

/// Prices listings and builds the monthly seller board.
pub struct PricingSubsystem {
    pub estimator: AskingPriceModel,
    pub max_bedrooms: u32,
    pub force_sequential: bool,
}

impl PricingSubsystem {
    pub fn new(estimator: AskingPriceModel, max_bedrooms: u32) -> Self {
        Self {
            estimator,
            max_bedrooms,
            force_sequential: false,
        }
    }

    /// Refresh the estimator before any price is quoted this month.
    pub fn monthly_tick(&mut self, ctx: &SimContext, now: Date) -> Result<()> {
        self.estimator.monthly_tick(ctx, now)
    }
}

impl SellerSource for PricingSubsystem {
    fn gather_sellers(
        &self,
        ctx: &mut SimContext,
        now: Date,
        opted_in: &[DwellingId],
        carried: &[DwellingId],
    ) -> Result<SellerBoard> {
        let opted: HashSet<DwellingId> = opted_in.iter().copied().collect();
        let carried: HashSet<DwellingId> = carried.iter().copied().collect();

        // Pass 1 (mutating): select candidates in repository order and
        // stamp first-time listings with the current date.
        let mut candidates: Vec<DwellingId> = Vec::new();
        for dwelling in ctx.dwellings.iter() {
            if !dwelling.exists {
                continue;
            }
            let vacant = dwelling.household.is_none();
            let non_active = dwelling.household.is_some_and(|h| {
                ctx.households
                    .try_get(h)
                    .is_some_and(|household| household.dwelling != Some(dwelling.id))
            });
            if vacant || non_active || opted.contains(&dwelling.id) || carried.contains(&dwelling.id)
            {
                candidates.push(dwelling.id);
            }
        }
        for &id in &candidates {
            if let Some(dwelling) = ctx.dwellings.try_get_mut(id) {
                if dwelling.listing_date.is_none() {
                    dwelling.listing_date = Some(now);
                }
            }
        }

        // Pass 2 (read-only, parallel): price every candidate.
        let ctx_ref: &SimContext = ctx;
        let priced: Vec<(DwellingType, u32, Seller)> = parallel::map_slice(
            &candidates,
            |&id| {
                let dwelling = ctx_ref
                    .dwellings
                    .try_get(id)
                    .unwrap_or_else(|| unreachable!("candidate selected from live iteration"));
                let (asking, minimum) = self.estimator.price(ctx_ref, dwelling, now);
                (
                    dwelling.dwelling_type,
                    dwelling.rooms,
                    Seller {
                        dwelling: id,
                        asking,
                        minimum,
                    },
                )
            },
            self.force_sequential,
        );

        let mut board = SellerBoard::new(self.max_bedrooms);
        for (ty, rooms, seller) in priced {
            board.push_seller(ty, rooms, seller);
        }
        Ok(board)
    }
}
