//! The monthly market-clearing engine.
//!
//! Clearing is a bulk-synchronous sequence: a parallel choice-set phase in
//! which every buyer bids on up to `choice_set_size` sellers per eligible
//! category, a parallel sort of each seller's bid list, then an iterative
//! auction alternating parallel top-bid extraction, serial resolution, and
//! a parallel sweep of resolved buyers' remaining bids.
//!
//! Determinism: every parallel task draws from its own substream seeded
//! from a fixed prefix of the month stream; the buyer-index tie-break makes
//! bid lists sort to the same order regardless of insertion interleaving;
//! multi-win resolution breaks ties on seller then category index; and
//! top-bid extraction walks categories in fixed order. For a fixed seed,
//! inputs, and configuration, the sale stream is byte-identical across
//! runs.

use crate::context::SimContext;
use crate::error::{MarketError, Result};
use crate::listings::{Bid, BidList, Buyer, Seller, SellerBoard};
use crate::rng::RngStream;
use log::{debug, info};
use parking_lot::Mutex;
use smallvec::SmallVec;
use types::{Date, Dwelling, DwellingId, DwellingType, Household, HouseholdId, LandUse, Money,
    SaleId, SaleRecord};

// =============================================================================
// Capability seams
// =============================================================================

/// Produces a willingness-to-pay for one buyer on one dwelling.
///
/// Injected into the engine by composition; the behavioral crate supplies
/// the production implementation. Must be `Sync`: it is called from the
/// parallel choice-set phase against a read-only context.
pub trait BidModel: Sync {
    /// The amount `buyer` offers for `dwelling` at the given asking price.
    ///
    /// Missing land-use data for the dwelling's zone is a fatal
    /// [`MarketError::MissingZoneData`]: a bid without locational context
    /// is unsafe.
    fn bid(
        &self,
        ctx: &SimContext,
        buyer: &Household,
        dwelling: &Dwelling,
        asking: f32,
    ) -> Result<f32>;
}

// =============================================================================
// Outcome
// =============================================================================

/// One completed sale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sale {
    pub buyer: HouseholdId,
    pub dwelling: DwellingId,
    pub price: f32,
    pub date: Date,
}

/// Result of one monthly clear.
#[derive(Debug, Clone, Default)]
pub struct ClearingOutcome {
    /// Sales in resolution order.
    pub sales: Vec<Sale>,
    /// Auction rounds executed.
    pub rounds: u32,
    /// Bids placed during the choice-set phase.
    pub bids_placed: u64,
}

// =============================================================================
// Engine
// =============================================================================

/// A win recorded for a buyer during top-bid extraction.
#[derive(Debug, Clone, Copy)]
struct Win {
    category: u32,
    seller: u32,
    second_price: f32,
}

/// The iterative sealed-bid clearing engine.
#[derive(Debug, Clone)]
pub struct ClearingEngine {
    /// Bids a buyer attempts per eligible category.
    pub choice_set_size: usize,
    /// Cap on auction rounds per month.
    pub max_iterations: u32,
    /// Room-count ceiling for categorization.
    pub max_bedrooms: u32,
    /// Run the parallel phases serially (profiling and tests).
    pub force_sequential: bool,
}

impl ClearingEngine {
    pub fn new(choice_set_size: usize, max_iterations: u32, max_bedrooms: u32) -> Self {
        Self {
            choice_set_size,
            max_iterations,
            max_bedrooms,
            force_sequential: false,
        }
    }

    /// Run one monthly clear.
    ///
    /// Repositories are read-only during the parallel phases; the serial
    /// resolution phase is the only writer and restores the
    /// household ↔ dwelling bijection before returning.
    pub fn clear(
        &self,
        ctx: &mut SimContext,
        buyers: &[Buyer],
        board: &SellerBoard,
        model: &dyn BidModel,
        rng: &mut RngStream,
        now: Date,
    ) -> Result<ClearingOutcome> {
        let mut outcome = ClearingOutcome::default();
        if buyers.is_empty() || board.is_empty() {
            return Ok(outcome);
        }

        outcome.bids_placed = self.build_choice_sets(ctx, buyers, board, model, rng)?;
        board.sort_bids(self.force_sequential);
        debug!(
            "{}: {} buyers, {} sellers, {} bids",
            now,
            buyers.len(),
            board.seller_count(),
            outcome.bids_placed
        );

        self.run_auction(ctx, buyers, board, now, &mut outcome)?;
        Ok(outcome)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Phase 1: choice sets
    // ─────────────────────────────────────────────────────────────────────

    /// Build every buyer's choice set in parallel. Returns total bids
    /// placed; the first failing buyer (in buyer order) aborts the clear.
    fn build_choice_sets(
        &self,
        ctx: &SimContext,
        buyers: &[Buyer],
        board: &SellerBoard,
        model: &dyn BidModel,
        rng: &mut RngStream,
    ) -> Result<u64> {
        if self.choice_set_size == 0 {
            return Ok(0);
        }

        // Substream seeds drawn serially from the month stream, one per
        // buyer, so task scheduling cannot perturb the sample sequences.
        let seeds: Vec<u64> = buyers.iter().map(|_| rng.child_seed() as u64).collect();

        let placed = parallel::map_index(
            buyers.len(),
            |buyer_index| {
                let mut stream = RngStream::from_seed(seeds[buyer_index]);
                self.choice_set_for(ctx, board, model, buyers, buyer_index, &mut stream)
            },
            self.force_sequential,
        );

        // Input order is preserved, so the reported error is deterministic.
        let mut total = 0u64;
        for result in placed {
            total += result?;
        }
        Ok(total)
    }

    /// Bids one buyer places across its eligible categories.
    fn choice_set_for(
        &self,
        ctx: &SimContext,
        board: &SellerBoard,
        model: &dyn BidModel,
        buyers: &[Buyer],
        buyer_index: usize,
        rng: &mut RngStream,
    ) -> Result<u64> {
        let buyer = &buyers[buyer_index];
        let household =
            ctx.households
                .try_get(buyer.household)
                .ok_or(MarketError::IndexOutOfRange {
                    what: "buyer household",
                    index: buyer.household.0 as i64,
                    len: ctx.households.len(),
                })?;
        let own_dwelling = household.dwelling;
        let rooms_band = self.eligible_rooms(ctx.household_size(buyer.household), buyer.wants_larger);

        let mut placed = 0u64;
        for ty in DwellingType::ALL {
            for &rooms in rooms_band.iter() {
                let category = board.category_of(ty, rooms);
                let sellers = board.sellers(category);
                if sellers.is_empty() {
                    continue;
                }

                if sellers.len() < self.choice_set_size {
                    // Thin category: bid on everything, then stop examining
                    // further room sizes within this type.
                    for (seller_index, seller) in sellers.iter().enumerate() {
                        placed += self.try_place_bid(
                            ctx, board, model, household, own_dwelling, category,
                            seller_index, seller, buyer_index,
                        )?;
                    }
                    break;
                }

                // Deep category: random draws, at most 2x attempts.
                let mut accepted = 0usize;
                for _ in 0..(2 * self.choice_set_size) {
                    if accepted >= self.choice_set_size {
                        break;
                    }
                    let seller_index = rng.index(sellers.len());
                    let seller = &sellers[seller_index];
                    accepted += self.try_place_bid(
                        ctx, board, model, household, own_dwelling, category,
                        seller_index, seller, buyer_index,
                    )? as usize;
                }
            }
        }
        Ok(placed)
    }

    /// Compute and insert one bid; returns 1 when the bid was accepted.
    #[allow(clippy::too_many_arguments)]
    fn try_place_bid(
        &self,
        ctx: &SimContext,
        board: &SellerBoard,
        model: &dyn BidModel,
        household: &Household,
        own_dwelling: Option<DwellingId>,
        category: usize,
        seller_index: usize,
        seller: &Seller,
        buyer_index: usize,
    ) -> Result<u64> {
        // A household never bids on the dwelling it is selling.
        if own_dwelling == Some(seller.dwelling) {
            return Ok(0);
        }
        let dwelling =
            ctx.dwellings
                .try_get(seller.dwelling)
                .ok_or(MarketError::IndexOutOfRange {
                    what: "seller dwelling",
                    index: seller.dwelling.0 as i64,
                    len: ctx.dwellings.len(),
                })?;
        let amount = model.bid(ctx, household, dwelling, seller.asking)?;
        if amount < seller.minimum {
            return Ok(0);
        }
        board.bid_list(category, seller_index).lock().push(Bid {
            amount,
            seller: seller_index as i32,
            buyer: buyer_index as i32,
        });
        Ok(1)
    }

    /// Eligible room counts: `[persons-1, persons]`, shifted up by one for
    /// households demanding more space, clamped into `[0, max_bedrooms)`.
    fn eligible_rooms(&self, persons: u32, wants_larger: bool) -> SmallVec<[u32; 2]> {
        let persons = persons as i64;
        let (lo, hi) = if wants_larger {
            (persons, persons + 1)
        } else {
            (persons - 1, persons)
        };
        let ceiling = self.max_bedrooms.saturating_sub(1) as i64;
        let lo = lo.clamp(0, ceiling) as u32;
        let hi = hi.clamp(0, ceiling) as u32;
        let mut band = SmallVec::new();
        band.push(lo);
        if hi != lo {
            band.push(hi);
        }
        band
    }

    // ─────────────────────────────────────────────────────────────────────
    // Phase 2: iterative auction
    // ─────────────────────────────────────────────────────────────────────

    fn run_auction(
        &self,
        ctx: &mut SimContext,
        buyers: &[Buyer],
        board: &SellerBoard,
        now: Date,
        outcome: &mut ClearingOutcome,
    ) -> Result<()> {
        let wins: Vec<Mutex<SmallVec<[Win; 2]>>> =
            buyers.iter().map(|_| Mutex::new(SmallVec::new())).collect();
        let mut resolved = vec![false; buyers.len()];

        for _round in 0..self.max_iterations {
            // Top-bid extraction: parallel over sellers, serial over
            // categories so the wins arrive in fixed category order.
            let fault: Mutex<Option<MarketError>> = Mutex::new(None);
            for category in 0..board.category_count() {
                let seller_count = board.sellers(category).len();
                parallel::for_each_index(
                    seller_count,
                    |seller_index| {
                        let mut list = board.bid_list(category, seller_index).lock();
                        if list.is_empty() {
                            return;
                        }
                        let top = list.remove(0);
                        // Vickrey second price, falling back to the winning
                        // bid when no second bid exists.
                        let second = list.first().map(|b| b.amount).unwrap_or(top.amount);
                        let buyer_index = top.buyer as usize;
                        if buyer_index >= buyers.len() {
                            *fault.lock() = Some(MarketError::IndexOutOfRange {
                                what: "winning buyer",
                                index: top.buyer as i64,
                                len: buyers.len(),
                            });
                            return;
                        }
                        wins[buyer_index].lock().push(Win {
                            category: category as u32,
                            seller: seller_index as u32,
                            second_price: second,
                        });
                    },
                    self.force_sequential,
                );
            }
            if let Some(err) = fault.into_inner() {
                return Err(err);
            }

            // Termination: a round with no wins ends the auction.
            if wins.iter().all(|w| w.lock().is_empty()) {
                break;
            }
            outcome.rounds += 1;

            // Serial resolution: each winning buyer takes exactly one sale.
            resolved.fill(false);
            for (buyer_index, buyer) in buyers.iter().enumerate() {
                let mut buyer_wins = wins[buyer_index].lock();
                if buyer_wins.is_empty() {
                    continue;
                }
                // Best second price; ties prefer the larger seller index,
                // then the larger category index, for a total order.
                let best = *buyer_wins
                    .iter()
                    .max_by(|a, b| {
                        a.second_price
                            .total_cmp(&b.second_price)
                            .then_with(|| a.seller.cmp(&b.seller))
                            .then_with(|| a.category.cmp(&b.category))
                    })
                    .unwrap_or_else(|| unreachable!());
                buyer_wins.clear();

                let seller = board.sellers(best.category as usize)[best.seller as usize];
                let sale = self.finalize_sale(
                    ctx,
                    buyer.household,
                    seller.dwelling,
                    best.second_price,
                    now,
                )?;
                outcome.sales.push(sale);
                // The dwelling is sold; discard its remaining bids.
                board
                    .bid_list(best.category as usize, best.seller as usize)
                    .lock()
                    .clear();
                resolved[buyer_index] = true;
            }

            // Sweep: purge every bid belonging to a buyer who bought this
            // round, from every remaining seller list.
            let resolved_ref = &resolved;
            board.for_each_bid_list(
                |list: &mut BidList| list.retain(|bid| !resolved_ref[bid.buyer as usize]),
                self.force_sequential,
            );
        }
        Ok(())
    }

    /// Transfer a dwelling to its winning buyer at the resolved price.
    ///
    /// Restores the household ↔ dwelling bijection: the seller household
    /// (if the dwelling was its active home) and the buyer's previous
    /// dwelling are both detached before the new link is made.
    fn finalize_sale(
        &self,
        ctx: &mut SimContext,
        buyer: HouseholdId,
        dwelling_id: DwellingId,
        price: f32,
        now: Date,
    ) -> Result<Sale> {
        let (zone, rooms, square_footage, dwelling_type, seller_household) = {
            let dwelling =
                ctx.dwellings
                    .try_get(dwelling_id)
                    .ok_or(MarketError::IndexOutOfRange {
                        what: "sold dwelling",
                        index: dwelling_id.0 as i64,
                        len: ctx.dwellings.len(),
                    })?;
            (
                dwelling.zone,
                dwelling.rooms,
                dwelling.square_footage,
                dwelling.dwelling_type,
                dwelling.household,
            )
        };

        if let Some(seller) = seller_household {
            if let Some(household) = ctx.households.try_get_mut(seller) {
                if household.dwelling == Some(dwelling_id) {
                    household.dwelling = None;
                }
            }
        }
        if let Some(previous) = ctx.households.try_get(buyer).and_then(|h| h.dwelling) {
            if let Some(old) = ctx.dwellings.try_get_mut(previous) {
                if old.household == Some(buyer) {
                    old.household = None;
                }
            }
        }

        let households_len = ctx.households.len();
        let household = ctx
            .households
            .try_get_mut(buyer)
            .ok_or(MarketError::IndexOutOfRange {
                what: "buying household",
                index: buyer.0 as i64,
                len: households_len,
            })?;
        household.dwelling = Some(dwelling_id);

        let dwellings_len = ctx.dwellings.len();
        let dwelling = ctx
            .dwellings
            .try_get_mut(dwelling_id)
            .ok_or(MarketError::IndexOutOfRange {
                what: "sold dwelling",
                index: dwelling_id.0 as i64,
                len: dwellings_len,
            })?;
        dwelling.household = Some(buyer);
        dwelling.value = Money::new(price, now);
        dwelling.listing_date = None;

        // Zone lookups degrade gracefully here: a sale record with zeroed
        // locational fields is better than losing the observation.
        let land = ctx.land_use(zone).unwrap_or(LandUse::ZERO);
        ctx.sales.add_new(SaleRecord {
            id: SaleId(0),
            date: now,
            price,
            rooms,
            square_footage,
            zone,
            dist_subway: ctx.dist_subway(zone),
            dist_regional: ctx.dist_regional(zone),
            residential: land.residential,
            commerce: land.commercial,
            dwelling_type,
        });

        info!("{}: {} sold to {} for ${:.0}", now, dwelling_id, buyer, price);
        Ok(Sale {
            buyer,
            dwelling: dwelling_id,
            price,
            date: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listings::Seller;
    use std::collections::HashMap;
    use types::{Family, FamilyId, LabourForceStatus, Person, PersonId, Sex, Tenure};

    const NOW: Date = Date { year: 1987, month: 4 };

    /// Bid model returning scripted amounts; unknown pairs bid below any
    /// minimum so they are always rejected.
    struct FixedBid(HashMap<(HouseholdId, DwellingId), f32>);

    impl FixedBid {
        fn new(entries: &[(HouseholdId, DwellingId, f32)]) -> Self {
            Self(
                entries
                    .iter()
                    .map(|&(h, d, amount)| ((h, d), amount))
                    .collect(),
            )
        }
    }

    impl BidModel for FixedBid {
        fn bid(
            &self,
            _ctx: &SimContext,
            buyer: &Household,
            dwelling: &Dwelling,
            _asking: f32,
        ) -> Result<f32> {
            Ok(self
                .0
                .get(&(buyer.id, dwelling.id))
                .copied()
                .unwrap_or(-1.0))
        }
    }

    fn add_household(ctx: &mut SimContext, persons: u32) -> HouseholdId {
        let household_id = ctx.households.add_new(Household {
            id: HouseholdId(0),
            families: vec![],
            tenure: Tenure::Own,
            dwelling: None,
        });
        let mut members = Vec::new();
        for _ in 0..persons {
            members.push(ctx.persons.add_new(Person {
                id: PersonId(0),
                age: 30,
                sex: Sex::Female,
                living: true,
                labour_force_status: LabourForceStatus::Employed,
                jobs: vec![],
                family: None,
            }));
        }
        let family_id = ctx.families.add_new(Family {
            id: FamilyId(0),
            persons: members,
            female_head: None,
            savings: 0.0,
            liquid_assets: 0.0,
            household: Some(household_id),
        });
        ctx.households.try_get_mut(household_id).unwrap().families = vec![family_id];
        household_id
    }

    fn add_dwelling(ctx: &mut SimContext, rooms: u32) -> DwellingId {
        ctx.dwellings.add_new(Dwelling {
            id: DwellingId(0),
            exists: true,
            dwelling_type: DwellingType::Detached,
            rooms,
            square_footage: rooms as f32 * 300.0,
            zone: 0,
            value: Money::new(100_000.0, Date::new(1986, 0)),
            household: None,
            listing_date: Some(Date::new(1987, 0)),
        })
    }

    fn board_for(ctx: &SimContext, dwellings: &[DwellingId], asking: f32, minimum: f32) -> SellerBoard {
        let mut board = SellerBoard::new(7);
        for &dwelling in dwellings {
            let d = ctx.dwellings.try_get(dwelling).unwrap();
            board.push_seller(
                d.dwelling_type,
                d.rooms,
                Seller { dwelling, asking, minimum },
            );
        }
        board
    }

    fn engine() -> ClearingEngine {
        let mut engine = ClearingEngine::new(10, 20, 7);
        engine.force_sequential = true;
        engine
    }

    #[test]
    fn test_single_buyer_single_seller_one_round() {
        let mut ctx = SimContext::new();
        let buyer = add_household(&mut ctx, 3);
        let dwelling = add_dwelling(&mut ctx, 3);
        let board = board_for(&ctx, &[dwelling], 150_000.0, 0.0);
        let model = FixedBid::new(&[(buyer, dwelling, 145_500.0)]);
        let buyers = [Buyer { household: buyer, wants_larger: false }];

        let outcome = engine()
            .clear(&mut ctx, &buyers, &board, &model, &mut RngStream::from_seed(1), NOW)
            .unwrap();

        assert_eq!(outcome.rounds, 1);
        assert_eq!(outcome.sales.len(), 1);
        // Sole bid: the second price falls back to the winning bid.
        assert_eq!(outcome.sales[0].price, 145_500.0);
        assert_eq!(outcome.sales[0].buyer, buyer);
        assert_eq!(outcome.sales[0].dwelling, dwelling);

        let d = ctx.dwellings.try_get(dwelling).unwrap();
        assert_eq!(d.household, Some(buyer));
        assert_eq!(d.listing_date, None);
        assert_eq!(d.value.amount, 145_500.0);
        assert_eq!(ctx.households.try_get(buyer).unwrap().dwelling, Some(dwelling));
        assert!(ctx.occupancy_consistent());
        assert_eq!(ctx.sales.len(), 1);
    }

    #[test]
    fn test_second_price_resolution() {
        let mut ctx = SimContext::new();
        let low = add_household(&mut ctx, 3);
        let high = add_household(&mut ctx, 3);
        let dwelling = add_dwelling(&mut ctx, 3);
        let board = board_for(&ctx, &[dwelling], 250_000.0, 0.0);
        let model = FixedBid::new(&[
            (low, dwelling, 180_000.0),
            (high, dwelling, 200_000.0),
        ]);
        let buyers = [
            Buyer { household: low, wants_larger: false },
            Buyer { household: high, wants_larger: false },
        ];

        let outcome = engine()
            .clear(&mut ctx, &buyers, &board, &model, &mut RngStream::from_seed(2), NOW)
            .unwrap();

        // The highest bid wins but pays the second price.
        assert_eq!(outcome.sales.len(), 1);
        assert_eq!(outcome.sales[0].buyer, high);
        assert_eq!(outcome.sales[0].price, 180_000.0);
        // The losing buyer bought nothing.
        assert_eq!(ctx.households.try_get(low).unwrap().dwelling, None);
    }

    #[test]
    fn test_multi_win_takes_larger_seller_index() {
        let mut ctx = SimContext::new();
        let chooser = add_household(&mut ctx, 3);
        let other = add_household(&mut ctx, 3);
        let first = add_dwelling(&mut ctx, 3);
        let second = add_dwelling(&mut ctx, 3);
        let board = board_for(&ctx, &[first, second], 250_000.0, 0.0);
        // `chooser` tops both sellers; both second prices are equal.
        let model = FixedBid::new(&[
            (chooser, first, 200_000.0),
            (chooser, second, 200_000.0),
            (other, first, 175_000.0),
            (other, second, 175_000.0),
        ]);
        let buyers = [
            Buyer { household: chooser, wants_larger: false },
            Buyer { household: other, wants_larger: false },
        ];

        let outcome = engine()
            .clear(&mut ctx, &buyers, &board, &model, &mut RngStream::from_seed(3), NOW)
            .unwrap();

        // Tie on second price resolves to the larger seller index.
        assert_eq!(outcome.sales[0].buyer, chooser);
        assert_eq!(outcome.sales[0].dwelling, second);
        assert_eq!(outcome.sales[0].price, 175_000.0);
        // The untaken seller's list was untouched: the other buyer's bid
        // surfaces next round.
        assert_eq!(outcome.sales.len(), 2);
        assert_eq!(outcome.sales[1].buyer, other);
        assert_eq!(outcome.sales[1].dwelling, first);
        assert_eq!(outcome.rounds, 2);
        assert!(ctx.occupancy_consistent());
    }

    #[test]
    fn test_sweep_removes_resolved_buyers_bids() {
        let mut ctx = SimContext::new();
        let buyers_ids: Vec<HouseholdId> = (0..3).map(|_| add_household(&mut ctx, 3)).collect();
        let dwellings: Vec<DwellingId> = (0..3).map(|_| add_dwelling(&mut ctx, 3)).collect();
        let board = board_for(&ctx, &dwellings, 250_000.0, 0.0);
        // Each buyer tops a distinct seller and places residual bids on the
        // others.
        let model = FixedBid::new(&[
            (buyers_ids[0], dwellings[0], 300_000.0),
            (buyers_ids[0], dwellings[1], 110_000.0),
            (buyers_ids[0], dwellings[2], 110_000.0),
            (buyers_ids[1], dwellings[1], 280_000.0),
            (buyers_ids[1], dwellings[0], 105_000.0),
            (buyers_ids[1], dwellings[2], 105_000.0),
            (buyers_ids[2], dwellings[2], 270_000.0),
            (buyers_ids[2], dwellings[0], 100_000.0),
            (buyers_ids[2], dwellings[1], 100_000.0),
        ]);
        let buyers: Vec<Buyer> = buyers_ids
            .iter()
            .map(|&household| Buyer { household, wants_larger: false })
            .collect();

        let outcome = engine()
            .clear(&mut ctx, &buyers, &board, &model, &mut RngStream::from_seed(4), NOW)
            .unwrap();

        // All three resolve in one round; the sweep leaves nothing behind,
        // so the next round has zero wins and the auction stops.
        assert_eq!(outcome.sales.len(), 3);
        assert_eq!(outcome.rounds, 1);
        let sold: Vec<DwellingId> = outcome.sales.iter().map(|s| s.dwelling).collect();
        assert_eq!(sold, dwellings);
        assert!(ctx.occupancy_consistent());
    }

    #[test]
    fn test_zero_choice_set_size_produces_nothing() {
        let mut ctx = SimContext::new();
        let buyer = add_household(&mut ctx, 3);
        let dwelling = add_dwelling(&mut ctx, 3);
        let board = board_for(&ctx, &[dwelling], 150_000.0, 0.0);
        let model = FixedBid::new(&[(buyer, dwelling, 145_500.0)]);
        let buyers = [Buyer { household: buyer, wants_larger: false }];

        let mut e = engine();
        e.choice_set_size = 0;
        let outcome = e
            .clear(&mut ctx, &buyers, &board, &model, &mut RngStream::from_seed(5), NOW)
            .unwrap();
        assert_eq!(outcome.bids_placed, 0);
        assert!(outcome.sales.is_empty());
        assert_eq!(ctx.sales.len(), 0);
    }

    #[test]
    fn test_zero_iterations_produces_no_sales() {
        let mut ctx = SimContext::new();
        let buyer = add_household(&mut ctx, 3);
        let dwelling = add_dwelling(&mut ctx, 3);
        let board = board_for(&ctx, &[dwelling], 150_000.0, 0.0);
        let model = FixedBid::new(&[(buyer, dwelling, 145_500.0)]);
        let buyers = [Buyer { household: buyer, wants_larger: false }];

        let mut e = engine();
        e.max_iterations = 0;
        let outcome = e
            .clear(&mut ctx, &buyers, &board, &model, &mut RngStream::from_seed(6), NOW)
            .unwrap();
        assert!(outcome.bids_placed > 0);
        assert!(outcome.sales.is_empty());
        // Repositories are untouched without a resolution.
        assert_eq!(ctx.households.try_get(buyer).unwrap().dwelling, None);
        assert_eq!(ctx.sales.len(), 0);
    }

    #[test]
    fn test_bids_below_minimum_are_rejected() {
        let mut ctx = SimContext::new();
        let buyer = add_household(&mut ctx, 3);
        let dwelling = add_dwelling(&mut ctx, 3);
        let board = board_for(&ctx, &[dwelling], 150_000.0, 160_000.0);
        let model = FixedBid::new(&[(buyer, dwelling, 145_500.0)]);
        let buyers = [Buyer { household: buyer, wants_larger: false }];

        let outcome = engine()
            .clear(&mut ctx, &buyers, &board, &model, &mut RngStream::from_seed(7), NOW)
            .unwrap();
        assert_eq!(outcome.bids_placed, 0);
        assert!(outcome.sales.is_empty());
    }

    #[test]
    fn test_empty_market_is_a_no_op() {
        let mut ctx = SimContext::new();
        let buyer = add_household(&mut ctx, 3);
        let board = SellerBoard::new(7);
        let model = FixedBid::new(&[]);
        let buyers = [Buyer { household: buyer, wants_larger: false }];

        // Sellers empty.
        let outcome = engine()
            .clear(&mut ctx, &buyers, &board, &model, &mut RngStream::from_seed(8), NOW)
            .unwrap();
        assert!(outcome.sales.is_empty());

        // Buyers empty.
        let dwelling = add_dwelling(&mut ctx, 3);
        let board = board_for(&ctx, &[dwelling], 150_000.0, 0.0);
        let outcome = engine()
            .clear(&mut ctx, &[], &board, &model, &mut RngStream::from_seed(9), NOW)
            .unwrap();
        assert!(outcome.sales.is_empty());
        assert_eq!(ctx.sales.len(), 0);
        assert!(ctx.occupancy_consistent());
    }

    #[test]
    fn test_seller_household_is_detached_on_sale() {
        let mut ctx = SimContext::new();
        let seller_household = add_household(&mut ctx, 2);
        let buyer = add_household(&mut ctx, 3);
        let dwelling = add_dwelling(&mut ctx, 3);
        ctx.dwellings.try_get_mut(dwelling).unwrap().household = Some(seller_household);
        ctx.households.try_get_mut(seller_household).unwrap().dwelling = Some(dwelling);

        let board = board_for(&ctx, &[dwelling], 150_000.0, 0.0);
        let model = FixedBid::new(&[(buyer, dwelling, 140_000.0)]);
        let buyers = [Buyer { household: buyer, wants_larger: false }];

        engine()
            .clear(&mut ctx, &buyers, &board, &model, &mut RngStream::from_seed(10), NOW)
            .unwrap();

        assert_eq!(ctx.households.try_get(seller_household).unwrap().dwelling, None);
        assert_eq!(ctx.dwellings.try_get(dwelling).unwrap().household, Some(buyer));
        assert!(ctx.occupancy_consistent());
    }
}
