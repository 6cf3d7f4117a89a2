//! The simulation runner: yearly and monthly lifecycle.
//!
//! Per year: empty-population check, yearly construction, twelve monthly
//! ticks, then the yearly summary. Per month: estimator refresh, buyer
//! opt-in, seller gathering, bid-model warm-up, the iterative clear, and
//! carry-over bookkeeping. A shutdown request is honored at the next
//! monthly boundary.
//!
//! Failure surfaces as one line naming the module, the error kind, and the
//! date of the aborted tick.

use crate::config::SimConfig;
use crate::hooks::{HookContext, HookRunner, SimulationHook};
use crate::population;
use crate::subsystems::{ParticipationSubsystem, PricingSubsystem, SupplyGenerator};
use crate::traits::{BuyerSource, SellerSource};
use behavior::{MobilityModel, WillingnessToPay};
use hedonic::AskingPriceModel;
use log::{error, info};
use sim_core::{Buyer, ClearingEngine, MarketError, Result, RngStream, SimContext};
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use types::{Date, DwellingId, HouseholdId};

// =============================================================================
// Statistics
// =============================================================================

/// Rolling counters over a run.
#[derive(Debug, Clone, Default)]
pub struct SimulationStats {
    /// Monthly ticks completed.
    pub months_run: u32,
    /// Sales completed over the whole run.
    pub total_sales: u64,
    /// Bids placed over the whole run.
    pub total_bids: u64,
    /// Buyers active in the last completed month.
    pub buyers_last_month: u32,
    /// Sellers listed in the last completed month.
    pub sellers_last_month: u32,
    /// Sales in the last completed month.
    pub sales_last_month: u32,
    /// Auction rounds in the last completed month.
    pub rounds_last_month: u32,
}

/// One line of the yearly report.
#[derive(Debug, Clone, PartialEq)]
pub struct YearlySummary {
    pub year: i32,
    pub dwellings_sold: u32,
    /// Buyers still carried unmatched at year end.
    pub households_remaining: u32,
    /// Dwellings still listed at year end.
    pub dwellings_remaining: u32,
    pub average_sale_price: f32,
    /// Mean converted salary across employed persons.
    pub average_personal_income: f32,
}

/// A buyer carried across months while unmatched.
#[derive(Debug, Clone, Copy)]
struct CarriedBuyer {
    months_unmatched: u32,
    wants_larger: bool,
}

// =============================================================================
// Simulation
// =============================================================================

/// The top-level simulation value.
pub struct Simulation {
    config: SimConfig,
    ctx: SimContext,
    engine: ClearingEngine,
    pricing: PricingSubsystem,
    participation: ParticipationSubsystem,
    bidding: WillingnessToPay,
    supply: SupplyGenerator,
    hooks: HookRunner,
    stats: SimulationStats,
    summaries: Vec<YearlySummary>,

    /// Unmatched buyers carried into the next month, keyed for
    /// deterministic iteration order.
    carry_buyers: BTreeMap<HouseholdId, CarriedBuyer>,
    /// Unsold listings carried into the next month.
    carry_sellers: BTreeMap<DwellingId, u32>,

    date: Date,
    months_elapsed: u32,
    year_sales: u32,
    year_sale_value: f64,
    shutdown: Arc<AtomicBool>,
}

impl Simulation {
    /// Build a simulation with a synthetic bootstrap population.
    pub fn new(config: SimConfig) -> Self {
        let mut rng = RngStream::from_seed(config.random_seed as u64);
        let ctx = population::build_context(&config, &mut rng);
        Self::from_context(config, ctx)
    }

    /// Build a simulation over an externally constructed context.
    pub fn from_context(config: SimConfig, ctx: SimContext) -> Self {
        let mut engine = ClearingEngine::new(
            config.choice_set_size,
            config.max_iterations,
            config.max_bedrooms,
        );
        engine.force_sequential = config.force_sequential;

        let mut pricing = PricingSubsystem::new(
            AskingPriceModel::new(config.monthly_time_decay, config.sale_window_months),
            config.max_bedrooms,
        );
        pricing.force_sequential = config.force_sequential;

        let mut model = MobilityModel::new(config.labour_force_participation);
        model.non_mover_ratio = config.non_mover_ratio;
        let mut participation = ParticipationSubsystem::new(model);
        participation.force_sequential = config.force_sequential;

        let supply = SupplyGenerator::new(config.new_dwellings_per_year);
        let date = config.start_date();

        Self {
            engine,
            pricing,
            participation,
            bidding: WillingnessToPay::new(),
            supply,
            hooks: HookRunner::new(),
            stats: SimulationStats::default(),
            summaries: Vec::new(),
            carry_buyers: BTreeMap::new(),
            carry_sellers: BTreeMap::new(),
            date,
            months_elapsed: 0,
            year_sales: 0,
            year_sale_value: 0.0,
            shutdown: Arc::new(AtomicBool::new(false)),
            config,
            ctx,
        }
    }

    pub fn add_hook(&mut self, hook: Box<dyn SimulationHook>) {
        self.hooks.add(hook);
    }

    /// Flag checked at every monthly boundary; set from any thread.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        self.shutdown.clone()
    }

    pub fn context(&self) -> &SimContext {
        &self.ctx
    }

    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    pub fn summaries(&self) -> &[YearlySummary] {
        &self.summaries
    }

    pub fn current_date(&self) -> Date {
        self.date
    }

    fn hook_ctx(&self) -> HookContext {
        HookContext {
            date: self.date,
            stats: self.stats.clone(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Run loop
    // ─────────────────────────────────────────────────────────────────────

    /// Run the configured number of years.
    pub fn run(&mut self) -> Result<()> {
        self.hooks.before_first_year(&self.hook_ctx());
        for offset in 0..self.config.years {
            if self.shutdown.load(Ordering::Relaxed) {
                info!("shutdown requested, stopping before {}", self.date);
                break;
            }
            self.run_year(self.config.start_year + offset as i32)?;
        }
        Ok(())
    }

    /// Run one calendar year: construction, twelve monthly clears, summary.
    pub fn run_year(&mut self, year: i32) -> Result<()> {
        self.date = Date::new(year, 0);
        if self.ctx.dwellings.is_empty() {
            return self.fail(MarketError::EmptyPopulation("dwelling"));
        }
        if self.ctx.persons.is_empty() {
            return self.fail(MarketError::EmptyPopulation("person"));
        }
        // Bids cannot be produced without locational context, so a run
        // with no land-use tables at all is misconfigured.
        if self.ctx.land_use.is_empty() {
            return self.fail(MarketError::ConfigMissing("land-use tables"));
        }
        self.hooks.before_year(year, &self.hook_ctx());

        // Construction draws from a stream outside the monthly seed family
        // (months occupy offsets 0..11).
        let mut supply_rng = RngStream::from_seed(
            (year as i64 * self.config.random_seed as i64 + Date::MONTHS_PER_YEAR as i64) as u64,
        );
        self.supply.build_yearly(&mut self.ctx, year, &mut supply_rng);

        for _ in 0..Date::MONTHS_PER_YEAR {
            if self.shutdown.load(Ordering::Relaxed) {
                info!("shutdown requested, stopping before {}", self.date);
                return Ok(());
            }
            self.step_month()?;
        }

        let summary = self.yearly_summary(year)?;
        info!(
            "{}: DwellingsSold={} HouseholdsRemaining={} DwellingsRemaining={} AverageSalePrice={:.0} AveragePersonalIncome={:.0}",
            year,
            summary.dwellings_sold,
            summary.households_remaining,
            summary.dwellings_remaining,
            summary.average_sale_price,
            summary.average_personal_income,
        );
        self.hooks.after_year(&summary, &self.hook_ctx());
        self.summaries.push(summary);
        self.year_sales = 0;
        self.year_sale_value = 0.0;
        Ok(())
    }

    /// Run one monthly tick at the current date, then advance the date.
    pub fn step_month(&mut self) -> Result<()> {
        match self.run_month() {
            Ok(()) => {
                self.date = self.date.next_month();
                Ok(())
            }
            Err(err) => self.fail(err),
        }
    }

    fn run_month(&mut self) -> Result<()> {
        let now = self.date;
        self.hooks.before_month(&self.hook_ctx());
        let mut rng = RngStream::for_month(self.config.random_seed, now);

        // Asking-price refresh and buyer opt-in both complete before any
        // choice set is built; the join below is the phase barrier.
        self.pricing.monthly_tick(&self.ctx, now)?;
        let birth_rate_change = self.config.birth_rate_change_at(self.months_elapsed);
        let fresh = self
            .participation
            .gather_buyers(&self.ctx, now, birth_rate_change, &mut rng);

        // Merge carried buyers behind the fresh opt-ins.
        let mut buyers: Vec<Buyer> = fresh;
        let fresh_ids: HashSet<HouseholdId> = buyers.iter().map(|b| b.household).collect();
        for (&household, carried) in &self.carry_buyers {
            if !fresh_ids.contains(&household) {
                buyers.push(Buyer {
                    household,
                    wants_larger: carried.wants_larger,
                });
            }
        }

        // Every buyer still in the market lists its active dwelling.
        let opted_dwellings: Vec<DwellingId> = buyers
            .iter()
            .filter_map(|b| self.ctx.households.try_get(b.household))
            .filter_map(|h| h.dwelling)
            .collect();
        let carried_sellers: Vec<DwellingId> = self.carry_sellers.keys().copied().collect();
        let board = self.pricing.gather_sellers(
            &mut self.ctx,
            now,
            &opted_dwellings,
            &carried_sellers,
        )?;

        self.bidding.warm_up(&self.ctx, &buyers, now)?;
        let outcome = self.engine.clear(
            &mut self.ctx,
            &buyers,
            &board,
            &self.bidding,
            &mut rng,
            now,
        )?;
        debug_assert!(self.ctx.occupancy_consistent());

        // Counters.
        self.stats.months_run += 1;
        self.stats.total_sales += outcome.sales.len() as u64;
        self.stats.total_bids += outcome.bids_placed;
        self.stats.buyers_last_month = buyers.len() as u32;
        self.stats.sellers_last_month = board.seller_count() as u32;
        self.stats.sales_last_month = outcome.sales.len() as u32;
        self.stats.rounds_last_month = outcome.rounds;
        self.year_sales += outcome.sales.len() as u32;
        self.year_sale_value += outcome.sales.iter().map(|s| s.price as f64).sum::<f64>();

        // Carry-over bookkeeping: unmatched participants persist, and are
        // dropped after the configured number of consecutive misses.
        let bought: HashSet<HouseholdId> = outcome.sales.iter().map(|s| s.buyer).collect();
        let sold: HashSet<DwellingId> = outcome.sales.iter().map(|s| s.dwelling).collect();
        let limit = self.config.carry_limit_months;

        for buyer in &buyers {
            if bought.contains(&buyer.household) {
                self.carry_buyers.remove(&buyer.household);
                continue;
            }
            let entry = self
                .carry_buyers
                .entry(buyer.household)
                .or_insert(CarriedBuyer {
                    months_unmatched: 0,
                    wants_larger: buyer.wants_larger,
                });
            entry.months_unmatched += 1;
        }
        self.carry_buyers
            .retain(|_, carried| carried.months_unmatched < limit);

        let mut delist: Vec<DwellingId> = Vec::new();
        for dwelling in board.listed_dwellings() {
            if sold.contains(&dwelling) {
                self.carry_sellers.remove(&dwelling);
                continue;
            }
            let misses = self.carry_sellers.entry(dwelling).or_insert(0);
            *misses += 1;
            if *misses >= limit {
                delist.push(dwelling);
            }
        }
        for dwelling in delist {
            self.carry_sellers.remove(&dwelling);
            if let Some(d) = self.ctx.dwellings.try_get_mut(dwelling) {
                d.listing_date = None;
            }
        }

        self.hooks.on_sales(&outcome.sales, &self.hook_ctx());
        self.hooks.after_month(&self.hook_ctx());
        self.months_elapsed += 1;
        Ok(())
    }

    fn yearly_summary(&self, year: i32) -> Result<YearlySummary> {
        let december = Date::new(year, Date::MONTHS_PER_YEAR - 1);
        let mut income_sum = 0.0f64;
        let mut employed = 0u32;
        for person in self.ctx.persons.iter().filter(|p| p.has_job()) {
            for job in &person.jobs {
                income_sum += self.ctx.currency.convert(job.salary, december)?.amount as f64;
            }
            employed += 1;
        }
        let average_personal_income = if employed > 0 {
            (income_sum / employed as f64) as f32
        } else {
            0.0
        };
        let average_sale_price = if self.year_sales > 0 {
            (self.year_sale_value / self.year_sales as f64) as f32
        } else {
            0.0
        };
        let dwellings_remaining = self
            .ctx
            .dwellings
            .iter()
            .filter(|d| d.is_listed())
            .count() as u32;

        Ok(YearlySummary {
            year,
            dwellings_sold: self.year_sales,
            households_remaining: self.carry_buyers.len() as u32,
            dwellings_remaining,
            average_sale_price,
            average_personal_income,
        })
    }

    /// Surface a fatal error as the single user-visible line and abort.
    fn fail(&self, err: MarketError) -> Result<()> {
        error!("market: {} at {}", err, self.date);
        Err(err)
    }
}
