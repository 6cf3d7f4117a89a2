//! Hedonic asking-price estimation.
//!
//! One coefficient vector per dwelling type over the feature vector
//! `(1, rooms, square footage, subway distance, regional distance,
//! residential share, commercial share)`, refit every month from the
//! recent sale-record window and applied with a multiplicative
//! time-on-market decay.

use crate::solver;
use log::{debug, info};
use sim_core::{Result, SimContext};
use std::collections::HashMap;
use types::{Date, Dwelling, DwellingType, LandUse, SaleRecord, ZoneNumber};

/// Length of the hedonic feature vector.
pub const FEATURE_COUNT: usize = 7;

/// Seed coefficients used for every type until its first successful refit.
///
/// Calibration data: with the synthetic population's room/footage scales
/// these produce asking prices in the high five to low six figures, the
/// range the supply generator's base values sit in.
const DEFAULT_BETA: [f64; FEATURE_COUNT] = [
    15_000.0, // intercept
    8_500.0,  // per room
    45.0,     // per square foot
    -180.0,   // per unit of subway distance
    -90.0,    // per unit of regional-transit distance
    12_000.0, // residential share
    6_000.0,  // commercial share
];

/// Per-type hedonic price model with monthly refits.
#[derive(Debug, Clone)]
pub struct AskingPriceModel {
    /// Multiplicative decay of the asking price per month on market.
    decay: f64,
    /// Width of the sale-record refit window, in months.
    window_months: i32,
    betas: [[f64; FEATURE_COUNT]; DwellingType::COUNT],
    zone_average_value: HashMap<ZoneNumber, f32>,
}

impl AskingPriceModel {
    pub fn new(decay: f64, window_months: i32) -> Self {
        Self {
            decay,
            window_months,
            betas: [DEFAULT_BETA; DwellingType::COUNT],
            zone_average_value: HashMap::new(),
        }
    }

    /// Coefficients currently in force for a dwelling type.
    pub fn coefficients(&self, ty: DwellingType) -> &[f64; FEATURE_COUNT] {
        &self.betas[ty.index()]
    }

    /// Average converted dwelling value in a zone, from the last tick.
    pub fn zone_average_value(&self, zone: ZoneNumber) -> Option<f32> {
        self.zone_average_value.get(&zone).copied()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Monthly tick
    // ─────────────────────────────────────────────────────────────────────

    /// Refresh the zone value cache and refit coefficients from the recent
    /// sale window. Runs before bid generation each month.
    ///
    /// A failed refit (empty window, non-positive-definite normal matrix)
    /// keeps the previous coefficients; currency failures propagate.
    pub fn monthly_tick(&mut self, ctx: &SimContext, now: Date) -> Result<()> {
        self.rebuild_zone_averages(ctx, now)?;
        self.refit(ctx, now);

        if now.is_quarter_end() {
            for ty in DwellingType::ALL {
                info!(
                    "{}: hedonic coefficients for {}: {:?}",
                    now,
                    ty,
                    self.betas[ty.index()]
                );
            }
        }
        Ok(())
    }

    fn rebuild_zone_averages(&mut self, ctx: &SimContext, now: Date) -> Result<()> {
        self.zone_average_value.clear();
        let mut sums: HashMap<ZoneNumber, (f64, u32)> = HashMap::new();
        for dwelling in ctx.dwellings.iter().filter(|d| d.exists) {
            let value = ctx.currency.convert(dwelling.value, now)?;
            let entry = sums.entry(dwelling.zone).or_insert((0.0, 0));
            entry.0 += value.amount as f64;
            entry.1 += 1;
        }
        self.zone_average_value = sums
            .into_iter()
            .map(|(zone, (sum, count))| (zone, (sum / count as f64) as f32))
            .collect();
        Ok(())
    }

    /// Refit per-type coefficients from sales in `[now - window, now)`.
    fn refit(&mut self, ctx: &SimContext, now: Date) {
        let hi = now.months_since_epoch();
        let lo = hi - self.window_months;
        let window: Vec<&SaleRecord> = ctx
            .sales
            .iter()
            .filter(|record| {
                let month = record.date.months_since_epoch();
                month >= lo && month < hi
            })
            .collect();
        if window.is_empty() {
            debug!("{}: no sales in refit window, coefficients kept", now);
            return;
        }

        for ty in DwellingType::ALL {
            let n = FEATURE_COUNT;
            let mut xtx = vec![0.0f64; n * n];
            let mut xty = vec![0.0f64; n];
            let mut count = 0u32;
            for record in window.iter().filter(|r| r.dwelling_type == ty) {
                let x = features_of_record(record);
                solver::add_outer_product(&mut xtx, n, &x, 1.0);
                solver::add_scaled_vector(&mut xty, &x, record.price as f64);
                count += 1;
            }
            if count == 0 {
                continue;
            }
            match solver::solve_ridge(&xtx, &xty, n) {
                Ok(beta) => {
                    self.betas[ty.index()].copy_from_slice(&beta);
                }
                Err(err) => {
                    debug!(
                        "{}: refit for {} failed ({}), coefficients kept",
                        now, ty, err
                    );
                }
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Price query
    // ─────────────────────────────────────────────────────────────────────

    /// Asking price and minimum bid for a dwelling.
    ///
    /// The raw hedonic price decays by `decay^months_on_market`. The
    /// minimum bid is 0; a floor, when wanted, is set on the seller entry
    /// by downstream logic.
    pub fn price(&self, ctx: &SimContext, dwelling: &Dwelling, now: Date) -> (f32, f32) {
        let x = features_of_dwelling(ctx, dwelling);
        let beta = &self.betas[dwelling.dwelling_type.index()];
        let raw: f64 = beta.iter().zip(&x).map(|(b, f)| b * f).sum();
        let ask = raw * self.decay.powi(dwelling.months_on_market(now));
        (ask as f32, 0.0)
    }
}

/// Feature vector of a live dwelling; missing land use degrades to zero
/// shares.
fn features_of_dwelling(ctx: &SimContext, dwelling: &Dwelling) -> [f64; FEATURE_COUNT] {
    let land = ctx.land_use(dwelling.zone).unwrap_or(LandUse::ZERO);
    [
        1.0,
        dwelling.rooms as f64,
        dwelling.square_footage as f64,
        ctx.dist_subway(dwelling.zone) as f64,
        ctx.dist_regional(dwelling.zone) as f64,
        land.residential as f64,
        land.commercial as f64,
    ]
}

/// Feature vector of a sale record (features were flattened at sale time).
fn features_of_record(record: &SaleRecord) -> [f64; FEATURE_COUNT] {
    [
        1.0,
        record.rooms as f64,
        record.square_footage as f64,
        record.dist_subway as f64,
        record.dist_regional as f64,
        record.residential as f64,
        record.commerce as f64,
    ]
}
