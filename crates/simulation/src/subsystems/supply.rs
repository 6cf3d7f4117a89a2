//! Yearly dwelling construction.
//!
//! Runs once per year before the first monthly clear. Types follow the
//! construction-mix distribution, rooms a type-dependent uniform range,
//! and the initial value the calibration line anchored at 1986. New
//! dwellings enter vacant and unlisted; the pricing subsystem lists them
//! at the next monthly clear.

use log::info;
use sim_core::{RngStream, SimContext};
use types::{Date, Dwelling, DwellingId, DwellingType, Money};

/// Share thresholds of the construction mix, cumulative over
/// `DwellingType::ALL` order (0.40 / 0.20 / 0.20 / 0.15 / 0.05).
const TYPE_MIX: [f64; 4] = [0.40, 0.60, 0.80, 0.95];

/// Inclusive room ranges per dwelling type, in `DwellingType::ALL` order.
const ROOM_RANGES: [(u32, u32); DwellingType::COUNT] =
    [(3, 7), (2, 6), (2, 5), (1, 4), (0, 3)];

/// Builds the yearly batch of new dwellings.
pub struct SupplyGenerator {
    pub per_year: u32,
}

impl SupplyGenerator {
    pub fn new(per_year: u32) -> Self {
        Self { per_year }
    }

    /// Sample a dwelling type from the construction mix.
    fn sample_type(rng: &mut RngStream) -> DwellingType {
        let u = rng.uniform();
        let index = TYPE_MIX.iter().position(|&t| u < t).unwrap_or(TYPE_MIX.len());
        DwellingType::ALL[index]
    }

    /// Construct this year's dwellings. Returns the IDs inserted.
    pub fn build_yearly(
        &self,
        ctx: &mut SimContext,
        year: i32,
        rng: &mut RngStream,
    ) -> Vec<DwellingId> {
        let value = 87_000.0 + 50_000.0 * (year - 1986).max(0) as f32;
        let stamped = Date::new(year, 0);

        let mut built = Vec::with_capacity(self.per_year as usize);
        for _ in 0..self.per_year {
            let dwelling_type = Self::sample_type(rng);
            let (lo, hi) = ROOM_RANGES[dwelling_type.index()];
            let rooms = rng.range_u32(lo, hi);
            let square_footage = rng.range_f32(rooms as f32 * 200.0, rooms as f32 * 400.0);
            let zone = rng.range_u32(0, 4);
            built.push(ctx.dwellings.add_new(Dwelling {
                id: DwellingId(0),
                exists: true,
                dwelling_type,
                rooms,
                square_footage,
                zone,
                value: Money::new(value, stamped),
                household: None,
                listing_date: None,
            }));
        }
        if !built.is_empty() {
            info!("{}: constructed {} dwellings", year, built.len());
        }
        built
    }
}
