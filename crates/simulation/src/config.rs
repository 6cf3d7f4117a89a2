//! Master configuration for a simulation run.

use types::Date;

/// Every knob of the housing market and its collaborators, with calibrated
/// defaults. Builder-style setters cover the values scenarios usually
/// touch; everything is a plain public field for the rest.
#[derive(Debug, Clone)]
pub struct SimConfig {
    // ─────────────────────────────────────────────────────────────────────
    // Market Clearing
    // ─────────────────────────────────────────────────────────────────────
    /// Cap on auction rounds per month.
    pub max_iterations: u32,
    /// Bids a buyer attempts per eligible category.
    pub choice_set_size: usize,
    /// Room-count ceiling for categorization; rooms clamp into
    /// `[0, max_bedrooms)`.
    pub max_bedrooms: u32,
    /// Multiplicative decay of the asking price per month on market.
    pub monthly_time_decay: f64,
    /// Root seed; the seed of month m in year y is `y * random_seed + m`.
    pub random_seed: u32,
    /// Width of the sale-record window feeding the hedonic refit.
    pub sale_window_months: i32,
    /// Consecutive unmatched months before a carried buyer or seller is
    /// dropped from the market.
    pub carry_limit_months: u32,

    // ─────────────────────────────────────────────────────────────────────
    // Supply
    // ─────────────────────────────────────────────────────────────────────
    /// Dwellings constructed once per year, before the first monthly clear.
    pub new_dwellings_per_year: u32,

    // ─────────────────────────────────────────────────────────────────────
    // Behavior
    // ─────────────────────────────────────────────────────────────────────
    /// Labour-force participation rate fed to the mobility logit. A
    /// configured input; the repository-derived estimator is deliberately
    /// not computed.
    pub labour_force_participation: f64,
    /// Fixed share of households assumed immobile.
    pub non_mover_ratio: f64,
    /// Change in the regional birth rate per simulation month (indexed
    /// from the first month of the run); empty means zero throughout.
    pub birth_rate_change: Vec<f32>,

    // ─────────────────────────────────────────────────────────────────────
    // Demographic Collaborators
    // ─────────────────────────────────────────────────────────────────────
    /// Probability an adult holds a job at bootstrap.
    pub hiring_probability: f64,
    /// Mean annual salary at bootstrap.
    pub average_salary: f32,
    /// Salary standard deviation at bootstrap.
    pub salary_std_dev: f32,

    // ─────────────────────────────────────────────────────────────────────
    // Bootstrap Population
    // ─────────────────────────────────────────────────────────────────────
    pub num_households: usize,
    pub num_initial_dwellings: usize,
    /// Monthly inflation rate for the generated index; `None` disables
    /// currency conversion (identity passthrough).
    pub monthly_inflation: Option<f64>,

    // ─────────────────────────────────────────────────────────────────────
    // Run Control
    // ─────────────────────────────────────────────────────────────────────
    pub start_year: i32,
    pub years: u32,
    /// Run the parallel phases serially.
    pub force_sequential: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_iterations: 20,
            choice_set_size: 10,
            max_bedrooms: 7,
            monthly_time_decay: 0.95,
            random_seed: 20_011,
            sale_window_months: 3,
            carry_limit_months: 3,
            new_dwellings_per_year: 60,
            labour_force_participation: 0.658,
            non_mover_ratio: 0.95,
            birth_rate_change: Vec::new(),
            hiring_probability: 0.65,
            average_salary: 32_000.0,
            salary_std_dev: 9_000.0,
            num_households: 2_000,
            num_initial_dwellings: 2_400,
            monthly_inflation: None,
            start_year: 1986,
            years: 5,
            force_sequential: false,
        }
    }
}

impl SimConfig {
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Builder-style setters
    // ─────────────────────────────────────────────────────────────────────

    pub fn seed(mut self, seed: u32) -> Self {
        self.random_seed = seed;
        self
    }

    pub fn years(mut self, years: u32) -> Self {
        self.years = years;
        self
    }

    pub fn start_year(mut self, year: i32) -> Self {
        self.start_year = year;
        self
    }

    pub fn households(mut self, count: usize) -> Self {
        self.num_households = count;
        self
    }

    pub fn dwellings(mut self, count: usize) -> Self {
        self.num_initial_dwellings = count;
        self
    }

    pub fn choice_set(mut self, size: usize) -> Self {
        self.choice_set_size = size;
        self
    }

    pub fn iterations(mut self, cap: u32) -> Self {
        self.max_iterations = cap;
        self
    }

    pub fn decay(mut self, decay: f64) -> Self {
        self.monthly_time_decay = decay;
        self
    }

    pub fn supply_rate(mut self, per_year: u32) -> Self {
        self.new_dwellings_per_year = per_year;
        self
    }

    pub fn inflation(mut self, monthly: f64) -> Self {
        self.monthly_inflation = Some(monthly);
        self
    }

    pub fn sequential(mut self) -> Self {
        self.force_sequential = true;
        self
    }

    // ─────────────────────────────────────────────────────────────────────
    // Computed Properties
    // ─────────────────────────────────────────────────────────────────────

    /// First month of the run.
    pub fn start_date(&self) -> Date {
        Date::new(self.start_year, 0)
    }

    /// Total monthly ticks over the whole run.
    pub fn total_months(&self) -> u32 {
        self.years * Date::MONTHS_PER_YEAR
    }

    /// Birth-rate change for the n-th month of the run (0 when no series
    /// is supplied).
    pub fn birth_rate_change_at(&self, month_index: u32) -> f64 {
        self.birth_rate_change
            .get(month_index as usize)
            .copied()
            .unwrap_or(0.0) as f64
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Preset Configurations
// ─────────────────────────────────────────────────────────────────────────────

impl SimConfig {
    /// Quick demo: a small town, two years, serial execution.
    pub fn demo() -> Self {
        Self::default()
            .households(250)
            .dwellings(300)
            .supply_rate(12)
            .years(2)
            .sequential()
    }

    /// Stress test: a metro-scale population over a decade.
    pub fn stress_test() -> Self {
        Self::default()
            .households(40_000)
            .dwellings(48_000)
            .supply_rate(1_200)
            .years(10)
    }

    /// Tight market: little vacancy and no construction.
    pub fn tight_market() -> Self {
        Self::default()
            .households(2_000)
            .dwellings(2_050)
            .supply_rate(0)
    }
}
