//! Mobility: which owner-occupier households enter the market this month.
//!
//! Opt-in is a logit over life events (job changes, retirement, a new
//! child) and slow covariates (head age, tenure length, labour-force
//! attachment). The opt-in probability is capped at one half: even a
//! household with every push factor active stays put more often than not
//! within a single month.

use crate::coefficients::MobilityCoefficients;
use sim_core::{RngStream, SimContext};
use types::{Date, Household};

/// Observable inputs to one household's mobility decision.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MobilityInputs {
    pub job_increase: bool,
    pub job_decrease: bool,
    pub retirement: bool,
    pub job_change: bool,
    pub new_child: bool,
    /// Max person age over non-empty member families; 0 when none.
    pub head_age: f64,
    /// Years since the dwelling's value was last stamped.
    pub years_in_dwelling: f64,
    /// Persons holding at least one job.
    pub num_jobs: f64,
    /// Change in the regional birth rate; 0 unless a series is supplied.
    pub birth_rate_change: f64,
}

impl MobilityInputs {
    /// The space-demand counter: job gains and a new child push it up,
    /// job losses push it down.
    pub fn demand_counter(&self) -> i32 {
        self.job_increase as i32 + self.new_child as i32 - self.job_decrease as i32
    }
}

/// A positive opt-in decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptIn {
    /// The household wants a larger dwelling than its size alone implies.
    pub wants_larger: bool,
}

/// The participation model for owner-occupier households.
#[derive(Debug, Clone)]
pub struct MobilityModel {
    pub coefficients: MobilityCoefficients,
    /// Per-month probability of each job/retirement event flag.
    pub event_probability: f64,
    /// Fixed share of households assumed immobile regardless of utility.
    pub non_mover_ratio: f64,
    /// Labour-force participation rate; a configured input rather than a
    /// repository-derived estimate.
    pub labour_force_participation: f64,
}

impl MobilityModel {
    pub fn new(labour_force_participation: f64) -> Self {
        Self {
            coefficients: MobilityCoefficients::default(),
            event_probability: 0.01,
            non_mover_ratio: 0.95,
            labour_force_participation,
        }
    }

    /// Draw the stochastic flags and derive the covariates for one
    /// household.
    pub fn draw_inputs(
        &self,
        ctx: &SimContext,
        household: &Household,
        now: Date,
        birth_rate_change: f64,
        rng: &mut RngStream,
    ) -> MobilityInputs {
        // Event flags first, in fixed order, so covariate derivation never
        // perturbs the draw sequence.
        let job_increase = rng.below(self.event_probability);
        let job_decrease = rng.below(self.event_probability);
        let retirement = rng.below(self.event_probability);
        let job_change = rng.below(self.event_probability);

        let mut new_child = false;
        let mut head_age = 0i32;
        let mut num_jobs = 0u32;
        for family in household
            .families
            .iter()
            .filter_map(|&f| ctx.families.try_get(f))
        {
            for person in family
                .persons
                .iter()
                .filter_map(|&p| ctx.persons.try_get(p))
                .filter(|p| p.living)
            {
                if person.age <= 0 {
                    new_child = true;
                }
                head_age = head_age.max(person.age);
                if person.has_job() {
                    num_jobs += 1;
                }
            }
        }

        let years_in_dwelling = household
            .dwelling
            .and_then(|d| ctx.dwellings.try_get(d))
            .map(|d| (now.months_since(d.value.when).max(0) as f64) / 12.0)
            .unwrap_or(0.0);

        MobilityInputs {
            job_increase,
            job_decrease,
            retirement,
            job_change,
            new_child,
            head_age: head_age as f64,
            years_in_dwelling,
            num_jobs: num_jobs as f64,
            birth_rate_change,
        }
    }

    /// The linear utility of moving, with randomized-coefficient draws.
    pub fn utility(&self, inputs: &MobilityInputs, rng: &mut RngStream) -> f64 {
        let c = &self.coefficients;
        let mut u = c.constant;
        if inputs.job_increase {
            u += c.job_increase.sample(rng);
        }
        if inputs.job_decrease {
            u += c.job_decrease.sample(rng);
        }
        if inputs.retirement {
            u += c.retirement.sample(rng);
        }
        if inputs.job_change {
            u += c.job_change.sample(rng);
        }
        if inputs.new_child {
            u += c.new_child.sample(rng);
        }
        u += c.head_age.sample(rng) * inputs.head_age;
        u += c.birth_rate_change.sample(rng) * inputs.birth_rate_change;
        u += c.years_in_dwelling.sample(rng) * inputs.years_in_dwelling;
        u += c.num_jobs.sample(rng) * inputs.num_jobs;
        u += c.non_mover.sample(rng) * self.non_mover_ratio;
        u += c.labour_force_participation.sample(rng) * self.labour_force_participation;
        u
    }

    /// Opt-in probability: half the logistic of the utility.
    #[inline]
    pub fn opt_in_probability(utility: f64) -> f64 {
        0.5 * logistic(utility)
    }

    /// Full monthly decision for one household. `None` means the household
    /// stays out of the market this month.
    pub fn evaluate(
        &self,
        ctx: &SimContext,
        household: &Household,
        now: Date,
        birth_rate_change: f64,
        rng: &mut RngStream,
    ) -> Option<OptIn> {
        let inputs = self.draw_inputs(ctx, household, now, birth_rate_change, rng);
        let utility = self.utility(&inputs, rng);
        let p = Self::opt_in_probability(utility);
        if rng.uniform() <= p {
            Some(OptIn {
                wants_larger: inputs.demand_counter() > 0,
            })
        } else {
            None
        }
    }
}

#[inline]
fn logistic(u: f64) -> f64 {
    1.0 / (1.0 + (-u).exp())
}
