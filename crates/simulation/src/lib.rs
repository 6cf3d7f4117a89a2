//! Simulation crate: the scheduler loop for the housing market.
//!
//! Coordinates one run of the monthly-clearing market:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                  Simulation.run_year()               │
//! │                                                      │
//! │  EmptyPopulation check                               │
//! │  yearly construction (SupplyGenerator)               │
//! │  12 x step_month():                                  │
//! │    1. estimator refresh  ∥  buyer opt-in   (barrier) │
//! │    2. seller gathering + asking prices               │
//! │    3. bid-model warm-up (income cache)               │
//! │    4. iterative sealed-bid clear (sim-core)          │
//! │    5. carry-over bookkeeping, hooks                  │
//! │  yearly summary line                                 │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! Lifecycle observers register through [`SimulationHook`]; the
//! [`SaleLogDrain`] hook forwards sales to a logging thread over a bounded
//! channel. With the `parallel` feature the opt-in, pricing, choice-set,
//! sort, extraction, and sweep phases run on rayon; determinism is
//! independent of scheduling either way.

pub mod hooks;
pub mod population;
pub mod subsystems;
pub mod traits;

mod config;
mod runner;

pub use config::SimConfig;
pub use hooks::{HookContext, HookRunner, SaleLogDrain, SimulationHook};
pub use runner::{Simulation, SimulationStats, YearlySummary};
