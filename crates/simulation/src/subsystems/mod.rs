//! Concrete market subsystems wired into the runner.

mod participation;
mod pricing;
mod supply;

pub use participation::ParticipationSubsystem;
pub use pricing::PricingSubsystem;
pub use supply::SupplyGenerator;
