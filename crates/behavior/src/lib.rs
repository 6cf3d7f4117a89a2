//! Household behavior models.
//!
//! Two decisions live here: whether an owner-occupier household enters the
//! market this month ([`MobilityModel`]), and how much a buyer household
//! offers for a particular dwelling ([`WillingnessToPay`], the production
//! [`sim_core::BidModel`]). Both are pure over a read-only context plus an
//! explicit random substream, so the runner can evaluate them from
//! parallel phases.

mod bidding;
mod coefficients;
mod participation;

pub use bidding::WillingnessToPay;
pub use coefficients::{Coefficient, MobilityCoefficients};
pub use participation::{MobilityInputs, MobilityModel, OptIn};
