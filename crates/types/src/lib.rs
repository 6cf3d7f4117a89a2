//! Shared entity and value types for the housing-market simulation.
//!
//! This crate is dependency-light by design: it defines the data model —
//! dates, dated money, typed IDs, persons/families/households/dwellings,
//! land use, and sale records — and nothing about behavior. The cyclic
//! person ↔ family ↔ household ↔ dwelling graph is expressed entirely as
//! typed IDs; the `sim-core` repositories own the entities and resolve the
//! links.

mod date;
mod dwelling;
mod household;
mod ids;
mod money;
mod person;
mod sale;
mod zone;

pub use date::Date;
pub use dwelling::{Dwelling, DwellingType};
pub use household::{Household, Tenure};
pub use ids::{DwellingId, Entity, FamilyId, HouseholdId, PersonId, SaleId, ZoneNumber};
pub use money::Money;
pub use person::{Family, Job, LabourForceStatus, Person, Sex};
pub use sale::SaleRecord;
pub use zone::LandUse;
