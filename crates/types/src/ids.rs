//! Core identifier types for the housing-market simulation.
//!
//! Every persistent entity carries a unique 64-bit ID assigned on insertion
//! into its repository. IDs are stable for an entity's lifetime and are the
//! only legal way to reference an entity across module boundaries — cyclic
//! relationships (person ↔ family ↔ household ↔ dwelling) are expressed as
//! IDs and resolved through repositories at use sites.

use derive_more::{From, Into};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Entity trait
// =============================================================================

/// Implemented by every repository-managed entity.
///
/// `set_id` is called exactly once, by the repository, on insertion.
pub trait Entity {
    /// The typed ID for this entity kind.
    type Id: Copy + Eq + From<u64> + Into<u64>;

    /// This entity's ID.
    fn id(&self) -> Self::Id;

    /// Store the repository-assigned ID back into the entity.
    fn set_id(&mut self, id: Self::Id);
}

// =============================================================================
// Core ID Types
// =============================================================================

/// Unique identifier for a person.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    From,
    Into,
)]
pub struct PersonId(pub u64);

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Person#{}", self.0)
    }
}

/// Unique identifier for a family.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    From,
    Into,
)]
pub struct FamilyId(pub u64);

impl fmt::Display for FamilyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Family#{}", self.0)
    }
}

/// Unique identifier for a household.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    From,
    Into,
)]
pub struct HouseholdId(pub u64);

impl fmt::Display for HouseholdId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Household#{}", self.0)
    }
}

/// Unique identifier for a dwelling.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    From,
    Into,
)]
pub struct DwellingId(pub u64);

impl fmt::Display for DwellingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dwelling#{}", self.0)
    }
}

/// Unique identifier for a sale record.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    From,
    Into,
)]
pub struct SaleId(pub u64);

impl fmt::Display for SaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sale#{}", self.0)
    }
}

// =============================================================================
// Zone Type
// =============================================================================

/// External zone number, as published by the zone system.
pub type ZoneNumber = u32;
