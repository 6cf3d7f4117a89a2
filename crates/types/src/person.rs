//! Persons, jobs, and families.
//!
//! Persons belong to families, families to households; all links are typed
//! IDs resolved through repositories. Jobs are owned by the person and carry
//! the salary as a dated [`Money`] so incomes from different hiring years can
//! be compared after currency conversion.

use crate::date::Date;
use crate::ids::{Entity, FamilyId, HouseholdId, PersonId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

// =============================================================================
// Person
// =============================================================================

/// Biological sex, as carried by the source census data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Female,
    Male,
}

/// Labour-force status of a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabourForceStatus {
    Employed,
    Unemployed,
    /// Children, retirees, and others outside the labour force.
    NotApplicable,
}

/// An employment relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// The person holding the job.
    pub owner: PersonId,
    /// When the job started.
    pub start: Date,
    /// Annual salary, denominated at the start date.
    pub salary: Money,
}

/// A simulated person.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    /// Repository-assigned ID.
    pub id: PersonId,
    /// Age in whole years; 0 or below means born this simulation year.
    pub age: i32,
    pub sex: Sex,
    /// False once the person has logically left the simulation.
    pub living: bool,
    pub labour_force_status: LabourForceStatus,
    /// Jobs in acquisition order.
    pub jobs: Vec<Job>,
    /// Back-reference to the containing family.
    pub family: Option<FamilyId>,
}

impl Person {
    /// True when the person holds at least one job.
    #[inline]
    pub fn has_job(&self) -> bool {
        !self.jobs.is_empty()
    }
}

impl Entity for Person {
    type Id = PersonId;

    fn id(&self) -> PersonId {
        self.id
    }

    fn set_id(&mut self, id: PersonId) {
        self.id = id;
    }
}

// =============================================================================
// Family
// =============================================================================

/// A family unit inside a household.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Family {
    /// Repository-assigned ID.
    pub id: FamilyId,
    /// Member persons in insertion order.
    pub persons: Vec<PersonId>,
    /// The female head, when one exists.
    pub female_head: Option<PersonId>,
    /// Long-term savings.
    pub savings: f32,
    /// Assets available for a down payment on short notice.
    pub liquid_assets: f32,
    /// Back-reference to the containing household.
    pub household: Option<HouseholdId>,
}

impl Family {
    /// Number of member persons.
    #[inline]
    pub fn size(&self) -> usize {
        self.persons.len()
    }
}

impl Entity for Family {
    type Id = FamilyId;

    fn id(&self) -> FamilyId {
        self.id
    }

    fn set_id(&mut self, id: FamilyId) {
        self.id = id;
    }
}
