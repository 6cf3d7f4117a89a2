//! Households and tenure.

use crate::ids::{DwellingId, Entity, FamilyId, HouseholdId};
use serde::{Deserialize, Serialize};

/// How a household holds its dwelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tenure {
    Own,
    Rent,
    Other,
}

/// A household: one or more families sharing a dwelling.
///
/// `dwelling` and the dwelling's `household` field form a bijection — for
/// any dwelling D and household H, `D.household == Some(H)` iff
/// `H.dwelling == Some(D)`. The market engine's sale resolution is the only
/// code allowed to break this temporarily, and restores it before
/// returning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Household {
    /// Repository-assigned ID.
    pub id: HouseholdId,
    /// Member families in insertion order.
    pub families: Vec<FamilyId>,
    pub tenure: Tenure,
    /// The dwelling this household currently occupies.
    pub dwelling: Option<DwellingId>,
}

impl Household {
    /// True for households that own and occupy a dwelling.
    #[inline]
    pub fn is_owner_occupier(&self) -> bool {
        self.tenure == Tenure::Own && self.dwelling.is_some()
    }
}

impl Entity for Household {
    type Id = HouseholdId;

    fn id(&self) -> HouseholdId {
        self.id
    }

    fn set_id(&mut self, id: HouseholdId) {
        self.id = id;
    }
}
