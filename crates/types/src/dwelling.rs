//! Dwellings and their structural attributes.

use crate::date::Date;
use crate::ids::{DwellingId, Entity, HouseholdId, ZoneNumber};
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Dwelling Type
// =============================================================================

/// Structural category of a dwelling.
///
/// The market partitions sellers by `(type, rooms)`, so the discriminant
/// order here is load-bearing: it fixes the category iteration order of the
/// clearing engine and hence the deterministic ordering of sales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DwellingType {
    Detached,
    SemiDetached,
    Attached,
    ApartmentLow,
    ApartmentHigh,
}

impl DwellingType {
    /// Number of dwelling types.
    pub const COUNT: usize = 5;

    /// All types in category order.
    pub const ALL: [DwellingType; Self::COUNT] = [
        DwellingType::Detached,
        DwellingType::SemiDetached,
        DwellingType::Attached,
        DwellingType::ApartmentLow,
        DwellingType::ApartmentHigh,
    ];

    /// Dense index in `0..COUNT`, matching [`Self::ALL`] order.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            DwellingType::Detached => 0,
            DwellingType::SemiDetached => 1,
            DwellingType::Attached => 2,
            DwellingType::ApartmentLow => 3,
            DwellingType::ApartmentHigh => 4,
        }
    }

    /// Inverse of [`Self::index`]. Panics on an out-of-range index.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index]
    }
}

impl fmt::Display for DwellingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DwellingType::Detached => "detached",
            DwellingType::SemiDetached => "semi-detached",
            DwellingType::Attached => "attached",
            DwellingType::ApartmentLow => "low-rise apartment",
            DwellingType::ApartmentHigh => "high-rise apartment",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Dwelling
// =============================================================================

/// A dwelling unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dwelling {
    /// Repository-assigned ID.
    pub id: DwellingId,
    /// False once demolished; non-existent dwellings never enter the market.
    pub exists: bool,
    pub dwelling_type: DwellingType,
    /// Room count (uncapped here; the market clamps into its category range).
    pub rooms: u32,
    pub square_footage: f32,
    /// External zone number.
    pub zone: ZoneNumber,
    /// Last transacted or assessed value, denominated at its date.
    pub value: Money,
    /// The household currently occupying this dwelling.
    pub household: Option<HouseholdId>,
    /// Set while the dwelling is on the market. Unsold dwellings keep their
    /// listing date across months; a sale resets it to `None`.
    pub listing_date: Option<Date>,
}

impl Dwelling {
    /// Whole months this dwelling has been listed as of `now` (0 when not
    /// listed or listed this month).
    #[inline]
    pub fn months_on_market(&self, now: Date) -> i32 {
        self.listing_date
            .map(|listed| now.months_since(listed).max(0))
            .unwrap_or(0)
    }

    /// True while the dwelling is listed for sale.
    #[inline]
    pub fn is_listed(&self) -> bool {
        self.listing_date.is_some()
    }
}

impl Entity for Dwelling {
    type Id = DwellingId;

    fn id(&self) -> DwellingId {
        self.id
    }

    fn set_id(&mut self, id: DwellingId) {
        self.id = id;
    }
}
