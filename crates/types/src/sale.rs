//! Sale records.
//!
//! The append-only stream of completed sales is the primary exportable
//! artifact of the market and feeds the next month's hedonic refit. Field
//! order is fixed and part of the stable interface.

use crate::date::Date;
use crate::dwelling::DwellingType;
use crate::ids::{Entity, SaleId, ZoneNumber};
use serde::{Deserialize, Serialize};

/// One completed sale, flattened with the dwelling and zone features needed
/// by the hedonic regression so refits never re-resolve entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    /// Repository-assigned ID.
    pub id: SaleId,
    pub date: Date,
    pub price: f32,
    pub rooms: u32,
    pub square_footage: f32,
    pub zone: ZoneNumber,
    pub dist_subway: f32,
    pub dist_regional: f32,
    pub residential: f32,
    pub commerce: f32,
    pub dwelling_type: DwellingType,
}

impl Entity for SaleRecord {
    type Id = SaleId;

    fn id(&self) -> SaleId {
        self.id
    }

    fn set_id(&mut self, id: SaleId) {
        self.id = id;
    }
}
