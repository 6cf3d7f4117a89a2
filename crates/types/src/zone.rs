//! Per-zone attributes.

use serde::{Deserialize, Serialize};

/// Land-use composition of a zone, as shares in `[0, 1]`.
///
/// Shares are not required to sum to one; the source tables carry
/// independent coverage fractions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct LandUse {
    pub residential: f32,
    pub commercial: f32,
    pub open: f32,
    pub industrial: f32,
}

impl LandUse {
    /// All-zero shares, used when a zone has no land-use data and the
    /// consumer is allowed to degrade gracefully.
    pub const ZERO: LandUse = LandUse {
        residential: 0.0,
        commercial: 0.0,
        open: 0.0,
        industrial: 0.0,
    };

    pub fn new(residential: f32, commercial: f32, open: f32, industrial: f32) -> Self {
        Self {
            residential,
            commercial,
            open,
            industrial,
        }
    }
}
