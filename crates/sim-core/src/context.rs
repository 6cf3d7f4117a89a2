//! The simulation context: every repository and collaborator in one value.
//!
//! There is no ambient global state; the context is built once at startup
//! and threaded explicitly to every component. During a monthly clear it is
//! read-only for the parallel phases; the dwelling, household, and
//! sale-record repositories accept writes only from the serial resolution
//! phase.

use crate::currency::Currency;
use crate::error::Result;
use crate::repository::Repository;
use crate::zones::ZoneSystem;
use std::collections::HashMap;
use types::{
    Date, Dwelling, Family, Household, HouseholdId, LandUse, Person, SaleRecord, ZoneNumber,
};

/// All persistent simulation state and the collaborators the market needs.
#[derive(Debug, Default)]
pub struct SimContext {
    pub persons: Repository<Person>,
    pub families: Repository<Family>,
    pub households: Repository<Household>,
    pub dwellings: Repository<Dwelling>,
    /// Append-only; ordered by insertion, queried by month window.
    pub sales: Repository<SaleRecord>,

    pub zones: ZoneSystem,
    /// Land-use shares per external zone number.
    pub land_use: HashMap<ZoneNumber, LandUse>,
    /// Distance to the nearest subway station, per zone.
    pub dist_subway: HashMap<ZoneNumber, f32>,
    /// Distance to the nearest regional transit station, per zone.
    pub dist_regional: HashMap<ZoneNumber, f32>,

    pub currency: Currency,
}

impl SimContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Land-use shares for a zone, if known.
    #[inline]
    pub fn land_use(&self, zone: ZoneNumber) -> Option<LandUse> {
        self.land_use.get(&zone).copied()
    }

    /// Subway distance for a zone, defaulting to 0 when unknown.
    #[inline]
    pub fn dist_subway(&self, zone: ZoneNumber) -> f32 {
        self.dist_subway.get(&zone).copied().unwrap_or(0.0)
    }

    /// Regional-transit distance for a zone, defaulting to 0 when unknown.
    #[inline]
    pub fn dist_regional(&self, zone: ZoneNumber) -> f32 {
        self.dist_regional.get(&zone).copied().unwrap_or(0.0)
    }

    /// Persons contained in a household: the sum of its family sizes.
    pub fn household_size(&self, id: HouseholdId) -> u32 {
        let Some(household) = self.households.try_get(id) else {
            return 0;
        };
        household
            .families
            .iter()
            .filter_map(|&f| self.families.try_get(f))
            .map(|family| family.size() as u32)
            .sum()
    }

    /// Annual household income: every job of every person in every member
    /// family, currency-converted to `now` and summed.
    pub fn household_income(&self, id: HouseholdId, now: Date) -> Result<f64> {
        let Some(household) = self.households.try_get(id) else {
            return Ok(0.0);
        };
        let mut income = 0.0f64;
        for &family_id in &household.families {
            let Some(family) = self.families.try_get(family_id) else {
                continue;
            };
            for &person_id in &family.persons {
                let Some(person) = self.persons.try_get(person_id) else {
                    continue;
                };
                for job in &person.jobs {
                    income += self.currency.convert(job.salary, now)?.amount as f64;
                }
            }
        }
        Ok(income)
    }

    /// Household savings available for a purchase: the sum of member
    /// families' liquid assets.
    pub fn household_savings(&self, id: HouseholdId) -> f64 {
        let Some(household) = self.households.try_get(id) else {
            return 0.0;
        };
        household
            .families
            .iter()
            .filter_map(|&f| self.families.try_get(f))
            .map(|family| family.liquid_assets as f64)
            .sum()
    }

    /// Check the household ↔ dwelling bijection: every occupied dwelling's
    /// household points back at it, and every housed household's dwelling
    /// points back at it. Used by tests and debug assertions.
    pub fn occupancy_consistent(&self) -> bool {
        let dwellings_ok = self.dwellings.iter().all(|d| match d.household {
            Some(h) => self
                .households
                .try_get(h)
                .is_some_and(|household| household.dwelling == Some(d.id)),
            None => true,
        });
        let households_ok = self.households.iter().all(|h| match h.dwelling {
            Some(d) => self
                .dwellings
                .try_get(d)
                .is_some_and(|dwelling| dwelling.household == Some(h.id)),
            None => true,
        });
        dwellings_ok && households_ok
    }
}
