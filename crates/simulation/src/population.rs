//! Synthetic population bootstrap.
//!
//! Builds the initial repositories, zone tables, and currency index from a
//! [`SimConfig`] and the root random stream. The demo binary and the
//! end-to-end tests start from here; production deployments would load a
//! census extract into the same context shape instead.

use crate::config::SimConfig;
use sim_core::{Currency, RngStream, SimContext, ZoneSystem};
use types::{
    Date, Dwelling, DwellingId, DwellingType, Family, FamilyId, Household, HouseholdId, Job,
    LabourForceStatus, LandUse, Money, Person, PersonId, Sex, Tenure,
};

/// Number of zones in the synthetic study area.
pub const ZONE_COUNT: u32 = 5;

/// Fixed land-use tables per zone (residential, commercial, open,
/// industrial). Part of the scenario, not of the random draw.
const LAND_USE: [(f32, f32, f32, f32); ZONE_COUNT as usize] = [
    (0.62, 0.10, 0.18, 0.04),
    (0.55, 0.18, 0.12, 0.08),
    (0.48, 0.22, 0.10, 0.15),
    (0.70, 0.06, 0.20, 0.00),
    (0.40, 0.15, 0.08, 0.30),
];

/// Distance to the nearest subway station, per zone.
const DIST_SUBWAY: [f32; ZONE_COUNT as usize] = [1.2, 0.6, 2.5, 4.0, 3.2];

/// Distance to the nearest regional transit station, per zone.
const DIST_REGIONAL: [f32; ZONE_COUNT as usize] = [5.0, 3.5, 6.5, 8.0, 2.0];

/// Share of bootstrap households that own their dwelling.
const OWNER_SHARE: f64 = 0.70;

/// Build a fully populated context.
pub fn build_context(config: &SimConfig, rng: &mut RngStream) -> SimContext {
    let mut ctx = SimContext::new();
    let start = config.start_date();

    ctx.zones = ZoneSystem::from_numbers(0..ZONE_COUNT);
    for zone in 0..ZONE_COUNT {
        let (residential, commercial, open, industrial) = LAND_USE[zone as usize];
        ctx.land_use
            .insert(zone, LandUse::new(residential, commercial, open, industrial));
        ctx.dist_subway.insert(zone, DIST_SUBWAY[zone as usize]);
        ctx.dist_regional.insert(zone, DIST_REGIONAL[zone as usize]);
    }
    ctx.currency = build_currency(config);

    build_dwellings(config, &mut ctx, start, rng);
    build_households(config, &mut ctx, start, rng);
    ctx
}

/// Generate the monthly inflation index across the run span plus enough
/// history to convert bootstrap-era amounts.
fn build_currency(config: &SimConfig) -> Currency {
    let Some(monthly) = config.monthly_inflation else {
        return Currency::identity();
    };
    let first = config.start_date().plus_months(-(30 * 12));
    let months = 30 * 12 + config.total_months() as i32 + 12;
    Currency::with_series((0..months).map(|offset| {
        let date = first.plus_months(offset);
        (date, (1.0 + monthly).powi(offset))
    }))
}

fn build_dwellings(config: &SimConfig, ctx: &mut SimContext, start: Date, rng: &mut RngStream) {
    for _ in 0..config.num_initial_dwellings {
        let dwelling_type = sample_stock_type(rng);
        let (lo, hi) = stock_room_range(dwelling_type);
        let rooms = rng.range_u32(lo, hi);
        ctx.dwellings.add_new(Dwelling {
            id: DwellingId(0),
            exists: true,
            dwelling_type,
            rooms,
            square_footage: rng.range_f32(rooms as f32 * 200.0, rooms as f32 * 400.0),
            zone: rng.range_u32(0, ZONE_COUNT - 1),
            value: Money::new(rng.range_f32(60_000.0, 120_000.0), start),
            household: None,
            listing_date: None,
        });
    }
}

fn build_households(config: &SimConfig, ctx: &mut SimContext, start: Date, rng: &mut RngStream) {
    let mut next_vacant: u64 = 0;
    for _ in 0..config.num_households {
        let household_id = ctx.households.add_new(Household {
            id: HouseholdId(0),
            families: vec![],
            tenure: if rng.below(OWNER_SHARE) {
                Tenure::Own
            } else {
                Tenure::Rent
            },
            dwelling: None,
        });

        let family_id = build_family(config, ctx, household_id, start, rng);
        ctx.households
            .try_get_mut(household_id)
            .expect("household just inserted")
            .families
            .push(family_id);

        // House the household in the next vacant dwelling, if any remain.
        while (next_vacant as usize) < ctx.dwellings.len() {
            let dwelling_id = DwellingId(next_vacant);
            next_vacant += 1;
            let vacant = ctx
                .dwellings
                .try_get(dwelling_id)
                .is_some_and(|d| d.household.is_none());
            if vacant {
                ctx.dwellings
                    .try_get_mut(dwelling_id)
                    .expect("checked above")
                    .household = Some(household_id);
                ctx.households
                    .try_get_mut(household_id)
                    .expect("household just inserted")
                    .dwelling = Some(dwelling_id);
                break;
            }
        }
    }
}

fn build_family(
    config: &SimConfig,
    ctx: &mut SimContext,
    household_id: HouseholdId,
    start: Date,
    rng: &mut RngStream,
) -> FamilyId {
    let size = rng.range_u32(1, 5);
    let family_id = ctx.families.add_new(Family {
        id: FamilyId(0),
        persons: vec![],
        female_head: None,
        savings: rng.range_f32(2_000.0, 30_000.0),
        liquid_assets: rng.range_f32(5_000.0, 45_000.0),
        household: Some(household_id),
    });

    let head_age = rng.range_u32(25, 75) as i32;
    let mut persons = Vec::with_capacity(size as usize);
    let mut female_head = None;
    for n in 0..size {
        let age = match n {
            0 => head_age,
            1 => (head_age + rng.range_u32(0, 10) as i32 - 5).max(18),
            _ => rng.range_u32(0, 18) as i32,
        };
        let sex = if rng.below(0.5) { Sex::Female } else { Sex::Male };
        let adult = age >= 18;
        let employed = adult && rng.below(config.hiring_probability);

        let person_id = ctx.persons.add_new(Person {
            id: PersonId(0),
            age,
            sex,
            living: true,
            labour_force_status: if !adult {
                LabourForceStatus::NotApplicable
            } else if employed {
                LabourForceStatus::Employed
            } else {
                LabourForceStatus::Unemployed
            },
            jobs: vec![],
            family: Some(family_id),
        });
        if employed {
            let salary = (config.average_salary as f64
                + config.salary_std_dev as f64 * rng.gauss())
            .max(8_000.0) as f32;
            ctx.persons
                .try_get_mut(person_id)
                .expect("person just inserted")
                .jobs
                .push(Job {
                    owner: person_id,
                    start,
                    salary: Money::new(salary, start),
                });
        }
        if sex == Sex::Female && female_head.is_none() && adult {
            female_head = Some(person_id);
        }
        persons.push(person_id);
    }

    let family = ctx
        .families
        .try_get_mut(family_id)
        .expect("family just inserted");
    family.persons = persons;
    family.female_head = female_head;
    family_id
}

fn sample_stock_type(rng: &mut RngStream) -> DwellingType {
    // Existing stock leans slightly less detached than new construction.
    let u = rng.uniform();
    if u < 0.35 {
        DwellingType::Detached
    } else if u < 0.55 {
        DwellingType::SemiDetached
    } else if u < 0.75 {
        DwellingType::Attached
    } else if u < 0.92 {
        DwellingType::ApartmentLow
    } else {
        DwellingType::ApartmentHigh
    }
}

fn stock_room_range(ty: DwellingType) -> (u32, u32) {
    match ty {
        DwellingType::Detached => (3, 7),
        DwellingType::SemiDetached => (2, 6),
        DwellingType::Attached => (2, 5),
        DwellingType::ApartmentLow => (1, 4),
        DwellingType::ApartmentHigh => (0, 3),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_counts_and_consistency() {
        let config = SimConfig::demo();
        let mut rng = RngStream::from_seed(config.random_seed as u64);
        let ctx = build_context(&config, &mut rng);

        assert_eq!(ctx.households.len(), config.num_households);
        assert_eq!(ctx.dwellings.len(), config.num_initial_dwellings);
        assert!(ctx.persons.len() >= config.num_households);
        assert_eq!(ctx.zones.len(), ZONE_COUNT as usize);
        assert!(ctx.occupancy_consistent());

        // Every household found a home (dwellings outnumber households).
        assert!(ctx.households.iter().all(|h| h.dwelling.is_some()));
        // Leftover dwellings are vacant.
        let vacant = ctx.dwellings.iter().filter(|d| d.household.is_none()).count();
        assert_eq!(
            vacant,
            config.num_initial_dwellings - config.num_households
        );
    }

    #[test]
    fn test_bootstrap_is_deterministic() {
        let config = SimConfig::demo();
        let a = build_context(&config, &mut RngStream::from_seed(11));
        let b = build_context(&config, &mut RngStream::from_seed(11));

        let incomes_a: Vec<f64> = a
            .households
            .iter()
            .map(|h| a.household_income(h.id, config.start_date()).unwrap())
            .collect();
        let incomes_b: Vec<f64> = b
            .households
            .iter()
            .map(|h| b.household_income(h.id, config.start_date()).unwrap())
            .collect();
        assert_eq!(incomes_a, incomes_b);
    }

    #[test]
    fn test_inflation_series_covers_run_span() {
        let config = SimConfig::demo().inflation(0.003);
        let mut rng = RngStream::from_seed(1);
        let ctx = build_context(&config, &mut rng);

        let start = config.start_date();
        let end = start.plus_months(config.total_months() as i32 - 1);
        let m = Money::new(1_000.0, start);
        let converted = ctx.currency.convert(m, end).unwrap();
        assert!(converted.amount > 1_000.0);
    }
}
