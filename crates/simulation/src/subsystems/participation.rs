//! Buyer gathering: parallel opt-in evaluation over owner-occupiers.

use crate::traits::BuyerSource;
use behavior::MobilityModel;
use sim_core::{Buyer, RngStream, SimContext};
use types::{Date, HouseholdId};

/// Evaluates the mobility model for every owner-occupier household.
pub struct ParticipationSubsystem {
    pub model: MobilityModel,
    pub force_sequential: bool,
}

impl ParticipationSubsystem {
    pub fn new(model: MobilityModel) -> Self {
        Self {
            model,
            force_sequential: false,
        }
    }
}

impl BuyerSource for ParticipationSubsystem {
    /// Candidate households are visited in repository order; each gets its
    /// own substream seeded from the month stream, so the opt-in set is
    /// independent of thread scheduling.
    fn gather_buyers(
        &self,
        ctx: &SimContext,
        now: Date,
        birth_rate_change: f64,
        rng: &mut RngStream,
    ) -> Vec<Buyer> {
        let candidates: Vec<HouseholdId> = ctx
            .households
            .iter()
            .filter(|h| h.is_owner_occupier())
            .map(|h| h.id)
            .collect();
        let seeds: Vec<u64> = candidates.iter().map(|_| rng.child_seed() as u64).collect();

        let decisions = parallel::map_index(
            candidates.len(),
            |i| {
                let mut stream = RngStream::from_seed(seeds[i]);
                let household = ctx.households.try_get(candidates[i])?;
                self.model
                    .evaluate(ctx, household, now, birth_rate_change, &mut stream)
                    .map(|opt_in| Buyer {
                        household: candidates[i],
                        wants_larger: opt_in.wants_larger,
                    })
            },
            self.force_sequential,
        );
        decisions.into_iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::{
        Family, FamilyId, Household, LabourForceStatus, Person, PersonId, Sex, Tenure,
    };

    fn populated_context(owners: usize, renters: usize) -> SimContext {
        let mut ctx = SimContext::new();
        let dwelling_template = types::Dwelling {
            id: types::DwellingId(0),
            exists: true,
            dwelling_type: types::DwellingType::Detached,
            rooms: 3,
            square_footage: 900.0,
            zone: 0,
            value: types::Money::new(100_000.0, Date::new(1980, 0)),
            household: None,
            listing_date: None,
        };
        for i in 0..(owners + renters) {
            let person = ctx.persons.add_new(Person {
                id: PersonId(0),
                age: 40,
                sex: Sex::Female,
                living: true,
                labour_force_status: LabourForceStatus::Employed,
                jobs: vec![],
                family: None,
            });
            let family = ctx.families.add_new(Family {
                id: FamilyId(0),
                persons: vec![person],
                female_head: Some(person),
                savings: 0.0,
                liquid_assets: 10_000.0,
                household: None,
            });
            let tenure = if i < owners { Tenure::Own } else { Tenure::Rent };
            let household = ctx.households.add_new(Household {
                id: HouseholdId(0),
                families: vec![family],
                tenure,
                dwelling: None,
            });
            let dwelling = ctx.dwellings.add_new(dwelling_template.clone());
            ctx.dwellings.try_get_mut(dwelling).unwrap().household = Some(household);
            ctx.households.try_get_mut(household).unwrap().dwelling = Some(dwelling);
        }
        ctx
    }

    #[test]
    fn test_only_owner_occupiers_are_candidates() {
        let ctx = populated_context(0, 50);
        let mut subsystem = ParticipationSubsystem::new(MobilityModel::new(0.658));
        subsystem.force_sequential = true;
        let buyers = subsystem.gather_buyers(
            &ctx,
            Date::new(1986, 0),
            0.0,
            &mut RngStream::from_seed(1),
        );
        assert!(buyers.is_empty());
    }

    #[test]
    fn test_gathering_is_deterministic_across_scheduling() {
        let ctx = populated_context(400, 100);
        let subsystem = ParticipationSubsystem::new(MobilityModel::new(0.658));
        let now = Date::new(1986, 0);

        let serial = {
            let mut s = ParticipationSubsystem::new(MobilityModel::new(0.658));
            s.force_sequential = true;
            s.gather_buyers(&ctx, now, 0.0, &mut RngStream::from_seed(7))
        };
        let parallel = subsystem.gather_buyers(&ctx, now, 0.0, &mut RngStream::from_seed(7));
        assert_eq!(serial, parallel);
    }

    #[test]
    fn test_opt_in_rate_is_plausible() {
        let ctx = populated_context(4_000, 0);
        let mut subsystem = ParticipationSubsystem::new(MobilityModel::new(0.658));
        subsystem.force_sequential = true;
        let buyers = subsystem.gather_buyers(
            &ctx,
            Date::new(1986, 5),
            0.0,
            &mut RngStream::from_seed(3),
        );
        // Baseline monthly opt-in should be well under 5%, and with 4000
        // owner-occupiers a few should still appear.
        assert!(!buyers.is_empty(), "no household ever opts in");
        assert!(
            buyers.len() < 200,
            "{} of 4000 opted in; mobility is implausibly high",
            buyers.len()
        );
    }
}
