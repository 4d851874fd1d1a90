//! Property-based tests for the settlement engine.
//!
//! - Conservation: owed totals add up to rounds plus surcharge
//! - Leader sink: only the leader carries a rounding correction
//! - Surcharge gating and leader exclusion
//! - Determinism of settlement and of leader normalization

use dutch_shared::{Amount, SettlementPolicy};
use indexmap::IndexMap;
use proptest::prelude::*;

use super::engine::{SettlementEngine, SettlementInput};
use super::request::{Eligibility, Round, SettlementRequest};
use super::result::ItemKey;
use super::validation::validate_request;
use crate::roster::Roster;

const NAMES: [&str; 9] = [
    "Alice", "Bob", "Carol", "Dave", "Erin", "Frank", "Gina", "Hank", "Ivy",
];

/// Raw round: amount, payer index and attendance bit mask.
type RawRound = (Amount, usize, u16);

#[derive(Debug, Clone)]
struct Case {
    roster: Roster,
    rounds: Vec<Round>,
    leader: String,
    eligibility: IndexMap<String, Eligibility>,
    surcharge_requested: bool,
}

impl Case {
    fn input(&self) -> SettlementInput<'_> {
        SettlementInput {
            roster: &self.roster,
            rounds: &self.rounds,
            leader: &self.leader,
            eligibility: &self.eligibility,
            surcharge_requested: self.surcharge_requested,
        }
    }

    fn has_surcharge_payer(&self) -> bool {
        let input = self.input();
        self.roster
            .iter()
            .any(|name| input.eligibility_of(name) == Eligibility::Included)
    }
}

fn build_case(
    size: usize,
    raw_rounds: &[RawRound],
    leader: usize,
    opt_out_mask: u16,
    surcharge_requested: bool,
) -> Case {
    let names = &NAMES[..size];
    let roster = Roster::new(names);
    let full_mask = (1u16 << size) - 1;

    let rounds = raw_rounds
        .iter()
        .enumerate()
        .map(|(i, &(amount, payer, mask))| {
            let mask = match mask & full_mask {
                0 => 1,
                m => m,
            };
            Round {
                id: u32::try_from(i).unwrap_or(u32::MAX),
                title: format!("Round {}", i + 1),
                amount,
                payer: Some(names[payer % size].to_string()),
                selected: names
                    .iter()
                    .enumerate()
                    .map(|(bit, name)| ((*name).to_string(), mask & (1 << bit) != 0))
                    .collect(),
            }
        })
        .collect();

    let eligibility = names
        .iter()
        .enumerate()
        .map(|(bit, name)| {
            let value = if opt_out_mask & (1 << bit) == 0 {
                Eligibility::Included
            } else {
                Eligibility::Excluded
            };
            ((*name).to_string(), value)
        })
        .collect();

    Case {
        roster,
        rounds,
        leader: names[leader % size].to_string(),
        eligibility,
        surcharge_requested,
    }
}

fn raw_round() -> impl Strategy<Value = RawRound> {
    (1i64..2_000_000, any::<usize>(), any::<u16>())
}

fn settlement_case() -> impl Strategy<Value = Case> {
    (
        1usize..=NAMES.len(),
        prop::collection::vec(raw_round(), 1..6),
        any::<usize>(),
        any::<u16>(),
        any::<bool>(),
    )
        .prop_map(|(size, rounds, leader, opt_out, surcharge)| {
            build_case(size, &rounds, leader, opt_out, surcharge)
        })
}

fn unit() -> impl Strategy<Value = Amount> {
    prop_oneof![Just(1), Just(10), Just(100), Just(1_000)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // =========================================================================
    // Conservation
    // =========================================================================

    /// Owed totals always add up to the billable rounds plus the applied
    /// surcharge, whatever the rounding unit.
    #[test]
    fn prop_owed_sum_matches_total(case in settlement_case(), unit in unit()) {
        prop_assume!(!case.surcharge_requested || case.has_surcharge_payer());
        let policy = SettlementPolicy { rounding_unit: unit, ..SettlementPolicy::default() };

        let result = SettlementEngine::new(policy).settle(&case.input());

        let rounds: Amount = case.rounds.iter().map(|r| r.amount).sum();
        prop_assert_eq!(result.total_base, rounds);
        prop_assert_eq!(result.total_owed(), result.total());

        let paid: Amount = result.participants.iter().map(|p| p.paid).sum();
        let delta: Amount = result.participants.iter().map(|p| p.delta).sum();
        prop_assert_eq!(paid, result.total_base);
        prop_assert_eq!(delta, result.total_surcharge);
    }

    // =========================================================================
    // Leader sink
    // =========================================================================

    /// Only the leader carries a correction, and every other line is a whole
    /// multiple of the rounding unit.
    #[test]
    fn prop_correction_sits_on_leader_only(case in settlement_case(), unit in unit()) {
        prop_assume!(!case.surcharge_requested || case.has_surcharge_payer());
        let policy = SettlementPolicy { rounding_unit: unit, ..SettlementPolicy::default() };

        let result = SettlementEngine::new(policy).settle(&case.input());

        for person in &result.participants {
            if person.name != result.leader {
                prop_assert_eq!(person.item(&ItemKey::RoundingCorrection), None);
                prop_assert_eq!(person.owed % unit, 0);
            }
            for (key, amount) in &person.items {
                if *key != ItemKey::RoundingCorrection {
                    prop_assert_eq!(amount % unit, 0, "{} for {}", key, person.name);
                }
            }
            prop_assert_ne!(person.item(&ItemKey::RoundingCorrection), Some(0));
        }

        // Each rounded line is off by at most half a unit.
        let lines: usize = result
            .participants
            .iter()
            .map(|p| p.items.keys().filter(|k| **k != ItemKey::RoundingCorrection).count())
            .sum();
        let leader = result.participant(&result.leader).map_or(0, |p| p.rounding_correction());
        let bound = Amount::try_from(lines).unwrap_or(Amount::MAX) * unit;
        prop_assert!(2 * leader.abs() <= bound);
    }

    // =========================================================================
    // Surcharge gating and exclusion
    // =========================================================================

    /// Below the threshold no surcharge line ever appears.
    #[test]
    fn prop_small_roster_has_no_surcharge(case in settlement_case()) {
        prop_assume!(case.roster.len() < 6);

        let result = SettlementEngine::default().settle(&case.input());

        prop_assert!(!result.surcharge_applied);
        prop_assert_eq!(result.total_surcharge, 0);
        for person in &result.participants {
            prop_assert_eq!(person.item(&ItemKey::Surcharge), None);
        }
    }

    /// The leader never shares the surcharge, and opted-out people never do.
    #[test]
    fn prop_surcharge_only_for_included_non_leaders(case in settlement_case()) {
        prop_assume!(!case.surcharge_requested || case.has_surcharge_payer());

        let result = SettlementEngine::default().settle(&case.input());

        for person in &result.participants {
            let stored = case.eligibility[person.name.as_str()];
            if person.name == case.leader || stored == Eligibility::Excluded {
                prop_assert_eq!(person.item(&ItemKey::Surcharge), None);
                prop_assert_eq!(person.eligibility, Eligibility::Excluded);
            } else if result.surcharge_applied {
                prop_assert!(person.item(&ItemKey::Surcharge).is_some());
            }
        }
    }

    /// Non-attendees get no line for a round.
    #[test]
    fn prop_attendance_controls_round_lines(case in settlement_case()) {
        prop_assume!(!case.surcharge_requested || case.has_surcharge_payer());

        let result = SettlementEngine::default().settle(&case.input());

        for round in &case.rounds {
            let key = ItemKey::Round(round.title.clone());
            for person in &result.participants {
                if !round.attends(&person.name) {
                    prop_assert_eq!(person.item(&key), None);
                }
            }
        }
    }

    // =========================================================================
    // Determinism
    // =========================================================================

    /// Settling the same input twice gives the same result.
    #[test]
    fn prop_settle_is_deterministic(case in settlement_case()) {
        prop_assume!(!case.surcharge_requested || case.has_surcharge_payer());
        let engine = SettlementEngine::default();

        let first = engine.settle(&case.input());
        let second = engine.settle(&case.input());

        prop_assert_eq!(first, second);
    }

    /// Validation corrects the leader at most once.
    #[test]
    fn prop_validation_normalizes_once(case in settlement_case()) {
        let policy = SettlementPolicy::default();
        let mut request = SettlementRequest {
            roster: case.roster.clone(),
            leader: Some(case.leader.clone()),
            eligibility: case.eligibility.clone(),
            rounds: case.rounds.clone(),
            surcharge_requested: case.surcharge_requested,
            ..SettlementRequest::new()
        };

        let first = validate_request(&mut request, &policy);
        let snapshot = request.clone();
        let second = validate_request(&mut request, &policy);

        prop_assert_eq!(request.eligibility[case.leader.as_str()], Eligibility::Excluded);
        prop_assert!(second.notices.is_empty());
        prop_assert_eq!(&first.issues, &second.issues);
        prop_assert_eq!(snapshot, request);
    }
}
