//! Settlement allocation engine.
//!
//! The engine works in two passes:
//! 1. Split every round (and the surcharge) exactly, in `Decimal`
//! 2. Round each item on its own to the policy unit, then put the single
//!    gap between the rounded sum and the real total on the leader
//!
//! Items are rounded one by one because every breakdown line is shown to
//! participants and has to be a round number. The gap that leaves behind is
//! absorbed by the leader, who handles the money anyway.

use dutch_shared::{Amount, SettlementPolicy};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use tracing::debug;

use super::request::{Eligibility, Round, SettlementRequest};
use super::result::{ItemKey, ParticipantSettlement, RoundTotal, SettlementResult};
use crate::roster::Roster;

/// Borrowed view of everything the engine reads.
#[derive(Debug, Clone, Copy)]
pub struct SettlementInput<'a> {
    /// Canonical participant list.
    pub roster: &'a Roster,
    /// Rounds in declaration order.
    pub rounds: &'a [Round],
    /// Leader name; must be on the roster.
    pub leader: &'a str,
    /// Stored surcharge opt-in; the leader is treated as excluded regardless.
    pub eligibility: &'a IndexMap<String, Eligibility>,
    /// Whether the surcharge was asked for.
    pub surcharge_requested: bool,
}

impl<'a> SettlementInput<'a> {
    /// Borrows the engine input from a request.
    #[must_use]
    pub fn from_request(request: &'a SettlementRequest) -> Self {
        Self {
            roster: &request.roster,
            rounds: &request.rounds,
            leader: request.leader.as_deref().unwrap_or_default(),
            eligibility: &request.eligibility,
            surcharge_requested: request.surcharge_requested,
        }
    }

    /// Surcharge opt-in used for `name`.
    #[must_use]
    pub fn eligibility_of(&self, name: &str) -> Eligibility {
        if name == self.leader {
            return Eligibility::Excluded;
        }
        self.eligibility.get(name).copied().unwrap_or_default()
    }
}

/// Engine turning a validated request into a settlement.
#[derive(Debug, Clone, Default)]
pub struct SettlementEngine {
    policy: SettlementPolicy,
}

impl SettlementEngine {
    /// Creates an engine for the given policy.
    #[must_use]
    pub const fn new(policy: SettlementPolicy) -> Self {
        Self { policy }
    }

    /// Policy this engine applies.
    #[must_use]
    pub const fn policy(&self) -> &SettlementPolicy {
        &self.policy
    }

    /// Settles a validated request.
    ///
    /// # Panics
    ///
    /// Panics if the input breaks a validation contract: a billable round
    /// without attendees, a payer or leader off the roster, an applied
    /// surcharge with nobody opted in, or amounts whose rounded sums do not
    /// fit in an `Amount`.
    #[must_use]
    pub fn settle(&self, input: &SettlementInput<'_>) -> SettlementResult {
        let roster = input.roster;
        assert!(
            roster.contains(input.leader),
            "leader {:?} is not on the roster",
            input.leader
        );

        let mut running: IndexMap<&str, IndexMap<ItemKey, Decimal>> =
            roster.iter().map(|name| (name, IndexMap::new())).collect();
        let mut paid: IndexMap<&str, Amount> = roster.iter().map(|name| (name, 0)).collect();
        let mut rounds = Vec::new();

        // 1. Per-round equal split
        for round in input.rounds.iter().filter(|r| r.is_billable()) {
            let attendees: Vec<&str> = round.attendees(roster).collect();
            assert!(
                !attendees.is_empty(),
                "round {:?} has no attendees",
                round.title
            );

            let payer = round.payer.as_deref().unwrap_or_default();
            let Some(paid_by_payer) = paid.get_mut(payer) else {
                panic!("payer {payer:?} of round {:?} is not on the roster", round.title);
            };
            *paid_by_payer += round.amount;

            let share = Decimal::from(round.amount) / Decimal::from(attendees.len());
            for name in attendees {
                *running[name]
                    .entry(ItemKey::Round(round.title.clone()))
                    .or_default() += share;
            }

            rounds.push(RoundTotal {
                title: round.title.clone(),
                amount: round.amount,
                payer: payer.to_string(),
            });
        }

        // 2. Surcharge
        let surcharge_applied =
            input.surcharge_requested && self.policy.surcharge_allowed(roster.len());
        if surcharge_applied {
            let included: Vec<&str> = roster
                .iter()
                .filter(|name| input.eligibility_of(name) == Eligibility::Included)
                .collect();
            assert!(!included.is_empty(), "surcharge applied with nobody opted in");

            let extra = Decimal::from(self.policy.surcharge_amount) / Decimal::from(included.len());
            for name in included {
                *running[name].entry(ItemKey::Surcharge).or_default() += extra;
            }
        }

        // 3. Per-item rounding
        let mut participants: Vec<ParticipantSettlement> = running
            .into_iter()
            .map(|(name, items)| {
                let items: IndexMap<ItemKey, Amount> = items
                    .into_iter()
                    .map(|(key, value)| (key, round_to_unit(value, self.policy.rounding_unit)))
                    .collect();
                let owed = items.values().sum();
                let paid = paid[name];

                ParticipantSettlement {
                    name: name.to_string(),
                    eligibility: input.eligibility_of(name),
                    items,
                    owed,
                    paid,
                    delta: 0,
                }
            })
            .collect();

        // 4. Global reconciliation
        let total_base: Amount = rounds.iter().map(|r| r.amount).sum();
        let total_surcharge = if surcharge_applied {
            self.policy.surcharge_amount
        } else {
            0
        };
        let rounded_sum: Amount = participants.iter().map(|p| p.owed).sum();
        let diff = total_base + total_surcharge - rounded_sum;

        if diff != 0 {
            if let Some(leader) = participants.iter_mut().find(|p| p.name == input.leader) {
                *leader.items.entry(ItemKey::RoundingCorrection).or_insert(0) += diff;
                leader.owed += diff;
            }
            debug!(leader = %input.leader, diff, "Applied rounding correction");
        }

        // 5. Net delta
        for person in &mut participants {
            person.delta = person.owed - person.paid;
        }

        SettlementResult {
            leader: input.leader.to_string(),
            rounds,
            participants,
            surcharge_applied,
            total_base,
            total_surcharge,
        }
    }
}

/// Rounds to the nearest multiple of `unit`, halves away from zero.
///
/// # Panics
///
/// Panics if the rounded value does not fit in an `Amount`.
#[must_use]
pub fn round_to_unit(value: Decimal, unit: Amount) -> Amount {
    let unit = Decimal::from(unit);
    let rounded = (value / unit)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        * unit;

    rounded
        .to_i64()
        .unwrap_or_else(|| panic!("rounded share {rounded} does not fit in an amount"))
}
