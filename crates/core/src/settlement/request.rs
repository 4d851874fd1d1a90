//! Settlement request and its editing operations.
//!
//! The request is owned by the caller and edited between settlements. Every
//! edit that touches the roster, the leader or eligibility funnels through
//! [`SettlementRequest::normalize`], so the leader is never left eligible for
//! the surcharge.

use dutch_shared::{Amount, SettlementPolicy, parse_amount};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use super::error::RequestError;
use crate::roster::Roster;

/// Surcharge opt-in state of one participant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Eligibility {
    /// Shares the surcharge.
    #[default]
    #[serde(alias = "O")]
    Included,
    /// Does not share the surcharge.
    #[serde(alias = "X")]
    Excluded,
}

/// Account the leader collects into.
///
/// Only rendered in the summary; validation never checks it, so blank bank
/// and account fields still settle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionAccount {
    /// Bank name.
    #[serde(default)]
    pub bank: String,
    /// Account number.
    #[serde(default)]
    pub account_number: String,
}

/// One payment event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    /// Identifier used by the editing operations.
    #[serde(default)]
    pub id: u32,
    /// Display label, also the item key of this round's shares.
    pub title: String,
    /// Amount paid for the round. Accepts a number or amount text.
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub amount: Amount,
    /// Participant who paid the amount up front.
    #[serde(default)]
    pub payer: Option<String>,
    /// Attendance per participant; only `true` counts as attending.
    #[serde(default)]
    pub selected: IndexMap<String, bool>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AmountInput {
    Number(Amount),
    Text(String),
}

fn deserialize_amount<'de, D>(deserializer: D) -> Result<Amount, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match AmountInput::deserialize(deserializer)? {
        AmountInput::Number(amount) => amount,
        AmountInput::Text(text) => parse_amount(&text),
    })
}

impl Round {
    /// Creates a round with everyone on the roster attending.
    #[must_use]
    pub fn new(id: u32, title: impl Into<String>, roster: &Roster) -> Self {
        Self {
            id,
            title: title.into(),
            amount: 0,
            payer: roster.first().map(str::to_string),
            selected: roster.iter().map(|name| (name.to_string(), true)).collect(),
        }
    }

    /// Returns true if `name` shares this round's cost.
    #[must_use]
    pub fn attends(&self, name: &str) -> bool {
        self.selected.get(name).copied().unwrap_or(false)
    }

    /// Attendees in roster order.
    pub fn attendees<'a>(&'a self, roster: &'a Roster) -> impl Iterator<Item = &'a str> {
        roster.iter().filter(|name| self.attends(name))
    }

    /// Returns true if the round takes part in settlement at all.
    #[must_use]
    pub const fn is_billable(&self) -> bool {
        self.amount > 0
    }
}

fn default_surcharge_requested() -> bool {
    true
}

/// Everything a settlement is computed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementRequest {
    /// Canonical participant list.
    #[serde(default, alias = "participants")]
    pub roster: Roster,
    /// Participant who collects the money and absorbs rounding.
    #[serde(default)]
    pub leader: Option<String>,
    /// Stored surcharge opt-in per participant. Missing means included.
    #[serde(default)]
    pub eligibility: IndexMap<String, Eligibility>,
    /// Payment events in declaration order.
    #[serde(default)]
    pub rounds: Vec<Round>,
    /// Whether the surcharge was asked for.
    #[serde(default = "default_surcharge_requested")]
    pub surcharge_requested: bool,
    /// Where participants send their money.
    #[serde(default)]
    pub collection: CollectionAccount,
}

impl Default for SettlementRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl SettlementRequest {
    /// Creates an empty request with a single empty round.
    #[must_use]
    pub fn new() -> Self {
        let roster = Roster::default();
        let first = Round::new(1, round_title(1), &roster);

        Self {
            roster,
            leader: None,
            eligibility: IndexMap::new(),
            rounds: vec![first],
            surcharge_requested: true,
            collection: CollectionAccount::default(),
        }
    }

    /// Enforces the leader's exclusion in the stored eligibility map.
    ///
    /// Returns true if the map was changed. Calling it again is a no-op.
    pub fn normalize(&mut self) -> bool {
        let Some(leader) = self.leader.as_deref().filter(|l| !l.is_empty()) else {
            return false;
        };
        if self.eligibility.get(leader) == Some(&Eligibility::Excluded) {
            return false;
        }
        self.eligibility
            .insert(leader.to_string(), Eligibility::Excluded);
        true
    }

    /// Surcharge opt-in actually used for `name`.
    #[must_use]
    pub fn effective_eligibility(&self, name: &str) -> Eligibility {
        if self.leader.as_deref() == Some(name) {
            return Eligibility::Excluded;
        }
        self.eligibility.get(name).copied().unwrap_or_default()
    }

    /// Returns true if the surcharge is requested and the roster is large
    /// enough to carry it.
    #[must_use]
    pub fn surcharge_applies(&self, policy: &SettlementPolicy) -> bool {
        self.surcharge_requested && policy.surcharge_allowed(self.roster.len())
    }

    /// Replaces the roster with comma-separated names and reconciles every
    /// dependent setting with it.
    pub fn apply_names(&mut self, text: &str, policy: &SettlementPolicy) {
        self.roster = Roster::parse(text);

        let previous = std::mem::take(&mut self.eligibility);
        self.eligibility = self
            .roster
            .iter()
            .map(|name| {
                let value = previous.get(name).copied().unwrap_or_default();
                (name.to_string(), value)
            })
            .collect();

        let keep_leader = self
            .leader
            .as_deref()
            .is_some_and(|leader| self.roster.contains(leader));
        if !keep_leader {
            self.leader = self.roster.first().map(str::to_string);
        }

        for round in &mut self.rounds {
            round.selected = self
                .roster
                .iter()
                .map(|name| (name.to_string(), round.selected.get(name).copied().unwrap_or(true)))
                .collect();

            let keep_payer = round
                .payer
                .as_deref()
                .is_some_and(|payer| self.roster.contains(payer));
            if !keep_payer {
                round.payer = self.roster.first().map(str::to_string);
            }
        }

        if !policy.surcharge_allowed(self.roster.len()) {
            self.surcharge_requested = false;
        }

        self.normalize();
    }

    /// Marks roster members missing from a round's selection as attending.
    ///
    /// Explicit `false` entries are kept.
    pub fn select_missing_attendees(&mut self) {
        for round in &mut self.rounds {
            for name in self.roster.iter() {
                round.selected.entry(name.to_string()).or_insert(true);
            }
        }
    }

    /// Changes the leader.
    pub fn set_leader(&mut self, leader: Option<&str>) {
        self.leader = leader.map(str::to_string);
        self.normalize();
    }

    /// Stores a participant's surcharge opt-in. The leader stays excluded.
    pub fn set_eligibility(&mut self, name: &str, value: Eligibility) {
        self.eligibility.insert(name.to_string(), value);
        self.normalize();
    }

    /// Turns the surcharge toggle on or off. It cannot be turned on while the
    /// roster is below the threshold.
    pub fn set_surcharge_requested(&mut self, requested: bool, policy: &SettlementPolicy) {
        self.surcharge_requested = requested && policy.surcharge_allowed(self.roster.len());
    }

    /// Appends a new round and returns its id.
    pub fn add_round(&mut self) -> u32 {
        let id = self.rounds.iter().map(|r| r.id).max().unwrap_or(0) + 1;

        let mut number = self.rounds.len() + 1;
        while self.rounds.iter().any(|r| r.title == round_title(number)) {
            number += 1;
        }

        self.rounds.push(Round::new(id, round_title(number), &self.roster));
        id
    }

    /// Removes a round. The last remaining round is never removed.
    ///
    /// Returns true if the round was removed.
    pub fn remove_round(&mut self, id: u32) -> Result<bool, RequestError> {
        let index = self.round_index(id)?;
        if self.rounds.len() == 1 {
            return Ok(false);
        }
        self.rounds.remove(index);
        Ok(true)
    }

    /// Sets a round's amount from free-form text.
    pub fn set_round_amount_text(&mut self, id: u32, text: &str) -> Result<Amount, RequestError> {
        let round = self.round_mut(id)?;
        round.amount = parse_amount(text);
        Ok(round.amount)
    }

    /// Sets who paid for a round.
    pub fn set_round_payer(&mut self, id: u32, payer: Option<&str>) -> Result<(), RequestError> {
        self.round_mut(id)?.payer = payer.map(str::to_string);
        Ok(())
    }

    /// Flips one participant's attendance. Returns the new state.
    pub fn toggle_attendee(&mut self, id: u32, name: &str) -> Result<bool, RequestError> {
        let round = self.round_mut(id)?;
        let attends = !round.attends(name);
        round.selected.insert(name.to_string(), attends);
        Ok(attends)
    }

    /// Sets everyone on the roster to attend, or not attend, a round.
    pub fn set_all_attendees(&mut self, id: u32, attends: bool) -> Result<(), RequestError> {
        let index = self.round_index(id)?;
        self.rounds[index].selected = self
            .roster
            .iter()
            .map(|name| (name.to_string(), attends))
            .collect();
        Ok(())
    }

    fn round_index(&self, id: u32) -> Result<usize, RequestError> {
        self.rounds
            .iter()
            .position(|r| r.id == id)
            .ok_or(RequestError::UnknownRound(id))
    }

    fn round_mut(&mut self, id: u32) -> Result<&mut Round, RequestError> {
        let index = self.round_index(id)?;
        Ok(&mut self.rounds[index])
    }
}

fn round_title(number: usize) -> String {
    format!("Round {number}")
}
