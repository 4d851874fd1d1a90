//! Pre-settlement checks.
//!
//! Every check runs; nothing short-circuits. The caller gets the full list in
//! a fixed order and can show it as a checklist.

use std::collections::HashSet;

use dutch_shared::{Amount, SettlementPolicy};
use thiserror::Error;

use super::error::ValidationFailure;
use super::request::{Eligibility, SettlementRequest};
use super::result::ItemKey;

/// One reason a request cannot be settled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    /// Nobody is on the roster.
    #[error("Add at least one participant.")]
    NoParticipants,

    /// No leader chosen.
    #[error("Choose a leader.")]
    LeaderMissing,

    /// The leader is not a participant.
    #[error("The leader {0} is not on the participant list.")]
    LeaderNotInRoster(String),

    /// The surcharge was requested for a roster below the threshold.
    #[error("The surcharge needs at least {min} participants.")]
    SurchargeRosterTooSmall {
        /// Minimum roster size.
        min: usize,
    },

    /// Every round has a zero amount.
    #[error("Enter an amount for at least one round.")]
    NoBillableRound,

    /// A billable round has no attendees.
    #[error("{round}: no attendees selected.")]
    NoAttendees {
        /// Round title.
        round: String,
    },

    /// A billable round has no payer.
    #[error("{round}: choose who paid.")]
    PayerMissing {
        /// Round title.
        round: String,
    },

    /// A billable round's payer is not a participant.
    #[error("{round}: the payer {payer} is not on the participant list.")]
    PayerNotInRoster {
        /// Round title.
        round: String,
        /// Payer name.
        payer: String,
    },

    /// Two billable rounds share a title.
    #[error("{round}: another round already uses this title.")]
    DuplicateRoundTitle {
        /// Round title.
        round: String,
    },

    /// A billable round uses the name of a built-in breakdown line.
    #[error("{round}: this title is reserved, choose another one.")]
    ReservedRoundTitle {
        /// Round title.
        round: String,
    },

    /// The surcharge applies but nobody is opted in.
    #[error("Nobody is opted in to the surcharge.")]
    NoSurchargeParticipants,

    /// The amounts, once rounded, would not fit in an amount.
    #[error("The amounts are too large to settle.")]
    AmountTooLarge,
}

/// A correction validation applied to the request. Never blocking.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationNotice {
    /// The stored map had the leader opted in; it now has them excluded.
    #[error("{leader} is the leader and was excluded from the surcharge.")]
    LeaderForcedExcluded {
        /// Leader name.
        leader: String,
    },
}

/// Outcome of validating a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Blocking issues in check order.
    pub issues: Vec<ValidationIssue>,
    /// Corrections applied to the request.
    pub notices: Vec<ValidationNotice>,
}

impl ValidationReport {
    /// Returns true if the engine may run.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// User-facing issue lines in check order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }

    /// Converts into the notices on success or the failure on any issue.
    pub fn into_result(self) -> Result<Vec<ValidationNotice>, ValidationFailure> {
        if self.issues.is_empty() {
            Ok(self.notices)
        } else {
            Err(ValidationFailure {
                issues: self.issues,
            })
        }
    }
}

/// Validates a request, collecting every issue.
///
/// The only change made to the request is storing the leader as excluded
/// from the surcharge; it is reported as a notice and repeated calls make no
/// further changes.
pub fn validate_request(
    request: &mut SettlementRequest,
    policy: &SettlementPolicy,
) -> ValidationReport {
    let mut issues = Vec::new();
    let roster = &request.roster;

    // 1. Roster
    if roster.is_empty() {
        issues.push(ValidationIssue::NoParticipants);
    }

    // 2. Leader
    match request.leader.as_deref().filter(|l| !l.is_empty()) {
        None => issues.push(ValidationIssue::LeaderMissing),
        Some(leader) if !roster.contains(leader) => {
            issues.push(ValidationIssue::LeaderNotInRoster(leader.to_string()));
        }
        Some(_) => {}
    }

    // 3. Surcharge threshold
    if request.surcharge_requested && !policy.surcharge_allowed(roster.len()) {
        issues.push(ValidationIssue::SurchargeRosterTooSmall {
            min: policy.surcharge_min_participants,
        });
    }

    // 4. Something to settle
    if !request.rounds.iter().any(|r| r.is_billable()) {
        issues.push(ValidationIssue::NoBillableRound);
    }

    // 5. Billable rounds
    let mut titles = HashSet::new();
    for round in request.rounds.iter().filter(|r| r.is_billable()) {
        if round.attendees(roster).next().is_none() {
            issues.push(ValidationIssue::NoAttendees {
                round: round.title.clone(),
            });
        }
        match round.payer.as_deref().filter(|p| !p.is_empty()) {
            None => issues.push(ValidationIssue::PayerMissing {
                round: round.title.clone(),
            }),
            Some(payer) if !roster.contains(payer) => {
                issues.push(ValidationIssue::PayerNotInRoster {
                    round: round.title.clone(),
                    payer: payer.to_string(),
                });
            }
            Some(_) => {}
        }
        if !titles.insert(round.title.as_str()) {
            issues.push(ValidationIssue::DuplicateRoundTitle {
                round: round.title.clone(),
            });
        }
        if ItemKey::is_reserved(&round.title) {
            issues.push(ValidationIssue::ReservedRoundTitle {
                round: round.title.clone(),
            });
        }
    }

    // 6. Surcharge participants
    if request.surcharge_applies(policy)
        && !roster
            .iter()
            .any(|name| request.effective_eligibility(name) == Eligibility::Included)
    {
        issues.push(ValidationIssue::NoSurchargeParticipants);
    }

    // 7. Amount range
    if settleable_bound(request, policy).is_none() {
        issues.push(ValidationIssue::AmountTooLarge);
    }

    // 8. Leader exclusion
    let mut notices = Vec::new();
    if request.normalize()
        && let Some(leader) = &request.leader
    {
        notices.push(ValidationNotice::LeaderForcedExcluded {
            leader: leader.clone(),
        });
    }

    ValidationReport { issues, notices }
}

/// Upper bound of every sum the engine forms, or `None` if it overflows.
///
/// Each rounded line can exceed its exact share by at most one rounding unit,
/// and the leader's correction adds one more line.
fn settleable_bound(request: &SettlementRequest, policy: &SettlementPolicy) -> Option<Amount> {
    let mut total: Amount = 0;
    let mut lines: Amount = 1;

    for round in request.rounds.iter().filter(|r| r.is_billable()) {
        total = total.checked_add(round.amount)?;
        let attendees = Amount::try_from(round.attendees(&request.roster).count()).ok()?;
        lines = lines.checked_add(attendees)?;
    }
    if request.surcharge_applies(policy) {
        total = total.checked_add(policy.surcharge_amount)?;
        lines = lines.checked_add(Amount::try_from(request.roster.len()).ok()?)?;
    }

    total.checked_add(lines.checked_mul(policy.rounding_unit)?)
}
