//! Settlement service: validate, then settle.

use dutch_shared::SettlementPolicy;
use tracing::{debug, info, warn};

use super::engine::{SettlementEngine, SettlementInput};
use super::error::ValidationFailure;
use super::request::SettlementRequest;
use super::result::SettlementResult;
use super::validation::{ValidationNotice, ValidationReport, validate_request};

/// Entry point for callers holding a mutable settlement request.
///
/// The request is only ever changed by validation storing the leader as
/// excluded from the surcharge, and that happens before the engine runs.
pub struct SettlementService;

impl SettlementService {
    /// Validate a request without settling it.
    pub fn check(request: &mut SettlementRequest, policy: &SettlementPolicy) -> ValidationReport {
        debug!(
            participants = request.roster.len(),
            rounds = request.rounds.len(),
            "Validating settlement request"
        );

        let report = validate_request(request, policy);
        for notice in &report.notices {
            match notice {
                ValidationNotice::LeaderForcedExcluded { leader } => {
                    info!(%leader, "Leader forced to excluded");
                }
            }
        }
        if !report.is_clean() {
            warn!(issues = report.issues.len(), "Settlement request blocked");
        }

        report
    }

    /// Validate and settle a request.
    ///
    /// # Errors
    ///
    /// Returns every validation issue if the request cannot be settled.
    pub fn run(
        request: &mut SettlementRequest,
        policy: &SettlementPolicy,
    ) -> Result<SettlementResult, ValidationFailure> {
        Self::check(request, policy).into_result()?;

        let engine = SettlementEngine::new(policy.clone());
        let result = engine.settle(&SettlementInput::from_request(request));

        info!(
            total_base = result.total_base,
            total_surcharge = result.total_surcharge,
            surcharge_applied = result.surcharge_applied,
            participants = result.participants.len(),
            "Settlement computed"
        );

        Ok(result)
    }
}
