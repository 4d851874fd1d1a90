//! Group expense settlement.
//!
//! This module implements the settlement pipeline:
//! - Settlement requests and their editing operations
//! - Validation collecting every blocking issue
//! - The allocation engine (exact split, per-item rounding, leader correction)
//! - Result types consumed by the text renderers
//! - The settlement service tying validation and the engine together

pub mod engine;
pub mod error;
pub mod request;
pub mod result;
pub mod service;
pub mod validation;

#[cfg(test)]
mod engine_props;

pub use engine::{SettlementEngine, SettlementInput, round_to_unit};
pub use error::{RequestError, ValidationFailure};
pub use request::{CollectionAccount, Eligibility, Round, SettlementRequest};
pub use result::{ItemKey, ParticipantSettlement, RoundTotal, SettlementResult};
pub use service::SettlementService;
pub use validation::{ValidationIssue, ValidationNotice, ValidationReport, validate_request};
