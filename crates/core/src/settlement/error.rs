//! Settlement error types.

use thiserror::Error;

use super::validation::ValidationIssue;

/// Errors from editing a settlement request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// No round has the given id.
    #[error("Round {0} does not exist")]
    UnknownRound(u32),
}

/// A request that cannot be settled, with every reason why.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Settlement request has {} issue(s)", .issues.len())]
pub struct ValidationFailure {
    /// Issues in check order.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationFailure {
    /// User-facing lines, one per issue, in check order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }
}

impl From<ValidationFailure> for dutch_shared::AppError {
    fn from(failure: ValidationFailure) -> Self {
        Self::Validation(failure.messages().join("; "))
    }
}
