//! Error taxonomy for allocation runs.
//!
//! - [`ValidationError`]: malformed roster input, reported before any
//!   allocation starts.
//! - [`ConsistencyError`]: an internal invariant was broken mid-run. The
//!   capacity and minimum guarantees can no longer be trusted, so the run
//!   aborts with no partial output.
//!
//! A participant left without an activity is *not* an error; see
//! [`UnassignedReason`](crate::models::UnassignedReason).

use thiserror::Error;

use crate::validation::ValidationError;

/// Fatal error for an allocation run.
#[derive(Debug, Error)]
pub enum AllocationError {
    /// The input tables failed validation.
    #[error("roster validation failed with {} error(s): {}", .0.len(), summarize(.0))]
    Validation(Vec<ValidationError>),

    /// An engine invariant was violated.
    #[error(transparent)]
    Consistency(#[from] ConsistencyError),
}

/// Internal invariant violation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsistencyError {
    /// A release was requested for a participant the ledger never admitted.
    #[error("release of unrecorded admission: '{participant}' in '{activity}' during '{period}'")]
    ReleaseWithoutAdmission {
        activity: String,
        period: String,
        participant: String,
    },

    /// The ledger refused an admission the engine had already checked.
    #[error("admission refused for '{participant}' in '{activity}' during '{period}'")]
    AdmissionRefused {
        activity: String,
        period: String,
        participant: String,
    },

    /// A (participant, period) pair finished the run without an outcome.
    #[error("no outcome recorded for '{participant}' during '{period}'")]
    MissingOutcome { participant: String, period: String },
}

impl From<Vec<ValidationError>> for AllocationError {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::Validation(errors)
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
