//! Status state machines for jobs, applications, interviews and alumni verification.
//!
//! Everything here is pure: callers load the current status, ask this module for
//! the next one, and persist the result with a compare-and-set update. No other
//! module decides whether a status change is legal.

pub mod application;
pub mod interview;
pub mod job;
pub mod profile;

use chrono::NaiveDate;
use thiserror::Error;

pub use application::{ApplicationChange, ApplicationEvent, ApplicationStatus};
pub use interview::{
    InterviewMode, InterviewStatus, RescheduleDecision, RescheduleProposal, RescheduleStatus,
};
pub use job::{JobReview, JobStatus};
pub use profile::{Role, VerificationDecision, VerificationStatus};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("{entity} cannot move from '{from}' via '{via}'")]
    Invalid {
        entity: &'static str,
        from: String,
        via: String,
    },

    #[error("a non-empty rejection reason is required")]
    ReasonRequired,

    #[error("a reschedule request is pending; accept or decline it first")]
    ReschedulePending,

    #[error("no reschedule request is pending")]
    NoReschedulePending,

    #[error("reschedule can only be requested while the interview is pending (current: '{0}')")]
    RescheduleNotAllowed(String),

    #[error("date {0} is in the past")]
    DateInPast(NaiveDate),

    #[error("a location is required for offline interviews")]
    LocationRequired,

    #[error("unknown {entity} status '{value}'")]
    UnknownStatus { entity: &'static str, value: String },
}

impl TransitionError {
    pub(crate) fn invalid(entity: &'static str, from: impl ToString, via: impl ToString) -> Self {
        TransitionError::Invalid {
            entity,
            from: from.to_string(),
            via: via.to_string(),
        }
    }

    pub(crate) fn unknown(entity: &'static str, value: &str) -> Self {
        TransitionError::UnknownStatus {
            entity,
            value: value.to_string(),
        }
    }

    /// True when the caller sent bad input, as opposed to asking for a move the
    /// current state does not permit.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            TransitionError::ReasonRequired
                | TransitionError::DateInPast(_)
                | TransitionError::LocationRequired
        )
    }
}

/// Trims a free-text reason and rejects blank input.
pub(crate) fn require_reason(reason: &str) -> Result<String, TransitionError> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(TransitionError::ReasonRequired);
    }
    Ok(reason.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_reason_trims() {
        assert_eq!(require_reason("  no fit  ").unwrap(), "no fit");
    }

    #[test]
    fn test_require_reason_rejects_whitespace() {
        assert_eq!(require_reason(" \n\t"), Err(TransitionError::ReasonRequired));
    }

    #[test]
    fn test_validation_classification() {
        assert!(TransitionError::ReasonRequired.is_validation());
        assert!(TransitionError::LocationRequired.is_validation());
        assert!(!TransitionError::ReschedulePending.is_validation());
        assert!(!TransitionError::invalid("job", "closed", "approve").is_validation());
    }
}
