use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::interview::InterviewStatus;
use super::{require_reason, TransitionError};

/// Default reason recorded when an interview ends without an offer.
pub const INTERVIEW_REJECTION_REASON: &str = "Not selected after interview";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[serde(alias = "pending")]
    Applied,
    Shortlisted,
    InterviewScheduled,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 5] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::InterviewScheduled,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::InterviewScheduled => "interview_scheduled",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ApplicationStatus::Accepted | ApplicationStatus::Rejected)
    }

    /// Computes the effect of `event` on an application currently in `self`.
    ///
    /// Interview-driven events are idempotent against their own target state so
    /// a retried interview update does not fail on the application half.
    pub fn apply(self, event: &ApplicationEvent) -> Result<ApplicationChange, TransitionError> {
        use ApplicationEvent as E;
        use ApplicationStatus as S;

        let (to, rejection_reason) = match (self, event) {
            (S::Applied, E::Shortlist) => (S::Shortlisted, None),
            (S::Shortlisted, E::Unshortlist) => (S::Applied, None),
            (S::Shortlisted | S::InterviewScheduled, E::Accept) => (S::Accepted, None),
            (S::Applied | S::Shortlisted | S::InterviewScheduled, E::Reject { reason }) => {
                (S::Rejected, Some(require_reason(reason)?))
            }
            (S::Shortlisted, E::ScheduleInterview) => (S::InterviewScheduled, None),

            // Selecting a candidate forces the application to accepted.
            (S::Applied | S::Shortlisted | S::InterviewScheduled, E::InterviewSelected) => {
                (S::Accepted, None)
            }
            (S::Accepted, E::InterviewSelected) => (S::Accepted, None),

            (S::Shortlisted | S::InterviewScheduled, E::InterviewRejected { feedback }) => {
                let reason = feedback
                    .as_deref()
                    .map(str::trim)
                    .filter(|f| !f.is_empty())
                    .unwrap_or(INTERVIEW_REJECTION_REASON);
                (S::Rejected, Some(reason.to_string()))
            }
            (S::Rejected, E::InterviewRejected { .. }) => (S::Rejected, None),

            (S::InterviewScheduled, E::InterviewCancelled) => (S::Shortlisted, None),
            (S::Applied | S::Shortlisted, E::InterviewCancelled) => (self, None),

            (from, event) => {
                return Err(TransitionError::invalid("application", from, event.name()))
            }
        };

        Ok(ApplicationChange {
            from: self,
            to,
            rejection_reason,
        })
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = TransitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "applied" | "pending" => Ok(ApplicationStatus::Applied),
            "shortlisted" => Ok(ApplicationStatus::Shortlisted),
            "interview_scheduled" => Ok(ApplicationStatus::InterviewScheduled),
            "accepted" => Ok(ApplicationStatus::Accepted),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(TransitionError::unknown("application", other)),
        }
    }
}

/// Something that happens to an application. The first four are direct
/// recruiter actions; the rest are driven by the interview lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ApplicationEvent {
    Shortlist,
    Unshortlist,
    Accept,
    Reject {
        reason: String,
    },
    #[serde(skip)]
    ScheduleInterview,
    #[serde(skip)]
    InterviewSelected,
    #[serde(skip)]
    InterviewRejected { feedback: Option<String> },
    #[serde(skip)]
    InterviewCancelled,
}

impl ApplicationEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ApplicationEvent::Shortlist => "shortlist",
            ApplicationEvent::Unshortlist => "unshortlist",
            ApplicationEvent::Accept => "accept",
            ApplicationEvent::Reject { .. } => "reject",
            ApplicationEvent::ScheduleInterview => "schedule_interview",
            ApplicationEvent::InterviewSelected => "interview_selected",
            ApplicationEvent::InterviewRejected { .. } => "interview_rejected",
            ApplicationEvent::InterviewCancelled => "interview_cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationChange {
    pub from: ApplicationStatus,
    pub to: ApplicationStatus,
    pub rejection_reason: Option<String>,
}

impl ApplicationChange {
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }

    /// Status the open interview must take when a recruiter decides an
    /// application directly while an interview is still scheduled.
    pub fn closes_interview(&self) -> Option<InterviewStatus> {
        if self.from != ApplicationStatus::InterviewScheduled {
            return None;
        }
        match self.to {
            ApplicationStatus::Accepted => Some(InterviewStatus::Selected),
            ApplicationStatus::Rejected => Some(InterviewStatus::Rejected),
            _ => None,
        }
    }
}
