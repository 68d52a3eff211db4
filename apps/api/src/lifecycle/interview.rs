use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::application::ApplicationEvent;
use super::TransitionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    Pending,
    Completed,
    Selected,
    Rejected,
    Cancelled,
}

impl InterviewStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            InterviewStatus::Pending => "pending",
            InterviewStatus::Completed => "completed",
            InterviewStatus::Selected => "selected",
            InterviewStatus::Rejected => "rejected",
            InterviewStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            InterviewStatus::Selected | InterviewStatus::Rejected | InterviewStatus::Cancelled
        )
    }

    /// Validates a direct status change. Refused while a reschedule request is
    /// waiting for an answer.
    pub fn transition(
        self,
        next: InterviewStatus,
        reschedule: Option<RescheduleStatus>,
    ) -> Result<InterviewStatus, TransitionError> {
        use InterviewStatus as S;

        if reschedule == Some(RescheduleStatus::Pending) {
            return Err(TransitionError::ReschedulePending);
        }

        match (self, next) {
            (S::Pending, S::Completed | S::Selected | S::Rejected | S::Cancelled)
            | (S::Completed, S::Selected | S::Rejected) => Ok(next),
            (from, to) => Err(TransitionError::invalid("interview", from, to)),
        }
    }

    /// The event the linked application receives when an interview reaches `self`.
    pub fn application_event(self, feedback: Option<&str>) -> Option<ApplicationEvent> {
        match self {
            InterviewStatus::Selected => Some(ApplicationEvent::InterviewSelected),
            InterviewStatus::Rejected => Some(ApplicationEvent::InterviewRejected {
                feedback: feedback.map(str::to_string),
            }),
            InterviewStatus::Cancelled => Some(ApplicationEvent::InterviewCancelled),
            InterviewStatus::Pending | InterviewStatus::Completed => None,
        }
    }
}

impl fmt::Display for InterviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterviewStatus {
    type Err = TransitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InterviewStatus::Pending),
            "completed" => Ok(InterviewStatus::Completed),
            "selected" => Ok(InterviewStatus::Selected),
            "rejected" => Ok(InterviewStatus::Rejected),
            "cancelled" => Ok(InterviewStatus::Cancelled),
            other => Err(TransitionError::unknown("interview", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewMode {
    Online,
    Offline,
}

impl InterviewMode {
    pub fn as_str(self) -> &'static str {
        match self {
            InterviewMode::Online => "online",
            InterviewMode::Offline => "offline",
        }
    }
}

impl FromStr for InterviewMode {
    type Err = TransitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(InterviewMode::Online),
            "offline" => Ok(InterviewMode::Offline),
            other => Err(TransitionError::unknown("interview mode", other)),
        }
    }
}

/// A date, time, mode and location for an interview. Used both for the
/// original schedule and for a student's reschedule proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RescheduleProposal {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub mode: InterviewMode,
    pub location: Option<String>,
}

impl RescheduleProposal {
    /// Rejects slots in the past and offline slots with no location.
    pub fn validate(&self, today: NaiveDate) -> Result<(), TransitionError> {
        if self.date < today {
            return Err(TransitionError::DateInPast(self.date));
        }
        let has_location = self
            .location
            .as_deref()
            .is_some_and(|l| !l.trim().is_empty());
        if self.mode == InterviewMode::Offline && !has_location {
            return Err(TransitionError::LocationRequired);
        }
        Ok(())
    }
}

/// `None` in storage means no request has been made (or the last one was declined).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RescheduleStatus {
    Pending,
    Accepted,
}

impl RescheduleStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RescheduleStatus::Pending => "pending",
            RescheduleStatus::Accepted => "accepted",
        }
    }

    pub fn parse_optional(value: Option<&str>) -> Result<Option<Self>, TransitionError> {
        match value {
            None => Ok(None),
            Some("pending") => Ok(Some(RescheduleStatus::Pending)),
            Some("accepted") => Ok(Some(RescheduleStatus::Accepted)),
            Some(other) => Err(TransitionError::unknown("reschedule", other)),
        }
    }

    /// A student asks to move an interview. Allowed only while the interview is
    /// still pending and no earlier request is outstanding.
    pub fn request(
        interview: InterviewStatus,
        current: Option<RescheduleStatus>,
        proposal: &RescheduleProposal,
        today: NaiveDate,
    ) -> Result<RescheduleStatus, TransitionError> {
        if interview != InterviewStatus::Pending {
            return Err(TransitionError::RescheduleNotAllowed(
                interview.as_str().to_string(),
            ));
        }
        if current == Some(RescheduleStatus::Pending) {
            return Err(TransitionError::ReschedulePending);
        }
        proposal.validate(today)?;
        Ok(RescheduleStatus::Pending)
    }

    /// The recruiter answers an outstanding request.
    pub fn respond(
        current: Option<RescheduleStatus>,
        decision: RescheduleDecision,
    ) -> Result<Option<RescheduleStatus>, TransitionError> {
        if current != Some(RescheduleStatus::Pending) {
            return Err(TransitionError::NoReschedulePending);
        }
        Ok(match decision {
            RescheduleDecision::Accept => Some(RescheduleStatus::Accepted),
            RescheduleDecision::Decline => None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RescheduleDecision {
    Accept,
    Decline,
}

#[cfg(test)]
mod tests {
    use super::*;
    use InterviewStatus as S;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn proposal(date: NaiveDate, mode: InterviewMode, location: Option<&str>) -> RescheduleProposal {
        RescheduleProposal {
            date,
            time: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
            mode,
            location: location.map(str::to_string),
        }
    }

    #[test]
    fn test_pending_can_reach_every_outcome() {
        for next in [S::Completed, S::Selected, S::Rejected, S::Cancelled] {
            assert_eq!(S::Pending.transition(next, None).unwrap(), next);
        }
    }

    #[test]
    fn test_completed_only_resolves_to_decision() {
        assert!(S::Completed.transition(S::Selected, None).is_ok());
        assert!(S::Completed.transition(S::Rejected, None).is_ok());
        assert!(S::Completed.transition(S::Cancelled, None).is_err());
        assert!(S::Completed.transition(S::Pending, None).is_err());
    }

    #[test]
    fn test_terminal_states_are_final() {
        for from in [S::Selected, S::Rejected, S::Cancelled] {
            assert!(from.is_terminal());
            for next in [S::Pending, S::Completed, S::Selected, S::Rejected, S::Cancelled] {
                assert!(from.transition(next, None).is_err());
            }
        }
    }

    #[test]
    fn test_status_change_blocked_by_pending_reschedule() {
        assert_eq!(
            S::Pending.transition(S::Completed, Some(RescheduleStatus::Pending)),
            Err(TransitionError::ReschedulePending)
        );
        assert!(S::Pending
            .transition(S::Completed, Some(RescheduleStatus::Accepted))
            .is_ok());
    }

    #[test]
    fn test_application_events_for_outcomes() {
        assert_eq!(
            S::Selected.application_event(None),
            Some(ApplicationEvent::InterviewSelected)
        );
        assert_eq!(
            S::Rejected.application_event(Some("No show")),
            Some(ApplicationEvent::InterviewRejected {
                feedback: Some("No show".to_string())
            })
        );
        assert_eq!(
            S::Cancelled.application_event(None),
            Some(ApplicationEvent::InterviewCancelled)
        );
        assert_eq!(S::Completed.application_event(None), None);
    }

    #[test]
    fn test_reschedule_request_and_accept() {
        let today = day(2026, 3, 1);
        let p = proposal(day(2026, 3, 10), InterviewMode::Online, None);
        let status = RescheduleStatus::request(S::Pending, None, &p, today).unwrap();
        assert_eq!(status, RescheduleStatus::Pending);
        assert_eq!(
            RescheduleStatus::respond(Some(status), RescheduleDecision::Accept).unwrap(),
            Some(RescheduleStatus::Accepted)
        );
    }

    #[test]
    fn test_reschedule_decline_clears_status() {
        assert_eq!(
            RescheduleStatus::respond(Some(RescheduleStatus::Pending), RescheduleDecision::Decline)
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_second_request_after_accept_is_allowed() {
        let today = day(2026, 3, 1);
        let p = proposal(day(2026, 3, 12), InterviewMode::Online, None);
        assert!(
            RescheduleStatus::request(S::Pending, Some(RescheduleStatus::Accepted), &p, today)
                .is_ok()
        );
    }

    #[test]
    fn test_reschedule_rules() {
        let today = day(2026, 3, 1);
        let future = proposal(day(2026, 3, 10), InterviewMode::Online, None);

        assert_eq!(
            RescheduleStatus::request(S::Pending, Some(RescheduleStatus::Pending), &future, today),
            Err(TransitionError::ReschedulePending)
        );
        assert!(matches!(
            RescheduleStatus::request(S::Completed, None, &future, today),
            Err(TransitionError::RescheduleNotAllowed(_))
        ));

        let past = proposal(day(2026, 2, 27), InterviewMode::Online, None);
        assert_eq!(
            RescheduleStatus::request(S::Pending, None, &past, today),
            Err(TransitionError::DateInPast(day(2026, 2, 27)))
        );

        let offline = proposal(day(2026, 3, 10), InterviewMode::Offline, Some("  "));
        assert_eq!(
            RescheduleStatus::request(S::Pending, None, &offline, today),
            Err(TransitionError::LocationRequired)
        );

        assert_eq!(
            RescheduleStatus::respond(None, RescheduleDecision::Accept),
            Err(TransitionError::NoReschedulePending)
        );
    }

    #[test]
    fn test_same_day_proposal_is_allowed() {
        let today = day(2026, 3, 1);
        let p = proposal(today, InterviewMode::Offline, Some("Block C, Room 204"));
        assert!(p.validate(today).is_ok());
    }

    #[test]
    fn test_parse_optional_reschedule() {
        assert_eq!(RescheduleStatus::parse_optional(None).unwrap(), None);
        assert_eq!(
            RescheduleStatus::parse_optional(Some("pending")).unwrap(),
            Some(RescheduleStatus::Pending)
        );
        assert!(RescheduleStatus::parse_optional(Some("rejected")).is_err());
    }
}
