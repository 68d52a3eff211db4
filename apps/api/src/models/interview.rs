use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::lifecycle::{
    InterviewMode, InterviewStatus, RescheduleProposal, RescheduleStatus, TransitionError,
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InterviewRow {
    pub id: Uuid,
    pub application_id: Uuid,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: NaiveTime,
    pub mode: String,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub status: String,
    pub feedback: Option<String>,
    pub requested_date: Option<NaiveDate>,
    pub requested_time: Option<NaiveTime>,
    pub requested_mode: Option<String>,
    pub requested_location: Option<String>,
    pub reschedule_reason: Option<String>,
    pub reschedule_status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InterviewRow {
    pub fn status(&self) -> Result<InterviewStatus, TransitionError> {
        self.status.parse()
    }

    pub fn reschedule_status(&self) -> Result<Option<RescheduleStatus>, TransitionError> {
        RescheduleStatus::parse_optional(self.reschedule_status.as_deref())
    }

    /// The currently booked slot.
    pub fn slot(&self) -> Result<RescheduleProposal, TransitionError> {
        Ok(RescheduleProposal {
            date: self.scheduled_date,
            time: self.scheduled_time,
            mode: self.mode.parse()?,
            location: self.location.clone(),
        })
    }

    /// The slot the student asked for, if a request has been recorded.
    pub fn requested_slot(&self) -> Result<Option<RescheduleProposal>, TransitionError> {
        match (self.requested_date, self.requested_time, &self.requested_mode) {
            (Some(date), Some(time), Some(mode)) => Ok(Some(RescheduleProposal {
                date,
                time,
                mode: mode.parse::<InterviewMode>()?,
                location: self.requested_location.clone(),
            })),
            _ => Ok(None),
        }
    }
}

/// Everything needed to address an interview email, loaded in one query.
#[derive(Debug, Clone, FromRow)]
pub struct InterviewContextRow {
    pub interview_id: Uuid,
    pub application_id: Uuid,
    pub job_id: Uuid,
    pub job_title: String,
    pub company: String,
    pub alumni_id: Uuid,
    pub student_id: Uuid,
    pub student_name: String,
    pub student_email: String,
}
