use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::TransitionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Approved,
    Rejected,
    Closed,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Approved => "approved",
            JobStatus::Rejected => "rejected",
            JobStatus::Closed => "closed",
        }
    }

    /// Students only see, and can only apply to, approved jobs.
    pub fn accepts_applications(self) -> bool {
        self == JobStatus::Approved
    }

    /// College or platform review of a newly posted job.
    pub fn review(self, review: JobReview) -> Result<JobStatus, TransitionError> {
        match (self, review) {
            (JobStatus::Pending, JobReview::Approve) => Ok(JobStatus::Approved),
            (JobStatus::Pending, JobReview::Reject) => Ok(JobStatus::Rejected),
            (from, review) => Err(TransitionError::invalid("job", from, review.as_str())),
        }
    }

    pub fn close(self) -> Result<JobStatus, TransitionError> {
        match self {
            JobStatus::Approved => Ok(JobStatus::Closed),
            from => Err(TransitionError::invalid("job", from, "close")),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = TransitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(JobStatus::Pending),
            "approved" => Ok(JobStatus::Approved),
            "rejected" => Ok(JobStatus::Rejected),
            "closed" => Ok(JobStatus::Closed),
            other => Err(TransitionError::unknown("job", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobReview {
    Approve,
    Reject,
}

impl JobReview {
    pub fn as_str(self) -> &'static str {
        match self {
            JobReview::Approve => "approve",
            JobReview::Reject => "reject",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_pending_job() {
        assert_eq!(
            JobStatus::Pending.review(JobReview::Approve).unwrap(),
            JobStatus::Approved
        );
        assert_eq!(
            JobStatus::Pending.review(JobReview::Reject).unwrap(),
            JobStatus::Rejected
        );
    }

    #[test]
    fn test_review_is_one_shot() {
        assert!(JobStatus::Approved.review(JobReview::Reject).is_err());
        assert!(JobStatus::Rejected.review(JobReview::Approve).is_err());
        assert!(JobStatus::Closed.review(JobReview::Approve).is_err());
    }

    #[test]
    fn test_only_approved_jobs_close() {
        assert_eq!(JobStatus::Approved.close().unwrap(), JobStatus::Closed);
        assert!(JobStatus::Pending.close().is_err());
        assert!(JobStatus::Closed.close().is_err());
    }

    #[test]
    fn test_visibility() {
        assert!(JobStatus::Approved.accepts_applications());
        assert!(!JobStatus::Pending.accepts_applications());
        assert!(!JobStatus::Closed.accepts_applications());
    }
}
