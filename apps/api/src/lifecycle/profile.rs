use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::TransitionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Alumni,
    College,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Alumni => "alumni",
            Role::College => "college",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = TransitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            // Startup accounts post jobs exactly like alumni.
            "alumni" | "startup" => Ok(Role::Alumni),
            "college" => Ok(Role::College),
            "admin" => Ok(Role::Admin),
            other => Err(TransitionError::unknown("role", other)),
        }
    }
}

/// Alumni accounts must be verified before they can post jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Pending,
    Verified,
    Rejected,
}

impl VerificationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Rejected => "rejected",
        }
    }

    pub fn decide(
        self,
        decision: VerificationDecision,
    ) -> Result<VerificationStatus, TransitionError> {
        match (self, decision) {
            (VerificationStatus::Pending, VerificationDecision::Verify) => {
                Ok(VerificationStatus::Verified)
            }
            (VerificationStatus::Pending, VerificationDecision::Reject) => {
                Ok(VerificationStatus::Rejected)
            }
            (from, decision) => Err(TransitionError::invalid(
                "verification",
                from,
                decision.as_str(),
            )),
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerificationStatus {
    type Err = TransitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(VerificationStatus::Pending),
            "verified" | "approved" => Ok(VerificationStatus::Verified),
            "rejected" => Ok(VerificationStatus::Rejected),
            other => Err(TransitionError::unknown("verification", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationDecision {
    Verify,
    Reject,
}

impl VerificationDecision {
    pub fn as_str(self) -> &'static str {
        match self {
            VerificationDecision::Verify => "verify",
            VerificationDecision::Reject => "reject",
        }
    }
}
