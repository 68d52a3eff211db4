//! Colleges, profiles, job postings, applications and interviews.
//!
//! Each submodule loads rows, asks `lifecycle` for the next status, checks the
//! actor against `access`, and writes the change with a compare-and-set update.
//! Multi-row transitions share one transaction; emails go out after commit.

pub mod access;
pub mod applications;
pub mod colleges;
pub mod handlers;
pub mod interviews;
pub mod jobs;
pub mod profiles;

use chrono::{NaiveDate, Utc};

pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub(crate) fn concurrent_update(entity: &str) -> crate::errors::AppError {
    crate::errors::AppError::Conflict(format!(
        "{entity} was changed by someone else; reload and try again"
    ))
}
