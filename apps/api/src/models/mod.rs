pub mod application;
pub mod college;
pub mod interview;
pub mod job;
pub mod profile;
pub mod report;
