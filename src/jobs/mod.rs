//! Background job definitions and handlers.

pub mod email_job;

pub use email_job::{email_job_handler, EmailJob};
