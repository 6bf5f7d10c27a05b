//! Email background job.
//!
//! Activation emails are queued by the registration flow and processed
//! here by the worker. Without SMTP settings the handler logs the full
//! message instead, which keeps activation links visible on a dev
//! console.

use serde::{Deserialize, Serialize};
use std::env;

use crate::errors::AppError;

/// Queued email payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailJob {
    /// Recipient address
    pub to: String,
    /// Subject line
    pub subject: String,
    /// Plain text body
    pub body: String,
    /// Sender override; `SMTP_FROM` applies when absent
    #[serde(default)]
    pub from: Option<String>,
}

impl EmailJob {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            from: None,
        }
    }
}

/// Mail settings from the environment; an unset `SMTP_HOST` selects
/// dev mode.
struct EmailConfig {
    smtp_host: Option<String>,
    smtp_port: u16,
    smtp_user: Option<String>,
    smtp_pass: Option<String>,
    smtp_from: String,
    smtp_tls: bool,
}

impl EmailConfig {
    fn from_env() -> Self {
        Self {
            smtp_host: env::var("SMTP_HOST").ok(),
            smtp_port: env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(587),
            smtp_user: env::var("SMTP_USER").ok(),
            smtp_pass: env::var("SMTP_PASS").ok(),
            smtp_from: env::var("SMTP_FROM").unwrap_or_else(|_| "noreply@fintrack.app".to_string()),
            smtp_tls: env::var("SMTP_TLS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
        }
    }
}

/// Worker handler draining the activation email queue
pub async fn email_job_handler(job: EmailJob) -> Result<(), AppError> {
    let config = EmailConfig::from_env();
    let from = job.from.as_deref().unwrap_or(&config.smtp_from);

    tracing::info!(
        to = %job.to,
        from = %from,
        subject = %job.subject,
        "Processing email job"
    );

    match &config.smtp_host {
        None => {
            // Dev mode: print the message so the activation link is usable
            tracing::info!(
                "=== EMAIL (dev mode, not sent) ===\n\
                 From: {}\n\
                 To: {}\n\
                 Subject: {}\n\
                 Body:\n{}\n\
                 ==================================",
                from,
                job.to,
                job.subject,
                job.body
            );
        }
        Some(host) => {
            // Wire a transport such as lettre here when delivery is needed
            tracing::warn!(
                to = %job.to,
                host = %host,
                port = config.smtp_port,
                tls = config.smtp_tls,
                authenticated = config.smtp_user.is_some() && config.smtp_pass.is_some(),
                "No mail transport is wired; message dropped after logging"
            );
        }
    }

    Ok(())
}
