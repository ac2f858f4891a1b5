//! Mail transport seam.
//!
//! The engine only knows the `Mailer` trait. Production runs use the
//! lettre-backed SMTP transport; dry runs use `LogMailer`; tests inject
//! their own. Retry is a single operation returning one outcome with
//! attempt metadata — intermediate failures are never audited
//! individually, only the final result produces an email_log row.

use crate::error::{HrError, HrResult};
use chrono::NaiveDateTime;
use lettre::{
    message::{header::ContentType, Attachment, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    Message, SmtpTransport, Transport,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

/// Longest error text persisted to the audit log.
const MAX_ERROR_CHARS: usize = 512;

#[derive(Debug, Clone)]
pub struct OutgoingMail {
    pub subject:     String,
    pub body:        String,
    pub attachments: Vec<PathBuf>,
    pub recipients:  Vec<String>,
}

pub trait Mailer: Send {
    fn send(&self, mail: &OutgoingMail) -> HrResult<()>;
}

/// Result of one `send_with_retry` call. Exactly one of these per
/// recipient group reaches the audit log.
#[derive(Debug, Clone)]
pub struct MailOutcome {
    pub ok:          bool,
    pub attempts:    u32,
    pub total_delay: Duration,
    pub error:       Option<String>,
}

/// Try up to `retries` times with a fixed sleep between attempts.
/// No backoff curve — the delay is a plain sleep, matching the
/// transport's own timeouts for anything longer.
pub fn send_with_retry(
    mailer: &dyn Mailer,
    mail: &OutgoingMail,
    retries: u32,
    delay: Duration,
) -> MailOutcome {
    let max_attempts = retries.max(1);
    let mut total_delay = Duration::ZERO;
    let mut last_error = None;
    for attempt in 1..=max_attempts {
        match mailer.send(mail) {
            Ok(()) => {
                return MailOutcome {
                    ok: true,
                    attempts: attempt,
                    total_delay,
                    error: None,
                }
            }
            Err(e) => {
                log::warn!(
                    "mail send attempt {attempt}/{max_attempts} failed ({}): {e}",
                    mail.subject
                );
                last_error = Some(e.to_string());
                if attempt < max_attempts {
                    std::thread::sleep(delay);
                    total_delay += delay;
                }
            }
        }
    }
    MailOutcome {
        ok: false,
        attempts: max_attempts,
        total_delay,
        error: last_error,
    }
}

/// Mask an address for the audit log: local part reduced to its first
/// character, domain retained.
pub fn mask_email(address: &str) -> String {
    match address.split_once('@') {
        Some((local, domain)) => {
            let head = local.chars().next().map(String::from).unwrap_or_default();
            format!("{head}***@{domain}")
        }
        None => "***".to_string(),
    }
}

// ── Audit entry ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SendStatus {
    Sent,
    Failed,
}

impl SendStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SendStatus::Sent => "sent",
            SendStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<SendStatus> {
        match s {
            "sent" => Some(SendStatus::Sent),
            "failed" => Some(SendStatus::Failed),
            _ => None,
        }
    }
}

/// One audit row per send attempt (per recipient group). Recipients are
/// masked before the entry is built; raw addresses never reach the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailLogEntry {
    pub id:          String,
    pub category:    String,
    pub unit_name:   Option<String>,
    pub recipients:  String,
    pub subject:     String,
    pub body:        String,
    pub attachments: String,
    pub status:      SendStatus,
    pub error:       Option<String>,
    pub attempts:    u32,
    pub sent_at:     NaiveDateTime,
}

impl EmailLogEntry {
    pub fn from_outcome(
        category: &str,
        unit_name: Option<&str>,
        mail: &OutgoingMail,
        outcome: &MailOutcome,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            category: category.to_string(),
            unit_name: unit_name.map(str::to_string),
            recipients: mail
                .recipients
                .iter()
                .map(|r| mask_email(r))
                .collect::<Vec<_>>()
                .join(";"),
            subject: mail.subject.clone(),
            body: mail.body.clone(),
            attachments: mail
                .attachments
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(";"),
            status: if outcome.ok {
                SendStatus::Sent
            } else {
                SendStatus::Failed
            },
            error: outcome
                .error
                .as_ref()
                .map(|e| e.chars().take(MAX_ERROR_CHARS).collect()),
            attempts: outcome.attempts,
            sent_at: chrono::Utc::now().naive_utc(),
        }
    }
}

// ── Transports ───────────────────────────────────────────────────────────────

/// Dry-run transport: logs the message and reports success.
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, mail: &OutgoingMail) -> HrResult<()> {
        log::info!(
            "dry-run mail '{}' to {} recipient(s), {} attachment(s)",
            mail.subject,
            mail.recipients.len(),
            mail.attachments.len()
        );
        Ok(())
    }
}

/// Blocking SMTP transport over lettre.
pub struct SmtpMailer {
    pub host:        String,
    pub port:        u16,
    pub from:        String,
    pub credentials: Option<(String, String)>,
}

impl Mailer for SmtpMailer {
    fn send(&self, mail: &OutgoingMail) -> HrResult<()> {
        let from: Mailbox = self
            .from
            .parse()
            .map_err(|e| HrError::Mail(format!("bad sender '{}': {e}", self.from)))?;
        let mut builder = Message::builder().from(from).subject(mail.subject.clone());
        for recipient in &mail.recipients {
            let to: Mailbox = recipient
                .parse()
                .map_err(|e| HrError::Mail(format!("bad recipient '{recipient}': {e}")))?;
            builder = builder.to(to);
        }

        let mut parts = MultiPart::mixed().singlepart(SinglePart::plain(mail.body.clone()));
        for path in &mail.attachments {
            let bytes = std::fs::read(path)?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "attachment".to_string());
            let content_type = ContentType::parse("application/octet-stream")
                .map_err(|e| HrError::Mail(e.to_string()))?;
            parts = parts.singlepart(Attachment::new(name).body(bytes, content_type));
        }

        let message = builder
            .multipart(parts)
            .map_err(|e| HrError::Mail(e.to_string()))?;

        let mut transport = SmtpTransport::builder_dangerous(&self.host).port(self.port);
        if let Some((user, pass)) = &self.credentials {
            transport = transport.credentials(Credentials::new(user.clone(), pass.clone()));
        }
        transport
            .build()
            .send(&message)
            .map_err(|e| HrError::Mail(e.to_string()))?;
        Ok(())
    }
}
