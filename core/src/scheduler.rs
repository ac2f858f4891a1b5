//! The batch scheduler — fixed recurring jobs over the HR store.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Salary alert        (quarterly, guarded inside a daily trigger)
//!   2. Retirement alert    (daily)
//!   3. Insurance report    (monthly, day 1)
//!   4. Contract alert      (daily)
//!   5. Export cleanup      (daily)
//!
//! RULES:
//!   - Jobs run sequentially in registration order, once per date.
//!   - A failing job is logged and skipped; it never stops the others.
//!   - Jobs read the personnel tables; the only writes are email_log rows,
//!     retirement-notice milestones, and export files on disk.
//!   - Every send attempt produces exactly one audit row per recipient
//!     group, with masked addresses.

use crate::{
    cleanup_job::CleanupJob,
    config::HrConfig,
    contract_alert_job::ContractAlertJob,
    error::HrResult,
    export::CsvReportWriter,
    insurance_report_job::InsuranceReportJob,
    mail::{self, EmailLogEntry, Mailer, OutgoingMail},
    notify::{HrNotification, NotificationSender},
    retirement_alert_job::RetirementAlertJob,
    salary_alert_job::SalaryAlertJob,
    store::HrStore,
};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// The contract every scheduled job fulfills.
pub trait ScheduledJob: Send {
    /// Unique stable name, used in logs and error reports.
    fn name(&self) -> &'static str;

    /// Called once per scheduler date. Jobs with coarser cadence
    /// (quarterly, monthly) self-abort unless the date matches.
    fn run(&mut self, today: NaiveDate, ctx: &JobContext<'_>) -> HrResult<()>;
}

/// Everything a job needs for one run.
pub struct JobContext<'a> {
    pub store:      &'a HrStore,
    pub config:     &'a HrConfig,
    pub writer:     &'a CsvReportWriter,
    pub export_dir: &'a Path,
    mailer:         &'a dyn Mailer,
    notifier:       Option<&'a NotificationSender>,
}

impl JobContext<'_> {
    pub fn notify(&self, notification: HrNotification) {
        if let Some(tx) = self.notifier {
            // A departed consumer is not a job failure.
            let _ = tx.send(notification);
        }
    }

    /// Send one message to one recipient group and audit the outcome.
    /// Transport failures are retried, logged, and swallowed — the
    /// return value only reports whether the final attempt succeeded.
    pub fn send_report(
        &self,
        category: &str,
        unit_name: Option<&str>,
        subject: &str,
        body: &str,
        attachments: &[PathBuf],
        recipients: &[String],
    ) -> bool {
        if recipients.is_empty() {
            log::warn!(
                "no recipients configured for {category}{}; skipping send",
                unit_name.map(|u| format!(" ({u})")).unwrap_or_default()
            );
            return false;
        }
        let mail = OutgoingMail {
            subject: subject.to_string(),
            body: body.to_string(),
            attachments: attachments.to_vec(),
            recipients: recipients.to_vec(),
        };
        let outcome = mail::send_with_retry(
            self.mailer,
            &mail,
            self.config.mail_retries,
            self.config.mail_retry_delay,
        );
        let entry = EmailLogEntry::from_outcome(category, unit_name, &mail, &outcome);
        if let Err(e) = self.store.append_email_log(&entry) {
            log::error!("failed to write email audit row for {category}: {e}");
        }
        outcome.ok
    }
}

pub struct Scheduler {
    store:      HrStore,
    config:     HrConfig,
    writer:     CsvReportWriter,
    mailer:     Box<dyn Mailer>,
    export_dir: PathBuf,
    jobs:       Vec<Box<dyn ScheduledJob>>,
    notifier:   Option<NotificationSender>,
}

impl Scheduler {
    pub fn new(
        store: HrStore,
        config: HrConfig,
        mailer: Box<dyn Mailer>,
        export_dir: PathBuf,
    ) -> Self {
        let writer = CsvReportWriter::new(&config.date_format);
        Self {
            store,
            config,
            writer,
            mailer,
            export_dir,
            jobs: Vec::new(),
            notifier: None,
        }
    }

    /// Build a fully wired scheduler with all jobs registered in the
    /// documented execution order. Call this instead of new() + manual
    /// register() calls.
    pub fn build(
        store: HrStore,
        config: HrConfig,
        mailer: Box<dyn Mailer>,
        export_dir: PathBuf,
    ) -> Self {
        let mut scheduler = Scheduler::new(store, config, mailer, export_dir);
        scheduler.register(Box::new(SalaryAlertJob));
        scheduler.register(Box::new(RetirementAlertJob));
        scheduler.register(Box::new(InsuranceReportJob));
        scheduler.register(Box::new(ContractAlertJob));
        scheduler.register(Box::new(CleanupJob));
        scheduler
    }

    /// Attach the consumer side of the notification channel.
    pub fn with_notifier(mut self, tx: NotificationSender) -> Self {
        self.notifier = Some(tx);
        self
    }

    /// Register a job. Call in the documented execution order.
    pub fn register(&mut self, job: Box<dyn ScheduledJob>) {
        self.jobs.push(job);
    }

    pub fn store(&self) -> &HrStore {
        &self.store
    }

    pub fn config(&self) -> &HrConfig {
        &self.config
    }

    /// Run every registered job for one calendar date. Jobs fail open:
    /// an error is logged and the remaining jobs still run.
    pub fn run_for_date(&mut self, today: NaiveDate) {
        if let Err(e) = std::fs::create_dir_all(&self.export_dir) {
            log::error!("cannot create export dir {}: {e}", self.export_dir.display());
            return;
        }
        let Self {
            store,
            config,
            writer,
            mailer,
            export_dir,
            jobs,
            notifier,
        } = self;
        let ctx = JobContext {
            store,
            config,
            writer,
            export_dir,
            mailer: mailer.as_ref(),
            notifier: notifier.as_ref(),
        };
        for job in jobs.iter_mut() {
            log::debug!("running job '{}' for {today}", job.name());
            if let Err(e) = job.run(today, &ctx) {
                log::error!("job '{}' failed for {today}: {e}", job.name());
            }
        }
    }
}
