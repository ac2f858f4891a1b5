//! Daily export-directory cleanup.
//!
//! Removes report files whose age meets or exceeds EXPORT_TTL_DAYS.
//! Subdirectories are left alone; a file that cannot be removed is
//! logged and skipped.

use crate::{
    error::HrResult,
    notify::HrNotification,
    scheduler::{JobContext, ScheduledJob},
};
use chrono::NaiveDate;
use std::time::{Duration, SystemTime};

pub struct CleanupJob;

impl ScheduledJob for CleanupJob {
    fn name(&self) -> &'static str {
        "export_cleanup"
    }

    fn run(&mut self, _today: NaiveDate, ctx: &JobContext<'_>) -> HrResult<()> {
        let ttl = Duration::from_secs(86_400 * ctx.config.export_ttl_days.max(0) as u64);
        let now = SystemTime::now();
        let mut removed = 0usize;

        for entry in std::fs::read_dir(ctx.export_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let modified = match entry.metadata().and_then(|m| m.modified()) {
                Ok(t) => t,
                Err(e) => {
                    log::warn!("cleanup: cannot stat {}: {e}", entry.path().display());
                    continue;
                }
            };
            let age = now.duration_since(modified).unwrap_or_default();
            if age >= ttl {
                match std::fs::remove_file(entry.path()) {
                    Ok(()) => removed += 1,
                    Err(e) => log::warn!(
                        "cleanup: cannot remove {}: {e}",
                        entry.path().display()
                    ),
                }
            }
        }

        if removed > 0 {
            log::info!("cleanup: removed {removed} expired export file(s)");
            ctx.notify(HrNotification::ExportsCleaned { removed });
        }
        Ok(())
    }
}
