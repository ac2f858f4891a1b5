//! Quarterly salary-increase alert.
//!
//! Fires only on day 15 of months 2, 5, 8 and 11 — the job is triggered
//! daily and self-aborts on every other date. On a match it scans the
//! current quarter's window and, when anyone is due:
//!   (a) emits a notification event,
//!   (b) mails a summary with the global report attached,
//!   (c) exports and mails one report per organizational unit,
//!   (d) optionally bundles the per-unit files into one ZIP for the
//!       summary address (SEND_SUMMARY_ZIP).
//!
//! One unit's export or send failure never aborts the remaining units.

use crate::{
    dates::quarter_window,
    employee::{EmployeeFilter, Unit},
    error::HrResult,
    export::file_slug,
    notify::HrNotification,
    scanner::{self, DueItem},
    scheduler::{JobContext, ScheduledJob},
};
use chrono::{Datelike, NaiveDate};
use std::path::PathBuf;

const ALERT_DAY: u32 = 15;
const ALERT_MONTHS: [u32; 4] = [2, 5, 8, 11];

pub struct SalaryAlertJob;

impl SalaryAlertJob {
    fn export_and_send_unit(
        &self,
        ctx: &JobContext<'_>,
        unit: &Unit,
        items: &[DueItem],
        label: &str,
        subject: &str,
    ) -> HrResult<PathBuf> {
        let path = ctx
            .export_dir
            .join(format!("salary_due_{label}_{}.csv", file_slug(&unit.name)));
        ctx.writer.write_salary_due_report(items, &path)?;

        let recipients = ctx.config.unit_recipients(unit);
        let body = format_due_lines(items);
        ctx.send_report(
            "salary_due",
            Some(&unit.name),
            subject,
            &body,
            std::slice::from_ref(&path),
            &recipients,
        );
        Ok(path)
    }
}

impl ScheduledJob for SalaryAlertJob {
    fn name(&self) -> &'static str {
        "salary_alert"
    }

    fn run(&mut self, today: NaiveDate, ctx: &JobContext<'_>) -> HrResult<()> {
        if today.day() != ALERT_DAY || !ALERT_MONTHS.contains(&today.month()) {
            return Ok(());
        }

        let (start, end) = quarter_window(today);
        let items =
            scanner::list_due_in_window(ctx.store, start, end, EmployeeFilter::default())?;
        if items.is_empty() {
            log::info!("salary alert: nobody due in {start}..{end}");
            return Ok(());
        }

        ctx.notify(HrNotification::SalaryDueFound {
            window_start: start,
            window_end: end,
            count: items.len(),
        });

        let quarter = (today.month() - 1) / 3 + 1;
        let label = format!("{}q{}", today.year(), quarter);
        let subject = format!(
            "Thông báo nâng lương quý {quarter}/{}: {} hồ sơ đến hạn",
            today.year(),
            items.len()
        );
        let body = format_due_lines(&items);

        let global_path = ctx.export_dir.join(format!("salary_due_{label}.csv"));
        ctx.writer.write_salary_due_report(&items, &global_path)?;
        ctx.send_report(
            "salary_due",
            None,
            &subject,
            &body,
            std::slice::from_ref(&global_path),
            &ctx.config.summary_recipients,
        );

        let mut unit_files = Vec::new();
        for unit in ctx.store.units()? {
            let unit_items: Vec<DueItem> = items
                .iter()
                .filter(|i| i.unit_name == unit.name)
                .cloned()
                .collect();
            if unit_items.is_empty() {
                continue;
            }
            match self.export_and_send_unit(ctx, &unit, &unit_items, &label, &subject) {
                Ok(path) => unit_files.push(path),
                Err(e) => log::error!("salary alert: unit '{}' failed: {e}", unit.name),
            }
        }

        if ctx.config.send_summary_zip && !unit_files.is_empty() {
            let zip_path = ctx.export_dir.join(format!("salary_due_{label}_units.zip"));
            ctx.writer.bundle_zip(&unit_files, &zip_path)?;
            ctx.send_report(
                "salary_due_zip",
                None,
                &format!("Báo cáo nâng lương theo đơn vị quý {quarter}/{}", today.year()),
                &format!("{} báo cáo đơn vị đính kèm.", unit_files.len()),
                std::slice::from_ref(&zip_path),
                &ctx.config.summary_recipients,
            );
        }
        Ok(())
    }
}

fn format_due_lines(items: &[DueItem]) -> String {
    items
        .iter()
        .map(|i| {
            format!(
                "{} - {} ({}) đến hạn {}",
                i.employee_code, i.full_name, i.unit_name, i.decision.due_date
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
