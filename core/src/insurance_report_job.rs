//! Monthly social-insurance (BHXH) report.
//!
//! Runs on day 1 of each month over the previous calendar month's salary
//! assignment events. The global report always goes out; per-unit reports
//! only for units that actually had changes. A failing unit is logged and
//! the remaining units still processed.

use crate::{
    error::HrResult,
    export::file_slug,
    notify::HrNotification,
    scheduler::{JobContext, ScheduledJob},
};
use chrono::NaiveDate;

pub struct InsuranceReportJob;

impl ScheduledJob for InsuranceReportJob {
    fn name(&self) -> &'static str {
        "insurance_report"
    }

    fn run(&mut self, today: NaiveDate, ctx: &JobContext<'_>) -> HrResult<()> {
        if chrono::Datelike::day(&today) != 1 {
            return Ok(());
        }

        let (start, end) = crate::dates::previous_month_window(today);
        let rows = ctx.store.salary_events_in_range(start, end, None)?;
        let label = start.format("%Y%m").to_string();

        let global_path = ctx.export_dir.join(format!("insurance_{label}.csv"));
        ctx.writer.write_insurance_report(&rows, &global_path)?;
        ctx.notify(HrNotification::InsuranceReportReady {
            period_start: start,
            period_end: end,
            path: global_path.display().to_string(),
        });

        let subject = format!("Báo cáo BHXH tháng {}: {} biến động", start.format("%m/%Y"), rows.len());
        let body = format!(
            "Biến động lương kỳ {} đến {}: {} dòng, chi tiết trong tệp đính kèm.",
            start, end, rows.len()
        );
        ctx.send_report(
            "insurance",
            None,
            &subject,
            &body,
            std::slice::from_ref(&global_path),
            &ctx.config.summary_recipients,
        );

        for unit in ctx.store.units()? {
            let result = (|| -> HrResult<()> {
                let unit_rows = ctx.store.salary_events_in_range(start, end, Some(unit.id))?;
                if unit_rows.is_empty() {
                    return Ok(());
                }
                let path = ctx
                    .export_dir
                    .join(format!("insurance_{label}_{}.csv", file_slug(&unit.name)));
                ctx.writer.write_insurance_report(&unit_rows, &path)?;
                ctx.send_report(
                    "insurance",
                    Some(&unit.name),
                    &subject,
                    &body,
                    std::slice::from_ref(&path),
                    &ctx.config.unit_recipients(&unit),
                );
                Ok(())
            })();
            if let Err(e) = result {
                log::error!("insurance report: unit '{}' failed: {e}", unit.name);
            }
        }
        Ok(())
    }
}
