//! Daily retirement milestone alert.
//!
//! For every active employee with a known date of birth the job computes
//! the statutory retirement date, lazily creating the notice row. An
//! employee enters the 6-month list once the planned date falls within
//! `today + 6 months` and the notice milestone is still open; likewise
//! for the 3-month decision milestone. Milestones are marked only after
//! the report went out, so a failed send (or a skipped scheduler day)
//! simply re-flags the employee on the next run.

use crate::{
    dates::add_months,
    employee::EmployeeFilter,
    error::HrResult,
    export::RetirementRow,
    notify::HrNotification,
    retirement::Milestone,
    scheduler::{JobContext, ScheduledJob},
    types::EmployeeId,
};
use chrono::NaiveDate;

pub struct RetirementAlertJob;

impl ScheduledJob for RetirementAlertJob {
    fn name(&self) -> &'static str {
        "retirement_alert"
    }

    fn run(&mut self, today: NaiveDate, ctx: &JobContext<'_>) -> HrResult<()> {
        let policy = ctx.config.retirement;
        let horizon_six = add_months(today, Milestone::SixMonth.months_ahead());
        let horizon_three = add_months(today, Milestone::ThreeMonth.months_ahead());

        let mut six_month = Vec::new();
        let mut three_month = Vec::new();
        let mut pending: Vec<(EmployeeId, Milestone)> = Vec::new();

        for row in ctx.store.active_employees(EmployeeFilter::default())? {
            let Some(planned) = policy.retirement_date(&row.employee) else {
                continue;
            };
            ctx.store.upsert_retirement_notice(row.employee.id, planned)?;
            let Some(notice) = ctx.store.retirement_notice(row.employee.id)? else {
                continue;
            };

            let make_row = |milestone| RetirementRow {
                employee_code: row.employee.code.clone(),
                full_name: row.employee.full_name.clone(),
                unit_name: row.unit_name.clone(),
                dob: row.employee.dob,
                planned_date: planned,
                milestone,
            };
            if planned <= horizon_six && !notice.milestone_done(Milestone::SixMonth) {
                six_month.push(make_row(Milestone::SixMonth));
                pending.push((row.employee.id, Milestone::SixMonth));
            }
            if planned <= horizon_three && !notice.milestone_done(Milestone::ThreeMonth) {
                three_month.push(make_row(Milestone::ThreeMonth));
                pending.push((row.employee.id, Milestone::ThreeMonth));
            }
        }

        if six_month.is_empty() && three_month.is_empty() {
            return Ok(());
        }

        let path = ctx
            .export_dir
            .join(format!("retirement_{}.csv", today.format("%Y%m%d")));
        ctx.writer.write_retirement_report(&six_month, &three_month, &path)?;

        let subject = format!(
            "Thông báo nghỉ hưu: {} trường hợp 6 tháng, {} trường hợp 3 tháng",
            six_month.len(),
            three_month.len()
        );
        let body = six_month
            .iter()
            .chain(&three_month)
            .map(|r| {
                format!(
                    "{} - {} ({}) nghỉ hưu ngày {}",
                    r.employee_code, r.full_name, r.unit_name, r.planned_date
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let sent = ctx.send_report(
            "retirement",
            None,
            &subject,
            &body,
            std::slice::from_ref(&path),
            &ctx.config.summary_recipients,
        );

        // Without any configured recipients the export alone completes
        // the milestone; otherwise marking waits for a successful send.
        if sent || ctx.config.summary_recipients.is_empty() {
            for (employee_id, milestone) in pending {
                ctx.store.mark_milestone_done(employee_id, milestone, today)?;
            }
            for row in six_month.iter().chain(&three_month) {
                ctx.notify(HrNotification::RetirementMilestone {
                    employee_code: row.employee_code.clone(),
                    full_name: row.full_name.clone(),
                    milestone: row.milestone,
                    planned_date: row.planned_date,
                });
            }
        }
        Ok(())
    }
}
