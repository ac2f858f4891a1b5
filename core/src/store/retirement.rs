use super::{date_to_sql, sql_date, sql_date_opt, HrStore};
use crate::{
    error::HrResult,
    retirement::{Milestone, RetirementNotice},
    types::EmployeeId,
};
use rusqlite::{params, OptionalExtension};

impl HrStore {
    /// Create the notice row on first computation; refresh the planned
    /// date if the policy has changed since it was first written.
    pub fn upsert_retirement_notice(
        &self,
        employee_id: EmployeeId,
        planned_date: chrono::NaiveDate,
    ) -> HrResult<()> {
        self.conn().execute(
            "INSERT INTO retirement_notice (employee_id, planned_date) VALUES (?1, ?2)
             ON CONFLICT(employee_id) DO UPDATE SET planned_date = excluded.planned_date",
            params![employee_id, date_to_sql(planned_date)],
        )?;
        Ok(())
    }

    pub fn retirement_notice(
        &self,
        employee_id: EmployeeId,
    ) -> HrResult<Option<RetirementNotice>> {
        self.conn()
            .query_row(
                "SELECT employee_id, planned_date, notice_date, decision_date
                 FROM retirement_notice WHERE employee_id = ?1",
                params![employee_id],
                |row| {
                    Ok(RetirementNotice {
                        employee_id: row.get(0)?,
                        planned_date: sql_date(1, row.get(1)?)?,
                        notice_date: sql_date_opt(2, row.get(2)?)?,
                        decision_date: sql_date_opt(3, row.get(3)?)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    /// Record that a milestone was processed on `date`. At most once per
    /// employee per milestone: a non-null column is never overwritten.
    pub fn mark_milestone_done(
        &self,
        employee_id: EmployeeId,
        milestone: Milestone,
        date: chrono::NaiveDate,
    ) -> HrResult<()> {
        let column = match milestone {
            Milestone::SixMonth => "notice_date",
            Milestone::ThreeMonth => "decision_date",
        };
        self.conn().execute(
            &format!(
                "UPDATE retirement_notice SET {column} = ?1
                 WHERE employee_id = ?2 AND {column} IS NULL"
            ),
            params![date_to_sql(date), employee_id],
        )?;
        Ok(())
    }
}
