use super::{date_to_sql, sql_date, sql_enum_err, HrStore};
use crate::{
    classify::RankLevel,
    error::HrResult,
    salary::{SalaryEventRow, SalaryGrade, SalaryHistory, SalaryStep},
    types::{EmployeeId, GradeId, UnitId},
};
use rusqlite::{params, OptionalExtension};

impl HrStore {
    // ── Reference data ────────────────────────────────────────────

    pub fn insert_grade(
        &self,
        code: &str,
        name: &str,
        level: Option<RankLevel>,
        level_note: &str,
    ) -> HrResult<GradeId> {
        self.conn().execute(
            "INSERT INTO salary_grade (code, name, level, level_note) VALUES (?1, ?2, ?3, ?4)",
            params![code, name, level.map(|l| l.as_str()), level_note],
        )?;
        Ok(self.conn().last_insert_rowid())
    }

    pub fn insert_step(&self, step: &SalaryStep) -> HrResult<()> {
        self.conn().execute(
            "INSERT INTO salary_step (grade_id, step_no, coefficient, min_months)
             VALUES (?1, ?2, ?3, ?4)",
            params![step.grade_id, step.step_no, step.coefficient, step.min_months],
        )?;
        Ok(())
    }

    pub fn grade(&self, grade_id: GradeId) -> HrResult<Option<SalaryGrade>> {
        self.conn()
            .query_row(
                "SELECT id, code, name, level, level_note FROM salary_grade WHERE id = ?1",
                params![grade_id],
                |row| {
                    let level_raw: Option<String> = row.get(3)?;
                    let level = level_raw
                        .map(|s| RankLevel::parse(&s).ok_or_else(|| sql_enum_err(3, &s)))
                        .transpose()?;
                    Ok(SalaryGrade {
                        id: row.get(0)?,
                        code: row.get(1)?,
                        name: row.get(2)?,
                        level,
                        level_note: row.get(4)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn salary_step(&self, grade_id: GradeId, step_no: u32) -> HrResult<Option<SalaryStep>> {
        self.conn()
            .query_row(
                "SELECT grade_id, step_no, coefficient, min_months
                 FROM salary_step WHERE grade_id = ?1 AND step_no = ?2",
                params![grade_id, step_no],
                |row| {
                    Ok(SalaryStep {
                        grade_id: row.get(0)?,
                        step_no: row.get(1)?,
                        coefficient: row.get(2)?,
                        min_months: row.get(3)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    /// Highest step number defined for the grade; 0 when the grade has
    /// no steps at all.
    pub fn max_step(&self, grade_id: GradeId) -> HrResult<u32> {
        let max: Option<u32> = self.conn().query_row(
            "SELECT MAX(step_no) FROM salary_step WHERE grade_id = ?1",
            params![grade_id],
            |row| row.get(0),
        )?;
        Ok(max.unwrap_or(0))
    }

    // ── History (append-only) ─────────────────────────────────────

    pub fn append_salary_history(&self, h: &SalaryHistory) -> HrResult<i64> {
        self.conn().execute(
            "INSERT INTO salary_history (
                employee_id, grade_id, step_no, coefficient, effective_date, note
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                h.employee_id,
                h.grade_id,
                h.step_no,
                h.coefficient,
                date_to_sql(h.effective_date),
                h.note,
            ],
        )?;
        Ok(self.conn().last_insert_rowid())
    }

    /// The row with the greatest effective_date defines the employee's
    /// current grade, step, and coefficient.
    pub fn latest_salary_history(
        &self,
        employee_id: EmployeeId,
    ) -> HrResult<Option<SalaryHistory>> {
        self.conn()
            .query_row(
                "SELECT id, employee_id, grade_id, step_no, coefficient, effective_date, note
                 FROM salary_history WHERE employee_id = ?1
                 ORDER BY effective_date DESC, id DESC LIMIT 1",
                params![employee_id],
                |row| {
                    Ok(SalaryHistory {
                        id: row.get(0)?,
                        employee_id: row.get(1)?,
                        grade_id: row.get(2)?,
                        step_no: row.get(3)?,
                        coefficient: row.get(4)?,
                        effective_date: sql_date(5, row.get(5)?)?,
                        note: row.get(6)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    /// Salary assignment events effective inside `[start, end]`, joined
    /// with employee display fields. Feeds the monthly insurance report.
    pub fn salary_events_in_range(
        &self,
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
        unit_id: Option<UnitId>,
    ) -> HrResult<Vec<SalaryEventRow>> {
        let mut sql = String::from(
            "SELECT e.code, e.full_name, u.name, g.code, h.step_no, h.coefficient,
                    h.effective_date, h.note
             FROM salary_history h
             JOIN employee e ON e.id = h.employee_id
             JOIN unit u ON u.id = e.unit_id
             JOIN salary_grade g ON g.id = h.grade_id
             WHERE h.effective_date >= ?1 AND h.effective_date <= ?2",
        );
        let mut args: Vec<Box<dyn rusqlite::ToSql>> = vec![
            Box::new(date_to_sql(start)),
            Box::new(date_to_sql(end)),
        ];
        if let Some(unit_id) = unit_id {
            args.push(Box::new(unit_id));
            sql.push_str(" AND e.unit_id = ?3");
        }
        sql.push_str(" ORDER BY h.effective_date ASC, h.id ASC");

        let mut stmt = self.conn().prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(args), |row| {
                Ok(SalaryEventRow {
                    employee_code: row.get(0)?,
                    full_name: row.get(1)?,
                    unit_name: row.get(2)?,
                    grade_code: row.get(3)?,
                    step_no: row.get(4)?,
                    coefficient: row.get(5)?,
                    effective_date: sql_date(6, row.get(6)?)?,
                    note: row.get(7)?,
                })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
