use super::{date_to_sql, sql_date_opt, sql_enum_err, HrStore};
use crate::{
    employee::{Employee, EmployeeFilter, EmployeeRow, Position, Unit},
    error::HrResult,
    types::{EmployeeId, Gender, PositionId, UnitId, WorkStatus},
};
use rusqlite::params;

impl HrStore {
    // ── Units and positions ───────────────────────────────────────

    pub fn insert_unit(&self, name: &str, email: Option<&str>) -> HrResult<UnitId> {
        self.conn().execute(
            "INSERT INTO unit (name, email) VALUES (?1, ?2)",
            params![name, email],
        )?;
        Ok(self.conn().last_insert_rowid())
    }

    pub fn insert_position(&self, name: &str) -> HrResult<PositionId> {
        self.conn()
            .execute("INSERT INTO position (name) VALUES (?1)", params![name])?;
        Ok(self.conn().last_insert_rowid())
    }

    pub fn units(&self) -> HrResult<Vec<Unit>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT id, name, email FROM unit ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok(Unit {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn positions(&self) -> HrResult<Vec<Position>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT id, name FROM position ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok(Position {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    // ── Employees ─────────────────────────────────────────────────

    pub fn insert_employee(&self, e: &Employee) -> HrResult<EmployeeId> {
        self.conn().execute(
            "INSERT INTO employee (
                code, full_name, dob, gender, unit_id, position_id, status, insurance_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                &e.code,
                &e.full_name,
                e.dob.map(date_to_sql),
                e.gender.as_str(),
                e.unit_id,
                e.position_id,
                e.status.as_str(),
                e.insurance_date.map(date_to_sql),
            ],
        )?;
        Ok(self.conn().last_insert_rowid())
    }

    /// Active roster with denormalized unit/position names, optionally
    /// filtered. Ordered by employee id for a stable scan order.
    pub fn active_employees(&self, filter: EmployeeFilter) -> HrResult<Vec<EmployeeRow>> {
        let mut sql = String::from(
            "SELECT e.id, e.code, e.full_name, e.dob, e.gender, e.unit_id,
                    e.position_id, e.status, e.insurance_date, u.name, p.name
             FROM employee e
             JOIN unit u ON u.id = e.unit_id
             JOIN position p ON p.id = e.position_id
             WHERE e.status = 'active'",
        );
        let mut args: Vec<i64> = Vec::new();
        if let Some(unit_id) = filter.unit_id {
            args.push(unit_id);
            sql.push_str(&format!(" AND e.unit_id = ?{}", args.len()));
        }
        if let Some(position_id) = filter.position_id {
            args.push(position_id);
            sql.push_str(&format!(" AND e.position_id = ?{}", args.len()));
        }
        sql.push_str(" ORDER BY e.id ASC");

        let mut stmt = self.conn().prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(args), |row| {
            let gender_raw: String = row.get(4)?;
            let status_raw: String = row.get(7)?;
            Ok(EmployeeRow {
                employee: Employee {
                    id: row.get(0)?,
                    code: row.get(1)?,
                    full_name: row.get(2)?,
                    dob: sql_date_opt(3, row.get(3)?)?,
                    gender: Gender::parse(&gender_raw).ok_or_else(|| sql_enum_err(4, &gender_raw))?,
                    unit_id: row.get(5)?,
                    position_id: row.get(6)?,
                    status: WorkStatus::parse(&status_raw)
                        .ok_or_else(|| sql_enum_err(7, &status_raw))?,
                    insurance_date: sql_date_opt(8, row.get(8)?)?,
                },
                unit_name: row.get(9)?,
                position_name: row.get(10)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
