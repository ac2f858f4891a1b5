use super::{date_to_sql, sql_date, sql_date_opt, HrStore};
use crate::{
    contract::{Contract, ContractDue},
    error::HrResult,
    types::UnitId,
};
use rusqlite::params;

impl HrStore {
    pub fn insert_contract(&self, c: &Contract) -> HrResult<i64> {
        self.conn().execute(
            "INSERT INTO contract (
                employee_id, contract_no, kind, start_date, end_date, status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                c.employee_id,
                &c.contract_no,
                &c.kind,
                date_to_sql(c.start_date),
                c.end_date.map(date_to_sql),
                &c.status,
            ],
        )?;
        Ok(self.conn().last_insert_rowid())
    }

    /// Active contracts whose end date falls inside `[start, end]`.
    /// Indefinite-term contracts (NULL end date) never match.
    pub fn contracts_expiring(
        &self,
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
        unit_id: Option<UnitId>,
    ) -> HrResult<Vec<ContractDue>> {
        let mut sql = String::from(
            "SELECT c.id, c.employee_id, c.contract_no, c.kind, c.start_date,
                    c.end_date, c.status, e.code, e.full_name, u.name
             FROM contract c
             JOIN employee e ON e.id = c.employee_id
             JOIN unit u ON u.id = e.unit_id
             WHERE c.status = 'active'
               AND c.end_date IS NOT NULL
               AND c.end_date >= ?1 AND c.end_date <= ?2",
        );
        let mut args: Vec<Box<dyn rusqlite::ToSql>> = vec![
            Box::new(date_to_sql(start)),
            Box::new(date_to_sql(end)),
        ];
        if let Some(unit_id) = unit_id {
            args.push(Box::new(unit_id));
            sql.push_str(" AND e.unit_id = ?3");
        }
        sql.push_str(" ORDER BY c.end_date ASC, c.id ASC");

        let mut stmt = self.conn().prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(args), |row| {
            let end_date = sql_date_opt(5, row.get(5)?)?;
            Ok(ContractDue {
                contract: Contract {
                    id: row.get(0)?,
                    employee_id: row.get(1)?,
                    contract_no: row.get(2)?,
                    kind: row.get(3)?,
                    start_date: sql_date(4, row.get(4)?)?,
                    end_date,
                    status: row.get(6)?,
                },
                employee_code: row.get(7)?,
                full_name: row.get(8)?,
                unit_name: row.get(9)?,
                days_left: end_date.map(|d| (d - start).num_days()).unwrap_or(0),
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
