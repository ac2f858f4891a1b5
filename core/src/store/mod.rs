//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database. Calculators, the scanner,
//! and the scheduled jobs call store methods — they never execute SQL.

use crate::error::HrResult;
use rusqlite::Connection;

mod contract;
mod email_log;
mod employee;
mod retirement;
mod salary;
mod setting;

pub struct HrStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file
}

impl HrStore {
    pub fn open(path: &str) -> HrResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> HrResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn, path: None })
    }

    /// Reopen a new connection to the same database.
    /// For in-memory databases this returns a fresh, isolated database.
    pub fn reopen(&self) -> HrResult<Self> {
        match &self.path {
            Some(p) => Self::open(p),
            None => Self::in_memory(),
        }
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> HrResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_personnel.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/002_salary.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/003_contracts.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/004_retirement.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/005_email_log.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/006_settings.sql"))?;
        Ok(())
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }
}

/// Parse an ISO date column, mapping failures into rusqlite's
/// conversion error so query_map closures stay uniform.
pub(crate) fn sql_date(idx: usize, raw: String) -> rusqlite::Result<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

pub(crate) fn sql_date_opt(
    idx: usize,
    raw: Option<String>,
) -> rusqlite::Result<Option<chrono::NaiveDate>> {
    raw.map(|s| sql_date(idx, s)).transpose()
}

pub(crate) fn date_to_sql(d: chrono::NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

/// Conversion error for TEXT columns holding an enumerated value.
pub(crate) fn sql_enum_err(idx: usize, raw: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        rusqlite::types::Type::Text,
        format!("unrecognized value '{raw}'").into(),
    )
}
