//! Personnel records: employees, organizational units, job positions.
//!
//! The engine never mutates these — they are read-only reference data from
//! its perspective. Writes happen in the data-entry layer, out of scope here.

use crate::types::{EmployeeId, Gender, PositionId, UnitId, WorkStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id:             EmployeeId,
    pub code:           String,
    pub full_name:      String,
    pub dob:            Option<NaiveDate>,
    pub gender:         Gender,
    pub unit_id:        UnitId,
    pub position_id:    PositionId,
    pub status:         WorkStatus,
    /// Social-insurance (BHXH) participation start date.
    pub insurance_date: Option<NaiveDate>,
}

/// Employee plus the denormalized display names the report paths need.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeRow {
    pub employee:      Employee,
    pub unit_name:     String,
    pub position_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id:   UnitId,
    pub name: String,
    /// Comma-separated recipient list for per-unit notifications.
    /// Falls back to the UNIT_EMAILS setting when absent.
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub id:   PositionId,
    pub name: String,
}

/// Optional filter for roster queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmployeeFilter {
    pub unit_id:     Option<UnitId>,
    pub position_id: Option<PositionId>,
}
