//! Labor contracts and the expiring-contract scan rows.

use crate::types::EmployeeId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    pub id:          i64,
    pub employee_id: EmployeeId,
    pub contract_no: String,
    pub kind:        String,
    pub start_date:  NaiveDate,
    /// None for indefinite-term contracts (never expire).
    pub end_date:    Option<NaiveDate>,
    pub status:      String,
}

/// A contract expiring inside the alert window, with display fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractDue {
    pub contract:      Contract,
    pub employee_code: String,
    pub full_name:     String,
    pub unit_name:     String,
    pub days_left:     i64,
}
