//! Eligibility window scanner.
//!
//! RULE: the scanner is strictly read-only. It evaluates every active
//! employee with `as_of = end` (so the whole window is covered even for
//! mid-window due dates), keeps only decisions whose due date falls inside
//! `[start, end]`, and returns them sorted ascending by due date.

use crate::{
    employee::EmployeeFilter,
    error::HrResult,
    salary::{self, SalaryDecision},
    store::HrStore,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A due decision enriched with the display fields reports need.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DueItem {
    pub decision:      SalaryDecision,
    pub employee_code: String,
    pub full_name:     String,
    pub unit_name:     String,
    pub position_name: String,
    /// Days from the window start to the due date.
    pub days_left:     i64,
}

/// All active employees whose next salary event falls inside
/// `[start, end]`, optionally filtered by unit and/or position.
pub fn list_due_in_window(
    store: &HrStore,
    start: NaiveDate,
    end: NaiveDate,
    filter: EmployeeFilter,
) -> HrResult<Vec<DueItem>> {
    let mut items = Vec::new();
    for row in store.active_employees(filter)? {
        let Some(decision) = salary::compute_next_for_person(store, &row.employee, end)?
        else {
            continue;
        };
        if decision.due_date < start || decision.due_date > end {
            continue;
        }
        let days_left = (decision.due_date - start).num_days();
        items.push(DueItem {
            employee_code: row.employee.code.clone(),
            full_name: row.employee.full_name.clone(),
            unit_name: row.unit_name,
            position_name: row.position_name,
            days_left,
            decision,
        });
    }
    // Stable: ties keep roster order.
    items.sort_by_key(|item| item.decision.due_date);
    Ok(items)
}
