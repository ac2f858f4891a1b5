//! Salary progression calculator.
//!
//! Given an employee's latest salary assignment and an `as_of` date, decide
//! the next salary event:
//!   1. No history row → no decision possible.
//!   2. Disciplinary note on the latest row → hold, overrides elapsed time.
//!   3. Below the grade's final step → step increase once the step's
//!      minimum tenure has elapsed.
//!   4. At the final step → over-scale seniority allowance once the rank's
//!      threshold (36 or 24 months) has elapsed: 5% at the threshold plus
//!      1 point per full extra year.
//!
//! The evaluator is a pure function; the store-aware wrapper only resolves
//! reference rows and delegates.

use crate::{
    classify::{self, RankLevel},
    dates::{add_months, months_between},
    employee::Employee,
    error::HrResult,
    store::HrStore,
    types::{EmployeeId, GradeId},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ── Records ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryGrade {
    pub id:         GradeId,
    pub code:       String,
    pub name:       String,
    /// Explicit rank tag; None for legacy rows classified from `level_note`.
    pub level:      Option<RankLevel>,
    pub level_note: String,
}

impl SalaryGrade {
    /// Explicit tag when present, legacy substring classification otherwise.
    pub fn rank_level(&self) -> RankLevel {
        self.level
            .unwrap_or_else(|| classify::classify_rank_level(&self.level_note))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryStep {
    pub grade_id:    GradeId,
    pub step_no:     u32,
    pub coefficient: f64,
    /// Minimum tenure at this step before eligibility to advance.
    pub min_months:  u32,
}

/// One immutable salary assignment event. Append-only: the row with the
/// greatest `effective_date` defines the employee's current grade and step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryHistory {
    pub id:             i64,
    pub employee_id:    EmployeeId,
    pub grade_id:       GradeId,
    pub step_no:        u32,
    pub coefficient:    f64,
    pub effective_date: NaiveDate,
    pub note:           Option<String>,
}

/// One salary assignment event joined with display fields, as reported to
/// the social-insurance agency for a month's changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryEventRow {
    pub employee_code:  String,
    pub full_name:      String,
    pub unit_name:      String,
    pub grade_code:     String,
    pub step_no:        u32,
    pub coefficient:    f64,
    pub effective_date: NaiveDate,
    pub note:           Option<String>,
}

// ── Decisions ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    /// Advance to the next step within the grade.
    Step,
    /// Already at the final step; over-scale seniority allowance accrues.
    OverLimit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryDecision {
    pub employee_id:         EmployeeId,
    pub kind:                DecisionKind,
    pub grade_id:            GradeId,
    pub current_step:        u32,
    pub current_coefficient: f64,
    pub next_step:           Option<u32>,
    pub next_coefficient:    Option<f64>,
    pub allowance_percent:   Option<u32>,
    pub months_elapsed:      i32,
    pub due_date:            NaiveDate,
}

/// Full evaluation outcome. `compute_next_for_person` collapses the
/// non-Due variants to None; callers that need to distinguish a
/// disciplinary hold from "not yet due" use this directly.
#[derive(Debug, Clone)]
pub enum Progression {
    Due(SalaryDecision),
    NotYetDue { months_elapsed: i32 },
    /// Disciplinary delay on the latest assignment; ineligible regardless
    /// of elapsed time.
    Hold,
}

// ── Evaluation ───────────────────────────────────────────────────────────────

/// Pure evaluator over an already-resolved history row and step table.
///
/// `next_step` must be the step following `current` in the same grade, or
/// None when `current` is the grade's final step.
pub fn evaluate(
    latest: &SalaryHistory,
    level: RankLevel,
    max_step: u32,
    current: &SalaryStep,
    next_step: Option<&SalaryStep>,
    as_of: NaiveDate,
) -> Progression {
    if latest
        .note
        .as_deref()
        .is_some_and(classify::is_disciplinary_note)
    {
        return Progression::Hold;
    }

    let months_elapsed = months_between(latest.effective_date, as_of);

    if latest.step_no < max_step {
        if months_elapsed >= current.min_months as i32 {
            return Progression::Due(SalaryDecision {
                employee_id: latest.employee_id,
                kind: DecisionKind::Step,
                grade_id: latest.grade_id,
                current_step: latest.step_no,
                current_coefficient: latest.coefficient,
                next_step: next_step.map(|s| s.step_no),
                next_coefficient: next_step.map(|s| s.coefficient),
                allowance_percent: None,
                months_elapsed,
                due_date: add_months(latest.effective_date, current.min_months as i32),
            });
        }
        return Progression::NotYetDue { months_elapsed };
    }

    let threshold = level.over_limit_threshold_months() as i32;
    if months_elapsed >= threshold {
        let extra_years = (months_elapsed - threshold) / 12;
        // due_date is the day the current percent took effect: the
        // threshold anniversary, stepped forward one year per extra point.
        let due_date = add_months(latest.effective_date, threshold + extra_years * 12);
        return Progression::Due(SalaryDecision {
            employee_id: latest.employee_id,
            kind: DecisionKind::OverLimit,
            grade_id: latest.grade_id,
            current_step: latest.step_no,
            current_coefficient: latest.coefficient,
            next_step: None,
            next_coefficient: None,
            allowance_percent: Some(5 + extra_years as u32),
            months_elapsed,
            due_date,
        });
    }
    Progression::NotYetDue { months_elapsed }
}

/// Resolve the employee's latest history row and grade reference data,
/// then evaluate. Missing data (no history, no matching step row) is
/// "not applicable", never an error surfaced to callers.
pub fn compute_next_for_person(
    store: &HrStore,
    employee: &Employee,
    as_of: NaiveDate,
) -> HrResult<Option<SalaryDecision>> {
    let Some(latest) = store.latest_salary_history(employee.id)? else {
        return Ok(None);
    };
    let Some(grade) = store.grade(latest.grade_id)? else {
        log::warn!(
            "employee {} references missing grade {}",
            employee.code,
            latest.grade_id
        );
        return Ok(None);
    };
    let Some(current) = store.salary_step(latest.grade_id, latest.step_no)? else {
        log::warn!(
            "employee {} at unknown step {} of grade {}",
            employee.code,
            latest.step_no,
            grade.code
        );
        return Ok(None);
    };
    let max_step = store.max_step(latest.grade_id)?;
    let next = if latest.step_no < max_step {
        store.salary_step(latest.grade_id, latest.step_no + 1)?
    } else {
        None
    };

    match evaluate(&latest, grade.rank_level(), max_step, &current, next.as_ref(), as_of) {
        Progression::Due(decision) => Ok(Some(decision)),
        Progression::NotYetDue { .. } | Progression::Hold => Ok(None),
    }
}
