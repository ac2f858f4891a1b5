//! Shared primitive types used across the entire engine.

use serde::{Deserialize, Serialize};

/// Row id of an employee in the HR store.
pub type EmployeeId = i64;

/// Row id of an organizational unit.
pub type UnitId = i64;

/// Row id of a job position.
pub type PositionId = i64;

/// Row id of a salary grade (ngạch).
pub type GradeId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    pub fn parse(s: &str) -> Option<Gender> {
        match s {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            _ => None,
        }
    }
}

/// Employment status. Employees are never hard-deleted; leaving the
/// organization is a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkStatus {
    Active,
    OnLeave,
    Retired,
    Resigned,
}

impl WorkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkStatus::Active => "active",
            WorkStatus::OnLeave => "on_leave",
            WorkStatus::Retired => "retired",
            WorkStatus::Resigned => "resigned",
        }
    }

    pub fn parse(s: &str) -> Option<WorkStatus> {
        match s {
            "active" => Some(WorkStatus::Active),
            "on_leave" => Some(WorkStatus::OnLeave),
            "retired" => Some(WorkStatus::Retired),
            "resigned" => Some(WorkStatus::Resigned),
            _ => None,
        }
    }
}
