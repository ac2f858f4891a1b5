//! Statutory retirement dates and milestone tracking.
//!
//! The source regulations carry two competing age tables (60/55 and 62/60).
//! Rather than hard-coding either, the ages live in a policy struct loaded
//! from settings; 60/55 is the default. See DESIGN.md.

use crate::{
    dates::add_years,
    employee::Employee,
    types::EmployeeId,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MALE_AGE: u32 = 60;
pub const DEFAULT_FEMALE_AGE: u32 = 55;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetirementPolicy {
    pub male_age_years:   u32,
    pub female_age_years: u32,
}

impl Default for RetirementPolicy {
    fn default() -> Self {
        Self {
            male_age_years: DEFAULT_MALE_AGE,
            female_age_years: DEFAULT_FEMALE_AGE,
        }
    }
}

impl RetirementPolicy {
    /// Statutory retirement date: DOB plus the gender's configured age.
    /// None when the date of birth is missing. Feb-29 births clamp to
    /// Feb 28 in non-leap target years.
    pub fn retirement_date(&self, employee: &Employee) -> Option<NaiveDate> {
        let dob = employee.dob?;
        let years = match employee.gender {
            crate::types::Gender::Male => self.male_age_years,
            crate::types::Gender::Female => self.female_age_years,
        };
        Some(add_years(dob, years as i32))
    }
}

/// Notification milestones ahead of the planned retirement date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Milestone {
    /// 6 months ahead: written notice.
    SixMonth,
    /// 3 months ahead: retirement decision.
    ThreeMonth,
}

impl Milestone {
    pub fn months_ahead(&self) -> i32 {
        match self {
            Milestone::SixMonth => 6,
            Milestone::ThreeMonth => 3,
        }
    }
}

/// One row per employee, created lazily on first computation. A non-null
/// milestone date means that milestone was already processed — the
/// idempotency marker that lets the daily job use a range check without
/// double-sending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetirementNotice {
    pub employee_id:   EmployeeId,
    pub planned_date:  NaiveDate,
    pub notice_date:   Option<NaiveDate>,
    pub decision_date: Option<NaiveDate>,
}

impl RetirementNotice {
    pub fn milestone_done(&self, milestone: Milestone) -> bool {
        match milestone {
            Milestone::SixMonth => self.notice_date.is_some(),
            Milestone::ThreeMonth => self.decision_date.is_some(),
        }
    }
}
