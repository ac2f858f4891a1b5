//! Rank-level and disciplinary-note classification.
//!
//! The explicit `level` tag on a salary grade is authoritative. Historical
//! reference data predates the tag, so free-text classification remains as
//! a migration fallback: case-insensitive substring matching that accepts
//! both diacritic and de-accented Vietnamese spellings.

use serde::{Deserialize, Serialize};

/// Rank classification driving the over-limit threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankLevel {
    /// "Chuyên viên" and above — 36-month over-limit threshold.
    Specialist,
    /// "Nhân viên" / "thủ quỹ" — 24-month over-limit threshold.
    Staff,
}

impl RankLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankLevel::Specialist => "specialist",
            RankLevel::Staff => "staff",
        }
    }

    pub fn parse(s: &str) -> Option<RankLevel> {
        match s {
            "specialist" => Some(RankLevel::Specialist),
            "staff" => Some(RankLevel::Staff),
            _ => None,
        }
    }

    /// Minimum months at the final step before the over-scale seniority
    /// allowance starts accruing.
    pub fn over_limit_threshold_months(&self) -> u32 {
        match self {
            RankLevel::Specialist => 36,
            RankLevel::Staff => 24,
        }
    }
}

const STAFF_KEYWORDS: &[&str] = &["nhân viên", "nhan vien", "thủ quỹ", "thu quy"];

const DISCIPLINE_KEYWORDS: &[&str] = &[
    "kỷ luật", "ky luat", "kéo dài", "keo dai", "chậm", "cham", "delay",
];

/// Legacy fallback: classify a grade's free-text level description.
/// Unknown text defaults to Specialist (the stricter 36-month threshold).
pub fn classify_rank_level(level_text: &str) -> RankLevel {
    let lowered = level_text.to_lowercase();
    if STAFF_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
        RankLevel::Staff
    } else {
        RankLevel::Specialist
    }
}

/// True when a salary-history note encodes a disciplinary delay.
/// A hold overrides all time-based eligibility.
pub fn is_disciplinary_note(note: &str) -> bool {
    let lowered = note.to_lowercase();
    DISCIPLINE_KEYWORDS.iter().any(|kw| lowered.contains(kw))
}
