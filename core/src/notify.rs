//! In-process notification events.
//!
//! RULE: the batch runner and any UI consumer are decoupled through an
//! explicit channel — there is no shared global queue. Whoever builds the
//! scheduler owns the receiving end; jobs only ever see the sender.

use crate::retirement::Milestone;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{Receiver, Sender};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HrNotification {
    SalaryDueFound {
        window_start: NaiveDate,
        window_end:   NaiveDate,
        count:        usize,
    },
    RetirementMilestone {
        employee_code: String,
        full_name:     String,
        milestone:     Milestone,
        planned_date:  NaiveDate,
    },
    ContractsExpiring {
        count:      usize,
        window_end: NaiveDate,
    },
    InsuranceReportReady {
        period_start: NaiveDate,
        period_end:   NaiveDate,
        path:         String,
    },
    ExportsCleaned {
        removed: usize,
    },
}

pub type NotificationSender = Sender<HrNotification>;
pub type NotificationReceiver = Receiver<HrNotification>;

/// Convenience constructor for a notification channel pair.
pub fn channel() -> (NotificationSender, NotificationReceiver) {
    std::sync::mpsc::channel()
}
