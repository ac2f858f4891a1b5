//! hrm-runner: headless batch runner for the HR rule engine.
//!
//! Usage:
//!   hrm-runner --db hr.db --date 2025-02-15 --days 1 --exports ./exports
//!   hrm-runner --db :memory: --seed-demo --date 2025-02-15

use anyhow::Result;
use chrono::NaiveDate;
use hrm_core::{
    config::HrConfig,
    employee::Employee,
    mail::{LogMailer, Mailer, SmtpMailer},
    notify,
    salary::{SalaryHistory, SalaryStep},
    scheduler::Scheduler,
    store::HrStore,
    types::{Gender, WorkStatus},
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].as_str())
        .unwrap_or(":memory:");
    let exports = args
        .windows(2)
        .find(|w| w[0] == "--exports")
        .map(|w| w[1].as_str())
        .unwrap_or("./exports");
    let days = parse_arg(&args, "--days", 1u64);
    let start_date = args
        .windows(2)
        .find(|w| w[0] == "--date")
        .map(|w| NaiveDate::parse_from_str(&w[1], "%Y-%m-%d"))
        .transpose()?
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let seed_demo = args.iter().any(|a| a == "--seed-demo");

    let store = if db == ":memory:" {
        HrStore::in_memory()?
    } else {
        HrStore::open(db)?
    };
    store.migrate()?;
    if seed_demo {
        seed_demo_data(&store)?;
        log::info!("seeded demo reference data");
    }

    let config = HrConfig::load(&store)?;
    let mailer: Box<dyn Mailer> = match &config.smtp {
        Some(smtp) => Box::new(SmtpMailer {
            host: smtp.host.clone(),
            port: smtp.port,
            from: smtp.from.clone(),
            credentials: smtp
                .username
                .clone()
                .zip(smtp.password.clone()),
        }),
        None => {
            log::info!("no SMTP_HOST configured; using dry-run mailer");
            Box::new(LogMailer)
        }
    };

    let (tx, rx) = notify::channel();
    let mut scheduler =
        Scheduler::build(store, config, mailer, exports.into()).with_notifier(tx);

    let mut day = start_date;
    for _ in 0..days {
        log::info!("=== scheduler run for {day} ===");
        scheduler.run_for_date(day);
        day = day.succ_opt().unwrap_or(day);
    }

    while let Ok(notification) = rx.try_recv() {
        println!("{}", serde_json::to_string(&notification)?);
    }

    let audit = scheduler.store().email_logs(None, None)?;
    log::info!("{} email audit row(s) written", audit.len());
    Ok(())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

/// Two grades, two employees, one expiring contract — enough for every
/// job to produce output on the right dates.
fn seed_demo_data(store: &HrStore) -> Result<()> {
    let unit = store.insert_unit("Phòng Tổ chức", Some("tccb@example.gov.vn"))?;
    let position = store.insert_position("Chuyên viên")?;

    let cv = store.insert_grade("01.003", "Chuyên viên", None, "Chuyên viên")?;
    for (step_no, coefficient) in [(1u32, 2.34f64), (2, 2.67), (3, 3.00)] {
        store.insert_step(&SalaryStep {
            grade_id: cv,
            step_no,
            coefficient,
            min_months: 36,
        })?;
    }
    let nv = store.insert_grade("01.005", "Nhân viên", None, "Nhân viên")?;
    for (step_no, coefficient) in [(1u32, 1.86f64), (2, 2.06), (3, 2.26)] {
        store.insert_step(&SalaryStep {
            grade_id: nv,
            step_no,
            coefficient,
            min_months: 24,
        })?;
    }

    let e1 = store.insert_employee(&Employee {
        id: 0,
        code: "NV001".into(),
        full_name: "Nguyễn Văn An".into(),
        dob: NaiveDate::from_ymd_opt(1970, 3, 12),
        gender: Gender::Male,
        unit_id: unit,
        position_id: position,
        status: WorkStatus::Active,
        insurance_date: NaiveDate::from_ymd_opt(1995, 1, 1),
    })?;
    store.append_salary_history(&SalaryHistory {
        id: 0,
        employee_id: e1,
        grade_id: cv,
        step_no: 1,
        coefficient: 2.34,
        effective_date: NaiveDate::from_ymd_opt(2022, 1, 1).expect("valid date"),
        note: None,
    })?;

    let e2 = store.insert_employee(&Employee {
        id: 0,
        code: "NV002".into(),
        full_name: "Trần Thị Bình".into(),
        dob: NaiveDate::from_ymd_opt(1972, 8, 20),
        gender: Gender::Female,
        unit_id: unit,
        position_id: position,
        status: WorkStatus::Active,
        insurance_date: NaiveDate::from_ymd_opt(1996, 6, 1),
    })?;
    store.append_salary_history(&SalaryHistory {
        id: 0,
        employee_id: e2,
        grade_id: nv,
        step_no: 3,
        coefficient: 2.26,
        effective_date: NaiveDate::from_ymd_opt(2021, 8, 1).expect("valid date"),
        note: None,
    })?;

    store.insert_contract(&hrm_core::contract::Contract {
        id: 0,
        employee_id: e2,
        contract_no: "HD-2023-014".into(),
        kind: "Xác định thời hạn".into(),
        start_date: NaiveDate::from_ymd_opt(2023, 1, 1).expect("valid date"),
        end_date: NaiveDate::from_ymd_opt(2025, 3, 1),
        status: "active".into(),
    })?;

    store.set_setting("SUMMARY_EMAILS", "hr-lead@example.gov.vn")?;
    Ok(())
}
