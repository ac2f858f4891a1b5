use chrono::NaiveDate;
use hrm_core::{
    employee::{Employee, EmployeeFilter},
    salary::{DecisionKind, SalaryHistory, SalaryStep},
    scanner::list_due_in_window,
    store::HrStore,
    types::{Gender, WorkStatus},
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// The end-to-end reference scenario: two ranks, one employee pending a
/// step increase and one accruing the over-limit allowance.
fn seed_reference(store: &HrStore) -> (i64, i64) {
    let unit_a = store
        .insert_unit("Phòng Tổ chức", Some("tccb@example.gov.vn"))
        .unwrap();
    let unit_b = store.insert_unit("Phòng Kế toán", None).unwrap();
    let position = store.insert_position("Chuyên viên").unwrap();

    let cv = store
        .insert_grade("CV", "Chuyên viên", None, "Chuyên viên")
        .unwrap();
    for (n, coeff) in [(1u32, 2.34f64), (2, 2.67), (3, 3.00)] {
        store
            .insert_step(&SalaryStep {
                grade_id: cv,
                step_no: n,
                coefficient: coeff,
                min_months: 36,
            })
            .unwrap();
    }
    let nv = store
        .insert_grade("NV", "Nhân viên", None, "Nhân viên")
        .unwrap();
    for (n, coeff) in [(1u32, 1.86f64), (2, 2.06), (3, 2.26)] {
        store
            .insert_step(&SalaryStep {
                grade_id: nv,
                step_no: n,
                coefficient: coeff,
                min_months: 24,
            })
            .unwrap();
    }

    let e1 = store
        .insert_employee(&Employee {
            id: 0,
            code: "NV001".into(),
            full_name: "Nguyễn Văn An".into(),
            dob: Some(d(1970, 3, 12)),
            gender: Gender::Male,
            unit_id: unit_a,
            position_id: position,
            status: WorkStatus::Active,
            insurance_date: None,
        })
        .unwrap();
    store
        .append_salary_history(&SalaryHistory {
            id: 0,
            employee_id: e1,
            grade_id: cv,
            step_no: 1,
            coefficient: 2.34,
            effective_date: d(2022, 1, 1),
            note: None,
        })
        .unwrap();

    let e2 = store
        .insert_employee(&Employee {
            id: 0,
            code: "NV002".into(),
            full_name: "Trần Thị Bình".into(),
            dob: Some(d(1972, 8, 20)),
            gender: Gender::Female,
            unit_id: unit_b,
            position_id: position,
            status: WorkStatus::Active,
            insurance_date: None,
        })
        .unwrap();
    store
        .append_salary_history(&SalaryHistory {
            id: 0,
            employee_id: e2,
            grade_id: nv,
            step_no: 3,
            coefficient: 2.26,
            effective_date: d(2021, 8, 1),
            note: None,
        })
        .unwrap();

    (unit_a, unit_b)
}

#[test]
fn reference_scenario_finds_both_cases() {
    let store = HrStore::in_memory().unwrap();
    store.migrate().unwrap();
    seed_reference(&store);

    let items = list_due_in_window(
        &store,
        d(2025, 1, 1),
        d(2025, 12, 31),
        EmployeeFilter::default(),
    )
    .unwrap();
    assert_eq!(items.len(), 2);

    // Sorted ascending by due date: the January step increase first.
    let step = &items[0];
    assert_eq!(step.employee_code, "NV001");
    assert_eq!(step.decision.kind, DecisionKind::Step);
    assert_eq!(step.decision.next_step, Some(2));
    assert_eq!(step.decision.next_coefficient, Some(2.67));
    assert_eq!(step.decision.due_date, d(2025, 1, 1));
    assert_eq!(step.days_left, 0);
    assert_eq!(step.unit_name, "Phòng Tổ chức");

    let over = &items[1];
    assert_eq!(over.employee_code, "NV002");
    assert_eq!(over.decision.kind, DecisionKind::OverLimit);
    assert!(over.decision.allowance_percent.unwrap() >= 5);
    assert_eq!(over.decision.allowance_percent, Some(7));
    assert_eq!(over.decision.due_date, d(2025, 8, 1));
    assert_eq!(over.days_left, 212);
}

/// Nothing outside [start, end] may ever be returned.
#[test]
fn due_dates_outside_the_window_are_excluded() {
    let store = HrStore::in_memory().unwrap();
    store.migrate().unwrap();
    seed_reference(&store);

    // NV001's due date (2025-01-01) and NV002's current allowance
    // anniversary (2024-08-01 as of this window's end) both precede it.
    let items = list_due_in_window(
        &store,
        d(2025, 2, 1),
        d(2025, 7, 31),
        EmployeeFilter::default(),
    )
    .unwrap();
    assert!(items.is_empty());
}

#[test]
fn results_are_sorted_by_due_date() {
    let store = HrStore::in_memory().unwrap();
    store.migrate().unwrap();
    seed_reference(&store);

    let items = list_due_in_window(
        &store,
        d(2025, 1, 1),
        d(2025, 12, 31),
        EmployeeFilter::default(),
    )
    .unwrap();
    let due_dates: Vec<_> = items.iter().map(|i| i.decision.due_date).collect();
    let mut sorted = due_dates.clone();
    sorted.sort();
    assert_eq!(due_dates, sorted);
}

#[test]
fn unit_filter_restricts_the_roster() {
    let store = HrStore::in_memory().unwrap();
    store.migrate().unwrap();
    let (unit_a, _) = seed_reference(&store);

    let items = list_due_in_window(
        &store,
        d(2025, 1, 1),
        d(2025, 12, 31),
        EmployeeFilter {
            unit_id: Some(unit_a),
            position_id: None,
        },
    )
    .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].employee_code, "NV001");
}

#[test]
fn inactive_employees_are_not_scanned() {
    let store = HrStore::in_memory().unwrap();
    store.migrate().unwrap();
    let (unit_a, _) = seed_reference(&store);
    let position = store.insert_position("Văn thư").unwrap();

    // Retired employee with an obviously due history row.
    let e3 = store
        .insert_employee(&Employee {
            id: 0,
            code: "NV003".into(),
            full_name: "Hoàng Văn Em".into(),
            dob: None,
            gender: Gender::Male,
            unit_id: unit_a,
            position_id: position,
            status: WorkStatus::Retired,
            insurance_date: None,
        })
        .unwrap();
    store
        .append_salary_history(&SalaryHistory {
            id: 0,
            employee_id: e3,
            grade_id: 1,
            step_no: 1,
            coefficient: 2.34,
            effective_date: d(2020, 1, 1),
            note: None,
        })
        .unwrap();

    let items = list_due_in_window(
        &store,
        d(2020, 1, 1),
        d(2025, 12, 31),
        EmployeeFilter::default(),
    )
    .unwrap();
    assert!(items.iter().all(|i| i.employee_code != "NV003"));
}
