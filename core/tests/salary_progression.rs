use chrono::NaiveDate;
use hrm_core::{
    classify::{classify_rank_level, is_disciplinary_note, RankLevel},
    employee::Employee,
    salary::{self, DecisionKind, SalaryGrade, SalaryHistory, SalaryStep},
    store::HrStore,
    types::{Gender, WorkStatus},
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// Seeds the two reference grades and one employee on the given grade,
/// step, and effective date. Returns (store, employee).
fn seed_employee(
    grade_code: &str,
    step_no: u32,
    effective: NaiveDate,
    note: Option<&str>,
) -> (HrStore, Employee) {
    let store = HrStore::in_memory().unwrap();
    store.migrate().unwrap();
    let unit = store.insert_unit("Phòng Hành chính", None).unwrap();
    let position = store.insert_position("Chuyên viên").unwrap();

    let cv = store
        .insert_grade("01.003", "Chuyên viên", None, "Chuyên viên")
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
        .insert_grade("01.005", "Nhân viên", None, "Nhân viên")
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

    let grade_id = if grade_code == "01.003" { cv } else { nv };
    let coefficient = store
        .salary_step(grade_id, step_no)
        .unwrap()
        .unwrap()
        .coefficient;

    let id = store
        .insert_employee(&Employee {
            id: 0,
            code: "NV001".into(),
            full_name: "Nguyễn Văn An".into(),
            dob: Some(d(1970, 3, 12)),
            gender: Gender::Male,
            unit_id: unit,
            position_id: position,
            status: WorkStatus::Active,
            insurance_date: None,
        })
        .unwrap();
    store
        .append_salary_history(&SalaryHistory {
            id: 0,
            employee_id: id,
            grade_id,
            step_no,
            coefficient,
            effective_date: effective,
            note: note.map(str::to_string),
        })
        .unwrap();

    let employee = store
        .active_employees(Default::default())
        .unwrap()
        .remove(0)
        .employee;
    (store, employee)
}

// ── Step case ────────────────────────────────────────────────────────────────

#[test]
fn specialist_at_step_one_is_due_after_36_months() {
    let (store, emp) = seed_employee("01.003", 1, d(2022, 1, 1), None);
    let decision = salary::compute_next_for_person(&store, &emp, d(2025, 2, 1))
        .unwrap()
        .expect("37 elapsed months must be due");

    assert_eq!(decision.kind, DecisionKind::Step);
    assert_eq!(decision.months_elapsed, 37);
    assert_eq!(decision.current_step, 1);
    assert_eq!(decision.next_step, Some(2));
    assert_eq!(decision.next_coefficient, Some(2.67));
    assert_eq!(decision.due_date, d(2025, 1, 1));
    assert_eq!(decision.allowance_percent, None);
}

#[test]
fn not_yet_due_below_minimum_tenure() {
    let (store, emp) = seed_employee("01.003", 1, d(2022, 1, 1), None);
    // 35 whole months — one short of the step minimum.
    let decision = salary::compute_next_for_person(&store, &emp, d(2024, 12, 1)).unwrap();
    assert!(decision.is_none());
}

// ── Over-limit case ──────────────────────────────────────────────────────────

#[test]
fn staff_at_final_step_accrues_over_limit_allowance() {
    let (store, emp) = seed_employee("01.005", 3, d(2021, 8, 1), None);
    let decision = salary::compute_next_for_person(&store, &emp, d(2025, 9, 1))
        .unwrap()
        .expect("49 elapsed months past a 24-month threshold");

    assert_eq!(decision.kind, DecisionKind::OverLimit);
    assert_eq!(decision.months_elapsed, 49);
    // 5% at the threshold plus 1 point per full extra year: (49-24)/12 = 2.
    assert_eq!(decision.allowance_percent, Some(7));
    assert!(decision.allowance_percent.unwrap() >= 5);
    // The 7% took effect on the second anniversary past the threshold.
    assert_eq!(decision.due_date, d(2025, 8, 1));
    assert_eq!(decision.next_step, None);
}

#[test]
fn over_limit_starts_flat_at_five_percent() {
    let (store, emp) = seed_employee("01.005", 3, d(2021, 8, 1), None);
    let decision = salary::compute_next_for_person(&store, &emp, d(2023, 8, 1))
        .unwrap()
        .expect("exactly 24 months elapsed");
    assert_eq!(decision.allowance_percent, Some(5));
    assert_eq!(decision.due_date, d(2023, 8, 1));
}

// ── Disciplinary hold ────────────────────────────────────────────────────────

#[test]
fn disciplinary_note_blocks_eligibility_regardless_of_tenure() {
    for note in ["Kỷ luật cảnh cáo", "KY LUAT khien trach", "xét duyệt DELAY", "kéo dài 6 tháng"] {
        let (store, emp) = seed_employee("01.003", 1, d(2010, 1, 1), Some(note));
        let decision = salary::compute_next_for_person(&store, &emp, d(2025, 1, 1)).unwrap();
        assert!(decision.is_none(), "note '{note}' must hold the increase");
    }
}

#[test]
fn plain_notes_do_not_hold() {
    assert!(is_disciplinary_note("kỷ luật khiển trách"));
    assert!(is_disciplinary_note("quyet dinh keo dai"));
    assert!(!is_disciplinary_note("nâng lương thường xuyên"));
    assert!(!is_disciplinary_note(""));
}

// ── Classification ───────────────────────────────────────────────────────────

#[test]
fn legacy_text_classification_accepts_both_spellings() {
    assert_eq!(classify_rank_level("Nhân viên văn thư"), RankLevel::Staff);
    assert_eq!(classify_rank_level("nhan vien hop dong"), RankLevel::Staff);
    assert_eq!(classify_rank_level("Thủ quỹ"), RankLevel::Staff);
    assert_eq!(classify_rank_level("THU QUY co quan"), RankLevel::Staff);
    assert_eq!(classify_rank_level("Chuyên viên chính"), RankLevel::Specialist);
    // Unknown text defaults to the stricter 36-month threshold.
    assert_eq!(classify_rank_level("Kiểm soát viên"), RankLevel::Specialist);
}

#[test]
fn explicit_level_tag_overrides_free_text() {
    let grade = SalaryGrade {
        id: 1,
        code: "99.001".into(),
        name: "Ngạch chuyển đổi".into(),
        level: Some(RankLevel::Specialist),
        level_note: "nhân viên".into(),
    };
    assert_eq!(grade.rank_level(), RankLevel::Specialist);

    let legacy = SalaryGrade {
        level: None,
        ..grade
    };
    assert_eq!(legacy.rank_level(), RankLevel::Staff);
}

// ── Missing data ─────────────────────────────────────────────────────────────

#[test]
fn no_history_means_no_decision() {
    let store = HrStore::in_memory().unwrap();
    store.migrate().unwrap();
    let unit = store.insert_unit("Phòng Kế toán", None).unwrap();
    let position = store.insert_position("Nhân viên").unwrap();
    let id = store
        .insert_employee(&Employee {
            id: 0,
            code: "NV009".into(),
            full_name: "Lê Văn Cường".into(),
            dob: None,
            gender: Gender::Male,
            unit_id: unit,
            position_id: position,
            status: WorkStatus::Active,
            insurance_date: None,
        })
        .unwrap();
    let emp = Employee {
        id,
        code: "NV009".into(),
        full_name: "Lê Văn Cường".into(),
        dob: None,
        gender: Gender::Male,
        unit_id: unit,
        position_id: position,
        status: WorkStatus::Active,
        insurance_date: None,
    };
    let decision = salary::compute_next_for_person(&store, &emp, d(2025, 1, 1)).unwrap();
    assert!(decision.is_none());
}
