use hrm_core::{
    config::{keys, parse_unit_emails, HrConfig},
    employee::Unit,
    store::HrStore,
};

fn store() -> HrStore {
    let store = HrStore::in_memory().unwrap();
    store.migrate().unwrap();
    store
}

#[test]
fn get_setting_returns_default_until_written() {
    let store = store();
    assert_eq!(store.get_setting("CONTRACT_ALERT_DAYS", "30").unwrap(), "30");
    store.set_setting("CONTRACT_ALERT_DAYS", "45").unwrap();
    assert_eq!(store.get_setting("CONTRACT_ALERT_DAYS", "30").unwrap(), "45");
    // Create-on-first-write, updated in place afterwards.
    store.set_setting("CONTRACT_ALERT_DAYS", "60").unwrap();
    assert_eq!(store.get_setting("CONTRACT_ALERT_DAYS", "30").unwrap(), "60");
}

#[test]
fn config_defaults_match_documentation() {
    let config = HrConfig::load(&store()).unwrap();
    assert_eq!(config.contract_alert_days, 30);
    assert_eq!(config.export_ttl_days, 30);
    assert!(!config.send_summary_zip);
    assert_eq!(config.date_format, "%d/%m/%Y");
    assert!(config.summary_recipients.is_empty());
    assert_eq!(config.mail_retries, 3);
    assert!(config.smtp.is_none());
}

/// A date format chrono cannot render must never reach the report
/// writers — it would only fail at write time, mid-job.
#[test]
fn invalid_date_format_falls_back_to_default() {
    let store = store();
    store.set_setting(keys::XLSX_DATE_FORMAT, "%Q").unwrap();
    let config = HrConfig::load(&store).unwrap();
    assert_eq!(config.date_format, "%d/%m/%Y");

    store.set_setting(keys::XLSX_DATE_FORMAT, "%Y-%m-%d").unwrap();
    let config = HrConfig::load(&store).unwrap();
    assert_eq!(config.date_format, "%Y-%m-%d");
}

#[test]
fn unit_emails_accepts_json_object() {
    let map = parse_unit_emails(
        r#"{"Phòng Tổ chức": "a@x.vn,b@x.vn", "Phòng Kế toán": ["c@x.vn"]}"#,
    );
    assert_eq!(
        map.get("Phòng Tổ chức").unwrap(),
        &vec!["a@x.vn".to_string(), "b@x.vn".to_string()]
    );
    assert_eq!(map.get("Phòng Kế toán").unwrap(), &vec!["c@x.vn".to_string()]);
}

#[test]
fn unit_emails_accepts_legacy_pairs() {
    let map = parse_unit_emails("Phòng Tổ chức=a@x.vn, b@x.vn;Phòng Kế toán=c@x.vn");
    assert_eq!(
        map.get("Phòng Tổ chức").unwrap(),
        &vec!["a@x.vn".to_string(), "b@x.vn".to_string()]
    );
    assert_eq!(map.get("Phòng Kế toán").unwrap(), &vec!["c@x.vn".to_string()]);
    assert!(parse_unit_emails("").is_empty());
}

#[test]
fn unit_row_email_wins_over_fallback() {
    let store = store();
    store
        .set_setting(keys::UNIT_EMAILS, "Phòng Tổ chức=fallback@x.vn")
        .unwrap();
    let config = HrConfig::load(&store).unwrap();

    let with_row_email = Unit {
        id: 1,
        name: "Phòng Tổ chức".into(),
        email: Some("row@x.vn,row2@x.vn".into()),
    };
    assert_eq!(
        config.unit_recipients(&with_row_email),
        vec!["row@x.vn".to_string(), "row2@x.vn".to_string()]
    );

    let without = Unit {
        id: 1,
        name: "Phòng Tổ chức".into(),
        email: None,
    };
    assert_eq!(
        config.unit_recipients(&without),
        vec!["fallback@x.vn".to_string()]
    );

    let unknown = Unit {
        id: 2,
        name: "Phòng Khác".into(),
        email: None,
    };
    assert!(config.unit_recipients(&unknown).is_empty());
}

#[test]
fn smtp_settings_require_a_host() {
    let store = store();
    store.set_setting(keys::SMTP_HOST, "mail.example.gov.vn").unwrap();
    store.set_setting(keys::SMTP_PORT, "2525").unwrap();
    store.set_setting(keys::SMTP_FROM, "hr@example.gov.vn").unwrap();

    let config = HrConfig::load(&store).unwrap();
    let smtp = config.smtp.expect("host configured");
    assert_eq!(smtp.host, "mail.example.gov.vn");
    assert_eq!(smtp.port, 2525);
    assert_eq!(smtp.from, "hr@example.gov.vn");
}
