//! Runtime configuration loaded from the settings store.
//!
//! Every export/notification path reads from here rather than hitting the
//! setting table directly. Malformed values fall back to the documented
//! defaults with a warning — a bad setting must never stop the scheduler.

use crate::{error::HrResult, retirement::RetirementPolicy, store::HrStore};
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

pub mod keys {
    pub const CONTRACT_ALERT_DAYS: &str = "CONTRACT_ALERT_DAYS";
    pub const EXPORT_TTL_DAYS: &str = "EXPORT_TTL_DAYS";
    pub const SEND_SUMMARY_ZIP: &str = "SEND_SUMMARY_ZIP";
    pub const XLSX_DATE_FORMAT: &str = "XLSX_DATE_FORMAT";
    pub const SUMMARY_EMAILS: &str = "SUMMARY_EMAILS";
    pub const UNIT_EMAILS: &str = "UNIT_EMAILS";
    pub const MAIL_RETRIES: &str = "MAIL_RETRIES";
    pub const MAIL_RETRY_DELAY_SECS: &str = "MAIL_RETRY_DELAY_SECS";
    pub const RETIREMENT_AGE_MALE: &str = "RETIREMENT_AGE_MALE";
    pub const RETIREMENT_AGE_FEMALE: &str = "RETIREMENT_AGE_FEMALE";
    pub const SMTP_HOST: &str = "SMTP_HOST";
    pub const SMTP_PORT: &str = "SMTP_PORT";
    pub const SMTP_FROM: &str = "SMTP_FROM";
    pub const SMTP_USER: &str = "SMTP_USER";
    pub const SMTP_PASSWORD: &str = "SMTP_PASSWORD";
}

#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host:     String,
    pub port:     u16,
    pub from:     String,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HrConfig {
    pub contract_alert_days: i64,
    pub export_ttl_days:     i64,
    pub send_summary_zip:    bool,
    pub date_format:         String,
    pub summary_recipients:  Vec<String>,
    /// Fallback per-unit recipients, keyed by unit name, used when a unit
    /// row carries no email column.
    pub unit_email_fallback: HashMap<String, Vec<String>>,
    pub mail_retries:        u32,
    pub mail_retry_delay:    Duration,
    pub retirement:          RetirementPolicy,
    /// None → dry-run transport.
    pub smtp:                Option<SmtpSettings>,
}

impl HrConfig {
    pub fn load(store: &HrStore) -> HrResult<Self> {
        let retirement = RetirementPolicy {
            male_age_years: parse_or(
                &store.get_setting(keys::RETIREMENT_AGE_MALE, "")?,
                keys::RETIREMENT_AGE_MALE,
                crate::retirement::DEFAULT_MALE_AGE,
            ),
            female_age_years: parse_or(
                &store.get_setting(keys::RETIREMENT_AGE_FEMALE, "")?,
                keys::RETIREMENT_AGE_FEMALE,
                crate::retirement::DEFAULT_FEMALE_AGE,
            ),
        };

        let smtp = match store.get_setting_opt(keys::SMTP_HOST)? {
            Some(host) if !host.is_empty() => Some(SmtpSettings {
                host,
                port: parse_or(&store.get_setting(keys::SMTP_PORT, "25")?, keys::SMTP_PORT, 25),
                from: store.get_setting(keys::SMTP_FROM, "hr@localhost")?,
                username: store.get_setting_opt(keys::SMTP_USER)?,
                password: store.get_setting_opt(keys::SMTP_PASSWORD)?,
            }),
            _ => None,
        };

        Ok(Self {
            contract_alert_days: parse_or(
                &store.get_setting(keys::CONTRACT_ALERT_DAYS, "30")?,
                keys::CONTRACT_ALERT_DAYS,
                30,
            ),
            export_ttl_days: parse_or(
                &store.get_setting(keys::EXPORT_TTL_DAYS, "30")?,
                keys::EXPORT_TTL_DAYS,
                30,
            ),
            send_summary_zip: is_truthy(&store.get_setting(keys::SEND_SUMMARY_ZIP, "0")?),
            date_format: checked_date_format(
                &store.get_setting(keys::XLSX_DATE_FORMAT, DEFAULT_DATE_FORMAT)?,
            ),
            summary_recipients: split_addresses(&store.get_setting(keys::SUMMARY_EMAILS, "")?),
            unit_email_fallback: parse_unit_emails(&store.get_setting(keys::UNIT_EMAILS, "")?),
            mail_retries: parse_or(
                &store.get_setting(keys::MAIL_RETRIES, "3")?,
                keys::MAIL_RETRIES,
                3,
            ),
            mail_retry_delay: Duration::from_secs(parse_or(
                &store.get_setting(keys::MAIL_RETRY_DELAY_SECS, "5")?,
                keys::MAIL_RETRY_DELAY_SECS,
                5,
            )),
            retirement,
            smtp,
        })
    }

    /// Recipients for a unit: the unit row's own email list when present,
    /// otherwise the UNIT_EMAILS fallback entry for its name.
    pub fn unit_recipients(&self, unit: &crate::employee::Unit) -> Vec<String> {
        if let Some(email) = unit.email.as_deref() {
            let list = split_addresses(email);
            if !list.is_empty() {
                return list;
            }
        }
        self.unit_email_fallback
            .get(&unit.name)
            .cloned()
            .unwrap_or_default()
    }
}

const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";

/// chrono only rejects a bad strftime spec at render time, inside the
/// report writers, so the format is validated here and a broken value
/// falls back like every other key.
fn checked_date_format(raw: &str) -> String {
    use chrono::format::{Item, StrftimeItems};
    if StrftimeItems::new(raw).any(|item| matches!(item, Item::Error)) {
        log::warn!(
            "setting {} has invalid format '{raw}', using default",
            keys::XLSX_DATE_FORMAT
        );
        return DEFAULT_DATE_FORMAT.to_string();
    }
    raw.to_string()
}

fn parse_or<T: FromStr + Copy>(raw: &str, key: &str, default: T) -> T {
    if raw.is_empty() {
        return default;
    }
    match raw.trim().parse() {
        Ok(v) => v,
        Err(_) => {
            log::warn!("setting {key} has unparsable value '{raw}', using default");
            default
        }
    }
}

fn is_truthy(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

fn split_addresses(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// UNIT_EMAILS accepts a JSON object (values either a comma-joined string
/// or an array of strings) or the legacy `name=a@x,b@y;name2=c@z` form.
pub fn parse_unit_emails(raw: &str) -> HashMap<String, Vec<String>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return HashMap::new();
    }

    if let Ok(map) = serde_json::from_str::<HashMap<String, serde_json::Value>>(raw) {
        return map
            .into_iter()
            .map(|(name, value)| {
                let list = match value {
                    serde_json::Value::String(s) => split_addresses(&s),
                    serde_json::Value::Array(items) => items
                        .into_iter()
                        .filter_map(|v| v.as_str().map(str::to_string))
                        .collect(),
                    _ => Vec::new(),
                };
                (name, list)
            })
            .collect();
    }

    // Legacy fallback: semicolon-separated name=addr,addr pairs.
    raw.split(';')
        .filter_map(|pair| pair.split_once('='))
        .map(|(name, emails)| (name.trim().to_string(), split_addresses(emails)))
        .collect()
}
