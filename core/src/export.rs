//! Report writer: computed result lists to spreadsheet files.
//!
//! CSV is the interchange format; per-unit files can be bundled into one
//! ZIP for the global summary address. Date cells honor the
//! XLSX_DATE_FORMAT setting.

use crate::{
    contract::ContractDue,
    error::HrResult,
    retirement::Milestone,
    salary::{DecisionKind, SalaryEventRow},
    scanner::DueItem,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// A retirement report line: employee plus which milestone fired.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetirementRow {
    pub employee_code: String,
    pub full_name:     String,
    pub unit_name:     String,
    pub dob:           Option<NaiveDate>,
    pub planned_date:  NaiveDate,
    pub milestone:     Milestone,
}

/// Turn a display name into a safe file-name fragment.
pub fn file_slug(name: &str) -> String {
    let slug: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    slug.trim_matches('_').to_string()
}

pub struct CsvReportWriter {
    date_format: String,
}

impl CsvReportWriter {
    pub fn new(date_format: &str) -> Self {
        Self {
            date_format: date_format.to_string(),
        }
    }

    fn fmt_date(&self, date: NaiveDate) -> String {
        date.format(&self.date_format).to_string()
    }

    fn fmt_date_opt(&self, date: Option<NaiveDate>) -> String {
        date.map(|d| self.fmt_date(d)).unwrap_or_default()
    }

    pub fn write_salary_due_report(&self, items: &[DueItem], path: &Path) -> HrResult<()> {
        let mut w = csv::Writer::from_path(path)?;
        w.write_record([
            "employee_code",
            "full_name",
            "unit",
            "position",
            "kind",
            "current_step",
            "current_coefficient",
            "next_step",
            "next_coefficient",
            "allowance_percent",
            "due_date",
            "days_left",
        ])?;
        for item in items {
            let d = &item.decision;
            let kind = match d.kind {
                DecisionKind::Step => "step",
                DecisionKind::OverLimit => "over_limit",
            };
            w.write_record([
                item.employee_code.as_str(),
                item.full_name.as_str(),
                item.unit_name.as_str(),
                item.position_name.as_str(),
                kind,
                &d.current_step.to_string(),
                &format!("{:.2}", d.current_coefficient),
                &d.next_step.map(|s| s.to_string()).unwrap_or_default(),
                &d.next_coefficient
                    .map(|c| format!("{c:.2}"))
                    .unwrap_or_default(),
                &d.allowance_percent
                    .map(|p| p.to_string())
                    .unwrap_or_default(),
                &self.fmt_date(d.due_date),
                &item.days_left.to_string(),
            ])?;
        }
        w.flush()?;
        Ok(())
    }

    /// Six-month rows first, then three-month rows.
    pub fn write_retirement_report(
        &self,
        six_month: &[RetirementRow],
        three_month: &[RetirementRow],
        path: &Path,
    ) -> HrResult<()> {
        let mut w = csv::Writer::from_path(path)?;
        w.write_record([
            "employee_code",
            "full_name",
            "unit",
            "dob",
            "planned_date",
            "milestone",
        ])?;
        for row in six_month.iter().chain(three_month) {
            let milestone = match row.milestone {
                Milestone::SixMonth => "six_month",
                Milestone::ThreeMonth => "three_month",
            };
            w.write_record([
                row.employee_code.as_str(),
                row.full_name.as_str(),
                row.unit_name.as_str(),
                &self.fmt_date_opt(row.dob),
                &self.fmt_date(row.planned_date),
                milestone,
            ])?;
        }
        w.flush()?;
        Ok(())
    }

    pub fn write_contract_report(&self, items: &[ContractDue], path: &Path) -> HrResult<()> {
        let mut w = csv::Writer::from_path(path)?;
        w.write_record([
            "contract_no",
            "employee_code",
            "full_name",
            "unit",
            "kind",
            "end_date",
            "days_left",
        ])?;
        for item in items {
            w.write_record([
                item.contract.contract_no.as_str(),
                item.employee_code.as_str(),
                item.full_name.as_str(),
                item.unit_name.as_str(),
                item.contract.kind.as_str(),
                &self.fmt_date_opt(item.contract.end_date),
                &item.days_left.to_string(),
            ])?;
        }
        w.flush()?;
        Ok(())
    }

    pub fn write_insurance_report(&self, rows: &[SalaryEventRow], path: &Path) -> HrResult<()> {
        let mut w = csv::Writer::from_path(path)?;
        w.write_record([
            "employee_code",
            "full_name",
            "unit",
            "grade",
            "step",
            "coefficient",
            "effective_date",
            "note",
        ])?;
        for row in rows {
            w.write_record([
                row.employee_code.as_str(),
                row.full_name.as_str(),
                row.unit_name.as_str(),
                row.grade_code.as_str(),
                &row.step_no.to_string(),
                &format!("{:.2}", row.coefficient),
                &self.fmt_date(row.effective_date),
                row.note.as_deref().unwrap_or(""),
            ])?;
        }
        w.flush()?;
        Ok(())
    }

    /// Bundle already-written report files into one ZIP archive.
    pub fn bundle_zip(&self, files: &[PathBuf], zip_path: &Path) -> HrResult<()> {
        let out = std::fs::File::create(zip_path)?;
        let mut zip = zip::ZipWriter::new(out);
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);
        for path in files {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "report.csv".to_string());
            zip.start_file(name, options)?;
            zip.write_all(&std::fs::read(path)?)?;
        }
        zip.finish()?;
        Ok(())
    }
}
