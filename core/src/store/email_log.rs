use super::HrStore;
use crate::{
    error::HrResult,
    mail::{EmailLogEntry, SendStatus},
};
use rusqlite::params;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

impl HrStore {
    // ── Email audit log (append-only) ─────────────────────────────

    pub fn append_email_log(&self, entry: &EmailLogEntry) -> HrResult<()> {
        self.conn().execute(
            "INSERT INTO email_log (
                id, category, unit_name, recipients, subject, body,
                attachments, status, error, attempts, sent_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                &entry.id,
                &entry.category,
                &entry.unit_name,
                &entry.recipients,
                &entry.subject,
                &entry.body,
                &entry.attachments,
                entry.status.as_str(),
                &entry.error,
                entry.attempts,
                entry.sent_at.format(TIMESTAMP_FORMAT).to_string(),
            ],
        )?;
        Ok(())
    }

    /// Filtered history view over the audit log, newest first.
    pub fn email_logs(
        &self,
        category: Option<&str>,
        status: Option<SendStatus>,
    ) -> HrResult<Vec<EmailLogEntry>> {
        let mut sql = String::from(
            "SELECT id, category, unit_name, recipients, subject, body,
                    attachments, status, error, attempts, sent_at
             FROM email_log WHERE 1=1",
        );
        let mut args: Vec<String> = Vec::new();
        if let Some(category) = category {
            args.push(category.to_string());
            sql.push_str(&format!(" AND category = ?{}", args.len()));
        }
        if let Some(status) = status {
            args.push(status.as_str().to_string());
            sql.push_str(&format!(" AND status = ?{}", args.len()));
        }
        // rowid breaks same-second ties by insertion order.
        sql.push_str(" ORDER BY sent_at DESC, rowid DESC");

        let mut stmt = self.conn().prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(args), |row| {
            let status_raw: String = row.get(7)?;
            let sent_raw: String = row.get(10)?;
            Ok(EmailLogEntry {
                id: row.get(0)?,
                category: row.get(1)?,
                unit_name: row.get(2)?,
                recipients: row.get(3)?,
                subject: row.get(4)?,
                body: row.get(5)?,
                attachments: row.get(6)?,
                status: SendStatus::parse(&status_raw)
                    .ok_or_else(|| super::sql_enum_err(7, &status_raw))?,
                error: row.get(8)?,
                attempts: row.get(9)?,
                sent_at: chrono::NaiveDateTime::parse_from_str(&sent_raw, TIMESTAMP_FORMAT)
                    .map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            10,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
