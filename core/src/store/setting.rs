use super::HrStore;
use crate::error::HrResult;
use rusqlite::{params, OptionalExtension};

impl HrStore {
    pub fn get_setting(&self, key: &str, default: &str) -> HrResult<String> {
        Ok(self.get_setting_opt(key)?.unwrap_or_else(|| default.to_string()))
    }

    pub fn get_setting_opt(&self, key: &str) -> HrResult<Option<String>> {
        self.conn()
            .query_row(
                "SELECT value FROM setting WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn set_setting(&self, key: &str, value: &str) -> HrResult<()> {
        self.conn().execute(
            "INSERT INTO setting (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}
