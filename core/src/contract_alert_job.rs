//! Daily expiring-contract alert.
//!
//! Scans `[today, today + CONTRACT_ALERT_DAYS]` for active contracts with
//! an end date inside the window, then exports and mails the matches
//! globally and per unit.

use crate::{
    contract::ContractDue,
    error::HrResult,
    export::file_slug,
    notify::HrNotification,
    scheduler::{JobContext, ScheduledJob},
};
use chrono::NaiveDate;

pub struct ContractAlertJob;

impl ScheduledJob for ContractAlertJob {
    fn name(&self) -> &'static str {
        "contract_alert"
    }

    fn run(&mut self, today: NaiveDate, ctx: &JobContext<'_>) -> HrResult<()> {
        let window_end = today + chrono::Duration::days(ctx.config.contract_alert_days);
        let items = ctx.store.contracts_expiring(today, window_end, None)?;
        if items.is_empty() {
            return Ok(());
        }

        ctx.notify(HrNotification::ContractsExpiring {
            count: items.len(),
            window_end,
        });

        let label = today.format("%Y%m%d").to_string();
        let subject = format!("Hợp đồng sắp hết hạn: {} trường hợp", items.len());
        let body = items
            .iter()
            .map(|c| {
                format!(
                    "{} - {} ({}) hết hạn {}",
                    c.contract.contract_no,
                    c.full_name,
                    c.unit_name,
                    c.contract
                        .end_date
                        .map(|d| d.to_string())
                        .unwrap_or_default()
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let global_path = ctx.export_dir.join(format!("contracts_{label}.csv"));
        ctx.writer.write_contract_report(&items, &global_path)?;
        ctx.send_report(
            "contracts",
            None,
            &subject,
            &body,
            std::slice::from_ref(&global_path),
            &ctx.config.summary_recipients,
        );

        for unit in ctx.store.units()? {
            let unit_items: Vec<ContractDue> = items
                .iter()
                .filter(|c| c.unit_name == unit.name)
                .cloned()
                .collect();
            if unit_items.is_empty() {
                continue;
            }
            let result = (|| -> HrResult<()> {
                let path = ctx
                    .export_dir
                    .join(format!("contracts_{label}_{}.csv", file_slug(&unit.name)));
                ctx.writer.write_contract_report(&unit_items, &path)?;
                ctx.send_report(
                    "contracts",
                    Some(&unit.name),
                    &subject,
                    &body,
                    std::slice::from_ref(&path),
                    &ctx.config.unit_recipients(&unit),
                );
                Ok(())
            })();
            if let Err(e) = result {
                log::error!("contract alert: unit '{}' failed: {e}", unit.name);
            }
        }
        Ok(())
    }
}
