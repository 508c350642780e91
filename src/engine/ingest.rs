//! Sensor report handling: create-or-update of the bin's active alert.

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::Engine;
use crate::error::{Result, ServiceError};
use crate::models::alert::{Alert, AlertStatus};
use crate::models::now;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportOutcome {
    Created,
    Updated,
}

impl ReportOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            ReportOutcome::Created => "New alert created",
            ReportOutcome::Updated => "Alert updated",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportReceipt {
    pub outcome: ReportOutcome,
    pub alert: Alert,
}

impl Engine {
    /// Records a fill-level report for a bin. A bin holds at most one active
    /// alert, so a second report updates it in place instead of duplicating.
    pub fn record_report(&self, bin_id: &str, fill_level: f64) -> Result<ReportReceipt> {
        if !(0.0..=100.0).contains(&fill_level) {
            return Err(ServiceError::Validation(format!(
                "Fill level {fill_level} outside 0-100"
            )));
        }

        let bins = self.store().load_bins()?;
        if !bins.iter().any(|b| b.id == bin_id) {
            return Err(ServiceError::NotFound(format!("Bin ID {bin_id} does not exist")));
        }

        let severity = self.thresholds().classify(fill_level);
        let mut alerts = self.store().load_alerts()?;
        let timestamp = now();

        let receipt = match alerts
            .iter_mut()
            .find(|a| a.bin_id == bin_id && a.status == AlertStatus::Active)
        {
            Some(existing) => {
                existing.fill_level = fill_level;
                existing.severity = severity;
                existing.updated_at = timestamp;
                ReportReceipt {
                    outcome: ReportOutcome::Updated,
                    alert: existing.clone(),
                }
            }
            None => {
                let alert = Alert {
                    id: format!("alert_{}", Uuid::new_v4()),
                    bin_id: bin_id.to_string(),
                    fill_level,
                    severity,
                    status: AlertStatus::Active,
                    created_at: timestamp,
                    updated_at: timestamp,
                    resolved_at: None,
                };
                alerts.push(alert.clone());
                ReportReceipt {
                    outcome: ReportOutcome::Created,
                    alert,
                }
            }
        };

        self.store().save_alerts(&alerts)?;

        info!(
            "Report for bin {bin_id}: fill {fill_level}%, severity {:?}, {:?}",
            receipt.alert.severity, receipt.outcome
        );
        Ok(receipt)
    }
}
