//! Read-side projections for the dashboard and alert listing.

use serde::Serialize;

use super::Engine;
use crate::error::Result;
use crate::models::alert::{Alert, AlertStatus, Severity};
use crate::models::worker::{Worker, WorkerStatus};

#[derive(Debug, Clone, Serialize)]
pub struct AlertCounts {
    pub low: usize,
    pub moderate: usize,
    pub high: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkerCounts {
    pub available: usize,
    pub assigned: usize,
    pub on_leave: usize,
}

/// An active alert joined with its bin location and assigned workers.
#[derive(Debug, Clone, Serialize)]
pub struct AlertView {
    #[serde(flatten)]
    pub alert: Alert,
    pub address: String,
    pub area: String,
    pub assigned_workers: Vec<Worker>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub alert_counts: AlertCounts,
    pub worker_counts: WorkerCounts,
    pub active_alerts: Vec<AlertView>,
}

impl Engine {
    /// Active alerts enriched with bin location and assigned workers,
    /// most urgent first.
    pub fn active_alerts(&self) -> Result<Vec<AlertView>> {
        let alerts = self.store().load_alerts()?;
        let bins = self.store().load_bins()?;
        let workers = self.store().load_workers()?;
        let assignments = self.store().load_assignments()?;

        let mut views: Vec<AlertView> = alerts
            .into_iter()
            .filter(|a| a.status == AlertStatus::Active)
            .map(|alert| {
                let (address, area) = bins
                    .iter()
                    .find(|b| b.id == alert.bin_id)
                    .map(|b| (b.address.clone(), b.area.clone()))
                    .unwrap_or_else(|| ("Unknown".to_string(), "Unknown".to_string()));
                let assigned_workers = assignments
                    .iter()
                    .filter(|a| a.alert_id == alert.id)
                    .filter_map(|a| workers.iter().find(|w| w.id == a.worker_id))
                    .cloned()
                    .collect();
                AlertView {
                    alert,
                    address,
                    area,
                    assigned_workers,
                }
            })
            .collect();

        views.sort_by_key(|v| v.alert.severity.priority());
        Ok(views)
    }

    pub fn dashboard(&self) -> Result<DashboardSummary> {
        let workers = self.store().load_workers()?;
        let active_alerts = self.active_alerts()?;

        let count_severity = |severity: Severity| {
            active_alerts
                .iter()
                .filter(|v| v.alert.severity == severity)
                .count()
        };
        let count_status = |status: WorkerStatus| {
            workers.iter().filter(|w| w.status == status).count()
        };

        Ok(DashboardSummary {
            alert_counts: AlertCounts {
                low: count_severity(Severity::Low),
                moderate: count_severity(Severity::Moderate),
                high: count_severity(Severity::High),
            },
            worker_counts: WorkerCounts {
                available: count_status(WorkerStatus::Available),
                assigned: count_status(WorkerStatus::Assigned),
                on_leave: count_status(WorkerStatus::OnLeave),
            },
            active_alerts,
        })
    }
}
