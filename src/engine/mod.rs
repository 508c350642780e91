mod cascade;
mod ingest;
mod views;

pub use ingest::{ReportOutcome, ReportReceipt};
pub use views::{AlertCounts, AlertView, DashboardSummary, WorkerCounts};

use crate::classifier::Thresholds;
use crate::error::Result;
use crate::models::alert::Alert;
use crate::models::bin::Bin;
use crate::models::worker::Worker;
use crate::store::JsonStore;

/// Applies the domain rules over the persisted collections.
///
/// Every operation is a full read-modify-write of the documents it touches;
/// the caller serializes operations (one engine behind one mutex), so each
/// one is atomic from the outside.
pub struct Engine {
    store: JsonStore,
    thresholds: Thresholds,
}

impl Engine {
    pub fn new(store: JsonStore, thresholds: Thresholds) -> Self {
        Self { store, thresholds }
    }

    pub fn store(&self) -> &JsonStore {
        &self.store
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn list_workers(&self) -> Result<Vec<Worker>> {
        self.store.load_workers()
    }

    pub fn list_bins(&self) -> Result<Vec<Bin>> {
        self.store.load_bins()
    }

    pub fn list_alerts(&self) -> Result<Vec<Alert>> {
        self.store.load_alerts()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::test_engine;
    use crate::models::alert::{AlertStatus, Severity};
    use crate::models::worker::WorkerStatus;

    // Full lifecycle: report -> alert -> assignment -> resolution.
    #[test]
    fn sensor_report_through_resolution() {
        let (engine, _dir) = test_engine();

        engine
            .add_bin("B1", "12 Harbor Rd", "North", 100)
            .unwrap();

        let receipt = engine.record_report("B1", 85.0).unwrap();
        assert_eq!(receipt.alert.severity, Severity::High);
        assert_eq!(receipt.alert.status, AlertStatus::Active);
        let alert_id = receipt.alert.id.clone();

        engine.add_worker("W1", "Dana Flores", "555-0199").unwrap();
        engine.assign_worker(&alert_id, "W1").unwrap();

        let workers = engine.list_workers().unwrap();
        assert_eq!(workers[0].status, WorkerStatus::Assigned);

        engine.resolve_alert(&alert_id).unwrap();

        let workers = engine.list_workers().unwrap();
        assert_eq!(workers[0].status, WorkerStatus::Available);

        let alerts = engine.list_alerts().unwrap();
        assert_eq!(alerts[0].status, AlertStatus::Resolved);
        assert!(alerts[0].resolved_at.is_some());
    }
}
