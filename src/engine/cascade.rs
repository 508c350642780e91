//! Multi-collection mutations and their referential-integrity side effects.

use tracing::info;
use uuid::Uuid;

use super::Engine;
use crate::error::{Result, ServiceError};
use crate::models::alert::{Alert, AlertStatus};
use crate::models::assignment::Assignment;
use crate::models::bin::Bin;
use crate::models::now;
use crate::models::worker::{Worker, WorkerStatus};

impl Engine {
    pub fn add_worker(&self, id: &str, name: &str, phone: &str) -> Result<Worker> {
        let mut workers = self.store().load_workers()?;
        if workers.iter().any(|w| w.id == id) {
            return Err(ServiceError::Conflict(format!(
                "Worker ID {id} already exists"
            )));
        }

        let worker = Worker {
            id: id.to_string(),
            name: name.to_string(),
            phone: phone.to_string(),
            status: WorkerStatus::Available,
            created_at: now(),
        };
        workers.push(worker.clone());
        self.store().save_workers(&workers)?;

        info!("Added worker {}", worker.id);
        Ok(worker)
    }

    /// Removes the worker and every assignment that references them.
    pub fn delete_worker(&self, id: &str) -> Result<()> {
        let mut workers = self.store().load_workers()?;
        let before = workers.len();
        workers.retain(|w| w.id != id);
        if workers.len() == before {
            return Err(ServiceError::NotFound(format!("Worker {id} not found")));
        }

        let mut assignments = self.store().load_assignments()?;
        assignments.retain(|a| a.worker_id != id);

        self.store().save_workers(&workers)?;
        self.store().save_assignments(&assignments)?;

        info!("Deleted worker {id}");
        Ok(())
    }

    /// Only `available` and `on_leave` are reachable directly; `assigned` is
    /// driven by the assignment operations. Going on leave force-frees any
    /// assignment the worker held without resolving the alert.
    pub fn set_worker_status(&self, id: &str, status: WorkerStatus) -> Result<Worker> {
        if !matches!(status, WorkerStatus::Available | WorkerStatus::OnLeave) {
            return Err(ServiceError::Validation("Invalid status".to_string()));
        }

        let mut workers = self.store().load_workers()?;
        let worker = workers
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| ServiceError::NotFound(format!("Worker {id} not found")))?;
        worker.status = status;
        let updated = worker.clone();

        if status == WorkerStatus::OnLeave {
            let mut assignments = self.store().load_assignments()?;
            assignments.retain(|a| a.worker_id != id);
            self.store().save_assignments(&assignments)?;
        }

        self.store().save_workers(&workers)?;
        Ok(updated)
    }

    pub fn add_bin(&self, id: &str, address: &str, area: &str, capacity: u32) -> Result<Bin> {
        let mut bins = self.store().load_bins()?;
        if bins.iter().any(|b| b.id == id) {
            return Err(ServiceError::Conflict(format!("Bin ID {id} already exists")));
        }

        let bin = Bin {
            id: id.to_string(),
            address: address.to_string(),
            area: area.to_string(),
            capacity,
            status: "active".to_string(),
            last_emptied: now(),
            created_at: now(),
        };
        bins.push(bin.clone());
        self.store().save_bins(&bins)?;

        info!("Added bin {}", bin.id);
        Ok(bin)
    }

    pub fn edit_bin(&self, id: &str, address: &str, area: &str, capacity: u32) -> Result<Bin> {
        let mut bins = self.store().load_bins()?;
        let bin = bins
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| ServiceError::NotFound(format!("Bin {id} not found")))?;
        bin.address = address.to_string();
        bin.area = area.to_string();
        bin.capacity = capacity;
        let updated = bin.clone();

        self.store().save_bins(&bins)?;
        Ok(updated)
    }

    /// Removes the bin, its alerts, the assignments for those alerts, and
    /// returns the affected workers to `available`.
    pub fn delete_bin(&self, id: &str) -> Result<()> {
        let mut bins = self.store().load_bins()?;
        let before = bins.len();
        bins.retain(|b| b.id != id);
        if bins.len() == before {
            return Err(ServiceError::NotFound(format!("Bin {id} not found")));
        }

        let mut alerts = self.store().load_alerts()?;
        let dropped_alert_ids: Vec<String> = alerts
            .iter()
            .filter(|a| a.bin_id == id)
            .map(|a| a.id.clone())
            .collect();
        alerts.retain(|a| a.bin_id != id);

        let mut assignments = self.store().load_assignments()?;
        let freed_worker_ids: Vec<String> = assignments
            .iter()
            .filter(|a| dropped_alert_ids.contains(&a.alert_id))
            .map(|a| a.worker_id.clone())
            .collect();
        assignments.retain(|a| !dropped_alert_ids.contains(&a.alert_id));

        let mut workers = self.store().load_workers()?;
        for worker in workers.iter_mut().filter(|w| freed_worker_ids.contains(&w.id)) {
            worker.status = WorkerStatus::Available;
        }

        self.store().save_bins(&bins)?;
        self.store().save_alerts(&alerts)?;
        self.store().save_assignments(&assignments)?;
        self.store().save_workers(&workers)?;

        info!(
            "Deleted bin {id} with {} alerts and {} assignments",
            dropped_alert_ids.len(),
            freed_worker_ids.len()
        );
        Ok(())
    }

    /// Marks the alert resolved, drops its assignments and frees every
    /// worker that was on it.
    pub fn resolve_alert(&self, alert_id: &str) -> Result<Alert> {
        let mut alerts = self.store().load_alerts()?;
        let alert = alerts
            .iter_mut()
            .find(|a| a.id == alert_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Alert {alert_id} not found")))?;
        if alert.status == AlertStatus::Resolved {
            return Err(ServiceError::Conflict(format!(
                "Alert {alert_id} already resolved"
            )));
        }
        alert.status = AlertStatus::Resolved;
        alert.resolved_at = Some(now());
        let resolved = alert.clone();

        let mut assignments = self.store().load_assignments()?;
        let freed_worker_ids: Vec<String> = assignments
            .iter()
            .filter(|a| a.alert_id == alert_id)
            .map(|a| a.worker_id.clone())
            .collect();
        assignments.retain(|a| a.alert_id != alert_id);

        let mut workers = self.store().load_workers()?;
        for worker in workers.iter_mut().filter(|w| freed_worker_ids.contains(&w.id)) {
            worker.status = WorkerStatus::Available;
        }

        self.store().save_alerts(&alerts)?;
        self.store().save_assignments(&assignments)?;
        self.store().save_workers(&workers)?;

        info!("Resolved alert {alert_id}, freed {} workers", freed_worker_ids.len());
        Ok(resolved)
    }

    pub fn assign_worker(&self, alert_id: &str, worker_id: &str) -> Result<Assignment> {
        let alerts = self.store().load_alerts()?;
        let alert_active = alerts
            .iter()
            .any(|a| a.id == alert_id && a.status == AlertStatus::Active);
        if !alert_active {
            return Err(ServiceError::NotFound(format!(
                "Alert {alert_id} not found or already resolved"
            )));
        }

        let mut workers = self.store().load_workers()?;
        let worker = workers
            .iter_mut()
            .find(|w| w.id == worker_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Worker {worker_id} not found")))?;
        if worker.status != WorkerStatus::Available {
            return Err(ServiceError::Conflict(format!(
                "Worker {worker_id} is not available"
            )));
        }
        worker.status = WorkerStatus::Assigned;

        let assignment = Assignment {
            id: format!("assign_{}", Uuid::new_v4()),
            alert_id: alert_id.to_string(),
            worker_id: worker_id.to_string(),
            assigned_at: now(),
        };
        let mut assignments = self.store().load_assignments()?;
        assignments.push(assignment.clone());

        self.store().save_workers(&workers)?;
        self.store().save_assignments(&assignments)?;

        info!("Assigned worker {worker_id} to alert {alert_id}");
        Ok(assignment)
    }

    /// Drops the exact (alert, worker) assignment and returns the worker to
    /// `available`. Workers hold a single assignment in practice, so the
    /// status reset is unconditional.
    pub fn unassign_worker(&self, alert_id: &str, worker_id: &str) -> Result<()> {
        let mut assignments = self.store().load_assignments()?;
        let before = assignments.len();
        assignments.retain(|a| !(a.alert_id == alert_id && a.worker_id == worker_id));
        if assignments.len() == before {
            return Err(ServiceError::NotFound(format!(
                "No assignment of worker {worker_id} to alert {alert_id}"
            )));
        }

        let mut workers = self.store().load_workers()?;
        if let Some(worker) = workers.iter_mut().find(|w| w.id == worker_id) {
            worker.status = WorkerStatus::Available;
        }

        self.store().save_assignments(&assignments)?;
        self.store().save_workers(&workers)?;

        info!("Unassigned worker {worker_id} from alert {alert_id}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::test_support::test_engine;
    use crate::error::ServiceError;
    use crate::models::alert::AlertStatus;
    use crate::models::worker::WorkerStatus;

    #[test]
    fn duplicate_ids_are_rejected() {
        let (engine, _dir) = test_engine();
        engine.add_worker("W1", "Dana Flores", "555-0199").unwrap();
        let err = engine.add_worker("W1", "Sam Obi", "555-0100").unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        engine.add_bin("B1", "12 Harbor Rd", "North", 100).unwrap();
        let err = engine.add_bin("B1", "9 Mill Ln", "South", 80).unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[test]
    fn deleting_worker_drops_their_assignments() {
        let (engine, _dir) = test_engine();
        engine.add_bin("B1", "12 Harbor Rd", "North", 100).unwrap();
        let receipt = engine.record_report("B1", 90.0).unwrap();
        engine.add_worker("W1", "Dana Flores", "555-0199").unwrap();
        engine.assign_worker(&receipt.alert.id, "W1").unwrap();

        engine.delete_worker("W1").unwrap();

        assert!(engine.list_workers().unwrap().is_empty());
        assert!(engine.store().load_assignments().unwrap().is_empty());
    }

    #[test]
    fn on_leave_frees_assignment_but_not_alert() {
        let (engine, _dir) = test_engine();
        engine.add_bin("B1", "12 Harbor Rd", "North", 100).unwrap();
        let receipt = engine.record_report("B1", 90.0).unwrap();
        engine.add_worker("W1", "Dana Flores", "555-0199").unwrap();
        engine.assign_worker(&receipt.alert.id, "W1").unwrap();

        engine
            .set_worker_status("W1", WorkerStatus::OnLeave)
            .unwrap();

        assert!(engine.store().load_assignments().unwrap().is_empty());
        let alerts = engine.list_alerts().unwrap();
        assert_eq!(alerts[0].status, AlertStatus::Active);
    }

    #[test]
    fn assigned_is_not_directly_settable() {
        let (engine, _dir) = test_engine();
        engine.add_worker("W1", "Dana Flores", "555-0199").unwrap();
        let err = engine
            .set_worker_status("W1", WorkerStatus::Assigned)
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn resolving_frees_all_assigned_workers() {
        let (engine, _dir) = test_engine();
        engine.add_bin("B1", "12 Harbor Rd", "North", 100).unwrap();
        let receipt = engine.record_report("B1", 95.0).unwrap();
        engine.add_worker("W1", "Dana Flores", "555-0199").unwrap();
        engine.add_worker("W2", "Sam Obi", "555-0100").unwrap();
        engine.assign_worker(&receipt.alert.id, "W1").unwrap();
        engine.assign_worker(&receipt.alert.id, "W2").unwrap();

        engine.resolve_alert(&receipt.alert.id).unwrap();

        let workers = engine.list_workers().unwrap();
        assert!(workers.iter().all(|w| w.status == WorkerStatus::Available));
        assert!(engine.store().load_assignments().unwrap().is_empty());
    }

    #[test]
    fn resolving_twice_is_a_conflict() {
        let (engine, _dir) = test_engine();
        engine.add_bin("B1", "12 Harbor Rd", "North", 100).unwrap();
        let receipt = engine.record_report("B1", 95.0).unwrap();
        engine.resolve_alert(&receipt.alert.id).unwrap();
        let err = engine.resolve_alert(&receipt.alert.id).unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[test]
    fn assigning_unavailable_worker_changes_nothing() {
        let (engine, _dir) = test_engine();
        engine.add_bin("B1", "12 Harbor Rd", "North", 100).unwrap();
        let receipt = engine.record_report("B1", 95.0).unwrap();
        engine.add_worker("W1", "Dana Flores", "555-0199").unwrap();
        engine
            .set_worker_status("W1", WorkerStatus::OnLeave)
            .unwrap();

        let err = engine.assign_worker(&receipt.alert.id, "W1").unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        assert!(engine.store().load_assignments().unwrap().is_empty());
        let workers = engine.list_workers().unwrap();
        assert_eq!(workers[0].status, WorkerStatus::OnLeave);
    }

    #[test]
    fn assigning_to_resolved_alert_changes_nothing() {
        let (engine, _dir) = test_engine();
        engine.add_bin("B1", "12 Harbor Rd", "North", 100).unwrap();
        let receipt = engine.record_report("B1", 95.0).unwrap();
        engine.resolve_alert(&receipt.alert.id).unwrap();
        engine.add_worker("W1", "Dana Flores", "555-0199").unwrap();

        let err = engine.assign_worker(&receipt.alert.id, "W1").unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        let workers = engine.list_workers().unwrap();
        assert_eq!(workers[0].status, WorkerStatus::Available);
        assert!(engine.store().load_assignments().unwrap().is_empty());
    }

    #[test]
    fn unassign_returns_worker_to_available() {
        let (engine, _dir) = test_engine();
        engine.add_bin("B1", "12 Harbor Rd", "North", 100).unwrap();
        let receipt = engine.record_report("B1", 95.0).unwrap();
        engine.add_worker("W1", "Dana Flores", "555-0199").unwrap();
        engine.assign_worker(&receipt.alert.id, "W1").unwrap();

        engine.unassign_worker(&receipt.alert.id, "W1").unwrap();

        let workers = engine.list_workers().unwrap();
        assert_eq!(workers[0].status, WorkerStatus::Available);
        assert!(engine.store().load_assignments().unwrap().is_empty());

        let err = engine.unassign_worker(&receipt.alert.id, "W1").unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn deleting_bin_cascades_to_alerts_and_assignments() {
        let (engine, _dir) = test_engine();
        engine.add_bin("B1", "12 Harbor Rd", "North", 100).unwrap();
        let receipt = engine.record_report("B1", 95.0).unwrap();
        engine.add_worker("W1", "Dana Flores", "555-0199").unwrap();
        engine.assign_worker(&receipt.alert.id, "W1").unwrap();

        engine.delete_bin("B1").unwrap();

        assert!(engine.list_bins().unwrap().is_empty());
        assert!(engine.list_alerts().unwrap().is_empty());
        assert!(engine.store().load_assignments().unwrap().is_empty());
        let workers = engine.list_workers().unwrap();
        assert_eq!(workers[0].status, WorkerStatus::Available);
    }

    #[test]
    fn edit_bin_updates_fields_in_place() {
        let (engine, _dir) = test_engine();
        engine.add_bin("B1", "12 Harbor Rd", "North", 100).unwrap();
        let updated = engine.edit_bin("B1", "9 Mill Ln", "South", 80).unwrap();
        assert_eq!(updated.address, "9 Mill Ln");
        assert_eq!(updated.capacity, 80);

        let bins = engine.list_bins().unwrap();
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].area, "South");
    }
}
