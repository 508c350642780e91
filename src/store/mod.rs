use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::AppConfig;
use crate::error::Result;
use crate::models::alert::Alert;
use crate::models::assignment::Assignment;
use crate::models::bin::Bin;
use crate::models::worker::Worker;

#[derive(Serialize, Deserialize, Default)]
struct WorkersDoc {
    workers: Vec<Worker>,
}

#[derive(Serialize, Deserialize, Default)]
struct BinsDoc {
    bins: Vec<Bin>,
}

#[derive(Serialize, Deserialize, Default)]
struct AlertsDoc {
    alerts: Vec<Alert>,
}

#[derive(Serialize, Deserialize, Default)]
struct AssignmentsDoc {
    assignments: Vec<Assignment>,
}

/// Whole-document JSON persistence for the four collections.
///
/// Every load returns the full collection and every save rewrites it; a
/// missing or unreadable file reads as the empty collection.
pub struct JsonStore {
    workers_path: PathBuf,
    bins_path: PathBuf,
    alerts_path: PathBuf,
    assignments_path: PathBuf,
}

impl JsonStore {
    /// Creates the data directory if needed and seeds missing files with
    /// empty documents.
    pub fn open(config: &AppConfig) -> Result<Self> {
        fs::create_dir_all(&config.data_dir)?;

        let store = Self {
            workers_path: config.data_dir.join(&config.workers_file),
            bins_path: config.data_dir.join(&config.bins_file),
            alerts_path: config.data_dir.join(&config.alerts_file),
            assignments_path: config.data_dir.join(&config.assignments_file),
        };

        if !store.workers_path.exists() {
            store.save_workers(&[])?;
        }
        if !store.bins_path.exists() {
            store.save_bins(&[])?;
        }
        if !store.alerts_path.exists() {
            store.save_alerts(&[])?;
        }
        if !store.assignments_path.exists() {
            store.save_assignments(&[])?;
        }

        Ok(store)
    }

    pub fn load_workers(&self) -> Result<Vec<Worker>> {
        Ok(load_doc::<WorkersDoc>(&self.workers_path)?.workers)
    }

    pub fn save_workers(&self, workers: &[Worker]) -> Result<()> {
        save_doc(&self.workers_path, &serde_json::json!({ "workers": workers }))
    }

    pub fn load_bins(&self) -> Result<Vec<Bin>> {
        Ok(load_doc::<BinsDoc>(&self.bins_path)?.bins)
    }

    pub fn save_bins(&self, bins: &[Bin]) -> Result<()> {
        save_doc(&self.bins_path, &serde_json::json!({ "bins": bins }))
    }

    pub fn load_alerts(&self) -> Result<Vec<Alert>> {
        Ok(load_doc::<AlertsDoc>(&self.alerts_path)?.alerts)
    }

    pub fn save_alerts(&self, alerts: &[Alert]) -> Result<()> {
        save_doc(&self.alerts_path, &serde_json::json!({ "alerts": alerts }))
    }

    pub fn load_assignments(&self) -> Result<Vec<Assignment>> {
        Ok(load_doc::<AssignmentsDoc>(&self.assignments_path)?.assignments)
    }

    pub fn save_assignments(&self, assignments: &[Assignment]) -> Result<()> {
        save_doc(
            &self.assignments_path,
            &serde_json::json!({ "assignments": assignments }),
        )
    }
}

fn load_doc<D: DeserializeOwned + Default>(path: &Path) -> Result<D> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(D::default()),
        Err(e) => return Err(e.into()),
    };

    match serde_json::from_slice(&bytes) {
        Ok(doc) => Ok(doc),
        Err(e) => {
            warn!("Unreadable document {}, treating as empty: {}", path.display(), e);
            Ok(D::default())
        }
    }
}

// Write-then-rename so a crash mid-save never leaves a truncated document.
fn save_doc<D: Serialize>(path: &Path, doc: &D) -> Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, serde_json::to_vec_pretty(doc)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Thresholds;

    fn test_config(dir: &Path) -> AppConfig {
        AppConfig {
            data_dir: dir.to_path_buf(),
            workers_file: "workers.json".to_string(),
            bins_file: "bins.json".to_string(),
            alerts_file: "alerts.json".to_string(),
            assignments_file: "assignments.json".to_string(),
            thresholds: Thresholds::default(),
            admin_username: "admin".to_string(),
            admin_password: "admin123".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn open_seeds_empty_documents() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(&test_config(dir.path())).unwrap();

        assert!(dir.path().join("workers.json").exists());
        assert!(store.load_workers().unwrap().is_empty());
        assert!(store.load_alerts().unwrap().is_empty());
    }

    #[test]
    fn corrupt_document_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(&test_config(dir.path())).unwrap();

        fs::write(dir.path().join("bins.json"), b"{not json").unwrap();
        assert!(store.load_bins().unwrap().is_empty());
    }

    #[test]
    fn workers_round_trip() {
        use crate::models::worker::{Worker, WorkerStatus};

        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(&test_config(dir.path())).unwrap();

        let workers = vec![Worker {
            id: "W1".to_string(),
            name: "Dana Flores".to_string(),
            phone: "555-0199".to_string(),
            status: WorkerStatus::Available,
            created_at: crate::models::now(),
        }];
        store.save_workers(&workers).unwrap();

        let loaded = store.load_workers().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "W1");
        assert_eq!(loaded[0].status, WorkerStatus::Available);
    }
}
