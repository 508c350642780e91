use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::ts;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worker {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub status: WorkerStatus,
    #[serde(with = "ts")]
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerStatus {
    Available,
    Assigned,
    OnLeave,
}
