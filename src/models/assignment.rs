use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::ts;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: String,
    pub alert_id: String,
    pub worker_id: String,
    #[serde(with = "ts")]
    pub assigned_at: NaiveDateTime,
}
