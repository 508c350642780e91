use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::ts;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bin {
    pub id: String,
    pub address: String,
    pub area: String,
    pub capacity: u32,
    pub status: String,
    #[serde(with = "ts")]
    pub last_emptied: NaiveDateTime,
    #[serde(with = "ts")]
    pub created_at: NaiveDateTime,
}
