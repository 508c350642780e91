use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{ts, ts_opt};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub bin_id: String,
    pub fill_level: f64,
    pub severity: Severity,
    pub status: AlertStatus,
    #[serde(with = "ts")]
    pub created_at: NaiveDateTime,
    #[serde(with = "ts")]
    pub updated_at: NaiveDateTime,
    #[serde(default, with = "ts_opt", skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Moderate,
    High,
}

impl Severity {
    /// Dashboard ordering, most urgent first.
    pub fn priority(&self) -> u8 {
        match self {
            Severity::High => 0,
            Severity::Moderate => 1,
            Severity::Low => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    Active,
    Resolved,
}
