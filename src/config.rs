use anyhow::Result;
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

use crate::classifier::Thresholds;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub workers_file: String,
    pub bins_file: String,
    pub alerts_file: String,
    pub assignments_file: String,
    pub thresholds: Thresholds,
    pub admin_username: String,
    pub admin_password: String,
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let data_dir = PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()));
        let workers_file = env::var("WORKERS_FILE").unwrap_or_else(|_| "workers.json".to_string());
        let bins_file = env::var("BINS_FILE").unwrap_or_else(|_| "bins.json".to_string());
        let alerts_file = env::var("ALERTS_FILE").unwrap_or_else(|_| "alerts.json".to_string());
        let assignments_file =
            env::var("ASSIGNMENTS_FILE").unwrap_or_else(|_| "assignments.json".to_string());

        let threshold_low = env::var("ALERT_THRESHOLD_LOW")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30.0);
        let threshold_moderate = env::var("ALERT_THRESHOLD_MODERATE")
            .unwrap_or_else(|_| "70".to_string())
            .parse()
            .unwrap_or(70.0);

        let admin_username = env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
        let admin_password = env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .unwrap_or(5000);

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            data_dir,
            workers_file,
            bins_file,
            alerts_file,
            assignments_file,
            thresholds: Thresholds {
                low: threshold_low,
                moderate: threshold_moderate,
            },
            admin_username,
            admin_password,
            host,
            port,
            log_level,
        })
    }
}
