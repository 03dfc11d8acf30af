/// Configuration management for the scanner worker
///
/// Loads configuration from environment variables into a typed struct.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: 5)
/// - `SCAN_INTERVAL_HOURS`: hours between scans (default: 24)
/// - `SCAN_MEDICAL_WINDOW_DAYS`: medical exam look-ahead (default: 30)
/// - `SCAN_EQUIPMENT_WINDOW_DAYS`: equipment look-ahead (default: 30)
/// - `SCAN_TRAINING_WINDOW_DAYS`: training look-ahead (default: 30)
/// - `NOTIFY_EMAIL_ENDPOINT` / `NOTIFY_SMS_ENDPOINT` / `NOTIFY_PUSH_ENDPOINT`:
///   provider URLs; a channel is only constructed when its endpoint is set
/// - `NOTIFY_API_KEY`: bearer token for the provider endpoints

use crate::scanner::ScannerConfig;
use serde::{Deserialize, Serialize};
use std::env;

/// Complete worker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database configuration
    pub database: DatabaseConfig,

    /// Scan cadence and windows
    pub scan: ScanConfig,

    /// Notification provider endpoints
    pub notifications: NotificationsConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// Scan configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Hours between scheduled scans
    pub interval_hours: u64,

    /// Medical exam look-ahead window (days)
    pub medical_window_days: i64,

    /// Equipment inspection look-ahead window (days)
    pub equipment_window_days: i64,

    /// Training look-ahead window (days)
    pub training_window_days: i64,
}

/// Notification provider configuration
///
/// A channel is only constructed when its endpoint is present, so a bare
/// deployment can run the scanner with alerts only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Transactional email provider URL
    pub email_endpoint: Option<String>,

    /// SMS gateway URL
    pub sms_endpoint: Option<String>,

    /// Mobile push relay URL
    pub push_endpoint: Option<String>,

    /// Bearer token shared by the provider endpoints
    pub api_key: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if required variables are missing or unparseable.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()?;

        let interval_hours = env::var("SCAN_INTERVAL_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse::<u64>()?;

        let medical_window_days = env::var("SCAN_MEDICAL_WINDOW_DAYS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<i64>()?;

        let equipment_window_days = env::var("SCAN_EQUIPMENT_WINDOW_DAYS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<i64>()?;

        let training_window_days = env::var("SCAN_TRAINING_WINDOW_DAYS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<i64>()?;

        Ok(Self {
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            scan: ScanConfig {
                interval_hours,
                medical_window_days,
                equipment_window_days,
                training_window_days,
            },
            notifications: NotificationsConfig {
                email_endpoint: env::var("NOTIFY_EMAIL_ENDPOINT").ok(),
                sms_endpoint: env::var("NOTIFY_SMS_ENDPOINT").ok(),
                push_endpoint: env::var("NOTIFY_PUSH_ENDPOINT").ok(),
                api_key: env::var("NOTIFY_API_KEY").ok(),
            },
        })
    }
}

impl ScanConfig {
    /// Converts to the scanner's runtime configuration
    pub fn to_scanner_config(&self) -> ScannerConfig {
        ScannerConfig {
            interval_hours: self.interval_hours,
            medical_window_days: self.medical_window_days,
            equipment_window_days: self.equipment_window_days,
            training_window_days: self.training_window_days,
            ..ScannerConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_config_conversion() {
        let scan = ScanConfig {
            interval_hours: 12,
            medical_window_days: 45,
            equipment_window_days: 30,
            training_window_days: 15,
        };

        let scanner = scan.to_scanner_config();
        assert_eq!(scanner.interval_hours, 12);
        assert_eq!(scanner.medical_window_days, 45);
        assert_eq!(scanner.training_window_days, 15);
        assert_eq!(scanner.organization_batch_size, 100);
    }
}
