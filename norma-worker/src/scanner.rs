/// Expiry scanner
///
/// This module implements the scheduled scan that turns approaching
/// compliance deadlines into alerts and notifications. It walks every
/// organization, runs three independent threshold queries (medical exams,
/// equipment inspections, trainings), classifies the counts into severity
/// buckets, inserts alert rows, and pushes a notification through every
/// configured channel.
///
/// # Architecture
///
/// ```text
/// ExpiryScanner
///   ├─> expire lapsed trials (reconciliation sweep)
///   ├─> Organization::list: page through tenants
///   ├─> per tenant: three count queries → Severity::for_count
///   ├─> Alert::create per non-zero count
///   └─> NotificationChannel::send per channel (one attempt, logged)
/// ```
///
/// The scan runs from two triggers with identical behavior: the worker
/// binary's own timer loop, and the API's cron endpoint. Delivery failures
/// and even whole-tenant scan failures are logged and skipped so one bad
/// tenant cannot starve the rest.
///
/// # Example
///
/// ```no_run
/// use norma_worker::scanner::{ExpiryScanner, ScannerConfig};
/// use norma_worker::channels::MockChannel;
/// use sqlx::PgPool;
/// use std::sync::Arc;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let scanner = ExpiryScanner::new(pool, vec![Arc::new(MockChannel::new())]);
///
/// // One-shot scan (what the cron endpoint runs)
/// let summary = scanner.scan_all().await?;
/// println!("{} alerts created", summary.alerts_created);
/// # Ok(())
/// # }
/// ```

use crate::channels::{Notification, NotificationChannel};
use norma_shared::models::alert::{Alert, AlertKind, CreateAlert, Severity};
use norma_shared::models::equipment::Equipment;
use norma_shared::models::medical_exam::MedicalExam;
use norma_shared::models::org_module::OrganizationModule;
use norma_shared::models::organization::Organization;
use norma_shared::models::training::Training;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Scanner configuration
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Hours between scheduled scans
    pub interval_hours: u64,

    /// Look-ahead window for medical exam expiries (days)
    pub medical_window_days: i64,

    /// Look-ahead window for equipment inspections (days)
    pub equipment_window_days: i64,

    /// Look-ahead window for training expiries (days)
    pub training_window_days: i64,

    /// Organizations fetched per page while walking tenants
    pub organization_batch_size: i64,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        ScannerConfig {
            interval_hours: 24,
            medical_window_days: 30,
            equipment_window_days: 30,
            training_window_days: 30,
            organization_batch_size: 100,
        }
    }
}

/// Totals from one full scan
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanSummary {
    /// Organizations walked
    pub organizations_scanned: u64,

    /// Alert rows inserted
    pub alerts_created: u64,

    /// Notifications delivered
    pub notifications_sent: u64,

    /// Notifications that failed delivery (logged, not retried)
    pub notifications_failed: u64,

    /// Trial rows reconciled to expired
    pub trials_expired: u64,
}

/// Expiry scanner
///
/// Walks tenants on a timer, producing alerts and notifications.
pub struct ExpiryScanner {
    /// Database connection pool
    db: PgPool,

    /// Delivery channels, all of which receive every notification
    channels: Vec<Arc<dyn NotificationChannel>>,

    /// Configuration
    config: ScannerConfig,

    /// Shutdown token
    shutdown_token: CancellationToken,
}

impl ExpiryScanner {
    /// Creates a scanner with default configuration
    pub fn new(db: PgPool, channels: Vec<Arc<dyn NotificationChannel>>) -> Self {
        Self::with_config(db, channels, ScannerConfig::default())
    }

    /// Creates a scanner with custom configuration
    pub fn with_config(
        db: PgPool,
        channels: Vec<Arc<dyn NotificationChannel>>,
        config: ScannerConfig,
    ) -> Self {
        ExpiryScanner {
            db,
            channels,
            config,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Returns the shutdown token for external cancellation
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// Runs the scan loop until shutdown is requested
    ///
    /// Scans immediately on startup, then every `interval_hours`. A failed
    /// scan is logged and the loop keeps going; the next tick retries from
    /// scratch.
    pub async fn run(&self) -> anyhow::Result<()> {
        tracing::info!(
            interval_hours = self.config.interval_hours,
            channels = self.channels.len(),
            "Expiry scanner starting"
        );

        loop {
            match self.scan_all().await {
                Ok(summary) => {
                    tracing::info!(
                        organizations = summary.organizations_scanned,
                        alerts = summary.alerts_created,
                        sent = summary.notifications_sent,
                        failed = summary.notifications_failed,
                        "Scan completed"
                    );
                }
                Err(e) => {
                    tracing::error!("Scan failed: {}", e);
                }
            }

            tokio::select! {
                _ = sleep(Duration::from_secs(self.config.interval_hours * 3600)) => {}
                _ = self.shutdown_token.cancelled() => {
                    tracing::info!("Expiry scanner shutting down");
                    return Ok(());
                }
            }
        }
    }

    /// Runs one full scan over every organization
    ///
    /// # Errors
    ///
    /// Returns an error only when the tenant listing itself fails;
    /// per-tenant failures are logged and skipped.
    pub async fn scan_all(&self) -> Result<ScanSummary, sqlx::Error> {
        let mut summary = ScanSummary::default();

        // Reconcile lapsed trials before anything reads module state
        summary.trials_expired = OrganizationModule::expire_lapsed_trials(&self.db).await?;

        let mut offset = 0i64;
        loop {
            let page =
                Organization::list(&self.db, self.config.organization_batch_size, offset).await?;
            if page.is_empty() {
                break;
            }
            offset += page.len() as i64;

            for org in &page {
                match self.scan_organization(org.id).await {
                    Ok(alerts) => {
                        summary.organizations_scanned += 1;
                        summary.alerts_created += alerts.len() as u64;

                        for alert in &alerts {
                            let (sent, failed) = self.dispatch(alert).await;
                            summary.notifications_sent += sent;
                            summary.notifications_failed += failed;
                        }
                    }
                    Err(e) => {
                        tracing::error!(organization_id = %org.id, "Organization scan failed: {}", e);
                    }
                }
            }
        }

        Ok(summary)
    }

    /// Scans one organization's three record kinds into alerts
    async fn scan_organization(&self, organization_id: Uuid) -> Result<Vec<Alert>, sqlx::Error> {
        let counts = [
            (
                AlertKind::MedicalExams,
                self.config.medical_window_days,
                MedicalExam::count_expiring_within(
                    &self.db,
                    organization_id,
                    self.config.medical_window_days,
                )
                .await?,
            ),
            (
                AlertKind::EquipmentInspections,
                self.config.equipment_window_days,
                Equipment::count_due_within(
                    &self.db,
                    organization_id,
                    self.config.equipment_window_days,
                )
                .await?,
            ),
            (
                AlertKind::Trainings,
                self.config.training_window_days,
                Training::count_expiring_within(
                    &self.db,
                    organization_id,
                    self.config.training_window_days,
                )
                .await?,
            ),
        ];

        let mut alerts = Vec::new();
        for (kind, window_days, count) in counts {
            let severity = match Severity::for_count(count) {
                Some(severity) => severity,
                None => continue,
            };

            let alert = Alert::create(
                &self.db,
                CreateAlert {
                    organization_id,
                    kind,
                    severity,
                    item_count: count as i32,
                    message: alert_message(kind, count, window_days),
                },
            )
            .await?;

            alerts.push(alert);
        }

        Ok(alerts)
    }

    /// Sends one alert through every channel, one attempt each
    ///
    /// Returns (sent, failed) counts. Failures are logged for manual
    /// follow-up and otherwise swallowed.
    async fn dispatch(&self, alert: &Alert) -> (u64, u64) {
        let notification = Notification {
            organization_id: alert.organization_id,
            severity: alert.severity,
            subject: alert.kind.subject_ro().to_string(),
            body: alert.message.clone(),
        };

        let mut sent = 0;
        let mut failed = 0;

        for channel in &self.channels {
            match channel.send(&notification).await {
                Ok(()) => sent += 1,
                Err(e) => {
                    failed += 1;
                    tracing::warn!(
                        channel = channel.name(),
                        organization_id = %alert.organization_id,
                        kind = alert.kind.as_str(),
                        "Notification delivery failed: {}",
                        e
                    );
                }
            }
        }

        (sent, failed)
    }
}

/// Romanian alert message for a kind/count/window triple
fn alert_message(kind: AlertKind, count: i64, window_days: i64) -> String {
    let what = match kind {
        AlertKind::MedicalExams => "fise de aptitudine expira sau au expirat",
        AlertKind::EquipmentInspections => "verificari de echipamente sunt scadente",
        AlertKind::Trainings => "instruiri trebuie repetate",
    };

    format!("{} {} in urmatoarele {} zile", count, what, window_days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ScannerConfig::default();
        assert_eq!(config.interval_hours, 24);
        assert_eq!(config.medical_window_days, 30);
        assert_eq!(config.equipment_window_days, 30);
        assert_eq!(config.training_window_days, 30);
    }

    #[test]
    fn test_alert_message_wording() {
        let msg = alert_message(AlertKind::Trainings, 5, 30);
        assert_eq!(msg, "5 instruiri trebuie repetate in urmatoarele 30 zile");

        let msg = alert_message(AlertKind::MedicalExams, 1, 30);
        assert!(msg.starts_with("1 fise de aptitudine"));
    }

    #[test]
    fn test_scan_summary_default_is_zeroed() {
        let summary = ScanSummary::default();
        assert_eq!(summary.organizations_scanned, 0);
        assert_eq!(summary.alerts_created, 0);
        assert_eq!(summary.notifications_failed, 0);
    }

    // Database-backed scan tests live in the api crate's integration suite.
}
