/// Alert records and severity classification
///
/// Alerts are the output of the expiry scanner: one row per (organization,
/// record kind) with a non-zero count of items needing attention. There is
/// no deduplication beyond the daily re-run; yesterday's alert simply ages
/// out of the dashboard.
///
/// # Severity buckets
///
/// Counts map onto severities with fixed cutoffs:
///
/// | count   | severity |
/// |---------|----------|
/// | 1..=2   | info     |
/// | 3..=9   | warning  |
/// | >=10    | critical |
///
/// A count of zero produces no alert at all.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE alert_kind AS ENUM ('medical_exams', 'equipment_inspections', 'trainings');
/// CREATE TYPE alert_severity AS ENUM ('info', 'warning', 'critical');
///
/// CREATE TABLE alerts (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
///     kind alert_kind NOT NULL,
///     severity alert_severity NOT NULL,
///     item_count INTEGER NOT NULL,
///     message TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// The compliance domain an alert refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "alert_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// Medical exam results expiring or expired
    MedicalExams,

    /// Equipment inspections due or overdue
    EquipmentInspections,

    /// Trainings that must be repeated
    Trainings,
}

impl AlertKind {
    /// Converts kind to string for display and logging
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::MedicalExams => "medical_exams",
            AlertKind::EquipmentInspections => "equipment_inspections",
            AlertKind::Trainings => "trainings",
        }
    }

    /// Romanian subject line fragment for notifications
    pub fn subject_ro(&self) -> &'static str {
        match self {
            AlertKind::MedicalExams => "Fise de aptitudine care expira",
            AlertKind::EquipmentInspections => "Verificari echipamente scadente",
            AlertKind::Trainings => "Instruiri care trebuie repetate",
        }
    }
}

/// Alert severity bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "alert_severity", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A couple of items, routine follow-up
    Info,

    /// A handful of items, plan remediation
    Warning,

    /// Double digits, compliance exposure
    Critical,
}

impl Severity {
    /// Converts severity to string for display and logging
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }

    /// Classifies an item count into a severity bucket
    ///
    /// Returns None for zero (no alert is raised).
    pub fn for_count(count: i64) -> Option<Self> {
        match count {
            i64::MIN..=0 => None,
            1..=2 => Some(Severity::Info),
            3..=9 => Some(Severity::Warning),
            _ => Some(Severity::Critical),
        }
    }
}

/// One alert produced by a scan
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Alert {
    /// Unique alert ID
    pub id: Uuid,

    /// Organization the alert targets
    pub organization_id: Uuid,

    /// Compliance domain
    pub kind: AlertKind,

    /// Severity bucket derived from the count
    pub severity: Severity,

    /// Number of items needing attention
    pub item_count: i32,

    /// Human-readable message (Romanian)
    pub message: String,

    /// When the alert was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating an alert
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAlert {
    /// Organization ID
    pub organization_id: Uuid,

    /// Compliance domain
    pub kind: AlertKind,

    /// Severity bucket
    pub severity: Severity,

    /// Item count
    pub item_count: i32,

    /// Message text
    pub message: String,
}

impl Alert {
    /// Creates an alert row
    pub async fn create(pool: &PgPool, data: CreateAlert) -> Result<Self, sqlx::Error> {
        let alert = sqlx::query_as::<_, Alert>(
            r#"
            INSERT INTO alerts (organization_id, kind, severity, item_count, message)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, organization_id, kind, severity, item_count, message, created_at
            "#,
        )
        .bind(data.organization_id)
        .bind(data.kind)
        .bind(data.severity)
        .bind(data.item_count)
        .bind(data.message)
        .fetch_one(pool)
        .await?;

        Ok(alert)
    }

    /// Lists alerts for an organization, newest first, with optional filters
    pub async fn list_by_organization(
        pool: &PgPool,
        organization_id: Uuid,
        severity: Option<Severity>,
        kind: Option<AlertKind>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let alerts = sqlx::query_as::<_, Alert>(
            r#"
            SELECT id, organization_id, kind, severity, item_count, message, created_at
            FROM alerts
            WHERE organization_id = $1
              AND ($2::alert_severity IS NULL OR severity = $2)
              AND ($3::alert_kind IS NULL OR kind = $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(organization_id)
        .bind(severity)
        .bind(kind)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(alerts)
    }

    /// Counts alerts for an organization
    pub async fn count_by_organization(
        pool: &PgPool,
        organization_id: Uuid,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM alerts WHERE organization_id = $1")
                .bind(organization_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_for_count_zero_is_none() {
        assert_eq!(Severity::for_count(0), None);
        assert_eq!(Severity::for_count(-3), None);
    }

    #[test]
    fn test_severity_cutoffs() {
        assert_eq!(Severity::for_count(1), Some(Severity::Info));
        assert_eq!(Severity::for_count(2), Some(Severity::Info));
        assert_eq!(Severity::for_count(3), Some(Severity::Warning));
        assert_eq!(Severity::for_count(9), Some(Severity::Warning));
        assert_eq!(Severity::for_count(10), Some(Severity::Critical));
        assert_eq!(Severity::for_count(250), Some(Severity::Critical));
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Critical);
    }

    #[test]
    fn test_kind_as_str() {
        assert_eq!(AlertKind::MedicalExams.as_str(), "medical_exams");
        assert_eq!(AlertKind::EquipmentInspections.as_str(), "equipment_inspections");
        assert_eq!(AlertKind::Trainings.as_str(), "trainings");
    }
}
