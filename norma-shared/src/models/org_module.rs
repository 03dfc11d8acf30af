/// Organization module state and database operations
///
/// This module provides the OrganizationModule model: one row per
/// (organization, module key) recording whether that module is active,
/// trialing, or no longer paid for. Rows are created when a tenant starts a
/// trial or subscribes, and mutated by billing webhook events. Rows are
/// never hard-deleted; a lost entitlement is a soft transition to
/// `canceled` or `expired`.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE module_status AS ENUM ('active', 'trial', 'canceled', 'expired', 'past_due');
///
/// CREATE TABLE organization_modules (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
///     module_key VARCHAR(64) NOT NULL,
///     status module_status NOT NULL,
///     trial_started_at TIMESTAMPTZ,
///     trial_expires_at TIMESTAMPTZ,
///     activated_at TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (organization_id, module_key)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use norma_shared::models::org_module::OrganizationModule;
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, org_id: Uuid) -> Result<(), sqlx::Error> {
/// // Start a 14-day trial of the PSI module
/// let row = OrganizationModule::start_trial(&pool, org_id, "psi").await?;
/// println!("Trial runs until {:?}", row.trial_expires_at);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Length of a module trial in days
pub const TRIAL_DAYS: i64 = 14;

/// Entitlement status of a module for one organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "module_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ModuleStatus {
    /// Paid and usable
    Active,

    /// Trial period; usable while the trial has not expired
    Trial,

    /// Subscription canceled by the tenant or the provider
    Canceled,

    /// Trial or subscription ran out without renewal
    Expired,

    /// Payment failed; access is suspended until the invoice settles
    PastDue,
}

impl ModuleStatus {
    /// Converts status to string for display and logging
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleStatus::Active => "active",
            ModuleStatus::Trial => "trial",
            ModuleStatus::Canceled => "canceled",
            ModuleStatus::Expired => "expired",
            ModuleStatus::PastDue => "past_due",
        }
    }

    /// Whether this status can ever grant access
    ///
    /// `Trial` additionally requires the expiry check in the resolver.
    pub fn grants_access(&self) -> bool {
        matches!(self, ModuleStatus::Active | ModuleStatus::Trial)
    }
}

/// Per-(organization, module) entitlement state row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrganizationModule {
    /// Unique row ID
    pub id: Uuid,

    /// Organization this state belongs to
    pub organization_id: Uuid,

    /// Module key from the static catalog
    pub module_key: String,

    /// Current entitlement status
    pub status: ModuleStatus,

    /// When the trial started (None if never trialed)
    pub trial_started_at: Option<DateTime<Utc>>,

    /// When the trial ends/ended
    pub trial_expires_at: Option<DateTime<Utc>>,

    /// When the module was first activated through a paid subscription
    pub activated_at: Option<DateTime<Utc>>,

    /// When the row was created
    pub created_at: DateTime<Utc>,

    /// When the row was last updated
    pub updated_at: DateTime<Utc>,
}

impl OrganizationModule {
    /// Finds the state row for a module key, if any
    pub async fn find(
        pool: &PgPool,
        organization_id: Uuid,
        module_key: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let row = sqlx::query_as::<_, OrganizationModule>(
            r#"
            SELECT id, organization_id, module_key, status, trial_started_at,
                   trial_expires_at, activated_at, created_at, updated_at
            FROM organization_modules
            WHERE organization_id = $1 AND module_key = $2
            "#,
        )
        .bind(organization_id)
        .bind(module_key)
        .fetch_optional(pool)
        .await?;

        Ok(row)
    }

    /// Lists all module state rows for an organization
    pub async fn list_by_organization(
        pool: &PgPool,
        organization_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let rows = sqlx::query_as::<_, OrganizationModule>(
            r#"
            SELECT id, organization_id, module_key, status, trial_started_at,
                   trial_expires_at, activated_at, created_at, updated_at
            FROM organization_modules
            WHERE organization_id = $1
            ORDER BY module_key ASC
            "#,
        )
        .bind(organization_id)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Starts a trial for a module
    ///
    /// Inserts a fresh row in `trial` status expiring [`TRIAL_DAYS`] from
    /// now. One trial per module: if a row already exists for this key the
    /// unique constraint rejects the insert and the caller maps that to a
    /// conflict response.
    pub async fn start_trial(
        pool: &PgPool,
        organization_id: Uuid,
        module_key: &str,
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now();
        let expires = now + Duration::days(TRIAL_DAYS);

        let row = sqlx::query_as::<_, OrganizationModule>(
            r#"
            INSERT INTO organization_modules
                (organization_id, module_key, status, trial_started_at, trial_expires_at)
            VALUES ($1, $2, 'trial', $3, $4)
            RETURNING id, organization_id, module_key, status, trial_started_at,
                      trial_expires_at, activated_at, created_at, updated_at
            "#,
        )
        .bind(organization_id)
        .bind(module_key)
        .bind(now)
        .bind(expires)
        .fetch_one(pool)
        .await?;

        Ok(row)
    }

    /// Applies a status computed from the billing subscription
    ///
    /// Upserts the row: creates it when the webhook arrives before any
    /// trial, otherwise overwrites the status. `activated_at` is stamped on
    /// the first transition to `active` and preserved afterwards;
    /// `trial_expires_at` is refreshed when the subscription itself carries
    /// a trial end.
    pub async fn apply_status(
        pool: &PgPool,
        organization_id: Uuid,
        module_key: &str,
        status: ModuleStatus,
        trial_expires_at: Option<DateTime<Utc>>,
    ) -> Result<Self, sqlx::Error> {
        let row = sqlx::query_as::<_, OrganizationModule>(
            r#"
            INSERT INTO organization_modules
                (organization_id, module_key, status, trial_started_at, trial_expires_at, activated_at)
            VALUES (
                $1, $2, $3,
                CASE WHEN $3 = 'trial'::module_status THEN NOW() ELSE NULL END,
                $4,
                CASE WHEN $3 = 'active'::module_status THEN NOW() ELSE NULL END
            )
            ON CONFLICT (organization_id, module_key) DO UPDATE SET
                status = EXCLUDED.status,
                trial_expires_at = COALESCE(EXCLUDED.trial_expires_at, organization_modules.trial_expires_at),
                activated_at = COALESCE(organization_modules.activated_at, EXCLUDED.activated_at),
                updated_at = NOW()
            RETURNING id, organization_id, module_key, status, trial_started_at,
                      trial_expires_at, activated_at, created_at, updated_at
            "#,
        )
        .bind(organization_id)
        .bind(module_key)
        .bind(status)
        .bind(trial_expires_at)
        .fetch_one(pool)
        .await?;

        Ok(row)
    }

    /// Marks trial rows whose expiry has passed as `expired`
    ///
    /// Reconciliation sweep; access resolution does not depend on it (an
    /// expired trial is denied even while the row still says `trial`).
    pub async fn expire_lapsed_trials(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE organization_modules
            SET status = 'expired', updated_at = NOW()
            WHERE status = 'trial' AND trial_expires_at <= NOW()
            "#,
        )
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(ModuleStatus::Active.as_str(), "active");
        assert_eq!(ModuleStatus::Trial.as_str(), "trial");
        assert_eq!(ModuleStatus::Canceled.as_str(), "canceled");
        assert_eq!(ModuleStatus::Expired.as_str(), "expired");
        assert_eq!(ModuleStatus::PastDue.as_str(), "past_due");
    }

    #[test]
    fn test_status_grants_access() {
        assert!(ModuleStatus::Active.grants_access());
        assert!(ModuleStatus::Trial.grants_access());
        assert!(!ModuleStatus::Canceled.grants_access());
        assert!(!ModuleStatus::Expired.grants_access());
        assert!(!ModuleStatus::PastDue.grants_access());
    }

    #[test]
    fn test_status_serde_snake_case() {
        let json = serde_json::to_string(&ModuleStatus::PastDue).unwrap();
        assert_eq!(json, "\"past_due\"");
    }
}
