/// Module access resolution
///
/// This module answers one question: may this organization use this module
/// right now? The answer is a tri-state (granted, granted-as-trial, or
/// denied) computed from the static catalog and the organization's state
/// rows.
///
/// # Rules
///
/// 1. Base-included modules are always granted, regardless of tenant state.
/// 2. Otherwise the `organization_modules` row for the key decides; no row
///    means denied.
/// 3. `active` grants. `trial` grants only while `now < trial_expires_at`;
///    a lapsed trial is denied even if the row has not been reconciled to
///    `expired` yet.
/// 4. Remaining trial days are `ceil((expiry - now) / 1 day)`, never
///    negative, and only reported while the trial still grants access.
///
/// `resolve` is a pure function over already-loaded rows so it can be unit
/// tested without a database; [`ModuleAccess::load`] is the Pg-backed
/// convenience used by handlers.
///
/// # Example
///
/// ```
/// use norma_shared::entitlement::resolve;
/// use chrono::Utc;
///
/// // No rows at all: base modules still resolve as granted
/// let access = resolve(&[], "dashboard", Utc::now());
/// assert!(access.has_access);
/// assert!(!access.is_trial);
///
/// let denied = resolve(&[], "psi", Utc::now());
/// assert!(!denied.has_access);
/// ```

use crate::catalog;
use crate::models::org_module::{ModuleStatus, OrganizationModule};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Seconds in a day, for trial-remaining math
const DAY_SECONDS: i64 = 86_400;

/// Resolved access state for one module key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleAccess {
    /// Module key the decision applies to
    pub module_key: String,

    /// Whether the organization may use the module right now
    pub has_access: bool,

    /// Whether access is granted through an unexpired trial
    pub is_trial: bool,

    /// Whole days until the trial ends; only set while `is_trial`
    pub trial_days_remaining: Option<i64>,

    /// Status of the underlying state row, if one exists
    pub status: Option<ModuleStatus>,
}

impl ModuleAccess {
    /// Denied result for a key with the given (possibly absent) row status
    fn denied(module_key: &str, status: Option<ModuleStatus>) -> Self {
        ModuleAccess {
            module_key: module_key.to_string(),
            has_access: false,
            is_trial: false,
            trial_days_remaining: None,
            status,
        }
    }

    /// Loads an organization's state rows and resolves one key
    pub async fn load(
        pool: &PgPool,
        organization_id: Uuid,
        module_key: &str,
    ) -> Result<Self, sqlx::Error> {
        let rows = OrganizationModule::list_by_organization(pool, organization_id).await?;
        Ok(resolve(&rows, module_key, Utc::now()))
    }
}

/// Resolves access for a module key against loaded state rows
///
/// Pure: same rows, key and clock always produce the same decision.
pub fn resolve(rows: &[OrganizationModule], module_key: &str, now: DateTime<Utc>) -> ModuleAccess {
    // Base-included modules short-circuit before any row lookup
    if catalog::is_base_included(module_key) {
        return ModuleAccess {
            module_key: module_key.to_string(),
            has_access: true,
            is_trial: false,
            trial_days_remaining: None,
            status: None,
        };
    }

    let row = match rows.iter().find(|r| r.module_key == module_key) {
        Some(row) => row,
        None => return ModuleAccess::denied(module_key, None),
    };

    match row.status {
        ModuleStatus::Active => ModuleAccess {
            module_key: module_key.to_string(),
            has_access: true,
            is_trial: false,
            trial_days_remaining: None,
            status: Some(ModuleStatus::Active),
        },
        ModuleStatus::Trial => {
            let expiry = match row.trial_expires_at {
                Some(expiry) => expiry,
                // Trial row without an expiry cannot prove it is still
                // valid; treat as lapsed
                None => return ModuleAccess::denied(module_key, Some(ModuleStatus::Trial)),
            };

            if now < expiry {
                ModuleAccess {
                    module_key: module_key.to_string(),
                    has_access: true,
                    is_trial: true,
                    trial_days_remaining: Some(days_remaining(expiry, now)),
                    status: Some(ModuleStatus::Trial),
                }
            } else {
                // Expired trial is denied even before reconciliation
                // flips the row to `expired`
                ModuleAccess::denied(module_key, Some(ModuleStatus::Trial))
            }
        }
        status => ModuleAccess::denied(module_key, Some(status)),
    }
}

/// Resolves every catalog entry at once, for the module-state endpoint
pub fn resolve_all(rows: &[OrganizationModule], now: DateTime<Utc>) -> Vec<ModuleAccess> {
    catalog::MODULE_CATALOG
        .iter()
        .map(|def| resolve(rows, def.key, now))
        .collect()
}

/// Whole days until `expiry`, rounded up, floored at zero
fn days_remaining(expiry: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let seconds = (expiry - now).num_seconds();
    if seconds <= 0 {
        return 0;
    }
    (seconds + DAY_SECONDS - 1) / DAY_SECONDS
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn trial_row(key: &str, expires_at: Option<DateTime<Utc>>) -> OrganizationModule {
        row(key, ModuleStatus::Trial, expires_at)
    }

    fn row(key: &str, status: ModuleStatus, expires_at: Option<DateTime<Utc>>) -> OrganizationModule {
        let now = Utc::now();
        OrganizationModule {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            module_key: key.to_string(),
            status,
            trial_started_at: expires_at.map(|_| now - Duration::days(1)),
            trial_expires_at: expires_at,
            activated_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_base_included_always_granted() {
        let now = Utc::now();
        // Even a canceled row for the same key cannot revoke a base module
        let rows = vec![row("dashboard", ModuleStatus::Canceled, None)];

        for key in ["dashboard", "employees"] {
            let access = resolve(&rows, key, now);
            assert!(access.has_access, "{} must always be granted", key);
            assert!(!access.is_trial);
            assert!(access.trial_days_remaining.is_none());
        }
    }

    #[test]
    fn test_missing_row_is_denied() {
        let access = resolve(&[], "psi", Utc::now());
        assert!(!access.has_access);
        assert_eq!(access.status, None);
    }

    #[test]
    fn test_active_row_grants() {
        let now = Utc::now();
        let rows = vec![row("ssm", ModuleStatus::Active, None)];

        let access = resolve(&rows, "ssm", now);
        assert!(access.has_access);
        assert!(!access.is_trial);
        assert_eq!(access.status, Some(ModuleStatus::Active));
    }

    #[test]
    fn test_valid_trial_grants_with_days() {
        let now = Utc::now();
        let rows = vec![trial_row("psi", Some(now + Duration::days(5)))];

        let access = resolve(&rows, "psi", now);
        assert!(access.has_access);
        assert!(access.is_trial);
        assert_eq!(access.trial_days_remaining, Some(5));
    }

    #[test]
    fn test_expired_trial_is_denied_without_days() {
        let now = Utc::now();
        let rows = vec![trial_row("psi", Some(now - Duration::days(1)))];

        let access = resolve(&rows, "psi", now);
        assert!(!access.has_access);
        assert!(!access.is_trial);
        assert_eq!(access.trial_days_remaining, None);
        // The row itself has not been reconciled yet
        assert_eq!(access.status, Some(ModuleStatus::Trial));
    }

    #[test]
    fn test_trial_expiring_exactly_now_is_denied() {
        let now = Utc::now();
        let rows = vec![trial_row("psi", Some(now))];

        let access = resolve(&rows, "psi", now);
        assert!(!access.has_access);
        assert_eq!(access.trial_days_remaining, None);
    }

    #[test]
    fn test_trial_without_expiry_is_denied() {
        let rows = vec![trial_row("psi", None)];
        let access = resolve(&rows, "psi", Utc::now());
        assert!(!access.has_access);
    }

    #[test]
    fn test_canceled_expired_past_due_denied() {
        let now = Utc::now();
        for status in [
            ModuleStatus::Canceled,
            ModuleStatus::Expired,
            ModuleStatus::PastDue,
        ] {
            let rows = vec![row("gdpr", status, None)];
            let access = resolve(&rows, "gdpr", now);
            assert!(!access.has_access, "{:?} must deny", status);
            assert_eq!(access.status, Some(status));
        }
    }

    #[test]
    fn test_days_remaining_rounds_up() {
        let now = Utc::now();
        // One second into the last day still counts as one day
        assert_eq!(days_remaining(now + Duration::seconds(1), now), 1);
        assert_eq!(days_remaining(now + Duration::days(3), now), 3);
        assert_eq!(
            days_remaining(now + Duration::days(3) + Duration::seconds(1), now),
            4
        );
    }

    #[test]
    fn test_days_remaining_never_negative() {
        let now = Utc::now();
        assert_eq!(days_remaining(now, now), 0);
        assert_eq!(days_remaining(now - Duration::days(2), now), 0);
    }

    #[test]
    fn test_resolve_all_covers_catalog() {
        let all = resolve_all(&[], Utc::now());
        assert_eq!(all.len(), crate::catalog::MODULE_CATALOG.len());
        // With no rows, exactly the base-included set is granted
        let granted: Vec<_> = all
            .iter()
            .filter(|a| a.has_access)
            .map(|a| a.module_key.as_str())
            .collect();
        assert_eq!(granted, vec!["dashboard", "employees"]);
    }
}
