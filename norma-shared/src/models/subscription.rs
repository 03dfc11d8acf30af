/// Subscription model and database operations
///
/// This module provides the Subscription model, a local mirror of the
/// payment provider's subscription object. Rows are only written by the
/// billing webhook handler; the rest of the application treats them as
/// read-only and derives module entitlements from them.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE subscription_status AS ENUM (
///     'trialing', 'active', 'past_due', 'canceled', 'incomplete_expired'
/// );
///
/// CREATE TABLE subscriptions (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
///     stripe_subscription_id VARCHAR(255) NOT NULL UNIQUE,
///     status subscription_status NOT NULL,
///     module_keys TEXT[] NOT NULL DEFAULT '{}',
///     current_period_end TIMESTAMPTZ,
///     trial_end TIMESTAMPTZ,
///     cancel_at_period_end BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use crate::models::org_module::ModuleStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Provider-side subscription status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "subscription_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// In a provider-managed trial period
    Trialing,

    /// Paid and in good standing
    Active,

    /// Latest invoice failed
    PastDue,

    /// Canceled by tenant or provider
    Canceled,

    /// Never completed initial payment and lapsed
    IncompleteExpired,
}

impl SubscriptionStatus {
    /// Converts status to string for display and logging
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Trialing => "trialing",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Canceled => "canceled",
            SubscriptionStatus::IncompleteExpired => "incomplete_expired",
        }
    }

    /// Maps the provider status onto the module entitlement status
    ///
    /// Every module listed on the subscription gets this status when the
    /// webhook recomputes entitlements.
    pub fn module_status(&self) -> ModuleStatus {
        match self {
            SubscriptionStatus::Trialing => ModuleStatus::Trial,
            SubscriptionStatus::Active => ModuleStatus::Active,
            SubscriptionStatus::PastDue => ModuleStatus::PastDue,
            SubscriptionStatus::Canceled => ModuleStatus::Canceled,
            SubscriptionStatus::IncompleteExpired => ModuleStatus::Expired,
        }
    }
}

/// Local mirror of a provider subscription
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Subscription {
    /// Unique row ID
    pub id: Uuid,

    /// Organization the subscription bills
    pub organization_id: Uuid,

    /// Provider-side subscription ID
    pub stripe_subscription_id: String,

    /// Provider-side status
    pub status: SubscriptionStatus,

    /// Module keys covered by this subscription
    pub module_keys: Vec<String>,

    /// End of the current billing period
    pub current_period_end: Option<DateTime<Utc>>,

    /// End of the provider-managed trial, if any
    pub trial_end: Option<DateTime<Utc>>,

    /// Whether the subscription ends at the period boundary
    pub cancel_at_period_end: bool,

    /// When the row was created
    pub created_at: DateTime<Utc>,

    /// When the row was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for upserting a subscription from a webhook event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertSubscription {
    /// Organization the subscription bills
    pub organization_id: Uuid,

    /// Provider-side subscription ID
    pub stripe_subscription_id: String,

    /// Provider-side status
    pub status: SubscriptionStatus,

    /// Module keys covered by this subscription
    pub module_keys: Vec<String>,

    /// End of the current billing period
    pub current_period_end: Option<DateTime<Utc>>,

    /// End of the provider-managed trial, if any
    pub trial_end: Option<DateTime<Utc>>,

    /// Whether the subscription ends at the period boundary
    pub cancel_at_period_end: bool,
}

impl Subscription {
    /// Upserts a subscription row keyed by the provider subscription ID
    pub async fn upsert(pool: &PgPool, data: UpsertSubscription) -> Result<Self, sqlx::Error> {
        let sub = sqlx::query_as::<_, Subscription>(
            r#"
            INSERT INTO subscriptions
                (organization_id, stripe_subscription_id, status, module_keys,
                 current_period_end, trial_end, cancel_at_period_end)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (stripe_subscription_id) DO UPDATE SET
                status = EXCLUDED.status,
                module_keys = EXCLUDED.module_keys,
                current_period_end = EXCLUDED.current_period_end,
                trial_end = EXCLUDED.trial_end,
                cancel_at_period_end = EXCLUDED.cancel_at_period_end,
                updated_at = NOW()
            RETURNING id, organization_id, stripe_subscription_id, status, module_keys,
                      current_period_end, trial_end, cancel_at_period_end,
                      created_at, updated_at
            "#,
        )
        .bind(data.organization_id)
        .bind(data.stripe_subscription_id)
        .bind(data.status)
        .bind(&data.module_keys)
        .bind(data.current_period_end)
        .bind(data.trial_end)
        .bind(data.cancel_at_period_end)
        .fetch_one(pool)
        .await?;

        Ok(sub)
    }

    /// Finds a subscription by provider subscription ID
    pub async fn find_by_stripe_id(
        pool: &PgPool,
        stripe_subscription_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let sub = sqlx::query_as::<_, Subscription>(
            r#"
            SELECT id, organization_id, stripe_subscription_id, status, module_keys,
                   current_period_end, trial_end, cancel_at_period_end,
                   created_at, updated_at
            FROM subscriptions
            WHERE stripe_subscription_id = $1
            "#,
        )
        .bind(stripe_subscription_id)
        .fetch_optional(pool)
        .await?;

        Ok(sub)
    }

    /// Lists subscriptions for an organization, newest first
    pub async fn list_by_organization(
        pool: &PgPool,
        organization_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let subs = sqlx::query_as::<_, Subscription>(
            r#"
            SELECT id, organization_id, stripe_subscription_id, status, module_keys,
                   current_period_end, trial_end, cancel_at_period_end,
                   created_at, updated_at
            FROM subscriptions
            WHERE organization_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(organization_id)
        .fetch_all(pool)
        .await?;

        Ok(subs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(SubscriptionStatus::Trialing.as_str(), "trialing");
        assert_eq!(SubscriptionStatus::IncompleteExpired.as_str(), "incomplete_expired");
    }

    #[test]
    fn test_module_status_mapping() {
        assert_eq!(SubscriptionStatus::Trialing.module_status(), ModuleStatus::Trial);
        assert_eq!(SubscriptionStatus::Active.module_status(), ModuleStatus::Active);
        assert_eq!(SubscriptionStatus::PastDue.module_status(), ModuleStatus::PastDue);
        assert_eq!(SubscriptionStatus::Canceled.module_status(), ModuleStatus::Canceled);
        assert_eq!(
            SubscriptionStatus::IncompleteExpired.module_status(),
            ModuleStatus::Expired
        );
    }
}
