/// Organization model and database operations
///
/// This module provides the Organization model, the unit of tenant isolation
/// and billing. Every user belongs to one or more organizations via the
/// Membership model, and every compliance record carries an organization_id.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE organizations (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     cui VARCHAR(16),
///     stripe_customer_id VARCHAR(255),
///     stripe_subscription_id VARCHAR(255),
///     settings JSONB NOT NULL DEFAULT '{}',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use norma_shared::models::organization::{Organization, CreateOrganization};
/// use norma_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let org = Organization::create(&pool, CreateOrganization {
///     name: "Construct Impex SRL".to_string(),
///     cui: Some("RO1234567".to_string()),
/// }).await?;
/// println!("Created organization: {}", org.id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use uuid::Uuid;

/// Organization model representing a tenant company
///
/// Organizations are the top-level entity for multi-tenant isolation.
/// All resources (employees, modules, alerts, subscriptions) belong to
/// an organization.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Organization {
    /// Unique organization ID (UUID v4)
    pub id: Uuid,

    /// Legal/display name of the company
    pub name: String,

    /// Romanian fiscal identification code (CUI), if provided
    pub cui: Option<String>,

    /// Stripe customer ID (set once billing is connected)
    pub stripe_customer_id: Option<String>,

    /// Stripe subscription ID (set once a subscription exists)
    pub stripe_subscription_id: Option<String>,

    /// Organization-specific configuration (JSONB)
    ///
    /// Example: {"alert_recipients": ["ssm@firma.ro"], "locale": "ro"}
    pub settings: JsonValue,

    /// When the organization was created
    pub created_at: DateTime<Utc>,

    /// When the organization was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new organization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrganization {
    /// Company name
    pub name: String,

    /// Optional fiscal code (CUI)
    pub cui: Option<String>,
}

/// Input for updating an existing organization
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateOrganization {
    /// New name
    pub name: Option<String>,

    /// New fiscal code
    pub cui: Option<String>,

    /// New Stripe customer ID
    pub stripe_customer_id: Option<String>,

    /// New Stripe subscription ID
    pub stripe_subscription_id: Option<String>,

    /// Update settings (will be merged with existing settings)
    pub settings: Option<JsonValue>,
}

impl Organization {
    /// Creates a new organization in the database
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails or the CUI is
    /// already registered.
    pub async fn create(pool: &PgPool, data: CreateOrganization) -> Result<Self, sqlx::Error> {
        let org = sqlx::query_as::<_, Organization>(
            r#"
            INSERT INTO organizations (name, cui)
            VALUES ($1, $2)
            RETURNING id, name, cui, stripe_customer_id, stripe_subscription_id,
                      settings, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.cui)
        .fetch_one(pool)
        .await?;

        Ok(org)
    }

    /// Finds an organization by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let org = sqlx::query_as::<_, Organization>(
            r#"
            SELECT id, name, cui, stripe_customer_id, stripe_subscription_id,
                   settings, created_at, updated_at
            FROM organizations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(org)
    }

    /// Finds an organization by Stripe customer ID
    ///
    /// Used by the billing webhook to resolve events back to a tenant.
    pub async fn find_by_stripe_customer(
        pool: &PgPool,
        customer_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let org = sqlx::query_as::<_, Organization>(
            r#"
            SELECT id, name, cui, stripe_customer_id, stripe_subscription_id,
                   settings, created_at, updated_at
            FROM organizations
            WHERE stripe_customer_id = $1
            "#,
        )
        .bind(customer_id)
        .fetch_optional(pool)
        .await?;

        Ok(org)
    }

    /// Updates an existing organization
    ///
    /// Only non-None fields in `data` will be updated. Settings are merged
    /// with existing settings (not replaced).
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateOrganization,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE organizations SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.cui.is_some() {
            bind_count += 1;
            query.push_str(&format!(", cui = ${}", bind_count));
        }
        if data.stripe_customer_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(", stripe_customer_id = ${}", bind_count));
        }
        if data.stripe_subscription_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(", stripe_subscription_id = ${}", bind_count));
        }
        if data.settings.is_some() {
            bind_count += 1;
            // Merge settings with existing (jsonb || operator)
            query.push_str(&format!(", settings = settings || ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, name, cui, stripe_customer_id, \
             stripe_subscription_id, settings, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Organization>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(cui) = data.cui {
            q = q.bind(cui);
        }
        if let Some(customer_id) = data.stripe_customer_id {
            q = q.bind(customer_id);
        }
        if let Some(sub_id) = data.stripe_subscription_id {
            q = q.bind(sub_id);
        }
        if let Some(settings) = data.settings {
            q = q.bind(settings);
        }

        let org = q.fetch_optional(pool).await?;

        Ok(org)
    }

    /// Lists all organizations with pagination
    ///
    /// Ordered by creation date (newest first). Mainly used by the scanner,
    /// which walks every tenant.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Self>, sqlx::Error> {
        let orgs = sqlx::query_as::<_, Organization>(
            r#"
            SELECT id, name, cui, stripe_customer_id, stripe_subscription_id,
                   settings, created_at, updated_at
            FROM organizations
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(orgs)
    }

    /// Deletes an organization by ID
    ///
    /// ⚠️  **WARNING**: This cascades to all related data (employees,
    /// module state, alerts, subscriptions). Used by admin tooling and
    /// test cleanup only.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM organizations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts total number of organizations
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM organizations")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_organization_default() {
        let update = UpdateOrganization::default();
        assert!(update.name.is_none());
        assert!(update.cui.is_none());
        assert!(update.settings.is_none());
    }

    // Integration tests for database operations live in the api crate's
    // tests/ directory and require a running Postgres.
}
