/// Work equipment records
///
/// Tracks equipment subject to periodic technical inspection (ISCIR lifts,
/// pressure vessels, fire extinguishers and the like) and when the next
/// inspection is due.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE equipment (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
///     name VARCHAR(255) NOT NULL,
///     serial_number VARCHAR(128),
///     next_inspection_on DATE NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A piece of equipment with a periodic inspection obligation
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Equipment {
    /// Unique record ID
    pub id: Uuid,

    /// Owning organization
    pub organization_id: Uuid,

    /// Equipment name/description
    pub name: String,

    /// Manufacturer serial number
    pub serial_number: Option<String>,

    /// Date the next inspection is due
    pub next_inspection_on: NaiveDate,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for registering equipment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEquipment {
    /// Owning organization
    pub organization_id: Uuid,

    /// Equipment name
    pub name: String,

    /// Serial number
    pub serial_number: Option<String>,

    /// Next inspection due date
    pub next_inspection_on: NaiveDate,
}

impl Equipment {
    /// Registers a piece of equipment
    pub async fn create(pool: &PgPool, data: CreateEquipment) -> Result<Self, sqlx::Error> {
        let equipment = sqlx::query_as::<_, Equipment>(
            r#"
            INSERT INTO equipment (organization_id, name, serial_number, next_inspection_on)
            VALUES ($1, $2, $3, $4)
            RETURNING id, organization_id, name, serial_number, next_inspection_on,
                      created_at, updated_at
            "#,
        )
        .bind(data.organization_id)
        .bind(data.name)
        .bind(data.serial_number)
        .bind(data.next_inspection_on)
        .fetch_one(pool)
        .await?;

        Ok(equipment)
    }

    /// Lists equipment for an organization ordered by inspection urgency
    pub async fn list_by_organization(
        pool: &PgPool,
        organization_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let rows = sqlx::query_as::<_, Equipment>(
            r#"
            SELECT id, organization_id, name, serial_number, next_inspection_on,
                   created_at, updated_at
            FROM equipment
            WHERE organization_id = $1
            ORDER BY next_inspection_on ASC
            "#,
        )
        .bind(organization_id)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Records a completed inspection by moving the due date forward
    pub async fn record_inspection(
        pool: &PgPool,
        id: Uuid,
        organization_id: Uuid,
        next_inspection_on: NaiveDate,
    ) -> Result<Option<Self>, sqlx::Error> {
        let equipment = sqlx::query_as::<_, Equipment>(
            r#"
            UPDATE equipment
            SET next_inspection_on = $3, updated_at = NOW()
            WHERE id = $1 AND organization_id = $2
            RETURNING id, organization_id, name, serial_number, next_inspection_on,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(organization_id)
        .bind(next_inspection_on)
        .fetch_optional(pool)
        .await?;

        Ok(equipment)
    }

    /// Counts equipment whose inspection falls due within the window
    ///
    /// Overdue inspections remain in the count until recorded.
    pub async fn count_due_within(
        pool: &PgPool,
        organization_id: Uuid,
        window_days: i64,
    ) -> Result<i64, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM equipment
            WHERE organization_id = $1
              AND next_inspection_on <= CURRENT_DATE + $2::int
            "#,
        )
        .bind(organization_id)
        .bind(window_days as i32)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }
}
