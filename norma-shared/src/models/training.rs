/// Safety training records
///
/// Tracks completed SSM/PSI trainings per employee and when each one has to
/// be repeated.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE trainings (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
///     employee_id UUID NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
///     course VARCHAR(255) NOT NULL,
///     completed_on DATE NOT NULL,
///     expires_on DATE NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// One completed training with a repeat deadline
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Training {
    /// Unique record ID
    pub id: Uuid,

    /// Organization (denormalized for the scan queries)
    pub organization_id: Uuid,

    /// Employee who completed the training
    pub employee_id: Uuid,

    /// Course name, e.g. "Instruire periodica SSM"
    pub course: String,

    /// Completion date
    pub completed_on: NaiveDate,

    /// Date by which the training must be repeated
    pub expires_on: NaiveDate,

    /// When the record was created
    pub created_at: DateTime<Utc>,
}

/// Input for recording a training
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTraining {
    /// Organization ID
    pub organization_id: Uuid,

    /// Employee ID
    pub employee_id: Uuid,

    /// Course name
    pub course: String,

    /// Completion date
    pub completed_on: NaiveDate,

    /// Repeat deadline
    pub expires_on: NaiveDate,
}

impl Training {
    /// Records a completed training
    pub async fn create(pool: &PgPool, data: CreateTraining) -> Result<Self, sqlx::Error> {
        let training = sqlx::query_as::<_, Training>(
            r#"
            INSERT INTO trainings (organization_id, employee_id, course, completed_on, expires_on)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, organization_id, employee_id, course, completed_on, expires_on, created_at
            "#,
        )
        .bind(data.organization_id)
        .bind(data.employee_id)
        .bind(data.course)
        .bind(data.completed_on)
        .bind(data.expires_on)
        .fetch_one(pool)
        .await?;

        Ok(training)
    }

    /// Lists trainings for an employee, newest first
    pub async fn list_by_employee(
        pool: &PgPool,
        employee_id: Uuid,
        organization_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let trainings = sqlx::query_as::<_, Training>(
            r#"
            SELECT id, organization_id, employee_id, course, completed_on, expires_on, created_at
            FROM trainings
            WHERE employee_id = $1 AND organization_id = $2
            ORDER BY expires_on DESC
            "#,
        )
        .bind(employee_id)
        .bind(organization_id)
        .fetch_all(pool)
        .await?;

        Ok(trainings)
    }

    /// Counts trainings whose repeat deadline falls within the window
    ///
    /// Overdue trainings remain in the count until repeated.
    pub async fn count_expiring_within(
        pool: &PgPool,
        organization_id: Uuid,
        window_days: i64,
    ) -> Result<i64, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM trainings
            WHERE organization_id = $1
              AND expires_on <= CURRENT_DATE + $2::int
            "#,
        )
        .bind(organization_id)
        .bind(window_days as i32)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }
}
