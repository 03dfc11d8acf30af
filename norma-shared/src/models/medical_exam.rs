/// Occupational medical exam records
///
/// Each row records one periodic medical examination for an employee and
/// when it stops being valid. The scanner's threshold query lives here so
/// the worker and the cron endpoint share one definition of "expiring".
///
/// # Schema
///
/// ```sql
/// CREATE TABLE medical_exams (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
///     employee_id UUID NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
///     exam_kind VARCHAR(64) NOT NULL,
///     examined_on DATE NOT NULL,
///     expires_on DATE NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// One periodic medical exam for an employee
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MedicalExam {
    /// Unique record ID
    pub id: Uuid,

    /// Organization (denormalized for the scan queries)
    pub organization_id: Uuid,

    /// Employee the exam belongs to
    pub employee_id: Uuid,

    /// Exam kind, e.g. "angajare", "periodic", "reluare"
    pub exam_kind: String,

    /// Date the exam was performed
    pub examined_on: NaiveDate,

    /// Date the exam result stops being valid
    pub expires_on: NaiveDate,

    /// When the record was created
    pub created_at: DateTime<Utc>,
}

/// Input for recording a medical exam
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMedicalExam {
    /// Organization ID
    pub organization_id: Uuid,

    /// Employee ID
    pub employee_id: Uuid,

    /// Exam kind
    pub exam_kind: String,

    /// Date performed
    pub examined_on: NaiveDate,

    /// Validity end date
    pub expires_on: NaiveDate,
}

impl MedicalExam {
    /// Records a medical exam
    pub async fn create(pool: &PgPool, data: CreateMedicalExam) -> Result<Self, sqlx::Error> {
        let exam = sqlx::query_as::<_, MedicalExam>(
            r#"
            INSERT INTO medical_exams (organization_id, employee_id, exam_kind, examined_on, expires_on)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, organization_id, employee_id, exam_kind, examined_on, expires_on, created_at
            "#,
        )
        .bind(data.organization_id)
        .bind(data.employee_id)
        .bind(data.exam_kind)
        .bind(data.examined_on)
        .bind(data.expires_on)
        .fetch_one(pool)
        .await?;

        Ok(exam)
    }

    /// Lists exams for an employee, newest first
    pub async fn list_by_employee(
        pool: &PgPool,
        employee_id: Uuid,
        organization_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let exams = sqlx::query_as::<_, MedicalExam>(
            r#"
            SELECT id, organization_id, employee_id, exam_kind, examined_on, expires_on, created_at
            FROM medical_exams
            WHERE employee_id = $1 AND organization_id = $2
            ORDER BY expires_on DESC
            "#,
        )
        .bind(employee_id)
        .bind(organization_id)
        .fetch_all(pool)
        .await?;

        Ok(exams)
    }

    /// Counts exams expiring within the window, including already expired ones
    ///
    /// The window is `[today - infinity, today + window_days]`: a result
    /// that already lapsed still needs attention, so it stays in the count
    /// until a newer exam replaces it.
    pub async fn count_expiring_within(
        pool: &PgPool,
        organization_id: Uuid,
        window_days: i64,
    ) -> Result<i64, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM medical_exams
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
