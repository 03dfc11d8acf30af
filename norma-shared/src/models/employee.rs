/// Employee model and database operations
///
/// Employees are the subjects of most compliance records (medical exams,
/// trainings). The CNP (national identification number) is validated at the
/// API boundary before rows reach this module; the database additionally
/// enforces uniqueness per organization.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE employees (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
///     cnp CHAR(13) NOT NULL,
///     full_name VARCHAR(255) NOT NULL,
///     job_title VARCHAR(255),
///     hired_on DATE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (organization_id, cnp)
/// );
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Employee model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Employee {
    /// Unique employee ID
    pub id: Uuid,

    /// Organization the employee works for
    pub organization_id: Uuid,

    /// Romanian national identification number (13 digits)
    pub cnp: String,

    /// Full legal name
    pub full_name: String,

    /// Job title / position
    pub job_title: Option<String>,

    /// Hiring date
    pub hired_on: Option<NaiveDate>,

    /// When the row was created
    pub created_at: DateTime<Utc>,

    /// When the row was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new employee
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEmployee {
    /// Organization ID
    pub organization_id: Uuid,

    /// National identification number (already checksum-validated)
    pub cnp: String,

    /// Full legal name
    pub full_name: String,

    /// Job title
    pub job_title: Option<String>,

    /// Hiring date
    pub hired_on: Option<NaiveDate>,
}

/// Input for updating an employee
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEmployee {
    /// New full name
    pub full_name: Option<String>,

    /// New job title
    pub job_title: Option<String>,

    /// New hiring date
    pub hired_on: Option<NaiveDate>,
}

impl Employee {
    /// Creates a new employee
    pub async fn create(pool: &PgPool, data: CreateEmployee) -> Result<Self, sqlx::Error> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees (organization_id, cnp, full_name, job_title, hired_on)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, organization_id, cnp, full_name, job_title, hired_on,
                      created_at, updated_at
            "#,
        )
        .bind(data.organization_id)
        .bind(data.cnp)
        .bind(data.full_name)
        .bind(data.job_title)
        .bind(data.hired_on)
        .fetch_one(pool)
        .await?;

        Ok(employee)
    }

    /// Finds an employee by ID with organization isolation
    ///
    /// The preferred lookup for API endpoints: an ID from another tenant
    /// behaves exactly like a missing row.
    pub async fn find_by_id_and_organization(
        pool: &PgPool,
        id: Uuid,
        organization_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, organization_id, cnp, full_name, job_title, hired_on,
                   created_at, updated_at
            FROM employees
            WHERE id = $1 AND organization_id = $2
            "#,
        )
        .bind(id)
        .bind(organization_id)
        .fetch_optional(pool)
        .await?;

        Ok(employee)
    }

    /// Lists employees for an organization with pagination
    pub async fn list_by_organization(
        pool: &PgPool,
        organization_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let employees = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, organization_id, cnp, full_name, job_title, hired_on,
                   created_at, updated_at
            FROM employees
            WHERE organization_id = $1
            ORDER BY full_name ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(organization_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(employees)
    }

    /// Updates an employee
    ///
    /// Only non-None fields are updated. The CNP is immutable once created.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        organization_id: Uuid,
        data: UpdateEmployee,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE employees SET updated_at = NOW()");
        let mut bind_count = 2;

        if data.full_name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", full_name = ${}", bind_count));
        }
        if data.job_title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", job_title = ${}", bind_count));
        }
        if data.hired_on.is_some() {
            bind_count += 1;
            query.push_str(&format!(", hired_on = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 AND organization_id = $2 \
             RETURNING id, organization_id, cnp, full_name, job_title, hired_on, \
             created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .bind(organization_id);

        if let Some(full_name) = data.full_name {
            q = q.bind(full_name);
        }
        if let Some(job_title) = data.job_title {
            q = q.bind(job_title);
        }
        if let Some(hired_on) = data.hired_on {
            q = q.bind(hired_on);
        }

        let employee = q.fetch_optional(pool).await?;

        Ok(employee)
    }

    /// Deletes an employee (cascades to their exams and trainings)
    pub async fn delete(
        pool: &PgPool,
        id: Uuid,
        organization_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1 AND organization_id = $2")
            .bind(id)
            .bind(organization_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts employees for an organization
    pub async fn count_by_organization(
        pool: &PgPool,
        organization_id: Uuid,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM employees WHERE organization_id = $1")
                .bind(organization_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }
}
