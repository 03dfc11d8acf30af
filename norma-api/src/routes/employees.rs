/// Employee endpoints
///
/// CRUD over the employee registry. The CNP is checksum-validated at this
/// boundary before anything touches the database, and every lookup is
/// organization-scoped so foreign IDs 404.
///
/// # Endpoints
///
/// - `POST /v1/employees` - create (member+)
/// - `GET /v1/employees` - list with pagination
/// - `GET /v1/employees/:id` - fetch one
/// - `PUT /v1/employees/:id` - update (member+; CNP is immutable)
/// - `DELETE /v1/employees/:id` - delete (admin+)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::NaiveDate;
use norma_shared::{
    auth::{authorization, middleware::AuthContext},
    cnp,
    models::{
        employee::{CreateEmployee, Employee, UpdateEmployee},
        membership::MembershipRole,
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create employee request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEmployeeRequest {
    /// National identification number (13 digits)
    pub cnp: String,

    /// Full legal name
    #[validate(length(
        min = 2,
        max = 255,
        message = "Numele trebuie sa aiba intre 2 si 255 de caractere"
    ))]
    pub full_name: String,

    /// Job title
    #[validate(length(max = 255, message = "Functia poate avea cel mult 255 de caractere"))]
    pub job_title: Option<String>,

    /// Hiring date
    pub hired_on: Option<NaiveDate>,
}

/// Update employee request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEmployeeRequest {
    /// New full name
    #[validate(length(
        min = 2,
        max = 255,
        message = "Numele trebuie sa aiba intre 2 si 255 de caractere"
    ))]
    pub full_name: Option<String>,

    /// New job title
    #[validate(length(max = 255, message = "Functia poate avea cel mult 255 de caractere"))]
    pub job_title: Option<String>,

    /// New hiring date
    pub hired_on: Option<NaiveDate>,
}

/// Pagination parameters for the list endpoint
#[derive(Debug, Deserialize)]
pub struct ListEmployeesQuery {
    /// Maximum rows to return (default 50, capped at 200)
    pub limit: Option<i64>,

    /// Rows to skip
    pub offset: Option<i64>,
}

/// List response with total count for pagination
#[derive(Debug, Serialize)]
pub struct ListEmployeesResponse {
    /// Page of employees
    pub employees: Vec<Employee>,

    /// Total employees in the organization
    pub total: i64,
}

/// Maps validator derive failures onto the error response format
fn validation_errors(e: validator::ValidationErrors) -> ApiError {
    let errors: Vec<ValidationErrorDetail> = e
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| ValidationErrorDetail {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Valoare invalida".to_string()),
            })
        })
        .collect();
    ApiError::ValidationError(errors)
}

/// Creates an employee
///
/// # Errors
///
/// - `409 Conflict`: CNP already registered in this organization
/// - `422 Unprocessable Entity`: invalid CNP or field validation failed
pub async fn create_employee(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateEmployeeRequest>,
) -> ApiResult<Json<Employee>> {
    authorization::require_role(
        &state.db,
        auth.organization_id,
        auth.user_id,
        MembershipRole::Member,
    )
    .await?;

    req.validate().map_err(validation_errors)?;
    cnp::validate(&req.cnp)?;

    let employee = Employee::create(
        &state.db,
        CreateEmployee {
            organization_id: auth.organization_id,
            cnp: req.cnp,
            full_name: req.full_name,
            job_title: req.job_title,
            hired_on: req.hired_on,
        },
    )
    .await?;

    Ok(Json(employee))
}

/// Lists employees with pagination
pub async fn list_employees(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ListEmployeesQuery>,
) -> ApiResult<Json<ListEmployeesResponse>> {
    authorization::require_membership(&state.db, auth.organization_id, auth.user_id).await?;

    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let offset = query.offset.unwrap_or(0).max(0);

    let employees =
        Employee::list_by_organization(&state.db, auth.organization_id, limit, offset).await?;
    let total = Employee::count_by_organization(&state.db, auth.organization_id).await?;

    Ok(Json(ListEmployeesResponse { employees, total }))
}

/// Fetches one employee
pub async fn get_employee(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Employee>> {
    authorization::require_membership(&state.db, auth.organization_id, auth.user_id).await?;

    let employee = Employee::find_by_id_and_organization(&state.db, id, auth.organization_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Angajatul nu a fost gasit".to_string()))?;

    Ok(Json(employee))
}

/// Updates an employee
///
/// The CNP is immutable; only name, title, and hire date can change.
pub async fn update_employee(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateEmployeeRequest>,
) -> ApiResult<Json<Employee>> {
    authorization::require_role(
        &state.db,
        auth.organization_id,
        auth.user_id,
        MembershipRole::Member,
    )
    .await?;

    req.validate().map_err(validation_errors)?;

    let employee = Employee::update(
        &state.db,
        id,
        auth.organization_id,
        UpdateEmployee {
            full_name: req.full_name,
            job_title: req.job_title,
            hired_on: req.hired_on,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Angajatul nu a fost gasit".to_string()))?;

    Ok(Json(employee))
}

/// Deletes an employee and their compliance records
pub async fn delete_employee(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    authorization::require_role(
        &state.db,
        auth.organization_id,
        auth.user_id,
        MembershipRole::Admin,
    )
    .await?;

    let deleted = Employee::delete(&state.db, id, auth.organization_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Angajatul nu a fost gasit".to_string()));
    }

    Ok(Json(serde_json::json!({ "deleted": true })))
}
