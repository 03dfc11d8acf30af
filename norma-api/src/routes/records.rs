/// Compliance record endpoints
///
/// CRUD over the records the expiry scanner watches: medical exams and
/// trainings per employee, equipment inspections per organization.
///
/// # Endpoints
///
/// - `POST /v1/employees/:id/medical-exams` - record an exam (member+)
/// - `GET /v1/employees/:id/medical-exams` - list an employee's exams
/// - `POST /v1/employees/:id/trainings` - record a training (member+)
/// - `GET /v1/employees/:id/trainings` - list an employee's trainings
/// - `POST /v1/equipment` - register equipment (member+)
/// - `GET /v1/equipment` - list equipment by inspection urgency
/// - `PUT /v1/equipment/:id/inspection` - record a completed inspection

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::NaiveDate;
use norma_shared::{
    auth::{authorization, middleware::AuthContext},
    models::{
        employee::Employee,
        equipment::{CreateEquipment, Equipment},
        medical_exam::{CreateMedicalExam, MedicalExam},
        membership::MembershipRole,
        training::{CreateTraining, Training},
    },
};
use serde::Deserialize;
use uuid::Uuid;

/// Request to record a medical exam
#[derive(Debug, Deserialize)]
pub struct CreateMedicalExamRequest {
    /// Exam kind, e.g. "angajare", "periodic"
    pub exam_kind: String,

    /// Date the exam was performed
    pub examined_on: NaiveDate,

    /// Date the result stops being valid
    pub expires_on: NaiveDate,
}

/// Request to record a training
#[derive(Debug, Deserialize)]
pub struct CreateTrainingRequest {
    /// Course name
    pub course: String,

    /// Completion date
    pub completed_on: NaiveDate,

    /// Repeat deadline
    pub expires_on: NaiveDate,
}

/// Request to register equipment
#[derive(Debug, Deserialize)]
pub struct CreateEquipmentRequest {
    /// Equipment name
    pub name: String,

    /// Serial number
    pub serial_number: Option<String>,

    /// Next inspection due date
    pub next_inspection_on: NaiveDate,
}

/// Request to record a completed inspection
#[derive(Debug, Deserialize)]
pub struct RecordInspectionRequest {
    /// New inspection due date
    pub next_inspection_on: NaiveDate,
}

/// Resolves an employee with organization isolation, 404 otherwise
async fn require_employee(
    state: &AppState,
    employee_id: Uuid,
    organization_id: Uuid,
) -> Result<Employee, ApiError> {
    Employee::find_by_id_and_organization(&state.db, employee_id, organization_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Angajatul nu a fost gasit".to_string()))
}

/// Records a medical exam for an employee
pub async fn create_medical_exam(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(employee_id): Path<Uuid>,
    Json(req): Json<CreateMedicalExamRequest>,
) -> ApiResult<Json<MedicalExam>> {
    authorization::require_role(
        &state.db,
        auth.organization_id,
        auth.user_id,
        MembershipRole::Member,
    )
    .await?;

    let employee = require_employee(&state, employee_id, auth.organization_id).await?;

    let exam = MedicalExam::create(
        &state.db,
        CreateMedicalExam {
            organization_id: auth.organization_id,
            employee_id: employee.id,
            exam_kind: req.exam_kind,
            examined_on: req.examined_on,
            expires_on: req.expires_on,
        },
    )
    .await?;

    Ok(Json(exam))
}

/// Lists an employee's medical exams, newest first
pub async fn list_medical_exams(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(employee_id): Path<Uuid>,
) -> ApiResult<Json<Vec<MedicalExam>>> {
    authorization::require_membership(&state.db, auth.organization_id, auth.user_id).await?;

    let employee = require_employee(&state, employee_id, auth.organization_id).await?;

    let exams = MedicalExam::list_by_employee(&state.db, employee.id, auth.organization_id).await?;

    Ok(Json(exams))
}

/// Records a training for an employee
pub async fn create_training(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(employee_id): Path<Uuid>,
    Json(req): Json<CreateTrainingRequest>,
) -> ApiResult<Json<Training>> {
    authorization::require_role(
        &state.db,
        auth.organization_id,
        auth.user_id,
        MembershipRole::Member,
    )
    .await?;

    let employee = require_employee(&state, employee_id, auth.organization_id).await?;

    let training = Training::create(
        &state.db,
        CreateTraining {
            organization_id: auth.organization_id,
            employee_id: employee.id,
            course: req.course,
            completed_on: req.completed_on,
            expires_on: req.expires_on,
        },
    )
    .await?;

    Ok(Json(training))
}

/// Lists an employee's trainings, newest first
pub async fn list_trainings(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(employee_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Training>>> {
    authorization::require_membership(&state.db, auth.organization_id, auth.user_id).await?;

    let employee = require_employee(&state, employee_id, auth.organization_id).await?;

    let trainings = Training::list_by_employee(&state.db, employee.id, auth.organization_id).await?;

    Ok(Json(trainings))
}

/// Registers a piece of equipment
pub async fn create_equipment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateEquipmentRequest>,
) -> ApiResult<Json<Equipment>> {
    authorization::require_role(
        &state.db,
        auth.organization_id,
        auth.user_id,
        MembershipRole::Member,
    )
    .await?;

    let equipment = Equipment::create(
        &state.db,
        CreateEquipment {
            organization_id: auth.organization_id,
            name: req.name,
            serial_number: req.serial_number,
            next_inspection_on: req.next_inspection_on,
        },
    )
    .await?;

    Ok(Json(equipment))
}

/// Lists equipment ordered by inspection urgency
pub async fn list_equipment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Equipment>>> {
    authorization::require_membership(&state.db, auth.organization_id, auth.user_id).await?;

    let equipment = Equipment::list_by_organization(&state.db, auth.organization_id).await?;

    Ok(Json(equipment))
}

/// Records a completed inspection, moving the due date forward
pub async fn record_inspection(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<RecordInspectionRequest>,
) -> ApiResult<Json<Equipment>> {
    authorization::require_role(
        &state.db,
        auth.organization_id,
        auth.user_id,
        MembershipRole::Member,
    )
    .await?;

    let equipment = Equipment::record_inspection(
        &state.db,
        id,
        auth.organization_id,
        req.next_inspection_on,
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Echipamentul nu a fost gasit".to_string()))?;

    Ok(Json(equipment))
}
