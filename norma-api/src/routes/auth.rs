/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - register a user with a new organization
/// - `POST /v1/auth/login` - login and get tokens
/// - `POST /v1/auth/refresh` - refresh access token

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{extract::State, Json};
use norma_shared::{
    auth::{jwt, password},
    models::{
        membership::{CreateMembership, Membership, MembershipRole},
        organization::{CreateOrganization, Organization},
        user::{CreateUser, User},
    },
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address
    #[validate(email(message = "Adresa de email este invalida"))]
    pub email: String,

    /// Password (validated for strength separately)
    #[validate(length(min = 8, message = "Parola trebuie sa aiba cel putin 8 caractere"))]
    pub password: String,

    /// Optional display name
    #[validate(length(max = 100, message = "Numele poate avea cel mult 100 de caractere"))]
    pub name: Option<String>,

    /// Company name for the new organization
    #[validate(length(
        min = 2,
        max = 255,
        message = "Numele companiei trebuie sa aiba intre 2 si 255 de caractere"
    ))]
    pub organization_name: String,

    /// Optional Romanian fiscal code (CUI)
    #[validate(length(max = 16, message = "CUI-ul poate avea cel mult 16 caractere"))]
    pub cui: Option<String>,
}

/// Register response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// User ID
    pub user_id: String,

    /// Organization ID
    pub organization_id: String,

    /// Access token (24h)
    pub access_token: String,

    /// Refresh token (30d)
    pub refresh_token: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Adresa de email este invalida"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// User ID
    pub user_id: String,

    /// Default organization ID
    pub organization_id: String,

    /// Access token (24h)
    pub access_token: String,

    /// Refresh token (30d)
    pub refresh_token: String,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// New access token (24h)
    pub access_token: String,
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

/// Register a new user with a new organization
///
/// Creates the user account, the organization, and an owner membership,
/// then returns a token pair scoped to the new organization.
///
/// # Errors
///
/// - `409 Conflict`: email already registered
/// - `422 Unprocessable Entity`: validation failed
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<RegisterResponse>> {
    req.validate().map_err(validation_errors)?;

    password::validate_password_strength(&req.password).map_err(|e| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message: e,
        }])
    })?;

    let password_hash = password::hash_password(&req.password)?;

    // TODO: wrap user+org+membership creation in one transaction
    let user = User::create(
        &state.db,
        CreateUser {
            email: req.email.clone(),
            password_hash,
            name: req.name.clone(),
        },
    )
    .await?;

    let organization = Organization::create(
        &state.db,
        CreateOrganization {
            name: req.organization_name,
            cui: req.cui,
        },
    )
    .await?;

    Membership::create(
        &state.db,
        CreateMembership {
            organization_id: organization.id,
            user_id: user.id,
            role: MembershipRole::Owner,
        },
    )
    .await?;

    let access_claims = jwt::Claims::new(user.id, organization.id, jwt::TokenType::Access);
    let refresh_claims = jwt::Claims::new(user.id, organization.id, jwt::TokenType::Refresh);

    let access_token = jwt::create_token(&access_claims, state.jwt_secret())?;
    let refresh_token = jwt::create_token(&refresh_claims, state.jwt_secret())?;

    Ok(Json(RegisterResponse {
        user_id: user.id.to_string(),
        organization_id: organization.id.to_string(),
        access_token,
        refresh_token,
    }))
}

/// Login endpoint
///
/// Authenticates a user and returns a token pair scoped to their first
/// organization membership.
///
/// # Errors
///
/// - `401 Unauthorized`: invalid credentials
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate().map_err(validation_errors)?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Email sau parola incorecta".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Email sau parola incorecta".to_string(),
        ));
    }

    // First membership is the organization created at registration
    let memberships = Membership::list_by_user(&state.db, user.id).await?;
    let organization_id = memberships
        .first()
        .map(|m| m.organization_id)
        .ok_or_else(|| ApiError::InternalError("User has no organization".to_string()))?;

    User::update_last_login(&state.db, user.id).await?;

    let access_claims = jwt::Claims::new(user.id, organization_id, jwt::TokenType::Access);
    let refresh_claims = jwt::Claims::new(user.id, organization_id, jwt::TokenType::Refresh);

    let access_token = jwt::create_token(&access_claims, state.jwt_secret())?;
    let refresh_token = jwt::create_token(&refresh_claims, state.jwt_secret())?;

    Ok(Json(LoginResponse {
        user_id: user.id.to_string(),
        organization_id: organization_id.to_string(),
        access_token,
        refresh_token,
    }))
}

/// Token refresh endpoint
///
/// Exchanges a refresh token for a new access token.
///
/// # Errors
///
/// - `401 Unauthorized`: invalid or expired refresh token
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let access_token = jwt::refresh_access_token(&req.refresh_token, state.jwt_secret())?;

    Ok(Json(RefreshResponse { access_token }))
}
