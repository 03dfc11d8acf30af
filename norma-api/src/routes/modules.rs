/// Module catalog and entitlement endpoints
///
/// # Endpoints
///
/// - `GET /v1/modules` - the static catalog
/// - `GET /v1/modules/state` - resolved access for every catalog entry
/// - `GET /v1/modules/:key/access` - resolved access for one key
/// - `POST /v1/modules/:key/trial` - start a 14-day trial (owner only)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;
use norma_shared::{
    auth::{authorization, middleware::AuthContext},
    catalog::{self, ModuleDefinition},
    entitlement::{self, ModuleAccess},
    models::{
        membership::MembershipRole,
        org_module::{ModuleStatus, OrganizationModule},
    },
};
use serde::Serialize;

/// Response for the trial-start endpoint
#[derive(Debug, Serialize)]
pub struct StartTrialResponse {
    /// Module key the trial covers
    pub module_key: String,

    /// Resulting row status (always "trial")
    pub status: ModuleStatus,

    /// When the trial ends
    pub trial_expires_at: Option<chrono::DateTime<Utc>>,
}

/// Lists the static module catalog
pub async fn list_catalog() -> Json<Vec<ModuleDefinition>> {
    Json(catalog::MODULE_CATALOG.to_vec())
}

/// Resolves access for every catalog entry at once
///
/// The dashboard's module gate consumes this to decide what to render.
pub async fn list_state(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<ModuleAccess>>> {
    authorization::require_membership(&state.db, auth.organization_id, auth.user_id).await?;

    let rows = OrganizationModule::list_by_organization(&state.db, auth.organization_id).await?;

    Ok(Json(entitlement::resolve_all(&rows, Utc::now())))
}

/// Resolves access for one module key
pub async fn get_access(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(key): Path<String>,
) -> ApiResult<Json<ModuleAccess>> {
    authorization::require_membership(&state.db, auth.organization_id, auth.user_id).await?;

    if !catalog::is_known_module(&key) {
        return Err(ApiError::NotFound(format!("Modul necunoscut: {}", key)));
    }

    let access = ModuleAccess::load(&state.db, auth.organization_id, &key).await?;

    Ok(Json(access))
}

/// Starts a 14-day trial for a module
///
/// Only owners may start trials, base-included modules need none, and a
/// module gets one trial ever: any existing state row (active, trialing,
/// or lapsed) makes this a conflict.
///
/// # Errors
///
/// - `404 Not Found`: unknown module key
/// - `409 Conflict`: trial already used or module already has a state
pub async fn start_trial(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(key): Path<String>,
) -> ApiResult<Json<StartTrialResponse>> {
    authorization::require_role(
        &state.db,
        auth.organization_id,
        auth.user_id,
        MembershipRole::Owner,
    )
    .await?;

    let definition = catalog::find(&key)
        .ok_or_else(|| ApiError::NotFound(format!("Modul necunoscut: {}", key)))?;

    if definition.base_included {
        return Err(ApiError::BadRequest(
            "Modulul este inclus in abonamentul de baza".to_string(),
        ));
    }

    if let Some(existing) = OrganizationModule::find(&state.db, auth.organization_id, &key).await? {
        return Err(ApiError::Conflict(format!(
            "Modulul are deja starea '{}'",
            existing.status.as_str()
        )));
    }

    let row = OrganizationModule::start_trial(&state.db, auth.organization_id, &key).await?;

    tracing::info!(
        organization_id = %auth.organization_id,
        module_key = %key,
        trial_expires_at = ?row.trial_expires_at,
        "Module trial started"
    );

    Ok(Json(StartTrialResponse {
        module_key: row.module_key,
        status: row.status,
        trial_expires_at: row.trial_expires_at,
    }))
}
