/// Organization endpoints
///
/// # Endpoints
///
/// - `GET /v1/organizations/current` - the organization from the token
/// - `PATCH /v1/organizations/current` - update name/CUI/settings (admin+)
/// - `GET /v1/organizations/members` - memberships of the organization
/// - `GET /v1/organizations/subscriptions` - billing mirror (owner only)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Extension, Json};
use norma_shared::{
    auth::{authorization, middleware::AuthContext},
    models::{
        membership::{Membership, MembershipRole},
        organization::{Organization, UpdateOrganization},
        subscription::Subscription,
    },
};
use serde::Deserialize;
use serde_json::Value as JsonValue;

/// Update request for the current organization
#[derive(Debug, Deserialize)]
pub struct UpdateOrganizationRequest {
    /// New company name
    pub name: Option<String>,

    /// New fiscal code
    pub cui: Option<String>,

    /// Settings patch (merged into existing settings)
    pub settings: Option<JsonValue>,
}

/// Returns the organization the token is scoped to
pub async fn get_current(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Organization>> {
    authorization::require_membership(&state.db, auth.organization_id, auth.user_id).await?;

    let organization = Organization::find_by_id(&state.db, auth.organization_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Organizatia nu a fost gasita".to_string()))?;

    Ok(Json(organization))
}

/// Updates the current organization (requires admin or owner)
pub async fn update_current(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdateOrganizationRequest>,
) -> ApiResult<Json<Organization>> {
    authorization::require_role(
        &state.db,
        auth.organization_id,
        auth.user_id,
        MembershipRole::Admin,
    )
    .await?;

    let organization = Organization::update(
        &state.db,
        auth.organization_id,
        UpdateOrganization {
            name: req.name,
            cui: req.cui,
            settings: req.settings,
            ..Default::default()
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Organizatia nu a fost gasita".to_string()))?;

    Ok(Json(organization))
}

/// Lists the organization's memberships
pub async fn list_members(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Membership>>> {
    authorization::require_membership(&state.db, auth.organization_id, auth.user_id).await?;

    let members = Membership::list_by_organization(&state.db, auth.organization_id).await?;

    Ok(Json(members))
}

/// Lists the organization's subscription mirror rows (owner only)
pub async fn list_subscriptions(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Subscription>>> {
    authorization::require_role(
        &state.db,
        auth.organization_id,
        auth.user_id,
        MembershipRole::Owner,
    )
    .await?;

    let subscriptions =
        Subscription::list_by_organization(&state.db, auth.organization_id).await?;

    Ok(Json(subscriptions))
}
