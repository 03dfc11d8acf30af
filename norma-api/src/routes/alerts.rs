/// Alert endpoints
///
/// Read-only access to the expiry scanner's output.
///
/// # Endpoints
///
/// - `GET /v1/alerts?severity=&kind=&limit=&offset=` - list, newest first

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use norma_shared::{
    auth::{authorization, middleware::AuthContext},
    models::alert::{Alert, AlertKind, Severity},
};
use serde::{Deserialize, Serialize};

/// Filter and pagination parameters
#[derive(Debug, Deserialize)]
pub struct ListAlertsQuery {
    /// Only alerts with this severity
    pub severity: Option<Severity>,

    /// Only alerts of this kind
    pub kind: Option<AlertKind>,

    /// Maximum rows to return (default 50, capped at 200)
    pub limit: Option<i64>,

    /// Rows to skip
    pub offset: Option<i64>,
}

/// List response with total count
#[derive(Debug, Serialize)]
pub struct ListAlertsResponse {
    /// Page of alerts
    pub alerts: Vec<Alert>,

    /// Total alerts for the organization (unfiltered)
    pub total: i64,
}

/// Lists alerts for the current organization
pub async fn list_alerts(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ListAlertsQuery>,
) -> ApiResult<Json<ListAlertsResponse>> {
    authorization::require_membership(&state.db, auth.organization_id, auth.user_id).await?;

    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let offset = query.offset.unwrap_or(0).max(0);

    let alerts = Alert::list_by_organization(
        &state.db,
        auth.organization_id,
        query.severity,
        query.kind,
        limit,
        offset,
    )
    .await?;
    let total = Alert::count_by_organization(&state.db, auth.organization_id).await?;

    Ok(Json(ListAlertsResponse { alerts, total }))
}
