/// Scheduled trigger endpoints
///
/// The hosting platform's cron hits these over HTTP. They are guarded by a
/// static bearer secret compared by string equality, not by JWT; the cron
/// runner is not a user.
///
/// # Endpoint
///
/// ```text
/// POST /v1/cron/check-expiries
/// Authorization: Bearer <CRON_SECRET>
/// ```

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::HeaderMap, Json};
use norma_worker::scanner::{ExpiryScanner, ScanSummary};

/// Checks the static cron bearer secret
fn require_cron_secret(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::BadRequest("Expected Bearer token".to_string()))?;

    if token != state.config.cron.secret {
        return Err(ApiError::Unauthorized("Invalid cron secret".to_string()));
    }

    Ok(())
}

/// Runs one expiry scan over every organization
///
/// Same engine the worker's timer loop runs; the summary goes back to the
/// cron runner's logs.
pub async fn check_expiries(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<ScanSummary>> {
    require_cron_secret(&state, &headers)?;

    let scanner = ExpiryScanner::new(state.db.clone(), state.channels.clone());

    let summary = scanner
        .scan_all()
        .await
        .map_err(|e| ApiError::InternalError(format!("Scan failed: {}", e)))?;

    tracing::info!(
        organizations = summary.organizations_scanned,
        alerts = summary.alerts_created,
        "Cron-triggered scan completed"
    );

    Ok(Json(summary))
}
