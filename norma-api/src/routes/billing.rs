/// Billing webhook endpoint
///
/// Receives signed events from the payment provider. The signature and the
/// JSON shape are the only client errors here: once an event is verified
/// and parsed, the endpoint acknowledges it no matter what happens during
/// application. A processing failure is logged for manual follow-up
/// instead of bubbling up as a 5xx, because the provider responds to
/// errors by retrying every event in a storm.
///
/// # Endpoint
///
/// ```text
/// POST /v1/billing/webhook
/// Norma-Signature: t=1760000000,v1=<hex hmac>
/// ```
///
/// # Responses
///
/// - `200 OK` `{"received": true, "outcome": "applied" | "ignored" | "error"}`
/// - `400 Bad Request`: bad signature or malformed payload

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use norma_shared::billing::{self, BillingError, EventOutcome};
use serde::Serialize;

/// Webhook acknowledgment
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    /// Always true for acknowledged deliveries
    pub received: bool,

    /// What happened to the event
    pub outcome: String,
}

/// Billing webhook handler
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<WebhookResponse>> {
    let signature = headers
        .get(billing::SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::BadRequest("Missing signature header".to_string()))?;

    billing::verify_signature(signature, &body, &state.config.billing.webhook_secret).map_err(
        |e| match e {
            BillingError::SignatureMismatch => {
                ApiError::BadRequest("Invalid webhook signature".to_string())
            }
            other => ApiError::BadRequest(other.to_string()),
        },
    )?;

    let event = billing::parse_event(&body)
        .map_err(|e| ApiError::BadRequest(format!("Malformed event payload: {}", e)))?;

    // From here on we always acknowledge; see the module docs
    let outcome = match billing::apply_event(&state.db, &event).await {
        Ok(EventOutcome::Applied) => "applied",
        Ok(EventOutcome::Ignored) => "ignored",
        Err(e) => {
            tracing::error!(
                event_id = %event.id,
                kind = %event.kind,
                "Billing event application failed, acknowledging anyway: {}",
                e
            );
            "error"
        }
    };

    Ok(Json(WebhookResponse {
        received: true,
        outcome: outcome.to_string(),
    }))
}
