/// Billing webhook events: verification and application
///
/// The payment provider signs each webhook delivery with an HMAC-SHA256
/// signature over `"{timestamp}.{body}"`, sent as
/// `Norma-Signature: t=<unix>,v1=<hex>`. This module verifies that
/// signature, deserializes the payload into explicit typed structs, and
/// applies recognized events to the database: upsert the subscription
/// mirror, then recompute the entitlement status of every module the
/// subscription covers.
///
/// Unknown event kinds are logged and ignored so the provider can add
/// events without breaking us. The HTTP route decides the response policy
/// (acknowledge even when application fails); this module just reports
/// what happened.
///
/// # Event shapes
///
/// ```json
/// {
///   "id": "evt_123",
///   "kind": "customer.subscription.updated",
///   "data": {
///     "subscription_id": "sub_123",
///     "customer_id": "cus_123",
///     "organization_id": "8e7b...",
///     "status": "active",
///     "module_keys": ["ssm", "psi"],
///     "current_period_end": "2026-03-01T00:00:00Z",
///     "trial_end": null,
///     "cancel_at_period_end": false
///   }
/// }
/// ```

use crate::models::org_module::{ModuleStatus, OrganizationModule};
use crate::models::subscription::{Subscription, SubscriptionStatus, UpsertSubscription};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use sqlx::PgPool;
use uuid::Uuid;

/// Signature header carrying the webhook HMAC
pub const SIGNATURE_HEADER: &str = "Norma-Signature";

/// Billing errors
#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    /// Signature header missing or malformed
    #[error("Invalid signature header: {0}")]
    InvalidSignatureHeader(String),

    /// Signature did not match the payload
    #[error("Signature verification failed")]
    SignatureMismatch,

    /// Payload was not valid JSON for the expected shape
    #[error("Malformed event payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// Database failure while applying the event
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A webhook delivery parsed at the boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Provider event ID
    pub id: String,

    /// Event kind, e.g. "customer.subscription.updated"
    pub kind: String,

    /// Subscription snapshot carried by the event
    pub data: SubscriptionData,
}

/// Subscription snapshot inside an event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionData {
    /// Provider subscription ID
    pub subscription_id: String,

    /// Provider customer ID
    pub customer_id: String,

    /// Tenant the subscription bills (set via provider metadata at checkout)
    pub organization_id: Uuid,

    /// Provider subscription status
    pub status: SubscriptionStatus,

    /// Module keys covered by the subscription
    #[serde(default)]
    pub module_keys: Vec<String>,

    /// End of the current billing period
    pub current_period_end: Option<DateTime<Utc>>,

    /// End of the provider-managed trial, if any
    pub trial_end: Option<DateTime<Utc>>,

    /// Whether the subscription ends at the period boundary
    #[serde(default)]
    pub cancel_at_period_end: bool,
}

/// Outcome of applying one event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventOutcome {
    /// Subscription upserted and module statuses recomputed
    Applied,

    /// Event kind is not one we act on
    Ignored,
}

/// Verifies the `t=<unix>,v1=<hex>` signature header against the raw body
///
/// # Errors
///
/// Returns [`BillingError::InvalidSignatureHeader`] when the header cannot
/// be parsed, [`BillingError::SignatureMismatch`] when the HMAC does not
/// match.
pub fn verify_signature(header: &str, body: &[u8], secret: &str) -> Result<(), BillingError> {
    let mut timestamp: Option<&str> = None;
    let mut signature: Option<&str> = None;

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = Some(value),
            Some(("v1", value)) => signature = Some(value),
            _ => {} // tolerate unknown schemes, as providers add them
        }
    }

    let timestamp = timestamp.ok_or_else(|| {
        BillingError::InvalidSignatureHeader("missing t= component".to_string())
    })?;
    let signature = signature.ok_or_else(|| {
        BillingError::InvalidSignatureHeader("missing v1= component".to_string())
    })?;

    let expected = hex::decode(signature)
        .map_err(|_| BillingError::InvalidSignatureHeader("v1 is not hex".to_string()))?;

    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .map_err(|_| BillingError::InvalidSignatureHeader("empty secret".to_string()))?;
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(body);

    mac.verify_slice(&expected)
        .map_err(|_| BillingError::SignatureMismatch)
}

/// Computes the signature header value for a payload
///
/// Used by tests and by outbound tooling that replays events.
pub fn sign_payload(timestamp: i64, body: &[u8], secret: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(body);

    format!("t={},v1={:x}", timestamp, mac.finalize().into_bytes())
}

/// Parses a verified payload into a typed event
pub fn parse_event(body: &[u8]) -> Result<WebhookEvent, BillingError> {
    Ok(serde_json::from_slice(body)?)
}

/// Applies a typed event to the database
///
/// Recognized kinds upsert the subscription mirror and recompute the
/// status of every module the subscription lists. Unknown kinds are
/// logged and ignored without touching any row.
pub async fn apply_event(pool: &PgPool, event: &WebhookEvent) -> Result<EventOutcome, BillingError> {
    let status_override = match event.kind.as_str() {
        "customer.subscription.created" | "customer.subscription.updated" => None,
        // A deleted subscription is canceled regardless of its last status
        "customer.subscription.deleted" => Some(SubscriptionStatus::Canceled),
        "invoice.payment_failed" => Some(SubscriptionStatus::PastDue),
        "invoice.paid" => Some(SubscriptionStatus::Active),
        other => {
            tracing::info!(event_id = %event.id, kind = other, "Ignoring unrecognized billing event");
            return Ok(EventOutcome::Ignored);
        }
    };

    let status = status_override.unwrap_or(event.data.status);

    let subscription = Subscription::upsert(
        pool,
        UpsertSubscription {
            organization_id: event.data.organization_id,
            stripe_subscription_id: event.data.subscription_id.clone(),
            status,
            module_keys: event.data.module_keys.clone(),
            current_period_end: event.data.current_period_end,
            trial_end: event.data.trial_end,
            cancel_at_period_end: event.data.cancel_at_period_end,
        },
    )
    .await?;

    let module_status = status.module_status();
    let trial_expires_at = match module_status {
        ModuleStatus::Trial => subscription.trial_end,
        _ => None,
    };

    for module_key in &subscription.module_keys {
        OrganizationModule::apply_status(
            pool,
            subscription.organization_id,
            module_key,
            module_status,
            trial_expires_at,
        )
        .await?;
    }

    tracing::info!(
        event_id = %event.id,
        kind = %event.kind,
        organization_id = %subscription.organization_id,
        modules = subscription.module_keys.len(),
        status = status.as_str(),
        "Applied billing event"
    );

    Ok(EventOutcome::Applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret";

    fn event_json(kind: &str) -> String {
        format!(
            r#"{{
                "id": "evt_1",
                "kind": "{kind}",
                "data": {{
                    "subscription_id": "sub_1",
                    "customer_id": "cus_1",
                    "organization_id": "7f8a2c4e-3a64-4a0f-9a1c-2f6d64c0a111",
                    "status": "active",
                    "module_keys": ["ssm", "psi"],
                    "current_period_end": "2026-03-01T00:00:00Z",
                    "trial_end": null,
                    "cancel_at_period_end": false
                }}
            }}"#
        )
    }

    #[test]
    fn test_sign_and_verify_roundtrip() {
        let body = event_json("customer.subscription.updated");
        let header = sign_payload(1_760_000_000, body.as_bytes(), SECRET);

        assert!(verify_signature(&header, body.as_bytes(), SECRET).is_ok());
    }

    #[test]
    fn test_verify_rejects_tampered_body() {
        let body = event_json("customer.subscription.updated");
        let header = sign_payload(1_760_000_000, body.as_bytes(), SECRET);

        let tampered = body.replace("active", "canceled");
        assert!(matches!(
            verify_signature(&header, tampered.as_bytes(), SECRET),
            Err(BillingError::SignatureMismatch)
        ));
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let body = event_json("invoice.paid");
        let header = sign_payload(1_760_000_000, body.as_bytes(), SECRET);

        assert!(matches!(
            verify_signature(&header, body.as_bytes(), "whsec_other"),
            Err(BillingError::SignatureMismatch)
        ));
    }

    #[test]
    fn test_verify_rejects_malformed_header() {
        let body = b"{}";
        assert!(matches!(
            verify_signature("v1=abcd", body, SECRET),
            Err(BillingError::InvalidSignatureHeader(_))
        ));
        assert!(matches!(
            verify_signature("t=123", body, SECRET),
            Err(BillingError::InvalidSignatureHeader(_))
        ));
        assert!(matches!(
            verify_signature("t=123,v1=zzzz", body, SECRET),
            Err(BillingError::InvalidSignatureHeader(_))
        ));
    }

    #[test]
    fn test_verify_tolerates_extra_schemes() {
        let body = event_json("invoice.paid");
        let header = sign_payload(42, body.as_bytes(), SECRET);
        let with_extra = format!("{},v0=deadbeef", header);

        assert!(verify_signature(&with_extra, body.as_bytes(), SECRET).is_ok());
    }

    #[test]
    fn test_parse_event() {
        let body = event_json("customer.subscription.created");
        let event = parse_event(body.as_bytes()).unwrap();

        assert_eq!(event.kind, "customer.subscription.created");
        assert_eq!(event.data.subscription_id, "sub_1");
        assert_eq!(event.data.module_keys, vec!["ssm", "psi"]);
        assert_eq!(event.data.status, SubscriptionStatus::Active);
    }

    #[test]
    fn test_parse_event_rejects_garbage() {
        assert!(matches!(
            parse_event(b"not json"),
            Err(BillingError::MalformedPayload(_))
        ));
        assert!(matches!(
            parse_event(br#"{"id": "evt_1"}"#),
            Err(BillingError::MalformedPayload(_))
        ));
    }
}
