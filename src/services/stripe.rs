use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use sha2::Sha256;
use std::time::Duration;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Errors that can occur when talking to the payment provider
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Errors raised while authenticating and decoding a webhook delivery
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WebhookError {
    #[error("Malformed signature header")]
    MalformedHeader,

    #[error("No matching signature")]
    SignatureMismatch,

    #[error("Timestamp outside the tolerance window")]
    TimestampOutOfTolerance,

    #[error("Invalid signing secret")]
    InvalidSecret,

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

/// Hosted checkout session for a trial payment
#[derive(Debug, Clone)]
pub struct CheckoutSessionRequest {
    pub trial_id: String,
    pub match_id: String,
    pub founder_id: String,
    pub candidate_id: String,
    pub candidate_name: String,
    pub title: String,
    pub timeline: String,
    /// Amount in cents
    pub fee: i64,
    pub customer_email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
}

/// Stripe API client
///
/// Creates hosted checkout sessions for trial payments. Webhook verification
/// lives in free functions so it can run without a client.
pub struct StripeClient {
    api_base: String,
    secret_key: String,
    app_url: String,
    client: Client,
}

impl StripeClient {
    pub fn new(
        api_base: String,
        secret_key: String,
        app_url: String,
        timeout: Duration,
    ) -> Result<Self, PaymentError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            api_base,
            secret_key,
            app_url,
            client,
        })
    }

    /// Form fields for a checkout session, in Stripe's bracketed notation
    fn checkout_form(&self, req: &CheckoutSessionRequest) -> Vec<(String, String)> {
        let app_url = self.app_url.trim_end_matches('/');

        let mut form = vec![
            ("mode".to_string(), "payment".to_string()),
            ("payment_method_types[0]".to_string(), "card".to_string()),
            ("line_items[0][quantity]".to_string(), "1".to_string()),
            ("line_items[0][price_data][currency]".to_string(), "usd".to_string()),
            ("line_items[0][price_data][unit_amount]".to_string(), req.fee.to_string()),
            (
                "line_items[0][price_data][product_data][name]".to_string(),
                format!("Trial Project: {}", req.title),
            ),
            (
                "line_items[0][price_data][product_data][description]".to_string(),
                format!("{} trial project with {}", req.timeline, req.candidate_name),
            ),
            (
                "success_url".to_string(),
                format!(
                    "{}/trial/success?session_id={{CHECKOUT_SESSION_ID}}&trial_id={}",
                    app_url,
                    urlencoding::encode(&req.trial_id)
                ),
            ),
            (
                "cancel_url".to_string(),
                format!("{}/trial/{}", app_url, urlencoding::encode(&req.match_id)),
            ),
        ];

        for (key, value) in [
            ("trialId", &req.trial_id),
            ("matchId", &req.match_id),
            ("founderId", &req.founder_id),
            ("candidateId", &req.candidate_id),
        ] {
            form.push((format!("metadata[{}]", key), value.clone()));
        }

        // Payment intents do not inherit session metadata; failures are looked up by it
        form.push((
            "payment_intent_data[metadata][trialId]".to_string(),
            req.trial_id.clone(),
        ));

        if let Some(email) = &req.customer_email {
            form.push(("customer_email".to_string(), email.clone()));
        }

        form
    }

    /// Create a hosted checkout session
    pub async fn create_checkout_session(
        &self,
        req: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let url = format!("{}/v1/checkout/sessions", self.api_base.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(&self.checkout_form(req))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Checkout session for trial {} failed: {} - {}", req.trial_id, status, body);
            return Err(PaymentError::ApiError(format!(
                "Failed to create checkout session: {}",
                status
            )));
        }

        let session: CheckoutSession = response
            .json()
            .await
            .map_err(|e| PaymentError::InvalidResponse(format!("Failed to parse session: {}", e)))?;

        tracing::debug!("Created checkout session {} for trial {}", session.id, req.trial_id);

        Ok(session)
    }
}

/// Verify a `Stripe-Signature` header against the raw request body
///
/// The header looks like `t=1700000000,v1=<hex>,v1=<hex>`. Any `v1` entry may
/// match; other schemes are ignored.
pub fn verify_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    now: i64,
    tolerance_secs: i64,
) -> Result<(), WebhookError> {
    let mut timestamp: Option<i64> = None;
    let mut signatures: Vec<Vec<u8>> = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => timestamp = value.parse().ok(),
            "v1" => {
                if let Ok(bytes) = hex::decode(value) {
                    signatures.push(bytes);
                }
            }
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(WebhookError::MalformedHeader)?;
    if signatures.is_empty() {
        return Err(WebhookError::MalformedHeader);
    }

    let mac = signed_payload_mac(secret, timestamp, payload)?;
    // verify_slice compares in constant time
    let matched = signatures
        .iter()
        .any(|sig| mac.clone().verify_slice(sig).is_ok());

    if !matched {
        return Err(WebhookError::SignatureMismatch);
    }

    if (now - timestamp).abs() > tolerance_secs {
        return Err(WebhookError::TimestampOutOfTolerance);
    }

    Ok(())
}

/// Hex signature for a payload, as the provider would send it
pub fn compute_signature(
    payload: &[u8],
    secret: &str,
    timestamp: i64,
) -> Result<String, WebhookError> {
    let mac = signed_payload_mac(secret, timestamp, payload)?;
    Ok(hex::encode(mac.finalize().into_bytes()))
}

fn signed_payload_mac(
    secret: &str,
    timestamp: i64,
    payload: &[u8],
) -> Result<HmacSha256, WebhookError> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| WebhookError::InvalidSecret)?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac)
}

/// Webhook events the service acts on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEvent {
    CheckoutCompleted {
        trial_id: Option<String>,
        match_id: Option<String>,
        payment_intent_id: Option<String>,
    },
    PaymentFailed {
        payment_intent_id: String,
        trial_id: Option<String>,
    },
    Ignored(String),
}

/// Parse a verified webhook body
pub fn parse_event(payload: &[u8]) -> Result<WebhookEvent, WebhookError> {
    let json: Value =
        serde_json::from_slice(payload).map_err(|e| WebhookError::InvalidPayload(e.to_string()))?;

    let event_type = json
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| WebhookError::InvalidPayload("missing event type".into()))?;

    let object = json
        .get("data")
        .and_then(|d| d.get("object"))
        .ok_or_else(|| WebhookError::InvalidPayload("missing data.object".into()))?;

    let metadata = |key: &str| {
        object
            .get("metadata")
            .and_then(|m| m.get(key))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    match event_type {
        "checkout.session.completed" => Ok(WebhookEvent::CheckoutCompleted {
            trial_id: metadata("trialId"),
            match_id: metadata("matchId"),
            payment_intent_id: object
                .get("payment_intent")
                .and_then(Value::as_str)
                .map(str::to_string),
        }),
        "payment_intent.payment_failed" => {
            let payment_intent_id = object
                .get("id")
                .and_then(Value::as_str)
                .ok_or_else(|| WebhookError::InvalidPayload("missing payment intent id".into()))?;
            Ok(WebhookEvent::PaymentFailed {
                payment_intent_id: payment_intent_id.to_string(),
                trial_id: metadata("trialId"),
            })
        }
        other => Ok(WebhookEvent::Ignored(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test";

    fn client(api_base: String) -> StripeClient {
        StripeClient::new(
            api_base,
            "sk_test_123".to_string(),
            "https://app.warmtrial.test/".to_string(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn session_request() -> CheckoutSessionRequest {
        CheckoutSessionRequest {
            trial_id: "trial-1".to_string(),
            match_id: "match-1".to_string(),
            founder_id: "founder-1".to_string(),
            candidate_id: "candidate-1".to_string(),
            candidate_name: "Alex Chen".to_string(),
            title: "API Integration".to_string(),
            timeline: "2 days".to_string(),
            fee: 40_000,
            customer_email: Some("founder@example.com".to_string()),
        }
    }

    #[test]
    fn test_checkout_form_fields() {
        let form = client("https://api.stripe.test".to_string()).checkout_form(&session_request());
        let get = |k: &str| form.iter().find(|(key, _)| key == k).map(|(_, v)| v.as_str());

        assert_eq!(get("line_items[0][price_data][unit_amount]"), Some("40000"));
        assert_eq!(
            get("line_items[0][price_data][product_data][name]"),
            Some("Trial Project: API Integration")
        );
        assert_eq!(
            get("success_url"),
            Some("https://app.warmtrial.test/trial/success?session_id={CHECKOUT_SESSION_ID}&trial_id=trial-1")
        );
        assert_eq!(get("cancel_url"), Some("https://app.warmtrial.test/trial/match-1"));
        assert_eq!(get("metadata[candidateId]"), Some("candidate-1"));
        assert_eq!(get("customer_email"), Some("founder@example.com"));
    }

    #[tokio::test]
    async fn test_create_checkout_session() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/checkout/sessions")
            .match_header("authorization", "Bearer sk_test_123")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"cs_test_1","url":"https://checkout.stripe.test/cs_test_1"}"#)
            .create_async()
            .await;

        let session = client(server.url())
            .create_checkout_session(&session_request())
            .await
            .unwrap();

        assert_eq!(session.id, "cs_test_1");
        assert_eq!(session.url.as_deref(), Some("https://checkout.stripe.test/cs_test_1"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_checkout_session_api_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/checkout/sessions")
            .with_status(402)
            .with_body(r#"{"error":{"message":"card declined"}}"#)
            .create_async()
            .await;

        let result = client(server.url())
            .create_checkout_session(&session_request())
            .await;

        assert!(matches!(result, Err(PaymentError::ApiError(_))));
    }

    #[test]
    fn test_verify_signature_roundtrip() {
        let payload = br#"{"type":"checkout.session.completed"}"#;
        let sig = compute_signature(payload, SECRET, 1_700_000_000).unwrap();
        let header = format!("t=1700000000,v1={}", sig);

        assert_eq!(verify_signature(payload, &header, SECRET, 1_700_000_100, 300), Ok(()));
    }

    #[test]
    fn test_verify_signature_any_v1_matches() {
        let payload = b"{}";
        let sig = compute_signature(payload, SECRET, 100).unwrap();
        let header = format!("t=100,v0=deadbeef,v1={},v1={}", "00".repeat(32), sig);

        assert_eq!(verify_signature(payload, &header, SECRET, 100, 300), Ok(()));
    }

    #[test]
    fn test_verify_signature_rejects_tampering() {
        let sig = compute_signature(b"original", SECRET, 100).unwrap();
        let header = format!("t=100,v1={}", sig);

        assert_eq!(
            verify_signature(b"tampered", &header, SECRET, 100, 300),
            Err(WebhookError::SignatureMismatch)
        );
        assert_eq!(
            verify_signature(b"original", &header, "other_secret", 100, 300),
            Err(WebhookError::SignatureMismatch)
        );
    }

    #[test]
    fn test_verify_signature_rejects_stale() {
        let sig = compute_signature(b"{}", SECRET, 100).unwrap();
        let header = format!("t=100,v1={}", sig);

        assert_eq!(
            verify_signature(b"{}", &header, SECRET, 1_000, 300),
            Err(WebhookError::TimestampOutOfTolerance)
        );
    }

    #[test]
    fn test_verify_signature_malformed() {
        assert_eq!(
            verify_signature(b"{}", "garbage", SECRET, 0, 300),
            Err(WebhookError::MalformedHeader)
        );
        assert_eq!(
            verify_signature(b"{}", "t=100", SECRET, 100, 300),
            Err(WebhookError::MalformedHeader)
        );
    }

    #[test]
    fn test_parse_checkout_completed() {
        let body = br#"{
            "id": "evt_1",
            "type": "checkout.session.completed",
            "data": {"object": {
                "id": "cs_1",
                "payment_intent": "pi_1",
                "metadata": {"trialId": "trial-1", "matchId": "match-1"}
            }}
        }"#;

        assert_eq!(
            parse_event(body).unwrap(),
            WebhookEvent::CheckoutCompleted {
                trial_id: Some("trial-1".to_string()),
                match_id: Some("match-1".to_string()),
                payment_intent_id: Some("pi_1".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_payment_failed_and_ignored() {
        let failed = br#"{"type":"payment_intent.payment_failed","data":{"object":{"id":"pi_9"}}}"#;
        assert_eq!(
            parse_event(failed).unwrap(),
            WebhookEvent::PaymentFailed {
                payment_intent_id: "pi_9".to_string(),
                trial_id: None,
            }
        );

        let other = br#"{"type":"customer.created","data":{"object":{}}}"#;
        assert_eq!(
            parse_event(other).unwrap(),
            WebhookEvent::Ignored("customer.created".to_string())
        );

        assert!(parse_event(b"not json").is_err());
    }
}
