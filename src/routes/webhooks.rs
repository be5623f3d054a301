use crate::error::ApiError;
use crate::models::{MatchStatus, WebhookResponse};
use crate::routes::matches::invalidate_matches;
use crate::routes::AppState;
use crate::services::{parse_event, verify_signature, WebhookEvent};
use actix_web::{web, HttpRequest, HttpResponse};

pub const SIGNATURE_HEADER: &str = "stripe-signature";

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/webhooks/stripe", web::post().to(stripe_webhook));
}

/// Payment provider webhook
///
/// POST /api/v1/webhooks/stripe
///
/// The body is verified against the `Stripe-Signature` header before it is
/// parsed. Storage failures return 500 so the provider retries the delivery.
async fn stripe_webhook(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let signature = req
        .headers()
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::BadRequest("No signature".to_string()))?;

    let now = chrono::Utc::now().timestamp();
    if let Err(e) = verify_signature(
        &body,
        signature,
        &state.webhook_secret,
        now,
        state.webhook_tolerance_secs,
    ) {
        tracing::warn!("Webhook signature verification failed: {}", e);
        return Err(ApiError::BadRequest("Invalid signature".to_string()));
    }

    let event = parse_event(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    match event {
        WebhookEvent::CheckoutCompleted {
            trial_id,
            match_id,
            payment_intent_id,
        } => {
            handle_checkout_completed(&state, trial_id, match_id, payment_intent_id).await?;
        }
        WebhookEvent::PaymentFailed {
            payment_intent_id,
            trial_id,
        } => {
            match state
                .store
                .mark_payment_failed(trial_id.as_deref(), &payment_intent_id)
                .await?
            {
                Some(id) => tracing::info!("Trial payment failed for trial {}", id),
                None => tracing::warn!(
                    "No pending trial for failed payment intent {}",
                    payment_intent_id
                ),
            }
        }
        WebhookEvent::Ignored(event_type) => {
            tracing::debug!("Unhandled event type: {}", event_type);
        }
    }

    Ok(HttpResponse::Ok().json(WebhookResponse { received: true }))
}

async fn handle_checkout_completed(
    state: &AppState,
    trial_id: Option<String>,
    match_id: Option<String>,
    payment_intent_id: Option<String>,
) -> Result<(), ApiError> {
    let Some(trial_id) = trial_id else {
        tracing::error!("No trial ID in checkout session metadata");
        return Ok(());
    };

    match state
        .store
        .mark_trial_paid(&trial_id, payment_intent_id.as_deref())
        .await?
    {
        Some(trial) => tracing::info!("Trial payment successful for trial {}", trial.id),
        None => tracing::warn!("Trial {} not found or already completed", trial_id),
    }

    let Some(match_id) = match_id else {
        return Ok(());
    };

    let Some(matched) = state.store.find_match(&match_id).await? else {
        tracing::warn!("Paid checkout references unknown match {}", match_id);
        return Ok(());
    };

    if matched.status.can_advance_to(MatchStatus::TrialOffered) {
        state
            .store
            .update_match_status(&matched.id, MatchStatus::TrialOffered)
            .await?;
        invalidate_matches(&state.cache, &matched.role_id, &matched.founder_id).await;
    } else {
        tracing::warn!(
            "Match {} is already {:?}, not moving back to TRIAL_OFFERED",
            matched.id,
            matched.status
        );
    }

    Ok(())
}
