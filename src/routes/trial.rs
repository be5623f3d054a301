use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::models::{CheckoutRequest, CheckoutResponse, MatchStatus, TrialTemplatesResponse};
use crate::routes::AppState;
use crate::services::{CheckoutSessionRequest, NewTrial};
use actix_web::{web, HttpResponse};
use validator::Validate;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/trial/checkout", web::post().to(create_checkout))
        .route("/trial/templates", web::get().to(list_templates));
}

/// Start a paid trial
///
/// POST /api/v1/trial/checkout
///
/// Request body:
/// ```json
/// {
///   "matchId": "string",
///   "trial": {
///     "title": "string",
///     "description": "string",
///     "requirements": "string",
///     "deliverables": "string",
///     "timeline": "3 days",
///     "fee": 50000
///   }
/// }
/// ```
///
/// Creates the trial in `PENDING_PAYMENT` and returns a hosted checkout
/// session. The trial becomes active once the payment webhook arrives.
async fn create_checkout(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<CheckoutRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();

    let (match_id, trial) = match (req.match_id.trim(), req.trial) {
        (id, Some(trial)) if !id.is_empty() => (id.to_string(), trial),
        _ => return Err(ApiError::BadRequest("Missing required fields".to_string())),
    };
    trial.validate()?;

    let matched = match state.store.find_match(&match_id).await? {
        Some(m) if m.founder_id == user.id => m,
        _ => {
            return Err(ApiError::NotFound(
                "Match not found or unauthorized".to_string(),
            ))
        }
    };

    if !matched.status.can_advance_to(MatchStatus::TrialOffered) {
        return Err(ApiError::Conflict(format!(
            "Match is already {:?}, a trial can no longer be started",
            matched.status
        )));
    }

    let created = state
        .store
        .create_trial(NewTrial {
            match_id: matched.id.clone(),
            candidate_id: matched.candidate_id.clone(),
            founder_id: user.id.clone(),
            title: trial.title.trim().to_string(),
            description: trial.description,
            requirements: trial.requirements,
            deliverables: trial.deliverables,
            timeline: trial.timeline,
            fee: trial.fee,
        })
        .await?;

    let details = state
        .store
        .find_trial(&created.id)
        .await?
        .ok_or_else(|| ApiError::Internal(format!("trial {} vanished after insert", created.id)))?;

    let session = state
        .payments
        .create_checkout_session(&CheckoutSessionRequest {
            trial_id: created.id.clone(),
            match_id: matched.id.clone(),
            founder_id: user.id.clone(),
            candidate_id: matched.candidate_id.clone(),
            candidate_name: details.candidate_name,
            title: created.title.clone(),
            timeline: created.timeline.clone(),
            fee: created.fee,
            customer_email: user.email.clone(),
        })
        .await?;

    state
        .store
        .attach_checkout_session(&created.id, &session.id)
        .await?;

    tracing::info!(
        "Checkout session {} created for trial {} (match {})",
        session.id,
        created.id,
        matched.id
    );

    Ok(HttpResponse::Ok().json(CheckoutResponse {
        session_id: session.id,
        trial_id: created.id,
        url: session.url,
    }))
}

/// Trial project templates
///
/// GET /api/v1/trial/templates
async fn list_templates(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(TrialTemplatesResponse {
        templates: state.catalog.trial_templates().to_vec(),
    })
}
