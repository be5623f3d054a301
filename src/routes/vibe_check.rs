use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::models::{
    MatchStatus, VibeCheckDetailsResponse, VibeCheckQuery, VibeCheckRequest, VibeCheckResponse,
};
use crate::routes::matches::invalidate_matches;
use crate::routes::AppState;
use actix_web::{web, HttpResponse};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/vibe-check", web::post().to(submit_vibe_check))
        .route("/vibe-check", web::get().to(get_vibe_check));
}

/// Submit a candidate's vibe check
///
/// POST /api/v1/vibe-check
///
/// Request body:
/// ```json
/// {
///   "matchId": "string",
///   "videoUrl": "https://...",
///   "responses": { "question": "answer" }
/// }
/// ```
async fn submit_vibe_check(
    state: web::Data<AppState>,
    _user: AuthenticatedUser,
    req: web::Json<VibeCheckRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();

    let (match_id, responses) = match (req.match_id.trim(), req.responses) {
        (id, Some(responses)) if !id.is_empty() => (id.to_string(), responses),
        _ => return Err(ApiError::BadRequest("Missing required fields".to_string())),
    };

    let matched = state
        .store
        .find_match(&match_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Match not found".to_string()))?;

    if !matched.status.can_advance_to(MatchStatus::VibeCheckCompleted) {
        return Err(ApiError::Conflict(format!(
            "Match is already {:?}, vibe check can no longer be submitted",
            matched.status
        )));
    }

    let video_url = req.video_url.filter(|url| !url.trim().is_empty());
    let vibe_check = state
        .store
        .submit_vibe_check(&matched, video_url, responses)
        .await?;

    invalidate_matches(&state.cache, &matched.role_id, &matched.founder_id).await;

    tracing::info!("Vibe check {} submitted for match {}", vibe_check.id, matched.id);

    Ok(HttpResponse::Ok().json(VibeCheckResponse {
        success: true,
        vibe_check_id: vibe_check.id,
        message: "Vibe check submitted successfully".to_string(),
    }))
}

/// Fetch the vibe check for a match
///
/// GET /api/v1/vibe-check?matchId={matchId}
async fn get_vibe_check(
    state: web::Data<AppState>,
    _user: AuthenticatedUser,
    query: web::Query<VibeCheckQuery>,
) -> Result<HttpResponse, ApiError> {
    let match_id = match query.match_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id,
        _ => return Err(ApiError::BadRequest("Match ID is required".to_string())),
    };

    let vibe_check = state
        .store
        .find_vibe_check(match_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Vibe check not found".to_string()))?;

    Ok(HttpResponse::Ok().json(VibeCheckDetailsResponse { vibe_check }))
}
