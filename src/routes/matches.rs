use crate::auth::AuthenticatedUser;
use crate::core::MatchError;
use crate::error::ApiError;
use crate::models::{
    CandidateProfile, MatchQuery, MatchRequest, MatchWithDetails, MatchesResponse, Requisition,
};
use crate::routes::AppState;
use crate::services::{CacheError, CacheKey, CacheManager, ScoredCandidate};
use actix_web::{web, HttpResponse};
use std::collections::HashMap;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/match", web::post().to(generate_matches))
        .route("/match", web::get().to(list_matches));
}

/// Drop the cached listing for a role after any of its matches change
pub(crate) async fn invalidate_matches(cache: &CacheManager, role_id: &str, founder_id: &str) {
    let cache_key = CacheKey::matches(role_id, founder_id);
    if let Err(e) = cache.delete(&cache_key).await {
        tracing::warn!("Failed to invalidate cache: {}", e);
    }
}

/// Generate matches for a role
///
/// POST /api/v1/match
///
/// Request body:
/// ```json
/// { "roleId": "string" }
/// ```
///
/// Matching runs once per role: later calls return the stored matches.
async fn generate_matches(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<MatchRequest>,
) -> Result<HttpResponse, ApiError> {
    let role_id = req.role_id.trim();
    if role_id.is_empty() {
        return Err(ApiError::BadRequest("Role ID is required".to_string()));
    }

    let role = match state.store.find_role(role_id).await? {
        Some(role) if role.founder_id == user.id => role,
        _ => return Err(ApiError::NotFound("Role not found".to_string())),
    };

    let existing = state.store.list_matches(&role.id, None).await?;
    if !existing.is_empty() {
        tracing::debug!("Role {} already has {} matches", role.id, existing.len());
        return Ok(HttpResponse::Ok().json(MatchesResponse {
            matches: existing,
            message: Some("Using existing matches".to_string()),
        }));
    }

    let requisition = Requisition::from(&role);
    let pool = state.catalog.candidates();

    let ranked = match state.matcher.rank(&requisition, pool, state.top_k) {
        Ok(ranked) => ranked,
        Err(MatchError::EmptyPool) => {
            tracing::warn!("Candidate pool is empty, no matches for role {}", role.id);
            return Ok(HttpResponse::Ok().json(MatchesResponse {
                matches: Vec::new(),
                message: Some("No candidates available".to_string()),
            }));
        }
        Err(e) => return Err(e.into()),
    };

    let by_id: HashMap<&str, &CandidateProfile> =
        pool.iter().map(|c| (c.id.as_str(), c)).collect();

    let scored: Vec<ScoredCandidate> = ranked
        .into_iter()
        .filter_map(|result| {
            by_id.get(result.candidate_id.as_str()).map(|candidate| ScoredCandidate {
                candidate: (*candidate).clone(),
                result,
            })
        })
        .collect();

    let matches = state.store.save_matches(&role, &scored).await?;
    invalidate_matches(&state.cache, &role.id, &role.founder_id).await;

    tracing::info!(
        "Generated {} matches for role {} from {} candidates",
        matches.len(),
        role.id,
        pool.len()
    );

    Ok(HttpResponse::Ok().json(MatchesResponse {
        matches,
        message: Some("Matches generated successfully".to_string()),
    }))
}

/// List the caller's matches for a role, best first
///
/// GET /api/v1/match?roleId={roleId}
async fn list_matches(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<MatchQuery>,
) -> Result<HttpResponse, ApiError> {
    let role_id = match query.role_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id,
        _ => return Err(ApiError::BadRequest("Role ID is required".to_string())),
    };

    let cache_key = CacheKey::matches(role_id, &user.id);

    match state.cache.get::<Vec<MatchWithDetails>>(&cache_key).await {
        Ok(matches) => {
            return Ok(HttpResponse::Ok().json(MatchesResponse {
                matches,
                message: None,
            }));
        }
        Err(CacheError::CacheMiss(_)) => {}
        Err(e) => tracing::warn!("Cache read failed for {}: {}", cache_key, e),
    }

    let matches = state.store.list_matches(role_id, Some(&user.id)).await?;

    if let Err(e) = state.cache.set(&cache_key, &matches).await {
        tracing::warn!("Failed to cache matches for {}: {}", cache_key, e);
    }

    Ok(HttpResponse::Ok().json(MatchesResponse {
        matches,
        message: None,
    }))
}
