use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::models::{OfferData, OfferRequest, OfferSentResponse, TrialDetails};
use crate::offer::{offer_filename, OfferLetter};
use crate::routes::matches::invalidate_matches;
use crate::routes::AppState;
use crate::services::NewOffer;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use validator::Validate;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/offer/generate", web::post().to(generate_offer))
        .route("/offer/send", web::post().to(send_offer));
}

/// Validated offer request together with the trial it belongs to
struct ResolvedOffer {
    details: TrialDetails,
    data: OfferData,
    start_date: Option<NaiveDate>,
}

async fn resolve_offer(
    state: &AppState,
    user: &AuthenticatedUser,
    req: OfferRequest,
) -> Result<ResolvedOffer, ApiError> {
    let (trial_id, data) = match (req.trial_id.trim(), req.offer_data) {
        (id, Some(data)) if !id.is_empty() => (id.to_string(), data),
        _ => return Err(ApiError::BadRequest("Missing required fields".to_string())),
    };
    data.validate()?;
    let start_date = parse_start_date(data.start_date.as_deref())?;

    let details = match state.store.find_trial(&trial_id).await? {
        Some(d) if d.trial.founder_id == user.id => d,
        _ => {
            return Err(ApiError::NotFound(
                "Trial not found or unauthorized".to_string(),
            ))
        }
    };

    Ok(ResolvedOffer {
        details,
        data,
        start_date,
    })
}

fn parse_start_date(raw: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => {
            // Accept full timestamps by keeping the date part
            let date_part = s.get(..10).unwrap_or(s);
            NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
                .map(Some)
                .map_err(|_| ApiError::BadRequest(format!("Invalid start date: {}", s)))
        }
    }
}

/// Render the offer letter PDF
///
/// POST /api/v1/offer/generate
///
/// Request body:
/// ```json
/// {
///   "trialId": "string",
///   "offerData": {
///     "title": "string",
///     "type": "CONTRACT|FULL_TIME",
///     "salary": 150000,
///     "hourlyRate": 95,
///     "equity": 0.5,
///     "vestingSchedule": "string",
///     "benefits": ["string"],
///     "responsibilities": "string",
///     "startDate": "2026-11-02"
///   }
/// }
/// ```
async fn generate_offer(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<OfferRequest>,
) -> Result<HttpResponse, ApiError> {
    let resolved = resolve_offer(&state, &user, req.into_inner()).await?;
    let details = &resolved.details;

    let founder_name = details.founder_name.as_deref().or(user.name.as_deref());
    let pdf = OfferLetter {
        candidate_name: &details.candidate_name,
        founder_name,
        offer: &resolved.data,
        start_date: resolved.start_date,
        issued_on: chrono::Utc::now().date_naive(),
    }
    .render();

    tracing::info!(
        "Generated offer letter for trial {} ({} bytes)",
        details.trial.id,
        pdf.len()
    );

    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(offer_filename(
                &details.candidate_name,
            ))],
        })
        .body(pdf))
}

/// Record an offer and close out the trial
///
/// POST /api/v1/offer/send
///
/// Takes the same body as `/offer/generate`. Amounts are whole dollars and are
/// stored in cents.
async fn send_offer(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<OfferRequest>,
) -> Result<HttpResponse, ApiError> {
    let ResolvedOffer {
        details,
        data,
        start_date,
    } = resolve_offer(&state, &user, req.into_inner()).await?;
    let trial = details.trial;

    let offer = state
        .store
        .send_offer(NewOffer {
            trial_id: trial.id.clone(),
            match_id: trial.match_id.clone(),
            founder_id: user.id.clone(),
            title: data.title.trim().to_string(),
            offer_type: data.offer_type,
            salary: data.salary.map(|s| s.saturating_mul(100)),
            hourly_rate: data.hourly_rate.map(|r| r.saturating_mul(100)),
            equity: data.equity,
            vesting_schedule: data.vesting_schedule,
            benefits: data.benefits,
            responsibilities: data.responsibilities,
            start_date,
        })
        .await?;

    if let Some(matched) = state.store.find_match(&trial.match_id).await? {
        invalidate_matches(&state.cache, &matched.role_id, &matched.founder_id).await;
    }

    tracing::info!("Offer {} sent for trial {}", offer.id, trial.id);

    Ok(HttpResponse::Ok().json(OfferSentResponse {
        success: true,
        offer_id: offer.id,
        message: "Offer sent successfully".to_string(),
    }))
}
