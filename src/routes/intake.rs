use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::models::{IntakeRequest, IntakeResponse, User};
use crate::routes::AppState;
use crate::services::NewRole;
use actix_web::{web, HttpResponse};
use validator::Validate;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/intake", web::post().to(create_role));
}

/// Founder intake
///
/// POST /api/v1/intake
///
/// Request body:
/// ```json
/// {
///   "title": "Founding Engineer",
///   "description": "string",
///   "skillsRequired": ["React", "Node.js"],
///   "workingStyle": "remote|hybrid|onsite",
///   "timeZone": "PST",
///   "cultureFit": "string",
///   "urgency": "LOW|MEDIUM|HIGH|URGENT",
///   "salaryMin": 100000,
///   "salaryMax": 150000,
///   "equityMin": 0.5,
///   "equityMax": 1.5
/// }
/// ```
async fn create_role(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<IntakeRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();
    req.validate()?;

    let skills_required = req.normalized_skills();
    if skills_required.is_empty() {
        return Err(ApiError::BadRequest(
            "At least one required skill is needed".to_string(),
        ));
    }

    state.store.upsert_user(&User::from(&user)).await?;

    let role = state
        .store
        .create_role(NewRole {
            founder_id: user.id.clone(),
            title: req.title.trim().to_string(),
            description: req.description.trim().to_string(),
            skills_required,
            working_style: req.working_style,
            time_zone: req.time_zone,
            culture_fit: req.culture_fit,
            urgency: req.urgency,
            salary_min: req.salary_min,
            salary_max: req.salary_max,
            equity_min: req.equity_min,
            equity_max: req.equity_max,
        })
        .await?;

    tracing::info!("Founder {} created role {} ({})", user.id, role.id, role.title);

    Ok(HttpResponse::Ok().json(IntakeResponse {
        success: true,
        role_id: role.id,
        message: "Role created successfully".to_string(),
    }))
}
