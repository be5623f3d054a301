use crate::models::domain::{OfferType, Urgency, WorkingStyle};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::{Validate, ValidationError};

/// Founder intake form
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_salary_band"))]
pub struct IntakeRequest {
    #[validate(custom(function = "not_blank"))]
    #[serde(default)]
    pub title: String,
    #[validate(custom(function = "not_blank"))]
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1))]
    #[serde(default)]
    pub skills_required: Vec<String>,
    #[serde(default = "default_working_style")]
    pub working_style: WorkingStyle,
    #[serde(default)]
    pub time_zone: String,
    #[serde(default)]
    pub culture_fit: String,
    #[serde(default = "default_urgency")]
    pub urgency: Urgency,
    #[validate(range(min = 0))]
    pub salary_min: Option<i64>,
    #[validate(range(min = 0))]
    pub salary_max: Option<i64>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub equity_min: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub equity_max: Option<f64>,
}

impl IntakeRequest {
    /// Trimmed, non-blank required skills
    pub fn normalized_skills(&self) -> Vec<String> {
        self.skills_required
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Rejects strings that are empty once trimmed
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn validate_salary_band(req: &IntakeRequest) -> Result<(), ValidationError> {
    if let (Some(min), Some(max)) = (req.salary_min, req.salary_max) {
        if min > max {
            return Err(ValidationError::new("salary_min_exceeds_max"));
        }
    }
    Ok(())
}

fn default_working_style() -> WorkingStyle {
    WorkingStyle::Remote
}

fn default_urgency() -> Urgency {
    Urgency::Medium
}

/// Request to generate matches for a role
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    #[validate(length(min = 1))]
    #[serde(default)]
    pub role_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchQuery {
    pub role_id: Option<String>,
}

/// Vibe check submission
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VibeCheckRequest {
    #[serde(default)]
    pub match_id: String,
    pub video_url: Option<String>,
    pub responses: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VibeCheckQuery {
    pub match_id: Option<String>,
}

/// Trial project details. `fee` is in cents.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TrialRequest {
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub deliverables: String,
    #[serde(default)]
    pub timeline: String,
    /// The payment provider rejects USD charges below 50 cents
    #[validate(range(min = 50))]
    pub fee: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(default)]
    pub match_id: String,
    pub trial: Option<TrialRequest>,
}

/// Offer terms. Money amounts are whole dollars.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OfferData {
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[serde(rename = "type")]
    pub offer_type: OfferType,
    #[validate(range(min = 0))]
    pub salary: Option<i64>,
    #[validate(range(min = 0))]
    pub hourly_rate: Option<i64>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub equity: Option<f64>,
    pub vesting_schedule: Option<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub responsibilities: String,
    /// ISO date, `YYYY-MM-DD`
    pub start_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferRequest {
    #[serde(default)]
    pub trial_id: String,
    pub offer_data: Option<OfferData>,
}

/// Filters for the compensation benchmark lookup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkQuery {
    pub role: Option<String>,
    pub level: Option<String>,
    pub location: Option<String>,
    pub company_stage: Option<String>,
}
