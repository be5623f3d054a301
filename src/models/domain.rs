use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Authenticated platform user (founder or candidate)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "working_style", rename_all = "lowercase")]
pub enum WorkingStyle {
    Remote,
    Hybrid,
    Onsite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "urgency", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(type_name = "availability", rename_all = "kebab-case")]
pub enum Availability {
    FullTime,
    PartTime,
    Contract,
}

/// Open role created by a founder through the intake form
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: String,
    pub founder_id: String,
    pub title: String,
    pub description: String,
    pub skills_required: Vec<String>,
    pub working_style: WorkingStyle,
    pub time_zone: String,
    pub culture_fit: String,
    pub urgency: Urgency,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub equity_min: Option<f64>,
    pub equity_max: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// The subset of a role that the match scorer looks at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requisition {
    pub title: String,
    pub description: String,
    pub required_skills: Vec<String>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
}

impl From<&Role> for Requisition {
    fn from(role: &Role) -> Self {
        Self {
            title: role.title.clone(),
            description: role.description.clone(),
            required_skills: role.skills_required.clone(),
            salary_min: role.salary_min,
            salary_max: role.salary_max,
        }
    }
}

/// Candidate from the matching pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub time_zone: String,
    #[serde(default)]
    pub portfolio_url: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default = "default_availability")]
    pub availability: Availability,
    #[serde(default)]
    pub expected_salary: Option<i64>,
}

fn default_availability() -> Availability {
    Availability::FullTime
}

/// Score computed for one candidate against one requisition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub candidate_id: String,
    pub score: f64,
    pub matched_skills: Vec<String>,
}

/// Lifecycle of a match. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "match_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Pending,
    VibeCheckCompleted,
    TrialOffered,
    OfferSent,
}

impl MatchStatus {
    /// Whether a match currently in `self` may move to `next`.
    /// Re-applying the current status is allowed so retried requests stay idempotent.
    pub fn can_advance_to(self, next: MatchStatus) -> bool {
        next >= self
    }
}

/// Persisted match between a role and a candidate
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: String,
    pub role_id: String,
    pub candidate_id: String,
    pub founder_id: String,
    pub match_score: f64,
    pub matched_skills: Vec<String>,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
}

/// Candidate fields returned alongside a match
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCandidate {
    pub id: String,
    pub name: String,
    pub summary: String,
    pub skills: Vec<String>,
    pub location: String,
    pub expected_salary: Option<i64>,
}

impl From<&CandidateProfile> for MatchCandidate {
    fn from(c: &CandidateProfile) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            summary: c.summary.clone(),
            skills: c.skills.clone(),
            location: c.location.clone(),
            expected_salary: c.expected_salary,
        }
    }
}

/// Role fields returned alongside a match
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRole {
    pub id: String,
    pub title: String,
    pub description: String,
}

impl From<&Role> for MatchRole {
    fn from(r: &Role) -> Self {
        Self {
            id: r.id.clone(),
            title: r.title.clone(),
            description: r.description.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchWithDetails {
    pub id: String,
    pub match_score: f64,
    pub matched_skills: Vec<String>,
    pub status: MatchStatus,
    pub founder_id: String,
    pub created_at: DateTime<Utc>,
    pub candidate: MatchCandidate,
    pub role: MatchRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "vibe_check_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VibeCheckStatus {
    Pending,
    Completed,
}

/// Async screening submission: optional video plus written answers
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VibeCheck {
    pub id: String,
    pub match_id: String,
    pub candidate_id: String,
    pub video_url: Option<String>,
    #[sqlx(json)]
    pub responses: HashMap<String, String>,
    pub status: VibeCheckStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "trial_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrialStatus {
    PendingPayment,
    Active,
    PaymentFailed,
    Completed,
}

/// Paid trial project. `fee` is in cents.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Trial {
    pub id: String,
    pub match_id: String,
    pub candidate_id: String,
    pub founder_id: String,
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub deliverables: String,
    pub timeline: String,
    pub fee: i64,
    pub status: TrialStatus,
    pub stripe_session_id: Option<String>,
    pub stripe_payment_intent_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Trial joined with the people involved, as needed for offers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialDetails {
    pub trial: Trial,
    pub candidate_name: String,
    pub candidate_email: String,
    pub founder_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "offer_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferType {
    Contract,
    FullTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "offer_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferStatus {
    Sent,
}

/// Offer sent to a candidate. Money amounts are in cents.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: String,
    pub trial_id: String,
    pub match_id: String,
    pub founder_id: String,
    pub title: String,
    pub offer_type: OfferType,
    pub salary: Option<i64>,
    pub hourly_rate: Option<i64>,
    pub equity: Option<f64>,
    pub vesting_schedule: Option<String>,
    pub benefits: Vec<String>,
    pub responsibilities: String,
    pub start_date: Option<NaiveDate>,
    pub status: OfferStatus,
    pub created_at: DateTime<Utc>,
}

/// Market compensation band. Salaries are in cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompensationBenchmark {
    pub role: String,
    pub level: String,
    pub location: String,
    pub company_stage: String,
    pub salary_min: i64,
    pub salary_max: i64,
    pub equity_min: f64,
    pub equity_max: f64,
}

/// Starting point for a trial project. `fee` is in cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialTemplate {
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub deliverables: String,
    pub timeline: String,
    pub fee: i64,
}

/// Scoring weights
///
/// `skill` and `exploration` build the quality score, `quality` and `salary`
/// blend it with salary alignment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub skill: f64,
    pub exploration: f64,
    pub quality: f64,
    pub salary: f64,
    pub salary_tolerance: f64,
    pub near_band_score: f64,
    pub neutral_salary_score: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skill: 0.7,
            exploration: 0.3,
            quality: 0.7,
            salary: 0.3,
            salary_tolerance: 1.1,
            near_band_score: 0.8,
            neutral_salary_score: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_status_forward_only() {
        assert!(MatchStatus::Pending.can_advance_to(MatchStatus::VibeCheckCompleted));
        assert!(MatchStatus::Pending.can_advance_to(MatchStatus::OfferSent));
        assert!(MatchStatus::TrialOffered.can_advance_to(MatchStatus::TrialOffered));
        assert!(!MatchStatus::OfferSent.can_advance_to(MatchStatus::TrialOffered));
        assert!(!MatchStatus::VibeCheckCompleted.can_advance_to(MatchStatus::Pending));
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&MatchStatus::VibeCheckCompleted).unwrap(),
            "\"VIBE_CHECK_COMPLETED\""
        );
        assert_eq!(serde_json::to_string(&OfferType::FullTime).unwrap(), "\"FULL_TIME\"");
        assert_eq!(serde_json::to_string(&Availability::FullTime).unwrap(), "\"full-time\"");
    }

    #[test]
    fn test_candidate_defaults() {
        let c: CandidateProfile =
            serde_json::from_str(r#"{"id":"c1","name":"Ada","skills":["Rust"]}"#).unwrap();
        assert_eq!(c.availability, Availability::FullTime);
        assert_eq!(c.expected_salary, None);
        assert_eq!(c.skills, vec!["Rust"]);
    }
}
