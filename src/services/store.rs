use crate::models::{
    CandidateProfile, Match, MatchResult, MatchStatus, MatchWithDetails, Offer, OfferType, Role,
    Trial, TrialDetails, Urgency, User, VibeCheck, WorkingStyle,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur when reading or writing application records
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Fields for a new role
#[derive(Debug, Clone)]
pub struct NewRole {
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
}

/// A ranked candidate ready to be persisted as a match
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub candidate: CandidateProfile,
    pub result: MatchResult,
}

/// Fields for a new trial. `fee` is in cents.
#[derive(Debug, Clone)]
pub struct NewTrial {
    pub match_id: String,
    pub candidate_id: String,
    pub founder_id: String,
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub deliverables: String,
    pub timeline: String,
    pub fee: i64,
}

/// Fields for a new offer. Money amounts are in cents.
#[derive(Debug, Clone)]
pub struct NewOffer {
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
}

/// Persistence seam used by the HTTP handlers
///
/// Multi-record state changes (`save_matches`, `submit_vibe_check`, `send_offer`)
/// are atomic: either every record changes or none does.
#[async_trait]
pub trait Store: Send + Sync {
    async fn upsert_user(&self, user: &User) -> Result<(), StoreError>;

    async fn create_role(&self, role: NewRole) -> Result<Role, StoreError>;

    async fn find_role(&self, role_id: &str) -> Result<Option<Role>, StoreError>;

    /// Matches for a role ordered by score descending, then by ranking position.
    /// With `founder_id` set, only matches owned by that founder are returned.
    async fn list_matches(
        &self,
        role_id: &str,
        founder_id: Option<&str>,
    ) -> Result<Vec<MatchWithDetails>, StoreError>;

    /// Upsert the candidates and insert `PENDING` matches in ranking order.
    ///
    /// Generation happens at most once per role. If the role already has matches
    /// (for example from a concurrent request) nothing is inserted and the stored
    /// matches are returned.
    async fn save_matches(
        &self,
        role: &Role,
        scored: &[ScoredCandidate],
    ) -> Result<Vec<MatchWithDetails>, StoreError>;

    async fn find_match(&self, match_id: &str) -> Result<Option<Match>, StoreError>;

    async fn update_match_status(&self, match_id: &str, status: MatchStatus) -> Result<(), StoreError>;

    /// Record a completed vibe check and move the match to `VIBE_CHECK_COMPLETED`
    async fn submit_vibe_check(
        &self,
        matched: &Match,
        video_url: Option<String>,
        responses: HashMap<String, String>,
    ) -> Result<VibeCheck, StoreError>;

    /// Most recent vibe check for a match
    async fn find_vibe_check(&self, match_id: &str) -> Result<Option<VibeCheck>, StoreError>;

    async fn create_trial(&self, trial: NewTrial) -> Result<Trial, StoreError>;

    async fn attach_checkout_session(&self, trial_id: &str, session_id: &str) -> Result<(), StoreError>;

    async fn find_trial(&self, trial_id: &str) -> Result<Option<TrialDetails>, StoreError>;

    /// Activate a trial after successful payment. Returns `None` when the trial does
    /// not exist or is already completed.
    async fn mark_trial_paid(
        &self,
        trial_id: &str,
        payment_intent_id: Option<&str>,
    ) -> Result<Option<Trial>, StoreError>;

    /// Flag a pending trial as failed, located by id or by payment intent.
    /// Returns the id of the updated trial.
    async fn mark_payment_failed(
        &self,
        trial_id: Option<&str>,
        payment_intent_id: &str,
    ) -> Result<Option<String>, StoreError>;

    /// Insert the offer, complete the trial and move the match to `OFFER_SENT`
    async fn send_offer(&self, offer: NewOffer) -> Result<Offer, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}
