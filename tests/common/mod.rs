#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;
use warmtrial::auth::{issue_token, AuthConfig, Claims};
use warmtrial::core::Matcher;
use warmtrial::models::{
    CandidateProfile, Match, MatchCandidate, MatchResult, MatchRole, MatchStatus,
    MatchWithDetails, Offer, OfferStatus, Role, Trial, TrialDetails, TrialStatus, Urgency, User,
    VibeCheck, VibeCheckStatus, WorkingStyle,
};
use warmtrial::routes::AppState;
use warmtrial::services::{
    CacheManager, Catalog, NewOffer, NewRole, NewTrial, ScoredCandidate, Store, StoreError,
    StripeClient,
};

pub const JWT_SECRET: &str = "integration-test-secret";
pub const WEBHOOK_SECRET: &str = "whsec_integration";
pub const FOUNDER_ID: &str = "founder-1";
pub const OTHER_FOUNDER_ID: &str = "founder-2";

#[derive(Default)]
struct Inner {
    users: HashMap<String, User>,
    roles: HashMap<String, Role>,
    candidates: HashMap<String, CandidateProfile>,
    /// (match, ranking position)
    matches: Vec<(Match, usize)>,
    vibe_checks: Vec<VibeCheck>,
    trials: HashMap<String, Trial>,
    offers: Vec<Offer>,
}

/// In-memory `Store` with the same semantics as the PostgreSQL store
pub struct MemoryStore {
    inner: Mutex<Inner>,
    healthy: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            healthy: true,
        }
    }

    pub fn match_status(&self, match_id: &str) -> Option<MatchStatus> {
        let inner = self.inner.lock().unwrap();
        inner
            .matches
            .iter()
            .find(|(m, _)| m.id == match_id)
            .map(|(m, _)| m.status)
    }

    pub fn trial(&self, trial_id: &str) -> Option<Trial> {
        self.inner.lock().unwrap().trials.get(trial_id).cloned()
    }

    pub fn trials(&self) -> Vec<Trial> {
        self.inner.lock().unwrap().trials.values().cloned().collect()
    }

    pub fn offers(&self) -> Vec<Offer> {
        self.inner.lock().unwrap().offers.clone()
    }

    pub fn role(&self, role_id: &str) -> Option<Role> {
        self.inner.lock().unwrap().roles.get(role_id).cloned()
    }

    fn details(inner: &Inner, m: &Match) -> Option<MatchWithDetails> {
        let candidate = inner.candidates.get(&m.candidate_id)?;
        let role = inner.roles.get(&m.role_id)?;
        Some(MatchWithDetails {
            id: m.id.clone(),
            match_score: m.match_score,
            matched_skills: m.matched_skills.clone(),
            status: m.status,
            founder_id: m.founder_id.clone(),
            created_at: m.created_at,
            candidate: MatchCandidate::from(candidate),
            role: MatchRole::from(role),
        })
    }

    fn list(inner: &Inner, role_id: &str, founder_id: Option<&str>) -> Vec<MatchWithDetails> {
        let mut rows: Vec<&(Match, usize)> = inner
            .matches
            .iter()
            .filter(|(m, _)| m.role_id == role_id)
            .filter(|(m, _)| founder_id.map_or(true, |f| m.founder_id == f))
            .collect();

        rows.sort_by(|(a, ra), (b, rb)| {
            b.match_score
                .partial_cmp(&a.match_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(ra.cmp(rb))
        });

        rows.into_iter()
            .filter_map(|(m, _)| Self::details(inner, m))
            .collect()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn upsert_user(&self, user: &User) -> Result<(), StoreError> {
        self.inner
            .lock()
            .unwrap()
            .users
            .insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn create_role(&self, role: NewRole) -> Result<Role, StoreError> {
        let created = Role {
            id: Uuid::new_v4().to_string(),
            founder_id: role.founder_id,
            title: role.title,
            description: role.description,
            skills_required: role.skills_required,
            working_style: role.working_style,
            time_zone: role.time_zone,
            culture_fit: role.culture_fit,
            urgency: role.urgency,
            salary_min: role.salary_min,
            salary_max: role.salary_max,
            equity_min: role.equity_min,
            equity_max: role.equity_max,
            created_at: Utc::now(),
        };
        self.inner
            .lock()
            .unwrap()
            .roles
            .insert(created.id.clone(), created.clone());
        Ok(created)
    }

    async fn find_role(&self, role_id: &str) -> Result<Option<Role>, StoreError> {
        Ok(self.inner.lock().unwrap().roles.get(role_id).cloned())
    }

    async fn list_matches(
        &self,
        role_id: &str,
        founder_id: Option<&str>,
    ) -> Result<Vec<MatchWithDetails>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(Self::list(&inner, role_id, founder_id))
    }

    async fn save_matches(
        &self,
        role: &Role,
        scored: &[ScoredCandidate],
    ) -> Result<Vec<MatchWithDetails>, StoreError> {
        let mut inner = self.inner.lock().unwrap();

        if inner.matches.iter().any(|(m, _)| m.role_id == role.id) {
            return Ok(Self::list(&inner, &role.id, None));
        }

        for (rank, entry) in scored.iter().enumerate() {
            inner
                .candidates
                .entry(entry.candidate.id.clone())
                .or_insert_with(|| entry.candidate.clone());

            inner.matches.push((
                Match {
                    id: Uuid::new_v4().to_string(),
                    role_id: role.id.clone(),
                    candidate_id: entry.result.candidate_id.clone(),
                    founder_id: role.founder_id.clone(),
                    match_score: entry.result.score,
                    matched_skills: entry.result.matched_skills.clone(),
                    status: MatchStatus::Pending,
                    created_at: Utc::now(),
                },
                rank,
            ));
        }

        Ok(Self::list(&inner, &role.id, None))
    }

    async fn find_match(&self, match_id: &str) -> Result<Option<Match>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .matches
            .iter()
            .find(|(m, _)| m.id == match_id)
            .map(|(m, _)| m.clone()))
    }

    async fn update_match_status(&self, match_id: &str, status: MatchStatus) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let (m, _) = inner
            .matches
            .iter_mut()
            .find(|(m, _)| m.id == match_id)
            .ok_or_else(|| StoreError::NotFound(format!("match {}", match_id)))?;
        m.status = status;
        Ok(())
    }

    async fn submit_vibe_check(
        &self,
        matched: &Match,
        video_url: Option<String>,
        responses: HashMap<String, String>,
    ) -> Result<VibeCheck, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let vibe_check = VibeCheck {
            id: Uuid::new_v4().to_string(),
            match_id: matched.id.clone(),
            candidate_id: matched.candidate_id.clone(),
            video_url,
            responses,
            status: VibeCheckStatus::Completed,
            created_at: Utc::now(),
        };
        inner.vibe_checks.push(vibe_check.clone());

        if let Some((m, _)) = inner.matches.iter_mut().find(|(m, _)| m.id == matched.id) {
            m.status = MatchStatus::VibeCheckCompleted;
        }

        Ok(vibe_check)
    }

    async fn find_vibe_check(&self, match_id: &str) -> Result<Option<VibeCheck>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .vibe_checks
            .iter()
            .rev()
            .find(|v| v.match_id == match_id)
            .cloned())
    }

    async fn create_trial(&self, trial: NewTrial) -> Result<Trial, StoreError> {
        let created = Trial {
            id: Uuid::new_v4().to_string(),
            match_id: trial.match_id,
            candidate_id: trial.candidate_id,
            founder_id: trial.founder_id,
            title: trial.title,
            description: trial.description,
            requirements: trial.requirements,
            deliverables: trial.deliverables,
            timeline: trial.timeline,
            fee: trial.fee,
            status: TrialStatus::PendingPayment,
            stripe_session_id: None,
            stripe_payment_intent_id: None,
            created_at: Utc::now(),
        };
        self.inner
            .lock()
            .unwrap()
            .trials
            .insert(created.id.clone(), created.clone());
        Ok(created)
    }

    async fn attach_checkout_session(&self, trial_id: &str, session_id: &str) -> Result<(), StoreError> {
        if let Some(trial) = self.inner.lock().unwrap().trials.get_mut(trial_id) {
            trial.stripe_session_id = Some(session_id.to_string());
        }
        Ok(())
    }

    async fn find_trial(&self, trial_id: &str) -> Result<Option<TrialDetails>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let Some(trial) = inner.trials.get(trial_id) else {
            return Ok(None);
        };
        let Some(candidate) = inner.candidates.get(&trial.candidate_id) else {
            return Ok(None);
        };

        Ok(Some(TrialDetails {
            trial: trial.clone(),
            candidate_name: candidate.name.clone(),
            candidate_email: candidate.email.clone(),
            founder_name: inner
                .users
                .get(&trial.founder_id)
                .and_then(|u| u.name.clone()),
        }))
    }

    async fn mark_trial_paid(
        &self,
        trial_id: &str,
        payment_intent_id: Option<&str>,
    ) -> Result<Option<Trial>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.trials.get_mut(trial_id) {
            Some(trial) if trial.status != TrialStatus::Completed => {
                trial.status = TrialStatus::Active;
                if let Some(pi) = payment_intent_id {
                    trial.stripe_payment_intent_id = Some(pi.to_string());
                }
                Ok(Some(trial.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn mark_payment_failed(
        &self,
        trial_id: Option<&str>,
        payment_intent_id: &str,
    ) -> Result<Option<String>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let found = inner.trials.values_mut().find(|t| {
            let located = trial_id == Some(t.id.as_str())
                || t.stripe_payment_intent_id.as_deref() == Some(payment_intent_id);
            located
                && matches!(
                    t.status,
                    TrialStatus::PendingPayment | TrialStatus::PaymentFailed
                )
        });

        Ok(found.map(|t| {
            t.status = TrialStatus::PaymentFailed;
            if t.stripe_payment_intent_id.is_none() {
                t.stripe_payment_intent_id = Some(payment_intent_id.to_string());
            }
            t.id.clone()
        }))
    }

    async fn send_offer(&self, offer: NewOffer) -> Result<Offer, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let created = Offer {
            id: Uuid::new_v4().to_string(),
            trial_id: offer.trial_id.clone(),
            match_id: offer.match_id.clone(),
            founder_id: offer.founder_id,
            title: offer.title,
            offer_type: offer.offer_type,
            salary: offer.salary,
            hourly_rate: offer.hourly_rate,
            equity: offer.equity,
            vesting_schedule: offer.vesting_schedule,
            benefits: offer.benefits,
            responsibilities: offer.responsibilities,
            start_date: offer.start_date,
            status: OfferStatus::Sent,
            created_at: Utc::now(),
        };
        inner.offers.push(created.clone());

        if let Some(trial) = inner.trials.get_mut(&offer.trial_id) {
            trial.status = TrialStatus::Completed;
        }
        if let Some((m, _)) = inner.matches.iter_mut().find(|(m, _)| m.id == offer.match_id) {
            m.status = MatchStatus::OfferSent;
        }

        Ok(created)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(self.healthy)
    }
}

/// Everything a test needs to drive the HTTP API
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub state: AppState,
    pub auth: AuthConfig,
}

impl TestContext {
    /// Seed catalog, deterministic matcher, in-memory cache and a payment client
    /// pointed at `stripe_base`
    pub fn new(stripe_base: &str) -> Self {
        Self::with_pool(stripe_base, None)
    }

    pub fn with_pool(stripe_base: &str, pool: Option<Vec<CandidateProfile>>) -> Self {
        let store = Arc::new(MemoryStore::new());
        let mut catalog = Catalog::seeded().expect("seed catalog");
        if let Some(pool) = pool {
            catalog = catalog.with_candidates(pool);
        }

        let payments = StripeClient::new(
            stripe_base.to_string(),
            "sk_test_integration".to_string(),
            "https://app.warmtrial.test".to_string(),
            Duration::from_secs(5),
        )
        .expect("payment client");

        let state = AppState {
            store: store.clone(),
            cache: Arc::new(CacheManager::in_memory(100, 60)),
            payments: Arc::new(payments),
            catalog: Arc::new(catalog),
            matcher: Matcher::deterministic(0.0),
            top_k: 5,
            webhook_secret: WEBHOOK_SECRET.to_string(),
            webhook_tolerance_secs: 300,
        };

        Self {
            store,
            state,
            auth: AuthConfig {
                jwt_secret: JWT_SECRET.to_string(),
            },
        }
    }

    /// A role owned by `founder_id` asking for React and Node.js
    pub async fn seed_role(&self, founder_id: &str) -> Role {
        self.store
            .upsert_user(&User {
                id: founder_id.to_string(),
                email: Some(format!("{}@example.com", founder_id)),
                name: Some("Jordan Founder".to_string()),
            })
            .await
            .unwrap();

        self.store
            .create_role(NewRole {
                founder_id: founder_id.to_string(),
                title: "Founding Engineer".to_string(),
                description: "Build the product".to_string(),
                skills_required: vec!["React".to_string(), "Node.js".to_string()],
                working_style: WorkingStyle::Remote,
                time_zone: "PST".to_string(),
                culture_fit: "Ownership".to_string(),
                urgency: Urgency::High,
                salary_min: Some(100_000),
                salary_max: Some(150_000),
                equity_min: None,
                equity_max: None,
            })
            .await
            .unwrap()
    }

    /// A role with a single pending match for the first seed candidate
    pub async fn seed_match(&self, founder_id: &str) -> (Role, MatchWithDetails) {
        let role = self.seed_role(founder_id).await;
        let candidate = self.state.catalog.candidates()[0].clone();
        let scored = ScoredCandidate {
            result: MatchResult {
                candidate_id: candidate.id.clone(),
                score: 0.8,
                matched_skills: vec!["React".to_string()],
            },
            candidate,
        };

        let mut saved = self.store.save_matches(&role, &[scored]).await.unwrap();
        (role, saved.remove(0))
    }

    /// A pending-payment trial for a seeded match
    pub async fn seed_trial(&self, founder_id: &str) -> (MatchWithDetails, Trial) {
        let (_, matched) = self.seed_match(founder_id).await;
        let trial = self
            .store
            .create_trial(NewTrial {
                match_id: matched.id.clone(),
                candidate_id: matched.candidate.id.clone(),
                founder_id: founder_id.to_string(),
                title: "API Integration".to_string(),
                description: "Integrate".to_string(),
                requirements: "REST".to_string(),
                deliverables: "Code".to_string(),
                timeline: "2 days".to_string(),
                fee: 40_000,
            })
            .await
            .unwrap();
        (matched, trial)
    }
}

/// `Authorization` header value for a user
pub fn bearer(user_id: &str) -> (&'static str, String) {
    let claims = Claims {
        sub: user_id.to_string(),
        email: Some(format!("{}@example.com", user_id)),
        name: Some("Jordan Founder".to_string()),
        exp: (Utc::now().timestamp() + 3600) as usize,
    };
    let token = issue_token(&claims, JWT_SECRET).unwrap();
    ("Authorization", format!("Bearer {}", token))
}
