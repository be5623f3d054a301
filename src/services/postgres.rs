use crate::models::{
    Match, MatchCandidate, MatchRole, MatchStatus, MatchWithDetails, Offer, OfferStatus, Role,
    Trial, TrialDetails, TrialStatus, User, VibeCheck, VibeCheckStatus,
};
use crate::services::store::{NewOffer, NewRole, NewTrial, ScoredCandidate, Store, StoreError};
use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Row};
use std::collections::HashMap;
use std::time::Duration;
use uuid::Uuid;

const MATCH_DETAILS_SELECT: &str = r#"
    SELECT m.id, m.match_score, m.matched_skills, m.status, m.founder_id, m.created_at,
           c.id AS candidate_id, c.name AS candidate_name, c.summary AS candidate_summary,
           c.skills AS candidate_skills, c.location AS candidate_location,
           c.expected_salary AS candidate_expected_salary,
           r.id AS role_id, r.title AS role_title, r.description AS role_description
    FROM matches m
    JOIN candidates c ON c.id = m.candidate_id
    JOIN roles r ON r.id = m.role_id
"#;

/// PostgreSQL-backed store for roles, matches, vibe checks, trials and offers
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }
}

fn match_details_from_row(row: &PgRow) -> Result<MatchWithDetails, sqlx::Error> {
    Ok(MatchWithDetails {
        id: row.try_get("id")?,
        match_score: row.try_get("match_score")?,
        matched_skills: row.try_get("matched_skills")?,
        status: row.try_get("status")?,
        founder_id: row.try_get("founder_id")?,
        created_at: row.try_get("created_at")?,
        candidate: MatchCandidate {
            id: row.try_get("candidate_id")?,
            name: row.try_get("candidate_name")?,
            summary: row.try_get("candidate_summary")?,
            skills: row.try_get("candidate_skills")?,
            location: row.try_get("candidate_location")?,
            expected_salary: row.try_get("candidate_expected_salary")?,
        },
        role: MatchRole {
            id: row.try_get("role_id")?,
            title: row.try_get("role_title")?,
            description: row.try_get("role_description")?,
        },
    })
}

#[async_trait]
impl Store for PostgresClient {
    async fn upsert_user(&self, user: &User) -> Result<(), StoreError> {
        let query = r#"
            INSERT INTO users (id, email, name)
            VALUES ($1, $2, $3)
            ON CONFLICT (id)
            DO UPDATE SET
                email = COALESCE(EXCLUDED.email, users.email),
                name = COALESCE(EXCLUDED.name, users.name)
        "#;

        sqlx::query(query)
            .bind(&user.id)
            .bind(&user.email)
            .bind(&user.name)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn create_role(&self, role: NewRole) -> Result<Role, StoreError> {
        let query = r#"
            INSERT INTO roles (id, founder_id, title, description, skills_required, working_style,
                               time_zone, culture_fit, urgency, salary_min, salary_max,
                               equity_min, equity_max)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
        "#;

        let created = sqlx::query_as::<_, Role>(query)
            .bind(Uuid::new_v4().to_string())
            .bind(&role.founder_id)
            .bind(&role.title)
            .bind(&role.description)
            .bind(&role.skills_required)
            .bind(role.working_style)
            .bind(&role.time_zone)
            .bind(&role.culture_fit)
            .bind(role.urgency)
            .bind(role.salary_min)
            .bind(role.salary_max)
            .bind(role.equity_min)
            .bind(role.equity_max)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!("Created role {} for founder {}", created.id, created.founder_id);

        Ok(created)
    }

    async fn find_role(&self, role_id: &str) -> Result<Option<Role>, StoreError> {
        let role = sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE id = $1")
            .bind(role_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(role)
    }

    async fn list_matches(
        &self,
        role_id: &str,
        founder_id: Option<&str>,
    ) -> Result<Vec<MatchWithDetails>, StoreError> {
        let query = format!(
            "{} WHERE m.role_id = $1 AND ($2::TEXT IS NULL OR m.founder_id = $2) \
             ORDER BY m.match_score DESC, m.rank ASC",
            MATCH_DETAILS_SELECT
        );

        let rows = sqlx::query(&query)
            .bind(role_id)
            .bind(founder_id)
            .fetch_all(&self.pool)
            .await?;

        let matches = rows
            .iter()
            .map(match_details_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Role {} has {} matches", role_id, matches.len());

        Ok(matches)
    }

    async fn save_matches(
        &self,
        role: &Role,
        scored: &[ScoredCandidate],
    ) -> Result<Vec<MatchWithDetails>, StoreError> {
        let upsert_candidate = r#"
            INSERT INTO candidates (id, name, email, summary, skills, experience, location,
                                    time_zone, portfolio_url, linkedin_url, github_url,
                                    availability, expected_salary)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (id) DO NOTHING
        "#;

        let insert_match = r#"
            INSERT INTO matches (id, role_id, candidate_id, founder_id, match_score,
                                 matched_skills, rank, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (role_id, candidate_id) DO NOTHING
        "#;

        let mut tx = self.pool.begin().await?;

        // Row lock on the role serializes concurrent generations for it
        sqlx::query("SELECT 1 FROM roles WHERE id = $1 FOR UPDATE")
            .bind(&role.id)
            .execute(&mut *tx)
            .await?;

        let already_matched: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM matches WHERE role_id = $1)")
                .bind(&role.id)
                .fetch_one(&mut *tx)
                .await?;

        if already_matched {
            tx.rollback().await?;
            tracing::info!("Role {} was matched concurrently, keeping existing matches", role.id);
            return self.list_matches(&role.id, None).await;
        }

        for (rank, entry) in scored.iter().enumerate() {
            let c = &entry.candidate;
            sqlx::query(upsert_candidate)
                .bind(&c.id)
                .bind(&c.name)
                .bind(&c.email)
                .bind(&c.summary)
                .bind(&c.skills)
                .bind(&c.experience)
                .bind(&c.location)
                .bind(&c.time_zone)
                .bind(&c.portfolio_url)
                .bind(&c.linkedin_url)
                .bind(&c.github_url)
                .bind(c.availability)
                .bind(c.expected_salary)
                .execute(&mut *tx)
                .await?;

            sqlx::query(insert_match)
                .bind(Uuid::new_v4().to_string())
                .bind(&role.id)
                .bind(&entry.result.candidate_id)
                .bind(&role.founder_id)
                .bind(entry.result.score)
                .bind(&entry.result.matched_skills)
                .bind(rank as i32)
                .bind(MatchStatus::Pending)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::info!("Saved {} matches for role {}", scored.len(), role.id);

        self.list_matches(&role.id, None).await
    }

    async fn find_match(&self, match_id: &str) -> Result<Option<Match>, StoreError> {
        let found = sqlx::query_as::<_, Match>(
            "SELECT id, role_id, candidate_id, founder_id, match_score, matched_skills, status, created_at \
             FROM matches WHERE id = $1",
        )
        .bind(match_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(found)
    }

    async fn update_match_status(&self, match_id: &str, status: MatchStatus) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE matches SET status = $2 WHERE id = $1")
            .bind(match_id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("match {}", match_id)));
        }

        tracing::debug!("Match {} moved to {:?}", match_id, status);

        Ok(())
    }

    async fn submit_vibe_check(
        &self,
        matched: &Match,
        video_url: Option<String>,
        responses: HashMap<String, String>,
    ) -> Result<VibeCheck, StoreError> {
        let mut tx = self.pool.begin().await?;

        let vibe_check = sqlx::query_as::<_, VibeCheck>(
            r#"
            INSERT INTO vibe_checks (id, match_id, candidate_id, video_url, responses, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&matched.id)
        .bind(&matched.candidate_id)
        .bind(video_url)
        .bind(Json(&responses))
        .bind(VibeCheckStatus::Completed)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE matches SET status = $2 WHERE id = $1")
            .bind(&matched.id)
            .bind(MatchStatus::VibeCheckCompleted)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(vibe_check)
    }

    async fn find_vibe_check(&self, match_id: &str) -> Result<Option<VibeCheck>, StoreError> {
        let found = sqlx::query_as::<_, VibeCheck>(
            "SELECT * FROM vibe_checks WHERE match_id = $1 ORDER BY created_at DESC LIMIT 1",
        )
        .bind(match_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(found)
    }

    async fn create_trial(&self, trial: NewTrial) -> Result<Trial, StoreError> {
        let query = r#"
            INSERT INTO trials (id, match_id, candidate_id, founder_id, title, description,
                                requirements, deliverables, timeline, fee, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
        "#;

        let created = sqlx::query_as::<_, Trial>(query)
            .bind(Uuid::new_v4().to_string())
            .bind(&trial.match_id)
            .bind(&trial.candidate_id)
            .bind(&trial.founder_id)
            .bind(&trial.title)
            .bind(&trial.description)
            .bind(&trial.requirements)
            .bind(&trial.deliverables)
            .bind(&trial.timeline)
            .bind(trial.fee)
            .bind(TrialStatus::PendingPayment)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn attach_checkout_session(&self, trial_id: &str, session_id: &str) -> Result<(), StoreError> {
        sqlx::query("UPDATE trials SET stripe_session_id = $2 WHERE id = $1")
            .bind(trial_id)
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_trial(&self, trial_id: &str) -> Result<Option<TrialDetails>, StoreError> {
        let query = r#"
            SELECT t.*, c.name AS candidate_name, c.email AS candidate_email, u.name AS founder_name
            FROM trials t
            JOIN candidates c ON c.id = t.candidate_id
            LEFT JOIN users u ON u.id = t.founder_id
            WHERE t.id = $1
        "#;

        let Some(row) = sqlx::query(query)
            .bind(trial_id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        Ok(Some(TrialDetails {
            trial: Trial::from_row(&row)?,
            candidate_name: row.try_get("candidate_name")?,
            candidate_email: row.try_get("candidate_email")?,
            founder_name: row.try_get("founder_name")?,
        }))
    }

    async fn mark_trial_paid(
        &self,
        trial_id: &str,
        payment_intent_id: Option<&str>,
    ) -> Result<Option<Trial>, StoreError> {
        let query = r#"
            UPDATE trials
            SET status = $2,
                stripe_payment_intent_id = COALESCE($3, stripe_payment_intent_id)
            WHERE id = $1 AND status <> $4
            RETURNING *
        "#;

        let updated = sqlx::query_as::<_, Trial>(query)
            .bind(trial_id)
            .bind(TrialStatus::Active)
            .bind(payment_intent_id)
            .bind(TrialStatus::Completed)
            .fetch_optional(&self.pool)
            .await?;

        Ok(updated)
    }

    async fn mark_payment_failed(
        &self,
        trial_id: Option<&str>,
        payment_intent_id: &str,
    ) -> Result<Option<String>, StoreError> {
        let query = r#"
            UPDATE trials
            SET status = $3,
                stripe_payment_intent_id = COALESCE(stripe_payment_intent_id, $2)
            WHERE (id = $1 OR stripe_payment_intent_id = $2)
              AND status IN ($4, $3)
            RETURNING id
        "#;

        let row = sqlx::query(query)
            .bind(trial_id)
            .bind(payment_intent_id)
            .bind(TrialStatus::PaymentFailed)
            .bind(TrialStatus::PendingPayment)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.try_get::<String, _>("id"))
            .transpose()
            .map_err(Into::into)
    }

    async fn send_offer(&self, offer: NewOffer) -> Result<Offer, StoreError> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Offer>(
            r#"
            INSERT INTO offers (id, trial_id, match_id, founder_id, title, offer_type, salary,
                                hourly_rate, equity, vesting_schedule, benefits,
                                responsibilities, start_date, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&offer.trial_id)
        .bind(&offer.match_id)
        .bind(&offer.founder_id)
        .bind(&offer.title)
        .bind(offer.offer_type)
        .bind(offer.salary)
        .bind(offer.hourly_rate)
        .bind(offer.equity)
        .bind(&offer.vesting_schedule)
        .bind(&offer.benefits)
        .bind(&offer.responsibilities)
        .bind(offer.start_date)
        .bind(OfferStatus::Sent)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE trials SET status = $2 WHERE id = $1")
            .bind(&offer.trial_id)
            .bind(TrialStatus::Completed)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE matches SET status = $2 WHERE id = $1")
            .bind(&offer.match_id)
            .bind(MatchStatus::OfferSent)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
