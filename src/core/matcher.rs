use crate::core::noise::{FixedNoise, SharedNoise, ThreadRngNoise};
use crate::core::scoring::calculate_match_score;
use crate::models::{CandidateProfile, MatchResult, Requisition, ScoringWeights};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while ranking candidates
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No candidates to rank. Callers usually render this as "no matches".
    #[error("Candidate pool is empty")]
    EmptyPool,
}

/// Scores a candidate pool against a requisition and keeps the best `k`
///
/// # Pipeline Stages
/// 1. Validate the requisition
/// 2. Score every candidate (skill overlap, exploration noise, salary alignment)
/// 3. Stable sort by score, descending
/// 4. Truncate to `k`
#[derive(Clone)]
pub struct Matcher {
    weights: ScoringWeights,
    noise: SharedNoise,
}

impl Matcher {
    pub fn new(weights: ScoringWeights, noise: SharedNoise) -> Self {
        Self { weights, noise }
    }

    /// Default weights with a thread-local RNG for exploration noise
    pub fn with_default_weights() -> Self {
        Self::new(ScoringWeights::default(), Arc::new(ThreadRngNoise))
    }

    /// Default weights with noise pinned to a constant
    pub fn deterministic(noise: f64) -> Self {
        Self::new(ScoringWeights::default(), Arc::new(FixedNoise::new(noise)))
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score a single candidate
    pub fn score(
        &self,
        requisition: &Requisition,
        candidate: &CandidateProfile,
    ) -> Result<MatchResult, MatchError> {
        validate_requisition(requisition)?;
        Ok(self.score_unchecked(requisition, candidate))
    }

    /// Rank the candidate pool for a requisition
    ///
    /// Returns `min(k, pool.len())` results in descending score order. Candidates
    /// with equal scores keep their pool order.
    ///
    /// # Errors
    /// * `InvalidInput` if the requisition has no required skills
    /// * `EmptyPool` if there are no candidates
    pub fn rank(
        &self,
        requisition: &Requisition,
        candidates: &[CandidateProfile],
        k: usize,
    ) -> Result<Vec<MatchResult>, MatchError> {
        validate_requisition(requisition)?;

        if candidates.is_empty() {
            return Err(MatchError::EmptyPool);
        }

        let mut results: Vec<MatchResult> = candidates
            .iter()
            .map(|candidate| self.score_unchecked(requisition, candidate))
            .collect();

        // sort_by is stable, so ties keep pool order
        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        results.truncate(k);

        tracing::debug!(
            "Ranked {} candidates for '{}', kept {}",
            candidates.len(),
            requisition.title,
            results.len()
        );

        Ok(results)
    }

    fn score_unchecked(&self, requisition: &Requisition, candidate: &CandidateProfile) -> MatchResult {
        let noise = self.noise.next();
        let (score, matched_skills) =
            calculate_match_score(requisition, candidate, &self.weights, noise);

        MatchResult {
            candidate_id: candidate.id.clone(),
            score,
            matched_skills,
        }
    }
}

fn validate_requisition(requisition: &Requisition) -> Result<(), MatchError> {
    if requisition.required_skills.is_empty() {
        return Err(MatchError::InvalidInput(
            "requisition must list at least one required skill".to_string(),
        ));
    }
    Ok(())
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("weights", &self.weights)
            .finish_non_exhaustive()
    }
}
