use crate::core::skills::skill_overlap;
use crate::models::{CandidateProfile, Requisition, ScoringWeights};

/// Calculate a match score (0-1) for a candidate against a requisition
///
/// Scoring formula:
/// ```text
/// skill_score  = matched_required / max(required, candidate_skills, 1)
/// ai_score     = noise * exploration + skill_score * skill     # 0.3 / 0.7
/// salary_score = 1.0 in band, 0.8 up to 110% of max, else 0.5
/// final        = min(1, ai_score * quality + salary_score * salary)  # 0.7 / 0.3
/// ```
///
/// `noise` is a draw in `[0, 1)`; callers take it from a `NoiseSource`.
/// Returns the score and the required skills the candidate covers.
pub fn calculate_match_score(
    requisition: &Requisition,
    candidate: &CandidateProfile,
    weights: &ScoringWeights,
    noise: f64,
) -> (f64, Vec<String>) {
    let (skill_score, matched_skills) =
        skill_overlap(&requisition.required_skills, &candidate.skills);

    // Exploration term stands in for a semantic similarity score
    let ai_score = noise * weights.exploration + skill_score * weights.skill;

    let salary_score = calculate_salary_score(
        candidate.expected_salary,
        requisition.salary_min,
        requisition.salary_max,
        weights,
    );

    let total = ai_score * weights.quality + salary_score * weights.salary;

    (total.min(1.0).max(0.0), matched_skills)
}

/// Calculate salary alignment (0-1)
///
/// Needs both ends of the band and an expected salary, otherwise neutral.
/// Candidates far outside the band are neutral too, not penalized further.
#[inline]
pub fn calculate_salary_score(
    expected: Option<i64>,
    salary_min: Option<i64>,
    salary_max: Option<i64>,
    weights: &ScoringWeights,
) -> f64 {
    let (Some(expected), Some(min), Some(max)) = (expected, salary_min, salary_max) else {
        return weights.neutral_salary_score;
    };

    if expected >= min && expected <= max {
        1.0
    } else if (expected as f64) <= max as f64 * weights.salary_tolerance {
        weights.near_band_score
    } else {
        weights.neutral_salary_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Availability;

    fn create_requisition(skills: &[&str], min: Option<i64>, max: Option<i64>) -> Requisition {
        Requisition {
            title: "Engineer".to_string(),
            description: "Build things".to_string(),
            required_skills: skills.iter().map(|s| s.to_string()).collect(),
            salary_min: min,
            salary_max: max,
        }
    }

    fn create_candidate(skills: &[&str], expected_salary: Option<i64>) -> CandidateProfile {
        CandidateProfile {
            id: "candidate-1".to_string(),
            name: "Test Candidate".to_string(),
            email: "test@example.com".to_string(),
            summary: String::new(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            experience: String::new(),
            location: "Remote".to_string(),
            time_zone: "UTC".to_string(),
            portfolio_url: None,
            linkedin_url: None,
            github_url: None,
            availability: Availability::FullTime,
            expected_salary,
        }
    }

    #[test]
    fn test_reference_scenario() {
        let req = create_requisition(&["React", "Node.js"], Some(100_000), Some(150_000));
        let cand = create_candidate(&["react", "node"], Some(120_000));

        let (score, matched) = calculate_match_score(&req, &cand, &ScoringWeights::default(), 0.0);

        assert!((score - 0.79).abs() < 1e-9, "got {}", score);
        assert_eq!(matched.len(), 2);
    }

    #[test]
    fn test_empty_candidate_skills() {
        let req = create_requisition(&["React"], None, None);
        let cand = create_candidate(&[], None);

        let (score, matched) = calculate_match_score(&req, &cand, &ScoringWeights::default(), 0.0);

        // Only the neutral salary term contributes: 0.3 * 0.5
        assert!((score - 0.15).abs() < 1e-9);
        assert!(matched.is_empty());
    }

    #[test]
    fn test_score_clamped_at_one() {
        let weights = ScoringWeights {
            quality: 2.0,
            ..ScoringWeights::default()
        };
        let req = create_requisition(&["Rust"], Some(1), Some(10));
        let cand = create_candidate(&["rust"], Some(5));

        let (score, _) = calculate_match_score(&req, &cand, &weights, 0.99);
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_noise_raises_score() {
        let req = create_requisition(&["Rust"], None, None);
        let cand = create_candidate(&["Go"], None);
        let weights = ScoringWeights::default();

        let (quiet, _) = calculate_match_score(&req, &cand, &weights, 0.0);
        let (noisy, _) = calculate_match_score(&req, &cand, &weights, 0.5);

        // 0.5 * 0.3 * 0.7
        assert!((noisy - quiet - 0.105).abs() < 1e-9);
    }

    #[test]
    fn test_salary_score_bands() {
        let w = ScoringWeights::default();
        assert_eq!(calculate_salary_score(Some(120), Some(100), Some(150), &w), 1.0);
        assert_eq!(calculate_salary_score(Some(100), Some(100), Some(150), &w), 1.0);
        assert_eq!(calculate_salary_score(Some(150), Some(100), Some(150), &w), 1.0);
        assert_eq!(calculate_salary_score(Some(160), Some(100), Some(150), &w), 0.8);
        assert_eq!(calculate_salary_score(Some(165), Some(100), Some(150), &w), 0.8);
        assert_eq!(calculate_salary_score(Some(200), Some(100), Some(150), &w), 0.5);
    }

    #[test]
    fn test_salary_below_band_is_near() {
        // Under the minimum still satisfies expected <= max * 1.1
        let w = ScoringWeights::default();
        assert_eq!(calculate_salary_score(Some(50), Some(100), Some(150), &w), 0.8);
    }

    #[test]
    fn test_salary_incomplete_is_neutral() {
        let w = ScoringWeights::default();
        assert_eq!(calculate_salary_score(None, Some(100), Some(150), &w), 0.5);
        assert_eq!(calculate_salary_score(Some(120), None, Some(150), &w), 0.5);
        assert_eq!(calculate_salary_score(Some(120), Some(100), None, &w), 0.5);
    }
}
