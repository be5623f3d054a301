use crate::models::{BenchmarkQuery, CandidateProfile, CompensationBenchmark, TrialTemplate};
use std::path::Path;
use thiserror::Error;

const SEED_CANDIDATES: &str = include_str!("../../data/candidates.json");
const SEED_BENCHMARKS: &str = include_str!("../../data/benchmarks.json");
const SEED_TRIAL_TEMPLATES: &str = include_str!("../../data/trial_templates.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Static reference data: the candidate pool, compensation benchmarks and
/// trial project templates
#[derive(Debug, Clone)]
pub struct Catalog {
    candidates: Vec<CandidateProfile>,
    benchmarks: Vec<CompensationBenchmark>,
    trial_templates: Vec<TrialTemplate>,
}

impl Catalog {
    /// Load the bundled seed data, optionally replacing the candidate pool with
    /// the contents of a JSON file
    pub fn load(candidate_pool_path: Option<&Path>) -> Result<Self, CatalogError> {
        let candidates = match candidate_pool_path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
                    path: path.display().to_string(),
                    source,
                })?;
                serde_json::from_str(&raw)?
            }
            None => serde_json::from_str(SEED_CANDIDATES)?,
        };

        let catalog = Self {
            candidates,
            benchmarks: serde_json::from_str(SEED_BENCHMARKS)?,
            trial_templates: serde_json::from_str(SEED_TRIAL_TEMPLATES)?,
        };

        tracing::info!(
            "Catalog loaded: {} candidates, {} benchmarks, {} trial templates",
            catalog.candidates.len(),
            catalog.benchmarks.len(),
            catalog.trial_templates.len()
        );

        Ok(catalog)
    }

    /// Bundled seed data only
    pub fn seeded() -> Result<Self, CatalogError> {
        Self::load(None)
    }

    pub fn with_candidates(mut self, candidates: Vec<CandidateProfile>) -> Self {
        self.candidates = candidates;
        self
    }

    pub fn candidates(&self) -> &[CandidateProfile] {
        &self.candidates
    }

    pub fn trial_templates(&self) -> &[TrialTemplate] {
        &self.trial_templates
    }

    /// Benchmarks matching every provided filter exactly
    pub fn filter_benchmarks(&self, query: &BenchmarkQuery) -> Vec<CompensationBenchmark> {
        let matches = |filter: &Option<String>, value: &str| {
            filter.as_deref().map_or(true, |f| f.is_empty() || f == value)
        };

        self.benchmarks
            .iter()
            .filter(|b| {
                matches(&query.role, &b.role)
                    && matches(&query.level, &b.level)
                    && matches(&query.location, &b.location)
                    && matches(&query.company_stage, &b.company_stage)
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_data_parses() {
        let catalog = Catalog::seeded().unwrap();
        assert_eq!(catalog.candidates().len(), 5);
        assert_eq!(catalog.trial_templates().len(), 4);
        assert!(catalog
            .candidates()
            .iter()
            .all(|c| !c.skills.is_empty() && c.expected_salary.is_some()));
    }

    #[test]
    fn test_filter_benchmarks() {
        let catalog = Catalog::seeded().unwrap();

        let all = catalog.filter_benchmarks(&BenchmarkQuery::default());
        assert_eq!(all.len(), 14);

        let query = BenchmarkQuery {
            role: Some("Software Engineer".to_string()),
            level: Some("Senior".to_string()),
            location: Some("San Francisco".to_string()),
            company_stage: None,
        };
        let senior = catalog.filter_benchmarks(&query);
        assert_eq!(senior.len(), 2);
        assert!(senior.iter().all(|b| b.level == "Senior"));

        let none = catalog.filter_benchmarks(&BenchmarkQuery {
            role: Some("software engineer".to_string()),
            ..Default::default()
        });
        assert!(none.is_empty());
    }

    #[test]
    fn test_missing_pool_file() {
        let result = Catalog::load(Some(Path::new("/nonexistent/pool.json")));
        assert!(matches!(result, Err(CatalogError::Io { .. })));
    }
}
