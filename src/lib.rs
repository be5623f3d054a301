//! WarmTrial - hiring pipeline service
//!
//! Founders describe a role, get a ranked shortlist of candidates, collect an
//! async vibe check, pay for a trial project and send an offer letter. The
//! ranking lives in [`core`]; everything else is the HTTP service around it.

pub mod auth;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod offer;
pub mod routes;
pub mod services;
pub mod telemetry;

// Re-export commonly used types
pub use crate::core::{skill_matches, FixedNoise, MatchError, Matcher, NoiseSource};
pub use models::{CandidateProfile, MatchResult, Requisition, ScoringWeights};
pub use routes::{configure_app, AppState};
