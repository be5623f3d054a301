// Core algorithm exports
pub mod matcher;
pub mod noise;
pub mod scoring;
pub mod skills;

pub use matcher::{MatchError, Matcher};
pub use noise::{FixedNoise, NoiseSource, SequenceNoise, SharedNoise, ThreadRngNoise};
pub use scoring::{calculate_match_score, calculate_salary_score};
pub use skills::{skill_matches, skill_overlap};
