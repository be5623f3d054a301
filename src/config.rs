use crate::models::ScoringWeights;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    pub payments: PaymentSettings,
    pub auth: AuthSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSettings {
    /// Without a Redis URL the cache runs in-process only
    pub redis_url: Option<String>,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// JSON file replacing the bundled candidate pool
    pub candidate_pool_path: Option<PathBuf>,
    /// Pin exploration noise to a constant for reproducible rankings
    pub deterministic_noise: Option<f64>,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            candidate_pool_path: None,
            deterministic_noise: None,
        }
    }
}

fn default_top_k() -> usize { 5 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_skill_weight")]
    pub skill: f64,
    #[serde(default = "default_exploration_weight")]
    pub exploration: f64,
    #[serde(default = "default_quality_weight")]
    pub quality: f64,
    #[serde(default = "default_salary_weight")]
    pub salary: f64,
    #[serde(default = "default_salary_tolerance")]
    pub salary_tolerance: f64,
    #[serde(default = "default_near_band_score")]
    pub near_band_score: f64,
    #[serde(default = "default_neutral_salary_score")]
    pub neutral_salary_score: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            skill: default_skill_weight(),
            exploration: default_exploration_weight(),
            quality: default_quality_weight(),
            salary: default_salary_weight(),
            salary_tolerance: default_salary_tolerance(),
            near_band_score: default_near_band_score(),
            neutral_salary_score: default_neutral_salary_score(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(w: &WeightsConfig) -> Self {
        ScoringWeights {
            skill: w.skill,
            exploration: w.exploration,
            quality: w.quality,
            salary: w.salary,
            salary_tolerance: w.salary_tolerance,
            near_band_score: w.near_band_score,
            neutral_salary_score: w.neutral_salary_score,
        }
    }
}

fn default_skill_weight() -> f64 { 0.7 }
fn default_exploration_weight() -> f64 { 0.3 }
fn default_quality_weight() -> f64 { 0.7 }
fn default_salary_weight() -> f64 { 0.3 }
fn default_salary_tolerance() -> f64 { 1.1 }
fn default_near_band_score() -> f64 { 0.8 }
fn default_neutral_salary_score() -> f64 { 0.5 }

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentSettings {
    #[serde(default = "default_stripe_api_base")]
    pub api_base: String,
    pub secret_key: String,
    pub webhook_secret: String,
    /// Public URL of the web app, used for checkout redirects
    pub app_url: String,
    #[serde(default = "default_webhook_tolerance")]
    pub webhook_tolerance_secs: i64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_stripe_api_base() -> String { "https://api.stripe.com".to_string() }
fn default_webhook_tolerance() -> i64 { 300 }
fn default_request_timeout() -> u64 { 10 }

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with WARMTRIAL__)
    /// 5. Well-known variables such as DATABASE_URL and STRIPE_SECRET_KEY
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., WARMTRIAL__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("WARMTRIAL")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Self::from_config(apply_env_overrides(settings)?)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("WARMTRIAL")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Self::from_config(settings)
    }

    /// Deserialize and reject unusable secrets
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let settings: Self = config.try_deserialize()?;
        settings.validate_secrets()?;
        Ok(settings)
    }

    /// Signing secrets must be set and must not be a known placeholder
    fn validate_secrets(&self) -> Result<(), ConfigError> {
        let secrets = [
            ("auth.jwt_secret", "JWT_SECRET", &self.auth.jwt_secret),
            ("payments.webhook_secret", "STRIPE_WEBHOOK_SECRET", &self.payments.webhook_secret),
        ];

        for (key, var, value) in secrets {
            let value = value.trim();
            if value.is_empty() || PLACEHOLDER_SECRETS.contains(&value) {
                return Err(ConfigError::Message(format!(
                    "{} is not configured; set {} or WARMTRIAL__{}",
                    key,
                    var,
                    key.replace('.', "__").to_uppercase()
                )));
            }
        }

        Ok(())
    }

    pub fn scoring_weights(&self) -> ScoringWeights {
        ScoringWeights::from(&self.scoring.weights)
    }
}

/// Values that have shipped in sample configs and must never reach production
const PLACEHOLDER_SECRETS: &[&str] = &[
    "replace-me-in-production",
    "whsec_replace_me",
    "changeme",
    "secret",
];

/// Variables shared with other tooling take precedence over the config files
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("DATABASE_URL", "database.url"),
    ("REDIS_URL", "cache.redis_url"),
    ("STRIPE_SECRET_KEY", "payments.secret_key"),
    ("STRIPE_WEBHOOK_SECRET", "payments.webhook_secret"),
    ("APP_URL", "payments.app_url"),
    ("JWT_SECRET", "auth.jwt_secret"),
];

fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    let mut builder = Config::builder().add_source(settings);

    for (var, key) in ENV_OVERRIDES {
        if let Ok(value) = std::env::var(var) {
            if !value.is_empty() {
                builder = builder.set_override(*key, value)?;
            }
        }
    }

    builder.build()
}
