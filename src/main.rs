use actix_cors::Cors;
use actix_web::{middleware, App, HttpServer};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use warmtrial::auth::AuthConfig;
use warmtrial::config::Settings;
use warmtrial::core::{FixedNoise, Matcher, SharedNoise, ThreadRngNoise};
use warmtrial::routes::{configure_app, AppState};
use warmtrial::services::{CacheManager, Catalog, PostgresClient, StripeClient};

fn startup_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", context, err);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    warmtrial::telemetry::init(&settings.logging).map_err(|e| {
        eprintln!("Failed to initialize logging: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    info!("Starting WarmTrial service...");

    // Cache: Redis is optional, fall back to in-process only
    let cache_ttl = settings.cache.ttl_secs.unwrap_or(300);
    let l1_cache_size = settings.cache.l1_cache_size.unwrap_or(1000);

    let cache = match settings.cache.redis_url.as_deref() {
        Some(url) => match CacheManager::new(url, l1_cache_size, cache_ttl).await {
            Ok(c) => {
                info!("Cache manager initialized (L1: {} entries, TTL: {}s, Redis enabled)", l1_cache_size, cache_ttl);
                c
            }
            Err(e) => {
                warn!("Failed to connect to Redis ({}), running with in-process cache only", e);
                CacheManager::in_memory(l1_cache_size, cache_ttl)
            }
        },
        None => {
            info!("No Redis URL configured, running with in-process cache only");
            CacheManager::in_memory(l1_cache_size, cache_ttl)
        }
    };

    let db_max_conn = settings.database.max_connections.unwrap_or(10);
    let postgres = PostgresClient::from_settings(
        &settings.database.url,
        Some(db_max_conn),
        settings.database.min_connections,
        settings.database.acquire_timeout_secs,
        settings.database.idle_timeout_secs,
    )
    .await
    .map_err(|e| startup_error("PostgreSQL connection error", e))?;

    info!("PostgreSQL client initialized (max: {} connections)", db_max_conn);

    let payments = StripeClient::new(
        settings.payments.api_base.clone(),
        settings.payments.secret_key.clone(),
        settings.payments.app_url.clone(),
        Duration::from_secs(settings.payments.request_timeout_secs),
    )
    .map_err(|e| startup_error("Failed to build payment client", e))?;

    let catalog = Catalog::load(settings.matching.candidate_pool_path.as_deref())
        .map_err(|e| startup_error("Failed to load catalog", e))?;

    let weights = settings.scoring_weights();
    let noise: SharedNoise = match settings.matching.deterministic_noise {
        Some(value) => {
            info!("Deterministic matching enabled (noise pinned to {})", value);
            Arc::new(FixedNoise::new(value))
        }
        None => Arc::new(ThreadRngNoise),
    };
    let matcher = Matcher::new(weights, noise);

    info!("Matcher initialized with weights: {:?}", weights);

    let app_state = AppState {
        store: Arc::new(postgres),
        cache: Arc::new(cache),
        payments: Arc::new(payments),
        catalog: Arc::new(catalog),
        matcher,
        top_k: settings.matching.top_k,
        webhook_secret: settings.payments.webhook_secret.clone(),
        webhook_tolerance_secs: settings.payments.webhook_tolerance_secs,
    };
    let auth = AuthConfig {
        jwt_secret: settings.auth.jwt_secret.clone(),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    let app_config = configure_app(app_state, auth);

    HttpServer::new(move || {
        App::new()
            .configure(app_config.clone())
            .wrap(Cors::permissive())
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
