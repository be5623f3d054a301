// Route exports
pub mod catalog;
pub mod health;
pub mod intake;
pub mod matches;
pub mod offer;
pub mod trial;
pub mod vibe_check;
pub mod webhooks;

use crate::auth::AuthConfig;
use crate::core::Matcher;
use crate::error::{handle_json_payload_error, handle_query_payload_error};
use crate::services::{CacheManager, Catalog, Store, StripeClient};
use actix_web::web;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub cache: Arc<CacheManager>,
    pub payments: Arc<StripeClient>,
    pub catalog: Arc<Catalog>,
    pub matcher: Matcher,
    /// Number of candidates kept per role
    pub top_k: usize,
    pub webhook_secret: String,
    pub webhook_tolerance_secs: i64,
}

/// Register shared state, extractor configuration and all routes
pub fn configure_app(
    state: AppState,
    auth: AuthConfig,
) -> impl Fn(&mut web::ServiceConfig) + Clone + Send + 'static {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(auth.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .configure(configure_routes);
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(health::configure)
            .configure(intake::configure)
            .configure(matches::configure)
            .configure(vibe_check::configure)
            .configure(trial::configure)
            .configure(offer::configure)
            .configure(catalog::configure)
            .configure(webhooks::configure),
    );
}
