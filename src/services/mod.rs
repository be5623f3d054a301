// Service exports
pub mod cache;
pub mod catalog;
pub mod postgres;
pub mod store;
pub mod stripe;

pub use cache::{CacheError, CacheKey, CacheManager, CacheStats};
pub use catalog::{Catalog, CatalogError};
pub use postgres::PostgresClient;
pub use store::{NewOffer, NewRole, NewTrial, ScoredCandidate, Store, StoreError};
pub use stripe::{
    compute_signature, parse_event, verify_signature, CheckoutSession, CheckoutSessionRequest,
    PaymentError, StripeClient, WebhookError, WebhookEvent,
};
