//! Bistro, a restaurant-ordering backend.
//!
//! Exposed as a library so integration tests in `tests/` can build the
//! full router against an in-process store and a mock payment provider.

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod jobs;
pub mod models;
pub mod payments;
pub mod stats;
pub mod store;

use auth::token::TokenService;
use payments::provider::StripeClient;
use store::MemStore;

/// Shared application state passed to handlers and middleware.
pub struct AppState {
    pub store: MemStore,
    pub tokens: TokenService,
    pub provider: StripeClient,
    pub config: config::Config,
}
