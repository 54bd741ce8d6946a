// src/lib.rs

// Re-export or define the top-level modules you need
pub mod services;
pub mod models;
pub mod handlers;
pub mod routes;

use services::filings::CikStore;
use services::fred::FredClient;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared per-process state handed to every route handler.
pub struct AppState {
    pub fred: FredClient,
    pub http: reqwest::Client,
    pub filings: CikStore,
}
