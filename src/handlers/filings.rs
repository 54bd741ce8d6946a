// src/handlers/filings.rs
use std::sync::Arc;

use log::{error, info};
use serde_json::json;
use warp::reply::Json;
use warp::Rejection;

use crate::handlers::error::ApiError;
use crate::AppState;

pub async fn get_filings(symbol: String, state: Arc<AppState>) -> Result<Json, Rejection> {
    info!("Handling filings request for {}", symbol);

    match state.filings.recent_filings(&symbol).await {
        Ok(Some(filings)) => Ok(warp::reply::json(&json!({
            "success": true,
            "symbol": symbol.to_uppercase(),
            "data": filings,
        }))),
        Ok(None) => Err(warp::reject::custom(ApiError::invalid_input(format!(
            "no CIK mapping for symbol {}",
            symbol
        )))),
        Err(e) => {
            error!("Failed to fetch filings for {}: {:#}", symbol, e);
            Err(warp::reject::custom(ApiError::upstream(e.to_string())))
        }
    }
}
