// src/handlers/quotes.rs
use std::sync::Arc;

use chrono::Utc;
use log::info;
use serde::Deserialize;
use serde_json::json;
use warp::reply::Json;
use warp::Rejection;

use crate::handlers::error::ApiError;
use crate::services::quotes;
use crate::AppState;

const DEFAULT_SYMBOLS: &str = "AAPL,GOOGL,MSFT,TSLA,NVDA";

#[derive(Debug, Deserialize)]
pub struct QuoteQuery {
    symbols: Option<String>,
}

pub async fn get_quotes(query: QuoteQuery, state: Arc<AppState>) -> Result<Json, Rejection> {
    let symbols: Vec<String> = query
        .symbols
        .as_deref()
        .unwrap_or(DEFAULT_SYMBOLS)
        .split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect();

    if symbols.is_empty() {
        return Err(warp::reject::custom(ApiError::invalid_input(
            "symbols must contain at least one ticker",
        )));
    }

    info!("Handling quote request for {} symbols", symbols.len());
    let batch = quotes::fetch_quotes(&state.http, &symbols).await;
    info!(
        "Quote fan-out finished: {} succeeded, {} failed",
        batch.total_successful,
        batch.failed.len()
    );

    Ok(warp::reply::json(&json!({
        "success": true,
        "data": batch.quotes,
        "failed": batch.failed,
        "totalRequested": batch.total_requested,
        "totalSuccessful": batch.total_successful,
        "timestamp": Utc::now(),
    })))
}
