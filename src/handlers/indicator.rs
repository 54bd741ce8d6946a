// src/handlers/indicator.rs
use std::sync::Arc;

use chrono::Utc;
use log::{info, warn};
use serde_json::json;
use warp::reply::Json;
use warp::Rejection;

use crate::handlers::error::ApiError;
use crate::services::indicator;
use crate::AppState;

pub async fn get_buffett_indicator(state: Arc<AppState>) -> Result<Json, Rejection> {
    info!("Handling request for the Buffett indicator summary");

    let history = indicator::buffett_history(&state.fred).await;
    match history.summary {
        Some(summary) => Ok(warp::reply::json(&json!({
            "success": true,
            "data": summary,
        }))),
        None => {
            warn!("Buffett indicator summary unavailable");
            Err(warp::reject::custom(ApiError::upstream(
                "Buffett indicator data is currently unavailable",
            )))
        }
    }
}

pub async fn get_buffett_history(state: Arc<AppState>) -> Result<Json, Rejection> {
    info!("Handling request for the Buffett indicator history");

    let history = indicator::buffett_history(&state.fred).await;
    if history.points.is_empty() {
        warn!("Buffett indicator history unavailable");
        return Err(warp::reject::custom(ApiError::upstream(
            "Buffett indicator data is currently unavailable",
        )));
    }

    Ok(warp::reply::json(&json!({
        "success": true,
        "data": history,
    })))
}

/// Aggregate endpoint: always a top-level success flag; failed branches are
/// enumerated inside the body so the caller can render what succeeded.
pub async fn get_economic_indicators(state: Arc<AppState>) -> Result<Json, Rejection> {
    info!("Handling request for the economic indicators aggregate");

    let indicators = indicator::economic_indicators(&state.fred).await;
    if !indicators.failed.is_empty() {
        warn!("{} indicator series unavailable", indicators.failed.len());
    }

    Ok(warp::reply::json(&json!({
        "success": true,
        "data": indicators,
        "lastUpdated": Utc::now(),
    })))
}
