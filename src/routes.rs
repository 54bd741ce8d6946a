// src/routes.rs
use std::convert::Infallible;
use std::sync::Arc;

use log::info;
use warp::reject::Rejection;
use warp::{Filter, Reply};

use crate::handlers::calculators::{post_compound, post_dca, post_retirement, post_target_return};
use crate::handlers::error::{ApiError, ApiErrorKind};
use crate::handlers::filings::get_filings;
use crate::handlers::indicator::{
    get_buffett_history, get_buffett_indicator, get_economic_indicators,
};
use crate::handlers::quotes::{get_quotes, QuoteQuery};
use crate::AppState;

// Add recovery handling for our custom errors
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = warp::http::StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = match api_error.kind {
            ApiErrorKind::InvalidInput => warp::http::StatusCode::BAD_REQUEST,
            ApiErrorKind::Upstream => warp::http::StatusCode::BAD_GATEWAY,
            ApiErrorKind::Internal => warp::http::StatusCode::INTERNAL_SERVER_ERROR,
        };
        message = api_error.message.clone();
    } else if err.find::<warp::filters::body::BodyDeserializeError>().is_some() {
        code = warp::http::StatusCode::BAD_REQUEST;
        message = "Invalid request body".to_string();
    } else {
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "success": false,
            "error": message,
        })),
        code,
    ))
}

pub fn routes(state: Arc<AppState>) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let state_filter = warp::any().map(move || state.clone());

    let buffett_route = warp::path!("api" / "v1" / "buffett-indicator")
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_buffett_indicator);

    let buffett_history_route = warp::path!("api" / "v1" / "buffett-indicator" / "history")
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_buffett_history);

    let indicators_route = warp::path!("api" / "v1" / "economic-indicators")
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_economic_indicators);

    let compound_route = warp::path!("api" / "v1" / "calculators" / "compound")
        .and(warp::post())
        .and(warp::body::json())
        .and_then(post_compound);

    let target_return_route = warp::path!("api" / "v1" / "calculators" / "target-return")
        .and(warp::post())
        .and(warp::body::json())
        .and_then(post_target_return);

    let dca_route = warp::path!("api" / "v1" / "calculators" / "dca")
        .and(warp::post())
        .and(warp::body::json())
        .and_then(post_dca);

    let retirement_route = warp::path!("api" / "v1" / "calculators" / "retirement")
        .and(warp::post())
        .and(warp::body::json())
        .and_then(post_retirement);

    let quotes_route = warp::path!("api" / "v1" / "quotes")
        .and(warp::get())
        .and(warp::query::<QuoteQuery>())
        .and(state_filter.clone())
        .and_then(get_quotes);

    let filings_route = warp::path!("api" / "v1" / "filings" / String)
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_filings);

    info!("All routes configured successfully.");

    buffett_history_route
        .or(buffett_route)
        .or(indicators_route)
        .or(compound_route)
        .or(target_return_route)
        .or(dca_route)
        .or(retirement_route)
        .or(quotes_route)
        .or(filings_route)
        .recover(handle_rejection)
}
