// src/handlers/calculators.rs
use log::info;
use serde_json::json;
use warp::reply::Json;
use warp::Rejection;

use crate::handlers::error::ApiError;
use crate::models::{CompoundInput, DcaInput, RetirementInput, TargetReturnInput};
use crate::services::calculators;

pub async fn post_compound(input: CompoundInput) -> Result<Json, Rejection> {
    info!("Handling compound interest projection request");
    match calculators::compound_interest(&input) {
        Ok(projection) => Ok(warp::reply::json(&json!({
            "success": true,
            "data": projection,
        }))),
        Err(e) => Err(warp::reject::custom(ApiError::invalid_input(e.to_string()))),
    }
}

pub async fn post_target_return(input: TargetReturnInput) -> Result<Json, Rejection> {
    info!("Handling target return request");
    match calculators::target_return(&input) {
        Ok(result) => Ok(warp::reply::json(&json!({
            "success": true,
            "data": result,
        }))),
        Err(e) => Err(warp::reject::custom(ApiError::invalid_input(e.to_string()))),
    }
}

pub async fn post_dca(input: DcaInput) -> Result<Json, Rejection> {
    info!("Handling DCA projection request");
    match calculators::dca_projection(&input) {
        Ok(projection) => Ok(warp::reply::json(&json!({
            "success": true,
            "data": projection,
        }))),
        Err(e) => Err(warp::reject::custom(ApiError::invalid_input(e.to_string()))),
    }
}

pub async fn post_retirement(input: RetirementInput) -> Result<Json, Rejection> {
    info!("Handling retirement plan request");
    match calculators::retirement_plan(&input) {
        Ok(plan) => Ok(warp::reply::json(&json!({
            "success": true,
            "data": plan,
        }))),
        Err(e) => Err(warp::reject::custom(ApiError::invalid_input(e.to_string()))),
    }
}
