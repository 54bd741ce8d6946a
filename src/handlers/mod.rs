// src/handlers/mod.rs
pub mod calculators;
pub mod error;
pub mod filings;
pub mod indicator;
pub mod quotes;
