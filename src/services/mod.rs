// src/services/mod.rs
pub mod calculators;
pub mod filings;
pub mod fred;
pub mod indicator;
pub mod quotes;
