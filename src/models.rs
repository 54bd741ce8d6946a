// src/models.rs
use serde::{Serialize, Deserialize};
use chrono::{DateTime, NaiveDate, Utc};

/// A single (date, value) point of an economic series, already filtered of
/// sentinel/unparseable upstream entries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

/// Market-cap and GDP observations sharing the same date. Transient, only
/// lives between the join and the ratio computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPair {
    pub date: NaiveDate,
    pub market: f64,
    pub gdp: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValuationBand {
    SignificantlyUndervalued,
    Fair,
    SomewhatOvervalued,
    SignificantlyOvervalued,
    ExtremelyOvervalued,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValuationPoint {
    pub date: NaiveDate,
    pub ratio: f64,
    pub band: ValuationBand,
}

/// Headline figure derived from the most recent ratio point. The change
/// percent compares against the previous point and is absent when the series
/// has a single point.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuffettSummary {
    pub current_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_percent: Option<f64>,
    pub band: ValuationBand,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuffettHistory {
    pub points: Vec<ValuationPoint>,
    pub summary: Option<BuffettSummary>,
}

/// One economic series that could not be served in an aggregate response.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesFailure {
    pub series: String,
    pub reason: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EconomicIndicators {
    pub buffett_indicator: Vec<ValuationPoint>,
    pub fed_funds_rate: Vec<Observation>,
    pub treasury_10_year: Vec<Observation>,
    pub inflation_rate: Vec<Observation>,
    pub pe_ratio: Vec<Observation>,
    pub failed: Vec<SeriesFailure>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundInput {
    pub principal: f64,
    pub monthly_contribution: f64,
    pub annual_rate_percent: f64,
    pub years: u32,
}

/// Snapshot taken at every 12-month boundary of a compounding simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyCheckpoint {
    pub year: u32,
    pub cumulative_contributions: f64,
    pub balance: f64,
    pub yearly_gain: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundProjection {
    pub total_investment: f64,
    pub final_amount: f64,
    pub total_return: f64,
    pub return_rate_percent: f64,
    pub yearly: Vec<YearlyCheckpoint>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetReturnInput {
    pub current_asset: f64,
    pub target_asset: f64,
    pub years: u32,
    /// Accepted for interface parity with the projectors; the closed-form
    /// solver prices growth on the current asset alone.
    #[serde(default)]
    pub monthly_contribution: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetReturn {
    pub required_annual_return_percent: f64,
    pub required_monthly_return_percent: f64,
    pub risk_band: RiskBand,
    pub achievable: bool,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DcaInput {
    pub monthly_investment: f64,
    pub years: u32,
    pub annual_return_percent: f64,
    #[serde(default = "default_volatility")]
    pub volatility_percent: f64,
}

fn default_volatility() -> f64 {
    15.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPoint {
    pub month: u32,
    pub cumulative_investment: f64,
    pub estimated_value: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DcaScenarios {
    pub pessimistic: f64,
    pub realistic: f64,
    pub optimistic: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DcaProjection {
    pub total_investment: f64,
    pub estimated_value: f64,
    pub total_return: f64,
    pub return_rate_percent: f64,
    pub scenarios: DcaScenarios,
    pub monthly: Vec<MonthlyPoint>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementInput {
    pub current_age: u32,
    pub retirement_age: u32,
    pub current_asset: f64,
    /// Monthly living expense in today's terms.
    pub monthly_expense: f64,
    pub life_expectancy: u32,
    pub inflation_rate_percent: f64,
    pub expected_return_percent: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementPlan {
    pub required_amount: f64,
    pub current_shortfall: f64,
    pub monthly_contribution_needed: f64,
    pub years_to_retirement: u32,
    pub monthly_income_at_retirement: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockQuote {
    pub symbol: String,
    pub name: Option<String>,
    pub price: f64,
    pub change: Option<f64>,
    pub change_percent: Option<f64>,
    pub previous_close: Option<f64>,
    pub open: Option<f64>,
    pub day_high: Option<f64>,
    pub day_low: Option<f64>,
    pub volume: Option<u64>,
    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub currency: Option<String>,
    pub exchange: Option<String>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedSymbol {
    pub symbol: String,
    pub reason: String,
}

/// Fan-out result: every requested symbol lands either in `quotes` or in
/// `failed`, never silently dropped.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteBatch {
    pub quotes: Vec<StockQuote>,
    pub failed: Vec<FailedSymbol>,
    pub total_requested: usize,
    pub total_successful: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Filing {
    pub form: String,
    pub date: NaiveDate,
    pub edgar_url: String,
}
