// src/services/indicator.rs
use anyhow::Result;
use chrono::{NaiveDate, Utc};
use log::{info, warn};

use crate::models::{
    BuffettHistory, BuffettSummary, EconomicIndicators, Observation, SeriesFailure, SeriesPair,
    ValuationBand, ValuationPoint,
};
use crate::services::fred::{FredClient, Frequency};

/// Wilshire 5000 full-cap index, quoted in millions of dollars.
const MARKET_CAP_SERIES: &str = "WILL5000INDFC";
/// Nominal GDP, quoted in billions of dollars.
const GDP_SERIES: &str = "GDP";
const FED_FUNDS_SERIES: &str = "FEDFUNDS";
const TREASURY_10Y_SERIES: &str = "DGS10";
const CPI_SERIES: &str = "CPIAUCSL";
/// S&P 500 trailing P/E. Not hosted on FRED proper, so this branch usually
/// lands in `failed` unless the configured base URL mirrors it.
const PE_RATIO_SERIES: &str = "MULTPL/SP500_PE_RATIO_MONTH";

/// Aggregate responses keep only the most recent points per series.
const AGGREGATE_TAIL: usize = 20;

fn history_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2010, 1, 1).unwrap()
}

/// Map a Buffett ratio to its qualitative band. Thresholds are fixed and
/// lower-inclusive: 75.00 is already "fair", 140.00 already "extremely
/// overvalued".
pub fn classify(ratio: f64) -> ValuationBand {
    if ratio < 75.0 {
        ValuationBand::SignificantlyUndervalued
    } else if ratio < 90.0 {
        ValuationBand::Fair
    } else if ratio < 115.0 {
        ValuationBand::SomewhatOvervalued
    } else if ratio < 140.0 {
        ValuationBand::SignificantlyOvervalued
    } else {
        ValuationBand::ExtremelyOvervalued
    }
}

/// Align two series on exact date equality, dropping unmatched points on
/// either side. Linear scan per outer point; both series are capped at 60
/// observations upstream.
pub fn join_by_date(market: &[Observation], gdp: &[Observation]) -> Vec<SeriesPair> {
    market
        .iter()
        .filter_map(|m| {
            gdp.iter().find(|g| g.date == m.date).map(|g| SeriesPair {
                date: m.date,
                market: m.value,
                gdp: g.value,
            })
        })
        .collect()
}

/// Compute classified ratio points from unit-normalized pairs. Pairs with a
/// non-positive member are excluded before the division.
pub fn ratio_points(pairs: &[SeriesPair]) -> Vec<ValuationPoint> {
    pairs
        .iter()
        .filter(|p| p.market > 0.0 && p.gdp > 0.0)
        .map(|p| {
            let ratio = round2(p.market / p.gdp * 100.0);
            ValuationPoint {
                date: p.date,
                ratio,
                band: classify(ratio),
            }
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Headline figure from the newest point; the change percent compares the two
/// newest points rather than using any placeholder.
pub fn summarize(points: &[ValuationPoint]) -> Option<BuffettSummary> {
    let latest = points.last()?;
    let change_percent = if points.len() >= 2 {
        let previous = points[points.len() - 2];
        if previous.ratio > 0.0 {
            Some(round2((latest.ratio - previous.ratio) / previous.ratio * 100.0))
        } else {
            None
        }
    } else {
        None
    };

    Some(BuffettSummary {
        current_value: latest.ratio,
        change_percent,
        band: latest.band,
        last_updated: Utc::now(),
    })
}

/// Year-over-year CPI change sampled quarterly: each point is compared with
/// the observation four quarters earlier.
pub fn annual_inflation_from_cpi(cpi: &[Observation]) -> Vec<Observation> {
    let mut rates = Vec::new();
    for i in 4..cpi.len() {
        let current = cpi[i];
        let year_ago = cpi[i - 4];
        if current.value > 0.0 && year_ago.value > 0.0 {
            rates.push(Observation {
                date: current.date,
                value: round2((current.value - year_ago.value) / year_ago.value * 100.0),
            });
        }
    }
    rates
}

/// Fetch both legs concurrently, normalize the market series onto the GDP
/// scale and derive the classified ratio history.
pub async fn buffett_history(fred: &FredClient) -> BuffettHistory {
    let start = history_start();
    let (market, gdp) = tokio::join!(
        fred.fetch_series(MARKET_CAP_SERIES, start, Frequency::Quarterly),
        fred.fetch_series(GDP_SERIES, start, Frequency::Quarterly),
    );
    info!("Market cap points: {}, GDP points: {}", market.len(), gdp.len());

    // Index is in millions, GDP in billions.
    let market: Vec<Observation> = market
        .into_iter()
        .map(|o| Observation {
            date: o.date,
            value: o.value / 1000.0,
        })
        .collect();

    let pairs = join_by_date(&market, &gdp);
    let points = ratio_points(&pairs);
    if points.is_empty() {
        warn!("No overlapping market-cap/GDP observations, history is empty");
    }

    let summary = summarize(&points);
    BuffettHistory { points, summary }
}

/// Aggregate endpoint body: every branch is fetched independently and a
/// failing branch is reported in `failed` without blocking its siblings.
pub async fn economic_indicators(fred: &FredClient) -> EconomicIndicators {
    let start = history_start();
    let (buffett, fed_funds, treasury, cpi, pe_ratio) = tokio::join!(
        buffett_history(fred),
        fred.try_fetch_series(FED_FUNDS_SERIES, start, Frequency::Quarterly),
        fred.try_fetch_series(TREASURY_10Y_SERIES, start, Frequency::Quarterly),
        fred.try_fetch_series(CPI_SERIES, start, Frequency::Quarterly),
        fred.try_fetch_series(PE_RATIO_SERIES, start, Frequency::Monthly),
    );

    let mut failed = Vec::new();
    let fed_funds = series_or_record(FED_FUNDS_SERIES, fed_funds, &mut failed);
    let treasury = series_or_record(TREASURY_10Y_SERIES, treasury, &mut failed);
    let cpi = series_or_record(CPI_SERIES, cpi, &mut failed);
    let pe_ratio = series_or_record(PE_RATIO_SERIES, pe_ratio, &mut failed);
    let inflation = annual_inflation_from_cpi(&cpi);

    if buffett.points.is_empty() {
        failed.push(SeriesFailure {
            series: "buffettIndicator".to_string(),
            reason: "no overlapping market-cap/GDP observations".to_string(),
        });
    }

    EconomicIndicators {
        buffett_indicator: tail(buffett.points, AGGREGATE_TAIL),
        fed_funds_rate: tail(fed_funds, AGGREGATE_TAIL),
        treasury_10_year: tail(treasury, AGGREGATE_TAIL),
        inflation_rate: tail(inflation, AGGREGATE_TAIL),
        pe_ratio: tail(pe_ratio, AGGREGATE_TAIL),
        failed,
    }
}

fn series_or_record(
    series: &str,
    outcome: Result<Vec<Observation>>,
    failed: &mut Vec<SeriesFailure>,
) -> Vec<Observation> {
    match outcome {
        Ok(observations) => observations,
        Err(e) => {
            warn!("Series {} unavailable: {:#}", series, e);
            failed.push(SeriesFailure {
                series: series.to_string(),
                reason: e.to_string(),
            });
            Vec::new()
        }
    }
}

fn tail<T>(mut items: Vec<T>, keep: usize) -> Vec<T> {
    if items.len() > keep {
        items.drain(..items.len() - keep);
    }
    items
}
