// src/services/quotes.rs
use anyhow::{anyhow, Result};
use chrono::{TimeZone, Utc};
use log::warn;
use reqwest::Client;
use serde::Deserialize;

use crate::models::{FailedSymbol, QuoteBatch, StockQuote};

const QUOTE_URL: &str = "https://query1.finance.yahoo.com/v7/finance/quote";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Deserialize)]
struct QuoteEnvelope {
    #[serde(rename = "quoteResponse")]
    quote_response: QuoteResponse,
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    result: Vec<RawQuote>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuote {
    symbol: String,
    short_name: Option<String>,
    long_name: Option<String>,
    regular_market_price: Option<f64>,
    regular_market_change: Option<f64>,
    regular_market_change_percent: Option<f64>,
    regular_market_previous_close: Option<f64>,
    regular_market_open: Option<f64>,
    regular_market_day_high: Option<f64>,
    regular_market_day_low: Option<f64>,
    regular_market_volume: Option<u64>,
    market_cap: Option<f64>,
    trailing_pe: Option<f64>,
    fifty_two_week_high: Option<f64>,
    fifty_two_week_low: Option<f64>,
    currency: Option<String>,
    full_exchange_name: Option<String>,
    regular_market_time: Option<i64>,
}

pub async fn fetch_quote(http: &Client, symbol: &str) -> Result<StockQuote> {
    let response = http
        .get(QUOTE_URL)
        .query(&[("symbols", symbol)])
        .header("User-Agent", USER_AGENT)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(anyhow!("quote endpoint returned status {}", response.status()));
    }

    let envelope: QuoteEnvelope = response.json().await?;
    let raw = envelope
        .quote_response
        .result
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("no quote returned for {}", symbol))?;
    into_quote(raw)
}

/// Fan out one request per symbol and await them jointly. A failing branch
/// lands in `failed` and never blocks a sibling.
pub async fn fetch_quotes(http: &Client, symbols: &[String]) -> QuoteBatch {
    let mut handles = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        let http = http.clone();
        let symbol = symbol.clone();
        handles.push(tokio::spawn(async move { fetch_quote(&http, &symbol).await }));
    }

    let mut quotes = Vec::new();
    let mut failed = Vec::new();
    for (symbol, handle) in symbols.iter().cloned().zip(handles) {
        match handle.await {
            Ok(Ok(quote)) => quotes.push(quote),
            Ok(Err(e)) => {
                warn!("Quote fetch for {} failed: {:#}", symbol, e);
                failed.push(FailedSymbol {
                    symbol,
                    reason: e.to_string(),
                });
            }
            Err(e) => {
                warn!("Quote task for {} did not complete: {}", symbol, e);
                failed.push(FailedSymbol {
                    symbol,
                    reason: format!("task failed: {}", e),
                });
            }
        }
    }

    let total_successful = quotes.len();
    QuoteBatch {
        quotes,
        failed,
        total_requested: symbols.len(),
        total_successful,
    }
}

fn into_quote(raw: RawQuote) -> Result<StockQuote> {
    // a quote without a usable price is worthless downstream
    let price = raw
        .regular_market_price
        .filter(|p| p.is_finite() && *p > 0.0)
        .ok_or_else(|| anyhow!("quote for {} has no usable market price", raw.symbol))?;

    let last_updated = raw
        .regular_market_time
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
        .unwrap_or_else(Utc::now);

    Ok(StockQuote {
        symbol: raw.symbol,
        name: raw.short_name.or(raw.long_name),
        price,
        change: raw.regular_market_change,
        change_percent: raw.regular_market_change_percent,
        previous_close: raw.regular_market_previous_close,
        open: raw.regular_market_open,
        day_high: raw.regular_market_day_high,
        day_low: raw.regular_market_day_low,
        volume: raw.regular_market_volume,
        market_cap: raw.market_cap,
        pe_ratio: raw.trailing_pe,
        fifty_two_week_high: raw.fifty_two_week_high,
        fifty_two_week_low: raw.fifty_two_week_low,
        currency: raw.currency,
        exchange: raw.full_exchange_name,
        last_updated,
    })
}
