// src/services/filings.rs
use std::collections::HashMap;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use log::{info, warn};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::models::Filing;

const TICKER_MAP_URL: &str = "https://www.sec.gov/files/company_tickers.json";
const SUBMISSIONS_BASE: &str = "https://data.sec.gov/submissions";
const MAX_FILINGS: usize = 50;

/// Ticker-to-CIK map with an expiry. Successful loads live for a day; a
/// failed load is retried after a minute instead of hammering EDGAR.
#[derive(Debug, Default)]
struct CikCache {
    map: HashMap<String, String>,
    expires_at: Option<DateTime<Utc>>,
}

impl CikCache {
    fn is_fresh(&self) -> bool {
        self.expires_at.map_or(false, |t| t > Utc::now())
    }
}

#[derive(Debug, Deserialize)]
struct TickerRow {
    cik_str: u64,
    ticker: String,
}

#[derive(Debug, Deserialize)]
struct Submissions {
    filings: Filings,
}

#[derive(Debug, Deserialize)]
struct Filings {
    recent: RecentFilings,
}

/// EDGAR's column-array layout: parallel vectors indexed together.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RecentFilings {
    form: Vec<String>,
    filing_date: Vec<String>,
    accession_number: Vec<String>,
    primary_document: Vec<String>,
}

/// SEC EDGAR lookup with an injectable, request-scoped-free CIK cache.
pub struct CikStore {
    http: Client,
    user_agent: String,
    cache: RwLock<CikCache>,
}

impl CikStore {
    pub fn new(http: Client, user_agent: impl Into<String>) -> Self {
        CikStore {
            http,
            user_agent: user_agent.into(),
            cache: RwLock::new(CikCache::default()),
        }
    }

    /// Resolve a ticker to its zero-padded CIK, refreshing the cached map if
    /// it has expired. `None` means the ticker is unknown to EDGAR.
    pub async fn resolve(&self, symbol: &str) -> Option<String> {
        let symbol = symbol.to_uppercase();
        {
            let cache = self.cache.read().await;
            if cache.is_fresh() {
                return cache.map.get(&symbol).cloned();
            }
        }

        let mut cache = self.cache.write().await;
        // another task may have refreshed while we waited for the write lock
        if !cache.is_fresh() {
            match self.load_ticker_map().await {
                Ok(map) => {
                    info!("Loaded {} ticker-to-CIK mappings", map.len());
                    cache.map = map;
                    cache.expires_at = Some(Utc::now() + Duration::hours(24));
                }
                Err(e) => {
                    warn!("Failed to load SEC ticker map: {:#}", e);
                    cache.map.clear();
                    cache.expires_at = Some(Utc::now() + Duration::seconds(60));
                }
            }
        }
        cache.map.get(&symbol).cloned()
    }

    /// Recent filings for a ticker, newest first as EDGAR serves them.
    /// `Ok(None)` means the ticker has no CIK mapping.
    pub async fn recent_filings(&self, symbol: &str) -> Result<Option<Vec<Filing>>> {
        let cik = match self.resolve(symbol).await {
            Some(cik) => cik,
            None => return Ok(None),
        };

        let url = format!("{}/CIK{}.json", SUBMISSIONS_BASE, cik);
        let response = self
            .http
            .get(&url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("SEC submissions returned status {}", response.status()));
        }

        let payload: Submissions = response.json().await?;
        Ok(Some(collect_filings(&cik, payload.filings.recent)))
    }

    async fn load_ticker_map(&self) -> Result<HashMap<String, String>> {
        let response = self
            .http
            .get(TICKER_MAP_URL)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("SEC ticker map returned status {}", response.status()));
        }

        // payload shape: {"0": {"cik_str": ..., "ticker": ..., "title": ...}, ...}
        let rows: HashMap<String, TickerRow> = response.json().await?;
        Ok(rows
            .into_values()
            .map(|row| (row.ticker.to_uppercase(), format!("{:010}", row.cik_str)))
            .collect())
    }
}

/// Zip EDGAR's parallel column arrays into typed records, bounded by the
/// shortest column and the response cap.
fn collect_filings(cik: &str, recent: RecentFilings) -> Vec<Filing> {
    let len = recent
        .form
        .len()
        .min(recent.filing_date.len())
        .min(recent.accession_number.len())
        .min(recent.primary_document.len())
        .min(MAX_FILINGS);

    let cik_numeric = cik.trim_start_matches('0');
    (0..len)
        .filter_map(|i| {
            let date = NaiveDate::parse_from_str(&recent.filing_date[i], "%Y-%m-%d").ok()?;
            let accession = recent.accession_number[i].replace('-', "");
            Some(Filing {
                form: recent.form[i].clone(),
                date,
                edgar_url: format!(
                    "https://www.sec.gov/Archives/edgar/data/{}/{}/{}",
                    cik_numeric, accession, recent.primary_document[i]
                ),
            })
        })
        .collect()
}
