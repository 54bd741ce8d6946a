// src/services/fred.rs
use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use log::{info, warn};
use reqwest::Client;
use serde::Deserialize;

use crate::models::Observation;

const DEFAULT_BASE_URL: &str = "https://api.stlouisfed.org/fred";

/// FRED caps us at 60 observations per series; the derived computations never
/// need more.
const OBSERVATION_LIMIT: &str = "60";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Monthly,
    Quarterly,
}

impl Frequency {
    /// Short code accepted by the `frequency` query parameter.
    pub fn as_param(self) -> &'static str {
        match self {
            Frequency::Daily => "d",
            Frequency::Monthly => "m",
            Frequency::Quarterly => "q",
        }
    }

    /// Inverse of [`as_param`](Self::as_param), for CLI arguments.
    pub fn from_param(param: &str) -> Option<Self> {
        match param {
            "d" => Some(Frequency::Daily),
            "m" => Some(Frequency::Monthly),
            "q" => Some(Frequency::Quarterly),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct FredPayload {
    observations: Vec<RawObservation>,
}

#[derive(Debug, Deserialize)]
struct RawObservation {
    date: String,
    value: String,
}

#[derive(Clone)]
pub struct FredClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl FredClient {
    pub fn new(http: Client, api_key: impl Into<String>) -> Self {
        FredClient {
            http,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn from_env(http: Client) -> Result<Self> {
        let api_key = std::env::var("FRED_API_KEY")
            .map_err(|_| anyhow!("FRED_API_KEY is not set"))?;
        Ok(Self::new(http, api_key))
    }

    /// Fetch a series, soft-failing to an empty vec so aggregate callers can
    /// still render the branches that succeeded.
    pub async fn fetch_series(
        &self,
        series_id: &str,
        start_date: NaiveDate,
        frequency: Frequency,
    ) -> Vec<Observation> {
        match self.try_fetch_series(series_id, start_date, frequency).await {
            Ok(observations) => {
                info!("Fetched {} observations for {}", observations.len(), series_id);
                observations
            }
            Err(e) => {
                warn!("FRED fetch for {} failed, returning empty series: {:#}", series_id, e);
                Vec::new()
            }
        }
    }

    /// Like [`fetch_series`](Self::fetch_series) but propagates the failure,
    /// for callers that report per-series errors.
    pub async fn try_fetch_series(
        &self,
        series_id: &str,
        start_date: NaiveDate,
        frequency: Frequency,
    ) -> Result<Vec<Observation>> {
        let url = format!("{}/series/observations", self.base_url);
        let start = start_date.format("%Y-%m-%d").to_string();
        let response = self
            .http
            .get(&url)
            .query(&[
                ("series_id", series_id),
                ("api_key", self.api_key.as_str()),
                ("file_type", "json"),
                ("observation_start", start.as_str()),
                ("frequency", frequency.as_param()),
                ("sort_order", "desc"),
                ("limit", OBSERVATION_LIMIT),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("FRED returned status {}", response.status()));
        }

        let payload: FredPayload = response.json().await?;
        Ok(parse_observations(payload))
    }

    /// Most recent valid observation of a series.
    pub async fn latest_value(
        &self,
        series_id: &str,
        start_date: NaiveDate,
        frequency: Frequency,
    ) -> Result<Observation> {
        let observations = self.try_fetch_series(series_id, start_date, frequency).await?;
        observations
            .last()
            .copied()
            .ok_or_else(|| anyhow!("no valid observations for {}", series_id))
    }
}

/// Drop sentinel ("." / empty) and unparseable entries, then sort ascending
/// by date. The request asks FRED for descending order, so this normally
/// amounts to a reversal.
fn parse_observations(payload: FredPayload) -> Vec<Observation> {
    let mut observations: Vec<Observation> = payload
        .observations
        .into_iter()
        .filter_map(|raw| {
            let value = raw.value.trim();
            if value.is_empty() || value == "." {
                return None;
            }
            let value: f64 = value.parse().ok()?;
            let date = NaiveDate::parse_from_str(raw.date.trim(), "%Y-%m-%d").ok()?;
            Some(Observation { date, value })
        })
        .collect();

    observations.sort_by_key(|o| o.date);
    observations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(raw: &str) -> FredPayload {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn frequency_params_round_trip() {
        for frequency in [Frequency::Daily, Frequency::Monthly, Frequency::Quarterly] {
            assert_eq!(Frequency::from_param(frequency.as_param()), Some(frequency));
        }
        assert_eq!(Frequency::from_param("w"), None);
    }

    #[test]
    fn parse_drops_sentinel_and_unparseable_values() {
        let payload = payload(
            r#"{
                "observations": [
                    {"date": "2020-04-01", "value": "21.5"},
                    {"date": "2020-03-01", "value": "."},
                    {"date": "2020-02-01", "value": ""},
                    {"date": "2020-01-15", "value": "not-a-number"},
                    {"date": "2020-01-01", "value": "20.0"}
                ]
            }"#,
        );

        let observations = parse_observations(payload);
        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0].value, 20.0);
        assert_eq!(observations[1].value, 21.5);
    }

    #[test]
    fn parse_sorts_descending_input_ascending() {
        let payload = payload(
            r#"{
                "observations": [
                    {"date": "2021-01-01", "value": "3.0"},
                    {"date": "2020-07-01", "value": "2.0"},
                    {"date": "2020-01-01", "value": "1.0"}
                ]
            }"#,
        );

        let observations = parse_observations(payload);
        let dates: Vec<_> = observations.iter().map(|o| o.date.to_string()).collect();
        assert_eq!(dates, vec!["2020-01-01", "2020-07-01", "2021-01-01"]);
    }

    #[test]
    fn parse_skips_malformed_dates() {
        let payload = payload(
            r#"{
                "observations": [
                    {"date": "01/01/2020", "value": "1.0"},
                    {"date": "2020-04-01", "value": "2.0"}
                ]
            }"#,
        );

        let observations = parse_observations(payload);
        assert_eq!(observations.len(), 1);
        assert_eq!(observations[0].value, 2.0);
    }
}
