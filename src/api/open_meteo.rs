//! Client for the Open-Meteo weather APIs.
//!
//! Three fetches back the aggregator: current conditions, hourly soil data,
//! and the multi-year daily archive. Each fetch fails soft: a timeout,
//! non-200 status, network error, or undecodable body is logged and reported
//! to the caller as `None`, never as a propagated error. The aggregator
//! decides per operation whether absence is tolerable.

use crate::models::{Coordinate, CurrentConditionsResponse, HistoricalResponse, SoilResponse};
use chrono::NaiveDate;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::env;
use std::time::Duration;
use tracing::{debug, error};

const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
const DEFAULT_ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";
const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_HISTORICAL_YEARS: u32 = 2;

/// Configuration for the Open-Meteo client and the historical analysis window.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the forecast endpoint (current conditions and soil).
    pub forecast_url: String,
    /// Base URL of the historical daily archive endpoint.
    pub archive_url: String,
    /// Per-request timeout budget.
    pub request_timeout: Duration,
    /// How many years of archive data to analyze.
    pub historical_years: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            archive_url: DEFAULT_ARCHIVE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            historical_years: DEFAULT_HISTORICAL_YEARS,
        }
    }
}

impl ApiConfig {
    /// Builds a config from the environment, falling back to the compiled
    /// defaults for anything unset or unparseable.
    ///
    /// Recognized variables: `AGRO_FORECAST_URL`, `AGRO_ARCHIVE_URL`,
    /// `AGRO_REQUEST_TIMEOUT_SECS`, `AGRO_HISTORICAL_YEARS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            forecast_url: env::var("AGRO_FORECAST_URL").unwrap_or(defaults.forecast_url),
            archive_url: env::var("AGRO_ARCHIVE_URL").unwrap_or(defaults.archive_url),
            request_timeout: env::var("AGRO_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            historical_years: env::var("AGRO_HISTORICAL_YEARS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.historical_years),
        }
    }
}

/// An asynchronous client for the Open-Meteo forecast and archive endpoints.
///
/// One instance is built per aggregator; the inner `reqwest::Client` pools
/// connections across the concurrent fetches of a request.
pub struct OpenMeteoClient {
    client: Client,
    config: ApiConfig,
}

impl OpenMeteoClient {
    /// Creates a new client with the provided configuration.
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Fetches instantaneous weather plus today's peak UV index.
    pub async fn fetch_current_conditions(
        &self,
        coord: Coordinate,
    ) -> Option<CurrentConditionsResponse> {
        let query = [
            ("latitude", coord.lat.to_string()),
            ("longitude", coord.lon.to_string()),
            (
                "current",
                "temperature_2m,relative_humidity_2m,precipitation,wind_speed_10m,wind_direction_10m"
                    .to_string(),
            ),
            ("daily", "uv_index_max".to_string()),
            ("timezone", "auto".to_string()),
            ("forecast_days", "1".to_string()),
        ];
        self.fetch_json(&self.config.forecast_url, &query, "current conditions")
            .await
    }

    /// Fetches hourly soil moisture (four depth bands) and soil temperature
    /// (two depths).
    pub async fn fetch_current_soil(&self, coord: Coordinate) -> Option<SoilResponse> {
        let query = [
            ("latitude", coord.lat.to_string()),
            ("longitude", coord.lon.to_string()),
            (
                "hourly",
                "soil_temperature_0cm,soil_temperature_6cm,soil_moisture_0_to_1cm,soil_moisture_1_to_3cm,soil_moisture_3_to_9cm,soil_moisture_9_to_27cm"
                    .to_string(),
            ),
            ("timezone", "auto".to_string()),
            ("forecast_days", "1".to_string()),
        ];
        self.fetch_json(&self.config.forecast_url, &query, "soil data")
            .await
    }

    /// Fetches the daily archive over an explicit date range.
    pub async fn fetch_historical_daily(
        &self,
        coord: Coordinate,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Option<HistoricalResponse> {
        let query = [
            ("latitude", coord.lat.to_string()),
            ("longitude", coord.lon.to_string()),
            ("start_date", start_date.format("%Y-%m-%d").to_string()),
            ("end_date", end_date.format("%Y-%m-%d").to_string()),
            (
                "daily",
                "temperature_2m_max,temperature_2m_min,temperature_2m_mean,precipitation_sum,et0_fao_evapotranspiration"
                    .to_string(),
            ),
            ("timezone", "auto".to_string()),
        ];
        self.fetch_json(&self.config.archive_url, &query, "historical data")
            .await
    }

    /// Issues one GET and decodes the JSON body, mapping every failure mode
    /// to `None` with a logged cause. Exactly one attempt, no retries.
    async fn fetch_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        what: &str,
    ) -> Option<T> {
        debug!("Fetching {} from {}", what, url);

        let response = match self
            .client
            .get(url)
            .query(query)
            .timeout(self.config.request_timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                error!("Timeout fetching {}: {}", what, e);
                return None;
            },
            Err(e) => {
                error!("Network error fetching {}: {}", what, e);
                return None;
            },
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("{} API returned {}: {}", what, status, body);
            return None;
        }

        match response.json::<T>().await {
            Ok(body) => Some(body),
            Err(e) => {
                error!("Error parsing {} response JSON: {}", what, e);
                None
            },
        }
    }
}
