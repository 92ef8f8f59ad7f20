//! Composes the season calendar, statistics module, and Open-Meteo client
//! into the three public operations: current snapshot, soil snapshot, and
//! historical seasonal analysis.
//!
//! The two snapshot operations require their single feed and fail hard with
//! `DataUnavailable` when it yields nothing. Historical analysis fans out its
//! three fetches concurrently, tolerates any subset failing, and records what
//! actually arrived in `data_quality` so callers can gauge confidence.

use crate::api::{ApiConfig, OpenMeteoClient};
use crate::error::{AppError, Result};
use crate::models::{
    Coordinate, CurrentConditions, CurrentSnapshot, DailyArchiveBlock, DataQuality,
    HistoricalDataset, SeasonalComparison, SeasonalHistoricalStats, SoilHourlyBlock, SoilProfile,
    SoilSnapshot,
};
use crate::seasons::{relevant_season, SeasonContext};
use crate::stats;
use chrono::{Datelike, Duration, NaiveDate, Utc};
use tracing::{info, warn};

/// Days subtracted from "now" before requesting archive data; the upstream
/// archive lags behind real time and recent days are not yet finalized.
const ARCHIVE_LAG_DAYS: i64 = 10;

/// Stateless orchestrator over the season calendar, statistics, and the
/// Open-Meteo client. Built once per process; the shared HTTP client inside
/// is the only cross-request state and is never mutated.
pub struct AgroDataAggregator {
    client: OpenMeteoClient,
    config: ApiConfig,
}

impl AgroDataAggregator {
    /// Creates a new aggregator with the provided configuration.
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: OpenMeteoClient::new(config.clone()),
            config,
        }
    }

    /// Fetches instantaneous weather for a coordinate.
    ///
    /// # Errors
    ///
    /// Returns `AppError::DataUnavailable` when the feed fails or returns no
    /// `current` block; there is no fallback data to assemble a snapshot from.
    pub async fn current_snapshot(&self, coord: Coordinate) -> Result<CurrentSnapshot> {
        let response = self
            .client
            .fetch_current_conditions(coord)
            .await
            .ok_or_else(|| {
                AppError::DataUnavailable("failed to fetch current weather data".to_string())
            })?;

        let current = response.current.ok_or_else(|| {
            AppError::DataUnavailable("current weather response had no readings".to_string())
        })?;

        let uv_index = response
            .daily
            .as_ref()
            .and_then(|daily| daily.uv_index_max.first().copied().flatten());

        Ok(CurrentSnapshot {
            location: coord,
            current: CurrentConditions {
                temp_c: current.temperature_2m,
                humidity_pct: current.relative_humidity_2m,
                precipitation_mm: current.precipitation,
                wind_speed_kmh: current.wind_speed_10m,
                wind_direction_deg: current.wind_direction_10m,
                uv_index,
            },
            timestamp: Utc::now().to_rfc3339(),
        })
    }

    /// Fetches the current soil profile for a coordinate and derives its
    /// moisture indicators from the most recent hourly sample.
    ///
    /// # Errors
    ///
    /// Returns `AppError::DataUnavailable` when the feed fails or returns no
    /// `hourly` block.
    pub async fn soil_snapshot(&self, coord: Coordinate) -> Result<SoilSnapshot> {
        let response = self.client.fetch_current_soil(coord).await.ok_or_else(|| {
            AppError::DataUnavailable("failed to fetch soil data".to_string())
        })?;

        let hourly = response.hourly.ok_or_else(|| {
            AppError::DataUnavailable("soil response had no hourly readings".to_string())
        })?;

        Ok(SoilSnapshot {
            location: coord,
            soil: soil_profile_from_hourly(&hourly),
            timestamp: Utc::now().to_rfc3339(),
        })
    }

    /// Runs the full seasonal analysis: relevant season, multi-year baseline,
    /// live comparison, and anomaly flags.
    ///
    /// Never fails for upstream degradation; a total absence of historical
    /// data yields all-`None` statistics with `data_quality.historical_fetches
    /// = 0`, and it is the caller's responsibility to check `data_quality`
    /// before trusting the numbers.
    pub async fn historical_analysis(&self, coord: Coordinate) -> Result<HistoricalDataset> {
        self.historical_analysis_at(coord, Utc::now().date_naive())
            .await
    }

    async fn historical_analysis_at(
        &self,
        coord: Coordinate,
        today: NaiveDate,
    ) -> Result<HistoricalDataset> {
        let season = relevant_season(today);
        let end_date = today - Duration::days(ARCHIVE_LAG_DAYS);
        let start_date = end_date - Duration::days(i64::from(self.config.historical_years) * 365);

        match season.context {
            SeasonContext::Sowing => info!(
                "Currently in sowing window for {:?}; analyzing months {:?}",
                season.season, season.months
            ),
            SeasonContext::Upcoming => info!(
                "Harvest period, preparing for upcoming {:?} season; analyzing months {:?}",
                season.season, season.months
            ),
            SeasonContext::Current => info!(
                "Currently in {:?} season; analyzing months {:?}",
                season.season, season.months
            ),
        }

        // Gather-all join: the three fetches run concurrently and each settles
        // to Some/None on its own. Result assembly below always reads
        // historical, current, soil in that order.
        let (historical, current, soil) = tokio::join!(
            self.client.fetch_historical_daily(coord, start_date, end_date),
            self.client.fetch_current_conditions(coord),
            self.client.fetch_current_soil(coord),
        );

        let archive = historical.and_then(|response| response.daily);
        let data_quality = DataQuality {
            historical_fetches: u32::from(archive.is_some()),
            total_attempts: 1,
            current_data: current.is_some(),
            soil_data: soil.is_some(),
        };

        let months = season.months;
        let (all_temps, all_precip, all_et0, daily_minmax) = match &archive {
            Some(daily) => (
                filter_by_season(&daily.time, &daily.temperature_2m_mean, months),
                filter_by_season(&daily.time, &daily.precipitation_sum, months),
                filter_by_season(&daily.time, &daily.et0_fao_evapotranspiration, months),
                seasonal_minmax_pairs(daily, months),
            ),
            None => {
                warn!("No historical data available; statistics will be empty");
                (Vec::new(), Vec::new(), Vec::new(), Vec::new())
            },
        };

        info!(
            "Filtered to {} temperature and {} precipitation readings for {:?} season",
            all_temps.len(),
            all_precip.len(),
            season.season
        );

        let temp_stats = stats::temperature_stats(&all_temps);
        let precip_stats = stats::precipitation_stats(&all_precip);
        let gdd = stats::growing_degree_days(&daily_minmax);
        let avg_et0 = if all_et0.is_empty() {
            None
        } else {
            Some(stats::round2(stats::mean(&all_et0)))
        };

        let historical_stats = SeasonalHistoricalStats {
            season_name: season.season.display_name().to_string(),
            years_analyzed: data_quality.historical_fetches,
            temp_avg_historical: temp_stats.avg,
            temp_max_historical: temp_stats.max,
            temp_min_historical: temp_stats.min,
            temp_stddev: temp_stats.stddev,
            total_precip_historical: precip_stats.total,
            avg_daily_precip: precip_stats.avg_daily,
            precip_stddev: precip_stats.stddev,
            max_dry_spell_days: precip_stats.max_dry_spell,
            // The archive carries no soil series; these exist for output-shape
            // stability and are structurally absent.
            avg_soil_moisture_historical: None,
            soil_moisture_stddev: None,
            avg_et0_historical: avg_et0,
            avg_gdd_per_day: gdd.map(|(_, per_day)| per_day),
            total_gdd_historical: gdd.map(|(total, _)| total),
        };

        let current_block = current.and_then(|response| response.current);
        let current_temp = current_block.as_ref().and_then(|c| c.temperature_2m);
        let current_precip = current_block.as_ref().and_then(|c| c.precipitation);
        let current_soil = soil
            .and_then(|response| response.hourly)
            .and_then(|hourly| SoilHourlyBlock::first(&hourly.soil_moisture_0_to_1cm));

        // Deltas and percentiles only exist alongside the baseline average
        // they were computed against, so a missing baseline cascades to a
        // fully absent comparison rather than a partially computed one.
        let temp_diff = current_temp
            .zip(temp_stats.avg)
            .map(|(live, avg)| stats::round2(live - avg));
        let precip_diff = current_precip
            .zip(precip_stats.avg_daily)
            .map(|(live, avg)| stats::round2(live - avg));
        let temp_percentile = current_temp
            .zip(temp_stats.avg)
            .and_then(|(live, _)| stats::percentile_rank(live, &all_temps));
        let precip_percentile = current_precip
            .zip(precip_stats.avg_daily)
            .and_then(|(live, _)| stats::percentile_rank(live, &all_precip));

        let anomaly_flags = stats::detect_anomalies(
            current_temp,
            current_precip,
            current_soil,
            temp_stats.avg,
            temp_stats.stddev,
            precip_stats.avg_daily,
            historical_stats.avg_soil_moisture_historical,
        );

        let seasonal_comparison = SeasonalComparison {
            current_temp_vs_historical: temp_diff,
            current_precip_vs_historical: precip_diff,
            current_soil_moisture_vs_historical: None,
            temp_percentile,
            precip_percentile,
            anomaly_flags,
        };

        Ok(HistoricalDataset {
            location: coord,
            relevant_season: season.season,
            season_context: season.context,
            analysis_period: format!(
                "Last {} years, filtered for {}",
                self.config.historical_years,
                season.season.display_name()
            ),
            historical_stats,
            seasonal_comparison,
            timestamp: Utc::now().to_rfc3339(),
            data_quality,
        })
    }
}

fn soil_profile_from_hourly(hourly: &SoilHourlyBlock) -> SoilProfile {
    SoilProfile::from_readings(
        [
            SoilHourlyBlock::first(&hourly.soil_moisture_0_to_1cm),
            SoilHourlyBlock::first(&hourly.soil_moisture_1_to_3cm),
            SoilHourlyBlock::first(&hourly.soil_moisture_3_to_9cm),
            SoilHourlyBlock::first(&hourly.soil_moisture_9_to_27cm),
        ],
        SoilHourlyBlock::first(&hourly.soil_temperature_0cm),
        SoilHourlyBlock::first(&hourly.soil_temperature_6cm),
    )
}

/// Keeps only observed values whose date falls in the season's months. Null
/// days are dropped entirely: not observed, neither wet nor dry.
fn filter_by_season(dates: &[NaiveDate], values: &[Option<f64>], months: &[u32]) -> Vec<f64> {
    dates
        .iter()
        .zip(values)
        .filter(|(date, _)| months.contains(&date.month()))
        .filter_map(|(_, value)| *value)
        .collect()
}

/// (max, min) temperature pairs for the season's days where both sides were
/// observed, for growing-degree-day accumulation.
fn seasonal_minmax_pairs(daily: &DailyArchiveBlock, months: &[u32]) -> Vec<(f64, f64)> {
    daily
        .time
        .iter()
        .zip(daily.temperature_2m_max.iter().zip(&daily.temperature_2m_min))
        .filter(|(date, _)| months.contains(&date.month()))
        .filter_map(|(_, (tmax, tmin))| (*tmax).zip(*tmin))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MoistureTrend;
    use crate::seasons::Season;
    use crate::stats::AnomalyFlag;
    use mockito::{Matcher, Server, ServerGuard};
    use serde_json::json;
    use std::time::Duration as StdDuration;

    fn test_config(server: &ServerGuard, years: u32) -> ApiConfig {
        ApiConfig {
            forecast_url: format!("{}/v1/forecast", server.url()),
            archive_url: format!("{}/v1/archive", server.url()),
            request_timeout: StdDuration::from_secs(5),
            historical_years: years,
        }
    }

    fn test_coord() -> Coordinate {
        Coordinate::new(28.6139, 77.209).unwrap()
    }

    /// The forecast endpoint serves both current-conditions and soil queries;
    /// they are told apart by which variable-list parameter is present.
    async fn mock_current(server: &mut ServerGuard, body: serde_json::Value) -> mockito::Mock {
        server
            .mock("GET", "/v1/forecast")
            .match_query(Matcher::Regex("current=".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect_at_least(1)
            .create_async()
            .await
    }

    async fn mock_soil(server: &mut ServerGuard, body: serde_json::Value) -> mockito::Mock {
        server
            .mock("GET", "/v1/forecast")
            .match_query(Matcher::Regex("hourly=".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect_at_least(1)
            .create_async()
            .await
    }

    fn current_body() -> serde_json::Value {
        json!({
            "current": {
                "temperature_2m": 35.0,
                "relative_humidity_2m": 40.0,
                "precipitation": 0.0,
                "wind_speed_10m": 8.0,
                "wind_direction_10m": 180.0
            },
            "daily": { "uv_index_max": [6.0] }
        })
    }

    fn soil_body() -> serde_json::Value {
        json!({
            "hourly": {
                "soil_temperature_0cm": [21.0],
                "soil_temperature_6cm": [19.5],
                "soil_moisture_0_to_1cm": [0.18],
                "soil_moisture_1_to_3cm": [0.20],
                "soil_moisture_3_to_9cm": [0.24],
                "soil_moisture_9_to_27cm": [0.27]
            }
        })
    }

    /// Eight rabi-season days (November 2023) with a known distribution:
    /// mean temp 20.0, six dry days, one 5mm and one 2mm day.
    fn archive_body() -> serde_json::Value {
        json!({
            "daily": {
                "time": [
                    "2023-11-01", "2023-11-02", "2023-11-03", "2023-11-04",
                    "2023-11-05", "2023-11-06", "2023-11-07", "2023-11-08"
                ],
                "temperature_2m_max": [25.0, 25.0, 25.0, 25.0, 25.0, 25.0, 25.0, 25.0],
                "temperature_2m_min": [15.0, 15.0, 15.0, 15.0, 15.0, 15.0, 15.0, 15.0],
                "temperature_2m_mean": [20.0, 21.0, 19.0, 20.0, 21.0, 19.0, 20.0, 20.0],
                "precipitation_sum": [0.0, 0.0, 0.0, 5.0, 0.0, 0.0, 0.0, 2.0],
                "et0_fao_evapotranspiration": [4.0, 4.0, 4.0, 4.0, 4.0, 4.0, 4.0, 4.0]
            }
        })
    }

    /// A mid-January date: rabi season, plain containment context.
    fn rabi_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn invalid_coordinates_never_reach_the_network() {
        // Coordinate construction is the validation gate; an out-of-range
        // pair cannot even name an aggregator operation.
        assert!(Coordinate::new(200.0, 0.0).is_err());
        assert!(Coordinate::new(45.0, -181.0).is_err());
    }

    #[tokio::test]
    async fn current_snapshot_maps_fields() {
        let mut server = Server::new_async().await;
        let _m = mock_current(&mut server, current_body()).await;

        let aggregator = AgroDataAggregator::new(test_config(&server, 2));
        let snapshot = aggregator.current_snapshot(test_coord()).await.unwrap();

        assert_eq!(snapshot.current.temp_c, Some(35.0));
        assert_eq!(snapshot.current.humidity_pct, Some(40.0));
        assert_eq!(snapshot.current.uv_index, Some(6.0));
        assert_eq!(snapshot.location, test_coord());
    }

    #[tokio::test]
    async fn current_snapshot_hard_fails_without_feed() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/v1/forecast")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let aggregator = AgroDataAggregator::new(test_config(&server, 2));
        let result = aggregator.current_snapshot(test_coord()).await;
        assert!(matches!(result, Err(AppError::DataUnavailable(_))));
    }

    #[tokio::test]
    async fn current_snapshot_hard_fails_on_empty_payload() {
        let mut server = Server::new_async().await;
        let _m = mock_current(&mut server, json!({})).await;

        let aggregator = AgroDataAggregator::new(test_config(&server, 2));
        let result = aggregator.current_snapshot(test_coord()).await;
        assert!(matches!(result, Err(AppError::DataUnavailable(_))));
    }

    #[tokio::test]
    async fn soil_snapshot_derives_profile() {
        let mut server = Server::new_async().await;
        let _m = mock_soil(&mut server, soil_body()).await;

        let aggregator = AgroDataAggregator::new(test_config(&server, 2));
        let snapshot = aggregator.soil_snapshot(test_coord()).await.unwrap();

        let soil = snapshot.soil;
        assert_eq!(soil.moisture_0_1, Some(0.18));
        // avg of 0.18, 0.20, 0.24, 0.27; the 222.5 midpoint rounds away from zero
        assert_eq!(soil.avg_moisture, Some(0.223));
        // deep band exceeds surface by 0.09 > 0.05
        assert_eq!(soil.moisture_trend, Some(MoistureTrend::DrierAtSurface));
        assert!(soil.dryness_index.unwrap() > 0.0);
        assert_eq!(soil.temp_0cm, Some(21.0));
    }

    #[tokio::test]
    async fn soil_snapshot_hard_fails_without_feed() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/v1/forecast")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let aggregator = AgroDataAggregator::new(test_config(&server, 2));
        let result = aggregator.soil_snapshot(test_coord()).await;
        assert!(matches!(result, Err(AppError::DataUnavailable(_))));
    }

    #[tokio::test]
    async fn historical_analysis_full_flow() {
        let mut server = Server::new_async().await;
        let _archive = server
            .mock("GET", "/v1/archive")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("start_date".into(), "2023-01-05".into()),
                Matcher::UrlEncoded("end_date".into(), "2024-01-05".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(archive_body().to_string())
            .expect_at_least(1)
            .create_async()
            .await;
        let _current = mock_current(&mut server, current_body()).await;
        let _soil = mock_soil(&mut server, soil_body()).await;

        let aggregator = AgroDataAggregator::new(test_config(&server, 1));
        let dataset = aggregator
            .historical_analysis_at(test_coord(), rabi_day())
            .await
            .unwrap();

        assert_eq!(dataset.relevant_season, Season::Rabi);
        assert_eq!(dataset.season_context, SeasonContext::Current);
        assert_eq!(
            dataset.analysis_period,
            "Last 1 years, filtered for Rabi (Winter)"
        );

        let stats = &dataset.historical_stats;
        assert_eq!(stats.temp_avg_historical, Some(20.0));
        assert_eq!(stats.temp_max_historical, Some(21.0));
        assert_eq!(stats.temp_min_historical, Some(19.0));
        assert_eq!(stats.total_precip_historical, Some(7.0));
        assert_eq!(stats.avg_daily_precip, Some(0.88));
        assert_eq!(stats.max_dry_spell_days, Some(3));
        assert_eq!(stats.avg_et0_historical, Some(4.0));
        // Each day: (25 + 15) / 2 - 10 = 10 GDD.
        assert_eq!(stats.total_gdd_historical, Some(80.0));
        assert_eq!(stats.avg_gdd_per_day, Some(10.0));
        assert_eq!(stats.years_analyzed, 1);
        assert_eq!(stats.avg_soil_moisture_historical, None);

        let comparison = &dataset.seasonal_comparison;
        assert_eq!(comparison.current_temp_vs_historical, Some(15.0));
        assert_eq!(comparison.current_precip_vs_historical, Some(-0.88));
        assert_eq!(comparison.temp_percentile, Some(100.0));
        // Six of eight historical days are at or below 0.0mm.
        assert_eq!(comparison.precip_percentile, Some(75.0));
        // Current is far above the baseline and fully dry.
        assert_eq!(
            comparison.anomaly_flags,
            vec![
                AnomalyFlag::SignificantlyWarmerThanHistorical,
                AnomalyFlag::MuchDrierThanHistorical,
            ]
        );
        assert_eq!(comparison.current_soil_moisture_vs_historical, None);

        let quality = &dataset.data_quality;
        assert_eq!(quality.historical_fetches, 1);
        assert_eq!(quality.total_attempts, 1);
        assert!(quality.current_data);
        assert!(quality.soil_data);

        // Identical upstream payloads must yield identical results apart from
        // the timestamp.
        let repeat = aggregator
            .historical_analysis_at(test_coord(), rabi_day())
            .await
            .unwrap();
        assert_eq!(repeat.historical_stats, dataset.historical_stats);
        assert_eq!(repeat.seasonal_comparison, dataset.seasonal_comparison);
        assert_eq!(repeat.data_quality, dataset.data_quality);
    }

    #[tokio::test]
    async fn historical_analysis_degrades_without_archive() {
        let mut server = Server::new_async().await;
        let _archive = server
            .mock("GET", "/v1/archive")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;
        let _current = mock_current(&mut server, current_body()).await;
        let _soil = mock_soil(&mut server, soil_body()).await;

        let aggregator = AgroDataAggregator::new(test_config(&server, 2));
        let dataset = aggregator
            .historical_analysis_at(test_coord(), rabi_day())
            .await
            .unwrap();

        let quality = &dataset.data_quality;
        assert_eq!(quality.historical_fetches, 0);
        assert!(quality.current_data);
        assert!(quality.soil_data);

        let stats = &dataset.historical_stats;
        assert_eq!(stats.temp_avg_historical, None);
        assert_eq!(stats.total_precip_historical, None);
        assert_eq!(stats.total_gdd_historical, None);
        assert_eq!(stats.avg_et0_historical, None);

        // With no baseline, deltas and percentiles cascade to absent together
        // rather than partially computing.
        let comparison = &dataset.seasonal_comparison;
        assert_eq!(comparison.current_temp_vs_historical, None);
        assert_eq!(comparison.current_precip_vs_historical, None);
        assert_eq!(comparison.temp_percentile, None);
        assert_eq!(comparison.precip_percentile, None);
        assert!(comparison.anomaly_flags.is_empty());
    }

    #[tokio::test]
    async fn historical_analysis_tolerates_live_feed_failures() {
        let mut server = Server::new_async().await;
        let _archive = server
            .mock("GET", "/v1/archive")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(archive_body().to_string())
            .create_async()
            .await;
        // Both forecast queries fail; only the archive answers.
        let _forecast = server
            .mock("GET", "/v1/forecast")
            .match_query(Matcher::Any)
            .with_status(503)
            .expect_at_least(2)
            .create_async()
            .await;

        let aggregator = AgroDataAggregator::new(test_config(&server, 1));
        let dataset = aggregator
            .historical_analysis_at(test_coord(), rabi_day())
            .await
            .unwrap();

        assert_eq!(dataset.data_quality.historical_fetches, 1);
        assert!(!dataset.data_quality.current_data);
        assert!(!dataset.data_quality.soil_data);

        // Baseline exists but there are no live readings to compare.
        assert_eq!(dataset.historical_stats.temp_avg_historical, Some(20.0));
        let comparison = &dataset.seasonal_comparison;
        assert_eq!(comparison.current_temp_vs_historical, None);
        assert_eq!(comparison.temp_percentile, None);
        assert!(comparison.anomaly_flags.is_empty());
    }

    #[tokio::test]
    async fn sparse_archive_withholds_temperature_stats() {
        // Only three season days: below the seven-reading minimum, so the
        // temperature block is withheld entirely while precipitation (which
        // has no minimum) still reduces.
        let mut server = Server::new_async().await;
        let _archive = server
            .mock("GET", "/v1/archive")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "daily": {
                        "time": ["2023-11-01", "2023-11-02", "2023-11-03"],
                        "temperature_2m_max": [25.0, 26.0, 24.0],
                        "temperature_2m_min": [15.0, 16.0, 14.0],
                        "temperature_2m_mean": [20.0, 21.0, 19.0],
                        "precipitation_sum": [0.0, 3.0, 0.0],
                        "et0_fao_evapotranspiration": [4.0, 4.2, 3.8]
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;
        let _current = mock_current(&mut server, current_body()).await;
        let _soil = mock_soil(&mut server, soil_body()).await;

        let aggregator = AgroDataAggregator::new(test_config(&server, 1));
        let dataset = aggregator
            .historical_analysis_at(test_coord(), rabi_day())
            .await
            .unwrap();

        let stats = &dataset.historical_stats;
        assert_eq!(stats.temp_avg_historical, None);
        assert_eq!(stats.temp_stddev, None);
        assert_eq!(stats.total_precip_historical, Some(3.0));
        assert_eq!(stats.max_dry_spell_days, Some(1));

        // No temperature baseline means no temperature delta or percentile,
        // even though a live temperature reading exists.
        let comparison = &dataset.seasonal_comparison;
        assert_eq!(comparison.current_temp_vs_historical, None);
        assert_eq!(comparison.temp_percentile, None);
        assert!(comparison.current_precip_vs_historical.is_some());
    }

    #[tokio::test]
    async fn off_season_archive_days_are_filtered_out() {
        // Archive covers June days (kharif) but the relevant season is rabi;
        // everything filters out and stats stay empty despite a successful
        // fetch.
        let mut server = Server::new_async().await;
        let _archive = server
            .mock("GET", "/v1/archive")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "daily": {
                        "time": ["2023-06-01", "2023-06-02"],
                        "temperature_2m_max": [38.0, 39.0],
                        "temperature_2m_min": [27.0, 28.0],
                        "temperature_2m_mean": [32.0, 33.0],
                        "precipitation_sum": [1.0, 0.0],
                        "et0_fao_evapotranspiration": [6.0, 6.2]
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;
        let _current = mock_current(&mut server, current_body()).await;
        let _soil = mock_soil(&mut server, soil_body()).await;

        let aggregator = AgroDataAggregator::new(test_config(&server, 1));
        let dataset = aggregator
            .historical_analysis_at(test_coord(), rabi_day())
            .await
            .unwrap();

        assert_eq!(dataset.data_quality.historical_fetches, 1);
        assert_eq!(dataset.historical_stats.temp_avg_historical, None);
        assert_eq!(dataset.historical_stats.total_precip_historical, None);
        assert_eq!(dataset.historical_stats.avg_et0_historical, None);
    }
}
