//! Report structures assembled by the aggregator and serialized for callers.
//!
//! All statistical fields are `Option` and stay `None` when the underlying
//! data is missing; consumers must treat missing as distinct from zero.

use crate::error::{AppError, Result};
use crate::seasons::{Season, SeasonContext};
use crate::stats::{round1, round3, AnomalyFlag};
use serde::Serialize;

/// A validated geographic coordinate. Construction is the validation gate:
/// an aggregator operation can only be invoked with an in-range pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// Validates latitude in [-90, 90] and longitude in [-180, 180].
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(AppError::InvalidCoordinate(format!(
                "latitude {} outside [-90, 90]",
                lat
            )));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(AppError::InvalidCoordinate(format!(
                "longitude {} outside [-180, 180]",
                lon
            )));
        }
        Ok(Self { lat, lon })
    }
}

/// Instantaneous weather readings, each independently optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CurrentConditions {
    pub temp_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub precipitation_mm: Option<f64>,
    pub wind_speed_kmh: Option<f64>,
    pub wind_direction_deg: Option<f64>,
    pub uv_index: Option<f64>,
}

/// Result of the current-conditions operation.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentSnapshot {
    pub location: Coordinate,
    pub current: CurrentConditions,
    pub timestamp: String,
}

/// Qualitative surface-vs-depth moisture gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoistureTrend {
    WetterAtSurface,
    DrierAtSurface,
    Uniform,
    Unknown,
}

/// Soil readings at four depth bands plus derived moisture indicators.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SoilProfile {
    pub moisture_0_1: Option<f64>,
    pub moisture_1_3: Option<f64>,
    pub moisture_3_9: Option<f64>,
    pub moisture_9_27: Option<f64>,
    pub temp_0cm: Option<f64>,
    pub temp_6cm: Option<f64>,
    pub avg_moisture: Option<f64>,
    /// Coefficient of variation across the available bands, percent, clamped
    /// to [0, 100].
    pub moisture_variability: Option<f64>,
    pub moisture_trend: Option<MoistureTrend>,
    /// 0-100 score, higher is drier, derived from the average moisture
    /// fraction against a 0.35 field-capacity reference.
    pub dryness_index: Option<f64>,
}

impl SoilProfile {
    /// Derives the full profile from the most recent hourly readings.
    ///
    /// With zero moisture bands present every derived field stays `None`.
    /// With a non-positive average the dryness index defaults to 100, i.e.
    /// treated as maximally dry. Conservative but debatable; kept for
    /// behavioral compatibility with the upstream consumers.
    pub fn from_readings(
        moisture: [Option<f64>; 4],
        temp_0cm: Option<f64>,
        temp_6cm: Option<f64>,
    ) -> Self {
        let [m_0_1, m_1_3, m_3_9, m_9_27] = moisture;
        let readings: Vec<f64> = moisture.iter().copied().flatten().collect();

        let mut profile = SoilProfile {
            moisture_0_1: m_0_1,
            moisture_1_3: m_1_3,
            moisture_3_9: m_3_9,
            moisture_9_27: m_9_27,
            temp_0cm,
            temp_6cm,
            ..SoilProfile::default()
        };

        if readings.is_empty() {
            return profile;
        }

        let avg = readings.iter().sum::<f64>() / readings.len() as f64;
        let variability = if readings.len() > 1 && avg > 0.0 {
            crate::stats::sample_stddev(&readings) / avg * 100.0
        } else {
            0.0
        };

        let trend = match (m_0_1, m_9_27) {
            (Some(surface), Some(deep)) if surface > deep + 0.05 => MoistureTrend::WetterAtSurface,
            (Some(surface), Some(deep)) if deep > surface + 0.05 => MoistureTrend::DrierAtSurface,
            (Some(_), Some(_)) => MoistureTrend::Uniform,
            _ => MoistureTrend::Unknown,
        };

        let dryness = if avg > 0.0 {
            ((0.35 - avg) / 0.35 * 100.0).clamp(0.0, 100.0)
        } else {
            100.0
        };

        profile.avg_moisture = Some(round3(avg));
        profile.moisture_variability = Some(round1(variability.clamp(0.0, 100.0)));
        profile.moisture_trend = Some(trend);
        profile.dryness_index = Some(round1(dryness));
        profile
    }
}

/// Result of the soil-snapshot operation.
#[derive(Debug, Clone, Serialize)]
pub struct SoilSnapshot {
    pub location: Coordinate,
    pub soil: SoilProfile,
    pub timestamp: String,
}

/// Multi-year seasonal baseline built from the daily archive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalHistoricalStats {
    pub season_name: String,
    /// Successful historical fetches backing these numbers; a data-quality
    /// signal, not a calendar-year count.
    pub years_analyzed: u32,
    pub temp_avg_historical: Option<f64>,
    pub temp_max_historical: Option<f64>,
    pub temp_min_historical: Option<f64>,
    pub temp_stddev: Option<f64>,
    pub total_precip_historical: Option<f64>,
    pub avg_daily_precip: Option<f64>,
    pub precip_stddev: Option<f64>,
    pub max_dry_spell_days: Option<u32>,
    pub avg_soil_moisture_historical: Option<f64>,
    pub soil_moisture_stddev: Option<f64>,
    pub avg_et0_historical: Option<f64>,
    pub avg_gdd_per_day: Option<f64>,
    pub total_gdd_historical: Option<f64>,
}

/// Live readings against the historical baseline. A delta or percentile is
/// only populated when the baseline it was computed against exists.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeasonalComparison {
    pub current_temp_vs_historical: Option<f64>,
    pub current_precip_vs_historical: Option<f64>,
    pub current_soil_moisture_vs_historical: Option<f64>,
    pub temp_percentile: Option<f64>,
    pub precip_percentile: Option<f64>,
    pub anomaly_flags: Vec<AnomalyFlag>,
}

/// How much of the requested upstream data actually arrived.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataQuality {
    pub historical_fetches: u32,
    pub total_attempts: u32,
    pub current_data: bool,
    pub soil_data: bool,
}

/// The full historical-analysis result.
#[derive(Debug, Clone, Serialize)]
pub struct HistoricalDataset {
    pub location: Coordinate,
    pub relevant_season: Season,
    pub season_context: SeasonContext,
    pub analysis_period: String,
    pub historical_stats: SeasonalHistoricalStats,
    pub seasonal_comparison: SeasonalComparison,
    pub timestamp: String,
    pub data_quality: DataQuality,
}
