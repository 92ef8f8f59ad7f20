//! Deserialization structs for Open-Meteo API responses.
//!
//! Open-Meteo returns nested blocks of parallel arrays keyed by variable name,
//! with a `time` array carrying ISO dates at the same indices. Every value
//! array may contain nulls, and whole blocks may be absent, so fields are
//! `Option`/defaulted throughout: absence is data here, not an error.

use chrono::NaiveDate;
use serde::Deserialize;

/// Response body of the forecast endpoint when queried for current conditions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentConditionsResponse {
    pub current: Option<CurrentBlock>,
    pub daily: Option<DailyUvBlock>,
}

/// The `current` block: instantaneous readings, each independently optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentBlock {
    pub temperature_2m: Option<f64>,
    pub relative_humidity_2m: Option<f64>,
    pub precipitation: Option<f64>,
    pub wind_speed_10m: Option<f64>,
    pub wind_direction_10m: Option<f64>,
}

/// The `daily` block of the current-conditions query, holding today's UV peak.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailyUvBlock {
    #[serde(default)]
    pub uv_index_max: Vec<Option<f64>>,
}

/// Response body of the forecast endpoint when queried for hourly soil data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SoilResponse {
    pub hourly: Option<SoilHourlyBlock>,
}

/// Hourly soil arrays: four moisture depth bands and two temperature depths.
/// Only the first (most recent) index of each array is consumed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SoilHourlyBlock {
    #[serde(default)]
    pub soil_temperature_0cm: Vec<Option<f64>>,
    #[serde(default)]
    pub soil_temperature_6cm: Vec<Option<f64>>,
    #[serde(default)]
    pub soil_moisture_0_to_1cm: Vec<Option<f64>>,
    #[serde(default)]
    pub soil_moisture_1_to_3cm: Vec<Option<f64>>,
    #[serde(default)]
    pub soil_moisture_3_to_9cm: Vec<Option<f64>>,
    #[serde(default)]
    pub soil_moisture_9_to_27cm: Vec<Option<f64>>,
}

impl SoilHourlyBlock {
    /// The most recent sample of one variable, `None` when the array is empty
    /// or the leading entry is null.
    pub fn first(values: &[Option<f64>]) -> Option<f64> {
        values.first().copied().flatten()
    }
}

/// Response body of the historical archive endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoricalResponse {
    pub daily: Option<DailyArchiveBlock>,
}

/// Daily archive arrays, parallel-indexed with `time`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailyArchiveBlock {
    #[serde(default)]
    pub time: Vec<NaiveDate>,
    #[serde(default)]
    pub temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    pub temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    pub temperature_2m_mean: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation_sum: Vec<Option<f64>>,
    #[serde(default)]
    pub et0_fao_evapotranspiration: Vec<Option<f64>>,
}
