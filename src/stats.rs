//! Seasonal statistics over daily weather series.
//!
//! Pure, stateless reductions: no I/O, no shared state. Inputs are series
//! that have already been filtered to the relevant season's months with null
//! days dropped, so every slice element is an observed reading.

use serde::Serialize;

/// Minimum number of daily readings for seasonal statistics to be meaningful.
/// Below this the whole result is withheld rather than silently misleading.
const MIN_SAMPLE_DAYS: usize = 7;

/// Precipitation below this many millimetres counts as a dry day.
const DRY_DAY_THRESHOLD_MM: f64 = 1.0;

/// Base temperature (°C) for growing-degree-day accumulation.
const GDD_BASE_TEMP_C: f64 = 10.0;

/// Descriptive statistics for a seasonal temperature series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TemperatureStats {
    pub avg: Option<f64>,
    pub max: Option<f64>,
    pub min: Option<f64>,
    pub stddev: Option<f64>,
}

/// Descriptive statistics for a seasonal precipitation series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PrecipitationStats {
    pub total: Option<f64>,
    pub avg_daily: Option<f64>,
    pub stddev: Option<f64>,
    /// Longest run of consecutive days below [`DRY_DAY_THRESHOLD_MM`].
    pub max_dry_spell: Option<u32>,
}

/// Deviations of live readings from the historical seasonal baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyFlag {
    SignificantlyWarmerThanHistorical,
    SignificantlyCoolerThanHistorical,
    MuchDrierThanHistorical,
    MuchWetterThanHistorical,
    SoilDrierThanHistorical,
    SoilWetterThanHistorical,
}

/// Rounds to two decimal places, the precision used for reported statistics.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Rounds to one decimal place (percentiles, indices).
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Rounds to three decimal places (soil moisture fractions).
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (N-1 denominator). A single observation has no
/// spread, so it yields 0.0 rather than a division by zero.
pub(crate) fn sample_stddev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let avg = mean(values);
    let variance =
        values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Reduces a seasonal temperature series to mean/max/min/stddev.
///
/// Fewer than [`MIN_SAMPLE_DAYS`] readings yields an all-`None` result, not a
/// partial one.
pub fn temperature_stats(daily_temps: &[f64]) -> TemperatureStats {
    if daily_temps.len() < MIN_SAMPLE_DAYS {
        return TemperatureStats::default();
    }

    TemperatureStats {
        avg: Some(round2(mean(daily_temps))),
        max: Some(round2(daily_temps.iter().cloned().fold(f64::MIN, f64::max))),
        min: Some(round2(daily_temps.iter().cloned().fold(f64::MAX, f64::min))),
        stddev: Some(round2(sample_stddev(daily_temps))),
    }
}

/// Reduces a seasonal precipitation series to totals and the longest dry spell.
pub fn precipitation_stats(daily_precip: &[f64]) -> PrecipitationStats {
    if daily_precip.is_empty() {
        return PrecipitationStats::default();
    }

    let mut max_dry_spell: u32 = 0;
    let mut current_dry_spell: u32 = 0;
    for &p in daily_precip {
        if p < DRY_DAY_THRESHOLD_MM {
            current_dry_spell += 1;
            max_dry_spell = max_dry_spell.max(current_dry_spell);
        } else {
            current_dry_spell = 0;
        }
    }

    PrecipitationStats {
        total: Some(round2(daily_precip.iter().sum())),
        avg_daily: Some(round2(mean(daily_precip))),
        stddev: Some(round2(sample_stddev(daily_precip))),
        max_dry_spell: Some(max_dry_spell),
    }
}

/// Inclusive percentile rank: the percentage of historical values at or below
/// `value`. `None` when there is no historical distribution to rank against.
pub fn percentile_rank(value: f64, historical_values: &[f64]) -> Option<f64> {
    if historical_values.is_empty() {
        return None;
    }
    let at_or_below = historical_values.iter().filter(|&&v| v <= value).count();
    Some(round1(
        at_or_below as f64 / historical_values.len() as f64 * 100.0,
    ))
}

/// Accumulates growing degree days over `(daily_max, daily_min)` pairs.
///
/// GDD per day is `max(0, (tmax + tmin) / 2 - 10°C)`. Returns
/// `(total, per_day_average)`, or `None` for an empty series.
pub fn growing_degree_days(daily_minmax: &[(f64, f64)]) -> Option<(f64, f64)> {
    if daily_minmax.is_empty() {
        return None;
    }
    let total: f64 = daily_minmax
        .iter()
        .map(|&(tmax, tmin)| ((tmax + tmin) / 2.0 - GDD_BASE_TEMP_C).max(0.0))
        .sum();
    Some((round2(total), round2(total / daily_minmax.len() as f64)))
}

/// Compares live readings against the historical baseline and emits anomaly
/// flags.
///
/// Each category is skipped silently when any of its inputs is missing (or,
/// for the ratio-based checks, when the denominator is not positive). Flags
/// are additive and emitted in temperature, precipitation, soil order.
pub fn detect_anomalies(
    current_temp: Option<f64>,
    current_precip: Option<f64>,
    current_soil: Option<f64>,
    hist_temp_avg: Option<f64>,
    hist_temp_std: Option<f64>,
    hist_precip_avg: Option<f64>,
    hist_soil_avg: Option<f64>,
) -> Vec<AnomalyFlag> {
    let mut flags = Vec::new();

    if let (Some(temp), Some(avg), Some(std)) = (current_temp, hist_temp_avg, hist_temp_std) {
        if std > 0.0 {
            let z = (temp - avg) / std;
            if z > 1.5 {
                flags.push(AnomalyFlag::SignificantlyWarmerThanHistorical);
            } else if z < -1.5 {
                flags.push(AnomalyFlag::SignificantlyCoolerThanHistorical);
            }
        }
    }

    if let (Some(precip), Some(avg)) = (current_precip, hist_precip_avg) {
        if avg > 0.0 {
            let pct_diff = (precip - avg) / avg * 100.0;
            if pct_diff <= -50.0 {
                flags.push(AnomalyFlag::MuchDrierThanHistorical);
            } else if pct_diff >= 50.0 {
                flags.push(AnomalyFlag::MuchWetterThanHistorical);
            }
        }
    }

    if let (Some(soil), Some(avg)) = (current_soil, hist_soil_avg) {
        let diff = soil - avg;
        if diff < -0.1 {
            flags.push(AnomalyFlag::SoilDrierThanHistorical);
        } else if diff > 0.1 {
            flags.push(AnomalyFlag::SoilWetterThanHistorical);
        }
    }

    flags
}
