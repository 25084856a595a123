//! Frozen meteorological threshold tables.
//!
//! Every band edge, weight, and cap used by the analyzers lives here so the
//! tuning surface is one screen of constants. Pressure values are sea-level
//! inHg, speeds mph, rain rates in/h, temperatures °F unless noted.

use crate::core_types::Condition;

// ============================================================================
// PRESSURE BANDS (sea-level inHg)
// ============================================================================

/// Above this the pressure system is classified very high.
pub const PRESSURE_VERY_HIGH: f64 = 30.20;
/// Above this (up to very high) the system is high.
pub const PRESSURE_HIGH: f64 = 30.00;
/// Lower edge of the normal band; `[PRESSURE_NORMAL_LOW, PRESSURE_VERY_HIGH]`
/// spans normal and high.
pub const PRESSURE_NORMAL_LOW: f64 = 29.80;
/// Below `PRESSURE_NORMAL_LOW` down to here is low.
pub const PRESSURE_VERY_LOW: f64 = 29.50;
/// Below `PRESSURE_VERY_LOW` down to here is very low; anything lower is
/// extremely low.
pub const PRESSURE_EXTREMELY_LOW: f64 = 29.20;

/// Threshold shift per meter of elevation when classifying station pressure
/// directly: ≈1 hPa per 8 m, expressed in inHg.
pub const PRESSURE_SHIFT_INHG_PER_M: f64 = 1.0 / (8.0 * 33.8639);

// ============================================================================
// WIND SCALE (mph)
// ============================================================================

/// Below this the air is calm.
pub const WIND_CALM: f64 = 1.0;
/// At or above this the wind is strong (also the classifier's windy/severe
/// wind gate).
pub const WIND_STRONG: f64 = 19.0;
/// At or above this the wind is gale force.
pub const WIND_GALE: f64 = 32.0;

/// Gust factor above which gusts are notable.
pub const GUST_FACTOR_GUSTY: f64 = 1.5;
/// Gust factor above which gusts are pronounced.
pub const GUST_FACTOR_VERY_GUSTY: f64 = 2.0;
/// Gust factor indicating severe turbulence.
pub const GUST_FACTOR_SEVERE: f64 = 3.0;

// ============================================================================
// PRECIPITATION INTENSITY (in/h)
// ============================================================================

/// Rain rate above which precipitation is considered active.
pub const RAIN_ACTIVE: f64 = 0.05;
/// Rain rate for the heavy-rain branch of the lightning test.
pub const RAIN_HEAVY: f64 = 0.1;
/// Rain rate at or above which the condition is pouring.
pub const RAIN_POURING: f64 = 0.25;

/// Temperature at or below which active precipitation is snow (°F).
pub const SNOW_TEMP_F: f64 = 32.0;

// ============================================================================
// CLOUD-COVER BANDS (%)
// ============================================================================

/// Cloud cover at or below this reads sunny.
pub const CLOUD_SUNNY_MAX: f64 = 30.0;
/// Cloud cover at or below this reads partly cloudy.
pub const CLOUD_PARTLY_MAX: f64 = 60.0;

/// Largest cloud-cover move permitted between consecutive updates.
pub const CLOUD_MAX_STEP: f64 = 30.0;

// ============================================================================
// FOG SCORING
// ============================================================================

/// Humidity floor below which fog scoring returns 0 immediately.
pub const FOG_HUMIDITY_PRECONDITION: f64 = 88.0;
/// Score at or above which fog is dense.
pub const FOG_DENSE: i32 = 70;
/// Score at or above which fog is moderate.
pub const FOG_MODERATE: i32 = 55;
/// Score at or above which fog is light, provided humidity ≥ 95.
pub const FOG_LIGHT: i32 = 45;
/// Humidity required alongside a light-band score.
pub const FOG_LIGHT_HUMIDITY: f64 = 95.0;

// ============================================================================
// HYSTERESIS LIMITS
// ============================================================================

/// Condition history retention window, hours.
pub const CONDITION_HISTORY_HOURS: i64 = 24;
/// Recent-occurrence lookback, hours.
pub const CONDITION_RECENT_HOURS: i64 = 1;
/// Cloud-cover delta needed for an adjacent-tier transition.
pub const HYSTERESIS_ADJACENT_DELTA: f64 = 15.0;
/// Cloud-cover delta needed for a non-adjacent transition.
pub const HYSTERESIS_JUMP_DELTA: f64 = 25.0;

// ============================================================================
// TRENDS STORE
// ============================================================================

/// Trend history retention, hours.
pub const TRENDS_RETENTION_HOURS: i64 = 168;
/// Minimum samples for a least-squares trend.
pub const TREND_MIN_SAMPLES: usize = 3;

// ============================================================================
// STORM SCORING
// ============================================================================

/// Storm probability at or above which risk is severe.
pub const STORM_SEVERE: f64 = 70.0;
/// Storm probability at or above which risk is elevated.
pub const STORM_ELEVATED: f64 = 40.0;

// ============================================================================
// PER-CONDITION FORECAST TABLES
// ============================================================================

/// Canonical daily precipitation for a forecast condition, millimeters.
#[must_use]
pub fn canonical_precip_mm(condition: Condition) -> f64 {
    match condition {
        Condition::Rainy => 2.0,
        Condition::Pouring => 8.0,
        Condition::LightningRainy => 10.0,
        Condition::Snowy => 3.0,
        Condition::Lightning => 1.0,
        Condition::Cloudy => 0.3,
        Condition::Fog => 0.1,
        Condition::Sunny
        | Condition::PartlyCloudy
        | Condition::ClearNight
        | Condition::PartlyCloudyNight
        | Condition::Windy => 0.0,
    }
}

/// Relative humidity a condition converges toward, percent.
#[must_use]
pub fn target_humidity_pct(condition: Condition) -> f64 {
    match condition {
        Condition::Fog => 98.0,
        Condition::Pouring | Condition::LightningRainy => 90.0,
        Condition::Rainy | Condition::Snowy => 85.0,
        Condition::Lightning => 80.0,
        Condition::Cloudy => 70.0,
        Condition::PartlyCloudy | Condition::PartlyCloudyNight => 60.0,
        Condition::Windy => 55.0,
        Condition::Sunny | Condition::ClearNight => 45.0,
    }
}
