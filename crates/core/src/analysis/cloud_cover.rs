//! Cloud-cover estimation from the luminous sensor suite.
//!
//! Solar radiation is the primary signal, illuminance secondary, UV index
//! tertiary. Above 15° solar elevation the analyzer compares measurements
//! against the astronomically expected clear-sky values; below that, or in
//! low light, it falls back to graded absolute thresholds. Four adjustments
//! run in a fixed order: luminance calibration, pressure-trend nudge,
//! historical clear-sky bias, and inter-update damping.

use crate::analysis::pressure_wind::PressureSystem;
use crate::analysis::trends::{Trend, TrendsStore};
use crate::constants::CLOUD_MAX_STEP;
use crate::physics::solar::{
    atmospheric_transmission, air_mass, solar_constant_variation, SolarContext, LOW_ELEVATION_DEG,
};
use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Full-scale illuminance for the lux-based estimate (direct summer sun).
const LUX_FULL_SCALE: f64 = 100_000.0;
/// Full-scale UV index for the UV-based estimate.
const UV_FULL_SCALE: f64 = 11.0;
/// Radiation below which the solar estimate is unusable (W/m²).
const LOW_RADIATION_WM2: f64 = 10.0;

/// Low-light gate for the absolute fallback regime.
const LOW_LIGHT_RADIATION_WM2: f64 = 50.0;
const LOW_LIGHT_LUX: f64 = 5000.0;

/// Pressure-trend nudge saturates at ±10 points for |trend| ≥ 0.02 inHg/h.
const TREND_NUDGE_SCALE: f64 = 500.0;
const TREND_NUDGE_MAX: f64 = 10.0;

/// Rising 3-h trend counted toward the clear-sky bias (inHg/h).
const BIAS_RISING_TREND: f64 = 0.005;

/// Cloud-cover result for one observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CloudCoverAnalysis {
    /// Final cloud cover in [0, 100], damped against the previous update.
    pub pct: f64,
    /// Post-adjustment value before inter-update damping; the hysteresis
    /// filter compares this against the previous cover.
    pub unbounded_pct: f64,
    /// Expected clear-sky irradiance at the configured zenith calibration,
    /// when the relative regime ran (W/m²).
    pub expected_wm2: Option<f64>,
    /// True when the graded absolute table classified this update.
    pub fallback_regime: bool,
    /// True when no luminous sensor contributed a usable signal.
    pub degraded: bool,
}

/// Calibration inputs owned by the station configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CloudCalibration {
    /// Validated zenith maximum radiation (W/m²).
    pub zenith_max_wm2: f64,
    /// User luminance multiplier, already clamped to [0.1, 5.0].
    pub luminance_multiplier: f64,
}

/// Analyze cloud cover for one observation.
///
/// `radiation_wm2` should be the smoothed (moving-average) value once enough
/// samples exist. `previous_pct` is the prior update's final cover, used for
/// the ±30-point inter-update damping.
#[allow(clippy::too_many_arguments)]
#[must_use]
pub fn analyze(
    radiation_wm2: Option<f64>,
    lux: Option<f64>,
    uv_index: Option<f64>,
    solar: &SolarContext,
    calibration: CloudCalibration,
    trend_3h: Trend,
    pressure_system: Option<PressureSystem>,
    trends: &TrendsStore,
    now: DateTime<Utc>,
    previous_pct: Option<f64>,
) -> CloudCoverAnalysis {
    // Adjustment 1: luminance multiplier, attenuated toward the zenith.
    let elevation_factor = (1.0 - solar.elevation_deg / 90.0).max(0.0);
    let effective_multiplier =
        1.0 + (calibration.luminance_multiplier - 1.0) * elevation_factor;
    let radiation = radiation_wm2.map(|r| r * effective_multiplier);
    let lux = lux.map(|l| l * effective_multiplier);

    let degraded = radiation.is_none() && lux.is_none() && uv_index.is_none();
    if degraded {
        // Nothing to measure with; hold the previous estimate.
        let held = previous_pct.unwrap_or(50.0);
        return CloudCoverAnalysis {
            pct: held,
            unbounded_pct: held,
            expected_wm2: None,
            fallback_regime: true,
            degraded: true,
        };
    }

    let rad = radiation.unwrap_or(0.0);
    let lx = lux.unwrap_or(0.0);
    let uv = uv_index.unwrap_or(0.0);

    let low_light = rad < LOW_LIGHT_RADIATION_WM2 && lx < LOW_LIGHT_LUX;
    let fallback_regime = solar.elevation_deg < LOW_ELEVATION_DEG || low_light;

    let (mut cover, expected_wm2) = if fallback_regime {
        (
            absolute_fallback(rad, lx, uv)
                .unwrap_or_else(|| weighted_low_radiation(lx, uv, uv_index.is_some())),
            None,
        )
    } else {
        let expected = expected_irradiance(&calibration, solar);
        (relative_estimate(rad, lx, uv, uv_index.is_some(), lux.is_some(), expected), Some(expected))
    };

    // Adjustment 2: falling pressure adds cloud, rising pressure removes it.
    if let Some(slope) = trend_3h.per_hour() {
        cover += (-slope * TREND_NUDGE_SCALE).clamp(-TREND_NUDGE_MAX, TREND_NUDGE_MAX);
    }

    // Adjustment 3: recent clear weather argues against a sudden overcast
    // reading, but only when this update came from the fallback regime (or a
    // degraded sensor) where the estimate is weakest.
    if fallback_regime {
        cover -= clear_sky_bias(trends, now, pressure_system, trend_3h);
    }

    let unbounded = cover.clamp(0.0, 100.0);

    // Adjustment 4: never move more than 30 points between updates.
    let pct = match previous_pct {
        Some(prev) => prev + (unbounded - prev).clamp(-CLOUD_MAX_STEP, CLOUD_MAX_STEP),
        None => unbounded,
    };

    CloudCoverAnalysis {
        pct: pct.clamp(0.0, 100.0),
        unbounded_pct: unbounded,
        expected_wm2,
        fallback_regime,
        degraded: false,
    }
}

/// Expected irradiance at the configured zenith calibration.
fn expected_irradiance(calibration: &CloudCalibration, solar: &SolarContext) -> f64 {
    let variation = solar_constant_variation(solar.day_of_year);
    let transmission = atmospheric_transmission(air_mass(solar.elevation_deg));
    calibration.zenith_max_wm2 * variation * transmission * solar.elevation_deg.to_radians().sin()
}

/// Relative regime: per-sensor cover estimates combined by reliability.
fn relative_estimate(
    rad: f64,
    lx: f64,
    uv: f64,
    uv_present: bool,
    lux_present: bool,
    expected_wm2: f64,
) -> f64 {
    let cloud_solar = (100.0 - 100.0 * rad / expected_wm2.max(1.0)).clamp(0.0, 100.0);
    let cloud_lux = (100.0 - 100.0 * lx / LUX_FULL_SCALE).clamp(0.0, 100.0);
    let cloud_uv = (100.0 - 100.0 * uv / UV_FULL_SCALE).clamp(0.0, 100.0);

    let uv_valid = uv_present && uv > 0.0;

    if rad < LOW_RADIATION_WM2 {
        if lux_present && lx < 1000.0 && uv_valid {
            return cloud_uv;
        }
        return weighted_low_radiation(lx, uv, uv_present);
    }

    if lux_present && uv_valid {
        0.80 * cloud_solar + 0.15 * cloud_lux + 0.05 * cloud_uv
    } else if lux_present {
        0.85 * cloud_solar + 0.15 * cloud_lux
    } else {
        cloud_solar
    }
}

/// Lux-dominant combination for updates with no usable radiation signal.
fn weighted_low_radiation(lx: f64, uv: f64, uv_present: bool) -> f64 {
    let cloud_lux = (100.0 - 100.0 * lx / LUX_FULL_SCALE).clamp(0.0, 100.0);
    let cloud_uv = (100.0 - 100.0 * uv / UV_FULL_SCALE).clamp(0.0, 100.0);
    if uv_present && uv > 0.0 {
        0.9 * cloud_lux + 0.1 * cloud_uv
    } else {
        cloud_lux
    }
}

/// Graded absolute table for twilight and low-light updates.
fn absolute_fallback(rad: f64, lx: f64, uv: f64) -> Option<f64> {
    if rad < 50.0 && lx < 5000.0 && uv == 0.0 {
        Some(85.0)
    } else if rad < 100.0 && lx < 10_000.0 {
        Some(70.0)
    } else if rad < 200.0 && lx < 20_000.0 && uv < 1.0 {
        Some(40.0)
    } else {
        None
    }
}

/// Points to subtract when recent history argues the sky is clear.
///
/// Strength is the clear fraction of the last 6 h plus boosts for a high
/// pressure system and a rising 3-h trend, clamped to [0, 1]. A strength
/// above 0.7 removes up to 50 points, above 0.5 up to 30. During local
/// morning hours (06:00–09:59) a strength above 0.5 is halved, floored at
/// 0.5, so yesterday's clear evening does not erase a genuinely overcast
/// morning.
fn clear_sky_bias(
    trends: &TrendsStore,
    now: DateTime<Utc>,
    pressure_system: Option<PressureSystem>,
    trend_3h: Trend,
) -> f64 {
    let clear_pct = trends.clear_fraction(now, Duration::hours(6));
    let high_pressure_boost = match pressure_system {
        Some(PressureSystem::High | PressureSystem::VeryHigh) => 0.2,
        _ => 0.0,
    };
    let rising_boost = match trend_3h.per_hour() {
        Some(s) if s > BIAS_RISING_TREND => 0.15,
        _ => 0.0,
    };
    let mut strength = (clear_pct + high_pressure_boost + rising_boost).clamp(0.0, 1.0);

    let morning = (6..10).contains(&now.hour());
    if morning && strength > 0.5 {
        strength = (strength * 0.5).max(0.5);
    }

    let bias = if strength > 0.7 {
        50.0 * strength
    } else if strength > 0.5 {
        30.0 * strength
    } else {
        0.0
    };
    if bias > 0.0 {
        debug!(strength, bias, "clear-sky bias applied to fallback estimate");
    }
    bias
}
