//! Station configuration.
//!
//! Configuration is a plain value handed to [`StationState::new`]
//! (crate::pipeline::state::StationState); there is no global registry and no
//! mutation after construction. Calibration fields are validated lazily so a
//! misconfigured station still observes, with a warning, rather than failing.

use crate::analysis::cloud_cover::CloudCalibration;
use crate::core_types::UnitSystem;
use crate::pipeline::error::Warning;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Valid band for the configured zenith maximum radiation (W/m²).
pub const ZENITH_MAX_VALID: (f64, f64) = (800.0, 2000.0);
/// Fallback zenith maximum when the configured value is out of band.
pub const ZENITH_MAX_DEFAULT: f64 = 1000.0;
/// Valid band for the luminance multiplier.
pub const LUMINANCE_VALID: (f64, f64) = (0.1, 5.0);

fn default_sunrise() -> NaiveTime {
    NaiveTime::from_hms_opt(6, 0, 0).expect("static time")
}

fn default_sunset() -> NaiveTime {
    NaiveTime::from_hms_opt(18, 0, 0).expect("static time")
}

fn default_luminance() -> f64 {
    1.0
}

fn default_zenith_max() -> f64 {
    ZENITH_MAX_DEFAULT
}

fn default_solar_window() -> i64 {
    15
}

/// Immutable per-station configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationConfig {
    /// Station altitude (m); 0 disables barometric correction.
    #[serde(default)]
    pub altitude_m: f64,

    /// Treat incoming pressure as already sea-level corrected.
    #[serde(default)]
    pub pressure_is_sea_level: bool,

    /// User luminance calibration multiplier; clamped to [0.1, 5.0].
    #[serde(default = "default_luminance")]
    pub luminance_multiplier: f64,

    /// Radiation a perfectly clear zenith sun would read on this sensor.
    #[serde(default = "default_zenith_max")]
    pub zenith_max_radiation_wm2: f64,

    /// Unit system of every emitted value.
    #[serde(default)]
    pub units_out: UnitSystem,

    /// Fallback sunrise for the hourly forecast's daylight arc.
    #[serde(default = "default_sunrise")]
    pub sunrise_default: NaiveTime,

    /// Fallback sunset for the hourly forecast's daylight arc.
    #[serde(default = "default_sunset")]
    pub sunset_default: NaiveTime,

    /// Solar radiation moving-average window (minutes).
    #[serde(default = "default_solar_window")]
    pub solar_avg_window_minutes: i64,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            altitude_m: 0.0,
            pressure_is_sea_level: false,
            luminance_multiplier: default_luminance(),
            zenith_max_radiation_wm2: default_zenith_max(),
            units_out: UnitSystem::default(),
            sunrise_default: default_sunrise(),
            sunset_default: default_sunset(),
            solar_avg_window_minutes: default_solar_window(),
        }
    }
}

impl StationConfig {
    /// Cloud-analyzer calibration after validation. Returns a warning when
    /// the configured zenith maximum is outside the plausible band and the
    /// default was substituted.
    #[must_use]
    pub fn cloud_calibration(&self) -> (CloudCalibration, Option<Warning>) {
        let (lo, hi) = ZENITH_MAX_VALID;
        let configured = self.zenith_max_radiation_wm2;
        let (zenith, warning) = if (lo..=hi).contains(&configured) {
            (configured, None)
        } else {
            (
                ZENITH_MAX_DEFAULT,
                Some(Warning::Calibration {
                    configured_zenith_wm2: configured,
                }),
            )
        };
        let calibration = CloudCalibration {
            zenith_max_wm2: zenith,
            luminance_multiplier: self
                .luminance_multiplier
                .clamp(LUMINANCE_VALID.0, LUMINANCE_VALID.1),
        };
        (calibration, warning)
    }
}
