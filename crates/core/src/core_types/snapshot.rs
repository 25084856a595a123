//! Raw sensor snapshot: the input record of one observation.
//!
//! The snapshot is a record of optionals; analyzers branch on availability
//! rather than on sensor subtypes. Each dimensioned field carries its origin
//! unit and is canonicalized to Imperial before any analysis runs.

use crate::core_types::units::{
    LengthUnit, PressureUnit, RainRateUnit, Reading, SpeedUnit, TemperatureUnit,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Binary rain sensor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RainState {
    Wet,
    Dry,
}

/// One raw observation from the station's sensor suite.
///
/// `outdoor_temp` is required; `humidity` is required unless an external
/// `dewpoint` is supplied. Everything else is optional and its absence
/// degrades the inference rather than failing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorSnapshot {
    /// Observation timestamp; drives all time reasoning in the core.
    pub timestamp: DateTime<Utc>,

    pub outdoor_temp: Option<Reading<TemperatureUnit>>,
    pub humidity: Option<f64>,

    /// Externally measured dewpoint; supersedes the Magnus computation.
    #[serde(default)]
    pub dewpoint: Option<Reading<TemperatureUnit>>,

    /// Station pressure unless `pressure_is_sea_level` says otherwise.
    #[serde(default)]
    pub pressure: Option<Reading<PressureUnit>>,
    /// Hint that `pressure` is already a sea-level value.
    #[serde(default)]
    pub pressure_is_sea_level: bool,

    #[serde(default)]
    pub wind_speed: Option<Reading<SpeedUnit>>,
    #[serde(default)]
    pub wind_gust: Option<Reading<SpeedUnit>>,
    /// Meteorological bearing, degrees clockwise from north.
    #[serde(default)]
    pub wind_direction_deg: Option<f64>,

    #[serde(default)]
    pub rain_rate: Option<Reading<RainRateUnit>>,
    #[serde(default)]
    pub rain_state: Option<RainState>,

    #[serde(default)]
    pub solar_radiation_wm2: Option<f64>,
    #[serde(default)]
    pub solar_lux: Option<f64>,
    #[serde(default)]
    pub uv_index: Option<f64>,
    /// Supplied solar elevation; estimated from radiation when absent.
    #[serde(default)]
    pub solar_elevation_deg: Option<f64>,

    /// Station altitude; 0 (or absent) means "do not correct".
    #[serde(default)]
    pub altitude: Option<Reading<LengthUnit>>,
}

/// Snapshot canonicalized to Imperial internals.
///
/// Produced once per `observe` call; every analyzer consumes this form.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalSnapshot {
    pub timestamp: DateTime<Utc>,
    pub temp_f: f64,
    pub humidity_pct: Option<f64>,
    pub external_dewpoint_f: Option<f64>,
    pub pressure_inhg: Option<f64>,
    pub pressure_is_sea_level: bool,
    pub wind_speed_mph: f64,
    pub wind_gust_mph: f64,
    pub wind_direction_deg: Option<f64>,
    pub rain_rate_inh: f64,
    pub rain_state: Option<RainState>,
    pub solar_radiation_wm2: Option<f64>,
    pub solar_lux: Option<f64>,
    pub uv_index: Option<f64>,
    pub solar_elevation_deg: Option<f64>,
    pub altitude_m: f64,
}

impl SensorSnapshot {
    /// Canonicalize all readings to Imperial. Returns `None` when
    /// `outdoor_temp` is missing; completeness of the humidity/dewpoint pair
    /// is checked by the orchestrator, which owns the error taxonomy.
    #[must_use]
    pub fn canonicalize(&self, configured_altitude_m: f64) -> Option<CanonicalSnapshot> {
        let temp_f = self.outdoor_temp.as_ref()?.fahrenheit();
        Some(CanonicalSnapshot {
            timestamp: self.timestamp,
            temp_f,
            humidity_pct: self.humidity,
            external_dewpoint_f: self.dewpoint.as_ref().map(Reading::fahrenheit),
            pressure_inhg: self.pressure.as_ref().map(Reading::inhg),
            pressure_is_sea_level: self.pressure_is_sea_level,
            wind_speed_mph: self.wind_speed.as_ref().map_or(0.0, Reading::mph),
            wind_gust_mph: self.wind_gust.as_ref().map_or(0.0, Reading::mph),
            wind_direction_deg: self.wind_direction_deg,
            rain_rate_inh: self
                .rain_rate
                .as_ref()
                .map_or(0.0, Reading::inches_per_hour),
            rain_state: self.rain_state,
            solar_radiation_wm2: self.solar_radiation_wm2,
            solar_lux: self.solar_lux,
            uv_index: self.uv_index,
            solar_elevation_deg: self.solar_elevation_deg,
            altitude_m: self
                .altitude
                .as_ref()
                .map_or(configured_altitude_m, Reading::meters),
        })
    }
}
