//! Pressure-system banding, pressure trends, storm probability, and wind
//! character.
//!
//! Pressure is banded from the sea-level value against the frozen table in
//! [`crate::constants`]; band edges are half-open so boundary readings
//! classify deterministically. Storm probability is an additive score over
//! trend, band, persistence, wind, and precipitation terms, clamped to
//! [0, 100].

use crate::analysis::trends::{Trend, TrendsStore, WindDirectionStats};
use crate::constants::{
    GUST_FACTOR_GUSTY, GUST_FACTOR_SEVERE, GUST_FACTOR_VERY_GUSTY, PRESSURE_EXTREMELY_LOW,
    PRESSURE_HIGH, PRESSURE_NORMAL_LOW, PRESSURE_VERY_HIGH, PRESSURE_VERY_LOW, RAIN_POURING,
    STORM_ELEVATED, STORM_SEVERE, WIND_CALM, WIND_GALE, WIND_STRONG,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Guard divisor for the gust factor when the sustained wind is near zero.
const WIND_EPSILON_MPH: f64 = 0.1;

/// Synoptic pressure regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PressureSystem {
    VeryHigh,
    High,
    Normal,
    Low,
    VeryLow,
    ExtremelyLow,
}

impl PressureSystem {
    /// Band a sea-level pressure (inHg).
    #[must_use]
    pub fn from_sea_level_inhg(pressure: f64) -> Self {
        if pressure > PRESSURE_VERY_HIGH {
            PressureSystem::VeryHigh
        } else if pressure > PRESSURE_HIGH {
            PressureSystem::High
        } else if pressure >= PRESSURE_NORMAL_LOW {
            PressureSystem::Normal
        } else if pressure >= PRESSURE_VERY_LOW {
            PressureSystem::Low
        } else if pressure >= PRESSURE_EXTREMELY_LOW {
            PressureSystem::VeryLow
        } else {
            PressureSystem::ExtremelyLow
        }
    }

    /// Whether this band is at or below the low regime.
    #[must_use]
    pub fn is_low_or_below(self) -> bool {
        matches!(
            self,
            PressureSystem::Low | PressureSystem::VeryLow | PressureSystem::ExtremelyLow
        )
    }
}

/// Beaufort-style sustained wind class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindClass {
    Calm,
    Light,
    Strong,
    Gale,
}

impl WindClass {
    /// Classify a sustained wind speed (mph).
    #[must_use]
    pub fn from_mph(speed: f64) -> Self {
        if speed < WIND_CALM {
            WindClass::Calm
        } else if speed < WIND_STRONG {
            WindClass::Light
        } else if speed < WIND_GALE {
            WindClass::Strong
        } else {
            WindClass::Gale
        }
    }
}

/// Gustiness classification from the gust factor and absolute gust speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GustClass {
    None,
    Gusty,
    VeryGusty,
    SevereTurbulence,
}

impl GustClass {
    /// Classify from gust factor and gust speed (mph). Severe turbulence is
    /// either a 3× factor with a meaningful gust or any gust above 40 mph.
    #[must_use]
    pub fn classify(gust_factor: f64, gust_mph: f64) -> Self {
        if (gust_factor > GUST_FACTOR_SEVERE && gust_mph > 20.0) || gust_mph > 40.0 {
            GustClass::SevereTurbulence
        } else if gust_factor > GUST_FACTOR_VERY_GUSTY && gust_mph > 15.0 {
            GustClass::VeryGusty
        } else if gust_factor > GUST_FACTOR_GUSTY && gust_mph > 10.0 {
            GustClass::Gusty
        } else {
            GustClass::None
        }
    }

    /// At least very gusty.
    #[must_use]
    pub fn is_very_gusty(self) -> bool {
        matches!(self, GustClass::VeryGusty | GustClass::SevereTurbulence)
    }
}

/// Thresholded storm-probability classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StormRisk {
    None,
    Elevated,
    Severe,
}

impl StormRisk {
    #[must_use]
    pub fn from_probability(probability: f64) -> Self {
        if probability >= STORM_SEVERE {
            StormRisk::Severe
        } else if probability >= STORM_ELEVATED {
            StormRisk::Elevated
        } else {
            StormRisk::None
        }
    }
}

/// Combined pressure and wind analysis for one observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressureWindAnalysis {
    pub pressure_system: Option<PressureSystem>,
    pub trend_3h: Trend,
    pub trend_24h: Trend,
    /// Storm probability in [0, 100].
    pub storm_probability: f64,
    pub storm_risk: StormRisk,
    pub wind_class: WindClass,
    pub gust_factor: f64,
    pub gust_class: GustClass,
    pub direction: Option<WindDirectionStats>,
}

/// Analyze pressure and wind for one observation.
///
/// # Arguments
/// * `sea_level_inhg` - Altitude-corrected pressure, when a sensor exists
/// * `wind_mph` / `gust_mph` - Sustained and gust speeds
/// * `rain_rate_inh` - Current rain rate, feeds the storm score
/// * `trends` - History store for slopes and persistence
/// * `now` - Observation timestamp
#[must_use]
pub fn analyze(
    sea_level_inhg: Option<f64>,
    wind_mph: f64,
    gust_mph: f64,
    rain_rate_inh: f64,
    trends: &TrendsStore,
    now: DateTime<Utc>,
) -> PressureWindAnalysis {
    let pressure_system = sea_level_inhg.map(PressureSystem::from_sea_level_inhg);
    let trend_3h = trends.pressure_trend(now, Duration::hours(3));
    let trend_24h = trends.pressure_trend(now, Duration::hours(24));

    let gust_factor = gust_mph / wind_mph.max(WIND_EPSILON_MPH);
    let gust_class = GustClass::classify(gust_factor, gust_mph);
    let wind_class = WindClass::from_mph(wind_mph);

    let storm_probability = storm_probability(
        pressure_system,
        trend_3h,
        trend_24h,
        gust_factor,
        gust_mph,
        wind_mph,
        rain_rate_inh,
        trends,
        now,
    );

    PressureWindAnalysis {
        pressure_system,
        trend_3h,
        trend_24h,
        storm_probability,
        storm_risk: StormRisk::from_probability(storm_probability),
        wind_class,
        gust_factor,
        gust_class,
        direction: trends.wind_direction_stats(now, Duration::hours(3)),
    }
}

/// Additive storm score, clamped to [0, 100].
///
/// Terms: falling 3-h pressure (8 points per 0.01 inHg/h, cap 40), falling
/// 24-h pressure (10 points per 0.005 inHg/h, cap 20), very-low band +20 /
/// extremely-low +40, gust factor above 2 +15, sustained wind at or above
/// strong +10, pouring-grade rain +15, gusts above 35 mph +10, and +2 per
/// hour of sustained sub-29.50 pressure over the last 6 h (cap 12).
#[allow(clippy::too_many_arguments)]
fn storm_probability(
    pressure_system: Option<PressureSystem>,
    trend_3h: Trend,
    trend_24h: Trend,
    gust_factor: f64,
    gust_mph: f64,
    wind_mph: f64,
    rain_rate_inh: f64,
    trends: &TrendsStore,
    now: DateTime<Utc>,
) -> f64 {
    let mut points = 0.0;

    if let Some(slope) = trend_3h.per_hour() {
        if slope < 0.0 {
            points += (-slope / 0.01 * 8.0).min(40.0);
        }
    }
    if let Some(slope) = trend_24h.per_hour() {
        if slope < 0.0 {
            points += (-slope / 0.005 * 10.0).min(20.0);
        }
    }

    match pressure_system {
        Some(PressureSystem::VeryLow) => points += 20.0,
        Some(PressureSystem::ExtremelyLow) => points += 40.0,
        _ => {}
    }

    if gust_factor > GUST_FACTOR_VERY_GUSTY {
        points += 15.0;
    }
    if wind_mph >= WIND_STRONG {
        points += 10.0;
    }
    if rain_rate_inh >= RAIN_POURING {
        points += 15.0;
    }
    if gust_mph > 35.0 {
        points += 10.0;
    }

    let sustained_hours =
        trends.sustained_pressure_below(now, Duration::hours(6), PRESSURE_VERY_LOW);
    points += (sustained_hours * 2.0).min(12.0);

    points.clamp(0.0, 100.0)
}
