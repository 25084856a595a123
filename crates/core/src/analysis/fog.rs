//! Multi-factor fog scoring.
//!
//! Five additive factors produce an integer score in [0, 100]:
//!
//! ```text
//! Humidity     0..40   ≥98 → 40; ≥95 → 30; ≥92 → 20; ≥88 → 10
//! Spread (°F)  0..30   ≤0.5 → 30; ≤1.0 → 25; ≤2.0 → 15; ≤3.0 → 5
//! Wind (mph)  -10..15  ≤2 → 15; ≤5 → 10; ≤8 → 5; else −10
//! Solar day    0..15   <50 → 15; <150 → 10; <300 → 5
//! Solar night -5..10   ≤2 → 10; ≤10 → 5; else −5
//! Evaporation  0..5    temp>40 ∧ hum≥95 ∧ spread≤2 → +5
//! ```
//!
//! Scoring requires humidity ≥ 88%; drier air returns zero immediately. In
//! daylight a radiation sanity check guards against false positives: when the
//! measured radiation exceeds half of the theoretical clear sky, whatever is
//! in the air is not fog.

use crate::constants::{
    FOG_DENSE, FOG_HUMIDITY_PRECONDITION, FOG_LIGHT, FOG_LIGHT_HUMIDITY, FOG_MODERATE,
};
use serde::{Deserialize, Serialize};

/// Fog density classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FogClass {
    None,
    Light,
    Moderate,
    Dense,
}

/// Fog assessment for one observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FogAnalysis {
    /// Score in [0, 100].
    pub score: i32,
    pub class: FogClass,
}

impl FogAnalysis {
    const NONE: FogAnalysis = FogAnalysis {
        score: 0,
        class: FogClass::None,
    };

    /// Whether any fog is present.
    #[must_use]
    pub fn is_foggy(self) -> bool {
        self.class != FogClass::None
    }
}

/// Score fog potential for one observation.
///
/// # Arguments
/// * `temp_f` - Air temperature (°F)
/// * `humidity_pct` - Relative humidity
/// * `dewpoint_spread_f` - Temperature minus dewpoint (°F)
/// * `wind_mph` - Sustained wind
/// * `radiation_wm2` - Measured solar radiation, if any
/// * `clear_sky_wm2` - Theoretical clear-sky irradiance for the sanity check
/// * `is_daytime` - Daylight flag from the solar context
#[must_use]
pub fn score(
    temp_f: f64,
    humidity_pct: f64,
    dewpoint_spread_f: f64,
    wind_mph: f64,
    radiation_wm2: Option<f64>,
    clear_sky_wm2: f64,
    is_daytime: bool,
) -> FogAnalysis {
    if humidity_pct < FOG_HUMIDITY_PRECONDITION {
        return FogAnalysis::NONE;
    }

    // Daytime sanity check: strong sun excludes fog outright.
    if is_daytime {
        if let Some(radiation) = radiation_wm2 {
            if clear_sky_wm2 > 0.0 && radiation > 0.5 * clear_sky_wm2 {
                return FogAnalysis::NONE;
            }
        }
    }

    let humidity_factor = if humidity_pct >= 98.0 {
        40
    } else if humidity_pct >= 95.0 {
        30
    } else if humidity_pct >= 92.0 {
        20
    } else {
        10
    };

    let spread_factor = if dewpoint_spread_f <= 0.5 {
        30
    } else if dewpoint_spread_f <= 1.0 {
        25
    } else if dewpoint_spread_f <= 2.0 {
        15
    } else if dewpoint_spread_f <= 3.0 {
        5
    } else {
        0
    };

    let wind_factor = if wind_mph <= 2.0 {
        15
    } else if wind_mph <= 5.0 {
        10
    } else if wind_mph <= 8.0 {
        5
    } else {
        -10
    };

    let radiation = radiation_wm2.unwrap_or(0.0);
    let solar_factor = if is_daytime {
        if radiation < 50.0 {
            15
        } else if radiation < 150.0 {
            10
        } else if radiation < 300.0 {
            5
        } else {
            0
        }
    } else if radiation <= 2.0 {
        10
    } else if radiation <= 10.0 {
        5
    } else {
        -5
    };

    let evaporation_bonus =
        if temp_f > 40.0 && humidity_pct >= 95.0 && dewpoint_spread_f <= 2.0 {
            5
        } else {
            0
        };

    let total = (humidity_factor + spread_factor + wind_factor + solar_factor + evaporation_bonus)
        .clamp(0, 100);

    FogAnalysis {
        score: total,
        class: classify(total, humidity_pct),
    }
}

/// Band a score into a fog class; the light band additionally requires very
/// high humidity.
fn classify(score: i32, humidity_pct: f64) -> FogClass {
    if score >= FOG_DENSE {
        FogClass::Dense
    } else if score >= FOG_MODERATE {
        FogClass::Moderate
    } else if score >= FOG_LIGHT && humidity_pct >= FOG_LIGHT_HUMIDITY {
        FogClass::Light
    } else {
        FogClass::None
    }
}
