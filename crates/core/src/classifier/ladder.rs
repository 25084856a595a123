//! Priority-ladder condition classification.
//!
//! The ladder is a fixed, ordered array of named rules; each rule either
//! claims the observation or passes it down. The first claim wins. There is
//! no registration mechanism and no dynamic dispatch beyond the function
//! table itself; every rule is a pure function of the classifier input.

use crate::analysis::fog::FogAnalysis;
use crate::analysis::pressure_wind::{GustClass, PressureSystem};
use crate::constants::{
    CLOUD_PARTLY_MAX, CLOUD_SUNNY_MAX, GUST_FACTOR_SEVERE, GUST_FACTOR_VERY_GUSTY,
    PRESSURE_EXTREMELY_LOW, PRESSURE_VERY_LOW, RAIN_ACTIVE, RAIN_HEAVY, RAIN_POURING, SNOW_TEMP_F,
    WIND_GALE, WIND_STRONG,
};
use crate::core_types::{Condition, RainState};

/// Everything the ladder may consult, canonicalized and pre-analyzed.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierInput {
    pub temp_f: f64,
    pub humidity_pct: f64,
    pub sea_level_pressure_inhg: Option<f64>,
    pub pressure_system: Option<PressureSystem>,
    pub wind_mph: f64,
    pub gust_mph: f64,
    pub gust_factor: f64,
    pub gust_class: GustClass,
    pub rain_rate_inh: f64,
    pub rain_state: Option<RainState>,
    pub radiation_wm2: Option<f64>,
    pub lux: Option<f64>,
    pub is_daytime: bool,
    pub cloud_cover_pct: f64,
    pub fog: FogAnalysis,
}

/// One ladder rung: a name for diagnostics and a pure rule.
type Rule = (&'static str, fn(&ClassifierInput) -> Option<Condition>);

/// The ladder, highest priority first. The windy override sits above the
/// daytime cloud rung because it replaces that rung's `sunny` outcome.
const LADDER: [Rule; 7] = [
    ("active_precipitation", active_precipitation),
    ("fog", fog),
    ("severe_weather", severe_weather),
    ("clear_sky_wind", clear_sky_wind),
    ("daytime_cloud", daytime_cloud),
    ("twilight", twilight),
    ("nighttime", nighttime),
];

/// Run the ladder; returns the condition and the name of the rung that
/// claimed it.
#[must_use]
pub fn classify(input: &ClassifierInput) -> (Condition, &'static str) {
    for (name, rule) in LADDER {
        if let Some(condition) = rule(input) {
            return (condition, name);
        }
    }
    // The nighttime cascade is total; this is unreachable but harmless.
    (Condition::PartlyCloudyNight, "nighttime")
}

/// Priority 1: active precipitation, with the wet-sensor fog escape.
///
/// A wet rain sensor with no measurable rate is often condensation; when the
/// fog scorer agrees, fog wins over drizzle.
fn active_precipitation(input: &ClassifierInput) -> Option<Condition> {
    let raining = input.rain_rate_inh > RAIN_ACTIVE;
    let wet = input.rain_state == Some(RainState::Wet);

    if !raining && wet && input.fog.is_foggy() {
        return Some(Condition::Fog);
    }
    if !raining && !wet {
        return None;
    }

    if input.temp_f <= SNOW_TEMP_F {
        return Some(Condition::Snowy);
    }

    if let Some(pressure) = input.sea_level_pressure_inhg {
        let deep_low = pressure < PRESSURE_EXTREMELY_LOW;
        let windy_low = pressure < PRESSURE_VERY_LOW
            && input.wind_mph >= WIND_STRONG
            && input.rain_rate_inh > RAIN_HEAVY;
        let gusty_low = pressure < PRESSURE_VERY_LOW
            && input.gust_class.is_very_gusty()
            && input.rain_rate_inh > RAIN_POURING;
        if deep_low || windy_low || gusty_low {
            return Some(Condition::LightningRainy);
        }
    }

    if input.rain_rate_inh >= RAIN_POURING {
        Some(Condition::Pouring)
    } else {
        Some(Condition::Rainy)
    }
}

/// Priority 2: fog.
fn fog(input: &ClassifierInput) -> Option<Condition> {
    input.fog.is_foggy().then_some(Condition::Fog)
}

/// Priority 3: dry severe weather — storm-grade wind fields without rain.
fn severe_weather(input: &ClassifierInput) -> Option<Condition> {
    let stormy_low = input.sea_level_pressure_inhg.is_some_and(|p| {
        p < PRESSURE_VERY_LOW
            && input.wind_mph >= WIND_STRONG
            && input.gust_factor > GUST_FACTOR_VERY_GUSTY
            && input.gust_mph > 15.0
    });
    let severe_turbulence =
        (input.gust_factor > GUST_FACTOR_SEVERE && input.gust_mph > 20.0) || input.gust_mph > 40.0;
    if stormy_low || severe_turbulence {
        return Some(Condition::Lightning);
    }
    (input.wind_mph >= WIND_GALE).then_some(Condition::Windy)
}

/// Priority 5 (sits above its target rung): wind strong enough to lead the
/// story on an otherwise clear day.
fn clear_sky_wind(input: &ClassifierInput) -> Option<Condition> {
    if !input.is_daytime || input.cloud_cover_pct > CLOUD_SUNNY_MAX {
        return None;
    }
    let windy = input.wind_mph >= WIND_STRONG
        || (input.gust_class.is_very_gusty() && input.wind_mph >= 8.0);
    windy.then_some(Condition::Windy)
}

/// Priority 4: daytime sky by cloud cover.
fn daytime_cloud(input: &ClassifierInput) -> Option<Condition> {
    if !input.is_daytime {
        return None;
    }
    Some(if input.cloud_cover_pct <= CLOUD_SUNNY_MAX {
        Condition::Sunny
    } else if input.cloud_cover_pct <= CLOUD_PARTLY_MAX {
        Condition::PartlyCloudy
    } else {
        Condition::Cloudy
    })
}

/// Priority 6: twilight, between the daytime and nighttime regimes.
fn twilight(input: &ClassifierInput) -> Option<Condition> {
    let lux = input.lux.unwrap_or(0.0);
    let radiation = input.radiation_wm2.unwrap_or(0.0);
    let twilight_band =
        (lux > 10.0 && lux < 100.0) || (radiation > 1.0 && radiation < 50.0);
    if !twilight_band {
        return None;
    }
    let bright_edge = lux > 50.0 && input.pressure_system == Some(PressureSystem::Normal);
    Some(if bright_edge {
        Condition::PartlyCloudy
    } else {
        Condition::Cloudy
    })
}

/// Priority 7: nighttime cascade over pressure, humidity, and wind.
///
/// A station without a pressure sensor runs the cascade as if the system
/// were normal; the humidity rungs still apply.
#[allow(clippy::unnecessary_wraps)]
fn nighttime(input: &ClassifierInput) -> Option<Condition> {
    let system = input.pressure_system.unwrap_or(PressureSystem::Normal);
    let low = system.is_low_or_below();
    let humidity = input.humidity_pct;
    let wind = input.wind_mph;
    let gusty = input.gust_class != GustClass::None;

    let condition = if low && humidity > 90.0 && wind < 3.0 {
        Condition::Cloudy
    } else if system == PressureSystem::VeryHigh && wind < 1.0 && humidity < 70.0 {
        Condition::ClearNight
    } else if system == PressureSystem::High && !gusty && humidity < 80.0 {
        Condition::ClearNight
    } else if low && humidity < 65.0 {
        Condition::ClearNight
    } else if system == PressureSystem::Normal && (1.0..8.0).contains(&wind) && humidity < 85.0 {
        Condition::PartlyCloudyNight
    } else if low && humidity < 90.0 {
        Condition::PartlyCloudyNight
    } else if humidity > 90.0 {
        Condition::Cloudy
    } else {
        Condition::PartlyCloudyNight
    };
    Some(condition)
}
