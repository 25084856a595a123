//! Pipeline orchestrator: the `observe` / `forecast` boundary of the core.
//!
//! `observe` is a total function over `(snapshot, previous_state)`: it
//! canonicalizes units, corrects pressure for altitude, derives dewpoint and
//! solar context, runs the analyzers in dependency order, classifies,
//! hysteresis-filters, and returns the inference together with a fresh state.
//! A failed observation returns an error and leaves the caller's state
//! exactly as it was.

pub mod config;
pub mod error;
pub mod state;

use crate::analysis::cloud_cover;
use crate::analysis::fog::{self, FogClass};
use crate::analysis::pressure_wind::{self, GustClass, PressureSystem, WindClass};
use crate::analysis::trends::{Trend, TrendEntry};
use crate::classifier::hysteresis;
use crate::classifier::ladder::{classify, ClassifierInput};
use crate::core_types::units::{fahrenheit_to_celsius, inhg_to_hpa, mph_to_kmh, UnitSystem};
use crate::core_types::{CanonicalSnapshot, Condition, SensorSnapshot};
use crate::forecast::context::{
    atmospheric_stability, condensation_potential, transport_potential, ForecastContext,
    MoistureTransport, WindPattern,
};
use crate::forecast::{daily_forecast, hourly_forecast, DailyForecast, Forecast, HourlyForecast};
use crate::physics::altitude::station_to_sea_level;
use crate::physics::dewpoint::{dewpoint_f, humidity_from_dewpoint};
use crate::physics::solar::SolarContext;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use config::StationConfig;
pub use error::{CoreError, Warning};
pub use state::{DerivedState, StationState};

/// Forecast horizons exposed at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastHorizon {
    /// Next 24 hours, hourly records only.
    Hours24,
    /// Next 5 days: daily records plus the first day's hourly detail.
    Hours120,
}

/// Inference emitted per accepted observation. Dimensioned values follow the
/// configured output unit system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inference {
    pub condition: Condition,
    pub units: UnitSystem,
    /// Dewpoint (°F imperial, °C metric).
    pub dewpoint: f64,
    pub cloud_cover_pct: f64,
    pub fog_score: i32,
    pub fog_class: FogClass,
    /// Visibility (mi imperial, km metric).
    pub visibility: f64,
    /// Sea-level pressure (inHg imperial, hPa metric).
    pub pressure_sea_level: Option<f64>,
    pub pressure_system: Option<PressureSystem>,
    pub storm_probability: f64,
    pub wind_class: WindClass,
    pub gust_class: GustClass,
    pub is_daytime: bool,
    pub solar_elevation_deg: f64,
    pub warnings: Vec<Warning>,
}

/// Process one observation against the previous state.
///
/// # Errors
///
/// `InsufficientInput` when `outdoor_temp` is missing, or `humidity` is
/// missing without an external dewpoint; `InvalidHumidity` /
/// `InvalidRange` on out-of-range inputs; `OutOfOrderObservation` on a
/// back-dated timestamp. On any error the previous state is untouched.
pub fn observe(
    snapshot: &SensorSnapshot,
    state: &StationState,
) -> Result<(Inference, StationState), CoreError> {
    if let Some(last) = state.last_timestamp {
        if snapshot.timestamp < last {
            return Err(CoreError::OutOfOrderObservation {
                observed: snapshot.timestamp,
                last,
            });
        }
    }

    let canon = snapshot
        .canonicalize(state.config.altitude_m)
        .ok_or_else(|| CoreError::missing("outdoor_temp"))?;
    validate_ranges(&canon)?;

    let mut next = state.clone();
    let mut warnings = Vec::new();

    let (calibration, calibration_warning) = state.config.cloud_calibration();
    if let Some(w) = calibration_warning {
        warnings.push(w);
    }

    // Altitude correction. The snapshot hint or the station configuration
    // can both declare the sensor as already sea-level.
    let already_sea_level = canon.pressure_is_sea_level || state.config.pressure_is_sea_level;
    let sea_level_pressure = canon.pressure_inhg.map(|p| {
        if already_sea_level {
            p
        } else {
            station_to_sea_level(p, canon.altitude_m)
        }
    });

    // Dewpoint: external sensor wins, clamped to the air temperature; the
    // Magnus computation otherwise.
    if let Some(h) = canon.humidity_pct {
        if !(0.0..=100.0).contains(&h) {
            return Err(CoreError::InvalidHumidity { value: h });
        }
    }
    let (dewpoint, humidity_pct) = match canon.external_dewpoint_f {
        Some(external) => {
            let dewpoint = if external > canon.temp_f {
                warnings.push(Warning::DewpointClamped {
                    supplied_f: external,
                });
                canon.temp_f
            } else {
                external
            };
            let humidity = canon
                .humidity_pct
                .unwrap_or_else(|| humidity_from_dewpoint(canon.temp_f, dewpoint));
            (dewpoint, humidity)
        }
        None => {
            let humidity = canon
                .humidity_pct
                .ok_or_else(|| CoreError::missing("humidity"))?;
            (dewpoint_f(canon.temp_f, humidity)?, humidity)
        }
    };
    let dewpoint_spread = canon.temp_f - dewpoint;

    let solar = SolarContext::derive(
        canon.timestamp,
        canon.solar_radiation_wm2,
        canon.solar_lux,
        canon.uv_index,
        canon.solar_elevation_deg,
    );
    if canon.solar_radiation_wm2.is_none() {
        warnings.push(Warning::DegradedSensor {
            sensor: "solar_radiation".into(),
        });
    }

    let smoothed_radiation = next.smoothed_radiation(canon.timestamp, canon.solar_radiation_wm2);

    let trend_3h = next.trends.pressure_trend(canon.timestamp, Duration::hours(3));
    if trend_3h == Trend::Insufficient && canon.pressure_inhg.is_some() {
        warnings.push(Warning::InsufficientHistory {
            query: "pressure_trend_3h".into(),
        });
    }

    let pressure_system = sea_level_pressure.map(PressureSystem::from_sea_level_inhg);
    let cloud = cloud_cover::analyze(
        smoothed_radiation,
        canon.solar_lux,
        canon.uv_index,
        &solar,
        calibration,
        trend_3h,
        pressure_system,
        &next.trends,
        canon.timestamp,
        state.last_cloud_cover_pct,
    );

    let fog = fog::score(
        canon.temp_f,
        humidity_pct,
        dewpoint_spread,
        canon.wind_speed_mph,
        smoothed_radiation,
        solar.clear_sky_wm2,
        solar.is_daytime,
    );

    let pressure_wind = pressure_wind::analyze(
        sea_level_pressure,
        canon.wind_speed_mph,
        canon.wind_gust_mph,
        canon.rain_rate_inh,
        &next.trends,
        canon.timestamp,
    );

    let input = ClassifierInput {
        temp_f: canon.temp_f,
        humidity_pct,
        sea_level_pressure_inhg: sea_level_pressure,
        pressure_system: pressure_wind.pressure_system,
        wind_mph: canon.wind_speed_mph,
        gust_mph: canon.wind_gust_mph,
        gust_factor: pressure_wind.gust_factor,
        gust_class: pressure_wind.gust_class,
        rain_rate_inh: canon.rain_rate_inh,
        rain_state: canon.rain_state,
        radiation_wm2: smoothed_radiation,
        lux: canon.solar_lux,
        is_daytime: solar.is_daytime,
        cloud_cover_pct: cloud.pct,
        fog,
    };
    let (condition_raw, rung) = classify(&input);

    let cloud_delta = state
        .last_cloud_cover_pct
        .map(|prev| cloud.unbounded_pct - prev);
    let previous_condition = state.last_derived.as_ref().map(|d| d.condition);
    let (condition, hysteresis_outcome) = hysteresis::filter(
        previous_condition,
        condition_raw,
        cloud_delta,
        &next.condition_history,
        canon.timestamp,
    );
    debug!(%condition_raw, %condition, rung, "observation classified");

    // Commit: history, trends, and the derived snapshot.
    next.condition_history
        .record(canon.timestamp, condition_raw, condition);
    next.trends.insert(TrendEntry {
        timestamp: canon.timestamp,
        temperature_f: canon.temp_f,
        humidity_pct,
        pressure_inhg: sea_level_pressure,
        wind_speed_mph: canon.wind_speed_mph,
        wind_direction_deg: canon.wind_direction_deg,
        solar_radiation_wm2: canon.solar_radiation_wm2,
        condition,
    });
    next.last_timestamp = Some(canon.timestamp);
    next.last_cloud_cover_pct = Some(cloud.pct);

    let derived = DerivedState {
        timestamp: canon.timestamp,
        temp_f: canon.temp_f,
        humidity_pct,
        dewpoint_f: dewpoint,
        dewpoint_spread_f: dewpoint_spread,
        sea_level_pressure_inhg: sea_level_pressure,
        pressure_system: pressure_wind.pressure_system,
        pressure_trend_3h: pressure_wind.trend_3h,
        pressure_trend_24h: pressure_wind.trend_24h,
        cloud_cover_pct: cloud.pct,
        expected_clear_sky_wm2: cloud.expected_wm2,
        fog,
        storm_probability: pressure_wind.storm_probability,
        storm_risk: pressure_wind.storm_risk,
        wind_mph: canon.wind_speed_mph,
        wind_class: pressure_wind.wind_class,
        gust_factor: pressure_wind.gust_factor,
        gust_class: pressure_wind.gust_class,
        is_daytime: solar.is_daytime,
        solar_elevation_deg: solar.elevation_deg,
        condition_raw,
        condition,
        hysteresis: hysteresis_outcome,
    };
    next.last_derived = Some(derived.clone());

    let inference = build_inference(&derived, &state.config, warnings);
    Ok((inference, next))
}

/// Build the 24-hour or 5-day forecast from the current state.
///
/// # Errors
///
/// `InsufficientInput` when no observation has been accepted yet.
pub fn forecast(state: &StationState, horizon: ForecastHorizon) -> Result<Forecast, CoreError> {
    let derived = state
        .last_derived
        .as_ref()
        .ok_or_else(|| CoreError::missing("observations"))?;
    let ctx = forecast_context(state, derived);

    let hourly: Vec<HourlyForecast> =
        hourly_forecast(&ctx, state.config.sunrise_default, state.config.sunset_default)
            .into_iter()
            .map(|record| convert_hourly(record, state.config.units_out))
            .collect();
    let daily: Vec<DailyForecast> = match horizon {
        ForecastHorizon::Hours24 => Vec::new(),
        ForecastHorizon::Hours120 => daily_forecast(&ctx)
            .into_iter()
            .map(|record| convert_daily(record, state.config.units_out))
            .collect(),
    };
    Ok(Forecast { daily, hourly })
}

/// Assemble the forecast state bundle from the pipeline state.
fn forecast_context(state: &StationState, derived: &DerivedState) -> ForecastContext {
    let now = derived.timestamp;
    let trend_3h = derived.pressure_trend_3h.per_hour_or_flat();
    let trend_24h = derived.pressure_trend_24h.per_hour_or_flat();
    let direction = state.trends.wind_direction_stats(now, Duration::hours(3));
    let humidity = derived.humidity_pct;
    let wind = derived.wind_mph;

    ForecastContext {
        timestamp: now,
        temp_f: derived.temp_f,
        humidity_pct: humidity,
        wind_mph: wind,
        condition: derived.condition,
        cloud_cover_pct: derived.cloud_cover_pct,
        pressure_system: derived.pressure_system,
        pressure_trend_3h: trend_3h,
        pressure_trend_24h: trend_24h,
        storm_probability: derived.storm_probability,
        wind: WindPattern {
            direction_stability: direction.map_or(0.5, |d| d.stability),
            mean_bearing_deg: direction.map_or(0.0, |d| d.mean_deg),
            gust_factor: derived.gust_factor,
            gradient_proxy_mph: trend_3h.abs() * 100.0,
        },
        moisture: MoistureTransport {
            humidity_pct: humidity,
            dewpoint_spread_f: derived.dewpoint_spread_f,
            condensation_potential: condensation_potential(humidity, derived.dewpoint_spread_f),
            transport_potential: transport_potential(humidity, wind),
        },
        stability: atmospheric_stability(trend_24h, wind, humidity),
        temp_volatility_f: state
            .trends
            .volatility(now, Duration::hours(24), |e| Some(e.temperature_f))
            .unwrap_or(0.0),
        humidity_trend: state
            .trends
            .humidity_trend(now, Duration::hours(6))
            .per_hour_or_flat(),
    }
}

/// Physically valid ranges on raw inputs that are fatal when violated.
fn validate_ranges(canon: &CanonicalSnapshot) -> Result<(), CoreError> {
    let non_negative: [(&str, Option<f64>); 5] = [
        ("wind_speed", Some(canon.wind_speed_mph)),
        ("wind_gust", Some(canon.wind_gust_mph)),
        ("rain_rate", Some(canon.rain_rate_inh)),
        ("solar_radiation", canon.solar_radiation_wm2),
        ("solar_lux", canon.solar_lux),
    ];
    for (field, value) in non_negative {
        if let Some(v) = value {
            if v < 0.0 || !v.is_finite() {
                return Err(CoreError::InvalidRange {
                    field: field.to_owned(),
                    value: v,
                });
            }
        }
    }
    if let Some(p) = canon.pressure_inhg {
        if p <= 0.0 || !p.is_finite() {
            return Err(CoreError::InvalidRange {
                field: "pressure".to_owned(),
                value: p,
            });
        }
    }
    Ok(())
}

/// Visibility from fog, precipitation, and cloud cover (miles).
fn visibility_miles(derived: &DerivedState) -> f64 {
    match derived.fog.class {
        FogClass::Dense => 0.25,
        FogClass::Moderate => 0.5,
        FogClass::Light => 1.0,
        FogClass::None => match derived.condition {
            Condition::Pouring | Condition::LightningRainy => 2.0,
            Condition::Snowy => 1.0,
            Condition::Rainy => 5.0,
            _ => 10.0 - derived.cloud_cover_pct / 20.0,
        },
    }
}

fn build_inference(
    derived: &DerivedState,
    config: &StationConfig,
    warnings: Vec<Warning>,
) -> Inference {
    let units = config.units_out;
    let visibility = visibility_miles(derived);
    let (dewpoint, visibility, pressure_sea_level) = match units {
        UnitSystem::Imperial => (
            derived.dewpoint_f,
            visibility,
            derived.sea_level_pressure_inhg,
        ),
        UnitSystem::Metric => (
            fahrenheit_to_celsius(derived.dewpoint_f),
            // Miles to kilometers shares the mph factor
            visibility * crate::core_types::units::KMH_PER_MPH,
            derived.sea_level_pressure_inhg.map(inhg_to_hpa),
        ),
    };
    Inference {
        condition: derived.condition,
        units,
        dewpoint,
        cloud_cover_pct: derived.cloud_cover_pct,
        fog_score: derived.fog.score,
        fog_class: derived.fog.class,
        visibility,
        pressure_sea_level,
        pressure_system: derived.pressure_system,
        storm_probability: derived.storm_probability,
        wind_class: derived.wind_class,
        gust_class: derived.gust_class,
        is_daytime: derived.is_daytime,
        solar_elevation_deg: derived.solar_elevation_deg,
        warnings,
    }
}

fn convert_daily(mut record: DailyForecast, units: UnitSystem) -> DailyForecast {
    if units == UnitSystem::Metric {
        record.temp_high = fahrenheit_to_celsius(record.temp_high);
        record.temp_low = fahrenheit_to_celsius(record.temp_low);
        record.wind_speed = mph_to_kmh(record.wind_speed);
        record.precipitation = crate::core_types::units::inh_to_mmh(record.precipitation);
    }
    record
}

fn convert_hourly(mut record: HourlyForecast, units: UnitSystem) -> HourlyForecast {
    if units == UnitSystem::Metric {
        record.temperature = fahrenheit_to_celsius(record.temperature);
        record.wind_speed = mph_to_kmh(record.wind_speed);
        record.precipitation = crate::core_types::units::inh_to_mmh(record.precipitation);
    }
    record
}
