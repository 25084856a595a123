//! Universal invariants, error taxonomy, and transactional-state properties
//! over the public boundary.

use chrono::{DateTime, Duration, TimeZone, Utc};
use weather_core::core_types::units::{
    PressureUnit, RainRateUnit, SpeedUnit, TemperatureUnit,
};
use weather_core::{
    forecast, observe, CoreError, ForecastHorizon, RainState, Reading, SensorSnapshot,
    StationConfig, StationState, UnitSystem,
};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 10, 8, 0, 0).unwrap()
}

/// Opt-in classifier tracing for debugging test failures
/// (`RUST_LOG=weather_core=debug cargo test`).
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn snapshot(timestamp: DateTime<Utc>) -> SensorSnapshot {
    SensorSnapshot {
        timestamp,
        outdoor_temp: Some(Reading::new(65.0, TemperatureUnit::Fahrenheit)),
        humidity: Some(60.0),
        dewpoint: None,
        pressure: Some(Reading::new(29.95, PressureUnit::InHg)),
        pressure_is_sea_level: true,
        wind_speed: Some(Reading::new(5.0, SpeedUnit::Mph)),
        wind_gust: Some(Reading::new(7.0, SpeedUnit::Mph)),
        wind_direction_deg: Some(270.0),
        rain_rate: Some(Reading::new(0.0, RainRateUnit::InPerHour)),
        rain_state: Some(RainState::Dry),
        solar_radiation_wm2: Some(400.0),
        solar_lux: Some(50_000.0),
        uv_index: Some(4.0),
        solar_elevation_deg: Some(45.0),
        altitude: None,
    }
}

#[test]
fn invariants_hold_across_a_sweep_of_valid_snapshots() {
    init_tracing();
    let temps = [10.0, 32.0, 55.0, 75.0, 95.0];
    let humidities = [5.0, 45.0, 88.0, 99.0];
    let winds = [0.0, 4.0, 20.0, 45.0];
    let rains = [0.0, 0.08, 0.6];
    let radiations = [0.0, 30.0, 400.0, 950.0];

    let mut state = StationState::new(StationConfig::default());
    let mut ts = t0();
    for (i, &temp) in temps.iter().enumerate() {
        for (j, &humidity) in humidities.iter().enumerate() {
            for &wind in &winds {
                let mut snap = snapshot(ts);
                snap.outdoor_temp = Some(Reading::new(temp, TemperatureUnit::Fahrenheit));
                snap.humidity = Some(humidity);
                snap.wind_speed = Some(Reading::new(wind, SpeedUnit::Mph));
                snap.wind_gust = Some(Reading::new(wind * 1.4, SpeedUnit::Mph));
                snap.rain_rate = Some(Reading::new(
                    rains[(i + j) % rains.len()],
                    RainRateUnit::InPerHour,
                ));
                snap.rain_state = Some(if rains[(i + j) % rains.len()] > 0.0 {
                    RainState::Wet
                } else {
                    RainState::Dry
                });
                snap.solar_radiation_wm2 = Some(radiations[(i + j) % radiations.len()]);

                let (inference, next) = observe(&snap, &state).unwrap();
                assert!(
                    (0.0..=100.0).contains(&inference.cloud_cover_pct),
                    "cloud cover {}",
                    inference.cloud_cover_pct
                );
                assert!((0..=100).contains(&inference.fog_score));
                assert!((0.0..=100.0).contains(&inference.storm_probability));
                assert!(
                    inference.dewpoint <= temp + 1e-9,
                    "dewpoint {} above temp {temp}",
                    inference.dewpoint
                );
                assert!(inference.visibility > 0.0);

                state = next;
                ts += Duration::minutes(10);
            }
        }
    }
}

#[test]
fn missing_temperature_is_insufficient_input() {
    let state = StationState::new(StationConfig::default());
    let mut snap = snapshot(t0());
    snap.outdoor_temp = None;
    let err = observe(&snap, &state).unwrap_err();
    assert!(matches!(err, CoreError::InsufficientInput { .. }));
}

#[test]
fn missing_humidity_without_dewpoint_is_insufficient_input() {
    let state = StationState::new(StationConfig::default());
    let mut snap = snapshot(t0());
    snap.humidity = None;
    let err = observe(&snap, &state).unwrap_err();
    assert!(matches!(err, CoreError::InsufficientInput { .. }));
}

#[test]
fn external_dewpoint_substitutes_for_humidity() {
    let state = StationState::new(StationConfig::default());
    let mut snap = snapshot(t0());
    snap.humidity = None;
    snap.dewpoint = Some(Reading::new(10.0, TemperatureUnit::Celsius));
    let (inference, _) = observe(&snap, &state).unwrap();
    assert!((inference.dewpoint - 50.0).abs() < 0.01);
}

#[test]
fn dewpoint_above_temperature_is_clamped_with_warning() {
    let state = StationState::new(StationConfig::default());
    let mut snap = snapshot(t0());
    snap.dewpoint = Some(Reading::new(80.0, TemperatureUnit::Fahrenheit));
    let (inference, _) = observe(&snap, &state).unwrap();
    assert!((inference.dewpoint - 65.0).abs() < 1e-9);
    assert!(inference
        .warnings
        .iter()
        .any(|w| matches!(w, weather_core::Warning::DewpointClamped { .. })));
}

#[test]
fn invalid_humidity_is_fatal() {
    let state = StationState::new(StationConfig::default());
    let mut snap = snapshot(t0());
    snap.humidity = Some(130.0);
    assert!(matches!(
        observe(&snap, &state).unwrap_err(),
        CoreError::InvalidHumidity { .. }
    ));
}

#[test]
fn negative_wind_is_invalid_range() {
    let state = StationState::new(StationConfig::default());
    let mut snap = snapshot(t0());
    snap.wind_speed = Some(Reading::new(-3.0, SpeedUnit::Mph));
    assert!(matches!(
        observe(&snap, &state).unwrap_err(),
        CoreError::InvalidRange { .. }
    ));
}

#[test]
fn failed_observation_leaves_state_untouched() {
    let state = StationState::new(StationConfig::default());
    let (_, state) = observe(&snapshot(t0()), &state).unwrap();
    let before = state.clone();

    let mut bad = snapshot(t0() + Duration::minutes(10));
    bad.humidity = Some(-5.0);
    assert!(observe(&bad, &state).is_err());
    assert_eq!(state, before);
}

#[test]
fn backdated_observation_is_rejected() {
    let state = StationState::new(StationConfig::default());
    let (_, state) = observe(&snapshot(t0()), &state).unwrap();

    let earlier = snapshot(t0() - Duration::minutes(5));
    assert!(matches!(
        observe(&earlier, &state).unwrap_err(),
        CoreError::OutOfOrderObservation { .. }
    ));
}

#[test]
fn equal_timestamp_replaces_prior_entry() {
    let state = StationState::new(StationConfig::default());
    let (_, state) = observe(&snapshot(t0()), &state).unwrap();
    let trends_len = state.trends().len();

    // Same timestamp again: accepted, and the history does not grow
    let (_, state) = observe(&snapshot(t0()), &state).unwrap();
    assert_eq!(state.trends().len(), trends_len);
}

#[test]
fn altitude_correction_raises_classified_pressure() {
    // A mountain station reporting raw station pressure classifies like a
    // sea-level station once corrected.
    let config = StationConfig {
        altitude_m: 800.0,
        ..StationConfig::default()
    };
    let state = StationState::new(config);
    let mut snap = snapshot(t0());
    snap.pressure = Some(Reading::new(27.15, PressureUnit::InHg));
    snap.pressure_is_sea_level = false;
    let (inference, _) = observe(&snap, &state).unwrap();
    let corrected = inference.pressure_sea_level.unwrap();
    assert!(
        (29.5..30.5).contains(&corrected),
        "corrected pressure {corrected}"
    );
}

#[test]
fn metric_output_units() {
    let config = StationConfig {
        units_out: UnitSystem::Metric,
        ..StationConfig::default()
    };
    let state = StationState::new(config);
    let (inference, _) = observe(&snapshot(t0()), &state).unwrap();
    // 29.95 inHg ≈ 1014.2 hPa
    assert!((inference.pressure_sea_level.unwrap() - 1014.2).abs() < 0.5);
    // Dewpoint for 65 °F / 60% RH is ~51 °F ≈ 10.6 °C
    assert!((5.0..15.0).contains(&inference.dewpoint), "{}", inference.dewpoint);
}

#[test]
fn forecast_requires_an_observation() {
    let state = StationState::new(StationConfig::default());
    assert!(matches!(
        forecast(&state, ForecastHorizon::Hours120).unwrap_err(),
        CoreError::InsufficientInput { .. }
    ));
}

#[test]
fn forecast_shapes_and_determinism() {
    let mut state = StationState::new(StationConfig::default());
    for i in 0..6 {
        let (_, next) = observe(&snapshot(t0() + Duration::minutes(30 * i)), &state).unwrap();
        state = next;
    }

    let five_day = forecast(&state, ForecastHorizon::Hours120).unwrap();
    assert_eq!(five_day.daily.len(), 5);
    assert_eq!(five_day.hourly.len(), 24);

    let day_only = forecast(&state, ForecastHorizon::Hours24).unwrap();
    assert!(day_only.daily.is_empty());
    assert_eq!(day_only.hourly.len(), 24);

    // Pure function of the state: identical calls, identical forecasts
    let again = forecast(&state, ForecastHorizon::Hours120).unwrap();
    assert_eq!(five_day, again);
}

#[test]
fn forecast_bounds() {
    let mut state = StationState::new(StationConfig::default());
    for i in 0..6 {
        let (_, next) = observe(&snapshot(t0() + Duration::minutes(30 * i)), &state).unwrap();
        state = next;
    }
    let result = forecast(&state, ForecastHorizon::Hours120).unwrap();
    for day in &result.daily {
        assert!(day.temp_high > day.temp_low);
        assert!((0.0..=100.0).contains(&day.humidity));
        assert!((0.0..=100.0).contains(&day.precipitation_probability));
        assert!(day.precipitation >= 0.0);
    }
    for hour in &result.hourly {
        assert!((0.0..=100.0).contains(&hour.humidity));
        assert!((0.0..=360.0).contains(&hour.wind_bearing));
    }
}
