//! End-to-end classification scenarios through the public `observe` boundary.

use chrono::{DateTime, TimeZone, Utc};
use weather_core::core_types::units::{PressureUnit, RainRateUnit, SpeedUnit, TemperatureUnit};
use weather_core::{
    observe, Condition, RainState, Reading, SensorSnapshot, StationConfig, StationState,
};

fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

fn night() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 2, 0, 0).unwrap()
}

fn snapshot(timestamp: DateTime<Utc>) -> SensorSnapshot {
    SensorSnapshot {
        timestamp,
        outdoor_temp: Some(Reading::new(70.0, TemperatureUnit::Fahrenheit)),
        humidity: Some(50.0),
        dewpoint: None,
        pressure: Some(Reading::new(30.00, PressureUnit::InHg)),
        pressure_is_sea_level: true,
        wind_speed: Some(Reading::new(3.0, SpeedUnit::Mph)),
        wind_gust: Some(Reading::new(5.0, SpeedUnit::Mph)),
        wind_direction_deg: Some(225.0),
        rain_rate: Some(Reading::new(0.0, RainRateUnit::InPerHour)),
        rain_state: Some(RainState::Dry),
        solar_radiation_wm2: Some(0.0),
        solar_lux: Some(0.0),
        uv_index: Some(0.0),
        solar_elevation_deg: None,
        altitude: None,
    }
}

#[test]
fn scenario_1_bright_noon_is_sunny() {
    let mut snap = snapshot(noon());
    snap.outdoor_temp = Some(Reading::new(75.0, TemperatureUnit::Fahrenheit));
    snap.humidity = Some(45.0);
    snap.pressure = Some(Reading::new(30.05, PressureUnit::InHg));
    snap.solar_radiation_wm2 = Some(850.0);
    snap.solar_lux = Some(85_000.0);
    snap.uv_index = Some(7.0);
    snap.solar_elevation_deg = Some(60.0);

    let state = StationState::new(StationConfig::default());
    let (inference, _) = observe(&snap, &state).unwrap();

    assert_eq!(inference.condition, Condition::Sunny);
    assert!(inference.cloud_cover_pct <= 30.0, "cloud {}", inference.cloud_cover_pct);
    assert!(inference.is_daytime);
    assert_eq!(inference.fog_score, 0);
}

#[test]
fn scenario_2_saturated_calm_night_is_fog() {
    let mut snap = snapshot(night());
    snap.outdoor_temp = Some(Reading::new(34.0, TemperatureUnit::Fahrenheit));
    snap.humidity = Some(99.0);
    snap.pressure = Some(Reading::new(29.90, PressureUnit::InHg));
    snap.wind_speed = Some(Reading::new(1.0, SpeedUnit::Mph));
    snap.wind_gust = Some(Reading::new(1.0, SpeedUnit::Mph));
    snap.rain_state = Some(RainState::Wet);

    let state = StationState::new(StationConfig::default());
    let (inference, _) = observe(&snap, &state).unwrap();

    assert_eq!(inference.condition, Condition::Fog);
    assert!(inference.fog_score >= 70, "score {}", inference.fog_score);
    assert!(!inference.is_daytime);
    assert!(inference.visibility <= 0.5);
}

#[test]
fn scenario_3_freezing_rain_is_snow() {
    let mut snap = snapshot(noon());
    snap.outdoor_temp = Some(Reading::new(28.0, TemperatureUnit::Fahrenheit));
    snap.humidity = Some(85.0);
    snap.pressure = Some(Reading::new(29.70, PressureUnit::InHg));
    snap.wind_speed = Some(Reading::new(10.0, SpeedUnit::Mph));
    snap.wind_gust = Some(Reading::new(18.0, SpeedUnit::Mph));
    snap.rain_rate = Some(Reading::new(0.20, RainRateUnit::InPerHour));
    snap.rain_state = Some(RainState::Wet);

    let state = StationState::new(StationConfig::default());
    let (inference, _) = observe(&snap, &state).unwrap();

    assert_eq!(inference.condition, Condition::Snowy);
}

#[test]
fn scenario_4_deep_low_downpour_is_lightning_rainy() {
    let mut snap = snapshot(noon());
    snap.humidity = Some(80.0);
    snap.pressure = Some(Reading::new(29.10, PressureUnit::InHg));
    snap.wind_speed = Some(Reading::new(22.0, SpeedUnit::Mph));
    snap.wind_gust = Some(Reading::new(40.0, SpeedUnit::Mph));
    snap.rain_rate = Some(Reading::new(0.35, RainRateUnit::InPerHour));
    snap.rain_state = Some(RainState::Wet);

    let state = StationState::new(StationConfig::default());
    let (inference, _) = observe(&snap, &state).unwrap();

    assert_eq!(inference.condition, Condition::LightningRainy);
    assert!(
        inference.storm_probability >= 70.0,
        "storm {}",
        inference.storm_probability
    );
}

#[test]
fn scenario_5_strong_wind_overrides_sunny() {
    let mut snap = snapshot(noon());
    snap.outdoor_temp = Some(Reading::new(72.0, TemperatureUnit::Fahrenheit));
    snap.pressure = Some(Reading::new(30.10, PressureUnit::InHg));
    snap.wind_speed = Some(Reading::new(25.0, SpeedUnit::Mph));
    snap.wind_gust = Some(Reading::new(33.0, SpeedUnit::Mph));
    snap.solar_radiation_wm2 = Some(900.0);
    snap.solar_lux = Some(90_000.0);
    snap.uv_index = Some(8.0);
    snap.solar_elevation_deg = Some(55.0);

    let state = StationState::new(StationConfig::default());
    let (inference, _) = observe(&snap, &state).unwrap();

    assert_eq!(inference.condition, Condition::Windy);
    assert!(inference.cloud_cover_pct <= 30.0);
}

#[test]
fn scenario_6_mild_night_cascade_default() {
    let mut snap = snapshot(night());
    snap.outdoor_temp = Some(Reading::new(60.0, TemperatureUnit::Fahrenheit));
    snap.humidity = Some(88.0);
    snap.pressure = Some(Reading::new(29.95, PressureUnit::InHg));
    snap.wind_speed = Some(Reading::new(4.0, SpeedUnit::Mph));
    snap.wind_gust = Some(Reading::new(5.0, SpeedUnit::Mph));

    let state = StationState::new(StationConfig::default());
    let (inference, _) = observe(&snap, &state).unwrap();

    assert_eq!(inference.condition, Condition::PartlyCloudyNight);
}

#[test]
fn metric_snapshot_classifies_identically() {
    // Scenario 1 restated in metric units must land on the same condition
    let mut snap = snapshot(noon());
    snap.outdoor_temp = Some(Reading::new(23.889, TemperatureUnit::Celsius));
    snap.humidity = Some(45.0);
    snap.pressure = Some(Reading::new(1017.6, PressureUnit::Hpa));
    snap.wind_speed = Some(Reading::new(4.828, SpeedUnit::Kmh));
    snap.wind_gust = Some(Reading::new(8.047, SpeedUnit::Kmh));
    snap.solar_radiation_wm2 = Some(850.0);
    snap.solar_lux = Some(85_000.0);
    snap.uv_index = Some(7.0);
    snap.solar_elevation_deg = Some(60.0);

    let state = StationState::new(StationConfig::default());
    let (inference, _) = observe(&snap, &state).unwrap();
    assert_eq!(inference.condition, Condition::Sunny);
}
