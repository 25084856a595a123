//! Deterministic forecast engine: state bundle, evolution trajectory, and
//! the daily/hourly projections built from them.
//!
//! Nothing here draws randomness; every projected value is a function of the
//! current derived state, the trends history, and the forecast horizon.

pub mod context;
pub mod daily;
pub mod hourly;
pub mod trajectory;

use crate::core_types::Condition;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use context::{ForecastContext, MoistureTransport, WindPattern};
pub use daily::daily_forecast;
pub use hourly::hourly_forecast;
pub use trajectory::Trajectory;

/// One projected day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub datetime: DateTime<Utc>,
    pub condition: Condition,
    pub temp_high: f64,
    pub temp_low: f64,
    pub precipitation: f64,
    pub precipitation_probability: f64,
    pub wind_speed: f64,
    pub wind_bearing: f64,
    pub humidity: f64,
}

/// One projected hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecast {
    pub datetime: DateTime<Utc>,
    pub condition: Condition,
    pub temperature: f64,
    pub precipitation: f64,
    pub precipitation_probability: f64,
    pub wind_speed: f64,
    pub wind_bearing: f64,
    pub humidity: f64,
}

/// Complete forecast payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub daily: Vec<DailyForecast>,
    pub hourly: Vec<HourlyForecast>,
}
