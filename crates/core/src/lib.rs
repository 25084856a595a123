//! Weather Inference Core Library
//!
//! A deterministic, pure-function weather inference pipeline for home
//! weather stations. Raw sensor snapshots go in; a classified condition,
//! derived atmospheric quantities (sea-level pressure, dewpoint, cloud
//! cover, fog score, storm probability, visibility), and a 5-day/24-hour
//! forecast come out. All state is an explicit value the caller threads
//! between calls; the core never reads a wall clock and never performs I/O.

pub mod analysis;
pub mod classifier;
pub mod constants;
pub mod core_types;
pub mod forecast;
pub mod physics;
pub mod pipeline;

// Re-export main types
pub use analysis::{FogClass, GustClass, PressureSystem, StormRisk, WindClass};
pub use core_types::{Condition, RainState, Reading, SensorSnapshot, UnitSystem};
pub use forecast::{DailyForecast, Forecast, HourlyForecast};
pub use pipeline::{
    forecast, observe, CoreError, ForecastHorizon, Inference, StationConfig, StationState, Warning,
};
