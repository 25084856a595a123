//! Core types and wire records

pub mod condition;
pub mod snapshot;
pub mod units;

pub use condition::Condition;
pub use snapshot::{CanonicalSnapshot, RainState, SensorSnapshot};
pub use units::{
    LengthUnit, PressureUnit, RainRateUnit, Reading, SpeedUnit, TemperatureUnit, UnitSystem,
};
