//! Unit-tagged sensor readings and scalar conversions.
//!
//! Every numeric field on the wire is a `(value, unit)` pair. Internally the
//! whole pipeline works in Imperial units (°F, inHg, mph, in/h, feet); this
//! module owns the conversion in both directions so the analysis code never
//! sees a unit enum.
//!
//! Conversion factors are the exact defined ratios (1 inHg ≡ 33.8639 hPa,
//! 1 mph ≡ 1.60934 km/h, 1 in ≡ 25.4 mm, 1 m ≡ 3.28084 ft).

use serde::{Deserialize, Serialize};
use std::fmt;

/// hPa (and mbar) per inch of mercury.
pub const HPA_PER_INHG: f64 = 33.8639;

/// km/h per mile per hour.
pub const KMH_PER_MPH: f64 = 1.60934;

/// m/s per mile per hour.
pub const MPS_PER_MPH: f64 = 0.44704;

/// mm per inch.
pub const MM_PER_IN: f64 = 25.4;

/// Feet per meter.
pub const FEET_PER_METER: f64 = 3.28084;

// ============================================================================
// UNIT ENUMS
// ============================================================================

/// Temperature units accepted on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureUnit {
    Fahrenheit,
    Celsius,
}

/// Pressure units accepted on the wire. `Mbar` is numerically identical to
/// `Hpa` and kept as a separate tag for hosts that report millibars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PressureUnit {
    InHg,
    Hpa,
    Mbar,
}

/// Speed units accepted on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedUnit {
    Mph,
    Kmh,
    Mps,
}

/// Rain-rate units accepted on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RainRateUnit {
    InPerHour,
    MmPerHour,
}

/// Length units accepted on the wire (station altitude).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthUnit {
    Meters,
    Feet,
}

/// Output unit system requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    Metric,
    #[default]
    Imperial,
}

// ============================================================================
// SCALAR CONVERSIONS
// ============================================================================

/// Convert °C to °F.
#[inline]
#[must_use]
pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

/// Convert °F to °C.
#[inline]
#[must_use]
pub fn fahrenheit_to_celsius(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

/// Convert hPa (or mbar) to inHg.
#[inline]
#[must_use]
pub fn hpa_to_inhg(hpa: f64) -> f64 {
    hpa / HPA_PER_INHG
}

/// Convert inHg to hPa.
#[inline]
#[must_use]
pub fn inhg_to_hpa(inhg: f64) -> f64 {
    inhg * HPA_PER_INHG
}

/// Convert km/h to mph.
#[inline]
#[must_use]
pub fn kmh_to_mph(kmh: f64) -> f64 {
    kmh / KMH_PER_MPH
}

/// Convert m/s to mph.
#[inline]
#[must_use]
pub fn mps_to_mph(mps: f64) -> f64 {
    mps / MPS_PER_MPH
}

/// Convert mph to km/h.
#[inline]
#[must_use]
pub fn mph_to_kmh(mph: f64) -> f64 {
    mph * KMH_PER_MPH
}

/// Convert mph to m/s.
#[inline]
#[must_use]
pub fn mph_to_mps(mph: f64) -> f64 {
    mph * MPS_PER_MPH
}

/// Convert mm/h to in/h.
#[inline]
#[must_use]
pub fn mmh_to_inh(mmh: f64) -> f64 {
    mmh / MM_PER_IN
}

/// Convert in/h to mm/h.
#[inline]
#[must_use]
pub fn inh_to_mmh(inh: f64) -> f64 {
    inh * MM_PER_IN
}

/// Convert feet to meters.
#[inline]
#[must_use]
pub fn feet_to_meters(ft: f64) -> f64 {
    ft / FEET_PER_METER
}

/// Convert meters to feet.
#[inline]
#[must_use]
pub fn meters_to_feet(m: f64) -> f64 {
    m * FEET_PER_METER
}

// ============================================================================
// UNIT-TAGGED READINGS
// ============================================================================

/// A scalar sensor value paired with its origin unit.
///
/// This is the wire form of every dimensioned field in a
/// [`SensorSnapshot`](crate::core_types::snapshot::SensorSnapshot).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading<U> {
    pub value: f64,
    pub unit: U,
}

impl<U> Reading<U> {
    /// Pair a value with its unit.
    #[inline]
    pub fn new(value: f64, unit: U) -> Self {
        Self { value, unit }
    }
}

impl Reading<TemperatureUnit> {
    /// Canonicalize to °F.
    #[must_use]
    pub fn fahrenheit(&self) -> f64 {
        match self.unit {
            TemperatureUnit::Fahrenheit => self.value,
            TemperatureUnit::Celsius => celsius_to_fahrenheit(self.value),
        }
    }
}

impl Reading<PressureUnit> {
    /// Canonicalize to inHg.
    #[must_use]
    pub fn inhg(&self) -> f64 {
        match self.unit {
            PressureUnit::InHg => self.value,
            PressureUnit::Hpa | PressureUnit::Mbar => hpa_to_inhg(self.value),
        }
    }
}

impl Reading<SpeedUnit> {
    /// Canonicalize to mph.
    #[must_use]
    pub fn mph(&self) -> f64 {
        match self.unit {
            SpeedUnit::Mph => self.value,
            SpeedUnit::Kmh => kmh_to_mph(self.value),
            SpeedUnit::Mps => mps_to_mph(self.value),
        }
    }
}

impl Reading<RainRateUnit> {
    /// Canonicalize to in/h.
    #[must_use]
    pub fn inches_per_hour(&self) -> f64 {
        match self.unit {
            RainRateUnit::InPerHour => self.value,
            RainRateUnit::MmPerHour => mmh_to_inh(self.value),
        }
    }
}

impl Reading<LengthUnit> {
    /// Canonicalize to meters.
    #[must_use]
    pub fn meters(&self) -> f64 {
        match self.unit {
            LengthUnit::Meters => self.value,
            LengthUnit::Feet => feet_to_meters(self.value),
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitSystem::Metric => write!(f, "metric"),
            UnitSystem::Imperial => write!(f, "imperial"),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_temperature_round_trip() {
        let c = 21.7;
        assert_relative_eq!(fahrenheit_to_celsius(celsius_to_fahrenheit(c)), c, epsilon = 1e-12);
    }

    #[test]
    fn test_freezing_point() {
        assert_relative_eq!(celsius_to_fahrenheit(0.0), 32.0);
        assert_relative_eq!(fahrenheit_to_celsius(32.0), 0.0);
    }

    #[test]
    fn test_pressure_round_trip() {
        let p = 29.92;
        assert_relative_eq!(hpa_to_inhg(inhg_to_hpa(p)), p, epsilon = 1e-12);
        // Standard atmosphere: 29.92 inHg ≈ 1013.2 hPa
        assert_relative_eq!(inhg_to_hpa(29.92), 1013.2, epsilon = 0.1);
    }

    #[test]
    fn test_speed_round_trip() {
        let v = 12.5;
        assert_relative_eq!(kmh_to_mph(mph_to_kmh(v)), v, epsilon = 1e-12);
        assert_relative_eq!(mps_to_mph(mph_to_mps(v)), v, epsilon = 1e-12);
    }

    #[test]
    fn test_rain_rate_round_trip() {
        let r = 0.25;
        assert_relative_eq!(mmh_to_inh(inh_to_mmh(r)), r, epsilon = 1e-12);
        assert_relative_eq!(inh_to_mmh(1.0), 25.4);
    }

    #[test]
    fn test_length_round_trip() {
        let h = 350.0;
        assert_relative_eq!(feet_to_meters(meters_to_feet(h)), h, epsilon = 1e-9);
    }

    #[test]
    fn test_reading_canonicalization() {
        let t = Reading::new(25.0, TemperatureUnit::Celsius);
        assert_relative_eq!(t.fahrenheit(), 77.0);

        let p = Reading::new(1013.25, PressureUnit::Hpa);
        assert_relative_eq!(p.inhg(), 29.921, epsilon = 1e-3);

        let w = Reading::new(10.0, SpeedUnit::Mps);
        assert_relative_eq!(w.mph(), 22.369, epsilon = 1e-3);

        let r = Reading::new(5.08, RainRateUnit::MmPerHour);
        assert_relative_eq!(r.inches_per_hour(), 0.2);

        let a = Reading::new(328.084, LengthUnit::Feet);
        assert_relative_eq!(a.meters(), 100.0, epsilon = 1e-6);
    }

    #[test]
    fn test_reading_serde_wire_shape() {
        let t = Reading::new(72.0, TemperatureUnit::Fahrenheit);
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, r#"{"value":72.0,"unit":"fahrenheit"}"#);

        let back: Reading<TemperatureUnit> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }
}
