//! Magnus–Tetens dewpoint.
//!
//! # References
//!
//! - Magnus, G. (1844); Tetens, O. (1930). Saturation vapor pressure
//!   approximation with a=17.27, b=237.7 °C, accurate to ±0.4 °C over
//!   −40..50 °C.

use crate::core_types::units::{celsius_to_fahrenheit, fahrenheit_to_celsius};
use crate::pipeline::error::CoreError;

/// Magnus coefficient a (dimensionless).
const MAGNUS_A: f64 = 17.27;
/// Magnus coefficient b (°C).
const MAGNUS_B: f64 = 237.7;

/// Compute the dewpoint from air temperature and relative humidity.
///
/// γ = a·T/(b+T) + ln(RH/100), Td = b·γ/(a−γ), on °C; input and output are °F.
///
/// # Arguments
/// * `temp_f` - Air temperature (°F)
/// * `humidity_pct` - Relative humidity, must be in (0, 100]
///
/// # Errors
/// `InvalidHumidity` when humidity is ≤ 0 or > 100.
pub fn dewpoint_f(temp_f: f64, humidity_pct: f64) -> Result<f64, CoreError> {
    if humidity_pct <= 0.0 || humidity_pct > 100.0 {
        return Err(CoreError::InvalidHumidity {
            value: humidity_pct,
        });
    }
    let temp_c = fahrenheit_to_celsius(temp_f);
    let gamma = MAGNUS_A * temp_c / (MAGNUS_B + temp_c) + (humidity_pct / 100.0).ln();
    let dewpoint_c = MAGNUS_B * gamma / (MAGNUS_A - gamma);
    Ok(celsius_to_fahrenheit(dewpoint_c))
}

/// Invert Magnus–Tetens: the relative humidity implied by a measured
/// dewpoint. Used when a station reports dewpoint but no hygrometer.
///
/// RH = 100·exp(a·Td/(b+Td) − a·T/(b+T)); the result is clamped to
/// (0, 100] since a dewpoint above the air temperature is unphysical.
#[must_use]
pub fn humidity_from_dewpoint(temp_f: f64, dewpoint_f: f64) -> f64 {
    let temp_c = fahrenheit_to_celsius(temp_f);
    let dew_c = fahrenheit_to_celsius(dewpoint_f);
    let rh = 100.0
        * (MAGNUS_A * dew_c / (MAGNUS_B + dew_c) - MAGNUS_A * temp_c / (MAGNUS_B + temp_c)).exp();
    rh.clamp(0.1, 100.0)
}
