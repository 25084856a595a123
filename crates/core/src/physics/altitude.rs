//! Barometric altitude correction.
//!
//! Converts between station pressure and its sea-level equivalent with the
//! hypsometric formula for the standard atmosphere, and shifts classification
//! thresholds for callers that must work on uncorrected station pressure.
//!
//! # References
//!
//! - U.S. Standard Atmosphere (1976), NOAA/NASA/USAF.

/// Standard temperature lapse rate (K/m).
const LAPSE_RATE: f64 = 0.0065;
/// Sea-level standard temperature (K).
const SEA_LEVEL_TEMP_K: f64 = 288.15;
/// Standard gravity (m/s²).
const GRAVITY: f64 = 9.80665;
/// Molar mass of dry air (kg/mol).
const MOLAR_MASS_AIR: f64 = 0.0289644;
/// Universal gas constant (J/(mol·K)).
const GAS_CONSTANT: f64 = 8.31432;

/// Exponent of the barometric formula, g·M/(R·L) ≈ 5.2559.
fn barometric_exponent() -> f64 {
    GRAVITY * MOLAR_MASS_AIR / (GAS_CONSTANT * LAPSE_RATE)
}

/// Convert station pressure to its sea-level equivalent.
///
/// P₀ = P·(1 − L·h/T₀)^(−g·M/(R·L))
///
/// The ratio form is unit-agnostic; the pipeline calls it with inHg.
/// Elevations at or below zero return the input unchanged.
///
/// # Arguments
/// * `station_pressure` - Measured pressure at the station
/// * `altitude_m` - Station elevation above sea level (m)
#[must_use]
pub fn station_to_sea_level(station_pressure: f64, altitude_m: f64) -> f64 {
    if altitude_m <= 0.0 {
        return station_pressure;
    }
    let base = 1.0 - LAPSE_RATE * altitude_m / SEA_LEVEL_TEMP_K;
    if base <= 0.0 {
        // Beyond the validity of the troposphere model; leave uncorrected.
        return station_pressure;
    }
    station_pressure * base.powf(-barometric_exponent())
}

/// Inverse of [`station_to_sea_level`]: the pressure a station at
/// `altitude_m` would measure for a given sea-level pressure.
#[must_use]
pub fn sea_level_to_station(sea_level_pressure: f64, altitude_m: f64) -> f64 {
    if altitude_m <= 0.0 {
        return sea_level_pressure;
    }
    let base = 1.0 - LAPSE_RATE * altitude_m / SEA_LEVEL_TEMP_K;
    if base <= 0.0 {
        return sea_level_pressure;
    }
    sea_level_pressure * base.powf(barometric_exponent())
}

/// Shift a sea-level classification threshold down to station altitude.
///
/// Approximately 1 hPa per 8 m of elevation, so banding station pressure
/// against shifted thresholds classifies the same as banding corrected
/// pressure against the sea-level table.
///
/// # Arguments
/// * `threshold_inhg` - Sea-level threshold (inHg)
/// * `altitude_m` - Station elevation (m)
#[must_use]
pub fn shifted_threshold_inhg(threshold_inhg: f64, altitude_m: f64) -> f64 {
    threshold_inhg - crate::constants::PRESSURE_SHIFT_INHG_PER_M * altitude_m.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_sea_level_correction_raises_pressure() {
        // A station at 500 m reads noticeably less than sea level
        let corrected = station_to_sea_level(28.20, 500.0);
        assert!(corrected > 28.20);
        // Standard atmosphere: ~1.8 inHg difference at 500 m
        assert_abs_diff_eq!(corrected, 29.96, epsilon = 0.05);
    }

    #[test]
    fn test_zero_or_negative_altitude_is_identity() {
        assert_abs_diff_eq!(station_to_sea_level(29.92, 0.0), 29.92);
        assert_abs_diff_eq!(station_to_sea_level(29.92, -10.0), 29.92);
        assert_abs_diff_eq!(sea_level_to_station(29.92, 0.0), 29.92);
    }

    #[test]
    fn test_round_trip_within_centibar() {
        // §round-trip law: station→sea→station within 0.01 inHg
        for altitude in [50.0, 200.0, 850.0, 2400.0] {
            let p = 29.45;
            let round = sea_level_to_station(station_to_sea_level(p, altitude), altitude);
            assert_abs_diff_eq!(round, p, epsilon = 0.01);
        }
    }

    #[test]
    fn test_threshold_shift_tracks_correction() {
        // Banding station pressure against shifted thresholds agrees with
        // banding corrected pressure against the sea-level table.
        let altitude = 400.0;
        let sea_level = 29.90;
        let station = sea_level_to_station(sea_level, altitude);

        let threshold = crate::constants::PRESSURE_NORMAL_LOW;
        let shifted = shifted_threshold_inhg(threshold, altitude);

        assert_eq!(sea_level >= threshold, station >= shifted);
    }

    #[test]
    fn test_shift_magnitude() {
        // 80 m ≈ 10 hPa ≈ 0.295 inHg
        let shifted = shifted_threshold_inhg(30.00, 80.0);
        assert_abs_diff_eq!(30.00 - shifted, 0.2953, epsilon = 1e-3);
    }
}
