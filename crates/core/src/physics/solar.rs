//! Clear-sky solar radiation model.
//!
//! Theoretical surface irradiance is the product of the solar constant
//! (with Earth–Sun distance variation), a multi-component atmospheric
//! transmission, and the sine of the solar elevation. The model feeds the
//! cloud-cover analyzer's relative regime and the fog scorer's daytime
//! sanity check.
//!
//! # References
//!
//! - Gueymard, C.A. (2003). "Direct solar transmittance and irradiance
//!   predictions with broadband models." Solar Energy, 74(5), 355-379.
//! - Spencer, J.W. (1971). Fourier series representation of the position of
//!   the sun (distance variation term).

use chrono::{DateTime, Datelike, Utc};

/// Solar constant at mean Earth–Sun distance (W/m²).
pub const SOLAR_CONSTANT_WM2: f64 = 1366.0;

/// Extinction coefficients per unit air mass: Rayleigh scattering, ozone,
/// water vapor, aerosol.
const EXTINCTION_COEFFS: [f64; 4] = [0.1, 0.02, 0.05, 0.1];

/// Radiation above which the sky is unambiguously daylit (W/m²).
pub const DAYTIME_RADIATION_WM2: f64 = 5.0;
/// Illuminance above which the sky is unambiguously daylit (lx).
pub const DAYTIME_LUX: f64 = 50.0;
/// UV index above which the sky is unambiguously daylit.
pub const DAYTIME_UV: f64 = 0.1;

/// Elevation below which the relative cloud regime is unreliable (degrees).
pub const LOW_ELEVATION_DEG: f64 = 15.0;

/// Earth–Sun distance correction to the solar constant.
///
/// 1 + 0.033·cos(2π·(doy − 4)/365.25); perihelion is around January 4th.
#[must_use]
pub fn solar_constant_variation(day_of_year: u32) -> f64 {
    let doy = f64::from(day_of_year);
    1.0 + 0.033 * (2.0 * std::f64::consts::PI * (doy - 4.0) / 365.25).cos()
}

/// Gueymard (2003) relative optical air mass.
///
/// AM = 1 / (cos Z + 0.00176759·Z·(94.37515 − Z)^(−1.21563)) with the zenith
/// angle Z = 90° − elevation in degrees. Returns `f64::INFINITY` at or below
/// the horizon.
#[must_use]
pub fn air_mass(elevation_deg: f64) -> f64 {
    if elevation_deg <= 0.0 {
        return f64::INFINITY;
    }
    let zenith = 90.0 - elevation_deg;
    let correction = 0.00176759 * zenith * (94.37515 - zenith).powf(-1.21563);
    1.0 / (zenith.to_radians().cos() + correction)
}

/// Combined atmospheric transmission for a given air mass.
///
/// Product of exp(−kᵢ·AM) over the Rayleigh, ozone, water-vapor, and aerosol
/// components. Zero for an infinite air mass.
#[must_use]
pub fn atmospheric_transmission(air_mass: f64) -> f64 {
    if !air_mass.is_finite() {
        return 0.0;
    }
    let total_k: f64 = EXTINCTION_COEFFS.iter().sum();
    (-total_k * air_mass).exp()
}

/// Theoretical clear-sky irradiance on a horizontal surface (W/m²).
///
/// # Arguments
/// * `base_wm2` - Zenith-calibrated maximum radiation (the solar constant for
///   the physical model, or the station's configured zenith maximum)
/// * `elevation_deg` - Solar elevation above the horizon
/// * `day_of_year` - 1-based ordinal day, for the distance variation
#[must_use]
pub fn clear_sky_irradiance(base_wm2: f64, elevation_deg: f64, day_of_year: u32) -> f64 {
    if elevation_deg <= 0.0 {
        return 0.0;
    }
    let variation = solar_constant_variation(day_of_year);
    let transmission = atmospheric_transmission(air_mass(elevation_deg));
    base_wm2 * variation * transmission * elevation_deg.to_radians().sin()
}

/// Estimate the solar elevation from measured radiation when no elevation
/// sensor exists. Graded magnitude bands; the floor of 15° keeps the
/// relative cloud regime usable whenever there is meaningful radiation.
#[must_use]
pub fn estimate_elevation_deg(radiation_wm2: f64) -> f64 {
    if radiation_wm2 >= 800.0 {
        60.0
    } else if radiation_wm2 >= 500.0 {
        45.0
    } else if radiation_wm2 >= 200.0 {
        25.0
    } else {
        15.0
    }
}

/// Daytime test over the luminous sensor suite. Any one sensor showing
/// daylight is sufficient.
#[must_use]
pub fn is_daytime(radiation_wm2: Option<f64>, lux: Option<f64>, uv_index: Option<f64>) -> bool {
    radiation_wm2.is_some_and(|r| r > DAYTIME_RADIATION_WM2)
        || lux.is_some_and(|l| l > DAYTIME_LUX)
        || uv_index.is_some_and(|u| u > DAYTIME_UV)
}

/// Day of year (1..=366) for a timestamp.
#[must_use]
pub fn day_of_year(timestamp: DateTime<Utc>) -> u32 {
    timestamp.ordinal()
}

/// Per-observation solar context consumed by the analyzers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarContext {
    /// Supplied or estimated solar elevation (degrees).
    pub elevation_deg: f64,
    /// True when the elevation came from the radiation estimator rather than
    /// a sensor.
    pub elevation_estimated: bool,
    /// Theoretical clear-sky irradiance at physical calibration (W/m²).
    pub clear_sky_wm2: f64,
    pub is_daytime: bool,
    pub day_of_year: u32,
}

impl SolarContext {
    /// Derive the solar context for one observation.
    #[must_use]
    pub fn derive(
        timestamp: DateTime<Utc>,
        radiation_wm2: Option<f64>,
        lux: Option<f64>,
        uv_index: Option<f64>,
        supplied_elevation_deg: Option<f64>,
    ) -> Self {
        let doy = day_of_year(timestamp);
        let (elevation_deg, elevation_estimated) = match supplied_elevation_deg {
            Some(e) => (e, false),
            None => (estimate_elevation_deg(radiation_wm2.unwrap_or(0.0)), true),
        };
        Self {
            elevation_deg,
            elevation_estimated,
            clear_sky_wm2: clear_sky_irradiance(SOLAR_CONSTANT_WM2, elevation_deg, doy),
            is_daytime: is_daytime(radiation_wm2, lux, uv_index),
            day_of_year: doy,
        }
    }
}
