//! Physical models: barometric correction, dewpoint, clear-sky radiation

pub mod altitude;
pub mod dewpoint;
pub mod solar;

pub use altitude::{sea_level_to_station, shifted_threshold_inhg, station_to_sea_level};
pub use dewpoint::{dewpoint_f, humidity_from_dewpoint};
pub use solar::{
    air_mass, atmospheric_transmission, clear_sky_irradiance, estimate_elevation_deg, is_daytime,
    solar_constant_variation, SolarContext,
};
