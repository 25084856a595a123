//! Meteorological state bundle feeding the forecast engine.
//!
//! One context is derived per forecast call from the pipeline state: pressure
//! trends, storm probability, cloud analysis, wind pattern, moisture
//! transport, and an atmospheric-stability scalar. Everything downstream of
//! this bundle is a pure projection.

use crate::analysis::pressure_wind::PressureSystem;
use crate::constants::target_humidity_pct;
use crate::core_types::Condition;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wind regime summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindPattern {
    /// Circular direction stability in [0, 1].
    pub direction_stability: f64,
    /// Circular mean bearing, degrees.
    pub mean_bearing_deg: f64,
    pub gust_factor: f64,
    /// Pressure-gradient wind proxy (mph-equivalent), from the 3-h trend.
    pub gradient_proxy_mph: f64,
}

/// Moisture availability summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoistureTransport {
    pub humidity_pct: f64,
    pub dewpoint_spread_f: f64,
    /// Nearness to saturation in [0, 1].
    pub condensation_potential: f64,
    /// Capacity to move moisture in, from humidity and wind, in [0, 1].
    pub transport_potential: f64,
}

/// Full state bundle for one forecast run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastContext {
    pub timestamp: DateTime<Utc>,
    pub temp_f: f64,
    pub humidity_pct: f64,
    pub wind_mph: f64,
    pub condition: Condition,
    pub cloud_cover_pct: f64,
    pub pressure_system: Option<PressureSystem>,
    /// 3-h pressure slope, inHg/h; flat when history is insufficient.
    pub pressure_trend_3h: f64,
    /// 24-h pressure slope, inHg/h; flat when history is insufficient.
    pub pressure_trend_24h: f64,
    pub storm_probability: f64,
    pub wind: WindPattern,
    pub moisture: MoistureTransport,
    /// Atmospheric stability in [0, 1]; 0.5 is neutral.
    pub stability: f64,
    /// Day-to-day temperature volatility from history (°F).
    pub temp_volatility_f: f64,
    /// Humidity slope, %/h; flat when history is insufficient.
    pub humidity_trend: f64,
}

impl ForecastContext {
    /// Trend blend the projections steer by: the short horizon dominates but
    /// the synoptic trend keeps one bad hour from whipsawing a 5-day outlook.
    #[must_use]
    pub fn combined_trend(&self) -> f64 {
        0.6 * self.pressure_trend_3h + 0.4 * self.pressure_trend_24h
    }

    /// Diurnal temperature swing (°F): wider under a stable air mass,
    /// narrower when gradient wind keeps the boundary layer mixed.
    #[must_use]
    pub fn diurnal_swing_f(&self) -> f64 {
        let gradient_wind = self.wind_mph + self.wind.gradient_proxy_mph;
        (6.0 + 14.0 * self.stability) * (1.0 - (gradient_wind / 50.0).min(0.5))
    }

    /// Multiplier applied to a condition's canonical precipitation amount.
    ///
    /// Storm enhancement, moisture availability, instability, a rising
    /// humidity trend (up to 1.5×), and falling pressure all amplify.
    #[must_use]
    pub fn precipitation_multiplier(&self) -> f64 {
        let storm_enhancement = 1.0 + self.storm_probability / 100.0;
        let moisture_factor =
            self.moisture.transport_potential * self.moisture.condensation_potential;
        let instability = 1.0 + (1.0 - self.stability) * 0.5;
        let humidity_rising = 1.0 + (self.humidity_trend * 0.25).clamp(0.0, 0.5);
        let pressure_falling = 1.0 + ((-self.combined_trend()) * 25.0).clamp(0.0, 0.5);
        storm_enhancement * moisture_factor * instability * humidity_rising * pressure_falling
    }

    /// Saturating precipitation probability in [0, 100].
    #[must_use]
    pub fn precipitation_probability(&self) -> f64 {
        let trend_points = ((-self.combined_trend()) * 2000.0).clamp(0.0, 40.0);
        let humidity_points = ((self.humidity_pct - 50.0) * 0.6).clamp(0.0, 30.0);
        let storm_points = self.storm_probability * 0.4;
        (trend_points + humidity_points + storm_points).clamp(0.0, 100.0)
    }

    /// Projected sustained wind (mph) for a forecast condition.
    #[must_use]
    pub fn projected_wind_mph(&self, condition: Condition) -> f64 {
        let condition_factor = match condition {
            Condition::Windy => 1.8,
            Condition::Lightning | Condition::LightningRainy => 1.6,
            Condition::Pouring => 1.4,
            Condition::Rainy | Condition::Snowy => 1.2,
            Condition::Sunny | Condition::ClearNight => 0.9,
            _ => 1.0,
        };
        let system_factor = match self.pressure_system {
            Some(PressureSystem::VeryHigh) => 0.8,
            Some(PressureSystem::High) => 0.9,
            Some(PressureSystem::Low) => 1.15,
            Some(PressureSystem::VeryLow) => 1.3,
            Some(PressureSystem::ExtremelyLow) => 1.5,
            Some(PressureSystem::Normal) | None => 1.0,
        };
        let projected = self.wind_mph * condition_factor * system_factor
            + self.wind.gradient_proxy_mph * 0.5;
        // A steady direction argues for a steady speed
        (projected * (0.8 + 0.2 * self.wind.direction_stability)).max(0.0)
    }

    /// Humidity converged toward a condition's target at 30 %/h of the
    /// remaining gap, clamped to [0, 100].
    #[must_use]
    pub fn converged_humidity(&self, condition: Condition, hours: f64) -> f64 {
        let target = target_humidity_pct(condition);
        let factor = (0.3 * hours).min(1.0);
        (self.humidity_pct + (target - self.humidity_pct) * factor).clamp(0.0, 100.0)
    }
}

/// Atmospheric stability in [0, 1] from the state snapshot inputs.
///
/// Baseline 0.5; a flat synoptic trend (|24-h trend| under ~2 hPa per day)
/// adds 0.2; light wind adds 0.15, strong wind removes 0.15; humid air adds
/// 0.1.
#[must_use]
pub fn atmospheric_stability(trend_24h_inhg_per_h: f64, wind_mph: f64, humidity_pct: f64) -> f64 {
    let mut stability: f64 = 0.5;
    if (trend_24h_inhg_per_h * 24.0).abs() < 0.06 {
        stability += 0.2;
    }
    if wind_mph < 5.0 {
        stability += 0.15;
    } else if wind_mph > 15.0 {
        stability -= 0.15;
    }
    if humidity_pct > 70.0 {
        stability += 0.1;
    }
    stability.clamp(0.0, 1.0)
}

/// Condensation potential in [0, 1]: saturation nearness from humidity and
/// dewpoint spread.
#[must_use]
pub fn condensation_potential(humidity_pct: f64, dewpoint_spread_f: f64) -> f64 {
    ((humidity_pct / 100.0) * (1.0 - dewpoint_spread_f / 20.0)).clamp(0.0, 1.0)
}

/// Transport potential in [0, 1]: how readily the flow replenishes moisture.
#[must_use]
pub fn transport_potential(humidity_pct: f64, wind_mph: f64) -> f64 {
    ((humidity_pct / 100.0) * (0.5 + wind_mph / 30.0)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::TimeZone;

    fn context() -> ForecastContext {
        ForecastContext {
            timestamp: Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap(),
            temp_f: 72.0,
            humidity_pct: 55.0,
            wind_mph: 6.0,
            condition: Condition::PartlyCloudy,
            cloud_cover_pct: 40.0,
            pressure_system: Some(PressureSystem::Normal),
            pressure_trend_3h: 0.0,
            pressure_trend_24h: 0.0,
            storm_probability: 0.0,
            wind: WindPattern {
                direction_stability: 0.9,
                mean_bearing_deg: 225.0,
                gust_factor: 1.3,
                gradient_proxy_mph: 0.0,
            },
            moisture: MoistureTransport {
                humidity_pct: 55.0,
                dewpoint_spread_f: 10.0,
                condensation_potential: condensation_potential(55.0, 10.0),
                transport_potential: transport_potential(55.0, 6.0),
            },
            stability: 0.7,
            temp_volatility_f: 2.0,
            humidity_trend: 0.0,
        }
    }

    #[test]
    fn test_stability_bands() {
        // Calm, flat, humid: maximally stable
        assert_abs_diff_eq!(atmospheric_stability(0.0, 2.0, 80.0), 0.95);
        // Neutral case
        assert_abs_diff_eq!(atmospheric_stability(0.0, 10.0, 50.0), 0.7);
        // Deep trend, strong wind: unstable
        assert_abs_diff_eq!(atmospheric_stability(-0.05, 20.0, 50.0), 0.35);
    }

    #[test]
    fn test_condensation_potential_extremes() {
        assert_abs_diff_eq!(condensation_potential(100.0, 0.0), 1.0);
        assert!(condensation_potential(50.0, 15.0) < 0.2);
        assert_abs_diff_eq!(condensation_potential(90.0, 40.0), 0.0);
    }

    #[test]
    fn test_swing_narrows_with_wind() {
        let calm = context();
        let mut windy = context();
        windy.wind_mph = 30.0;
        assert!(windy.diurnal_swing_f() < calm.diurnal_swing_f());
    }

    #[test]
    fn test_precip_multiplier_amplifiers() {
        let base = context().precipitation_multiplier();

        let mut stormy = context();
        stormy.storm_probability = 80.0;
        assert!(stormy.precipitation_multiplier() > base);

        let mut falling = context();
        falling.pressure_trend_3h = -0.02;
        falling.pressure_trend_24h = -0.01;
        assert!(falling.precipitation_multiplier() > base);

        let mut moistening = context();
        moistening.humidity_trend = 3.0;
        assert!(moistening.precipitation_multiplier() > base);
    }

    #[test]
    fn test_precip_probability_saturates() {
        let mut ctx = context();
        ctx.pressure_trend_3h = -0.1;
        ctx.pressure_trend_24h = -0.1;
        ctx.humidity_pct = 100.0;
        ctx.storm_probability = 100.0;
        assert_abs_diff_eq!(ctx.precipitation_probability(), 100.0);

        let dry = context();
        assert!(dry.precipitation_probability() < 20.0);
    }

    #[test]
    fn test_projected_wind_scales_with_condition() {
        let ctx = context();
        let calm = ctx.projected_wind_mph(Condition::Sunny);
        let stormy = ctx.projected_wind_mph(Condition::LightningRainy);
        assert!(stormy > calm);
    }

    #[test]
    fn test_humidity_convergence() {
        let ctx = context();
        // Long horizons saturate onto the target
        assert_abs_diff_eq!(
            ctx.converged_humidity(Condition::Fog, 24.0),
            target_humidity_pct(Condition::Fog)
        );
        // Short horizons move proportionally
        let one_hour = ctx.converged_humidity(Condition::Fog, 1.0);
        assert!(one_hour > 55.0 && one_hour < target_humidity_pct(Condition::Fog));
    }
}
