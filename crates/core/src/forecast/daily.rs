//! Five-day daily projection.
//!
//! Each day evolves the condition ladder forward, projects temperature from
//! the seasonal curve plus trajectory-weighted pressure influence and a
//! volatility-scaled wobble (deterministic, trend-driven), and derives
//! precipitation, wind, and humidity from the per-condition tables. All
//! outputs are Imperial; the orchestrator re-encodes for the caller.

use crate::constants::canonical_precip_mm;
use crate::core_types::units::mmh_to_inh;
use crate::core_types::Condition;
use crate::forecast::context::ForecastContext;
use crate::forecast::trajectory::{
    condition_at, evolve, ladder_position, step_rate_per_hour, Trajectory,
};
use crate::forecast::DailyForecast;
use chrono::{Datelike, Duration};

/// Annual temperature curve amplitude (°F).
const SEASONAL_AMPLITUDE_F: f64 = 12.0;

/// Departure of the annual temperature curve from its mean for a day of
/// year. Peak lands in mid-July, trough in mid-January.
fn seasonal_curve_f(day_of_year: f64) -> f64 {
    SEASONAL_AMPLITUDE_F * (2.0 * std::f64::consts::PI * (day_of_year - 105.0) / 365.25).sin()
}

/// Build the 5-day daily forecast.
#[must_use]
pub fn daily_forecast(ctx: &ForecastContext) -> Vec<DailyForecast> {
    let trajectory = Trajectory::derive(ctx);
    let rate = step_rate_per_hour(ctx.combined_trend());
    let start_position = ladder_position(ctx.condition);
    let doy = f64::from(ctx.timestamp.ordinal());
    let swing = ctx.diurnal_swing_f();

    (0..5)
        .map(|day| {
            let days_out = f64::from(day + 1);
            let hours_out = 24.0 * days_out;

            let mut condition =
                condition_at(evolve(start_position, trajectory.score, rate, hours_out)).to_day();
            if day == 0 && ctx.storm_probability >= 70.0 {
                condition = Condition::LightningRainy;
            }

            // Temperature: seasonal drift from today, pressure influence up
            // to ±5 °F, and a deterministic volatility wobble, all dampened
            // by stability and forecast distance.
            let seasonal = seasonal_curve_f(doy + days_out) - seasonal_curve_f(doy);
            let pressure_influence =
                5.0 * trajectory.score / 100.0 * trajectory.confidence_at(days_out);
            let wobble = ctx.temp_volatility_f.min(6.0)
                * 0.25
                * (days_out * (1.0 + ctx.combined_trend() * 300.0)).sin();
            let dampening = (0.7 + 0.3 * ctx.stability) * (1.0 - days_out / 8.0);
            let mean_f = ctx.temp_f + seasonal + (pressure_influence + wobble) * dampening;

            let precipitation_in =
                mmh_to_inh(canonical_precip_mm(condition) * ctx.precipitation_multiplier());

            DailyForecast {
                datetime: ctx.timestamp + Duration::days(i64::from(day + 1)),
                condition,
                temp_high: mean_f + swing / 2.0,
                temp_low: mean_f - swing / 2.0,
                precipitation: precipitation_in,
                precipitation_probability: ctx.precipitation_probability(),
                wind_speed: ctx.projected_wind_mph(condition),
                wind_bearing: ctx.wind.mean_bearing_deg,
                humidity: ctx.converged_humidity(condition, hours_out),
            }
        })
        .collect()
}
