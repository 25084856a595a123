//! 24-hour hourly projection with astronomical context.
//!
//! Hourly records add what the daily projection cannot see: the diurnal
//! temperature sine, per-hour daylight from the configured sunrise/sunset,
//! a pressure-aware condition evolution cadence, and day/night condition
//! remapping. All outputs are Imperial; the orchestrator re-encodes for the
//! caller.

use crate::constants::canonical_precip_mm;
use crate::core_types::units::mmh_to_inh;
use crate::core_types::Condition;
use crate::forecast::context::ForecastContext;
use crate::forecast::trajectory::{
    condition_at, evolve, ladder_position, step_rate_per_hour, Trajectory,
};
use crate::forecast::HourlyForecast;
use chrono::{DateTime, Duration, NaiveTime, Timelike, Utc};

/// Assumed peak solar elevation for the interpolated arc (degrees).
const PEAK_ELEVATION_DEG: f64 = 60.0;

/// Fraction of the daily canonical precipitation assigned to one wet hour.
const HOURLY_PRECIP_SHARE: f64 = 1.0 / 6.0;

/// Daylight test against the configured sunrise/sunset.
#[must_use]
pub fn is_daytime_at(timestamp: DateTime<Utc>, sunrise: NaiveTime, sunset: NaiveTime) -> bool {
    let t = timestamp.time();
    t >= sunrise && t < sunset
}

/// Solar elevation linearly interpolated across the daylight arc: zero at
/// sunrise and sunset, [`PEAK_ELEVATION_DEG`] at the midpoint.
#[must_use]
pub fn interpolated_elevation_deg(
    timestamp: DateTime<Utc>,
    sunrise: NaiveTime,
    sunset: NaiveTime,
) -> f64 {
    if !is_daytime_at(timestamp, sunrise, sunset) {
        return 0.0;
    }
    let seconds_from_sunrise =
        f64::from(timestamp.time().num_seconds_from_midnight()) - f64::from(sunrise.num_seconds_from_midnight());
    let day_length =
        f64::from(sunset.num_seconds_from_midnight()) - f64::from(sunrise.num_seconds_from_midnight());
    if day_length <= 0.0 {
        return 0.0;
    }
    let arc_position = seconds_from_sunrise / day_length; // 0 at sunrise, 1 at sunset
    PEAK_ELEVATION_DEG * (1.0 - (2.0 * arc_position - 1.0).abs())
}

/// Condition evolution cadence (hours): a fast-moving system re-evaluates
/// every 3 h, storm potential every 4 h, otherwise every 6 h.
fn evolution_cadence_hours(ctx: &ForecastContext) -> f64 {
    if (ctx.pressure_trend_3h * 24.0).abs() > 1.0 {
        3.0
    } else if ctx.storm_probability > 30.0 {
        4.0
    } else {
        6.0
    }
}

/// Diurnal sine anchored at 06:00: crosses the mean at sunrise, peaks at
/// mid-afternoon equivalent.
fn diurnal_phase(timestamp: DateTime<Utc>) -> f64 {
    let hour = f64::from(timestamp.hour()) + f64::from(timestamp.minute()) / 60.0;
    (2.0 * std::f64::consts::PI * (hour - 6.0) / 24.0).sin()
}

/// Build the 24-hour hourly forecast.
#[must_use]
pub fn hourly_forecast(
    ctx: &ForecastContext,
    sunrise: NaiveTime,
    sunset: NaiveTime,
) -> Vec<HourlyForecast> {
    let trajectory = Trajectory::derive(ctx);
    let rate = step_rate_per_hour(ctx.combined_trend());
    let start_position = ladder_position(ctx.condition);
    let cadence = evolution_cadence_hours(ctx);
    let amplitude = ctx.diurnal_swing_f() / 2.0;
    let phase_now = diurnal_phase(ctx.timestamp);
    let combined = ctx.combined_trend();

    (0..24)
        .map(|offset| {
            let hours_out = f64::from(offset + 1);
            let datetime = ctx.timestamp + Duration::hours(i64::from(offset + 1));
            let daytime = is_daytime_at(datetime, sunrise, sunset);
            let hour = datetime.hour();

            // Condition evolves on the cadence grid, not continuously.
            let evolved_hours = (hours_out / cadence).floor() * cadence;
            let mut condition =
                condition_at(evolve(start_position, trajectory.score, rate, evolved_hours));

            // Diurnal remapping leaves the ladder position alone.
            if (6..10).contains(&hour) && condition == Condition::Cloudy && combined > 0.0 {
                condition = Condition::PartlyCloudy;
            }
            if (14..18).contains(&hour) && condition == Condition::Sunny && combined < 0.0 {
                condition = Condition::PartlyCloudy;
            }
            if !daytime && condition == Condition::Cloudy && combined > 0.015 {
                condition = Condition::PartlyCloudyNight;
            }
            if !daytime {
                condition = condition.to_night();
            }

            let temperature = ctx.temp_f
                + amplitude * (diurnal_phase(datetime) - phase_now)
                + 2.0 * trajectory.score / 100.0 * (hours_out / 24.0);

            let precipitation_in = mmh_to_inh(
                canonical_precip_mm(condition.to_day())
                    * HOURLY_PRECIP_SHARE
                    * ctx.precipitation_multiplier(),
            );

            HourlyForecast {
                datetime,
                condition,
                temperature,
                precipitation: precipitation_in,
                precipitation_probability: ctx.precipitation_probability(),
                wind_speed: ctx.projected_wind_mph(condition),
                wind_bearing: ctx.wind.mean_bearing_deg,
                humidity: ctx.converged_humidity(condition, hours_out),
            }
        })
        .collect()
}
