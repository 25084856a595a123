//! Evolution trajectory: a signed score steering the condition ladder.
//!
//! The ladder `sunny ↔ partly_cloudy ↔ cloudy ↔ rainy ↔ pouring` is indexed
//! by a continuous position; the trajectory score (negative = deterioration,
//! positive = improvement) advances the position over forecast time at a rate
//! set by the trend magnitude. Confidence degrades when the short and long
//! pressure trends disagree.

use crate::core_types::Condition;
use crate::forecast::context::ForecastContext;
use serde::{Deserialize, Serialize};

/// The condition ladder, best to worst.
pub const LADDER: [Condition; 5] = [
    Condition::Sunny,
    Condition::PartlyCloudy,
    Condition::Cloudy,
    Condition::Rainy,
    Condition::Pouring,
];

/// Trajectory score and confidence for one forecast run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    /// Signed score in [−100, 100]; negative deteriorates.
    pub score: f64,
    /// Agreement of the short and long trends, in [0, 1].
    pub confidence: f64,
}

impl Trajectory {
    /// Derive the trajectory from the forecast context.
    #[must_use]
    pub fn derive(ctx: &ForecastContext) -> Self {
        let combined = ctx.combined_trend();
        // ±0.02 inHg/h saturates the raw score
        let mut score = (combined / 0.02 * 100.0).clamp(-100.0, 100.0);
        // An unstable air mass mutes the pressure signal
        score *= 0.7 + 0.3 * ctx.stability;
        // Storm potential drags the outlook down regardless of trend
        score -= ctx.storm_probability * 0.3;
        let confidence =
            (1.0 - (ctx.pressure_trend_3h - ctx.pressure_trend_24h).abs() * 20.0).clamp(0.0, 1.0);
        Self {
            score: score.clamp(-100.0, 100.0),
            confidence,
        }
    }

    /// Confidence after projecting `days` ahead.
    #[must_use]
    pub fn confidence_at(self, days: f64) -> f64 {
        (self.confidence * (1.0 - days / 8.0)).clamp(0.0, 1.0)
    }
}

/// Ladder position for a current condition. Conditions outside the ladder
/// map onto the nearest rung of comparable severity.
#[must_use]
pub fn ladder_position(condition: Condition) -> f64 {
    match condition {
        Condition::Sunny | Condition::ClearNight => 0.0,
        Condition::PartlyCloudy | Condition::PartlyCloudyNight | Condition::Windy => 1.0,
        Condition::Cloudy | Condition::Fog => 2.0,
        Condition::Rainy | Condition::Snowy | Condition::Lightning => 3.0,
        Condition::Pouring | Condition::LightningRainy => 4.0,
    }
}

/// Base ladder step rate (tiers per hour) from the 24-h-equivalent trend
/// magnitude: rapid systems move ~0.5 tier/h, moderate ~0.1, gradual ~0.02.
#[must_use]
pub fn step_rate_per_hour(trend_inhg_per_h: f64) -> f64 {
    let per_day = (trend_inhg_per_h * 24.0).abs();
    if per_day > 1.0 {
        0.5
    } else if per_day > 0.25 {
        0.1
    } else {
        0.02
    }
}

/// Evolve a ladder position `hours` ahead under a trajectory score.
///
/// Deterioration (negative score) climbs the ladder, improvement descends;
/// the rate scales with the score magnitude with a floor so a weak signal
/// still drifts.
#[must_use]
pub fn evolve(position: f64, score: f64, rate_per_hour: f64, hours: f64) -> f64 {
    let direction = if score < 0.0 { 1.0 } else { -1.0 };
    let effective = rate_per_hour * (score.abs() / 100.0).max(0.1);
    (position + direction * effective * hours).clamp(0.0, LADDER.len() as f64 - 1.0)
}

/// Condition at a ladder position (nearest rung).
#[must_use]
pub fn condition_at(position: f64) -> Condition {
    let idx = position.round().clamp(0.0, LADDER.len() as f64 - 1.0) as usize;
    LADDER[idx]
}
