//! Station state: everything the pipeline carries between observations.
//!
//! The state is an explicit value the caller threads through `observe`; the
//! core holds no globals. A failed observation never mutates it — `observe`
//! clones, mutates the clone, and returns it only on success.

use crate::analysis::fog::FogAnalysis;
use crate::analysis::pressure_wind::{GustClass, PressureSystem, StormRisk, WindClass};
use crate::analysis::trends::{Trend, TrendsStore};
use crate::classifier::hysteresis::{ConditionHistory, HysteresisOutcome};
use crate::core_types::Condition;
use crate::pipeline::config::StationConfig;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Everything derived from one observation, kept for the forecast engine and
/// exposed (unit-converted) on the inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedState {
    pub timestamp: DateTime<Utc>,
    pub temp_f: f64,
    pub humidity_pct: f64,
    pub dewpoint_f: f64,
    pub dewpoint_spread_f: f64,
    pub sea_level_pressure_inhg: Option<f64>,
    pub pressure_system: Option<PressureSystem>,
    pub pressure_trend_3h: Trend,
    pub pressure_trend_24h: Trend,
    pub cloud_cover_pct: f64,
    pub expected_clear_sky_wm2: Option<f64>,
    pub fog: FogAnalysis,
    pub storm_probability: f64,
    pub storm_risk: StormRisk,
    pub wind_mph: f64,
    pub wind_class: WindClass,
    pub gust_factor: f64,
    pub gust_class: GustClass,
    pub is_daytime: bool,
    pub solar_elevation_deg: f64,
    /// Raw ladder output, before hysteresis.
    pub condition_raw: Condition,
    /// Emitted condition, after hysteresis.
    pub condition: Condition,
    pub hysteresis: HysteresisOutcome,
}

/// Caller-owned pipeline state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationState {
    pub config: StationConfig,
    pub(crate) trends: TrendsStore,
    pub(crate) condition_history: ConditionHistory,
    pub(crate) solar_samples: VecDeque<(DateTime<Utc>, f64)>,
    pub(crate) last_timestamp: Option<DateTime<Utc>>,
    pub(crate) last_cloud_cover_pct: Option<f64>,
    pub(crate) last_derived: Option<DerivedState>,
}

impl StationState {
    /// Fresh state for a station with the given configuration.
    #[must_use]
    pub fn new(config: StationConfig) -> Self {
        Self {
            config,
            trends: TrendsStore::new(),
            condition_history: ConditionHistory::new(),
            solar_samples: VecDeque::new(),
            last_timestamp: None,
            last_cloud_cover_pct: None,
            last_derived: None,
        }
    }

    /// Most recent derived state, if any observation has been accepted.
    #[must_use]
    pub fn last_derived(&self) -> Option<&DerivedState> {
        self.last_derived.as_ref()
    }

    /// Read-only view of the trends history.
    #[must_use]
    pub fn trends(&self) -> &TrendsStore {
        &self.trends
    }

    /// Record one solar radiation sample and return the moving average once
    /// at least three samples span the configured window; otherwise the raw
    /// sample passes through.
    pub(crate) fn smoothed_radiation(
        &mut self,
        timestamp: DateTime<Utc>,
        radiation_wm2: Option<f64>,
    ) -> Option<f64> {
        let radiation = radiation_wm2?;
        self.solar_samples.push_back((timestamp, radiation));
        let cutoff = timestamp - Duration::minutes(self.config.solar_avg_window_minutes);
        while self.solar_samples.front().is_some_and(|(t, _)| *t < cutoff) {
            self.solar_samples.pop_front();
        }
        if self.solar_samples.len() >= 3 {
            let sum: f64 = self.solar_samples.iter().map(|(_, r)| r).sum();
            Some(sum / self.solar_samples.len() as f64)
        } else {
            Some(radiation)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 8, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_new_state_is_empty() {
        let state = StationState::new(StationConfig::default());
        assert!(state.last_derived().is_none());
        assert!(state.trends().is_empty());
    }

    #[test]
    fn test_radiation_average_needs_three_samples() {
        let mut state = StationState::new(StationConfig::default());
        assert_relative_eq!(state.smoothed_radiation(t0(), Some(600.0)).unwrap(), 600.0);
        assert_relative_eq!(
            state
                .smoothed_radiation(t0() + Duration::minutes(5), Some(700.0))
                .unwrap(),
            700.0
        );
        // Third sample switches to the window mean
        assert_relative_eq!(
            state
                .smoothed_radiation(t0() + Duration::minutes(10), Some(800.0))
                .unwrap(),
            700.0
        );
    }

    #[test]
    fn test_radiation_window_eviction() {
        let mut state = StationState::new(StationConfig::default());
        state.smoothed_radiation(t0(), Some(0.0));
        state.smoothed_radiation(t0() + Duration::minutes(5), Some(0.0));
        state.smoothed_radiation(t0() + Duration::minutes(10), Some(0.0));
        // 20 minutes later the first samples have left the 15-minute window
        let avg = state
            .smoothed_radiation(t0() + Duration::minutes(30), Some(900.0))
            .unwrap();
        assert_relative_eq!(avg, 900.0);
    }

    #[test]
    fn test_missing_radiation_passes_none() {
        let mut state = StationState::new(StationConfig::default());
        assert!(state.smoothed_radiation(t0(), None).is_none());
    }
}
