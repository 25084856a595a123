//! Bounded, time-sorted history of sensor snapshots with regression and
//! circular-statistics queries.
//!
//! The store is exclusively owned by the pipeline state; analyzers receive
//! `&TrendsStore` and query bounded horizons. Retention is 168 h; inserts are
//! effectively O(log n) (binary search plus an almost-always-tail insert,
//! since observations arrive in timestamp order), and horizon scans are O(n).

use crate::constants::{TRENDS_RETENTION_HOURS, TREND_MIN_SAMPLES};
use crate::core_types::Condition;
use chrono::{DateTime, Duration, Utc};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One retained history sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendEntry {
    pub timestamp: DateTime<Utc>,
    pub temperature_f: f64,
    pub humidity_pct: f64,
    pub pressure_inhg: Option<f64>,
    pub wind_speed_mph: f64,
    pub wind_direction_deg: Option<f64>,
    pub solar_radiation_wm2: Option<f64>,
    pub condition: Condition,
}

/// Result of a least-squares trend query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Trend {
    /// Fewer than three usable samples in the horizon.
    Insufficient,
    /// Slope of the variable per hour.
    PerHour(f64),
}

impl Trend {
    /// Slope value, or `None` when insufficient.
    #[must_use]
    pub fn per_hour(self) -> Option<f64> {
        match self {
            Trend::Insufficient => None,
            Trend::PerHour(v) => Some(v),
        }
    }

    /// Slope value, treating insufficient history as flat.
    #[must_use]
    pub fn per_hour_or_flat(self) -> f64 {
        self.per_hour().unwrap_or(0.0)
    }
}

/// Circular statistics of the wind direction over a horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindDirectionStats {
    /// Circular mean bearing, degrees clockwise from north in [0, 360).
    pub mean_deg: f64,
    /// Magnitude of the mean resultant vector in [0, 1]; 1 is a perfectly
    /// steady direction.
    pub stability: f64,
}

/// Bounded time-indexed ring of history samples.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendsStore {
    entries: VecDeque<TrendEntry>,
}

impl TrendsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent entry, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&TrendEntry> {
        self.entries.back()
    }

    /// Insert one sample, keeping the store sorted and deduplicated by
    /// timestamp. An insert with a timestamp already present replaces the
    /// prior entry. Entries older than the retention window (relative to the
    /// newest timestamp) are evicted.
    pub fn insert(&mut self, entry: TrendEntry) {
        match self
            .entries
            .binary_search_by_key(&entry.timestamp, |e| e.timestamp)
        {
            Ok(idx) => self.entries[idx] = entry,
            Err(idx) => self.entries.insert(idx, entry),
        }
        self.evict();
    }

    fn evict(&mut self) {
        let Some(newest) = self.entries.back().map(|e| e.timestamp) else {
            return;
        };
        let cutoff = newest - Duration::hours(TRENDS_RETENTION_HOURS);
        while self.entries.front().is_some_and(|e| e.timestamp < cutoff) {
            self.entries.pop_front();
        }
    }

    /// Entries within `[now − horizon, now]`, oldest first.
    pub fn window(
        &self,
        now: DateTime<Utc>,
        horizon: Duration,
    ) -> impl Iterator<Item = &TrendEntry> {
        let start = now - horizon;
        self.entries
            .iter()
            .filter(move |e| e.timestamp >= start && e.timestamp <= now)
    }

    /// Least-squares slope (per hour) of `select` over the horizon.
    ///
    /// Requires at least [`TREND_MIN_SAMPLES`] samples with a usable value
    /// and non-degenerate time spread, otherwise [`Trend::Insufficient`].
    pub fn trend<F>(&self, now: DateTime<Utc>, horizon: Duration, select: F) -> Trend
    where
        F: Fn(&TrendEntry) -> Option<f64>,
    {
        let samples: Vec<(f64, f64)> = self
            .window(now, horizon)
            .filter_map(|e| {
                let y = select(e)?;
                let hours = (e.timestamp - (now - horizon)).num_milliseconds() as f64 / 3_600_000.0;
                Some((hours, y))
            })
            .collect();

        if samples.len() < TREND_MIN_SAMPLES {
            return Trend::Insufficient;
        }

        let n = samples.len() as f64;
        let mean_x = samples.iter().map(|(x, _)| x).sum::<f64>() / n;
        let mean_y = samples.iter().map(|(_, y)| y).sum::<f64>() / n;
        let mut cov = 0.0;
        let mut var = 0.0;
        for (x, y) in &samples {
            cov += (x - mean_x) * (y - mean_y);
            var += (x - mean_x) * (x - mean_x);
        }
        if var < 1e-12 {
            return Trend::Insufficient;
        }
        Trend::PerHour(cov / var)
    }

    /// Pressure trend (inHg/h) over the horizon.
    #[must_use]
    pub fn pressure_trend(&self, now: DateTime<Utc>, horizon: Duration) -> Trend {
        self.trend(now, horizon, |e| e.pressure_inhg)
    }

    /// Humidity trend (%/h) over the horizon.
    #[must_use]
    pub fn humidity_trend(&self, now: DateTime<Utc>, horizon: Duration) -> Trend {
        self.trend(now, horizon, |e| Some(e.humidity_pct))
    }

    /// Circular mean and stability of the wind direction over the horizon.
    ///
    /// Directions are folded onto unit vectors so 350° and 10° average to 0°,
    /// not 180°. Returns `None` with fewer than two direction samples.
    #[must_use]
    pub fn wind_direction_stats(
        &self,
        now: DateTime<Utc>,
        horizon: Duration,
    ) -> Option<WindDirectionStats> {
        let vectors: Vec<Vector2<f64>> = self
            .window(now, horizon)
            .filter_map(|e| e.wind_direction_deg)
            .map(|deg| {
                let rad = deg.to_radians();
                // Bearing convention: x east, y north
                Vector2::new(rad.sin(), rad.cos())
            })
            .collect();
        if vectors.len() < 2 {
            return None;
        }
        let mean: Vector2<f64> = vectors.iter().sum::<Vector2<f64>>() / vectors.len() as f64;
        let stability = mean.norm().clamp(0.0, 1.0);
        let mean_deg = if stability < 1e-9 {
            0.0
        } else {
            let deg = mean.x.atan2(mean.y).to_degrees();
            (deg + 360.0) % 360.0
        };
        Some(WindDirectionStats { mean_deg, stability })
    }

    /// Sample standard deviation of `select` over the horizon; `None` with
    /// fewer than two samples.
    pub fn volatility<F>(&self, now: DateTime<Utc>, horizon: Duration, select: F) -> Option<f64>
    where
        F: Fn(&TrendEntry) -> Option<f64>,
    {
        let values: Vec<f64> = self.window(now, horizon).filter_map(select).collect();
        if values.len() < 2 {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let sum_sq: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
        Some((sum_sq / (n - 1.0)).sqrt())
    }

    /// Fraction of entries in the horizon classified clear (`sunny` or
    /// `clear_night`). Zero when the window is empty.
    #[must_use]
    pub fn clear_fraction(&self, now: DateTime<Utc>, horizon: Duration) -> f64 {
        let mut total = 0usize;
        let mut clear = 0usize;
        for e in self.window(now, horizon) {
            total += 1;
            if matches!(e.condition, Condition::Sunny | Condition::ClearNight) {
                clear += 1;
            }
        }
        if total == 0 {
            0.0
        } else {
            clear as f64 / total as f64
        }
    }

    /// Hours of continuous sub-threshold pressure ending at `now`, looking
    /// back at most `horizon`. Used by the storm scorer's persistence term.
    #[must_use]
    pub fn sustained_pressure_below(
        &self,
        now: DateTime<Utc>,
        horizon: Duration,
        threshold_inhg: f64,
    ) -> f64 {
        let mut earliest: Option<DateTime<Utc>> = None;
        // Walk backwards; stop at the first entry at or above the threshold.
        for e in self.entries.iter().rev() {
            if e.timestamp > now {
                continue;
            }
            if e.timestamp < now - horizon {
                break;
            }
            match e.pressure_inhg {
                Some(p) if p < threshold_inhg => earliest = Some(e.timestamp),
                Some(_) => break,
                None => {}
            }
        }
        earliest.map_or(0.0, |t| (now - t).num_milliseconds() as f64 / 3_600_000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
    }

    fn entry(minutes: i64, pressure: f64) -> TrendEntry {
        TrendEntry {
            timestamp: t0() + Duration::minutes(minutes),
            temperature_f: 60.0,
            humidity_pct: 50.0,
            pressure_inhg: Some(pressure),
            wind_speed_mph: 5.0,
            wind_direction_deg: Some(180.0),
            solar_radiation_wm2: None,
            condition: Condition::Cloudy,
        }
    }

    #[test]
    fn test_duplicate_timestamps_replace() {
        let mut store = TrendsStore::new();
        store.insert(entry(0, 29.90));
        store.insert(entry(0, 29.95));
        assert_eq!(store.len(), 1);
        assert_relative_eq!(store.latest().unwrap().pressure_inhg.unwrap(), 29.95);
    }

    #[test]
    fn test_retention_eviction() {
        let mut store = TrendsStore::new();
        store.insert(entry(0, 29.90));
        store.insert(entry(60, 29.91));
        // Jump past the retention window
        store.insert(entry((TRENDS_RETENTION_HOURS + 2) * 60, 29.92));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_trend_requires_three_samples() {
        let mut store = TrendsStore::new();
        let now = t0() + Duration::hours(3);
        store.insert(entry(0, 29.90));
        store.insert(entry(60, 29.85));
        assert_eq!(store.pressure_trend(now, Duration::hours(3)), Trend::Insufficient);

        store.insert(entry(120, 29.80));
        let slope = store
            .pressure_trend(now, Duration::hours(3))
            .per_hour()
            .unwrap();
        assert_abs_diff_eq!(slope, -0.05, epsilon = 1e-9);
    }

    #[test]
    fn test_trend_ignores_samples_outside_horizon() {
        let mut store = TrendsStore::new();
        store.insert(entry(0, 20.0)); // wild outlier, 5 h old
        store.insert(entry(180, 29.90));
        store.insert(entry(240, 29.90));
        store.insert(entry(300, 29.90));
        let now = t0() + Duration::minutes(300);
        let slope = store
            .pressure_trend(now, Duration::hours(3))
            .per_hour()
            .unwrap();
        assert_abs_diff_eq!(slope, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_circular_mean_handles_wraparound() {
        let mut store = TrendsStore::new();
        let mut e1 = entry(0, 29.90);
        e1.wind_direction_deg = Some(350.0);
        let mut e2 = entry(10, 29.90);
        e2.wind_direction_deg = Some(10.0);
        store.insert(e1);
        store.insert(e2);

        let stats = store
            .wind_direction_stats(t0() + Duration::minutes(10), Duration::hours(1))
            .unwrap();
        // 350° and 10° average to north, not south
        assert!(stats.mean_deg < 1.0 || stats.mean_deg > 359.0, "got {}", stats.mean_deg);
        assert!(stats.stability > 0.9);
    }

    #[test]
    fn test_circular_mean_identity_law() {
        // Circular mean of [θ, θ + 360°] is θ
        let mut store = TrendsStore::new();
        let mut e1 = entry(0, 29.90);
        e1.wind_direction_deg = Some(73.0);
        let mut e2 = entry(10, 29.90);
        e2.wind_direction_deg = Some(73.0 + 360.0);
        store.insert(e1);
        store.insert(e2);

        let stats = store
            .wind_direction_stats(t0() + Duration::minutes(10), Duration::hours(1))
            .unwrap();
        assert_abs_diff_eq!(stats.mean_deg, 73.0, epsilon = 1e-6);
        assert_abs_diff_eq!(stats.stability, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_scattered_directions_have_low_stability() {
        let mut store = TrendsStore::new();
        for (i, deg) in [0.0, 90.0, 180.0, 270.0].iter().enumerate() {
            let mut e = entry(i as i64 * 10, 29.90);
            e.wind_direction_deg = Some(*deg);
            store.insert(e);
        }
        let stats = store
            .wind_direction_stats(t0() + Duration::hours(1), Duration::hours(2))
            .unwrap();
        assert!(stats.stability < 0.1);
    }

    #[test]
    fn test_volatility_sample_stddev() {
        let mut store = TrendsStore::new();
        for (i, temp) in [58.0, 60.0, 62.0].iter().enumerate() {
            let mut e = entry(i as i64 * 30, 29.90);
            e.temperature_f = *temp;
            store.insert(e);
        }
        let vol = store
            .volatility(t0() + Duration::hours(2), Duration::hours(3), |e| {
                Some(e.temperature_f)
            })
            .unwrap();
        assert_abs_diff_eq!(vol, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_clear_fraction() {
        let mut store = TrendsStore::new();
        for i in 0..4 {
            let mut e = entry(i * 30, 29.90);
            e.condition = if i < 3 { Condition::Sunny } else { Condition::Cloudy };
            store.insert(e);
        }
        let frac = store.clear_fraction(t0() + Duration::hours(2), Duration::hours(6));
        assert_abs_diff_eq!(frac, 0.75);
    }

    #[test]
    fn test_sustained_pressure_below() {
        let mut store = TrendsStore::new();
        store.insert(entry(0, 29.40));
        store.insert(entry(60, 29.38));
        store.insert(entry(120, 29.35));
        let now = t0() + Duration::hours(2);
        let hours = store.sustained_pressure_below(now, Duration::hours(6), 29.50);
        assert_abs_diff_eq!(hours, 2.0, epsilon = 1e-6);

        // A high-pressure sample interrupts the streak
        store.insert(entry(90, 29.60));
        let hours = store.sustained_pressure_below(now, Duration::hours(6), 29.50);
        assert_abs_diff_eq!(hours, 0.5, epsilon = 1e-6);
    }
}
