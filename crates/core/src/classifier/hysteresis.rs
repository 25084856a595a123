//! Time-windowed condition hysteresis.
//!
//! The raw ladder output flaps at band edges; this filter only lets a change
//! through when the candidate has persisted across updates, returns to a
//! condition emitted within the last hour, represents a major weather shift,
//! or is backed by enough cloud-cover movement. The history keeps both the
//! raw candidate and the emitted condition of every update: persistence is
//! judged on candidates, cheap returns on emissions. An alternating candidate
//! stream therefore cannot oscillate the output, while a genuinely new
//! condition lands on its second consecutive appearance.

use crate::constants::{
    CLOUD_MAX_STEP, CONDITION_HISTORY_HOURS, CONDITION_RECENT_HOURS, HYSTERESIS_ADJACENT_DELTA,
    HYSTERESIS_JUMP_DELTA,
};
use crate::core_types::Condition;
use chrono::{DateTime, Duration, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One history row: when, what the ladder said, what was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct HistoryEntry {
    timestamp: DateTime<Utc>,
    candidate: Condition,
    emitted: Condition,
}

/// Rolling 24-h record of classifier candidates and emitted conditions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionHistory {
    entries: VecDeque<HistoryEntry>,
}

impl ConditionHistory {
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

    /// Record one update and evict entries older than the retention window.
    pub fn record(&mut self, timestamp: DateTime<Utc>, candidate: Condition, emitted: Condition) {
        self.entries.push_back(HistoryEntry {
            timestamp,
            candidate,
            emitted,
        });
        let cutoff = timestamp - Duration::hours(CONDITION_HISTORY_HOURS);
        while self.entries.front().is_some_and(|e| e.timestamp < cutoff) {
            self.entries.pop_front();
        }
    }

    /// The most recent raw candidate, provided it is younger than `max_age`.
    #[must_use]
    fn last_candidate_within(&self, now: DateTime<Utc>, max_age: Duration) -> Option<Condition> {
        self.entries
            .back()
            .filter(|e| now - e.timestamp <= max_age)
            .map(|e| e.candidate)
    }

    /// Occurrence counts per emitted condition within `[now − window, now]`.
    #[must_use]
    pub fn emitted_counts_within(
        &self,
        now: DateTime<Utc>,
        window: Duration,
    ) -> FxHashMap<Condition, usize> {
        let start = now - window;
        let mut counts = FxHashMap::default();
        for e in &self.entries {
            if e.timestamp >= start && e.timestamp <= now {
                *counts.entry(e.emitted).or_insert(0) += 1;
            }
        }
        counts
    }
}

/// Why the filter settled on its output; carried for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HysteresisOutcome {
    FirstObservation,
    Unchanged,
    RecentRecurrence,
    MajorChange,
    CloudShift,
    Held,
}

/// Filter one raw candidate against the previous emitted condition.
///
/// `cloud_delta` is the signed move of the *undamped* cloud-cover estimate
/// since the previous update; the over-movement veto uses it so a physically
/// implausible jump holds the previous condition even when the damped value
/// stays in range.
#[must_use]
pub fn filter(
    previous: Option<Condition>,
    candidate: Condition,
    cloud_delta: Option<f64>,
    history: &ConditionHistory,
    now: DateTime<Utc>,
) -> (Condition, HysteresisOutcome) {
    let Some(previous) = previous else {
        return (candidate, HysteresisOutcome::FirstObservation);
    };
    if candidate == previous {
        return (candidate, HysteresisOutcome::Unchanged);
    }

    let recent_window = Duration::hours(CONDITION_RECENT_HOURS);
    let persisted = history.last_candidate_within(now, recent_window) == Some(candidate);
    let recently_emitted = history
        .emitted_counts_within(now, recent_window)
        .get(&candidate)
        .copied()
        .unwrap_or(0)
        >= 1;
    if persisted || recently_emitted {
        return (candidate, HysteresisOutcome::RecentRecurrence);
    }

    if previous.is_major_change(candidate) {
        return (candidate, HysteresisOutcome::MajorChange);
    }

    let delta = cloud_delta.unwrap_or(0.0).abs();
    if delta > CLOUD_MAX_STEP {
        return (previous, HysteresisOutcome::Held);
    }

    let required = if previous.is_adjacent_tier(candidate) {
        HYSTERESIS_ADJACENT_DELTA
    } else {
        HYSTERESIS_JUMP_DELTA
    };
    if delta >= required {
        (candidate, HysteresisOutcome::CloudShift)
    } else {
        (previous, HysteresisOutcome::Held)
    }
}
