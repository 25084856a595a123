//! The closed weather-condition vocabulary and its structural relations.
//!
//! Conditions form a small fixed set; the classifier only ever emits members
//! of this enum. A few structural relations live here because both the
//! hysteresis filter and the forecast engine need them: the day/night pairing,
//! the cloud-cover tier of a condition, and the "major change" relation that
//! bypasses hysteresis.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Current weather condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Sunny,
    PartlyCloudy,
    Cloudy,
    ClearNight,
    PartlyCloudyNight,
    Fog,
    Rainy,
    Pouring,
    Snowy,
    Lightning,
    LightningRainy,
    Windy,
}

impl Condition {
    /// All members of the vocabulary, in declaration order.
    pub const ALL: [Condition; 12] = [
        Condition::Sunny,
        Condition::PartlyCloudy,
        Condition::Cloudy,
        Condition::ClearNight,
        Condition::PartlyCloudyNight,
        Condition::Fog,
        Condition::Rainy,
        Condition::Pouring,
        Condition::Snowy,
        Condition::Lightning,
        Condition::LightningRainy,
        Condition::Windy,
    ];

    /// Whether this condition implies active precipitation.
    #[must_use]
    pub fn is_precipitation(self) -> bool {
        matches!(
            self,
            Condition::Rainy | Condition::Pouring | Condition::Snowy | Condition::LightningRainy
        )
    }

    /// Cloud-cover tier for the sunny/partly/cloudy ladder, counting the
    /// night-sky equivalents as the same tier. `None` for conditions that are
    /// not cloud-cover driven.
    #[must_use]
    pub fn cloud_tier(self) -> Option<u8> {
        match self {
            Condition::Sunny | Condition::ClearNight => Some(0),
            Condition::PartlyCloudy | Condition::PartlyCloudyNight => Some(1),
            Condition::Cloudy => Some(2),
            _ => None,
        }
    }

    /// Map a daytime sky condition to its nighttime counterpart. Conditions
    /// without a night form are returned unchanged.
    #[must_use]
    pub fn to_night(self) -> Condition {
        match self {
            Condition::Sunny => Condition::ClearNight,
            Condition::PartlyCloudy => Condition::PartlyCloudyNight,
            other => other,
        }
    }

    /// Map a nighttime sky condition to its daytime counterpart.
    #[must_use]
    pub fn to_day(self) -> Condition {
        match self {
            Condition::ClearNight => Condition::Sunny,
            Condition::PartlyCloudyNight => Condition::PartlyCloudy,
            other => other,
        }
    }

    /// Whether `self -> other` (in either direction) is a major change that
    /// bypasses hysteresis: one side calm (`sunny`, `clear_night`, `fog`), the
    /// other severe (`lightning_rainy`, `pouring`, `snowy`, `lightning`,
    /// `windy`).
    #[must_use]
    pub fn is_major_change(self, other: Condition) -> bool {
        fn calm(c: Condition) -> bool {
            matches!(c, Condition::Sunny | Condition::ClearNight | Condition::Fog)
        }
        fn severe(c: Condition) -> bool {
            matches!(
                c,
                Condition::LightningRainy
                    | Condition::Pouring
                    | Condition::Snowy
                    | Condition::Lightning
                    | Condition::Windy
            )
        }
        (calm(self) && severe(other)) || (severe(self) && calm(other))
    }

    /// Whether two conditions are adjacent cloud-cover tiers
    /// (sunny↔partly_cloudy, partly_cloudy↔cloudy, and night equivalents).
    #[must_use]
    pub fn is_adjacent_tier(self, other: Condition) -> bool {
        match (self.cloud_tier(), other.cloud_tier()) {
            (Some(a), Some(b)) => a.abs_diff(b) == 1,
            _ => false,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Condition::Sunny => "sunny",
            Condition::PartlyCloudy => "partly_cloudy",
            Condition::Cloudy => "cloudy",
            Condition::ClearNight => "clear_night",
            Condition::PartlyCloudyNight => "partly_cloudy_night",
            Condition::Fog => "fog",
            Condition::Rainy => "rainy",
            Condition::Pouring => "pouring",
            Condition::Snowy => "snowy",
            Condition::Lightning => "lightning",
            Condition::LightningRainy => "lightning_rainy",
            Condition::Windy => "windy",
        };
        write!(f, "{s}")
    }
}
