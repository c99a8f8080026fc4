//! Symbolic date ranges (`last-hour`, `last-15-minutes`, …) and their
//! resolution to concrete millisecond bounds.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Range applied when a query carries no time selection at all, or an
/// unrecognized one.
pub const DEFAULT_RANGE_KEY: &str = "last-hour";

#[derive(Debug, Error)]
pub enum RangeKeyError {
    #[error("unrecognized range key: {0:?}")]
    Unrecognized(String),
    #[error("range key has a bad count: {0:?}")]
    BadCount(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeUnit {
    Minutes,
    Hours,
    Days,
}

impl RangeUnit {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "minute" | "minutes" => Some(RangeUnit::Minutes),
            "hour" | "hours" => Some(RangeUnit::Hours),
            "day" | "days" => Some(RangeUnit::Days),
            _ => None,
        }
    }

    fn singular(self) -> &'static str {
        match self {
            RangeUnit::Minutes => "minute",
            RangeUnit::Hours => "hour",
            RangeUnit::Days => "day",
        }
    }

    fn plural(self) -> &'static str {
        match self {
            RangeUnit::Minutes => "minutes",
            RangeUnit::Hours => "hours",
            RangeUnit::Days => "days",
        }
    }

    fn duration(self, count: i64) -> Duration {
        let duration = match self {
            RangeUnit::Minutes => Duration::try_minutes(count),
            RangeUnit::Hours => Duration::try_hours(count),
            RangeUnit::Days => Duration::try_days(count),
        };
        // An absurdly large count saturates instead of overflowing.
        duration.unwrap_or(Duration::MAX)
    }
}

/// A parsed relative range key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeKey {
    pub unit: RangeUnit,
    pub count: i64,
}

impl RangeKey {
    /// Accepts `last-<unit>` shorthand (`last-hour`) and the counted form
    /// `last-<n>-<unit>s` (`last-15-minutes`).
    pub fn parse(key: &str) -> Result<Self, RangeKeyError> {
        let unrecognized = || RangeKeyError::Unrecognized(key.to_string());
        let rest = key.strip_prefix("last-").ok_or_else(unrecognized)?;
        if let Some(unit) = RangeUnit::parse(rest) {
            return Ok(Self { unit, count: 1 });
        }
        let (count, unit) = rest.split_once('-').ok_or_else(unrecognized)?;
        let unit = RangeUnit::parse(unit).ok_or_else(unrecognized)?;
        let count: i64 = count
            .parse()
            .map_err(|_| RangeKeyError::BadCount(key.to_string()))?;
        if count < 1 {
            return Err(RangeKeyError::BadCount(key.to_string()));
        }
        Ok(Self { unit, count })
    }

    /// The canonical spelling this key round-trips through, e.g.
    /// `last-1-hours` canonicalizes to `last-hour`.
    pub fn canonical(&self) -> String {
        if self.count == 1 {
            format!("last-{}", self.unit.singular())
        } else {
            format!("last-{}-{}", self.count, self.unit.plural())
        }
    }

    pub fn duration(&self) -> Duration {
        self.unit.duration(self.count)
    }
}

impl Default for RangeKey {
    fn default() -> Self {
        Self {
            unit: RangeUnit::Hours,
            count: 1,
        }
    }
}

/// Concrete bounds for a resolved range key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRange {
    pub from_ms: f64,
    pub to_ms: f64,
    /// Canonical spelling of the key that produced these bounds.
    pub key: String,
}

/// Resolves a symbolic time-range key to concrete bounds.
///
/// Implementors only supply the clock; unknown or absent keys fall back
/// to [`DEFAULT_RANGE_KEY`] rather than failing, since query parameters
/// are best-effort input.
pub trait DateRangeResolver {
    /// Current time in milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;

    fn resolve(&self, key: &str) -> ResolvedRange {
        let parsed = RangeKey::parse(key).unwrap_or_default();
        let to = self.now_ms();
        let from = to - parsed.duration().num_milliseconds();
        ResolvedRange {
            from_ms: from as f64,
            to_ms: to as f64,
            key: parsed.canonical(),
        }
    }
}

/// Production resolver backed by the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelativeRangeResolver;

impl DateRangeResolver for RelativeRangeResolver {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Fixed-clock resolver for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClockResolver {
    pub now_ms: i64,
}

impl DateRangeResolver for FixedClockResolver {
    fn now_ms(&self) -> i64 {
        self.now_ms
    }
}
