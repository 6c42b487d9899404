// ABOUTME: Fixed period sets for inactivity thresholds and warnings
// ABOUTME: Typed period values and the human-readable interval formatter

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sentinel meaning "this action is turned off"
pub const DISABLED: u64 = 0;

/// Thresholds for notify/block/delete: 1-4 weeks, then 1, 3, 6, 9, 12, 18 and 24 months
pub const LONG_PERIODS: [u64; 11] = [
    604_800,
    1_209_600,
    1_814_400,
    2_419_200,
    2_592_000,
    7_776_000,
    15_552_000,
    23_328_000,
    31_536_000,
    47_088_000,
    63_072_000,
];

/// Lead times for warnings: 1, 2, 3, 7, 14, 21 and 30 days
pub const WARN_PERIODS: [u64; 7] = [
    86_400, 172_800, 259_200, 604_800, 1_209_600, 1_814_400, 2_592_000,
];

const INTERVAL_UNITS: [(&str, &str, u64); 7] = [
    ("year", "years", 31_536_000),
    ("month", "months", 2_592_000),
    ("week", "weeks", 604_800),
    ("day", "days", 86_400),
    ("hour", "hours", 3_600),
    ("min", "min", 60),
    ("sec", "sec", 1),
];

const INTERVAL_GRANULARITY: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodSet {
    Long,
    Warn,
}

impl PeriodSet {
    pub fn as_str(&self) -> &str {
        match self {
            PeriodSet::Long => "long",
            PeriodSet::Warn => "warn",
        }
    }

    /// Members of the set, excluding the disabled sentinel
    pub fn seconds(&self) -> &'static [u64] {
        match self {
            PeriodSet::Long => &LONG_PERIODS,
            PeriodSet::Warn => &WARN_PERIODS,
        }
    }

    pub fn contains(&self, secs: u64) -> bool {
        secs == DISABLED || self.seconds().contains(&secs)
    }

    /// Selectable options: `(0, "disabled")` first, then every member with its label
    pub fn options(&self) -> Vec<(u64, String)> {
        std::iter::once((DISABLED, "disabled".to_string()))
            .chain(self.seconds().iter().map(|&secs| (secs, format_interval(secs))))
            .collect()
    }
}

impl fmt::Display for PeriodSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{value} is not a valid {set} period")]
pub struct PeriodError {
    pub set: PeriodSet,
    pub value: u64,
}

/// Format a number of seconds as e.g. "2 weeks" or "1 year 6 months".
///
/// At most two units are printed, and a unit that does not divide in
/// still consumes one slot once output has started.
pub fn format_interval(secs: u64) -> String {
    let mut remaining = secs;
    let mut granularity = INTERVAL_GRANULARITY;
    let mut parts: Vec<String> = Vec::new();

    for (singular, plural, unit) in INTERVAL_UNITS {
        if remaining >= unit {
            let count = remaining / unit;
            remaining %= unit;
            let name = if count == 1 { singular } else { plural };
            parts.push(format!("{} {}", count, name));
            granularity -= 1;
        } else if !parts.is_empty() {
            granularity -= 1;
        }

        if granularity == 0 {
            break;
        }
    }

    if parts.is_empty() {
        "0 sec".to_string()
    } else {
        parts.join(" ")
    }
}

macro_rules! period_type {
    ($(#[$meta:meta])* $name:ident, $set:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        #[serde(try_from = "u64", into = "u64")]
        pub struct $name(u64);

        impl $name {
            pub const DISABLED: Self = Self(DISABLED);
            pub const SET: PeriodSet = $set;

            pub fn new(secs: u64) -> Result<Self, PeriodError> {
                if Self::SET.contains(secs) {
                    Ok(Self(secs))
                } else {
                    Err(PeriodError {
                        set: Self::SET,
                        value: secs,
                    })
                }
            }

            pub fn as_secs(&self) -> u64 {
                self.0
            }

            pub fn is_disabled(&self) -> bool {
                self.0 == DISABLED
            }

            pub fn label(&self) -> String {
                if self.is_disabled() {
                    "disabled".to_string()
                } else {
                    format_interval(self.0)
                }
            }
        }

        impl TryFrom<u64> for $name {
            type Error = PeriodError;

            fn try_from(secs: u64) -> Result<Self, Self::Error> {
                Self::new(secs)
            }
        }

        impl From<$name> for u64 {
            fn from(period: $name) -> u64 {
                period.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.label())
            }
        }
    };
}

period_type!(
    /// A notify/block/delete threshold drawn from [`LONG_PERIODS`]
    LongPeriod,
    PeriodSet::Long
);

period_type!(
    /// A pre-action warning lead time drawn from [`WARN_PERIODS`]
    WarnPeriod,
    PeriodSet::Warn
);
