use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Timelike};

use crate::event::Instant;

/// A named projection from an instant to one of its calendar or clock parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    /// `sec`, 0–59.
    Second,
    /// `min`, 0–59.
    Minute,
    /// `hour`, 0–23.
    Hour,
    /// `day`, day of the month.
    DayOfMonth,
    /// `mday`, same value as `day` under its own name.
    MonthDay,
    /// `month`, 1–12.
    Month,
    /// `year`.
    Year,
    /// `wday`, 0 = Sunday through 6 = Saturday.
    Weekday,
    /// `yday`, 1–366.
    DayOfYear,
}

impl Component {
    pub const ALL: [Component; 9] = [
        Component::Second,
        Component::Minute,
        Component::Hour,
        Component::DayOfMonth,
        Component::MonthDay,
        Component::Month,
        Component::Year,
        Component::Weekday,
        Component::DayOfYear,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Component::Second => "sec",
            Component::Minute => "min",
            Component::Hour => "hour",
            Component::DayOfMonth => "day",
            Component::MonthDay => "mday",
            Component::Month => "month",
            Component::Year => "year",
            Component::Weekday => "wday",
            Component::DayOfYear => "yday",
        }
    }

    pub fn extract(&self, t: &Instant) -> i64 {
        match self {
            Component::Second => t.second() as i64,
            Component::Minute => t.minute() as i64,
            Component::Hour => t.hour() as i64,
            Component::DayOfMonth | Component::MonthDay => t.day() as i64,
            Component::Month => t.month() as i64,
            Component::Year => t.year() as i64,
            Component::Weekday => t.weekday().num_days_from_sunday() as i64,
            Component::DayOfYear => t.ordinal() as i64,
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no such time component: {0:?}")]
pub struct UnknownComponent(pub String);

impl FromStr for Component {
    type Err = UnknownComponent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Component::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| UnknownComponent(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
