use std::str::FromStr;

use crate::CoreError;

/// How far back a windowed listing collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionPeriod {
    Day,
    Week,
    Month,
    Year,
}

impl CollectionPeriod {
    /// Number of days the period spans.
    #[must_use]
    pub fn days(self) -> i64 {
        match self {
            CollectionPeriod::Day => 1,
            CollectionPeriod::Week => 7,
            CollectionPeriod::Month => 30,
            CollectionPeriod::Year => 365,
        }
    }
}

impl FromStr for CollectionPeriod {
    type Err = CoreError;

    /// Accepts the single-letter codes `D`, `W`, `M`, `Y` or the full word,
    /// case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "d" | "day" => Ok(CollectionPeriod::Day),
            "w" | "week" => Ok(CollectionPeriod::Week),
            "m" | "month" => Ok(CollectionPeriod::Month),
            "y" | "year" => Ok(CollectionPeriod::Year),
            _ => Err(CoreError::InvalidPeriod(s.to_string())),
        }
    }
}

impl std::fmt::Display for CollectionPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectionPeriod::Day => write!(f, "D"),
            CollectionPeriod::Week => write!(f, "W"),
            CollectionPeriod::Month => write!(f, "M"),
            CollectionPeriod::Year => write!(f, "Y"),
        }
    }
}
