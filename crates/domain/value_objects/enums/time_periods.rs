use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Bucket width for time-series analytics.
#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TimePeriod {
    #[default]
    Day,
    Week,
    Month,
}

impl TimePeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimePeriod::Day => "day",
            TimePeriod::Week => "week",
            TimePeriod::Month => "month",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "day" | "daily" => Some(TimePeriod::Day),
            "week" | "weekly" => Some(TimePeriod::Week),
            "month" | "monthly" => Some(TimePeriod::Month),
            _ => None,
        }
    }
}

impl Display for TimePeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
