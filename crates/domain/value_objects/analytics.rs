use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{time_periods::TimePeriod, user_types::UserType};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DashboardType {
    CreatorEarnings,
    PlatformEarnings,
    RegisteredAccounts,
    ActiveSubscriptions,
    ContentTypeCounts,
}

impl DashboardType {
    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "creator_earnings" => Some(DashboardType::CreatorEarnings),
            "platform_earnings" => Some(DashboardType::PlatformEarnings),
            "registered_accounts" => Some(DashboardType::RegisteredAccounts),
            "active_subscriptions" => Some(DashboardType::ActiveSubscriptions),
            "content_type_counts" => Some(DashboardType::ContentTypeCounts),
            _ => None,
        }
    }
}

/// Filter shared by the time-series dashboards.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsRange {
    pub period: TimePeriod,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub user_type: UserType,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TimeBucket {
    pub bucket: DateTime<Utc>,
    pub value: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ContentTypeCount {
    pub post_type: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "dashboard_type", rename_all = "snake_case")]
pub enum DashboardReport {
    CreatorEarnings {
        period: TimePeriod,
        total: i64,
        series: Vec<TimeBucket>,
    },
    PlatformEarnings {
        period: TimePeriod,
        total: i64,
        series: Vec<TimeBucket>,
    },
    RegisteredAccounts {
        period: TimePeriod,
        user_type: UserType,
        series: Vec<TimeBucket>,
    },
    ActiveSubscriptions {
        period: TimePeriod,
        total: i64,
        series: Vec<TimeBucket>,
    },
    ContentTypeCounts {
        counts: Vec<ContentTypeCount>,
    },
}

pub fn series_total(series: &[TimeBucket]) -> i64 {
    series.iter().map(|bucket| bucket.value).sum()
}

/// Start of the bucket containing `at`. Weeks start on Monday.
pub fn truncate_to_period(period: TimePeriod, at: DateTime<Utc>) -> DateTime<Utc> {
    let date = at.date_naive();
    let start = match period {
        TimePeriod::Day => date,
        TimePeriod::Week => date - Duration::days(date.weekday().num_days_from_monday().into()),
        TimePeriod::Month => date.with_day(1).unwrap_or(date),
    };
    start.and_time(NaiveTime::default()).and_utc()
}

/// Sums `(timestamp, value)` points into ascending period buckets. Empty buckets are omitted.
pub fn bucket_series(period: TimePeriod, points: &[(DateTime<Utc>, i64)]) -> Vec<TimeBucket> {
    let mut buckets: BTreeMap<DateTime<Utc>, i64> = BTreeMap::new();
    for (at, value) in points {
        *buckets.entry(truncate_to_period(period, *at)).or_default() += value;
    }
    buckets
        .into_iter()
        .map(|(bucket, value)| TimeBucket { bucket, value })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn daily_buckets_sum_values() {
        let series = bucket_series(
            TimePeriod::Day,
            &[(at(2025, 3, 4, 9), 100), (at(2025, 3, 4, 22), 50), (at(2025, 3, 6, 1), 7)],
        );

        assert_eq!(
            series,
            vec![
                TimeBucket { bucket: at(2025, 3, 4, 0), value: 150 },
                TimeBucket { bucket: at(2025, 3, 6, 0), value: 7 },
            ]
        );
        assert_eq!(series_total(&series), 157);
    }

    #[test]
    fn weeks_start_on_monday() {
        // 2025-03-09 is a Sunday, 2025-03-10 a Monday
        let series = bucket_series(
            TimePeriod::Week,
            &[(at(2025, 3, 9, 12), 1), (at(2025, 3, 10, 12), 1), (at(2025, 3, 3, 0), 1)],
        );

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].bucket, at(2025, 3, 3, 0));
        assert_eq!(series[0].value, 2);
        assert_eq!(series[1].bucket, at(2025, 3, 10, 0));
    }

    #[test]
    fn monthly_buckets_start_on_the_first() {
        let series = bucket_series(TimePeriod::Month, &[(at(2025, 2, 28, 23), 3)]);
        assert_eq!(series[0].bucket, at(2025, 2, 1, 0));
    }

    #[test]
    fn parses_dashboard_type() {
        assert_eq!(
            DashboardType::from_str("platform_earnings"),
            Some(DashboardType::PlatformEarnings)
        );
        assert_eq!(DashboardType::from_str("nope"), None);
    }
}
