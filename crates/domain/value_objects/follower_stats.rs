use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FollowerRange {
    #[default]
    Week,
    Month,
}

impl FollowerRange {
    /// First day covered by the range ending on `today`.
    pub fn start(&self, today: NaiveDate) -> NaiveDate {
        match self {
            FollowerRange::Week => today - Duration::days(6),
            FollowerRange::Month => today - Duration::days(30),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FollowerPoint {
    pub label: String,
    pub count: i64,
}

/// Buckets follow timestamps for the creator dashboard.
///
/// `Week` yields seven daily counts. `Month` yields six consecutive five-day
/// buckets ending on `today`, each labelled with its last day.
pub fn follower_buckets(
    range: FollowerRange,
    today: NaiveDate,
    followed_at: &[DateTime<Utc>],
) -> Vec<FollowerPoint> {
    let start = range.start(today);
    let dates: Vec<NaiveDate> = followed_at
        .iter()
        .map(|at| at.date_naive())
        .filter(|date| *date >= start && *date <= today)
        .collect();

    match range {
        FollowerRange::Week => (0..7)
            .map(|offset| {
                let day = start + Duration::days(offset);
                FollowerPoint {
                    label: day.format("%Y-%m-%d").to_string(),
                    count: dates.iter().filter(|date| **date == day).count() as i64,
                }
            })
            .collect(),
        FollowerRange::Month => (0..6)
            .map(|chunk| {
                let from = start + Duration::days(chunk * 5);
                let to = start + Duration::days((chunk + 1) * 5);
                let count = dates
                    .iter()
                    .filter(|date| (chunk == 0 && **date == from) || (**date > from && **date <= to))
                    .count() as i64;
                FollowerPoint {
                    label: to.format("%d %b").to_string(),
                    count,
                }
            })
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSubscriberCount {
    pub plan_id: Uuid,
    pub name: String,
    pub subscriber_count: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlanShare {
    pub id: Uuid,
    pub name: String,
    pub subscriber_count: i64,
    pub percent: f64,
}

/// Subscriber share per plan, rounded to two decimals; zero when nobody subscribes.
pub fn plan_shares(counts: Vec<PlanSubscriberCount>) -> Vec<PlanShare> {
    let total: i64 = counts.iter().map(|plan| plan.subscriber_count).sum();
    counts
        .into_iter()
        .map(|plan| {
            let percent = if total > 0 {
                let raw = plan.subscriber_count as f64 / total as f64 * 100.0;
                (raw * 100.0).round() / 100.0
            } else {
                0.0
            };
            PlanShare {
                id: plan.plan_id,
                name: plan.name,
                subscriber_count: plan.subscriber_count,
                percent,
            }
        })
        .collect()
}
