use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

/// Number of days in the calendar month containing `date`.
pub fn days_in_month(date: NaiveDate) -> i32 {
    let (year, month) = (date.year(), date.month());
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let first_of_this = NaiveDate::from_ymd_opt(year, month, 1);

    match (first_of_this, first_of_next) {
        (Some(start), Some(end)) => (end - start).num_days() as i32,
        // Only reachable at the edge of chrono's supported range.
        _ => 31,
    }
}

/// Plan duration fixed at creation time.
pub fn plan_duration_for(now: DateTime<Utc>) -> i32 {
    days_in_month(now.date_naive())
}

/// Validity window of a subscription bought at `starts_at`.
pub fn subscription_window(
    starts_at: DateTime<Utc>,
    duration_days: i32,
) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let ends_at = starts_at
        .checked_add_signed(Duration::days(duration_days.into()))
        .context("failed to compute subscription end date")?;
    Ok((starts_at, ends_at))
}
