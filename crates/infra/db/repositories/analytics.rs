use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{dsl::count, pg::Pg, prelude::*};

use crate::{
    domain,
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{multibank_transactions, posts, user_subscriptions, users},
    },
};
use domain::{
    repositories::analytics::AnalyticsRepository,
    value_objects::{
        analytics::{bucket_series, AnalyticsRange, ContentTypeCount, TimeBucket},
        enums::transaction_statuses::TransactionStatus,
    },
};

pub struct AnalyticsPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl AnalyticsPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

fn paid_transactions<'a>(range: &AnalyticsRange) -> multibank_transactions::BoxedQuery<'a, Pg> {
    let mut query = multibank_transactions::table
        .filter(multibank_transactions::status.eq(TransactionStatus::Paid.to_string()))
        .into_boxed();
    if let Some(from) = range.from {
        query = query.filter(multibank_transactions::created_at.ge(from));
    }
    if let Some(to) = range.to {
        query = query.filter(multibank_transactions::created_at.lt(to));
    }
    query
}

#[async_trait]
impl AnalyticsRepository for AnalyticsPostgres {
    async fn creator_earnings(&self, range: AnalyticsRange) -> Result<Vec<TimeBucket>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let points = paid_transactions(&range)
            .select((
                multibank_transactions::created_at,
                multibank_transactions::creator_amount,
            ))
            .load::<(DateTime<Utc>, i64)>(&mut conn)?;

        Ok(bucket_series(range.period, &points))
    }

    async fn platform_earnings(&self, range: AnalyticsRange) -> Result<Vec<TimeBucket>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let points = paid_transactions(&range)
            .select((
                multibank_transactions::created_at,
                multibank_transactions::sapi_amount,
            ))
            .load::<(DateTime<Utc>, i64)>(&mut conn)?;

        Ok(bucket_series(range.period, &points))
    }

    async fn registered_accounts(&self, range: AnalyticsRange) -> Result<Vec<TimeBucket>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = users::table
            .filter(users::is_admin.eq(false))
            .select(users::created_at)
            .into_boxed();
        if let Some(is_creator) = range.user_type.creator_filter() {
            query = query.filter(users::is_creator.eq(is_creator));
        }
        if let Some(from) = range.from {
            query = query.filter(users::created_at.ge(from));
        }
        if let Some(to) = range.to {
            query = query.filter(users::created_at.lt(to));
        }

        let points: Vec<(DateTime<Utc>, i64)> = query
            .load::<DateTime<Utc>>(&mut conn)?
            .into_iter()
            .map(|created_at| (created_at, 1))
            .collect();

        Ok(bucket_series(range.period, &points))
    }

    async fn active_subscriptions(
        &self,
        range: AnalyticsRange,
        now: DateTime<Utc>,
    ) -> Result<Vec<TimeBucket>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = user_subscriptions::table
            .filter(user_subscriptions::is_active.eq(true))
            .filter(user_subscriptions::end_date.ge(now))
            .select(user_subscriptions::start_date)
            .into_boxed();
        if let Some(from) = range.from {
            query = query.filter(user_subscriptions::start_date.ge(from));
        }
        if let Some(to) = range.to {
            query = query.filter(user_subscriptions::start_date.lt(to));
        }

        let points: Vec<(DateTime<Utc>, i64)> = query
            .load::<DateTime<Utc>>(&mut conn)?
            .into_iter()
            .map(|started_at| (started_at, 1))
            .collect();

        Ok(bucket_series(range.period, &points))
    }

    async fn active_subscription_total(&self, now: DateTime<Utc>) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let total = user_subscriptions::table
            .filter(user_subscriptions::is_active.eq(true))
            .filter(user_subscriptions::end_date.ge(now))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(total)
    }

    async fn content_type_counts(&self) -> Result<Vec<ContentTypeCount>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = posts::table
            .filter(posts::is_deleted.eq(false))
            .group_by(posts::post_type)
            .select((posts::post_type, count(posts::id)))
            .order(posts::post_type.asc())
            .load::<(String, i64)>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(post_type, count)| ContentTypeCount { post_type, count })
            .collect())
    }
}
