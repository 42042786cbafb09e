use std::{collections::HashMap, sync::Arc};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{dsl::count, insert_into, prelude::*, update};
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{multibank_transactions, subscription_plans, user_subscriptions},
    },
};
use domain::{
    entities::{
        subscription_plans::PlanEntity,
        subscriptions::{SubscriptionEntity, UpsertSubscriptionEntity},
    },
    repositories::subscriptions::SubscriptionRepository,
    value_objects::{
        enums::transaction_statuses::TransactionStatus, follower_stats::PlanSubscriberCount,
        subscription_periods::subscription_window,
    },
};

pub struct SubscriptionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SubscriptionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionPostgres {
    async fn find_active(
        &self,
        subscriber_id: Uuid,
        creator_id: Uuid,
        plan_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<SubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let subscription = user_subscriptions::table
            .filter(user_subscriptions::subscriber_id.eq(subscriber_id))
            .filter(user_subscriptions::creator_id.eq(creator_id))
            .filter(user_subscriptions::plan_id.eq(plan_id))
            .filter(user_subscriptions::is_active.eq(true))
            .filter(user_subscriptions::end_date.ge(now))
            .select(SubscriptionEntity::as_select())
            .first::<SubscriptionEntity>(&mut conn)
            .optional()?;

        Ok(subscription)
    }

    async fn upsert_after_checkout(
        &self,
        upsert_subscription_entity: UpsertSubscriptionEntity,
    ) -> Result<SubscriptionEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let subscription = insert_into(user_subscriptions::table)
            .values(&upsert_subscription_entity)
            .on_conflict((
                user_subscriptions::subscriber_id,
                user_subscriptions::creator_id,
                user_subscriptions::plan_id,
            ))
            .do_update()
            .set((
                &upsert_subscription_entity,
                user_subscriptions::updated_at.eq(Utc::now()),
            ))
            .returning(SubscriptionEntity::as_returning())
            .get_result::<SubscriptionEntity>(&mut conn)?;

        Ok(subscription)
    }

    async fn find_pending_checkout(
        &self,
        subscriber_id: Uuid,
        creator_id: Uuid,
        plan_id: Uuid,
    ) -> Result<Option<SubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let unconfirmed_payments = multibank_transactions::table
            .filter(multibank_transactions::status.eq(TransactionStatus::New.to_string()))
            .select(multibank_transactions::id.nullable());

        let subscription = user_subscriptions::table
            .filter(user_subscriptions::subscriber_id.eq(subscriber_id))
            .filter(user_subscriptions::creator_id.eq(creator_id))
            .filter(user_subscriptions::plan_id.eq(plan_id))
            .filter(user_subscriptions::is_active.eq(false))
            .filter(user_subscriptions::payment_reference.eq_any(unconfirmed_payments))
            .select(SubscriptionEntity::as_select())
            .first::<SubscriptionEntity>(&mut conn)
            .optional()?;

        Ok(subscription)
    }

    async fn activate_by_payment_reference(
        &self,
        transaction_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<(SubscriptionEntity, PlanEntity)>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let activated = conn.transaction::<_, anyhow::Error, _>(|conn| {
            let plan = user_subscriptions::table
                .inner_join(subscription_plans::table)
                .filter(user_subscriptions::payment_reference.eq(Some(transaction_id)))
                .select(PlanEntity::as_select())
                .first::<PlanEntity>(conn)
                .optional()?;
            let Some(plan) = plan else {
                return Ok(None);
            };

            let (start_date, end_date) = subscription_window(now, plan.duration_days)?;
            let subscription = update(
                user_subscriptions::table
                    .filter(user_subscriptions::payment_reference.eq(Some(transaction_id))),
            )
            .set((
                user_subscriptions::is_active.eq(true),
                user_subscriptions::start_date.eq(start_date),
                user_subscriptions::end_date.eq(end_date),
                user_subscriptions::updated_at.eq(Utc::now()),
            ))
            .returning(SubscriptionEntity::as_returning())
            .get_result::<SubscriptionEntity>(conn)?;

            Ok(Some((subscription, plan)))
        })?;

        Ok(activated)
    }

    async fn list_for_subscriber(
        &self,
        subscriber_id: Uuid,
    ) -> Result<Vec<(SubscriptionEntity, PlanEntity)>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = user_subscriptions::table
            .inner_join(subscription_plans::table)
            .filter(user_subscriptions::subscriber_id.eq(subscriber_id))
            .order(user_subscriptions::end_date.desc())
            .select((SubscriptionEntity::as_select(), PlanEntity::as_select()))
            .load::<(SubscriptionEntity, PlanEntity)>(&mut conn)?;

        Ok(results)
    }

    async fn active_plan_prices(
        &self,
        subscriber_id: Uuid,
        creator_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<i64>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let prices = user_subscriptions::table
            .inner_join(subscription_plans::table)
            .filter(user_subscriptions::subscriber_id.eq(subscriber_id))
            .filter(user_subscriptions::creator_id.eq(creator_id))
            .filter(user_subscriptions::is_active.eq(true))
            .filter(user_subscriptions::end_date.ge(now))
            .select(subscription_plans::price)
            .load::<i64>(&mut conn)?;

        Ok(prices)
    }

    async fn active_plan_ids(
        &self,
        subscriber_id: Uuid,
        creator_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<Uuid>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let ids = user_subscriptions::table
            .filter(user_subscriptions::subscriber_id.eq(subscriber_id))
            .filter(user_subscriptions::creator_id.eq(creator_id))
            .filter(user_subscriptions::is_active.eq(true))
            .filter(user_subscriptions::end_date.ge(now))
            .select(user_subscriptions::plan_id)
            .load::<Uuid>(&mut conn)?;

        Ok(ids)
    }

    async fn subscriber_counts_by_plan(
        &self,
        creator_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<PlanSubscriberCount>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let plans = subscription_plans::table
            .filter(subscription_plans::creator_id.eq(creator_id))
            .order(subscription_plans::price.asc())
            .select((subscription_plans::id, subscription_plans::name))
            .load::<(Uuid, String)>(&mut conn)?;

        let counts: HashMap<Uuid, i64> = user_subscriptions::table
            .filter(user_subscriptions::creator_id.eq(creator_id))
            .filter(user_subscriptions::is_active.eq(true))
            .filter(user_subscriptions::end_date.ge(now))
            .group_by(user_subscriptions::plan_id)
            .select((user_subscriptions::plan_id, count(user_subscriptions::id)))
            .load::<(Uuid, i64)>(&mut conn)?
            .into_iter()
            .collect();

        Ok(plans
            .into_iter()
            .map(|(plan_id, name)| PlanSubscriberCount {
                subscriber_count: counts.get(&plan_id).copied().unwrap_or(0),
                plan_id,
                name,
            })
            .collect())
    }
}
