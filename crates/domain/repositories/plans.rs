use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::subscription_plans::{InsertPlanEntity, PlanEntity, UpdatePlanEntity};

#[automock]
#[async_trait]
pub trait PlanRepository {
    async fn create(&self, insert_plan_entity: InsertPlanEntity) -> Result<PlanEntity>;

    async fn update(&self, plan_id: Uuid, changes: UpdatePlanEntity) -> Result<PlanEntity>;

    async fn find_by_id(&self, plan_id: Uuid) -> Result<Option<PlanEntity>>;

    async fn list_by_creator(&self, creator_id: Uuid, only_active: bool) -> Result<Vec<PlanEntity>>;
}
