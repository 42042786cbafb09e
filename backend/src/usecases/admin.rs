use std::sync::Arc;

use chrono::{DateTime, Utc};
use crates::domain::{
    entities::{
        notification_distributions::{
            DistributionEntity, InsertDistributionEntity, UpdateDistributionEntity,
        },
        reports::{InsertReportCommentEntity, ReportCommentEntity, ReportEntity},
        users::{InsertUserEntity, UpdateUserEntity, UserEntity},
    },
    repositories::{
        admins::AdminRepository, distributions::DistributionRepository, posts::PostRepository,
        reports::ReportRepository, users::UserRepository,
    },
    value_objects::{
        enums::{
            distribution_statuses::DistributionStatus, report_statuses::ReportStatus,
            user_types::UserType,
        },
        insert_outcome::InsertOutcome,
        pagination::{Page, Paginated},
        permissions::{Access, Permission, Section, has_permission, parse_codes},
        phone::normalize_phone,
        users::{AdminCreatorDto, AdminCreatorFilter},
    },
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::auth::password::hash_password;

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("admin access required")]
    NotAdmin,
    #[error("missing permission {0}")]
    PermissionDenied(String),
    #[error("creator not found")]
    CreatorNotFound,
    #[error("report not found")]
    ReportNotFound,
    #[error("admin not found")]
    AdminNotFound,
    #[error("distribution not found")]
    DistributionNotFound,
    #[error("sapi share must be between 0 and 100")]
    InvalidShare,
    #[error("report is already resolved")]
    ReportResolved,
    #[error("comment must not be empty")]
    EmptyComment,
    #[error("phone number is required")]
    EmptyPhone,
    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    WeakPassword,
    #[error("unknown permission {0}")]
    UnknownPermission(String),
    #[error("phone number or username is already taken")]
    AccountExists,
    #[error("an admin cannot delete themselves")]
    SelfDelete,
    #[error("title and body are required")]
    EmptyDistribution,
    #[error("distribution was already sent")]
    DistributionSent,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AdminError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            AdminError::NotAdmin | AdminError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AdminError::CreatorNotFound
            | AdminError::ReportNotFound
            | AdminError::AdminNotFound
            | AdminError::DistributionNotFound => StatusCode::NOT_FOUND,
            AdminError::InvalidShare
            | AdminError::ReportResolved
            | AdminError::EmptyComment
            | AdminError::EmptyPhone
            | AdminError::WeakPassword
            | AdminError::UnknownPermission(_)
            | AdminError::AccountExists
            | AdminError::SelfDelete
            | AdminError::EmptyDistribution
            | AdminError::DistributionSent => StatusCode::BAD_REQUEST,
            AdminError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, AdminError>;

/// Resolves whether an account may perform a back-office action.
pub struct PermissionGate<U, A>
where
    U: UserRepository + Send + Sync + 'static,
    A: AdminRepository + Send + Sync + 'static,
{
    user_repo: Arc<U>,
    admin_repo: Arc<A>,
}

impl<U, A> PermissionGate<U, A>
where
    U: UserRepository + Send + Sync + 'static,
    A: AdminRepository + Send + Sync + 'static,
{
    pub fn new(user_repo: Arc<U>, admin_repo: Arc<A>) -> Self {
        Self {
            user_repo,
            admin_repo,
        }
    }

    pub async fn check(&self, user_id: Uuid, section: Section, access: Access) -> UseCaseResult<()> {
        let is_admin = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "admin: failed to load account");
                AdminError::Internal(err)
            })?
            .is_some_and(|user| user.is_admin && user.is_active && !user.is_deleted);
        if !is_admin {
            return Err(AdminError::NotAdmin);
        }

        let codes = self.admin_repo.permissions_for(user_id).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "admin: failed to load permissions");
            AdminError::Internal(err)
        })?;
        if has_permission(&parse_codes(&codes), section, access) {
            Ok(())
        } else {
            warn!(%user_id, section = section.as_str(), access = access.as_str(), "admin: permission denied");
            Err(AdminError::PermissionDenied(
                Permission::new(access, section).code(),
            ))
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShareModel {
    pub sapi_share: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportCommentModel {
    pub comment: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAdminModel {
    pub phone_number: String,
    pub password: String,
    pub username: Option<String>,
    pub full_name: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAdminModel {
    pub phone_number: Option<String>,
    pub password: Option<String>,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub permissions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AdminDto {
    pub id: Uuid,
    pub phone_number: String,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub permissions: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl AdminDto {
    fn new(user: UserEntity, permissions: Vec<String>) -> Self {
        Self {
            id: user.id,
            phone_number: user.phone_number,
            username: user.username,
            full_name: user.full_name,
            permissions,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PermissionDto {
    pub code: String,
    pub section: Section,
    pub access: Access,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDistributionModel {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub user_type: UserType,
    pub sending_date: Option<DateTime<Utc>>,
    /// Saved as a draft instead of being queued for sending.
    #[serde(default)]
    pub draft: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDistributionModel {
    pub title: Option<String>,
    pub body: Option<String>,
    pub user_type: Option<UserType>,
    pub sending_date: Option<DateTime<Utc>>,
    pub status: Option<DistributionStatus>,
}

pub struct AdminUseCase<U, A, R, P, D>
where
    U: UserRepository + Send + Sync + 'static,
    A: AdminRepository + Send + Sync + 'static,
    R: ReportRepository + Send + Sync + 'static,
    P: PostRepository + Send + Sync + 'static,
    D: DistributionRepository + Send + Sync + 'static,
{
    gate: PermissionGate<U, A>,
    user_repo: Arc<U>,
    admin_repo: Arc<A>,
    report_repo: Arc<R>,
    post_repo: Arc<P>,
    distribution_repo: Arc<D>,
}

impl<U, A, R, P, D> AdminUseCase<U, A, R, P, D>
where
    U: UserRepository + Send + Sync + 'static,
    A: AdminRepository + Send + Sync + 'static,
    R: ReportRepository + Send + Sync + 'static,
    P: PostRepository + Send + Sync + 'static,
    D: DistributionRepository + Send + Sync + 'static,
{
    pub fn new(
        user_repo: Arc<U>,
        admin_repo: Arc<A>,
        report_repo: Arc<R>,
        post_repo: Arc<P>,
        distribution_repo: Arc<D>,
    ) -> Self {
        Self {
            gate: PermissionGate::new(Arc::clone(&user_repo), Arc::clone(&admin_repo)),
            user_repo,
            admin_repo,
            report_repo,
            post_repo,
            distribution_repo,
        }
    }

    async fn load_creator(&self, creator_id: Uuid) -> UseCaseResult<UserEntity> {
        self.user_repo
            .find_by_id(creator_id)
            .await
            .map_err(|err| {
                error!(%creator_id, db_error = ?err, "admin: failed to load creator");
                AdminError::Internal(err)
            })?
            .filter(|user| user.is_creator)
            .ok_or(AdminError::CreatorNotFound)
    }

    pub async fn list_creators(
        &self,
        admin_id: Uuid,
        filter: AdminCreatorFilter,
    ) -> UseCaseResult<Paginated<AdminCreatorDto>> {
        self.gate.check(admin_id, Section::Creators, Access::View).await?;
        let page = filter.page;
        let (creators, count) = self.user_repo.list_creators(filter).await.map_err(|err| {
            error!(db_error = ?err, "admin: failed to list creators");
            AdminError::Internal(err)
        })?;
        Ok(Paginated::new(
            creators.into_iter().map(AdminCreatorDto::from).collect(),
            count,
            page,
        ))
    }

    pub async fn creator(&self, admin_id: Uuid, creator_id: Uuid) -> UseCaseResult<AdminCreatorDto> {
        self.gate.check(admin_id, Section::Creators, Access::View).await?;
        Ok(self.load_creator(creator_id).await?.into())
    }

    /// Frees the creator's phone and username and deactivates the account.
    pub async fn block_creator(
        &self,
        admin_id: Uuid,
        creator_id: Uuid,
    ) -> UseCaseResult<AdminCreatorDto> {
        self.gate.check(admin_id, Section::Creators, Access::Modify).await?;
        self.load_creator(creator_id).await?;

        self.user_repo.block_by_admin(creator_id).await.map_err(|err| {
            error!(%creator_id, db_error = ?err, "admin: failed to block creator");
            AdminError::Internal(err)
        })?;
        info!(%admin_id, %creator_id, "admin: creator blocked");

        Ok(self.load_creator(creator_id).await?.into())
    }

    pub async fn update_sapi_share(
        &self,
        admin_id: Uuid,
        creator_id: Uuid,
        model: ShareModel,
    ) -> UseCaseResult<AdminCreatorDto> {
        self.gate.check(admin_id, Section::Creators, Access::Modify).await?;
        if !(0..=100).contains(&model.sapi_share) {
            return Err(AdminError::InvalidShare);
        }
        self.load_creator(creator_id).await?;

        self.user_repo
            .update_sapi_share(creator_id, model.sapi_share)
            .await
            .map_err(|err| {
                error!(%creator_id, db_error = ?err, "admin: failed to update share");
                AdminError::Internal(err)
            })?;
        info!(%admin_id, %creator_id, sapi_share = model.sapi_share, "admin: share updated");

        Ok(self.load_creator(creator_id).await?.into())
    }

    pub async fn list_reports(
        &self,
        admin_id: Uuid,
        status: Option<ReportStatus>,
        page: Page,
    ) -> UseCaseResult<Paginated<ReportEntity>> {
        self.gate.check(admin_id, Section::Reports, Access::View).await?;
        let (reports, count) = self.report_repo.list(status, page).await.map_err(|err| {
            error!(db_error = ?err, "admin: failed to list reports");
            AdminError::Internal(err)
        })?;
        Ok(Paginated::new(reports, count, page))
    }

    async fn waiting_report(&self, report_id: Uuid) -> UseCaseResult<ReportEntity> {
        let report = self
            .report_repo
            .find_by_id(report_id)
            .await
            .map_err(|err| {
                error!(%report_id, db_error = ?err, "admin: failed to load report");
                AdminError::Internal(err)
            })?
            .ok_or(AdminError::ReportNotFound)?;
        let resolved = ReportStatus::from_str(&report.status).is_some_and(|status| status.is_resolved());
        if resolved {
            return Err(AdminError::ReportResolved);
        }
        Ok(report)
    }

    pub async fn ignore_report(&self, admin_id: Uuid, report_id: Uuid) -> UseCaseResult<ReportEntity> {
        self.gate.check(admin_id, Section::Reports, Access::Modify).await?;
        self.waiting_report(report_id).await?;

        let report = self
            .report_repo
            .resolve(report_id, ReportStatus::Ignored)
            .await
            .map_err(|err| {
                error!(%report_id, db_error = ?err, "admin: failed to ignore report");
                AdminError::Internal(err)
            })?
            .ok_or(AdminError::ReportNotFound)?;
        info!(%admin_id, %report_id, "admin: report ignored");
        Ok(report)
    }

    /// Hides the reported post and resolves every waiting report against it.
    pub async fn block_reported_post(
        &self,
        admin_id: Uuid,
        report_id: Uuid,
    ) -> UseCaseResult<ReportEntity> {
        self.gate.check(admin_id, Section::Reports, Access::Modify).await?;
        let report = self.waiting_report(report_id).await?;
        let post_id = report.post_id;

        self.post_repo.set_blocked(post_id, true).await.map_err(|err| {
            error!(%post_id, db_error = ?err, "admin: failed to block post");
            AdminError::Internal(err)
        })?;
        let resolved = self
            .report_repo
            .resolve_for_post(post_id, ReportStatus::BlockedPost)
            .await
            .map_err(|err| {
                error!(%post_id, db_error = ?err, "admin: failed to resolve reports");
                AdminError::Internal(err)
            })?;
        info!(%admin_id, %post_id, resolved, "admin: reported post blocked");

        self.report_repo
            .find_by_id(report_id)
            .await
            .map_err(AdminError::Internal)?
            .ok_or(AdminError::ReportNotFound)
    }

    pub async fn comment_report(
        &self,
        admin_id: Uuid,
        report_id: Uuid,
        model: ReportCommentModel,
    ) -> UseCaseResult<ReportCommentEntity> {
        self.gate.check(admin_id, Section::Reports, Access::Modify).await?;
        let comment = model.comment.trim().to_string();
        if comment.is_empty() {
            return Err(AdminError::EmptyComment);
        }
        self.report_repo
            .find_by_id(report_id)
            .await
            .map_err(AdminError::Internal)?
            .ok_or(AdminError::ReportNotFound)?;

        self.report_repo
            .add_comment(InsertReportCommentEntity {
                report_id,
                admin_id,
                comment,
            })
            .await
            .map_err(|err| {
                error!(%report_id, db_error = ?err, "admin: failed to add report comment");
                AdminError::Internal(err)
            })
    }

    pub fn permission_catalogue(&self) -> Vec<PermissionDto> {
        Permission::catalogue()
            .into_iter()
            .map(|permission| PermissionDto {
                code: permission.code(),
                section: permission.section,
                access: permission.access,
            })
            .collect()
    }

    pub async fn list_admins(&self, admin_id: Uuid) -> UseCaseResult<Vec<AdminDto>> {
        self.gate.check(admin_id, Section::Admins, Access::View).await?;
        let admins = self.admin_repo.list_admins().await.map_err(|err| {
            error!(db_error = ?err, "admin: failed to list admins");
            AdminError::Internal(err)
        })?;

        let mut result = Vec::with_capacity(admins.len());
        for admin in admins {
            let permissions = self
                .admin_repo
                .permissions_for(admin.id)
                .await
                .map_err(AdminError::Internal)?;
            result.push(AdminDto::new(admin, permissions));
        }
        Ok(result)
    }

    pub async fn create_admin(
        &self,
        admin_id: Uuid,
        model: CreateAdminModel,
    ) -> UseCaseResult<AdminDto> {
        self.gate.check(admin_id, Section::Admins, Access::Modify).await?;
        let phone_number = normalize_phone(&model.phone_number).ok_or(AdminError::EmptyPhone)?;
        if model.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AdminError::WeakPassword);
        }
        let permissions = validate_codes(model.permissions)?;
        let password_hash = hash_password(&model.password)?;

        let outcome = self
            .admin_repo
            .create_admin(
                InsertUserEntity {
                    phone_number,
                    username: model.username,
                    full_name: model.full_name,
                    is_admin: true,
                    is_active: true,
                    password_hash: Some(password_hash),
                },
                permissions.clone(),
            )
            .await
            .map_err(|err| {
                error!(db_error = ?err, "admin: failed to create admin");
                AdminError::Internal(err)
            })?;

        match outcome {
            InsertOutcome::Inserted(created) => {
                info!(%admin_id, new_admin_id = %created.id, "admin: admin created");
                Ok(AdminDto::new(created, permissions))
            }
            InsertOutcome::Duplicate => Err(AdminError::AccountExists),
        }
    }

    pub async fn update_admin(
        &self,
        admin_id: Uuid,
        target_id: Uuid,
        model: UpdateAdminModel,
    ) -> UseCaseResult<AdminDto> {
        self.gate.check(admin_id, Section::Admins, Access::Modify).await?;

        let phone_number = match model.phone_number {
            Some(raw) => Some(normalize_phone(&raw).ok_or(AdminError::EmptyPhone)?),
            None => None,
        };
        let password_hash = match model.password {
            Some(password) if password.chars().count() < MIN_PASSWORD_LEN => {
                return Err(AdminError::WeakPassword);
            }
            Some(password) => Some(hash_password(&password)?),
            None => None,
        };
        let permissions = model.permissions.map(validate_codes).transpose()?;

        let updated = self
            .admin_repo
            .update_admin(
                target_id,
                UpdateUserEntity {
                    username: model.username,
                    full_name: model.full_name,
                    phone_number,
                    password_hash,
                    updated_at: Some(Utc::now()),
                    ..Default::default()
                },
                permissions,
            )
            .await
            .map_err(|err| {
                error!(%target_id, db_error = ?err, "admin: failed to update admin");
                AdminError::Internal(err)
            })?
            .ok_or(AdminError::AdminNotFound)?;

        let permissions = self
            .admin_repo
            .permissions_for(target_id)
            .await
            .map_err(AdminError::Internal)?;
        Ok(AdminDto::new(updated, permissions))
    }

    pub async fn delete_admin(&self, admin_id: Uuid, target_id: Uuid) -> UseCaseResult<()> {
        self.gate.check(admin_id, Section::Admins, Access::Modify).await?;
        if admin_id == target_id {
            return Err(AdminError::SelfDelete);
        }
        let deleted = self.admin_repo.delete_admin(target_id).await.map_err(|err| {
            error!(%target_id, db_error = ?err, "admin: failed to delete admin");
            AdminError::Internal(err)
        })?;
        if !deleted {
            return Err(AdminError::AdminNotFound);
        }
        info!(%admin_id, %target_id, "admin: admin deleted");
        Ok(())
    }

    pub async fn create_distribution(
        &self,
        admin_id: Uuid,
        model: CreateDistributionModel,
    ) -> UseCaseResult<DistributionEntity> {
        self.gate
            .check(admin_id, Section::Notifications, Access::Modify)
            .await?;
        let (title, body) = (model.title.trim().to_string(), model.body.trim().to_string());
        if title.is_empty() || body.is_empty() {
            return Err(AdminError::EmptyDistribution);
        }
        let status = if model.draft {
            DistributionStatus::Draft
        } else {
            DistributionStatus::Waiting
        };

        let distribution = self
            .distribution_repo
            .create(InsertDistributionEntity {
                title,
                body,
                user_type: model.user_type.to_string(),
                status: status.to_string(),
                sending_date: model.sending_date,
                created_by: admin_id,
            })
            .await
            .map_err(|err| {
                error!(db_error = ?err, "admin: failed to create distribution");
                AdminError::Internal(err)
            })?;
        info!(%admin_id, distribution_id = %distribution.id, %status, "admin: distribution created");
        Ok(distribution)
    }

    pub async fn list_distributions(
        &self,
        admin_id: Uuid,
        page: Page,
    ) -> UseCaseResult<Vec<DistributionEntity>> {
        self.gate
            .check(admin_id, Section::Notifications, Access::View)
            .await?;
        self.distribution_repo.list(page).await.map_err(|err| {
            error!(db_error = ?err, "admin: failed to list distributions");
            AdminError::Internal(err)
        })
    }

    /// Sent distributions are immutable; they may only be re-queued via a new one.
    pub async fn update_distribution(
        &self,
        admin_id: Uuid,
        distribution_id: Uuid,
        model: UpdateDistributionModel,
    ) -> UseCaseResult<DistributionEntity> {
        self.gate
            .check(admin_id, Section::Notifications, Access::Modify)
            .await?;
        if matches!(model.status, Some(DistributionStatus::Sent)) {
            return Err(AdminError::DistributionSent);
        }
        let non_blank = |value: Option<String>| -> UseCaseResult<Option<String>> {
            match value.map(|value| value.trim().to_string()) {
                Some(value) if value.is_empty() => Err(AdminError::EmptyDistribution),
                other => Ok(other),
            }
        };

        let current = self
            .distribution_repo
            .find_by_id(distribution_id)
            .await
            .map_err(AdminError::Internal)?
            .ok_or(AdminError::DistributionNotFound)?;
        if DistributionStatus::from_str(&current.status) == DistributionStatus::Sent {
            return Err(AdminError::DistributionSent);
        }

        self.distribution_repo
            .update(
                distribution_id,
                UpdateDistributionEntity {
                    title: non_blank(model.title)?,
                    body: non_blank(model.body)?,
                    user_type: model.user_type.map(|user_type| user_type.to_string()),
                    status: model.status.map(|status| status.to_string()),
                    sending_date: model.sending_date,
                    updated_at: Some(Utc::now()),
                },
            )
            .await
            .map_err(|err| {
                error!(%distribution_id, db_error = ?err, "admin: failed to update distribution");
                AdminError::Internal(err)
            })?
            .ok_or(AdminError::DistributionNotFound)
    }
}

fn validate_codes(codes: Vec<String>) -> UseCaseResult<Vec<String>> {
    let mut valid: Vec<String> = Vec::with_capacity(codes.len());
    for code in codes {
        let permission =
            Permission::parse(code.trim()).ok_or_else(|| AdminError::UnknownPermission(code.clone()))?;
        let code = permission.code();
        if !valid.contains(&code) {
            valid.push(code);
        }
    }
    Ok(valid)
}
