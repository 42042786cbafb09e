use std::sync::Arc;

use crates::domain::{
    entities::{
        activities::ActivityEntity,
        answer_options::{InsertPostAnswerEntity, PostAnswerEntity},
        comments::{CommentEntity, InsertCommentEntity},
        posts::PostEntity,
        reports::{InsertReportEntity, ReportEntity},
        users::UserEntity,
    },
    repositories::{
        activities::ActivityRepository, comments::CommentRepository, likes::LikeRepository,
        posts::PostRepository, reports::ReportRepository, social::SocialRepository,
        users::UserRepository,
    },
    value_objects::{
        enums::{
            activity_types::ActivityType, post_types::PostType, report_statuses::ReportStatus,
            report_types::ReportType,
        },
        insert_outcome::InsertOutcome,
        pagination::Page,
        users::PublicProfileDto,
    },
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use super::activities::ActivityRecorder;

/// Uniform response of the follow and block toggles.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ToggleResult<T> {
    pub status: &'static str,
    pub action: &'static str,
    pub data: T,
}

impl<T> ToggleResult<T> {
    fn success(action: &'static str, data: T) -> Self {
        Self {
            status: "success",
            action,
            data,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FollowData {
    pub follower: Uuid,
    pub followed: Uuid,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BlockData {
    pub blocker: Uuid,
    pub blocked: Uuid,
}

/// Exactly one of the targets must be set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LikeModel {
    pub post_id: Option<Uuid>,
    pub comment_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LikeResult {
    pub liked: bool,
    pub detail: &'static str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentModel {
    pub post_id: Uuid,
    /// Set when replying to an existing comment.
    pub comment_id: Option<Uuid>,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SaveResult {
    pub saved: bool,
    pub detail: &'static str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportModel {
    pub post_id: Uuid,
    pub report_type: ReportType,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnswerModel {
    pub post_id: Uuid,
    pub option_ids: Vec<Uuid>,
}

#[derive(Debug, Error)]
pub enum SocialError {
    #[error("user not found")]
    UserNotFound,
    #[error("post not found")]
    PostNotFound,
    #[error("comment not found")]
    CommentNotFound,
    #[error("you cannot follow yourself")]
    SelfFollow,
    #[error("you cannot block yourself")]
    SelfBlock,
    #[error("this user is not available")]
    Blocked,
    #[error("only a post or a comment is accepted")]
    AmbiguousLikeTarget,
    #[error("post or comment is required")]
    MissingLikeTarget,
    #[error("comment text must not be empty")]
    EmptyComment,
    #[error("the comment belongs to another post")]
    CommentPostMismatch,
    #[error("you have already reported this post")]
    AlreadyReported,
    #[error("post is not a questionnaire")]
    NotQuestionnaire,
    #[error("at least one option is required")]
    NoOptionsSelected,
    #[error("option does not belong to this post")]
    ForeignOption,
    #[error("you have already answered this questionnaire")]
    AlreadyAnswered,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl SocialError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            SocialError::UserNotFound | SocialError::PostNotFound | SocialError::CommentNotFound => {
                StatusCode::NOT_FOUND
            }
            SocialError::Blocked => StatusCode::FORBIDDEN,
            SocialError::SelfFollow
            | SocialError::SelfBlock
            | SocialError::AmbiguousLikeTarget
            | SocialError::MissingLikeTarget
            | SocialError::EmptyComment
            | SocialError::CommentPostMismatch
            | SocialError::AlreadyReported
            | SocialError::NotQuestionnaire
            | SocialError::NoOptionsSelected
            | SocialError::ForeignOption
            | SocialError::AlreadyAnswered => StatusCode::BAD_REQUEST,
            SocialError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, SocialError>;

pub struct SocialUseCase<U, S, P, C, L, R, A>
where
    U: UserRepository + Send + Sync + 'static,
    S: SocialRepository + Send + Sync + 'static,
    P: PostRepository + Send + Sync + 'static,
    C: CommentRepository + Send + Sync + 'static,
    L: LikeRepository + Send + Sync + 'static,
    R: ReportRepository + Send + Sync + 'static,
    A: ActivityRepository + Send + Sync + 'static,
{
    user_repo: Arc<U>,
    social_repo: Arc<S>,
    post_repo: Arc<P>,
    comment_repo: Arc<C>,
    like_repo: Arc<L>,
    report_repo: Arc<R>,
    activities: Arc<ActivityRecorder<A>>,
}

impl<U, S, P, C, L, R, A> SocialUseCase<U, S, P, C, L, R, A>
where
    U: UserRepository + Send + Sync + 'static,
    S: SocialRepository + Send + Sync + 'static,
    P: PostRepository + Send + Sync + 'static,
    C: CommentRepository + Send + Sync + 'static,
    L: LikeRepository + Send + Sync + 'static,
    R: ReportRepository + Send + Sync + 'static,
    A: ActivityRepository + Send + Sync + 'static,
{
    pub fn new(
        user_repo: Arc<U>,
        social_repo: Arc<S>,
        post_repo: Arc<P>,
        comment_repo: Arc<C>,
        like_repo: Arc<L>,
        report_repo: Arc<R>,
        activities: Arc<ActivityRecorder<A>>,
    ) -> Self {
        Self {
            user_repo,
            social_repo,
            post_repo,
            comment_repo,
            like_repo,
            report_repo,
            activities,
        }
    }

    async fn visible_user(&self, user_id: Uuid) -> UseCaseResult<UserEntity> {
        self.user_repo
            .find_by_id(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "social: failed to load user");
                SocialError::Internal(err)
            })?
            .filter(|user| !user.is_deleted && !user.is_blocked_by_admin)
            .ok_or(SocialError::UserNotFound)
    }

    async fn live_post(&self, post_id: Uuid) -> UseCaseResult<PostEntity> {
        self.post_repo
            .find_by_id(post_id)
            .await
            .map_err(|err| {
                error!(%post_id, db_error = ?err, "social: failed to load post");
                SocialError::Internal(err)
            })?
            .filter(|post| !post.is_deleted && !post.is_blocked)
            .ok_or(SocialError::PostNotFound)
    }

    async fn comment(&self, comment_id: Uuid) -> UseCaseResult<CommentEntity> {
        self.comment_repo
            .find_by_id(comment_id)
            .await
            .map_err(|err| {
                error!(%comment_id, db_error = ?err, "social: failed to load comment");
                SocialError::Internal(err)
            })?
            .ok_or(SocialError::CommentNotFound)
    }

    pub async fn toggle_follow(
        &self,
        user_id: Uuid,
        target_id: Uuid,
    ) -> UseCaseResult<ToggleResult<FollowData>> {
        if user_id == target_id {
            return Err(SocialError::SelfFollow);
        }
        self.visible_user(target_id).await?;

        let following = self
            .social_repo
            .is_following(user_id, target_id)
            .await
            .map_err(|err| {
                error!(%user_id, %target_id, db_error = ?err, "social: failed to check follow");
                SocialError::Internal(err)
            })?;

        let data = FollowData {
            follower: user_id,
            followed: target_id,
        };

        if following {
            self.social_repo
                .unfollow(user_id, target_id)
                .await
                .map_err(|err| {
                    error!(%user_id, %target_id, db_error = ?err, "social: failed to unfollow");
                    SocialError::Internal(err)
                })?;
            info!(%user_id, %target_id, "social: unfollowed");
            return Ok(ToggleResult::success("unfollowed", data));
        }

        let blocked = self
            .social_repo
            .is_blocked_between(user_id, target_id)
            .await
            .map_err(|err| {
                error!(%user_id, %target_id, db_error = ?err, "social: failed to check block");
                SocialError::Internal(err)
            })?;
        if blocked {
            return Err(SocialError::Blocked);
        }

        self.social_repo
            .follow(user_id, target_id)
            .await
            .map_err(|err| {
                error!(%user_id, %target_id, db_error = ?err, "social: failed to follow");
                SocialError::Internal(err)
            })?;
        self.activities
            .record(ActivityType::Followed, user_id, target_id, None, None);

        info!(%user_id, %target_id, "social: followed");
        Ok(ToggleResult::success("followed", data))
    }

    pub async fn toggle_block(
        &self,
        user_id: Uuid,
        target_id: Uuid,
    ) -> UseCaseResult<ToggleResult<BlockData>> {
        if user_id == target_id {
            return Err(SocialError::SelfBlock);
        }
        self.visible_user(target_id).await?;

        let data = BlockData {
            blocker: user_id,
            blocked: target_id,
        };

        let blocked = self
            .social_repo
            .is_blocked(user_id, target_id)
            .await
            .map_err(|err| {
                error!(%user_id, %target_id, db_error = ?err, "social: failed to check block");
                SocialError::Internal(err)
            })?;

        if blocked {
            self.social_repo
                .unblock(user_id, target_id)
                .await
                .map_err(|err| {
                    error!(%user_id, %target_id, db_error = ?err, "social: failed to unblock");
                    SocialError::Internal(err)
                })?;
            info!(%user_id, %target_id, "social: unblocked");
            return Ok(ToggleResult::success("unblocked", data));
        }

        // A concurrent request may have inserted the same row; the end state is the same.
        let outcome = self
            .social_repo
            .block(user_id, target_id)
            .await
            .map_err(|err| {
                error!(%user_id, %target_id, db_error = ?err, "social: failed to block");
                SocialError::Internal(err)
            })?;
        info!(
            %user_id,
            %target_id,
            duplicate = outcome.is_duplicate(),
            "social: blocked"
        );
        Ok(ToggleResult::success("blocked", data))
    }

    pub async fn toggle_like(&self, user_id: Uuid, model: LikeModel) -> UseCaseResult<LikeResult> {
        match (model.post_id, model.comment_id) {
            (Some(_), Some(_)) => Err(SocialError::AmbiguousLikeTarget),
            (None, None) => Err(SocialError::MissingLikeTarget),
            (Some(post_id), None) => {
                let post = self.live_post(post_id).await?;
                let liked = self
                    .like_repo
                    .toggle_post_like(user_id, post_id)
                    .await
                    .map_err(|err| {
                        error!(%user_id, %post_id, db_error = ?err, "social: failed to toggle post like");
                        SocialError::Internal(err)
                    })?;
                if liked {
                    self.activities.record(
                        ActivityType::LikedPost,
                        user_id,
                        post.creator_id,
                        Some(post_id),
                        None,
                    );
                }
                Ok(LikeResult {
                    liked,
                    detail: if liked {
                        "you liked this post"
                    } else {
                        "you removed your like from this post"
                    },
                })
            }
            (None, Some(comment_id)) => {
                let comment = self.comment(comment_id).await?;
                let liked = self
                    .like_repo
                    .toggle_comment_like(user_id, comment_id)
                    .await
                    .map_err(|err| {
                        error!(%user_id, %comment_id, db_error = ?err, "social: failed to toggle comment like");
                        SocialError::Internal(err)
                    })?;
                if liked {
                    self.activities.record(
                        ActivityType::LikedComment,
                        user_id,
                        comment.user_id,
                        Some(comment_id),
                        None,
                    );
                }
                Ok(LikeResult {
                    liked,
                    detail: if liked {
                        "you liked this comment"
                    } else {
                        "you removed your like from this comment"
                    },
                })
            }
        }
    }

    /// Leaves a comment, or a reply when `comment_id` is set.
    pub async fn leave_comment(
        &self,
        user_id: Uuid,
        model: CommentModel,
    ) -> UseCaseResult<CommentEntity> {
        let text = model.text.trim().to_string();
        if text.is_empty() {
            return Err(SocialError::EmptyComment);
        }

        let post = self.live_post(model.post_id).await?;
        if let Some(parent_id) = model.comment_id {
            let parent = self.comment(parent_id).await?;
            if parent.post_id != post.id {
                return Err(SocialError::CommentPostMismatch);
            }
        }

        let comment = self
            .comment_repo
            .create(InsertCommentEntity {
                post_id: post.id,
                user_id,
                parent_id: model.comment_id,
                text,
            })
            .await
            .map_err(|err| {
                error!(%user_id, post_id = %post.id, db_error = ?err, "social: failed to create comment");
                SocialError::Internal(err)
            })?;

        let activity_type = if comment.parent_id.is_some() {
            ActivityType::Replied
        } else {
            ActivityType::Commented
        };
        self.activities.record(
            activity_type,
            user_id,
            post.creator_id,
            Some(comment.id),
            Some(comment.text.clone()),
        );

        info!(%user_id, post_id = %post.id, comment_id = %comment.id, "social: comment created");
        Ok(comment)
    }

    pub async fn list_comments(&self, post_id: Uuid, page: Page) -> UseCaseResult<Vec<CommentEntity>> {
        self.live_post(post_id).await?;
        self.comment_repo
            .list_top_level(post_id, page)
            .await
            .map_err(|err| {
                error!(%post_id, db_error = ?err, "social: failed to list comments");
                SocialError::Internal(err)
            })
    }

    pub async fn list_replies(
        &self,
        comment_id: Uuid,
        page: Page,
    ) -> UseCaseResult<Vec<CommentEntity>> {
        self.comment(comment_id).await?;
        self.comment_repo
            .list_replies(comment_id, page)
            .await
            .map_err(|err| {
                error!(%comment_id, db_error = ?err, "social: failed to list replies");
                SocialError::Internal(err)
            })
    }

    pub async fn toggle_save(&self, user_id: Uuid, post_id: Uuid) -> UseCaseResult<SaveResult> {
        self.live_post(post_id).await?;
        let saved = self
            .post_repo
            .toggle_save(user_id, post_id)
            .await
            .map_err(|err| {
                error!(%user_id, %post_id, db_error = ?err, "social: failed to toggle save");
                SocialError::Internal(err)
            })?;
        Ok(SaveResult {
            saved,
            detail: if saved {
                "post saved"
            } else {
                "post removed from saved"
            },
        })
    }

    pub async fn report(&self, user_id: Uuid, model: ReportModel) -> UseCaseResult<ReportEntity> {
        self.live_post(model.post_id).await?;

        let outcome = self
            .report_repo
            .create(InsertReportEntity {
                user_id,
                post_id: model.post_id,
                report_type: model.report_type.to_string(),
                description: model
                    .description
                    .map(|text| text.trim().to_string())
                    .filter(|text| !text.is_empty()),
                status: ReportStatus::Waiting.to_string(),
            })
            .await
            .map_err(|err| {
                error!(%user_id, post_id = %model.post_id, db_error = ?err, "social: failed to create report");
                SocialError::Internal(err)
            })?;

        match outcome {
            InsertOutcome::Inserted(report) => {
                info!(
                    %user_id,
                    post_id = %report.post_id,
                    report_type = %model.report_type,
                    "social: post reported"
                );
                Ok(report)
            }
            InsertOutcome::Duplicate => Err(SocialError::AlreadyReported),
        }
    }

    /// Stores a questionnaire answer; every option must belong to the post.
    pub async fn answer(&self, user_id: Uuid, model: AnswerModel) -> UseCaseResult<PostAnswerEntity> {
        let post = self.live_post(model.post_id).await?;
        if PostType::from_str(&post.post_type) != Some(PostType::Questionnaire) {
            return Err(SocialError::NotQuestionnaire);
        }
        if model.option_ids.is_empty() {
            return Err(SocialError::NoOptionsSelected);
        }

        let options = self
            .post_repo
            .list_options(post.id)
            .await
            .map_err(|err| {
                error!(post_id = %post.id, db_error = ?err, "social: failed to load options");
                SocialError::Internal(err)
            })?;
        let all_known = model
            .option_ids
            .iter()
            .all(|id| options.iter().any(|option| option.id == *id));
        if !all_known {
            return Err(SocialError::ForeignOption);
        }

        let mut option_ids = model.option_ids;
        option_ids.sort();
        option_ids.dedup();

        let outcome = self
            .post_repo
            .save_answer(InsertPostAnswerEntity {
                user_id,
                post_id: post.id,
                option_ids,
            })
            .await
            .map_err(|err| {
                error!(%user_id, post_id = %post.id, db_error = ?err, "social: failed to save answer");
                SocialError::Internal(err)
            })?;

        outcome.inserted().ok_or(SocialError::AlreadyAnswered)
    }

    pub async fn profile(&self, viewer_id: Uuid, user_id: Uuid) -> UseCaseResult<PublicProfileDto> {
        let user = self.visible_user(user_id).await?;

        let (followers_count, following_count) = self
            .social_repo
            .follow_counts(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "social: failed to count follows");
                SocialError::Internal(err)
            })?;

        let (is_following, is_blocked) = if viewer_id == user_id {
            (false, false)
        } else {
            let is_following = self
                .social_repo
                .is_following(viewer_id, user_id)
                .await
                .map_err(SocialError::Internal)?;
            let is_blocked = self
                .social_repo
                .is_blocked(viewer_id, user_id)
                .await
                .map_err(SocialError::Internal)?;
            (is_following, is_blocked)
        };

        Ok(PublicProfileDto {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            creator_description: user.creator_description,
            profile_photo_id: user.profile_photo_id,
            background_photo_id: user.background_photo_id,
            category_id: user.category_id,
            is_creator: user.is_creator,
            followers_count,
            following_count,
            is_following,
            is_blocked,
        })
    }

    /// Activity on the user's own content, newest first.
    pub async fn feed(&self, user_id: Uuid, page: Page) -> UseCaseResult<Vec<ActivityEntity>> {
        self.activities.feed(user_id, page).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "social: failed to load activity feed");
            SocialError::Internal(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::test_fixtures::{sample_comment, sample_creator, sample_post, sample_user};
    use chrono::Utc;
    use crates::domain::{
        entities::answer_options::AnswerOptionEntity,
        repositories::{
            activities::MockActivityRepository, comments::MockCommentRepository,
            likes::MockLikeRepository, posts::MockPostRepository, reports::MockReportRepository,
            social::MockSocialRepository, users::MockUserRepository,
        },
    };
    use mockall::predicate::eq;

    type TestUseCase = SocialUseCase<
        MockUserRepository,
        MockSocialRepository,
        MockPostRepository,
        MockCommentRepository,
        MockLikeRepository,
        MockReportRepository,
        MockActivityRepository,
    >;

    #[derive(Default)]
    struct Mocks {
        users: MockUserRepository,
        social: MockSocialRepository,
        posts: MockPostRepository,
        comments: MockCommentRepository,
        likes: MockLikeRepository,
        reports: MockReportRepository,
        activities: MockActivityRepository,
    }

    fn build(mocks: Mocks) -> TestUseCase {
        SocialUseCase::new(
            Arc::new(mocks.users),
            Arc::new(mocks.social),
            Arc::new(mocks.posts),
            Arc::new(mocks.comments),
            Arc::new(mocks.likes),
            Arc::new(mocks.reports),
            Arc::new(ActivityRecorder::new(Arc::new(mocks.activities))),
        )
    }

    fn known_users(users: &mut MockUserRepository) {
        users
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_user(id))));
    }

    #[tokio::test]
    async fn follow_toggles_back_and_forth() {
        let (user_id, target_id) = (Uuid::new_v4(), Uuid::new_v4());
        let mut mocks = Mocks::default();
        known_users(&mut mocks.users);
        let mut seq = mockall::Sequence::new();
        mocks
            .social
            .expect_is_following()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(false));
        mocks
            .social
            .expect_is_following()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(true));
        mocks
            .social
            .expect_is_blocked_between()
            .returning(|_, _| Ok(false));
        mocks
            .social
            .expect_follow()
            .with(eq(user_id), eq(target_id))
            .times(1)
            .returning(|_, _| Ok(()));
        mocks
            .social
            .expect_unfollow()
            .with(eq(user_id), eq(target_id))
            .times(1)
            .returning(|_, _| Ok(()));
        mocks.activities.expect_create().returning(|_| Ok(()));

        let usecase = build(mocks);
        let first = usecase.toggle_follow(user_id, target_id).await.unwrap();
        let second = usecase.toggle_follow(user_id, target_id).await.unwrap();

        assert_eq!(first.action, "followed");
        assert_eq!(first.status, "success");
        assert_eq!(
            first.data,
            FollowData {
                follower: user_id,
                followed: target_id
            }
        );
        assert_eq!(second.action, "unfollowed");
    }

    #[tokio::test]
    async fn cannot_follow_self() {
        let user_id = Uuid::new_v4();
        let usecase = build(Mocks::default());

        let err = usecase.toggle_follow(user_id, user_id).await.unwrap_err();

        assert!(matches!(err, SocialError::SelfFollow));
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn blocked_pair_cannot_follow() {
        let mut mocks = Mocks::default();
        known_users(&mut mocks.users);
        mocks.social.expect_is_following().returning(|_, _| Ok(false));
        mocks
            .social
            .expect_is_blocked_between()
            .returning(|_, _| Ok(true));
        mocks.social.expect_follow().never();

        let err = build(mocks)
            .toggle_follow(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err, SocialError::Blocked));
    }

    #[tokio::test]
    async fn block_then_unblock() {
        let (user_id, target_id) = (Uuid::new_v4(), Uuid::new_v4());
        let mut mocks = Mocks::default();
        known_users(&mut mocks.users);
        let mut seq = mockall::Sequence::new();
        mocks
            .social
            .expect_is_blocked()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(false));
        mocks
            .social
            .expect_is_blocked()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(true));
        mocks
            .social
            .expect_block()
            .with(eq(user_id), eq(target_id))
            .times(1)
            .returning(|_, _| Ok(InsertOutcome::Inserted(())));
        mocks
            .social
            .expect_unblock()
            .times(1)
            .returning(|_, _| Ok(()));

        let usecase = build(mocks);

        assert_eq!(
            usecase.toggle_block(user_id, target_id).await.unwrap().action,
            "blocked"
        );
        assert_eq!(
            usecase.toggle_block(user_id, target_id).await.unwrap().action,
            "unblocked"
        );
    }

    #[tokio::test]
    async fn like_requires_exactly_one_target() {
        let usecase = build(Mocks::default());

        let both = usecase
            .toggle_like(
                Uuid::new_v4(),
                LikeModel {
                    post_id: Some(Uuid::new_v4()),
                    comment_id: Some(Uuid::new_v4()),
                },
            )
            .await
            .unwrap_err();
        let neither = usecase
            .toggle_like(Uuid::new_v4(), LikeModel::default())
            .await
            .unwrap_err();

        assert!(matches!(both, SocialError::AmbiguousLikeTarget));
        assert!(matches!(neither, SocialError::MissingLikeTarget));
    }

    #[tokio::test]
    async fn liking_a_post_records_activity_for_its_creator() {
        let (user_id, creator_id, post_id) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let mut mocks = Mocks::default();
        mocks
            .posts
            .expect_find_by_id()
            .returning(move |id| Ok(Some(sample_post(id, creator_id))));
        mocks
            .likes
            .expect_toggle_post_like()
            .with(eq(user_id), eq(post_id))
            .returning(|_, _| Ok(true));
        mocks
            .activities
            .expect_create()
            .withf(move |activity| {
                activity.activity_type == "liked_post"
                    && activity.content_owner_id == Some(creator_id)
            })
            .times(1)
            .returning(|_| Ok(()));

        let usecase = build(mocks);
        let result = usecase
            .toggle_like(
                user_id,
                LikeModel {
                    post_id: Some(post_id),
                    comment_id: None,
                },
            )
            .await
            .unwrap();

        assert!(result.liked);
        // Let the background insert run before the mock is checked.
        tokio::task::yield_now().await;
    }

    #[tokio::test]
    async fn reply_must_target_comment_on_same_post() {
        let (user_id, post_id) = (Uuid::new_v4(), Uuid::new_v4());
        let mut mocks = Mocks::default();
        mocks
            .posts
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_post(id, Uuid::new_v4()))));
        mocks
            .comments
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_comment(id, Uuid::new_v4(), Uuid::new_v4()))));
        mocks.comments.expect_create().never();

        let err = build(mocks)
            .leave_comment(
                user_id,
                CommentModel {
                    post_id,
                    comment_id: Some(Uuid::new_v4()),
                    text: "agreed".to_string(),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, SocialError::CommentPostMismatch));
    }

    #[tokio::test]
    async fn reply_is_stored_with_parent() {
        let (user_id, post_id, parent_id) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let mut mocks = Mocks::default();
        mocks
            .posts
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_post(id, Uuid::new_v4()))));
        mocks
            .comments
            .expect_find_by_id()
            .returning(move |id| Ok(Some(sample_comment(id, post_id, Uuid::new_v4()))));
        mocks
            .comments
            .expect_create()
            .withf(move |insert| insert.parent_id == Some(parent_id) && insert.text == "agreed")
            .times(1)
            .returning(move |insert| {
                let mut comment = sample_comment(Uuid::new_v4(), insert.post_id, insert.user_id);
                comment.parent_id = insert.parent_id;
                comment.text = insert.text;
                Ok(comment)
            });
        mocks.activities.expect_create().returning(|_| Ok(()));

        let comment = build(mocks)
            .leave_comment(
                user_id,
                CommentModel {
                    post_id,
                    comment_id: Some(parent_id),
                    text: "  agreed ".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(comment.parent_id, Some(parent_id));
    }

    #[tokio::test]
    async fn duplicate_report_is_rejected() {
        let mut mocks = Mocks::default();
        mocks
            .posts
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_post(id, Uuid::new_v4()))));
        mocks
            .reports
            .expect_create()
            .withf(|insert| insert.report_type == "violence" && insert.status == "waiting")
            .returning(|_| Ok(InsertOutcome::Duplicate));

        let err = build(mocks)
            .report(
                Uuid::new_v4(),
                ReportModel {
                    post_id: Uuid::new_v4(),
                    report_type: ReportType::Violence,
                    description: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, SocialError::AlreadyReported));
    }

    #[tokio::test]
    async fn answer_rejects_options_from_other_posts() {
        let post_id = Uuid::new_v4();
        let mut mocks = Mocks::default();
        mocks.posts.expect_find_by_id().returning(|id| {
            let mut post = sample_post(id, Uuid::new_v4());
            post.post_type = PostType::Questionnaire.to_string();
            Ok(Some(post))
        });
        mocks.posts.expect_list_options().returning(|post_id| {
            Ok(vec![AnswerOptionEntity {
                id: Uuid::new_v4(),
                post_id,
                text: "Yes".to_string(),
                is_correct: true,
            }])
        });
        mocks.posts.expect_save_answer().never();

        let err = build(mocks)
            .answer(
                Uuid::new_v4(),
                AnswerModel {
                    post_id,
                    option_ids: vec![Uuid::new_v4()],
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, SocialError::ForeignOption));
    }

    #[tokio::test]
    async fn answer_is_saved_once() {
        let (user_id, post_id, option_id) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let mut mocks = Mocks::default();
        mocks.posts.expect_find_by_id().returning(|id| {
            let mut post = sample_post(id, Uuid::new_v4());
            post.post_type = PostType::Questionnaire.to_string();
            Ok(Some(post))
        });
        mocks.posts.expect_list_options().returning(move |post_id| {
            Ok(vec![AnswerOptionEntity {
                id: option_id,
                post_id,
                text: "Yes".to_string(),
                is_correct: true,
            }])
        });
        mocks
            .posts
            .expect_save_answer()
            .withf(move |insert| insert.option_ids == vec![option_id])
            .returning(|insert| {
                Ok(InsertOutcome::Inserted(PostAnswerEntity {
                    user_id: insert.user_id,
                    post_id: insert.post_id,
                    option_ids: insert.option_ids,
                    created_at: Utc::now(),
                }))
            });

        let answer = build(mocks)
            .answer(
                user_id,
                AnswerModel {
                    post_id,
                    option_ids: vec![option_id, option_id],
                },
            )
            .await
            .unwrap();

        assert_eq!(answer.option_ids, vec![option_id]);
    }

    #[tokio::test]
    async fn profile_reports_relationship() {
        let (viewer_id, creator_id) = (Uuid::new_v4(), Uuid::new_v4());
        let mut mocks = Mocks::default();
        mocks
            .users
            .expect_find_by_id()
            .with(eq(creator_id))
            .returning(|id| Ok(Some(sample_creator(id, 10))));
        mocks
            .social
            .expect_follow_counts()
            .returning(|_| Ok((12, 3)));
        mocks
            .social
            .expect_is_following()
            .with(eq(viewer_id), eq(creator_id))
            .returning(|_, _| Ok(true));
        mocks.social.expect_is_blocked().returning(|_, _| Ok(false));

        let profile = build(mocks).profile(viewer_id, creator_id).await.unwrap();

        assert!(profile.is_creator);
        assert!(profile.is_following);
        assert_eq!(profile.followers_count, 12);
        assert_eq!(profile.following_count, 3);
    }
}
