use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{answer_options::AnswerOptionEntity, posts::PostEntity};

use super::pagination::Page;

/// Questionnaire option supplied when a post is created.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AnswerOptionDraft {
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

/// Listing filter over published posts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostListFilter {
    pub category_id: Option<Uuid>,
    pub creator_id: Option<Uuid>,
    pub creator_ids: Option<Vec<Uuid>>,
    pub post_type: Option<String>,
    pub page: Page,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PostDto {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub category_id: Option<Uuid>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub post_type: String,
    pub file_ids: Vec<Uuid>,
    pub is_premium: bool,
    pub subscription_plan_id: Option<Uuid>,
    pub like_count: i32,
    pub comment_count: i32,
    pub can_view: bool,
    pub is_liked: bool,
    pub is_saved: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<AnswerOptionEntity>,
    pub publication_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl PostDto {
    /// Files and questionnaire options are withheld when the viewer may not see the post.
    pub fn build(
        post: PostEntity,
        can_view: bool,
        is_liked: bool,
        is_saved: bool,
        options: Vec<AnswerOptionEntity>,
    ) -> Self {
        Self {
            id: post.id,
            creator_id: post.creator_id,
            category_id: post.category_id,
            title: post.title,
            description: post.description,
            post_type: post.post_type,
            file_ids: if can_view { post.file_ids } else { Vec::new() },
            is_premium: post.is_premium,
            subscription_plan_id: post.subscription_plan_id,
            like_count: post.like_count,
            comment_count: post.comment_count,
            can_view,
            is_liked,
            is_saved,
            options: if can_view { options } else { Vec::new() },
            publication_time: post.publication_time,
            created_at: post.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post() -> PostEntity {
        let now = Utc::now();
        PostEntity {
            id: Uuid::new_v4(),
            creator_id: Uuid::new_v4(),
            category_id: None,
            title: Some("Behind the scenes".to_string()),
            description: None,
            post_type: "photo_video".to_string(),
            file_ids: vec![Uuid::new_v4()],
            is_premium: true,
            subscription_plan_id: None,
            is_posted: true,
            publication_time: None,
            is_blocked: false,
            is_deleted: false,
            like_count: 3,
            comment_count: 1,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn hidden_post_has_no_files() {
        let dto = PostDto::build(post(), false, false, false, Vec::new());

        assert!(!dto.can_view);
        assert!(dto.file_ids.is_empty());
        assert_eq!(dto.title.as_deref(), Some("Behind the scenes"));
    }

    #[test]
    fn visible_post_keeps_files() {
        let dto = PostDto::build(post(), true, true, false, Vec::new());

        assert_eq!(dto.file_ids.len(), 1);
        assert!(dto.is_liked);
    }
}
