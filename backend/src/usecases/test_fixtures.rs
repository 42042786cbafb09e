use chrono::{Duration, Utc};
use crates::domain::{
    entities::{
        cards::CardEntity,
        chat::{ChatMessageEntity, ChatRoomEntity},
        comments::CommentEntity,
        fundraisings::FundraisingEntity,
        posts::PostEntity,
        subscription_plans::PlanEntity,
        subscriptions::SubscriptionEntity,
        transactions::TransactionEntity,
        users::UserEntity,
    },
    value_objects::enums::{
        transaction_statuses::TransactionStatus, transaction_types::TransactionType,
    },
};
use uuid::Uuid;

pub fn sample_user(id: Uuid) -> UserEntity {
    let now = Utc::now();
    UserEntity {
        id,
        phone_number: "998901234567".to_string(),
        username: Some(format!("user_{}", &id.simple().to_string()[..8])),
        full_name: Some("Test User".to_string()),
        creator_description: None,
        profile_photo_id: None,
        background_photo_id: None,
        category_id: None,
        is_creator: false,
        is_admin: false,
        is_active: true,
        is_deleted: false,
        sms_verified: true,
        is_blocked_by_admin: false,
        temp_phone_number: None,
        temp_username: None,
        password_hash: None,
        pinfl: None,
        multibank_account: None,
        multibank_verified: false,
        sapi_share: 10,
        minimum_message_donation: 0,
        last_login: None,
        created_at: now,
        updated_at: now,
    }
}

/// Creator with a verified payout account.
pub fn sample_creator(id: Uuid, sapi_share: i32) -> UserEntity {
    UserEntity {
        is_creator: true,
        pinfl: Some("30101900000000".to_string()),
        multibank_account: Some("20208000900000000001".to_string()),
        multibank_verified: true,
        sapi_share,
        ..sample_user(id)
    }
}

pub fn sample_card(id: Uuid, user_id: Uuid) -> CardEntity {
    let now = Utc::now();
    CardEntity {
        id,
        user_id,
        number: "8600123412341234".to_string(),
        expiration: "12/29".to_string(),
        card_owner: Some("TEST USER".to_string()),
        card_type: Some("uzcard".to_string()),
        token: Some("card-token".to_string()),
        is_main: true,
        is_active: true,
        is_deleted: false,
        created_at: now,
        updated_at: now,
    }
}

pub fn sample_transaction(
    id: Uuid,
    payer_id: Uuid,
    creator_id: Uuid,
    kind: TransactionType,
) -> TransactionEntity {
    let now = Utc::now();
    TransactionEntity {
        id,
        payer_id,
        creator_id,
        transaction_type: kind.to_string(),
        status: TransactionStatus::New.to_string(),
        amount: 10_000,
        sapi_amount: 1_000,
        creator_amount: 8_800,
        card_token: "card-token".to_string(),
        store_id: "store-1".to_string(),
        fundraising_id: None,
        external_transaction_id: None,
        otp_hash: None,
        gateway_response: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn sample_plan(id: Uuid, creator_id: Uuid, price: i64) -> PlanEntity {
    let now = Utc::now();
    PlanEntity {
        id,
        creator_id,
        name: "Supporter".to_string(),
        description: None,
        price,
        duration_days: 30,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn sample_subscription(subscriber_id: Uuid, creator_id: Uuid, plan_id: Uuid) -> SubscriptionEntity {
    let now = Utc::now();
    SubscriptionEntity {
        id: Uuid::new_v4(),
        subscriber_id,
        creator_id,
        plan_id,
        start_date: now - Duration::days(1),
        end_date: now + Duration::days(29),
        is_active: true,
        payment_reference: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn sample_fundraising(id: Uuid, creator_id: Uuid) -> FundraisingEntity {
    let now = Utc::now();
    FundraisingEntity {
        id,
        creator_id,
        title: "New camera".to_string(),
        description: None,
        goal: 1_000_000,
        current_amount: 0,
        minimum_donation: 1_000,
        deadline: Some(now + Duration::days(7)),
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn sample_post(id: Uuid, creator_id: Uuid) -> PostEntity {
    let now = Utc::now();
    PostEntity {
        id,
        creator_id,
        category_id: None,
        title: Some("Hello".to_string()),
        description: None,
        post_type: "photo_video".to_string(),
        file_ids: vec![Uuid::new_v4()],
        is_premium: false,
        subscription_plan_id: None,
        is_posted: true,
        publication_time: None,
        is_blocked: false,
        is_deleted: false,
        like_count: 0,
        comment_count: 0,
        created_at: now,
        updated_at: now,
    }
}

pub fn sample_comment(id: Uuid, post_id: Uuid, user_id: Uuid) -> CommentEntity {
    let now = Utc::now();
    CommentEntity {
        id,
        post_id,
        user_id,
        parent_id: None,
        text: "nice".to_string(),
        like_count: 0,
        created_at: now,
        updated_at: now,
    }
}

pub fn sample_room(id: Uuid, creator_id: Uuid, subscriber_id: Uuid) -> ChatRoomEntity {
    let now = Utc::now();
    ChatRoomEntity {
        id,
        creator_id,
        subscriber_id,
        created_at: now,
        updated_at: now,
    }
}

pub fn sample_message(room_id: Uuid, sender_id: Uuid, content: &str) -> ChatMessageEntity {
    ChatMessageEntity {
        id: Uuid::new_v4(),
        room_id,
        sender_id,
        content: Some(content.to_string()),
        file_id: None,
        is_read: false,
        created_at: Utc::now(),
    }
}
