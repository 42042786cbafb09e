//! Runs against a migrated Postgres: `DATABASE_URL=... cargo test -- --ignored`.

use std::sync::Arc;

use crates::{
    domain::{
        entities::users::InsertUserEntity,
        repositories::{social::SocialRepository, users::UserRepository},
        value_objects::insert_outcome::InsertOutcome,
    },
    infra::db::{
        postgres::postgres_connection::{PgPoolSquad, establish_connection},
        repositories::{social::SocialPostgres, users::UserPostgres},
    },
};
use uuid::Uuid;

fn test_pool() -> Arc<PgPoolSquad> {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    Arc::new(establish_connection(&database_url).expect("Failed to create test pool"))
}

async fn new_user(users: &UserPostgres) -> Uuid {
    let suffix = Uuid::new_v4().as_u128() % 1_000_000_000;
    users
        .create(InsertUserEntity {
            phone_number: format!("998{:09}", suffix),
            username: None,
            full_name: None,
            is_admin: false,
            is_active: true,
            password_hash: None,
        })
        .await
        .expect("Failed to create user")
        .id
}

#[tokio::test]
#[ignore] // Requires database setup
async fn unblocking_keeps_existing_follow() {
    let pool = test_pool();
    let users = UserPostgres::new(Arc::clone(&pool));
    let social = SocialPostgres::new(Arc::clone(&pool));
    let (follower, creator) = (new_user(&users).await, new_user(&users).await);

    social.follow(follower, creator).await.unwrap();
    let blocked = social.block(follower, creator).await.unwrap();
    assert!(matches!(blocked, InsertOutcome::Inserted(())));
    assert!(social.is_blocked_between(creator, follower).await.unwrap());
    assert!(social.is_following(follower, creator).await.unwrap());

    social.unblock(follower, creator).await.unwrap();

    assert!(!social.is_blocked(follower, creator).await.unwrap());
    assert!(social.is_following(follower, creator).await.unwrap());
}

#[tokio::test]
#[ignore] // Requires database setup
async fn second_block_is_reported_as_duplicate() {
    let pool = test_pool();
    let users = UserPostgres::new(Arc::clone(&pool));
    let social = SocialPostgres::new(Arc::clone(&pool));
    let (blocker, blocked) = (new_user(&users).await, new_user(&users).await);

    social.block(blocker, blocked).await.unwrap();
    let again = social.block(blocker, blocked).await.unwrap();

    assert!(matches!(again, InsertOutcome::Duplicate));
}
