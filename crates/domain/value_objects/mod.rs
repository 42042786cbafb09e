pub mod analytics;
pub mod chat;
pub mod enums;
pub mod follower_stats;
pub mod insert_outcome;
pub mod pagination;
pub mod payment_split;
pub mod permissions;
pub mod phone;
pub mod posts;
pub mod subscription_periods;
pub mod users;
pub mod visibility;
