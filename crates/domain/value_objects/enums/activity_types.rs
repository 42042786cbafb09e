use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Donation,
    Commented,
    Replied,
    Followed,
    Subscribed,
    LikedPost,
    LikedComment,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Donation => "donation",
            ActivityType::Commented => "commented",
            ActivityType::Replied => "replied",
            ActivityType::Followed => "followed",
            ActivityType::Subscribed => "subscribed",
            ActivityType::LikedPost => "liked_post",
            ActivityType::LikedComment => "liked_comment",
        }
    }
}

impl Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
