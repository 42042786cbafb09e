use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    #[default]
    All,
    Creators,
    Users,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::All => "all",
            UserType::Creators => "creators",
            UserType::Users => "users",
        }
    }

    pub fn from_str(value: &str) -> Self {
        match value {
            "creators" => UserType::Creators,
            "users" => UserType::Users,
            _ => UserType::All,
        }
    }

    /// `Some(is_creator)` filter, `None` when every account matches.
    pub fn creator_filter(&self) -> Option<bool> {
        match self {
            UserType::All => None,
            UserType::Creators => Some(true),
            UserType::Users => Some(false),
        }
    }
}

impl Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
