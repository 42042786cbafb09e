use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Who may open a conversation with a creator.
#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CanChat {
    #[default]
    Everyone,
    Nobody,
    Subscribers,
    Donations,
}

impl CanChat {
    pub fn as_str(&self) -> &'static str {
        match self {
            CanChat::Everyone => "everyone",
            CanChat::Nobody => "nobody",
            CanChat::Subscribers => "subscribers",
            CanChat::Donations => "donations",
        }
    }

    pub fn from_str(value: &str) -> Self {
        match value {
            "nobody" => CanChat::Nobody,
            "subscribers" => CanChat::Subscribers,
            "donations" => CanChat::Donations,
            _ => CanChat::Everyone,
        }
    }
}

impl Display for CanChat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
