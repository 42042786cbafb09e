use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    #[default]
    Waiting,
    Ignored,
    BlockedPost,
    BlockedUser,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Waiting => "waiting",
            ReportStatus::Ignored => "ignored",
            ReportStatus::BlockedPost => "blocked_post",
            ReportStatus::BlockedUser => "blocked_user",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "waiting" => Some(ReportStatus::Waiting),
            "ignored" => Some(ReportStatus::Ignored),
            "blocked_post" => Some(ReportStatus::BlockedPost),
            "blocked_user" => Some(ReportStatus::BlockedUser),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, ReportStatus::Waiting)
    }
}

impl Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
