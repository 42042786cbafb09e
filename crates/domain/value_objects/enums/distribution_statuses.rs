use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DistributionStatus {
    Draft,
    #[default]
    Waiting,
    Sent,
    Failed,
}

impl DistributionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistributionStatus::Draft => "draft",
            DistributionStatus::Waiting => "waiting",
            DistributionStatus::Sent => "sent",
            DistributionStatus::Failed => "failed",
        }
    }

    pub fn from_str(value: &str) -> Self {
        match value {
            "draft" => DistributionStatus::Draft,
            "sent" => DistributionStatus::Sent,
            "failed" => DistributionStatus::Failed,
            _ => DistributionStatus::Waiting,
        }
    }
}

impl Display for DistributionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
