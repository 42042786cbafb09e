use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Donation,
    Fundraising,
    Subscription,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Donation => "donation",
            TransactionType::Fundraising => "fundraising",
            TransactionType::Subscription => "subscription",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "donation" => Some(TransactionType::Donation),
            "fundraising" => Some(TransactionType::Fundraising),
            "subscription" => Some(TransactionType::Subscription),
            _ => None,
        }
    }

    /// Text placed in the `details` field of both split legs.
    pub fn split_details(&self) -> &'static str {
        match self {
            TransactionType::Donation => "Donation payment",
            TransactionType::Fundraising => "Fundraising payment",
            TransactionType::Subscription => "Subscription payment",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
