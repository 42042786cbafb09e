use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    Visa,
    Uzcard,
    Humo,
    Mastercard,
}

impl CardType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardType::Visa => "visa",
            CardType::Uzcard => "uzcard",
            CardType::Humo => "humo",
            CardType::Mastercard => "mastercard",
        }
    }

    /// Parses the processing-system code sent by the gateway (`ps`), case-insensitively.
    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "visa" => Some(CardType::Visa),
            "uzcard" => Some(CardType::Uzcard),
            "humo" => Some(CardType::Humo),
            "mastercard" => Some(CardType::Mastercard),
            _ => None,
        }
    }
}

impl Display for CardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
