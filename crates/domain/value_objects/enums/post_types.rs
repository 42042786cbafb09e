use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PostType {
    PhotoVideo,
    Music,
    File,
    Questionnaire,
}

impl PostType {
    pub const ALL: [PostType; 4] = [
        PostType::PhotoVideo,
        PostType::Music,
        PostType::File,
        PostType::Questionnaire,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PostType::PhotoVideo => "photo_video",
            PostType::Music => "music",
            PostType::File => "file",
            PostType::Questionnaire => "questionnaire",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PostType::PhotoVideo => "Photo / Video",
            PostType::Music => "Music",
            PostType::File => "File",
            PostType::Questionnaire => "Questionnaire",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "photo_video" => Some(PostType::PhotoVideo),
            "music" => Some(PostType::Music),
            "file" => Some(PostType::File),
            "questionnaire" => Some(PostType::Questionnaire),
            _ => None,
        }
    }
}

impl Display for PostType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
