use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    Copyright,
    Extremism,
    Discrimination,
    Pornography,
    Violence,
    DrugsAlcohol,
    Misleading,
    PersonalData,
    Other,
}

impl ReportType {
    pub const ALL: [ReportType; 9] = [
        ReportType::Copyright,
        ReportType::Extremism,
        ReportType::Discrimination,
        ReportType::Pornography,
        ReportType::Violence,
        ReportType::DrugsAlcohol,
        ReportType::Misleading,
        ReportType::PersonalData,
        ReportType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Copyright => "copyright",
            ReportType::Extremism => "extremism",
            ReportType::Discrimination => "discrimination",
            ReportType::Pornography => "pornography",
            ReportType::Violence => "violence",
            ReportType::DrugsAlcohol => "drugs_alcohol",
            ReportType::Misleading => "misleading",
            ReportType::PersonalData => "personal_data",
            ReportType::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReportType::Copyright => "Content infringing third-party copyright",
            ReportType::Extremism => "Extremist or terrorist material",
            ReportType::Discrimination => "Discrimination on racial, gender, religious or other grounds",
            ReportType::Pornography => "Pornographic or adult content",
            ReportType::Violence => "Aggressive or violent content",
            ReportType::DrugsAlcohol => "Promotion of drugs or alcohol",
            ReportType::Misleading => "Misleading users (fraud, spam, fake fundraising)",
            ReportType::PersonalData => "Third-party personal data without consent",
            ReportType::Other => "Other",
        }
    }
}

impl Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
