use std::{collections::BTreeMap, fmt::Display};

use serde::{Deserialize, Serialize};

/// Back-office area a permission applies to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Section {
    Statistics,
    Notifications,
    Reports,
    Creators,
    Chats,
    Admins,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Statistics,
        Section::Notifications,
        Section::Reports,
        Section::Creators,
        Section::Chats,
        Section::Admins,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Statistics => "STATISTICS",
            Section::Notifications => "NOTIFICATIONS",
            Section::Reports => "REPORTS",
            Section::Creators => "CREATORS",
            Section::Chats => "CHATS",
            Section::Admins => "ADMINS",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Access {
    View,
    Modify,
}

impl Access {
    pub fn as_str(&self) -> &'static str {
        match self {
            Access::View => "VIEW",
            Access::Modify => "MODIFY",
        }
    }
}

/// A stored grant such as `VIEW_REPORTS` or `MODIFY_CREATORS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Permission {
    pub access: Access,
    pub section: Section,
}

impl Permission {
    pub fn new(access: Access, section: Section) -> Self {
        Self { access, section }
    }

    pub fn code(&self) -> String {
        format!("{}_{}", self.access.as_str(), self.section.as_str())
    }

    pub fn parse(code: &str) -> Option<Self> {
        let (access, section) = code.split_once('_')?;
        let access = match access {
            "VIEW" => Access::View,
            "MODIFY" => Access::Modify,
            _ => return None,
        };
        let section = Section::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == section)?;
        Some(Self { access, section })
    }

    /// Every grant that exists, in display order.
    pub fn catalogue() -> Vec<Permission> {
        Section::ALL
            .into_iter()
            .flat_map(|section| {
                [Access::View, Access::Modify]
                    .into_iter()
                    .map(move |access| Permission { access, section })
            })
            .collect()
    }
}

impl Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.access.as_str(), self.section.as_str())
    }
}

/// `MODIFY_X` implies `VIEW_X`.
pub fn has_permission(granted: &[Permission], section: Section, access: Access) -> bool {
    granted.iter().any(|permission| {
        permission.section == section
            && match access {
                Access::View => true,
                Access::Modify => permission.access == Access::Modify,
            }
    })
}

/// Parses stored permission codes, silently skipping unknown ones.
pub fn parse_codes(codes: &[String]) -> Vec<Permission> {
    codes.iter().filter_map(|code| Permission::parse(code)).collect()
}

/// `{"REPORTS": ["VIEW", "MODIFY"], ...}` as returned on admin login.
pub fn group_by_section(granted: &[Permission]) -> BTreeMap<String, Vec<String>> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for permission in granted {
        let entry = grouped
            .entry(permission.section.as_str().to_string())
            .or_default();
        let access = permission.access.as_str().to_string();
        if !entry.contains(&access) {
            entry.push(access);
        }
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_formats_codes() {
        let permission = Permission::parse("MODIFY_CREATORS").unwrap();

        assert_eq!(permission.access, Access::Modify);
        assert_eq!(permission.section, Section::Creators);
        assert_eq!(permission.code(), "MODIFY_CREATORS");
        assert!(Permission::parse("DELETE_CREATORS").is_none());
        assert!(Permission::parse("VIEW_UNKNOWN").is_none());
    }

    #[test]
    fn modify_implies_view() {
        let granted = vec![Permission::new(Access::Modify, Section::Reports)];

        assert!(has_permission(&granted, Section::Reports, Access::View));
        assert!(has_permission(&granted, Section::Reports, Access::Modify));
        assert!(!has_permission(&granted, Section::Admins, Access::View));
    }

    #[test]
    fn view_does_not_imply_modify() {
        let granted = vec![Permission::new(Access::View, Section::Statistics)];

        assert!(has_permission(&granted, Section::Statistics, Access::View));
        assert!(!has_permission(&granted, Section::Statistics, Access::Modify));
    }

    #[test]
    fn groups_by_section() {
        let granted = parse_codes(&[
            "VIEW_REPORTS".to_string(),
            "MODIFY_REPORTS".to_string(),
            "VIEW_CHATS".to_string(),
            "bogus".to_string(),
        ]);
        let grouped = group_by_section(&granted);

        assert_eq!(grouped["REPORTS"], vec!["VIEW", "MODIFY"]);
        assert_eq!(grouped["CHATS"], vec!["VIEW"]);
        assert_eq!(grouped.len(), 2);
    }

    #[test]
    fn catalogue_covers_every_section_twice() {
        assert_eq!(Permission::catalogue().len(), Section::ALL.len() * 2);
    }
}
