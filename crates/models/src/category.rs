use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Fixed set of service categories offered by the firm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Consulting,
    Audit,
    Assessment,
    Compliance,
    Training,
    Research,
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Consulting,
        Category::Audit,
        Category::Assessment,
        Category::Compliance,
        Category::Training,
        Category::Research,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Consulting => "consulting",
            Category::Audit => "audit",
            Category::Assessment => "assessment",
            Category::Compliance => "compliance",
            Category::Training => "training",
            Category::Research => "research",
            Category::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Result<Category, ModelError> {
        let lower = s.trim().to_ascii_lowercase();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| ModelError::Validation(format!("unknown category '{s}'")))
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Other
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Social platforms accepted in `socialLinks` entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialPlatform {
    Facebook,
    Twitter,
    Linkedin,
    Instagram,
    Youtube,
    Other,
}

impl SocialPlatform {
    pub const ALL: [SocialPlatform; 6] = [
        SocialPlatform::Facebook,
        SocialPlatform::Twitter,
        SocialPlatform::Linkedin,
        SocialPlatform::Instagram,
        SocialPlatform::Youtube,
        SocialPlatform::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SocialPlatform::Facebook => "facebook",
            SocialPlatform::Twitter => "twitter",
            SocialPlatform::Linkedin => "linkedin",
            SocialPlatform::Instagram => "instagram",
            SocialPlatform::Youtube => "youtube",
            SocialPlatform::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Result<SocialPlatform, ModelError> {
        let lower = s.trim().to_ascii_lowercase();
        SocialPlatform::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == lower)
            .ok_or_else(|| ModelError::Validation(format!("unknown platform '{s}'")))
    }
}
