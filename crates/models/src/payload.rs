//! Incoming payload shapes.
//!
//! Every field is optional so the validation gate can distinguish
//! "absent" from "present but invalid" and report a full field-path
//! error map instead of failing at deserialization. Unknown fields are
//! collected into `extra` and carried through unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::record::ContactInfo;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeatureInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessStepInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub order: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectTypeInput {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BenefitInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialLinkInput {
    pub platform: Option<String>,
    pub url: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceImageInput {
    pub url: Option<String>,
    pub alt_text: Option<String>,
    pub is_primary: Option<bool>,
}

/// Candidate record payload as received from a client, before the
/// validation gate has normalized it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServicePayload {
    pub title: Option<String>,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub full_description: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub icon: Option<String>,
    pub price_note: Option<String>,
    pub hero_text: Option<String>,
    pub calendly_link: Option<String>,
    pub features: Option<Vec<FeatureInput>>,
    pub process_steps: Option<Vec<ProcessStepInput>>,
    pub project_types: Option<Vec<ProjectTypeInput>>,
    pub benefits: Option<Vec<BenefitInput>>,
    pub social_links: Option<Vec<SocialLinkInput>>,
    pub images: Option<Vec<ServiceImageInput>>,
    pub contact_info: Option<ContactInfo>,
    pub is_featured: Option<bool>,
    pub is_active: Option<bool>,
    pub is_published: Option<bool>,
    /// Reason recorded on the version snapshot for an update.
    pub change_reason: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ServicePayload {
    /// True when no recognized field is set; used by auto-save to
    /// decide there is nothing worth persisting.
    pub fn has_title(&self) -> bool {
        self.title.as_deref().map(|t| !t.trim().is_empty()).unwrap_or(false)
    }

    /// Sanitized copy for template storage: lifecycle flags and the
    /// change annotation are stripped, content fields are kept.
    pub fn sanitized_for_template(&self) -> ServicePayload {
        let mut copy = self.clone();
        copy.is_published = None;
        copy.is_featured = None;
        copy.is_active = None;
        copy.change_reason = None;
        copy
    }
}
