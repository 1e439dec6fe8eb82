//! The Service record: root entity of the catalog, with its embedded
//! sub-records and append-only version history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::category::{Category, SocialPlatform};
use crate::lifecycle::LifecycleState;

/// Hard limits enforced by the validation gate.
pub const TITLE_MAX_LEN: usize = 100;
pub const SHORT_DESCRIPTION_MAX_LEN: usize = 200;

/// Glyph used when a payload does not name an icon.
pub const DEFAULT_ICON: &str = "briefcase";

/// Hero text used when a payload does not provide one.
pub fn default_hero_text(title: &str) -> String {
    format!("Professional {title} services for your business")
}

/// Reason recorded on a snapshot when the caller gives none.
pub const DEFAULT_CHANGE_REASON: &str = "General update";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessStep {
    pub title: String,
    pub description: String,
    pub order: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectType {
    pub name: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Benefit {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    pub platform: SocialPlatform,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceImage {
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

impl ContactInfo {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.phone.is_none() && self.website.is_none()
    }
}

/// One immutable entry of a record's version history.
///
/// `data` is the full pre-update record with its own `version_history`
/// emptied; numbering is contiguous from 1 and strictly increasing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSnapshot {
    pub version_number: u32,
    pub data: Box<ServiceRecord>,
    pub changed_by: Uuid,
    pub changed_at: DateTime<Utc>,
    pub change_reason: String,
}

impl VersionSnapshot {
    /// Wire representation: the embedded record goes through the same
    /// boolean lifecycle projection as live records.
    pub fn to_wire(&self) -> Value {
        let mut value = serde_json::to_value(self).unwrap_or(Value::Null);
        if let Value::Object(ref mut map) = value {
            map.insert("data".into(), self.data.to_wire());
        }
        value
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub short_description: String,
    pub description: String,
    pub full_description: String,
    pub category: Category,
    pub price: f64,
    pub icon: String,
    #[serde(default)]
    pub price_note: Option<String>,
    pub hero_text: String,
    #[serde(default)]
    pub calendly_link: Option<String>,
    #[serde(default)]
    pub features: Vec<Feature>,
    #[serde(default)]
    pub process_steps: Vec<ProcessStep>,
    #[serde(default)]
    pub project_types: Vec<ProjectType>,
    #[serde(default)]
    pub benefits: Vec<Benefit>,
    #[serde(default)]
    pub social_links: Vec<SocialLink>,
    #[serde(default)]
    pub images: Vec<ServiceImage>,
    #[serde(default)]
    pub contact_info: ContactInfo,
    pub is_featured: bool,
    pub is_active: bool,
    pub lifecycle: LifecycleState,
    pub created_by: Uuid,
    pub last_updated_by: Uuid,
    #[serde(default)]
    pub version_history: Vec<VersionSnapshot>,
    /// Optimistic-concurrency counter, bumped on every applied mutation.
    pub revision: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Unknown payload fields carried through unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ServiceRecord {
    /// Deep copy of the current state suitable for a version snapshot:
    /// everything except the history itself.
    pub fn snapshot_data(&self) -> ServiceRecord {
        let mut copy = self.clone();
        copy.version_history = Vec::new();
        copy
    }

    /// Wire representation for external clients: the tagged lifecycle
    /// state is replaced by the legacy boolean projection.
    pub fn to_wire(&self) -> Value {
        let mut value = serde_json::to_value(self).unwrap_or(Value::Null);
        if let Value::Object(ref mut map) = value {
            map.remove("lifecycle");
            map.insert("isDraft".into(), Value::Bool(self.lifecycle.is_draft()));
            map.insert("isPublished".into(), Value::Bool(self.lifecycle.is_published()));
            map.insert("isDeleted".into(), Value::Bool(self.lifecycle.is_archived()));
            map.insert(
                "deletedAt".into(),
                self.lifecycle
                    .deleted_at()
                    .map(|t| Value::String(t.to_rfc3339()))
                    .unwrap_or(Value::Null),
            );
            map.insert(
                "deletedBy".into(),
                self.lifecycle
                    .deleted_by()
                    .map(|u| Value::String(u.to_string()))
                    .unwrap_or(Value::Null),
            );
        }
        value
    }
}
