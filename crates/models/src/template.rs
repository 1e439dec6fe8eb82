use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::payload::ServicePayload;

/// A reusable create-payload saved from an existing service. Templates
/// live in their own store, carry no ownership or lifecycle state, and
/// are never returned by catalog listings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRecord {
    pub id: Uuid,
    pub name: String,
    pub payload: ServicePayload,
    pub created_at: DateTime<Utc>,
}
