//! Service lifecycle state machine.
//!
//! The source of truth is a single tagged state; the legacy boolean
//! flags (`isDraft`, `isPublished`, `isDeleted`) are a read-only
//! projection computed at serialization time. Contradictory flag
//! combinations are unrepresentable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum LifecycleState {
    Draft,
    Published,
    Archived {
        deleted_at: DateTime<Utc>,
        deleted_by: Uuid,
    },
}

impl LifecycleState {
    pub fn is_draft(&self) -> bool {
        matches!(self, LifecycleState::Draft)
    }

    pub fn is_published(&self) -> bool {
        matches!(self, LifecycleState::Published)
    }

    pub fn is_archived(&self) -> bool {
        matches!(self, LifecycleState::Archived { .. })
    }

    /// Draft -> Published. Publishing a published record is a no-op;
    /// an archived record cannot be published.
    pub fn publish(&self) -> Result<LifecycleState, ModelError> {
        match self {
            LifecycleState::Draft | LifecycleState::Published => Ok(LifecycleState::Published),
            LifecycleState::Archived { .. } => {
                Err(ModelError::Transition("cannot publish an archived service".into()))
            }
        }
    }

    /// Published -> Draft. Unpublishing a draft is a no-op.
    pub fn unpublish(&self) -> Result<LifecycleState, ModelError> {
        match self {
            LifecycleState::Draft | LifecycleState::Published => Ok(LifecycleState::Draft),
            LifecycleState::Archived { .. } => {
                Err(ModelError::Transition("cannot unpublish an archived service".into()))
            }
        }
    }

    /// Any -> Archived. Archiving an archived record keeps the original
    /// deletion stamp (idempotent).
    pub fn archive(&self, at: DateTime<Utc>, by: Uuid) -> LifecycleState {
        match self {
            LifecycleState::Archived { .. } => self.clone(),
            _ => LifecycleState::Archived { deleted_at: at, deleted_by: by },
        }
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        match self {
            LifecycleState::Archived { deleted_at, .. } => Some(*deleted_at),
            _ => None,
        }
    }

    pub fn deleted_by(&self) -> Option<Uuid> {
        match self {
            LifecycleState::Archived { deleted_by, .. } => Some(*deleted_by),
            _ => None,
        }
    }
}

impl Default for LifecycleState {
    fn default() -> Self {
        LifecycleState::Draft
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_publish_unpublish_round_trip() {
        let s = LifecycleState::Draft;
        let published = s.publish().unwrap();
        assert!(published.is_published());
        let back = published.unpublish().unwrap();
        assert!(back.is_draft());
    }

    #[test]
    fn archived_rejects_publish() {
        let archived = LifecycleState::Draft.archive(Utc::now(), Uuid::new_v4());
        assert!(archived.publish().is_err());
        assert!(archived.unpublish().is_err());
    }

    #[test]
    fn archive_is_idempotent() {
        let by = Uuid::new_v4();
        let first = LifecycleState::Published.archive(Utc::now(), by);
        let stamp = first.deleted_at().unwrap();
        let second = first.archive(Utc::now(), Uuid::new_v4());
        assert_eq!(second.deleted_at().unwrap(), stamp);
        assert_eq!(second.deleted_by().unwrap(), by);
    }
}
