//! Template store: sanitized create-payloads kept apart from the
//! catalog so they never leak into listings.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use models::payload::ServicePayload;
use models::template::TemplateRecord;

use crate::errors::{FieldErrors, ServiceError};
use crate::storage::DocumentStore;

#[derive(Clone)]
pub struct TemplateStore {
    store: Arc<DocumentStore<Uuid, TemplateRecord>>,
}

impl TemplateStore {
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let store = DocumentStore::open(path).await?;
        Ok(Arc::new(Self { store }))
    }

    /// Persist a sanitized copy of `payload` under `name`.
    #[instrument(skip(self, payload))]
    pub async fn save(&self, name: &str, payload: &ServicePayload) -> Result<TemplateRecord, ServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::Validation(FieldErrors::single(
                "name",
                "template name is required",
            )));
        }
        let record = TemplateRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            payload: payload.sanitized_for_template(),
            created_at: Utc::now(),
        };
        self.store.insert(record.id, record.clone()).await?;
        info!(id = %record.id, name = %record.name, "template_saved");
        Ok(record)
    }

    /// All templates, newest first.
    pub async fn list(&self) -> Vec<TemplateRecord> {
        let mut items: Vec<TemplateRecord> =
            self.store.read(|map| map.values().cloned().collect()).await;
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        items
    }

    pub async fn get(&self, id: Uuid) -> Result<TemplateRecord, ServiceError> {
        self.store.get(&id).await.ok_or_else(|| ServiceError::not_found("template"))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        self.store.remove(&id).await
    }
}
