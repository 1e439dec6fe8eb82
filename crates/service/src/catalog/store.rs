//! Service catalog store: create, read, update, soft/hard delete.
//!
//! Updates are version-tracked: the pre-update state is snapshotted
//! into the record's append-only history before the patch is applied,
//! and snapshot, patch, slug recompute and revision bump all happen
//! inside one store mutation, so they land together-or-not-at-all.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use models::lifecycle::LifecycleState;
use models::payload::ServicePayload;
use models::record::{ServiceRecord, VersionSnapshot, DEFAULT_CHANGE_REASON, DEFAULT_ICON};
use models::record::default_hero_text;
use models::slug::slugify;
use models::Category;

use crate::auth::domain::Actor;
use crate::errors::{FieldErrors, ServiceError};
use crate::storage::DocumentStore;
use crate::validation::{validate, NormalizedPayload, ValidationMode};

#[derive(Clone)]
pub struct ServiceCatalog {
    store: Arc<DocumentStore<Uuid, ServiceRecord>>,
}

impl ServiceCatalog {
    /// Open the catalog backed by a JSON file at `path`.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let store = DocumentStore::open(path).await?;
        Ok(Arc::new(Self { store }))
    }

    /// Create a fully validated record. Fails with a field-error map on
    /// validation problems and with `Conflict` on a duplicate title.
    #[instrument(skip(self, payload), fields(actor = %actor.id))]
    pub async fn create(&self, payload: &ServicePayload, actor: &Actor) -> Result<ServiceRecord, ServiceError> {
        let normalized = validate(payload, ValidationMode::Create).map_err(ServiceError::Validation)?;
        let lifecycle = if normalized.is_published == Some(true) {
            LifecycleState::Published
        } else {
            LifecycleState::Draft
        };
        let record = build_record(normalized, lifecycle, actor);
        self.insert_new(record).await
    }

    /// Create an incomplete draft checkpoint. Only present fields are
    /// validated; everything else falls back to schema defaults. A
    /// title is still required as the minimal anchor (it drives the
    /// slug and duplicate detection).
    #[instrument(skip(self, payload), fields(actor = %actor.id))]
    pub async fn create_draft(&self, payload: &ServicePayload, actor: &Actor) -> Result<ServiceRecord, ServiceError> {
        let normalized =
            validate(payload, ValidationMode::PartialUpdate).map_err(ServiceError::Validation)?;
        if normalized.title.is_none() {
            return Err(ServiceError::Validation(FieldErrors::single(
                "title",
                "title is required to save a draft",
            )));
        }
        let record = build_record(normalized, LifecycleState::Draft, actor);
        self.insert_new(record).await
    }

    async fn insert_new(&self, record: ServiceRecord) -> Result<ServiceRecord, ServiceError> {
        let stored = self
            .store
            .mutate(move |map| {
                if title_taken(map.values(), &record.title, None) {
                    return Err(ServiceError::Conflict(format!(
                        "a service titled '{}' already exists",
                        record.title
                    )));
                }
                map.insert(record.id, record.clone());
                Ok(record)
            })
            .await?;
        info!(id = %stored.id, slug = %stored.slug, "service_created");
        Ok(stored)
    }

    /// Fetch by id, archived records included (audit reads).
    pub async fn get(&self, id: Uuid) -> Result<ServiceRecord, ServiceError> {
        self.store.get(&id).await.ok_or_else(|| ServiceError::not_found("service"))
    }

    /// Slug lookup among non-archived records. Slug uniqueness is
    /// advisory; when two titles collapse to the same slug the most
    /// recently updated record wins.
    pub async fn find_by_slug(&self, slug: &str) -> Option<ServiceRecord> {
        self.store
            .read(|map| {
                map.values()
                    .filter(|r| !r.lifecycle.is_archived() && r.slug == slug)
                    .max_by_key(|r| r.updated_at)
                    .cloned()
            })
            .await
    }

    /// Apply a partial update, recording a version snapshot first.
    ///
    /// Callers may pass the revision they read; if the record has moved
    /// since, the update is refused with `VersionConflict` instead of
    /// silently overwriting the other writer.
    #[instrument(skip(self, payload), fields(id = %id, actor = %actor.id))]
    pub async fn update(
        &self,
        id: Uuid,
        payload: &ServicePayload,
        actor: &Actor,
        expected_revision: Option<u64>,
    ) -> Result<ServiceRecord, ServiceError> {
        let normalized =
            validate(payload, ValidationMode::PartialUpdate).map_err(ServiceError::Validation)?;
        let actor = actor.clone();
        let updated = self
            .store
            .mutate(move |map| {
                let current = map.get(&id).ok_or_else(|| ServiceError::not_found("service"))?.clone();
                authorize_write(&actor, &current)?;
                if let Some(expected) = expected_revision {
                    if expected != current.revision {
                        return Err(ServiceError::VersionConflict {
                            expected,
                            actual: current.revision,
                        });
                    }
                }

                // All fallible checks happen before the snapshot is
                // appended so a refused update leaves no trace.
                let lifecycle = match normalized.is_published {
                    Some(true) => current.lifecycle.publish()?,
                    Some(false) => current.lifecycle.unpublish()?,
                    None => current.lifecycle.clone(),
                };
                if let Some(new_title) = normalized.title.as_deref() {
                    if new_title != current.title && title_taken(map.values(), new_title, Some(id)) {
                        return Err(ServiceError::Conflict(format!(
                            "a service titled '{new_title}' already exists"
                        )));
                    }
                }

                let now = Utc::now();
                let snapshot = VersionSnapshot {
                    version_number: current.version_history.len() as u32 + 1,
                    data: Box::new(current.snapshot_data()),
                    changed_by: actor.id,
                    changed_at: now,
                    change_reason: normalized
                        .change_reason
                        .clone()
                        .unwrap_or_else(|| DEFAULT_CHANGE_REASON.to_string()),
                };

                let mut next = current;
                next.version_history.push(snapshot);
                apply_patch(&mut next, &normalized);
                next.lifecycle = lifecycle;
                next.revision += 1;
                next.updated_at = now;
                next.last_updated_by = actor.id;
                map.insert(id, next.clone());
                Ok(next)
            })
            .await?;
        info!(id = %updated.id, revision = updated.revision, versions = updated.version_history.len(), "service_updated");
        Ok(updated)
    }

    /// Flag the record as deleted without erasing it. The version
    /// history is not touched and `is_active` is left as-is; archiving
    /// an archived record is a no-op success.
    #[instrument(skip(self), fields(id = %id, actor = %actor.id))]
    pub async fn soft_delete(&self, id: Uuid, actor: &Actor) -> Result<ServiceRecord, ServiceError> {
        let actor = actor.clone();
        let archived = self
            .store
            .mutate(move |map| {
                let current = map.get(&id).ok_or_else(|| ServiceError::not_found("service"))?.clone();
                authorize_write(&actor, &current)?;
                if current.lifecycle.is_archived() {
                    return Ok(current);
                }
                let now = Utc::now();
                let mut next = current;
                next.lifecycle = next.lifecycle.archive(now, actor.id);
                next.revision += 1;
                next.updated_at = now;
                next.last_updated_by = actor.id;
                map.insert(id, next.clone());
                Ok(next)
            })
            .await?;
        info!(id = %archived.id, "service_soft_deleted");
        Ok(archived)
    }

    /// Irreversibly remove the record and its entire version history.
    /// Admin only; bypasses version tracking by design.
    #[instrument(skip(self), fields(id = %id, actor = %actor.id))]
    pub async fn hard_delete(&self, id: Uuid, actor: &Actor) -> Result<bool, ServiceError> {
        if !actor.is_admin {
            return Err(ServiceError::NotAuthorized("hard delete requires admin".into()));
        }
        let existed = self.store.remove(&id).await?;
        if existed {
            info!(id = %id, "service_hard_deleted");
        }
        Ok(existed)
    }

    /// Every record in the store, archived ones included. Filtering is
    /// the query engine's job.
    pub async fn all(&self) -> Vec<ServiceRecord> {
        self.store.read(|map| map.values().cloned().collect()).await
    }
}

fn authorize_write(actor: &Actor, record: &ServiceRecord) -> Result<(), ServiceError> {
    if actor.is_admin || actor.id == record.created_by {
        Ok(())
    } else {
        Err(ServiceError::NotAuthorized("only the owner or an admin may modify this service".into()))
    }
}

fn title_taken<'a>(
    records: impl Iterator<Item = &'a ServiceRecord>,
    title: &str,
    exclude: Option<Uuid>,
) -> bool {
    records.filter(|r| !r.lifecycle.is_archived()).any(|r| {
        Some(r.id) != exclude && r.title == title
    })
}

/// Materialize a new record from a normalized payload, filling schema
/// defaults for anything a draft checkpoint left out.
fn build_record(normalized: NormalizedPayload, lifecycle: LifecycleState, actor: &Actor) -> ServiceRecord {
    let now = Utc::now();
    let title = normalized.title.unwrap_or_default();
    let slug = slugify(&title);
    let hero_text =
        normalized.hero_text.unwrap_or_else(|| default_hero_text(&title));
    ServiceRecord {
        id: Uuid::new_v4(),
        slug,
        title,
        short_description: normalized.short_description.unwrap_or_default(),
        description: normalized.description.unwrap_or_default(),
        full_description: normalized.full_description.unwrap_or_default(),
        category: normalized.category.unwrap_or(Category::Other),
        price: normalized.price.unwrap_or(0.0),
        icon: normalized.icon.unwrap_or_else(|| DEFAULT_ICON.to_string()),
        price_note: normalized.price_note,
        hero_text,
        calendly_link: normalized.calendly_link,
        features: normalized.features.unwrap_or_default(),
        process_steps: normalized.process_steps.unwrap_or_default(),
        project_types: normalized.project_types.unwrap_or_default(),
        benefits: normalized.benefits.unwrap_or_default(),
        social_links: normalized.social_links.unwrap_or_default(),
        images: normalized.images.unwrap_or_default(),
        contact_info: normalized.contact_info.unwrap_or_default(),
        is_featured: normalized.is_featured.unwrap_or(false),
        is_active: normalized.is_active.unwrap_or(true),
        lifecycle,
        created_by: actor.id,
        last_updated_by: actor.id,
        version_history: Vec::new(),
        revision: 0,
        created_at: now,
        updated_at: now,
        extra: normalized.extra,
    }
}

fn apply_patch(record: &mut ServiceRecord, patch: &NormalizedPayload) {
    if let Some(title) = &patch.title {
        if *title != record.title {
            record.slug = slugify(title);
        }
        record.title = title.clone();
    }
    if let Some(v) = &patch.short_description {
        record.short_description = v.clone();
    }
    if let Some(v) = &patch.description {
        record.description = v.clone();
    }
    if let Some(v) = &patch.full_description {
        record.full_description = v.clone();
    }
    if let Some(v) = patch.category {
        record.category = v;
    }
    if let Some(v) = patch.price {
        record.price = v;
    }
    if let Some(v) = &patch.icon {
        record.icon = v.clone();
    }
    if let Some(v) = &patch.price_note {
        record.price_note = Some(v.clone());
    }
    if let Some(v) = &patch.hero_text {
        record.hero_text = v.clone();
    }
    if let Some(v) = &patch.calendly_link {
        record.calendly_link = Some(v.clone());
    }
    if let Some(v) = &patch.features {
        record.features = v.clone();
    }
    if let Some(v) = &patch.process_steps {
        record.process_steps = v.clone();
    }
    if let Some(v) = &patch.project_types {
        record.project_types = v.clone();
    }
    if let Some(v) = &patch.benefits {
        record.benefits = v.clone();
    }
    if let Some(v) = &patch.social_links {
        record.social_links = v.clone();
    }
    if let Some(v) = &patch.images {
        record.images = v.clone();
    }
    if let Some(v) = &patch.contact_info {
        record.contact_info = v.clone();
    }
    if let Some(v) = patch.is_featured {
        record.is_featured = v;
    }
    if let Some(v) = patch.is_active {
        record.is_active = v;
    }
    for (k, v) in &patch.extra {
        record.extra.insert(k.clone(), v.clone());
    }
}
