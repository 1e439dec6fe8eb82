//! Admin workflow: the only caller that issues multi-step or
//! multi-record operations against the catalog. Drafts, auto-save,
//! duplication, templating, publish/unpublish, bulk actions and
//! version-history retrieval.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use models::payload::ServicePayload;
use models::record::ServiceRecord;
use models::template::TemplateRecord;
use models::VersionSnapshot;

use crate::auth::domain::Actor;
use crate::catalog::store::ServiceCatalog;
use crate::catalog::templates::TemplateStore;
use crate::errors::ServiceError;

/// Identifies one editing session's draft. Passed by value and handed
/// back updated, so two concurrent admin tabs each hold their own
/// handle and cannot clobber each other's draft reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftHandle {
    pub session_id: Uuid,
    #[serde(default)]
    pub draft_id: Option<Uuid>,
}

impl DraftHandle {
    pub fn new() -> Self {
        Self { session_id: Uuid::new_v4(), draft_id: None }
    }

    fn with_draft(self, draft_id: Uuid) -> Self {
        Self { draft_id: Some(draft_id), ..self }
    }
}

impl Default for DraftHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a periodic auto-save tick.
#[derive(Debug)]
pub enum AutoSaveOutcome {
    Saved { handle: DraftHandle, record: ServiceRecord },
    /// Nothing to save yet (payload has no title).
    Skipped,
}

/// Outcome of a bulk operation: best-effort, never all-or-nothing.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkOutcome {
    pub succeeded_ids: Vec<Uuid>,
    pub failed_ids: Vec<Uuid>,
    pub updated_count: usize,
}

/// Bounded number of `" (Copy N)"` suffixes tried when duplicating.
const MAX_COPY_SUFFIXES: u32 = 20;

pub struct AdminWorkflow {
    catalog: Arc<ServiceCatalog>,
    templates: Arc<TemplateStore>,
}

impl AdminWorkflow {
    pub fn new(catalog: Arc<ServiceCatalog>, templates: Arc<TemplateStore>) -> Self {
        Self { catalog, templates }
    }

    /// Checkpoint a possibly-incomplete payload as a draft. Creates a
    /// new draft when the handle carries no id, updates the existing
    /// draft otherwise.
    #[instrument(skip(self, payload), fields(session = %handle.session_id, actor = %actor.id))]
    pub async fn save_draft(
        &self,
        handle: DraftHandle,
        payload: &ServicePayload,
        actor: &Actor,
    ) -> Result<(DraftHandle, ServiceRecord), ServiceError> {
        match handle.draft_id {
            Some(id) => {
                let record = self.catalog.update(id, payload, actor, None).await?;
                Ok((handle, record))
            }
            None => {
                let record = self.catalog.create_draft(payload, actor).await?;
                Ok((handle.with_draft(record.id), record))
            }
        }
    }

    /// Periodic, silent variant of draft save. A payload without a
    /// title is treated as "nothing to save yet". Failures are logged
    /// here so the UI boundary can swallow them without losing the
    /// signal.
    pub async fn auto_save(
        &self,
        handle: DraftHandle,
        payload: &ServicePayload,
        actor: &Actor,
    ) -> Result<AutoSaveOutcome, ServiceError> {
        if !payload.has_title() {
            return Ok(AutoSaveOutcome::Skipped);
        }
        match self.save_draft(handle, payload, actor).await {
            Ok((handle, record)) => {
                info!(session = %handle.session_id, draft = %record.id, "auto_save_ok");
                Ok(AutoSaveOutcome::Saved { handle, record })
            }
            Err(e) => {
                warn!(session = %handle.session_id, error = %e, "auto_save_failed");
                Err(e)
            }
        }
    }

    /// Copy a record into a brand-new one: fresh id, fresh (empty)
    /// version history, disambiguated title, the caller as owner. The
    /// source record is left untouched.
    #[instrument(skip(self), fields(source = %id, actor = %actor.id))]
    pub async fn duplicate(&self, id: Uuid, actor: &Actor) -> Result<ServiceRecord, ServiceError> {
        let source = self.catalog.get(id).await?;
        let base = record_to_payload(&source);

        for attempt in 1..=MAX_COPY_SUFFIXES {
            let mut payload = base.clone();
            let title = if attempt == 1 {
                format!("{} (Copy)", source.title)
            } else {
                format!("{} (Copy {attempt})", source.title)
            };
            payload.title = Some(title);
            match self.catalog.create(&payload, actor).await {
                Ok(record) => {
                    info!(source = %source.id, copy = %record.id, "service_duplicated");
                    return Ok(record);
                }
                Err(ServiceError::Conflict(_)) => continue,
                Err(e) => return Err(e),
            }
        }
        Err(ServiceError::Conflict(format!(
            "could not find a free copy title for '{}'",
            source.title
        )))
    }

    /// Persist a sanitized copy of the record into the template store.
    #[instrument(skip(self), fields(source = %id, actor = %actor.id))]
    pub async fn save_as_template(
        &self,
        id: Uuid,
        name: &str,
        actor: &Actor,
    ) -> Result<TemplateRecord, ServiceError> {
        let source = self.catalog.get(id).await?;
        let payload = record_to_payload(&source);
        self.templates.save(name, &payload).await
    }

    /// Publish through the normal update path, so it produces a
    /// version snapshot like any other mutation.
    pub async fn publish(&self, id: Uuid, actor: &Actor) -> Result<ServiceRecord, ServiceError> {
        self.set_published(id, true, actor).await
    }

    pub async fn unpublish(&self, id: Uuid, actor: &Actor) -> Result<ServiceRecord, ServiceError> {
        self.set_published(id, false, actor).await
    }

    async fn set_published(
        &self,
        id: Uuid,
        published: bool,
        actor: &Actor,
    ) -> Result<ServiceRecord, ServiceError> {
        let patch = ServicePayload {
            is_published: Some(published),
            change_reason: Some(if published {
                "Published".to_string()
            } else {
                "Unpublished".to_string()
            }),
            ..Default::default()
        };
        self.catalog.update(id, &patch, actor, None).await
    }

    /// Soft-delete every id independently; one failure never stops the
    /// rest.
    #[instrument(skip(self, ids), fields(count = ids.len(), actor = %actor.id))]
    pub async fn bulk_delete(&self, ids: &[Uuid], actor: &Actor) -> BulkOutcome {
        let mut outcome = BulkOutcome::default();
        for &id in ids {
            match self.catalog.soft_delete(id, actor).await {
                Ok(_) => outcome.succeeded_ids.push(id),
                Err(e) => {
                    warn!(id = %id, error = %e, "bulk_delete_item_failed");
                    outcome.failed_ids.push(id);
                }
            }
        }
        outcome.updated_count = outcome.succeeded_ids.len();
        info!(updated = outcome.updated_count, failed = outcome.failed_ids.len(), "bulk_delete_done");
        outcome
    }

    /// Publish every id independently, same best-effort contract as
    /// [`AdminWorkflow::bulk_delete`].
    #[instrument(skip(self, ids), fields(count = ids.len(), actor = %actor.id))]
    pub async fn bulk_publish(&self, ids: &[Uuid], actor: &Actor) -> BulkOutcome {
        let mut outcome = BulkOutcome::default();
        for &id in ids {
            match self.publish(id, actor).await {
                Ok(_) => outcome.succeeded_ids.push(id),
                Err(e) => {
                    warn!(id = %id, error = %e, "bulk_publish_item_failed");
                    outcome.failed_ids.push(id);
                }
            }
        }
        outcome.updated_count = outcome.succeeded_ids.len();
        info!(updated = outcome.updated_count, failed = outcome.failed_ids.len(), "bulk_publish_done");
        outcome
    }

    /// Version history, newest first.
    pub async fn version_history(&self, id: Uuid) -> Result<Vec<VersionSnapshot>, ServiceError> {
        let record = self.catalog.get(id).await?;
        let mut history = record.version_history;
        history.reverse();
        Ok(history)
    }

    pub fn templates(&self) -> &Arc<TemplateStore> {
        &self.templates
    }
}

/// Reduce a stored record to a create-payload: identity, ownership,
/// revision and history are dropped; content fields are kept.
fn record_to_payload(record: &ServiceRecord) -> ServicePayload {
    ServicePayload {
        title: Some(record.title.clone()),
        short_description: Some(record.short_description.clone()),
        description: Some(record.description.clone()),
        full_description: Some(record.full_description.clone()),
        category: Some(record.category.as_str().to_string()),
        price: Some(record.price),
        icon: Some(record.icon.clone()),
        price_note: record.price_note.clone(),
        hero_text: Some(record.hero_text.clone()),
        calendly_link: record.calendly_link.clone(),
        features: Some(
            record
                .features
                .iter()
                .map(|f| models::payload::FeatureInput {
                    title: Some(f.title.clone()),
                    description: Some(f.description.clone()),
                    icon: f.icon.clone(),
                })
                .collect(),
        ),
        process_steps: Some(
            record
                .process_steps
                .iter()
                .map(|s| models::payload::ProcessStepInput {
                    title: Some(s.title.clone()),
                    description: Some(s.description.clone()),
                    order: Some(s.order),
                })
                .collect(),
        ),
        project_types: Some(
            record
                .project_types
                .iter()
                .map(|p| models::payload::ProjectTypeInput {
                    name: Some(p.name.clone()),
                    description: Some(p.description.clone()),
                })
                .collect(),
        ),
        benefits: Some(
            record
                .benefits
                .iter()
                .map(|b| models::payload::BenefitInput {
                    title: Some(b.title.clone()),
                    description: Some(b.description.clone()),
                    icon: b.icon.clone(),
                })
                .collect(),
        ),
        social_links: Some(
            record
                .social_links
                .iter()
                .map(|l| models::payload::SocialLinkInput {
                    platform: Some(l.platform.as_str().to_string()),
                    url: Some(l.url.clone()),
                })
                .collect(),
        ),
        images: Some(
            record
                .images
                .iter()
                .map(|i| models::payload::ServiceImageInput {
                    url: Some(i.url.clone()),
                    alt_text: i.alt_text.clone(),
                    is_primary: Some(i.is_primary),
                })
                .collect(),
        ),
        contact_info: Some(record.contact_info.clone()),
        is_featured: Some(record.is_featured),
        is_active: Some(record.is_active),
        is_published: None,
        change_reason: None,
        extra: record.extra.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> Actor {
        Actor { id: Uuid::new_v4(), email: "admin@firm.example".into(), is_admin: true }
    }

    fn payload(title: &str) -> ServicePayload {
        ServicePayload {
            title: Some(title.into()),
            short_description: Some("Short".into()),
            description: Some("Description".into()),
            full_description: Some("Full".into()),
            category: Some("consulting".into()),
            price: Some(500.0),
            ..Default::default()
        }
    }

    async fn workflow(tag: &str) -> (AdminWorkflow, Arc<ServiceCatalog>) {
        let dir = std::env::temp_dir();
        let run = Uuid::new_v4();
        let catalog =
            ServiceCatalog::open(dir.join(format!("wf_catalog_{tag}_{run}.json"))).await.unwrap();
        let templates =
            TemplateStore::open(dir.join(format!("wf_templates_{tag}_{run}.json"))).await.unwrap();
        (AdminWorkflow::new(Arc::clone(&catalog), templates), catalog)
    }

    #[tokio::test]
    async fn draft_save_creates_then_updates_through_handle() {
        let (wf, catalog) = workflow("draft").await;
        let actor = admin();

        let p = ServicePayload { title: Some("Work in progress".into()), ..Default::default() };
        let (handle, record) = wf.save_draft(DraftHandle::new(), &p, &actor).await.unwrap();
        assert_eq!(handle.draft_id, Some(record.id));
        assert!(record.lifecycle.is_draft());

        let patch = ServicePayload { price: Some(750.0), ..Default::default() };
        let (handle2, updated) = wf.save_draft(handle, &patch, &actor).await.unwrap();
        assert_eq!(handle2.draft_id, handle.draft_id);
        assert_eq!(updated.price, 750.0);
        assert_eq!(catalog.all().await.len(), 1);
    }

    #[tokio::test]
    async fn two_sessions_keep_independent_drafts() {
        let (wf, catalog) = workflow("sessions").await;
        let actor = admin();

        let (tab_a, draft_a) = wf
            .save_draft(
                DraftHandle::new(),
                &ServicePayload { title: Some("Tab A draft".into()), ..Default::default() },
                &actor,
            )
            .await
            .unwrap();
        let (tab_b, draft_b) = wf
            .save_draft(
                DraftHandle::new(),
                &ServicePayload { title: Some("Tab B draft".into()), ..Default::default() },
                &actor,
            )
            .await
            .unwrap();

        assert_ne!(tab_a.session_id, tab_b.session_id);
        assert_ne!(draft_a.id, draft_b.id);

        let patch = ServicePayload { price: Some(10.0), ..Default::default() };
        wf.save_draft(tab_a, &patch, &actor).await.unwrap();
        let b_after = catalog.get(draft_b.id).await.unwrap();
        assert_eq!(b_after.price, 0.0);
    }

    #[tokio::test]
    async fn auto_save_skips_untitled_payloads() {
        let (wf, catalog) = workflow("autosave").await;
        let actor = admin();

        let outcome = wf
            .auto_save(DraftHandle::new(), &ServicePayload::default(), &actor)
            .await
            .unwrap();
        assert!(matches!(outcome, AutoSaveOutcome::Skipped));
        assert!(catalog.all().await.is_empty());

        let p = ServicePayload { title: Some("Now it has a title".into()), ..Default::default() };
        let outcome = wf.auto_save(DraftHandle::new(), &p, &actor).await.unwrap();
        match outcome {
            AutoSaveOutcome::Saved { handle, record } => {
                assert_eq!(handle.draft_id, Some(record.id));
            }
            AutoSaveOutcome::Skipped => panic!("expected a save"),
        }
    }

    #[tokio::test]
    async fn duplicate_gets_fresh_identity_and_leaves_source_alone() {
        let (wf, catalog) = workflow("dup").await;
        let actor = admin();
        let source = catalog.create(&payload("Flagship Offering"), &actor).await.unwrap();
        let patch = ServicePayload { price: Some(501.0), ..Default::default() };
        let source = catalog.update(source.id, &patch, &actor, None).await.unwrap();

        let copy = wf.duplicate(source.id, &actor).await.unwrap();
        assert_ne!(copy.id, source.id);
        assert_eq!(copy.title, "Flagship Offering (Copy)");
        assert!(copy.version_history.is_empty());
        assert_eq!(copy.revision, 0);
        assert!(copy.lifecycle.is_draft());

        let source_after = catalog.get(source.id).await.unwrap();
        assert_eq!(source_after.version_history.len(), 1);
        assert_eq!(source_after.updated_at, source.updated_at);

        // A second duplicate gets the next free suffix.
        let copy2 = wf.duplicate(source.id, &actor).await.unwrap();
        assert_eq!(copy2.title, "Flagship Offering (Copy 2)");
    }

    #[tokio::test]
    async fn bulk_delete_is_best_effort_with_partial_failure() {
        let (wf, catalog) = workflow("bulk").await;
        let actor = admin();
        let a = catalog.create(&payload("Service A"), &actor).await.unwrap();
        let c = catalog.create(&payload("Service C"), &actor).await.unwrap();
        let missing = Uuid::new_v4();

        let outcome = wf.bulk_delete(&[a.id, missing, c.id], &actor).await;
        assert_eq!(outcome.succeeded_ids, vec![a.id, c.id]);
        assert_eq!(outcome.failed_ids, vec![missing]);
        assert_eq!(outcome.updated_count, 2);

        assert!(catalog.get(a.id).await.unwrap().lifecycle.is_archived());
        assert!(catalog.get(c.id).await.unwrap().lifecycle.is_archived());
    }

    #[tokio::test]
    async fn bulk_publish_reports_mixed_outcomes() {
        let (wf, catalog) = workflow("bulkpub").await;
        let actor = admin();
        let a = catalog.create(&payload("Publishable"), &actor).await.unwrap();
        let b = catalog.create(&payload("Archived One"), &actor).await.unwrap();
        catalog.soft_delete(b.id, &actor).await.unwrap();

        let outcome = wf.bulk_publish(&[a.id, b.id], &actor).await;
        assert_eq!(outcome.succeeded_ids, vec![a.id]);
        assert_eq!(outcome.failed_ids, vec![b.id]);
        assert_eq!(outcome.updated_count, 1);
        assert!(catalog.get(a.id).await.unwrap().lifecycle.is_published());
    }

    #[tokio::test]
    async fn publish_produces_a_snapshot_and_history_reads_newest_first() {
        let (wf, catalog) = workflow("history").await;
        let actor = admin();
        let record = catalog.create(&payload("Audited"), &actor).await.unwrap();

        wf.publish(record.id, &actor).await.unwrap();
        wf.unpublish(record.id, &actor).await.unwrap();

        let history = wf.version_history(record.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].version_number, 2);
        assert_eq!(history[0].change_reason, "Unpublished");
        assert_eq!(history[1].change_reason, "Published");
        assert_eq!(history[0].changed_by, actor.id);
    }

    #[tokio::test]
    async fn save_as_template_sanitizes_and_stays_out_of_catalog() {
        let (wf, catalog) = workflow("template").await;
        let actor = admin();
        let mut p = payload("Template Source");
        p.is_published = Some(true);
        let record = catalog.create(&p, &actor).await.unwrap();

        let template = wf.save_as_template(record.id, "Starter", &actor).await.unwrap();
        assert_eq!(template.name, "Starter");
        assert!(template.payload.is_published.is_none());
        assert_eq!(template.payload.title.as_deref(), Some("Template Source"));

        // Templates are not services.
        assert_eq!(catalog.all().await.len(), 1);
        assert_eq!(wf.templates().list().await.len(), 1);
    }
}
