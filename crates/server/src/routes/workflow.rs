use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use models::payload::ServicePayload;
use service::auth::domain::Actor;
use service::workflow::{AutoSaveOutcome, DraftHandle};

use crate::errors::ApiError;
use crate::routes::auth::ServerState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRequest {
    #[serde(default)]
    pub handle: Option<DraftHandle>,
    pub payload: ServicePayload,
}

#[derive(Debug, Deserialize)]
pub struct SaveTemplateRequest {
    pub name: String,
}

#[utoipa::path(post, path = "/admin/drafts", tag = "admin",
    request_body = crate::openapi::DraftRequestDoc,
    responses((status = 200, description = "Draft checkpointed"), (status = 400, description = "Validation failed")))]
pub async fn save_draft(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<DraftRequest>,
) -> Result<Json<Value>, ApiError> {
    let handle = req.handle.unwrap_or_default();
    let (handle, record) = state.workflow.save_draft(handle, &req.payload, &actor).await?;
    Ok(Json(json!({ "handle": handle, "service": record.to_wire() })))
}

#[utoipa::path(post, path = "/admin/drafts/auto-save", tag = "admin",
    request_body = crate::openapi::DraftRequestDoc,
    responses((status = 200, description = "Saved or skipped")))]
pub async fn auto_save(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<DraftRequest>,
) -> Result<Json<Value>, ApiError> {
    let handle = req.handle.unwrap_or_default();
    match state.workflow.auto_save(handle, &req.payload, &actor).await? {
        AutoSaveOutcome::Saved { handle, record } => {
            Ok(Json(json!({ "saved": true, "handle": handle, "service": record.to_wire() })))
        }
        AutoSaveOutcome::Skipped => Ok(Json(json!({ "saved": false }))),
    }
}

#[utoipa::path(post, path = "/services/{id}/template", tag = "admin",
    request_body = crate::openapi::SaveTemplateRequestDoc,
    responses((status = 201, description = "Template saved"), (status = 404, description = "Not found")))]
pub async fn save_template(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<SaveTemplateRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let template = state.workflow.save_as_template(id, &req.name, &actor).await?;
    Ok((StatusCode::CREATED, Json(json!({ "template": template }))))
}

#[utoipa::path(get, path = "/admin/templates", tag = "admin",
    responses((status = 200, description = "All templates, newest first")))]
pub async fn list_templates(State(state): State<ServerState>) -> Json<Value> {
    let templates = state.templates.list().await;
    Json(json!({ "templates": templates }))
}

#[utoipa::path(delete, path = "/admin/templates/{id}", tag = "admin",
    responses((status = 200, description = "Deleted"), (status = 404, description = "Not found")))]
pub async fn delete_template(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let removed = state.templates.delete(id).await?;
    if !removed {
        return Err(ApiError::new(StatusCode::NOT_FOUND, "template not found"));
    }
    Ok(Json(json!({ "success": true, "message": "template deleted" })))
}
