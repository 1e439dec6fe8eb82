use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use models::category::Category;
use models::payload::ServicePayload;
use service::auth::domain::Actor;
use service::catalog::{ServiceFilter, SortField, SortOrder};
use service::errors::FieldErrors;
use service::pagination::Pagination;

use crate::errors::ApiError;
use crate::routes::auth::ServerState;

const RELATED_LIMIT: usize = 3;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub featured: Option<bool>,
    pub include_archived: Option<bool>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuery {
    pub expected_revision: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct BulkIds {
    pub ids: Vec<Uuid>,
}

fn parse_filter(q: &ListQuery, mut filter: ServiceFilter) -> Result<ServiceFilter, ApiError> {
    if let Some(raw) = &q.category {
        let category = Category::parse(raw).map_err(|_| ApiError {
            status: StatusCode::BAD_REQUEST,
            message: "validation failed".into(),
            errors: Some(FieldErrors::single("category", format!("unknown category '{raw}'"))),
        })?;
        filter = filter.with_category(category);
    }
    if let Some(term) = &q.search {
        filter = filter.matching(term.clone());
    }
    if q.min_price.is_some() || q.max_price.is_some() {
        filter = filter.price_between(q.min_price, q.max_price);
    }
    if q.featured == Some(true) {
        filter = filter.featured_only();
    }
    Ok(filter)
}

#[utoipa::path(post, path = "/services", tag = "services",
    request_body = crate::openapi::ServicePayloadDoc,
    responses((status = 201, description = "Created"), (status = 400, description = "Validation failed")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<ServicePayload>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let record = state.catalog.create(&payload, &actor).await?;
    Ok((StatusCode::CREATED, Json(record.to_wire())))
}

async fn render_listing(state: &ServerState, q: &ListQuery, filter: &ServiceFilter) -> Json<Value> {
    let sort = q
        .sort
        .as_deref()
        .and_then(SortField::parse)
        .map(|field| (field, SortOrder::parse(q.order.as_deref().unwrap_or("asc"))));
    let pagination = Pagination { page: q.page.unwrap_or(1), limit: q.limit.unwrap_or(10) };

    let page = state.query.list(filter, sort, pagination).await;
    let stats = state.query.stats(filter).await;
    let services: Vec<Value> = page.items.iter().map(|r| r.to_wire()).collect();

    Json(json!({
        "services": services,
        "stats": stats,
        "pagination": page.info,
    }))
}

#[utoipa::path(get, path = "/services", tag = "services",
    responses((status = 200, description = "Filtered page with stats")))]
pub async fn list(
    State(state): State<ServerState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    let filter = parse_filter(&q, ServiceFilter::published())?;
    Ok(render_listing(&state, &q, &filter).await)
}

/// Dashboard listing: drafts are visible, and `includeArchived=true`
/// also pulls in soft-deleted records.
#[utoipa::path(get, path = "/admin/services", tag = "admin",
    responses((status = 200, description = "Listing including drafts"), (status = 403, description = "Admin only")))]
pub async fn admin_list(
    State(state): State<ServerState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    let mut base = ServiceFilter::default();
    if q.include_archived == Some(true) {
        base = base.include_archived();
    }
    let filter = parse_filter(&q, base)?;
    Ok(render_listing(&state, &q, &filter).await)
}

#[utoipa::path(get, path = "/services/{id}", tag = "services",
    responses((status = 200, description = "Detail with related records"), (status = 404, description = "Not found")))]
pub async fn detail(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let (record, related) = state.query.detail(id, RELATED_LIMIT).await?;
    let related: Vec<Value> = related.iter().map(|r| r.to_wire()).collect();
    Ok(Json(json!({ "service": record.to_wire(), "related": related })))
}

#[utoipa::path(put, path = "/services/{id}", tag = "services",
    request_body = crate::openapi::ServicePayloadDoc,
    responses((status = 200, description = "Updated"), (status = 403, description = "Not the owner"), (status = 409, description = "Conflict")))]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Query(q): Query<UpdateQuery>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<ServicePayload>,
) -> Result<Json<Value>, ApiError> {
    let record = state.catalog.update(id, &payload, &actor, q.expected_revision).await?;
    Ok(Json(record.to_wire()))
}

#[utoipa::path(delete, path = "/services/{id}", tag = "services",
    responses((status = 200, description = "Deleted"), (status = 404, description = "Not found")))]
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Value>, ApiError> {
    if state.hard_delete {
        state.catalog.hard_delete(id, &actor).await?;
        Ok(Json(json!({ "success": true, "message": "service permanently deleted" })))
    } else {
        let record = state.catalog.soft_delete(id, &actor).await?;
        Ok(Json(json!({
            "success": true,
            "message": "service deleted",
            "service": record.to_wire(),
        })))
    }
}

#[utoipa::path(post, path = "/services/{id}/duplicate", tag = "services",
    responses((status = 201, description = "Copy created"), (status = 404, description = "Not found")))]
pub async fn duplicate(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Extension(actor): Extension<Actor>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let record = state.workflow.duplicate(id, &actor).await?;
    Ok((StatusCode::CREATED, Json(record.to_wire())))
}

#[utoipa::path(get, path = "/services/{id}/history", tag = "services",
    responses((status = 200, description = "Snapshots newest first"), (status = 404, description = "Not found")))]
pub async fn history(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let history: Vec<Value> =
        state.workflow.version_history(id).await?.iter().map(|s| s.to_wire()).collect();
    Ok(Json(json!({ "history": history })))
}

#[utoipa::path(post, path = "/services/bulk-delete", tag = "services",
    request_body = crate::openapi::BulkIdsDoc,
    responses((status = 200, description = "Per-id outcome")))]
pub async fn bulk_delete(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Json(body): Json<BulkIds>,
) -> Json<Value> {
    let outcome = state.workflow.bulk_delete(&body.ids, &actor).await;
    Json(json!({ "success": true, "result": outcome }))
}

#[utoipa::path(post, path = "/services/bulk-publish", tag = "services",
    request_body = crate::openapi::BulkIdsDoc,
    responses((status = 200, description = "Per-id outcome")))]
pub async fn bulk_publish(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Json(body): Json<BulkIds>,
) -> Json<Value> {
    let outcome = state.workflow.bulk_publish(&body.ids, &actor).await;
    Json(json!({ "success": true, "result": outcome }))
}

#[utoipa::path(get, path = "/services/categories", tag = "services",
    responses((status = 200, description = "Distinct categories in use")))]
pub async fn categories(State(state): State<ServerState>) -> Json<Value> {
    let categories = state.query.categories_in_use().await;
    Json(json!({ "categories": categories }))
}

#[utoipa::path(get, path = "/services/featured", tag = "services",
    responses((status = 200, description = "Published featured records")))]
pub async fn featured(State(state): State<ServerState>) -> Json<Value> {
    let services: Vec<Value> =
        state.query.featured().await.iter().map(|r| r.to_wire()).collect();
    Json(json!({ "services": services }))
}
