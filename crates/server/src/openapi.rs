use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Wire shape of a service create/update body. All fields optional;
/// the validation gate decides what a complete record needs.
#[derive(ToSchema)]
pub struct ServicePayloadDoc {
    pub title: Option<String>,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub full_description: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub icon: Option<String>,
    pub hero_text: Option<String>,
    pub is_featured: Option<bool>,
    pub is_published: Option<bool>,
    pub change_reason: Option<String>,
}

#[derive(ToSchema)]
pub struct BulkIdsDoc {
    pub ids: Vec<Uuid>,
}

#[derive(ToSchema)]
pub struct DraftHandleDoc {
    pub session_id: Uuid,
    pub draft_id: Option<Uuid>,
}

#[derive(ToSchema)]
pub struct DraftRequestDoc {
    pub handle: Option<DraftHandleDoc>,
    pub payload: ServicePayloadDoc,
}

#[derive(ToSchema)]
pub struct SaveTemplateRequestDoc {
    pub name: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::services::create,
        crate::routes::services::list,
        crate::routes::services::admin_list,
        crate::routes::services::detail,
        crate::routes::services::update,
        crate::routes::services::delete,
        crate::routes::services::duplicate,
        crate::routes::services::history,
        crate::routes::services::bulk_delete,
        crate::routes::services::bulk_publish,
        crate::routes::services::categories,
        crate::routes::services::featured,
        crate::routes::workflow::save_draft,
        crate::routes::workflow::auto_save,
        crate::routes::workflow::save_template,
        crate::routes::workflow::list_templates,
        crate::routes::workflow::delete_template,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            ServicePayloadDoc,
            BulkIdsDoc,
            DraftHandleDoc,
            DraftRequestDoc,
            SaveTemplateRequestDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "services"),
        (name = "admin")
    )
)]
pub struct ApiDoc;
