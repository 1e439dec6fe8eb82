use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use service::auth::domain::{Actor, LoginInput, RegisterInput};
use service::auth::repo::file::FileAuthRepository;
use service::auth::service::{decode_actor, AuthService};
use service::{AdminWorkflow, ServiceCatalog, ServiceQueryEngine, TemplateStore};

use crate::errors::ApiError;

/// Shared handler state: the catalog stores plus auth config.
#[derive(Clone)]
pub struct ServerState {
    pub catalog: Arc<ServiceCatalog>,
    pub query: ServiceQueryEngine,
    pub workflow: Arc<AdminWorkflow>,
    pub templates: Arc<TemplateStore>,
    pub auth: Arc<AuthService<FileAuthRepository>>,
    pub jwt_secret: String,
    pub hard_delete: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOutput {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub is_admin: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginOutput {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub is_admin: bool,
    pub token: String,
}

#[utoipa::path(post, path = "/auth/register", tag = "auth",
    request_body = crate::openapi::RegisterRequest,
    responses((status = 201, description = "Registered"), (status = 400, description = "Bad Request"), (status = 409, description = "Conflict")))]
pub async fn register(
    State(state): State<ServerState>,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<UserOutput>), ApiError> {
    let user = state.auth.register(input).await?;
    let out = UserOutput {
        user_id: user.id,
        email: user.email,
        name: user.name,
        is_admin: user.is_admin,
    };
    Ok((StatusCode::CREATED, Json(out)))
}

#[utoipa::path(post, path = "/auth/login", tag = "auth",
    request_body = crate::openapi::LoginRequest,
    responses((status = 200, description = "Logged In"), (status = 401, description = "Unauthorized")))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> Result<(CookieJar, Json<LoginOutput>), ApiError> {
    let session = state.auth.login(input).await?;
    let user = session.user;
    let token = session
        .token
        .ok_or_else(|| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "token generation failed"))?;

    let mut cookie = Cookie::new("auth_token", token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(axum_extra::extract::cookie::SameSite::Lax);
    let jar = jar.add(cookie);

    let out = LoginOutput {
        user_id: user.id,
        email: user.email,
        name: user.name,
        is_admin: user.is_admin,
        token,
    };
    Ok((jar, Json(out)))
}

pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let jar = jar.remove(Cookie::from("auth_token"));
    (jar, StatusCode::NO_CONTENT)
}

pub async fn me(Extension(actor): Extension<Actor>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "userId": actor.id,
        "email": actor.email,
        "isAdmin": actor.is_admin,
    }))
}

/// Route-layer middleware: verify a JWT from the `Authorization: Bearer`
/// header, falling back to the `auth_token` cookie, and insert the
/// resulting [`Actor`] as a request extension.
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&req).or_else(|| cookie_token(&req));
    let token = match token {
        Some(t) => t,
        None => {
            tracing::warn!(path = %req.uri().path(), "missing Authorization header and auth_token cookie");
            return Err(ApiError::unauthorized("authentication required"));
        }
    };

    match decode_actor(&token, &state.jwt_secret) {
        Ok(actor) => {
            req.extensions_mut().insert(actor);
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(path = %req.uri().path(), err = %e, "token validation failed");
            Err(ApiError::unauthorized("invalid or expired token"))
        }
    }
}

/// Route-layer middleware for the admin surface; must run after
/// [`require_auth`] so the actor extension is present.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    match req.extensions().get::<Actor>() {
        Some(actor) if actor.is_admin => Ok(next.run(req).await),
        Some(_) => Err(ApiError::forbidden("admin privileges required")),
        None => Err(ApiError::unauthorized("authentication required")),
    }
}

fn bearer_token(req: &Request) -> Option<String> {
    let header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?;
    header.strip_prefix("Bearer ").map(str::to_string)
}

fn cookie_token(req: &Request) -> Option<String> {
    let header = req
        .headers()
        .get(axum::http::header::COOKIE)?
        .to_str()
        .ok()?;
    for part in header.split(';') {
        if let Some(rest) = part.trim().strip_prefix("auth_token=") {
            if !rest.is_empty() {
                return Some(rest.to_string());
            }
        }
    }
    None
}
