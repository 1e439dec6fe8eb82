use std::{net::SocketAddr, path::Path, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_default;
use configs::AppConfig;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::auth::repo::file::FileAuthRepository;
use service::auth::service::{AuthConfig, AuthService};
use service::{runtime, AdminWorkflow, ServiceCatalog, ServiceQueryEngine, TemplateStore};

use crate::routes::{self, auth::ServerState};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Open the file-backed stores under the configured data directory and
/// wire up the shared handler state.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<ServerState> {
    runtime::ensure_env(&cfg.storage.data_dir).await?;
    let data_dir = Path::new(&cfg.storage.data_dir);

    let catalog = ServiceCatalog::open(data_dir.join("services.json")).await?;
    let templates = TemplateStore::open(data_dir.join("templates.json")).await?;
    let repo = FileAuthRepository::open(data_dir.join("accounts.json")).await?;
    let auth = Arc::new(AuthService::new(
        repo,
        AuthConfig {
            jwt_secret: Some(cfg.auth.jwt_secret.clone()),
            password_algorithm: "argon2".into(),
        },
    ));

    let query = ServiceQueryEngine::new(Arc::clone(&catalog));
    let workflow = Arc::new(AdminWorkflow::new(Arc::clone(&catalog), Arc::clone(&templates)));

    Ok(ServerState {
        catalog,
        query,
        workflow,
        templates,
        auth,
        jwt_secret: cfg.auth.jwt_secret.clone(),
        hard_delete: cfg.catalog.hard_delete,
    })
}

/// Build the application router for the given state.
pub fn build_app(state: ServerState) -> Router {
    routes::build_router(state, build_cors())
}

fn load_bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = AppConfig::load_and_validate()?;
    let state = build_state(&cfg).await?;
    let app = build_app(state);

    let addr = load_bind_addr(&cfg)?;
    info!(%addr, "starting catalog backend");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
