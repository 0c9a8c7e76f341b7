use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Store;
use crate::services::AssistantService;
use crate::state::SharedState;

mod ai;
mod assets;
mod contacts;
mod error;
pub mod identity;
mod mood;
mod notes;
mod observability;
mod projects;
mod system;
mod tasks;
mod types;
mod users;
pub mod validation;

pub use error::ApiError;
pub use identity::Identity;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.shared.store
    }

    #[must_use]
    pub fn assistant(&self) -> &AssistantService {
        &self.shared.assistant
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();

    let api_router = Router::new()
        .merge(user_routes())
        .merge(project_routes())
        .merge(task_routes())
        .merge(contact_routes())
        .merge(note_routes())
        .merge(asset_routes())
        .merge(mood_routes())
        .merge(ai_routes())
        .merge(system_routes())
        .with_state(state);

    let cors_layer = if cors_origins.is_empty() || cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(middleware::from_fn(observability::request_middleware))
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

fn user_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", post(users::create_user))
        .route("/users/me", get(users::get_current_user))
        .route("/users/{id}", get(users::get_user))
}

fn project_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/projects",
            get(projects::list_projects).post(projects::create_project),
        )
        .route(
            "/projects/{id}",
            get(projects::get_project)
                .put(projects::update_project)
                .delete(projects::delete_project),
        )
}

fn task_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route(
            "/tasks/{id}",
            get(tasks::get_task)
                .put(tasks::update_task)
                .delete(tasks::delete_task),
        )
}

fn contact_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/contacts",
            get(contacts::list_contacts).post(contacts::create_contact),
        )
        .route("/contacts/due", get(contacts::list_due_contacts))
        .route(
            "/contacts/{id}",
            get(contacts::get_contact)
                .put(contacts::update_contact)
                .delete(contacts::delete_contact),
        )
        .route("/contacts/{id}/contacted", post(contacts::mark_contacted))
}

fn note_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/notes", get(notes::list_notes).post(notes::create_note))
        .route(
            "/notes/{id}",
            get(notes::get_note)
                .put(notes::update_note)
                .delete(notes::delete_note),
        )
}

fn asset_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/assets", get(assets::list_assets).post(assets::create_asset))
        .route("/assets/expiring", get(assets::list_expiring_assets))
        .route(
            "/assets/{id}",
            get(assets::get_asset)
                .put(assets::update_asset)
                .delete(assets::delete_asset),
        )
}

fn mood_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/mood",
            get(mood::list_mood_entries).post(mood::create_mood_entry),
        )
        .route("/mood/{id}", get(mood::get_mood_entry))
}

fn ai_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ai/time-suggestions", post(ai::time_suggestions))
        .route("/ai/project-analysis", post(ai::project_analysis))
        .route("/ai/social-media-captions", post(ai::social_media_captions))
        .route("/ai/chat", post(ai::chat))
}

fn system_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/system/health/live", get(system::health_live))
        .route("/system/health/ready", get(system::health_ready))
        .route("/system/metrics", get(observability::get_metrics))
}
