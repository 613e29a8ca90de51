use axum::{
    Json, Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::clients::mail::Mailer;
use crate::config::Config;
use crate::db::Store;
use crate::tokens::TokenManager;

pub mod auth;
mod applications;
mod catalog;
mod error;
mod observability;
pub mod permissions;
pub mod types;
pub mod validation;

pub use error::ApiError;
pub use types::ApiResponse;

use metrics_exporter_prometheus::PrometheusHandle;

pub struct AppState {
    pub store: Store,

    pub config: Config,

    pub tokens: TokenManager,

    pub mailer: Arc<dyn Mailer>,

    pub prometheus_handle: Option<PrometheusHandle>,
}

#[must_use]
pub fn create_app_state(
    config: Config,
    store: Store,
    mailer: Arc<dyn Mailer>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    let tokens = TokenManager::new(&config.auth);

    Arc::new(AppState {
        store,
        config,
        tokens,
        mailer,
        prometheus_handle,
    })
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config.server.cors_allowed_origins.clone();

    let protected_routes = create_protected_router(state.clone());

    let api_router = Router::new()
        .merge(protected_routes)
        .route("/auth/register", post(auth::register))
        .route("/auth/register/confirm", post(auth::confirm_registration))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/password-reset", post(auth::request_password_reset))
        .route(
            "/auth/password-reset/confirm",
            post(auth::confirm_password_reset),
        )
        .route("/service-types", get(catalog::public_service_types))
        .route("/health", get(health))
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}

async fn health(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
) -> Result<Json<ApiResponse<types::MessageResponse>>, ApiError> {
    state
        .store
        .ping()
        .await
        .map_err(|e| ApiError::internal(format!("Database unreachable: {e}")))?;

    Ok(Json(ApiResponse::success(types::MessageResponse {
        message: "ok".to_string(),
    })))
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/applications", get(applications::list_applications))
        .route("/applications", post(applications::create_application))
        .route(
            "/applications/communications",
            post(applications::create_communications_application),
        )
        .route(
            "/applications/conscription",
            post(applications::create_conscription_application),
        )
        .route("/applications/{id}", get(applications::get_application))
        .route("/applications/{id}", put(applications::update_application))
        .route(
            "/applications/{id}",
            delete(applications::delete_application),
        )
        .route(
            "/admin/applications/bulk-update-status",
            post(applications::bulk_update_status),
        )
        .route("/catalog/cities", get(catalog::list_cities))
        .route("/catalog/cities", post(catalog::create_city))
        .route("/catalog/cities/{id}", put(catalog::update_city))
        .route("/catalog/cities/{id}", delete(catalog::delete_city))
        .route(
            "/catalog/specializations",
            get(catalog::list_specializations),
        )
        .route(
            "/catalog/specializations",
            post(catalog::create_specialization),
        )
        .route(
            "/catalog/specializations/{id}",
            put(catalog::update_specialization),
        )
        .route(
            "/catalog/specializations/{id}",
            delete(catalog::delete_specialization),
        )
        .route(
            "/catalog/military-branches",
            get(catalog::list_military_branches),
        )
        .route(
            "/catalog/military-branches",
            post(catalog::create_military_branch),
        )
        .route(
            "/catalog/military-branches/{id}",
            put(catalog::update_military_branch),
        )
        .route(
            "/catalog/military-branches/{id}",
            delete(catalog::delete_military_branch),
        )
        .route("/catalog/ranks", get(catalog::list_ranks))
        .route("/catalog/ranks", post(catalog::create_rank))
        .route("/catalog/ranks/{id}", put(catalog::update_rank))
        .route("/catalog/ranks/{id}", delete(catalog::delete_rank))
        .route(
            "/catalog/application-statuses",
            get(catalog::list_application_statuses),
        )
        .route(
            "/catalog/application-statuses",
            post(catalog::create_application_status),
        )
        .route(
            "/catalog/application-statuses/{id}",
            put(catalog::update_application_status),
        )
        .route(
            "/catalog/application-statuses/{id}",
            delete(catalog::delete_application_status),
        )
        .route(
            "/catalog/education-levels",
            get(catalog::list_education_levels),
        )
        .route(
            "/catalog/education-levels",
            post(catalog::create_education_level),
        )
        .route(
            "/catalog/education-levels/{id}",
            put(catalog::update_education_level),
        )
        .route(
            "/catalog/education-levels/{id}",
            delete(catalog::delete_education_level),
        )
        .route(
            "/catalog/health-statuses",
            get(catalog::list_health_statuses),
        )
        .route(
            "/catalog/health-statuses",
            post(catalog::create_health_status),
        )
        .route(
            "/catalog/health-statuses/{id}",
            put(catalog::update_health_status),
        )
        .route(
            "/catalog/health-statuses/{id}",
            delete(catalog::delete_health_status),
        )
        .route("/catalog/service-types", get(catalog::list_service_types))
        .route("/catalog/service-types", post(catalog::create_service_type))
        .route(
            "/catalog/service-types/{id}",
            put(catalog::update_service_type),
        )
        .route(
            "/catalog/service-types/{id}",
            delete(catalog::delete_service_type),
        )
        .route(
            "/catalog/service-types/{id}/advantages",
            get(catalog::list_service_type_advantages),
        )
        .route(
            "/catalog/service-types/{id}/advantages/{advantage_id}",
            put(catalog::link_service_type_advantage),
        )
        .route(
            "/catalog/service-types/{id}/advantages/{advantage_id}",
            delete(catalog::unlink_service_type_advantage),
        )
        .route("/catalog/advantages", get(catalog::list_advantages))
        .route("/catalog/advantages", post(catalog::create_advantage))
        .route("/catalog/advantages/{id}", put(catalog::update_advantage))
        .route(
            "/catalog/advantages/{id}",
            delete(catalog::delete_advantage),
        )
        .route("/metrics", get(observability::get_metrics))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
