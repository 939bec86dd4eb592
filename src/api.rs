//! API Router
//! Mission: Wire public, protected, and admin surfaces into one app

use crate::auth::{api as auth_api, auth_middleware, AuthGateway};
use crate::auth::models::Claims;
use crate::auth::policy::Action;
use crate::error::ApiError;
use crate::ml::{ModelInfo, Predictor};
use crate::models::{HealthResponse, PredictionRequest, PredictionResponse, ServiceInfo};
use axum::{
    extract::State,
    middleware,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub gateway: AuthGateway,
    pub model: Arc<dyn Predictor>,
    pub app_name: String,
}

/// Create the full application router.
///
/// Three surfaces: public (info, health, register, login), bearer-protected
/// (profile, password, prediction), and admin (user management). The token
/// middleware runs on the protected and admin routes only; role gating
/// happens inside the handlers via the gateway.
pub fn build_router(state: AppState) -> Router {
    let gateway = state.gateway.clone();

    let public_routes = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .with_state(state.clone());

    let auth_routes = Router::new()
        .route("/auth/register", post(auth_api::register))
        .route("/auth/login", post(auth_api::login))
        .with_state(gateway.clone());

    let user_routes = Router::new()
        .route("/users/me", get(auth_api::get_current_user))
        .route("/users/me/password", put(auth_api::change_password))
        .route(
            "/admin/users",
            get(auth_api::list_users).post(auth_api::create_user),
        )
        .route("/admin/users/:id", delete(auth_api::delete_user))
        .route_layer(middleware::from_fn_with_state(
            gateway.clone(),
            auth_middleware,
        ))
        .with_state(gateway.clone());

    let ml_routes = Router::new()
        .route("/predict", post(predict))
        .route("/model/info", get(model_info))
        .route_layer(middleware::from_fn_with_state(gateway, auth_middleware))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(user_routes)
        .merge(ml_routes)
        .layer(middleware::from_fn(crate::middleware::request_logging))
        .layer(CorsLayer::permissive())
}

/// GET / - service information.
async fn root(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: state.app_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        health: "/health".to_string(),
        authentication: "JWT Bearer token required for protected endpoints".to_string(),
    })
}

/// GET /health - service and model status.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        model_loaded: state.model.is_loaded(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /model/info - metadata about the model behind the seam
/// (authenticated).
async fn model_info(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
) -> Json<ModelInfo> {
    Json(state.model.info())
}

/// POST /predict - run inference (role >= user).
///
/// The collaborator is only invoked after `authorize` admits the caller and
/// the input has passed validation.
async fn predict(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<PredictionRequest>,
) -> Result<Json<PredictionResponse>, ApiError> {
    state.gateway.authorize(&claims, Action::Predict)?;

    let text = payload.validated_text()?;
    info!("Prediction request from user: {}", claims.username);

    let prediction = state
        .model
        .predict(&text)
        .await
        .map_err(|e| ApiError::Internal(format!("prediction failed: {e}")))?;

    Ok(Json(PredictionResponse {
        label: prediction.label,
        score: prediction.score,
        text,
    }))
}
