pub mod notes;
pub mod notifications;
pub mod shift_types;
pub mod shifts;
pub mod swap_requests;
pub mod teams;
pub mod users;

use crate::AppState;
use crate::db::models::ApiResponse;
use crate::middleware::{auth_middleware, request_tracking_middleware};
use axum::{
    Json, Router,
    http::{HeaderValue, Method, StatusCode, header},
    middleware::{from_fn, from_fn_with_state},
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

pub async fn health() -> impl IntoResponse {
    let response = ApiResponse::success(json!({ "status": "ok" }), "Service is healthy");
    (StatusCode::OK, Json(response))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-user-id"),
            header::HeaderName::from_static("x-request-id"),
        ]);

    if origins.iter().any(|o| o == "*") {
        return cors.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();
    cors.allow_origin(origins)
}

pub fn create_router(state: Arc<AppState>) -> Router {
    // Everything except /health requires an identity
    let protected_routes = Router::new()
        .route("/teams", get(teams::get_teams))
        .route("/teams", post(teams::create_team))
        .route("/teams/:team_id", delete(teams::delete_team))
        .route("/users", get(users::get_users))
        .route("/users", post(users::create_user))
        .route("/users/:user_id", put(users::update_user))
        .route("/shift-types", get(shift_types::get_shift_types))
        .route("/shift-types", post(shift_types::create_shift_type))
        .route(
            "/shift-types/:shift_type_id",
            put(shift_types::update_shift_type),
        )
        .route(
            "/shift-types/:shift_type_id",
            delete(shift_types::delete_shift_type),
        )
        .route("/shifts", get(shifts::get_shifts))
        .route("/shifts", post(shifts::create_shift))
        .route("/shifts/bulk", post(shifts::bulk_shifts))
        .route("/shifts/:shift_id", put(shifts::update_shift))
        .route("/shifts/:shift_id", delete(shifts::delete_shift))
        .route("/swap-requests", get(swap_requests::get_swap_requests))
        .route("/swap-requests", post(swap_requests::create_swap_request))
        .route(
            "/swap-requests/:request_id/approve",
            post(swap_requests::approve_swap_request),
        )
        .route(
            "/swap-requests/:request_id/reject",
            post(swap_requests::reject_swap_request),
        )
        .route(
            "/swap-requests/:request_id/execute",
            post(swap_requests::execute_swap_request),
        )
        .route("/notes", get(notes::get_notes))
        .route("/notes", post(notes::create_note))
        .route("/notes/:note_id/approve", post(notes::set_note_status))
        .route("/notifications", get(notifications::get_notifications))
        .route(
            "/notifications/:notification_id/read",
            post(notifications::mark_notification_read),
        )
        .route(
            "/notification-settings",
            get(notifications::get_notification_settings),
        )
        .route(
            "/notification-settings",
            put(notifications::update_notification_settings),
        )
        .route_layer(from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state.clone());

    Router::new()
        .route("/health", get(health))
        .merge(protected_routes)
        .layer(cors_layer(&state.config.cors_origins))
        .layer(from_fn(request_tracking_middleware))
}
