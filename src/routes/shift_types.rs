use crate::AppState;
use crate::db::models::ApiResponse;
use crate::services::context::RequestContext;
use crate::services::shift_types_service::ShiftTypesService;
use crate::validation::ValidatedJson;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

#[derive(Deserialize, Validate, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ShiftTypeRequest {
    #[validate(length(min = 1, max = 32, message = "Shift type code is required"))]
    pub code: String,
    #[validate(length(min = 1, max = 255, message = "Shift type label is required"))]
    pub label: String,
    pub color: String,
    pub default_start_time: String,
    pub default_end_time: String,
    #[serde(default)]
    pub crosses_midnight: bool,
}

pub async fn get_shift_types(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match ShiftTypesService::list(state.store.as_ref()).await {
        Ok(types) => {
            let response = ApiResponse::success(types, "Shift types retrieved successfully");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn create_shift_type(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    ValidatedJson(payload): ValidatedJson<ShiftTypeRequest>,
) -> impl IntoResponse {
    match ShiftTypesService::create(state.store.as_ref(), &ctx, &payload).await {
        Ok(shift_type) => {
            let response = ApiResponse::created(shift_type, "Shift type created successfully");
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn update_shift_type(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(shift_type_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<ShiftTypeRequest>,
) -> impl IntoResponse {
    match ShiftTypesService::update(state.store.as_ref(), &ctx, shift_type_id, &payload).await {
        Ok(shift_type) => {
            let response = ApiResponse::success(shift_type, "Shift type updated successfully");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn delete_shift_type(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(shift_type_id): Path<Uuid>,
) -> impl IntoResponse {
    match ShiftTypesService::delete(state.store.as_ref(), &ctx, shift_type_id).await {
        Ok(()) => {
            let response = ApiResponse::<()>::ok("Shift type deleted successfully");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}
