use crate::AppState;
use crate::db::models::ApiResponse;
use crate::services::bulk_shifts_service::BulkShiftsService;
use crate::services::context::RequestContext;
use crate::services::shifts_service::ShiftsService;
use crate::validation::ValidatedJson;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ShiftQuery {
    pub team_id: Option<Uuid>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub user_id: Option<Uuid>,
}

/// Body of create and update. Presence of the required fields is checked by
/// the service so a missing one reports "Missing required fields".
#[derive(Deserialize, Validate, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ShiftRequest {
    pub date: Option<String>,
    pub user_id: Option<Uuid>,
    pub shift_type_id: Option<Uuid>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub comment: Option<String>,
    pub team_id: Option<Uuid>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct BulkShiftItem {
    pub shift_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub date: Option<String>,
    pub shift_type_id: Option<Uuid>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub comment: Option<String>,
}

#[derive(Deserialize, Validate, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct BulkShiftRequest {
    #[serde(default)]
    pub action: String,
    pub team_id: Option<Uuid>,
    #[serde(default)]
    pub items: Vec<BulkShiftItem>,
}

pub async fn get_shifts(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Query(params): Query<ShiftQuery>,
) -> impl IntoResponse {
    match ShiftsService::list(state.store.as_ref(), &ctx, &params).await {
        Ok(shifts) => {
            let response = ApiResponse::success(shifts, "Shifts retrieved successfully");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn create_shift(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    ValidatedJson(payload): ValidatedJson<ShiftRequest>,
) -> impl IntoResponse {
    match ShiftsService::create(state.store.as_ref(), &state.emitter, &ctx, &payload).await {
        Ok(shift) => {
            let response = ApiResponse::created(shift, "Shift created successfully");
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn update_shift(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(shift_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<ShiftRequest>,
) -> impl IntoResponse {
    match ShiftsService::update(state.store.as_ref(), &state.emitter, &ctx, shift_id, &payload)
        .await
    {
        Ok(shift) => {
            let response = ApiResponse::success(shift, "Shift updated successfully");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn delete_shift(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(shift_id): Path<Uuid>,
) -> impl IntoResponse {
    match ShiftsService::delete(state.store.as_ref(), &state.emitter, &ctx, shift_id).await {
        Ok(()) => {
            let response = ApiResponse::<()>::ok("Shift deleted successfully");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn bulk_shifts(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    ValidatedJson(payload): ValidatedJson<BulkShiftRequest>,
) -> impl IntoResponse {
    let limits = state.config.bulk();
    match BulkShiftsService::process(state.store.as_ref(), &state.emitter, &limits, &ctx, &payload)
        .await
    {
        Ok(result) => {
            let response = ApiResponse::success(result, "Bulk operation processed");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}
