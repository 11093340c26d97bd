use crate::AppState;
use crate::db::models::ApiResponse;
use crate::services::context::RequestContext;
use crate::services::swap_requests_service::SwapRequestsService;
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

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SwapQuery {
    pub team_id: Option<Uuid>,
}

#[derive(Deserialize, Validate, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateSwapRequest {
    pub team_id: Option<Uuid>,
    pub requested_by_user_id: Option<Uuid>,
    pub shift_id: Option<Uuid>,
    pub to_user_id: Option<Uuid>,
    #[validate(length(max = 1000, message = "Message is too long"))]
    pub message: Option<String>,
}

pub async fn get_swap_requests(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Query(query): Query<SwapQuery>,
) -> impl IntoResponse {
    match SwapRequestsService::list(state.store.as_ref(), &ctx, query.team_id).await {
        Ok(requests) => {
            let response = ApiResponse::success(requests, "Swap requests retrieved successfully");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn create_swap_request(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    ValidatedJson(payload): ValidatedJson<CreateSwapRequest>,
) -> impl IntoResponse {
    match SwapRequestsService::create(state.store.as_ref(), &state.emitter, &ctx, &payload).await {
        Ok(request) => {
            let response = ApiResponse::created(request, "Swap request created successfully");
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn approve_swap_request(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(request_id): Path<Uuid>,
) -> impl IntoResponse {
    match SwapRequestsService::approve(state.store.as_ref(), &state.emitter, &ctx, request_id).await
    {
        Ok(request) => {
            let response = ApiResponse::success(request, "Swap request approved");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn reject_swap_request(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(request_id): Path<Uuid>,
) -> impl IntoResponse {
    match SwapRequestsService::reject(state.store.as_ref(), &state.emitter, &ctx, request_id).await
    {
        Ok(request) => {
            let response = ApiResponse::success(request, "Swap request rejected");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn execute_swap_request(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(request_id): Path<Uuid>,
) -> impl IntoResponse {
    match SwapRequestsService::execute(state.store.as_ref(), &state.emitter, &ctx, request_id).await
    {
        Ok(request) => {
            let response = ApiResponse::success(request, "Swap request executed");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}
