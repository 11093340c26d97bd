use crate::AppState;
use crate::db::models::ApiResponse;
use crate::services::context::RequestContext;
use crate::services::users_service::UsersService;
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
pub struct UserQuery {
    pub team_id: Option<Uuid>,
}

#[derive(Deserialize, Validate, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub role: Option<String>,
    pub team_id: Uuid,
}

#[derive(Deserialize, Validate, Debug)]
pub struct UpdateUserRoleRequest {
    pub role: String,
}

pub async fn get_users(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UserQuery>,
) -> impl IntoResponse {
    match UsersService::list(state.store.as_ref(), params.team_id).await {
        Ok(users) => {
            let response = ApiResponse::success(users, "Users retrieved successfully");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> impl IntoResponse {
    match UsersService::create(state.store.as_ref(), &ctx, &payload).await {
        Ok(user) => {
            let response = ApiResponse::created(user, "User created successfully");
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(user_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRoleRequest>,
) -> impl IntoResponse {
    match UsersService::update_role(state.store.as_ref(), &ctx, user_id, &payload).await {
        Ok(user) => {
            let response = ApiResponse::success(user, "User updated successfully");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}
