use crate::AppState;
use crate::db::models::ApiResponse;
use crate::services::context::RequestContext;
use crate::services::teams_service::TeamsService;
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

#[derive(Deserialize, Validate, Debug)]
pub struct CreateTeamRequest {
    #[validate(length(min = 1, max = 255, message = "Team name is required"))]
    pub name: String,
}

pub async fn get_teams(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match TeamsService::list(state.store.as_ref()).await {
        Ok(teams) => {
            let response = ApiResponse::success(teams, "Teams retrieved successfully");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn create_team(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    ValidatedJson(payload): ValidatedJson<CreateTeamRequest>,
) -> impl IntoResponse {
    match TeamsService::create(state.store.as_ref(), &ctx, &payload).await {
        Ok(team) => {
            let response = ApiResponse::created(team, "Team created successfully");
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn delete_team(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(team_id): Path<Uuid>,
) -> impl IntoResponse {
    match TeamsService::delete(state.store.as_ref(), &ctx, team_id).await {
        Ok(()) => {
            let response = ApiResponse::<()>::ok("Team deleted successfully");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}
