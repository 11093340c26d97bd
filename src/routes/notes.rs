use crate::AppState;
use crate::db::models::ApiResponse;
use crate::services::context::RequestContext;
use crate::services::notes_service::NotesService;
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
pub struct NoteQuery {
    pub team_id: Option<Uuid>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

#[derive(Deserialize, Validate, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteRequest {
    pub team_id: Option<Uuid>,
    pub created_by_user_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub note_type: Option<String>,
    pub status: Option<String>,
    #[validate(length(max = 255, message = "Title is too long"))]
    pub title: Option<String>,
    #[validate(length(max = 5000, message = "Note body is too long"))]
    pub body: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

#[derive(Deserialize, Validate, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNoteStatusRequest {
    pub status: Option<String>,
}

pub async fn get_notes(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Query(query): Query<NoteQuery>,
) -> impl IntoResponse {
    match NotesService::list(state.store.as_ref(), &ctx, &query).await {
        Ok(notes) => {
            let response = ApiResponse::success(notes, "Notes retrieved successfully");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn create_note(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    ValidatedJson(payload): ValidatedJson<CreateNoteRequest>,
) -> impl IntoResponse {
    match NotesService::create(state.store.as_ref(), &state.emitter, &ctx, &payload).await {
        Ok(note) => {
            let response = ApiResponse::created(note, "Note created successfully");
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn set_note_status(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(note_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateNoteStatusRequest>,
) -> impl IntoResponse {
    match NotesService::set_status(
        state.store.as_ref(),
        &state.emitter,
        &ctx,
        note_id,
        payload.status.as_deref(),
    )
    .await
    {
        Ok(note) => {
            let response = ApiResponse::success(note, "Note status updated successfully");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}
