use crate::AppState;
use crate::db::models::ApiResponse;
use crate::services::context::RequestContext;
use crate::services::notifications_service::NotificationsService;
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
pub struct NotificationQuery {
    pub user_id: Option<Uuid>,
    pub team_id: Option<Uuid>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct SettingsQuery {
    pub team_id: Option<Uuid>,
}

#[derive(Deserialize, Validate, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub team_id: Option<Uuid>,
    #[serde(default = "default_email_enabled")]
    pub email_enabled: bool,
    #[validate(length(max = 2048, message = "SMS endpoint is too long"))]
    pub sms_endpoint: Option<String>,
}

fn default_email_enabled() -> bool {
    true
}

pub async fn get_notifications(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Query(query): Query<NotificationQuery>,
) -> impl IntoResponse {
    match NotificationsService::list(state.store.as_ref(), &ctx, query.user_id, query.team_id)
        .await
    {
        Ok(notifications) => {
            let response =
                ApiResponse::success(notifications, "Notifications retrieved successfully");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn mark_notification_read(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(notification_id): Path<Uuid>,
) -> impl IntoResponse {
    match NotificationsService::mark_read(state.store.as_ref(), &ctx, notification_id).await {
        Ok(notification) => {
            let response = ApiResponse::success(notification, "Notification marked as read");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn get_notification_settings(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Query(query): Query<SettingsQuery>,
) -> impl IntoResponse {
    let team_id = query.team_id.unwrap_or(ctx.team_id);
    match NotificationsService::get_settings(state.store.as_ref(), team_id).await {
        Ok(settings) => {
            let response =
                ApiResponse::success(settings, "Notification settings retrieved successfully");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn update_notification_settings(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    ValidatedJson(payload): ValidatedJson<UpdateSettingsRequest>,
) -> impl IntoResponse {
    let team_id = payload.team_id.unwrap_or(ctx.team_id);
    match NotificationsService::update_settings(
        state.store.as_ref(),
        &ctx,
        team_id,
        payload.email_enabled,
        payload.sms_endpoint,
    )
    .await
    {
        Ok(settings) => {
            let response =
                ApiResponse::success(settings, "Notification settings updated successfully");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}
