use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::enums::NotificationKind,
    db::models::{Notification, NotificationFilter, NotificationSettings},
    db::store::Store,
    error::{AppError, AppResult},
    services::authz::{self, Action},
    services::context::RequestContext,
};

pub const NOTIFICATION_LIST_LIMIT: usize = 50;

/// What a mutation wants recorded; ids and timestamps are filled in on emit.
#[derive(Debug, Clone)]
pub struct NotificationDraft {
    pub team_id: Uuid,
    pub user_id: Option<Uuid>,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

impl NotificationDraft {
    pub fn new(
        team_id: Uuid,
        user_id: Option<Uuid>,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            team_id,
            user_id,
            kind,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Outbound delivery transport invoked after a notification is recorded.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this channel should fire for the team's current settings.
    fn enabled_for(&self, settings: &NotificationSettings, notification: &Notification) -> bool;

    async fn deliver(
        &self,
        settings: &NotificationSettings,
        recipient: Option<&str>,
        notification: &Notification,
    ) -> AppResult<()>;
}

/// Logs the email that would be sent. Needs a targeted user.
pub struct EmailStub;

#[async_trait]
impl DeliveryChannel for EmailStub {
    fn name(&self) -> &'static str {
        "email"
    }

    fn enabled_for(&self, settings: &NotificationSettings, notification: &Notification) -> bool {
        settings.email_enabled && notification.user_id.is_some()
    }

    async fn deliver(
        &self,
        _settings: &NotificationSettings,
        recipient: Option<&str>,
        notification: &Notification,
    ) -> AppResult<()> {
        tracing::info!(
            channel = "email",
            to = recipient.unwrap_or("unknown"),
            subject = %notification.title,
            body = %notification.message,
            "email notification (stub)"
        );
        Ok(())
    }
}

/// Logs the SMS that would be posted to the team's endpoint.
pub struct SmsStub;

#[async_trait]
impl DeliveryChannel for SmsStub {
    fn name(&self) -> &'static str {
        "sms"
    }

    fn enabled_for(&self, settings: &NotificationSettings, _notification: &Notification) -> bool {
        settings.sms_endpoint.is_some()
    }

    async fn deliver(
        &self,
        settings: &NotificationSettings,
        _recipient: Option<&str>,
        notification: &Notification,
    ) -> AppResult<()> {
        tracing::info!(
            channel = "sms",
            endpoint = settings.sms_endpoint.as_deref().unwrap_or_default(),
            team_id = %notification.team_id,
            message = %notification.message,
            "sms notification (stub)"
        );
        Ok(())
    }
}

/// Records notifications and fans them out to delivery channels.
///
/// Emission never fails the caller: store or channel errors are logged and
/// swallowed, the triggering mutation stands.
#[derive(Clone)]
pub struct NotificationEmitter {
    store: Arc<dyn Store>,
    channels: Vec<Arc<dyn DeliveryChannel>>,
}

impl NotificationEmitter {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self::with_channels(store, vec![Arc::new(EmailStub), Arc::new(SmsStub)])
    }

    pub fn with_channels(store: Arc<dyn Store>, channels: Vec<Arc<dyn DeliveryChannel>>) -> Self {
        Self { store, channels }
    }

    pub async fn emit(&self, draft: NotificationDraft) -> Option<Notification> {
        let notification = Notification {
            id: Uuid::new_v4(),
            team_id: draft.team_id,
            user_id: draft.user_id,
            kind: draft.kind,
            title: draft.title,
            message: draft.message,
            read: false,
            created_at: chrono::Utc::now(),
        };

        let notification = match self.store.insert_notification(notification).await {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(
                    team_id = %draft.team_id,
                    kind = draft.kind.as_str(),
                    error = %e,
                    "failed to record notification"
                );
                return None;
            }
        };

        self.deliver(&notification).await;
        Some(notification)
    }

    async fn deliver(&self, notification: &Notification) {
        let settings = match self.store.find_notification_settings(notification.team_id).await {
            Ok(Some(settings)) => settings,
            Ok(None) => NotificationSettings::defaults_for(notification.team_id),
            Err(e) => {
                tracing::warn!(team_id = %notification.team_id, error = %e, "failed to load notification settings");
                return;
            }
        };

        let mut recipient: Option<String> = None;
        if let Some(user_id) = notification.user_id {
            match self.store.find_user(user_id).await {
                Ok(user) => recipient = user.map(|u| u.email),
                Err(e) => tracing::warn!(%user_id, error = %e, "failed to resolve recipient"),
            }
        }

        for channel in &self.channels {
            if !channel.enabled_for(&settings, notification) {
                continue;
            }
            if let Err(e) = channel
                .deliver(&settings, recipient.as_deref(), notification)
                .await
            {
                tracing::warn!(
                    channel = channel.name(),
                    notification_id = %notification.id,
                    error = %e,
                    "notification delivery failed"
                );
            }
        }
    }
}

pub struct NotificationsService;

impl NotificationsService {
    /// Defaults to the caller's team when neither filter is given.
    pub async fn list(
        store: &dyn Store,
        ctx: &RequestContext,
        user_id: Option<Uuid>,
        team_id: Option<Uuid>,
    ) -> AppResult<Vec<Notification>> {
        let filter = match (user_id, team_id) {
            (None, None) => NotificationFilter {
                user_id: None,
                team_id: Some(ctx.team_id),
            },
            (user_id, team_id) => NotificationFilter { user_id, team_id },
        };
        Ok(store.list_notifications(filter, NOTIFICATION_LIST_LIMIT).await?)
    }

    pub async fn mark_read(
        store: &dyn Store,
        ctx: &RequestContext,
        notification_id: Uuid,
    ) -> AppResult<Notification> {
        let notification = store
            .find_notification(notification_id)
            .await?
            .ok_or_else(|| AppError::not_found("Notification not found"))?;

        let allowed = match notification.user_id {
            Some(recipient) => recipient == ctx.user_id,
            None => notification.team_id == ctx.team_id,
        };
        if !allowed {
            return Err(AppError::forbidden("Cannot mark another user's notification"));
        }

        store
            .mark_notification_read(notification_id)
            .await?
            .ok_or_else(|| AppError::not_found("Notification not found"))
    }

    /// Creates the default record when the team has none yet.
    pub async fn get_settings(
        store: &dyn Store,
        team_id: Uuid,
    ) -> AppResult<NotificationSettings> {
        if store.find_team(team_id).await?.is_none() {
            return Err(AppError::not_found("Team not found"));
        }
        if let Some(settings) = store.find_notification_settings(team_id).await? {
            return Ok(settings);
        }
        Ok(store
            .upsert_notification_settings(NotificationSettings::defaults_for(team_id))
            .await?)
    }

    pub async fn update_settings(
        store: &dyn Store,
        ctx: &RequestContext,
        team_id: Uuid,
        email_enabled: bool,
        sms_endpoint: Option<String>,
    ) -> AppResult<NotificationSettings> {
        authz::require(ctx, Action::ManageNotificationSettings)?;
        if store.find_team(team_id).await?.is_none() {
            return Err(AppError::not_found("Team not found"));
        }
        let sms_endpoint = sms_endpoint.filter(|s| !s.trim().is_empty());
        let settings = store
            .upsert_notification_settings(NotificationSettings {
                team_id,
                email_enabled,
                sms_endpoint,
            })
            .await?;
        tracing::info!(%team_id, email_enabled, sms = settings.sms_endpoint.is_some(), "notification settings updated");
        Ok(settings)
    }
}
