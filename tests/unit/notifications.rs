use super::{Fixture, ctx};
use async_trait::async_trait;
use shift_backend::{
    db::enums::NotificationKind,
    db::models::{Notification, NotificationSettings},
    error::{AppError, AppResult},
    services::NotificationsService,
    services::notifications_service::{DeliveryChannel, NotificationDraft, NotificationEmitter},
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

struct BrokenChannel {
    attempts: AtomicUsize,
}

#[async_trait]
impl DeliveryChannel for BrokenChannel {
    fn name(&self) -> &'static str {
        "broken"
    }

    fn enabled_for(&self, _settings: &NotificationSettings, _notification: &Notification) -> bool {
        true
    }

    async fn deliver(
        &self,
        _settings: &NotificationSettings,
        _recipient: Option<&str>,
        _notification: &Notification,
    ) -> AppResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(AppError::internal("gateway down"))
    }
}

#[tokio::test]
async fn delivery_failure_does_not_lose_the_notification() {
    let f = Fixture::new().await;
    let channel = Arc::new(BrokenChannel {
        attempts: AtomicUsize::new(0),
    });
    let emitter = NotificationEmitter::with_channels(f.store.clone(), vec![channel.clone()]);

    let recorded = emitter
        .emit(NotificationDraft::new(
            f.team.id,
            Some(f.alice.id),
            NotificationKind::ShiftCreated,
            "Vakt opprettet",
            "Ny vakt 2026-01-05",
        ))
        .await;

    assert!(recorded.is_some());
    assert_eq!(channel.attempts.load(Ordering::SeqCst), 1);
    assert_eq!(f.notifications().await.len(), 1);
}

#[tokio::test]
async fn only_the_recipient_can_mark_a_targeted_notification_read() {
    let f = Fixture::new().await;
    let notification = f
        .emitter
        .emit(NotificationDraft::new(
            f.team.id,
            Some(f.alice.id),
            NotificationKind::ShiftUpdated,
            "Vakt oppdatert",
            "Vakten din er endret",
        ))
        .await
        .unwrap();

    let err = NotificationsService::mark_read(f.store(), &ctx(&f.bob), notification.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden { .. }));

    let read = NotificationsService::mark_read(f.store(), &ctx(&f.alice), notification.id)
        .await
        .unwrap();
    assert!(read.read);

    let mine = NotificationsService::list(f.store(), &ctx(&f.alice), Some(f.alice.id), None)
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);
    let bobs = NotificationsService::list(f.store(), &ctx(&f.bob), Some(f.bob.id), None)
        .await
        .unwrap();
    assert!(bobs.is_empty());
}

#[tokio::test]
async fn settings_default_to_email_and_only_admins_change_them() {
    let f = Fixture::new().await;
    let settings = NotificationsService::get_settings(f.store(), f.team.id)
        .await
        .unwrap();
    assert!(settings.email_enabled);
    assert!(settings.sms_endpoint.is_none());

    let err = NotificationsService::update_settings(
        f.store(),
        &ctx(&f.leader),
        f.team.id,
        false,
        None,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden { .. }));

    let updated = NotificationsService::update_settings(
        f.store(),
        &ctx(&f.admin),
        f.team.id,
        false,
        Some("  ".to_string()),
    )
    .await
    .unwrap();
    assert!(!updated.email_enabled);
    assert!(updated.sms_endpoint.is_none());

    let err = NotificationsService::get_settings(f.store(), uuid::Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
}
