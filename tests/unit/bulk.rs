use super::{Fixture, ctx};
use async_trait::async_trait;
use shift_backend::{
    db::enums::NotificationKind,
    db::models::{Notification, NotificationSettings},
    error::{AppError, AppResult},
    routes::shifts::{BulkShiftItem, BulkShiftRequest},
    services::BulkShiftsService,
    services::notifications_service::{DeliveryChannel, NotificationEmitter},
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use uuid::Uuid;

/// Takes longer to deliver than a bulk item is allowed to plan.
struct SlowChannel {
    delivered: AtomicUsize,
}

#[async_trait]
impl DeliveryChannel for SlowChannel {
    fn name(&self) -> &'static str {
        "slow"
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
        tokio::time::sleep(Duration::from_millis(200)).await;
        self.delivered.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn item(user_id: Uuid, date: &str, shift_type_id: Uuid, start: &str, end: &str) -> BulkShiftItem {
    BulkShiftItem {
        user_id: Some(user_id),
        date: Some(date.to_string()),
        shift_type_id: Some(shift_type_id),
        start_time: Some(start.to_string()),
        end_time: Some(end.to_string()),
        ..BulkShiftItem::default()
    }
}

fn request(action: &str, items: Vec<BulkShiftItem>) -> BulkShiftRequest {
    BulkShiftRequest {
        action: action.to_string(),
        team_id: None,
        items,
    }
}

#[tokio::test]
async fn failing_item_does_not_stop_the_batch() {
    let f = Fixture::new().await;
    let req = request(
        "create",
        vec![
            item(f.alice.id, "2026-01-05", f.dag.id, "08:00", "16:00"),
            item(f.alice.id, "2026-01-06", Uuid::new_v4(), "08:00", "16:00"),
            item(f.bob.id, "2026-01-05", f.n1.id, "22:45", "08:15"),
        ],
    );

    let result = BulkShiftsService::process(f.store(), &f.emitter, &f.limits(), &ctx(&f.leader), &req)
        .await
        .unwrap();

    let indices: Vec<usize> = result.successes.iter().map(|s| s.index).collect();
    assert_eq!(indices, vec![0, 2]);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].index, 1);
    assert_eq!(result.failures[0].error, "Shift type not found");
    assert_eq!(result.failures[0].date.as_deref(), Some("2026-01-06"));

    let created = f.notifications().await;
    assert_eq!(created.len(), 2);
    assert!(created.iter().all(|n| n.kind == NotificationKind::ShiftCreated));
}

#[tokio::test]
async fn results_stay_in_input_order_across_sub_batches() {
    let f = Fixture::new().await;
    let items: Vec<BulkShiftItem> = (1..=9)
        .map(|day| item(f.alice.id, &format!("2026-03-0{}", day), f.dag.id, "08:00", "16:00"))
        .collect();
    let mut limits = f.limits();
    limits.batch_size = 4;

    let result = BulkShiftsService::process(
        f.store(),
        &f.emitter,
        &limits,
        &ctx(&f.leader),
        &request("create", items),
    )
    .await
    .unwrap();
    let indices: Vec<usize> = result.successes.iter().map(|s| s.index).collect();
    assert_eq!(indices, (0..9).collect::<Vec<_>>());
}

#[tokio::test]
async fn create_rejects_existing_and_update_rejects_missing() {
    let f = Fixture::new().await;
    let leader = ctx(&f.leader);
    BulkShiftsService::process(
        f.store(),
        &f.emitter,
        &f.limits(),
        &leader,
        &request("create", vec![item(f.alice.id, "2026-01-05", f.dag.id, "08:00", "16:00")]),
    )
    .await
    .unwrap();

    let again = BulkShiftsService::process(
        f.store(),
        &f.emitter,
        &f.limits(),
        &leader,
        &request("create", vec![item(f.alice.id, "2026-01-05", f.n1.id, "22:45", "08:15")]),
    )
    .await
    .unwrap();
    assert_eq!(again.failures[0].error, "Shift already exists");

    let update = BulkShiftsService::process(
        f.store(),
        &f.emitter,
        &f.limits(),
        &leader,
        &request(
            "update",
            vec![
                item(f.alice.id, "2026-01-05", f.n1.id, "22:45", "08:15"),
                item(f.bob.id, "2026-01-05", f.n1.id, "22:45", "08:15"),
            ],
        ),
    )
    .await
    .unwrap();
    assert_eq!(update.successes.len(), 1);
    assert_eq!(update.failures[0].index, 1);
    assert_eq!(update.failures[0].error, "Shift not found");

    let shift = f
        .store
        .find_shift(update.successes[0].shift_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(shift.shift_type_id, f.n1.id);
    assert_eq!(shift.end_date_time.date(), shift.date.succ_opt().unwrap());
}

#[tokio::test]
async fn delete_by_shift_id_needs_no_times() {
    let f = Fixture::new().await;
    let leader = ctx(&f.leader);
    let created = BulkShiftsService::process(
        f.store(),
        &f.emitter,
        &f.limits(),
        &leader,
        &request("create", vec![item(f.bob.id, "2026-01-07", f.dag.id, "08:00", "16:00")]),
    )
    .await
    .unwrap();
    let shift_id = created.successes[0].shift_id;

    let deleted = BulkShiftsService::process(
        f.store(),
        &f.emitter,
        &f.limits(),
        &leader,
        &request(
            "delete",
            vec![
                BulkShiftItem {
                    shift_id: Some(shift_id),
                    ..BulkShiftItem::default()
                },
                BulkShiftItem::default(),
            ],
        ),
    )
    .await
    .unwrap();
    assert_eq!(deleted.successes[0].shift_id, shift_id);
    assert_eq!(deleted.successes[0].date, "2026-01-07");
    assert_eq!(deleted.failures[0].error, "Shift is required");
    assert!(f.store.find_shift(shift_id).await.unwrap().is_none());
}

#[tokio::test]
async fn per_item_format_and_membership_errors() {
    let f = Fixture::new().await;
    let mut missing_times = item(f.alice.id, "2026-01-05", f.dag.id, "08:00", "16:00");
    missing_times.end_time = None;

    let result = BulkShiftsService::process(
        f.store(),
        &f.emitter,
        &f.limits(),
        &ctx(&f.admin),
        &request(
            "create",
            vec![
                item(f.alice.id, "2026-13-01", f.dag.id, "08:00", "16:00"),
                item(f.alice.id, "2026-01-05", f.dag.id, "8", "16:00"),
                missing_times,
                item(Uuid::new_v4(), "2026-01-05", f.dag.id, "08:00", "16:00"),
                BulkShiftItem {
                    date: Some("2026-01-05".to_string()),
                    ..BulkShiftItem::default()
                },
            ],
        ),
    )
    .await
    .unwrap();

    let reasons: Vec<&str> = result.failures.iter().map(|f| f.error.as_str()).collect();
    assert_eq!(
        reasons,
        vec![
            "Invalid date format",
            "Invalid time format",
            "shiftTypeId, startTime, and endTime are required",
            "User not found",
            "userId and date are required",
        ]
    );
    assert!(result.successes.is_empty());
}

#[tokio::test]
async fn whole_batch_rejections() {
    let f = Fixture::new().await;
    let one = vec![item(f.alice.id, "2026-01-05", f.dag.id, "08:00", "16:00")];

    let err = BulkShiftsService::process(
        f.store(),
        &f.emitter,
        &f.limits(),
        &ctx(&f.alice),
        &request("create", one.clone()),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden { .. }));

    let err = BulkShiftsService::process(
        f.store(),
        &f.emitter,
        &f.limits(),
        &ctx(&f.leader),
        &request("upsert", one.clone()),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation { ref message } if message == "Invalid action"));

    let err = BulkShiftsService::process(
        f.store(),
        &f.emitter,
        &f.limits(),
        &ctx(&f.leader),
        &request("create", Vec::new()),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));

    let mut limits = f.limits();
    limits.max_items = 2;
    let err = BulkShiftsService::process(
        f.store(),
        &f.emitter,
        &limits,
        &ctx(&f.leader),
        &request("create", vec![one[0].clone(); 3]),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation { ref message } if message == "Too many items (max 2)"));

    let mut other_team = request("create", one);
    other_team.team_id = Some(Uuid::new_v4());
    let err = BulkShiftsService::process(
        f.store(),
        &f.emitter,
        &f.limits(),
        &ctx(&f.leader),
        &other_team,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden { .. }));

    let err = BulkShiftsService::process(
        f.store(),
        &f.emitter,
        &f.limits(),
        &ctx(&f.admin),
        &other_team,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));

    assert!(f.notifications().await.is_empty());
}

#[tokio::test]
async fn applied_write_is_reported_even_when_slower_than_the_item_timeout() {
    let f = Fixture::new().await;
    let channel = Arc::new(SlowChannel {
        delivered: AtomicUsize::new(0),
    });
    let emitter = NotificationEmitter::with_channels(f.store.clone(), vec![channel.clone()]);
    let mut limits = f.limits();
    limits.item_timeout_ms = 50;

    let result = BulkShiftsService::process(
        f.store(),
        &emitter,
        &limits,
        &ctx(&f.leader),
        &request("create", vec![item(f.alice.id, "2026-01-05", f.dag.id, "08:00", "16:00")]),
    )
    .await
    .unwrap();

    assert!(result.failures.is_empty());
    assert_eq!(result.successes.len(), 1);
    let shift = f
        .store
        .find_shift(result.successes[0].shift_id)
        .await
        .unwrap();
    assert!(shift.is_some());
    assert_eq!(channel.delivered.load(Ordering::SeqCst), 1);
    assert_eq!(f.notifications().await.len(), 1);
}
