use super::{Fixture, add_user, ctx};
use chrono::NaiveDateTime;
use shift_backend::{
    db::enums::{NotificationKind, UserRole},
    db::models::NewTeam,
    error::AppError,
    routes::shifts::{ShiftQuery, ShiftRequest},
    services::ShiftsService,
};
use std::sync::Arc;

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").unwrap()
}

#[tokio::test]
async fn night_shift_ends_the_next_morning() {
    let f = Fixture::new().await;
    let req = f.shift_request(&f.alice, "2026-01-05", &f.n1);

    let detail = ShiftsService::create(f.store(), &f.emitter, &ctx(&f.leader), &req)
        .await
        .unwrap();
    assert_eq!(detail.shift.start_date_time, at("2026-01-05T22:45"));
    assert_eq!(detail.shift.end_date_time, at("2026-01-06T08:15"));
    assert_eq!(detail.shift_type.unwrap().code, "N1");
    assert_eq!(detail.user.unwrap().name, "Alice");

    let notifications = f.notifications().await;
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::ShiftCreated);
    assert_eq!(notifications[0].user_id, Some(f.alice.id));
}

#[tokio::test]
async fn team_is_taken_from_the_user_when_omitted() {
    let f = Fixture::new().await;
    let req = f.shift_request(&f.bob, "2026-01-06", &f.dag);
    let detail = ShiftsService::create(f.store(), &f.emitter, &ctx(&f.admin), &req)
        .await
        .unwrap();
    assert_eq!(detail.shift.team_id, f.team.id);
}

#[tokio::test]
async fn employees_cannot_create_shifts() {
    let f = Fixture::new().await;
    let req = f.shift_request(&f.alice, "2026-01-05", &f.dag);
    let err = ShiftsService::create(f.store(), &f.emitter, &ctx(&f.alice), &req)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden { .. }));

    let shifts = ShiftsService::list(f.store(), &ctx(&f.alice), &ShiftQuery::default())
        .await
        .unwrap();
    assert!(shifts.is_empty());
    assert!(f.notifications().await.is_empty());
}

#[tokio::test]
async fn missing_fields_and_bad_formats_are_validation_errors() {
    let f = Fixture::new().await;
    let leader = ctx(&f.leader);

    let err = ShiftsService::create(f.store(), &f.emitter, &leader, &ShiftRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { ref message } if message == "Missing required fields"));

    let mut req = f.shift_request(&f.alice, "05.01.2026", &f.dag);
    let err = ShiftsService::create(f.store(), &f.emitter, &leader, &req)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));

    req.date = Some("2026-01-05".to_string());
    req.start_time = Some("8:00".to_string());
    let err = ShiftsService::create(f.store(), &f.emitter, &leader, &req)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { ref message } if message == "Invalid time format"));
}

#[tokio::test]
async fn unknown_user_or_type_is_not_found() {
    let f = Fixture::new().await;
    let mut req = f.shift_request(&f.alice, "2026-01-05", &f.dag);
    req.shift_type_id = Some(uuid::Uuid::new_v4());
    let err = ShiftsService::create(f.store(), &f.emitter, &ctx(&f.leader), &req)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));

    let mut req = f.shift_request(&f.alice, "2026-01-05", &f.dag);
    req.user_id = Some(uuid::Uuid::new_v4());
    let err = ShiftsService::create(f.store(), &f.emitter, &ctx(&f.leader), &req)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
}

#[tokio::test]
async fn second_shift_on_the_same_day_is_a_conflict() {
    let f = Fixture::new().await;
    let leader = ctx(&f.leader);
    ShiftsService::create(f.store(), &f.emitter, &leader, &f.shift_request(&f.alice, "2026-01-05", &f.dag))
        .await
        .unwrap();

    let err = ShiftsService::create(
        f.store(),
        &f.emitter,
        &leader,
        &f.shift_request(&f.alice, "2026-01-05", &f.n1),
    )
    .await
    .unwrap_err();
    assert_eq!(err.conflict_code(), Some("SHIFT_001"));
}

#[tokio::test]
async fn concurrent_creates_for_one_day_persist_once() {
    let f = Arc::new(Fixture::new().await);
    let leader = ctx(&f.leader);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let f = f.clone();
        let leader = leader.clone();
        handles.push(tokio::spawn(async move {
            let req = f.shift_request(&f.alice, "2026-02-01", &f.dag);
            ShiftsService::create(f.store(), &f.emitter, &leader, &req).await
        }));
    }

    let mut created = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(e) if e.conflict_code() == Some("SHIFT_001") => conflicts += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(created, 1);
    assert_eq!(conflicts, 7);

    let shifts = ShiftsService::list(f.store(), &leader, &ShiftQuery::default())
        .await
        .unwrap();
    assert_eq!(shifts.len(), 1);
}

#[tokio::test]
async fn update_recomputes_times_and_notifies_previous_owner() {
    let f = Fixture::new().await;
    let leader = ctx(&f.leader);
    let created = ShiftsService::create(
        f.store(),
        &f.emitter,
        &leader,
        &f.shift_request(&f.alice, "2026-01-05", &f.dag),
    )
    .await
    .unwrap();

    let req = f.shift_request(&f.bob, "2026-01-05", &f.n1);
    let updated = ShiftsService::update(f.store(), &f.emitter, &leader, created.shift.id, &req)
        .await
        .unwrap();
    assert_eq!(updated.shift.user_id, f.bob.id);
    assert_eq!(updated.shift.end_date_time, at("2026-01-06T08:15"));

    let latest = &f.notifications().await[0];
    assert_eq!(latest.kind, NotificationKind::ShiftUpdated);
    assert_eq!(latest.user_id, Some(f.alice.id));
}

#[tokio::test]
async fn update_onto_an_occupied_day_is_a_conflict() {
    let f = Fixture::new().await;
    let leader = ctx(&f.leader);
    ShiftsService::create(f.store(), &f.emitter, &leader, &f.shift_request(&f.bob, "2026-01-05", &f.dag))
        .await
        .unwrap();
    let alice_shift = ShiftsService::create(
        f.store(),
        &f.emitter,
        &leader,
        &f.shift_request(&f.alice, "2026-01-05", &f.dag),
    )
    .await
    .unwrap();

    let req = f.shift_request(&f.bob, "2026-01-05", &f.dag);
    let err = ShiftsService::update(f.store(), &f.emitter, &leader, alice_shift.shift.id, &req)
        .await
        .unwrap_err();
    assert_eq!(err.conflict_code(), Some("SHIFT_001"));
}

#[tokio::test]
async fn delete_removes_the_shift_and_reports_missing_ones() {
    let f = Fixture::new().await;
    let leader = ctx(&f.leader);
    let created = ShiftsService::create(
        f.store(),
        &f.emitter,
        &leader,
        &f.shift_request(&f.alice, "2026-01-05", &f.dag),
    )
    .await
    .unwrap();

    ShiftsService::delete(f.store(), &f.emitter, &leader, created.shift.id)
        .await
        .unwrap();
    assert!(f.store.find_shift(created.shift.id).await.unwrap().is_none());
    assert_eq!(f.notifications().await[0].kind, NotificationKind::ShiftDeleted);

    let err = ShiftsService::delete(f.store(), &f.emitter, &leader, created.shift.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
}

#[tokio::test]
async fn list_filters_by_date_range_only_when_both_bounds_are_given() {
    let f = Fixture::new().await;
    let leader = ctx(&f.leader);
    for date in ["2026-01-05", "2026-01-06", "2026-01-12"] {
        ShiftsService::create(f.store(), &f.emitter, &leader, &f.shift_request(&f.alice, date, &f.dag))
            .await
            .unwrap();
    }

    let week = ShiftsService::list(
        f.store(),
        &leader,
        &ShiftQuery {
            date_from: Some("2026-01-05".to_string()),
            date_to: Some("2026-01-11".to_string()),
            ..ShiftQuery::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(week.len(), 2);
    assert!(week[0].shift.date < week[1].shift.date);

    let open_ended = ShiftsService::list(
        f.store(),
        &leader,
        &ShiftQuery {
            date_from: Some("2026-01-10".to_string()),
            ..ShiftQuery::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(open_ended.len(), 3);
}

#[tokio::test]
async fn leaders_only_edit_their_own_team() {
    let f = Fixture::new().await;
    let other = f.store.create_team(NewTeam::new("Legevakt")).await.unwrap();
    let outsider = add_user(&f.store, &other, "Other Leader", UserRole::Leader).await;
    let outsider = ctx(&outsider);

    let mut req = f.shift_request(&f.alice, "2026-01-05", &f.dag);
    req.team_id = Some(f.team.id);
    let err = ShiftsService::create(f.store(), &f.emitter, &outsider, &req)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden { .. }));

    let created = ShiftsService::create(f.store(), &f.emitter, &ctx(&f.leader), &req)
        .await
        .unwrap();

    let err = ShiftsService::update(f.store(), &f.emitter, &outsider, created.shift.id, &req)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden { .. }));

    let err = ShiftsService::delete(f.store(), &f.emitter, &outsider, created.shift.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden { .. }));
    assert!(f.store.find_shift(created.shift.id).await.unwrap().is_some());

    ShiftsService::delete(f.store(), &f.emitter, &ctx(&f.admin), created.shift.id)
        .await
        .unwrap();
}
