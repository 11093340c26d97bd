use super::{Fixture, ctx};
use shift_backend::{
    db::enums::{NotificationKind, SwapRequestStatus},
    db::models::ShiftDetail,
    error::AppError,
    routes::swap_requests::CreateSwapRequest,
    services::{ShiftsService, SwapRequestsService},
};
use uuid::Uuid;

async fn alice_night_shift(f: &Fixture) -> ShiftDetail {
    ShiftsService::create(
        f.store(),
        &f.emitter,
        &ctx(&f.leader),
        &f.shift_request(&f.alice, "2026-01-05", &f.n1),
    )
    .await
    .unwrap()
}

fn swap_to(shift_id: Uuid, to_user_id: Uuid) -> CreateSwapRequest {
    CreateSwapRequest {
        team_id: None,
        requested_by_user_id: None,
        shift_id: Some(shift_id),
        to_user_id: Some(to_user_id),
        message: Some("Kan du ta denne?".to_string()),
    }
}

#[tokio::test]
async fn full_lifecycle_reassigns_the_shift() {
    let f = Fixture::new().await;
    let shift = alice_night_shift(&f).await;

    let created = SwapRequestsService::create(
        f.store(),
        &f.emitter,
        &ctx(&f.alice),
        &swap_to(shift.shift.id, f.bob.id),
    )
    .await
    .unwrap();
    assert_eq!(created.request.status, SwapRequestStatus::Pending);
    assert_eq!(created.request.from_user_id, f.alice.id);
    assert_eq!(created.request.requested_by_user_id, f.alice.id);
    assert_eq!(created.to_user.as_ref().unwrap().name, "Bob");
    assert_eq!(created.shift.as_ref().unwrap().shift.id, shift.shift.id);

    let requested = &f.notifications().await[0];
    assert_eq!(requested.kind, NotificationKind::SwapRequested);
    assert_eq!(requested.user_id, None);

    let request_id = created.request.id;
    let approved = SwapRequestsService::approve(f.store(), &f.emitter, &ctx(&f.leader), request_id)
        .await
        .unwrap();
    assert_eq!(approved.status, SwapRequestStatus::Approved);
    assert!(approved.decided_at.is_some());
    let still_alices = f.store.find_shift(shift.shift.id).await.unwrap().unwrap();
    assert_eq!(still_alices.user_id, f.alice.id);

    let executed = SwapRequestsService::execute(f.store(), &f.emitter, &ctx(&f.leader), request_id)
        .await
        .unwrap();
    assert_eq!(executed.status, SwapRequestStatus::Executed);

    let moved = f.store.find_shift(shift.shift.id).await.unwrap().unwrap();
    assert_eq!(moved.user_id, f.bob.id);

    let notifications = f.notifications().await;
    let executed_for: Vec<Option<Uuid>> = notifications
        .iter()
        .filter(|n| n.kind == NotificationKind::SwapExecuted)
        .map(|n| n.user_id)
        .collect();
    assert_eq!(executed_for.len(), 2);
    assert!(executed_for.contains(&Some(f.alice.id)));
    assert!(executed_for.contains(&Some(f.bob.id)));

    let err = SwapRequestsService::execute(f.store(), &f.emitter, &ctx(&f.leader), request_id)
        .await
        .unwrap_err();
    assert_eq!(err.conflict_code(), Some("SWAP_002"));
    let still_bobs = f.store.find_shift(shift.shift.id).await.unwrap().unwrap();
    assert_eq!(still_bobs.user_id, f.bob.id);
}

#[tokio::test]
async fn rejected_request_cannot_be_executed() {
    let f = Fixture::new().await;
    let shift = alice_night_shift(&f).await;
    let created = SwapRequestsService::create(
        f.store(),
        &f.emitter,
        &ctx(&f.alice),
        &swap_to(shift.shift.id, f.bob.id),
    )
    .await
    .unwrap();
    SwapRequestsService::reject(f.store(), &f.emitter, &ctx(&f.leader), created.request.id)
        .await
        .unwrap();

    let err = SwapRequestsService::execute(f.store(), &f.emitter, &ctx(&f.leader), created.request.id)
        .await
        .unwrap_err();
    assert_eq!(err.conflict_code(), Some("SWAP_002"));
    let unchanged = f.store.find_shift(shift.shift.id).await.unwrap().unwrap();
    assert_eq!(unchanged.user_id, f.alice.id);
    let request = f.store.find_swap_request(created.request.id).await.unwrap().unwrap();
    assert_eq!(request.status, SwapRequestStatus::Rejected);
}

#[tokio::test]
async fn pending_request_cannot_be_executed() {
    let f = Fixture::new().await;
    let shift = alice_night_shift(&f).await;
    let created = SwapRequestsService::create(
        f.store(),
        &f.emitter,
        &ctx(&f.alice),
        &swap_to(shift.shift.id, f.bob.id),
    )
    .await
    .unwrap();

    let err = SwapRequestsService::execute(f.store(), &f.emitter, &ctx(&f.leader), created.request.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict { .. }));
    let unchanged = f.store.find_shift(shift.shift.id).await.unwrap().unwrap();
    assert_eq!(unchanged.user_id, f.alice.id);
}

#[tokio::test]
async fn decisions_only_apply_to_pending_requests() {
    let f = Fixture::new().await;
    let shift = alice_night_shift(&f).await;
    let created = SwapRequestsService::create(
        f.store(),
        &f.emitter,
        &ctx(&f.alice),
        &swap_to(shift.shift.id, f.bob.id),
    )
    .await
    .unwrap();
    let id = created.request.id;

    let rejected = SwapRequestsService::reject(f.store(), &f.emitter, &ctx(&f.admin), id)
        .await
        .unwrap();
    assert_eq!(rejected.status, SwapRequestStatus::Rejected);
    assert_eq!(f.notifications().await[0].user_id, Some(f.alice.id));

    for result in [
        SwapRequestsService::approve(f.store(), &f.emitter, &ctx(&f.admin), id).await,
        SwapRequestsService::reject(f.store(), &f.emitter, &ctx(&f.admin), id).await,
    ] {
        assert_eq!(result.unwrap_err().conflict_code(), Some("SWAP_001"));
    }
}

#[tokio::test]
async fn concurrent_approvals_let_exactly_one_through() {
    let f = Fixture::new().await;
    let shift = alice_night_shift(&f).await;
    let created = SwapRequestsService::create(
        f.store(),
        &f.emitter,
        &ctx(&f.alice),
        &swap_to(shift.shift.id, f.bob.id),
    )
    .await
    .unwrap();
    let id = created.request.id;

    let (leader, admin) = (ctx(&f.leader), ctx(&f.admin));
    let (a, b) = tokio::join!(
        SwapRequestsService::approve(f.store(), &f.emitter, &leader, id),
        SwapRequestsService::reject(f.store(), &f.emitter, &admin, id),
    );
    assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
}

#[tokio::test]
async fn employees_cannot_decide() {
    let f = Fixture::new().await;
    let shift = alice_night_shift(&f).await;
    let created = SwapRequestsService::create(
        f.store(),
        &f.emitter,
        &ctx(&f.alice),
        &swap_to(shift.shift.id, f.bob.id),
    )
    .await
    .unwrap();

    let err = SwapRequestsService::approve(f.store(), &f.emitter, &ctx(&f.bob), created.request.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden { .. }));
}

#[tokio::test]
async fn creation_is_bound_to_the_caller() {
    let f = Fixture::new().await;
    let shift = alice_night_shift(&f).await;

    let mut on_behalf = swap_to(shift.shift.id, f.bob.id);
    on_behalf.requested_by_user_id = Some(f.alice.id);
    let err = SwapRequestsService::create(f.store(), &f.emitter, &ctx(&f.bob), &on_behalf)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden { .. }));

    let err = SwapRequestsService::create(
        f.store(),
        &f.emitter,
        &ctx(&f.alice),
        &swap_to(Uuid::new_v4(), f.bob.id),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));

    let err = SwapRequestsService::create(
        f.store(),
        &f.emitter,
        &ctx(&f.alice),
        &swap_to(shift.shift.id, f.alice.id),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));
}

#[tokio::test]
async fn execute_fails_when_target_already_works_that_day() {
    let f = Fixture::new().await;
    let shift = alice_night_shift(&f).await;
    let created = SwapRequestsService::create(
        f.store(),
        &f.emitter,
        &ctx(&f.alice),
        &swap_to(shift.shift.id, f.bob.id),
    )
    .await
    .unwrap();
    SwapRequestsService::approve(f.store(), &f.emitter, &ctx(&f.leader), created.request.id)
        .await
        .unwrap();

    ShiftsService::create(
        f.store(),
        &f.emitter,
        &ctx(&f.leader),
        &f.shift_request(&f.bob, "2026-01-05", &f.dag),
    )
    .await
    .unwrap();

    let err = SwapRequestsService::execute(f.store(), &f.emitter, &ctx(&f.leader), created.request.id)
        .await
        .unwrap_err();
    assert_eq!(err.conflict_code(), Some("SHIFT_001"));
    let request = f.store.find_swap_request(created.request.id).await.unwrap().unwrap();
    assert_eq!(request.status, SwapRequestStatus::Approved);
}

#[tokio::test]
async fn list_is_newest_first_and_enriched() {
    let f = Fixture::new().await;
    let shift = alice_night_shift(&f).await;
    let first = SwapRequestsService::create(
        f.store(),
        &f.emitter,
        &ctx(&f.alice),
        &swap_to(shift.shift.id, f.bob.id),
    )
    .await
    .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    let second = SwapRequestsService::create(
        f.store(),
        &f.emitter,
        &ctx(&f.alice),
        &swap_to(shift.shift.id, f.leader.id),
    )
    .await
    .unwrap();

    let listed = SwapRequestsService::list(f.store(), &ctx(&f.bob), None)
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].request.id, second.request.id);
    assert_eq!(listed[1].request.id, first.request.id);
    assert_eq!(listed[1].from_user.as_ref().unwrap().name, "Alice");
}
