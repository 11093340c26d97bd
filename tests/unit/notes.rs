use super::{Fixture, ctx};
use shift_backend::{
    db::enums::{NoteStatus, NoteType, NotificationKind},
    error::AppError,
    routes::notes::{CreateNoteRequest, NoteQuery},
    services::NotesService,
};

fn absence(from: &str, to: &str) -> CreateNoteRequest {
    CreateNoteRequest {
        note_type: Some("ABSENCE".to_string()),
        title: Some("Forespørsel om fravær".to_string()),
        body: Some("Ønsker å ta fri".to_string()),
        date_from: Some(from.to_string()),
        date_to: Some(to.to_string()),
        ..CreateNoteRequest::default()
    }
}

#[tokio::test]
async fn created_note_is_pending_and_authored_by_caller() {
    let f = Fixture::new().await;
    let note = NotesService::create(f.store(), &f.emitter, &ctx(&f.alice), &absence("2026-01-15", "2026-01-16"))
        .await
        .unwrap();
    assert_eq!(note.note.status, NoteStatus::Pending);
    assert_eq!(note.note.note_type, NoteType::Absence);
    assert_eq!(note.note.created_by_user_id, f.alice.id);
    assert_eq!(note.note.visibility, "ALL");
    assert_eq!(note.created_by.unwrap().name, "Alice");

    let notification = &f.notifications().await[0];
    assert_eq!(notification.kind, NotificationKind::NoteCreated);
    assert_eq!(notification.message, "Nytt notat opprettet: Forespørsel om fravær");
}

#[tokio::test]
async fn reversed_range_and_missing_body_are_rejected() {
    let f = Fixture::new().await;
    let err = NotesService::create(f.store(), &f.emitter, &ctx(&f.alice), &absence("2026-01-16", "2026-01-15"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));

    let mut no_body = absence("2026-01-15", "2026-01-15");
    no_body.body = None;
    let err = NotesService::create(f.store(), &f.emitter, &ctx(&f.alice), &no_body)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { ref message } if message == "Missing required fields"));

    let mut bad_type = absence("2026-01-15", "2026-01-15");
    bad_type.note_type = Some("VACATION".to_string());
    assert!(
        NotesService::create(f.store(), &f.emitter, &ctx(&f.alice), &bad_type)
            .await
            .is_err()
    );
}

#[tokio::test]
async fn employees_cannot_self_approve_on_create() {
    let f = Fixture::new().await;
    let mut approved = absence("2026-01-15", "2026-01-15");
    approved.status = Some("APPROVED".to_string());
    let err = NotesService::create(f.store(), &f.emitter, &ctx(&f.alice), &approved)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden { .. }));
}

#[tokio::test]
async fn status_change_notifies_the_author() {
    let f = Fixture::new().await;
    let note = NotesService::create(f.store(), &f.emitter, &ctx(&f.alice), &absence("2026-01-15", "2026-01-16"))
        .await
        .unwrap();

    let err = NotesService::set_status(f.store(), &f.emitter, &ctx(&f.bob), note.note.id, Some("APPROVED"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden { .. }));

    let err = NotesService::set_status(f.store(), &f.emitter, &ctx(&f.leader), note.note.id, Some("DONE"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { ref message } if message == "Invalid status"));

    let updated = NotesService::set_status(f.store(), &f.emitter, &ctx(&f.leader), note.note.id, Some("APPROVED"))
        .await
        .unwrap();
    assert_eq!(updated.status, NoteStatus::Approved);

    let notification = &f.notifications().await[0];
    assert_eq!(notification.kind, NotificationKind::NoteStatusChanged);
    assert_eq!(notification.user_id, Some(f.alice.id));
    assert_eq!(notification.title, "Notat godkjent");
}

#[tokio::test]
async fn list_filters_by_overlapping_range() {
    let f = Fixture::new().await;
    for (from, to) in [("2026-01-05", "2026-01-11"), ("2026-01-15", "2026-01-16"), ("2026-02-01", "2026-02-03")] {
        NotesService::create(f.store(), &f.emitter, &ctx(&f.alice), &absence(from, to))
            .await
            .unwrap();
    }

    let january_mid = NotesService::list(
        f.store(),
        &ctx(&f.leader),
        &NoteQuery {
            team_id: None,
            date_from: Some("2026-01-10".to_string()),
            date_to: Some("2026-01-15".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(january_mid.len(), 2);

    let all = NotesService::list(f.store(), &ctx(&f.leader), &NoteQuery::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
}
