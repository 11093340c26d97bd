use super::{Fixture, ctx};
use shift_backend::{
    error::AppError,
    routes::shift_types::ShiftTypeRequest,
    services::{ShiftTypesService, ShiftsService},
};

fn evening() -> ShiftTypeRequest {
    ShiftTypeRequest {
        code: "K1".to_string(),
        label: "K1 15.00-23.00".to_string(),
        color: "#191970".to_string(),
        default_start_time: "15:00".to_string(),
        default_end_time: "23:00".to_string(),
        crosses_midnight: false,
    }
}

#[tokio::test]
async fn admin_manages_shift_types_and_codes_stay_unique() {
    let f = Fixture::new().await;
    let admin = ctx(&f.admin);

    let created = ShiftTypesService::create(f.store(), &admin, &evening())
        .await
        .unwrap();
    assert_eq!(created.code, "K1");

    let err = ShiftTypesService::create(f.store(), &admin, &evening())
        .await
        .unwrap_err();
    assert_eq!(err.conflict_code(), Some("SHIFT_TYPE_001"));

    let mut renamed = evening();
    renamed.code = "N1".to_string();
    let err = ShiftTypesService::update(f.store(), &admin, created.id, &renamed)
        .await
        .unwrap_err();
    assert_eq!(err.conflict_code(), Some("SHIFT_TYPE_001"));

    let listed = ShiftTypesService::list(f.store()).await.unwrap();
    let codes: Vec<&str> = listed.iter().map(|t| t.code.as_str()).collect();
    assert_eq!(codes, vec!["Dag", "K1", "N1"]);
}

#[tokio::test]
async fn leaders_cannot_define_types_and_bad_colors_are_rejected() {
    let f = Fixture::new().await;
    let err = ShiftTypesService::create(f.store(), &ctx(&f.leader), &evening())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden { .. }));

    let mut bad = evening();
    bad.color = "navy".to_string();
    let err = ShiftTypesService::create(f.store(), &ctx(&f.admin), &bad)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));
}

#[tokio::test]
async fn type_in_use_cannot_be_deleted() {
    let f = Fixture::new().await;
    let admin = ctx(&f.admin);
    ShiftsService::create(
        f.store(),
        &f.emitter,
        &ctx(&f.leader),
        &f.shift_request(&f.alice, "2026-01-05", &f.dag),
    )
    .await
    .unwrap();

    let err = ShiftTypesService::delete(f.store(), &admin, f.dag.id)
        .await
        .unwrap_err();
    assert_eq!(err.conflict_code(), Some("SHIFT_TYPE_002"));

    ShiftTypesService::delete(f.store(), &admin, f.n1.id)
        .await
        .unwrap();
    let err = ShiftTypesService::delete(f.store(), &admin, f.n1.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
}
