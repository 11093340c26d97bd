use super::{Fixture, add_user, ctx};
use shift_backend::{
    db::enums::UserRole,
    db::models::NewTeam,
    error::AppError,
    routes::teams::CreateTeamRequest,
    routes::users::{CreateUserRequest, UpdateUserRoleRequest},
    services::{NotificationsService, TeamsService, UsersService},
};

#[test]
fn test_teams_service_validate_name() {
    assert!(TeamsService::validate_name("Valid Team").is_ok());
    assert!(TeamsService::validate_name("").is_err());
    assert!(TeamsService::validate_name("   ").is_err());
}

#[tokio::test]
async fn new_team_gets_default_notification_settings() {
    let f = Fixture::new().await;
    let team = TeamsService::create(
        f.store(),
        &ctx(&f.admin),
        &CreateTeamRequest {
            name: "  Legevakt ".to_string(),
        },
    )
    .await
    .unwrap();
    assert_eq!(team.name, "Legevakt");

    let settings = f.store.find_notification_settings(team.id).await.unwrap().unwrap();
    assert!(settings.email_enabled);
    assert!(settings.sms_endpoint.is_none());
}

#[tokio::test]
async fn only_admins_manage_teams() {
    let f = Fixture::new().await;
    let err = TeamsService::create(
        f.store(),
        &ctx(&f.leader),
        &CreateTeamRequest {
            name: "Other".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden { .. }));
    assert_eq!(f.store.list_teams().await.unwrap().len(), 1);
}

#[tokio::test]
async fn deleting_a_team_removes_its_users() {
    let f = Fixture::new().await;
    let other = f.store.create_team(NewTeam::new("Other")).await.unwrap();
    let outsider = add_user(&f.store, &other, "Outsider", UserRole::Employee).await;

    TeamsService::delete(f.store(), &ctx(&f.admin), other.id)
        .await
        .unwrap();
    assert!(f.store.find_user(outsider.id).await.unwrap().is_none());
    assert!(f.store.find_user(f.alice.id).await.unwrap().is_some());

    let err = TeamsService::delete(f.store(), &ctx(&f.admin), other.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let f = Fixture::new().await;
    let req = CreateUserRequest {
        name: "Carol".to_string(),
        email: "Carol@Example.com".to_string(),
        role: None,
        team_id: f.team.id,
    };
    let carol = UsersService::create(f.store(), &ctx(&f.admin), &req).await.unwrap();
    assert_eq!(carol.email, "carol@example.com");
    assert_eq!(carol.role, UserRole::Employee);

    let err = UsersService::create(f.store(), &ctx(&f.admin), &req)
        .await
        .unwrap_err();
    assert_eq!(err.conflict_code(), Some("USER_001"));
}

#[tokio::test]
async fn role_update_rejects_unknown_roles() {
    let f = Fixture::new().await;
    let promoted = UsersService::update_role(
        f.store(),
        &ctx(&f.admin),
        f.alice.id,
        &UpdateUserRoleRequest {
            role: "LEADER".to_string(),
        },
    )
    .await
    .unwrap();
    assert_eq!(promoted.role, UserRole::Leader);

    let err = UsersService::update_role(
        f.store(),
        &ctx(&f.admin),
        f.alice.id,
        &UpdateUserRoleRequest {
            role: "OWNER".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));
}

#[tokio::test]
async fn settings_update_is_admin_only_and_clears_blank_endpoint() {
    let f = Fixture::new().await;
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

    let settings = NotificationsService::update_settings(
        f.store(),
        &ctx(&f.admin),
        f.team.id,
        false,
        Some("   ".to_string()),
    )
    .await
    .unwrap();
    assert!(!settings.email_enabled);
    assert!(settings.sms_endpoint.is_none());

    let fetched = NotificationsService::get_settings(f.store(), f.team.id)
        .await
        .unwrap();
    assert_eq!(fetched, settings);
}
