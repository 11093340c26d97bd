use uuid::Uuid;

use crate::{
    db::enums::UserRole,
    db::models::{User, api::error_codes},
    db::store::{Store, StoreError},
    error::{AppError, AppResult},
    routes::users::{CreateUserRequest, UpdateUserRoleRequest},
    services::authz::{self, Action},
    services::context::RequestContext,
};

pub struct UsersService;

impl UsersService {
    pub async fn list(store: &dyn Store, team_id: Option<Uuid>) -> AppResult<Vec<User>> {
        Ok(store.list_users(team_id).await?)
    }

    pub async fn create(
        store: &dyn Store,
        ctx: &RequestContext,
        req: &CreateUserRequest,
    ) -> AppResult<User> {
        authz::require(ctx, Action::ManageUsers)?;
        if req.name.trim().is_empty() {
            return Err(AppError::validation("Name is required"));
        }
        let role = parse_role(req.role.as_deref().unwrap_or("EMPLOYEE"))?;
        if store.find_team(req.team_id).await?.is_none() {
            return Err(AppError::not_found("Team not found"));
        }

        let user = User {
            id: Uuid::new_v4(),
            name: req.name.trim().to_string(),
            email: req.email.trim().to_lowercase(),
            role,
            team_id: req.team_id,
        };

        let user = store.create_user(user).await.map_err(|e| match e {
            StoreError::Duplicate(message) => AppError::conflict_with_code(
                message,
                Some("email".to_string()),
                error_codes::USER_EMAIL_EXISTS,
            ),
            other => other.into(),
        })?;
        tracing::info!(user_id = %user.id, team_id = %user.team_id, role = user.role.as_str(), "user created");
        Ok(user)
    }

    pub async fn update_role(
        store: &dyn Store,
        ctx: &RequestContext,
        user_id: Uuid,
        req: &UpdateUserRoleRequest,
    ) -> AppResult<User> {
        authz::require(ctx, Action::ManageUsers)?;
        let role = parse_role(&req.role)?;
        let user = store
            .update_user_role(user_id, role)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        tracing::info!(%user_id, role = role.as_str(), "user role updated");
        Ok(user)
    }
}

fn parse_role(value: &str) -> AppResult<UserRole> {
    value
        .parse::<UserRole>()
        .map_err(|_| AppError::validation("Invalid role"))
}
