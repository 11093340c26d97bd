//! Role checks for mutating operations.

use crate::db::enums::UserRole;
use crate::error::{AppError, AppResult};
use crate::services::context::RequestContext;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    EditShifts,
    ApproveSwaps,
    ApproveNotes,
    ManageShiftTypes,
    ManageTeams,
    ManageUsers,
    ManageNotificationSettings,
}

impl Action {
    fn describe(&self) -> &'static str {
        match self {
            Action::EditShifts => "edit shifts",
            Action::ApproveSwaps => "decide swap requests",
            Action::ApproveNotes => "change note status",
            Action::ManageShiftTypes => "manage shift types",
            Action::ManageTeams => "manage teams",
            Action::ManageUsers => "manage users",
            Action::ManageNotificationSettings => "manage notification settings",
        }
    }
}

pub fn can(role: UserRole, action: Action) -> bool {
    match action {
        Action::EditShifts | Action::ApproveSwaps | Action::ApproveNotes => {
            matches!(role, UserRole::Admin | UserRole::Leader)
        }
        Action::ManageShiftTypes
        | Action::ManageTeams
        | Action::ManageUsers
        | Action::ManageNotificationSettings => role == UserRole::Admin,
    }
}

pub fn require(ctx: &RequestContext, action: Action) -> AppResult<()> {
    if can(ctx.role, action) {
        Ok(())
    } else {
        tracing::debug!(user_id = %ctx.user_id, role = ctx.role.as_str(), ?action, "permission denied");
        Err(AppError::forbidden(format!(
            "Insufficient permissions to {}",
            action.describe()
        )))
    }
}

/// Admins act on any team; everyone else only on their own.
pub fn require_team(ctx: &RequestContext, team_id: Uuid) -> AppResult<()> {
    if ctx.role == UserRole::Admin || ctx.team_id == team_id {
        Ok(())
    } else {
        tracing::debug!(user_id = %ctx.user_id, %team_id, "cross-team access denied");
        Err(AppError::forbidden("You are not a member of this team"))
    }
}
