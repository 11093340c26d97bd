use uuid::Uuid;

use crate::{
    db::models::{NewTeam, Team},
    db::store::Store,
    error::{AppError, AppResult},
    routes::teams::CreateTeamRequest,
    services::authz::{self, Action},
    services::context::RequestContext,
};

pub struct TeamsService;

impl TeamsService {
    pub fn validate_name(name: &str) -> Result<(), AppError> {
        if name.trim().is_empty() {
            return Err(AppError::validation("Team name is required"));
        }
        Ok(())
    }

    pub async fn list(store: &dyn Store) -> AppResult<Vec<Team>> {
        Ok(store.list_teams().await?)
    }

    /// Creates the team and its default notification settings together.
    pub async fn create(
        store: &dyn Store,
        ctx: &RequestContext,
        req: &CreateTeamRequest,
    ) -> AppResult<Team> {
        authz::require(ctx, Action::ManageTeams)?;
        Self::validate_name(&req.name)?;

        let team = store.create_team(NewTeam::new(req.name.trim())).await?;
        tracing::info!(team_id = %team.id, name = %team.name, "team created");
        Ok(team)
    }

    /// Removes the team with its users, shifts, notes, swap requests,
    /// notifications and settings.
    pub async fn delete(store: &dyn Store, ctx: &RequestContext, team_id: Uuid) -> AppResult<()> {
        authz::require(ctx, Action::ManageTeams)?;
        if !store.delete_team(team_id).await? {
            return Err(AppError::not_found("Team not found"));
        }
        tracing::info!(%team_id, deleted_by = %ctx.user_id, "team deleted");
        Ok(())
    }
}
