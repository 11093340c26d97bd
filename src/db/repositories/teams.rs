use diesel::prelude::*;
use uuid::Uuid;

use crate::db::models::{NewTeam, NotificationSettings, Team};

pub struct TeamsRepo;

impl TeamsRepo {
    pub fn insert(conn: &mut PgConnection, new_team: &NewTeam) -> Result<Team, diesel::result::Error> {
        diesel::insert_into(crate::schema::teams::table)
            .values(new_team)
            .returning(Team::as_returning())
            .get_result(conn)
    }

    pub fn find_by_id(
        conn: &mut PgConnection,
        team_id: Uuid,
    ) -> Result<Option<Team>, diesel::result::Error> {
        use crate::schema::teams::dsl::*;
        teams
            .filter(id.eq(team_id))
            .select(Team::as_select())
            .first(conn)
            .optional()
    }

    pub fn list(conn: &mut PgConnection) -> Result<Vec<Team>, diesel::result::Error> {
        use crate::schema::teams::dsl::*;
        teams.order(name.asc()).select(Team::as_select()).load(conn)
    }

    /// Deletes dependents first; callers run this inside a transaction.
    pub fn delete_cascade(
        conn: &mut PgConnection,
        team_id: Uuid,
    ) -> Result<bool, diesel::result::Error> {
        use crate::schema::{notes, notification_settings, notifications, shifts, swap_requests, teams, users};

        diesel::delete(notifications::table.filter(notifications::team_id.eq(team_id))).execute(conn)?;
        diesel::delete(swap_requests::table.filter(swap_requests::team_id.eq(team_id))).execute(conn)?;
        diesel::delete(notes::table.filter(notes::team_id.eq(team_id))).execute(conn)?;
        diesel::delete(shifts::table.filter(shifts::team_id.eq(team_id))).execute(conn)?;
        diesel::delete(users::table.filter(users::team_id.eq(team_id))).execute(conn)?;
        diesel::delete(
            notification_settings::table.filter(notification_settings::team_id.eq(team_id)),
        )
        .execute(conn)?;
        let removed = diesel::delete(teams::table.filter(teams::id.eq(team_id))).execute(conn)?;
        Ok(removed > 0)
    }

    pub fn find_settings(
        conn: &mut PgConnection,
        team: Uuid,
    ) -> Result<Option<NotificationSettings>, diesel::result::Error> {
        use crate::schema::notification_settings::dsl::*;
        notification_settings
            .filter(team_id.eq(team))
            .select(NotificationSettings::as_select())
            .first(conn)
            .optional()
    }

    pub fn upsert_settings(
        conn: &mut PgConnection,
        settings: &NotificationSettings,
    ) -> Result<NotificationSettings, diesel::result::Error> {
        use crate::schema::notification_settings::dsl::*;
        diesel::insert_into(notification_settings)
            .values(settings)
            .on_conflict(team_id)
            .do_update()
            .set(settings)
            .returning(NotificationSettings::as_returning())
            .get_result(conn)
    }
}
