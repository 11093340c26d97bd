use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use std::time::Duration;
use uuid::Uuid;

use super::{SHIFT_TYPE_IN_USE_MESSAGE, Store, StoreError, StoreResult};
use crate::config::DatabaseConfig;
use crate::db::DbPool;
use crate::db::enums::{NoteStatus, SwapRequestStatus, UserRole};
use crate::db::models::{
    NewTeam, Note, NoteFilter, Notification, NotificationFilter, NotificationSettings, Shift,
    ShiftChanges, ShiftFilter, ShiftType, ShiftTypeChanges, SwapRequest, Team, User,
};
use crate::db::repositories::{
    notes::NotesRepo, notifications::NotificationsRepo, shift_types::ShiftTypesRepo,
    shifts::ShiftsRepo, swap_requests::SwapRequestsRepo, teams::TeamsRepo, users::UsersRepo,
};

/// PostgreSQL-backed store. Diesel is synchronous, so every call hops onto
/// the blocking pool with its own pooled connection.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.url);
        let pool = r2d2::Pool::builder()
            .max_size(config.max_connections)
            .min_idle(Some(config.min_connections))
            .connection_timeout(Duration::from_secs(config.connection_timeout))
            .build(manager)?;
        Ok(Self { pool })
    }

    async fn run<T, E, F>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Into<StoreError>,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            f(&mut *conn).map_err(Into::into)
        })
        .await
        .map_err(|e| StoreError::Backend(format!("blocking task failed: {}", e)))?
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_team(&self, team: NewTeam) -> StoreResult<Team> {
        self.run(move |conn| {
            conn.transaction::<_, diesel::result::Error, _>(|conn| {
                let team = TeamsRepo::insert(conn, &team)?;
                TeamsRepo::upsert_settings(conn, &NotificationSettings::defaults_for(team.id))?;
                Ok(team)
            })
        })
        .await
    }

    async fn find_team(&self, team_id: Uuid) -> StoreResult<Option<Team>> {
        self.run(move |conn| TeamsRepo::find_by_id(conn, team_id)).await
    }

    async fn list_teams(&self) -> StoreResult<Vec<Team>> {
        self.run(TeamsRepo::list).await
    }

    async fn delete_team(&self, team_id: Uuid) -> StoreResult<bool> {
        self.run(move |conn| {
            conn.transaction::<_, diesel::result::Error, _>(|conn| {
                TeamsRepo::delete_cascade(conn, team_id)
            })
        })
        .await
    }

    async fn create_user(&self, user: User) -> StoreResult<User> {
        self.run(move |conn| UsersRepo::insert(conn, &user)).await
    }

    async fn find_user(&self, user_id: Uuid) -> StoreResult<Option<User>> {
        self.run(move |conn| UsersRepo::find_by_id(conn, user_id)).await
    }

    async fn find_users(&self, user_ids: &[Uuid]) -> StoreResult<Vec<User>> {
        let user_ids = user_ids.to_vec();
        self.run(move |conn| UsersRepo::find_by_ids(conn, &user_ids)).await
    }

    async fn list_users(&self, team_id: Option<Uuid>) -> StoreResult<Vec<User>> {
        self.run(move |conn| UsersRepo::list(conn, team_id)).await
    }

    async fn update_user_role(&self, user_id: Uuid, role: UserRole) -> StoreResult<Option<User>> {
        self.run(move |conn| UsersRepo::update_role(conn, user_id, role)).await
    }

    async fn create_shift_type(&self, shift_type: ShiftType) -> StoreResult<ShiftType> {
        self.run(move |conn| ShiftTypesRepo::insert(conn, &shift_type)).await
    }

    async fn find_shift_type(&self, shift_type_id: Uuid) -> StoreResult<Option<ShiftType>> {
        self.run(move |conn| ShiftTypesRepo::find_by_id(conn, shift_type_id))
            .await
    }

    async fn find_shift_types(&self, shift_type_ids: &[Uuid]) -> StoreResult<Vec<ShiftType>> {
        let ids = shift_type_ids.to_vec();
        self.run(move |conn| ShiftTypesRepo::find_by_ids(conn, &ids)).await
    }

    async fn list_shift_types(&self) -> StoreResult<Vec<ShiftType>> {
        self.run(ShiftTypesRepo::list).await
    }

    async fn update_shift_type(
        &self,
        shift_type_id: Uuid,
        changes: ShiftTypeChanges,
    ) -> StoreResult<Option<ShiftType>> {
        self.run(move |conn| ShiftTypesRepo::update(conn, shift_type_id, &changes))
            .await
    }

    async fn delete_shift_type(&self, shift_type_id: Uuid) -> StoreResult<bool> {
        self.run(move |conn| {
            conn.transaction::<_, StoreError, _>(|conn| {
                if ShiftTypesRepo::is_referenced(conn, shift_type_id)? {
                    return Err(StoreError::InUse(SHIFT_TYPE_IN_USE_MESSAGE.to_string()));
                }
                Ok(ShiftTypesRepo::delete(conn, shift_type_id)?)
            })
        })
        .await
    }

    async fn insert_shift(&self, shift: Shift) -> StoreResult<Shift> {
        self.run(move |conn| ShiftsRepo::insert(conn, &shift)).await
    }

    async fn find_shift(&self, shift_id: Uuid) -> StoreResult<Option<Shift>> {
        self.run(move |conn| ShiftsRepo::find_by_id(conn, shift_id)).await
    }

    async fn find_shift_on(
        &self,
        team_id: Uuid,
        user_id: Uuid,
        date: NaiveDate,
    ) -> StoreResult<Option<Shift>> {
        self.run(move |conn| ShiftsRepo::find_on_date(conn, team_id, user_id, date))
            .await
    }

    async fn list_shifts(&self, filter: ShiftFilter) -> StoreResult<Vec<Shift>> {
        self.run(move |conn| ShiftsRepo::list(conn, &filter)).await
    }

    async fn update_shift(
        &self,
        shift_id: Uuid,
        changes: ShiftChanges,
    ) -> StoreResult<Option<Shift>> {
        self.run(move |conn| ShiftsRepo::update(conn, shift_id, &changes))
            .await
    }

    async fn delete_shift(&self, shift_id: Uuid) -> StoreResult<bool> {
        self.run(move |conn| {
            conn.transaction::<_, diesel::result::Error, _>(|conn| {
                ShiftsRepo::delete_cascade(conn, shift_id)
            })
        })
        .await
    }

    async fn insert_swap_request(&self, request: SwapRequest) -> StoreResult<SwapRequest> {
        self.run(move |conn| SwapRequestsRepo::insert(conn, &request))
            .await
    }

    async fn find_swap_request(&self, request_id: Uuid) -> StoreResult<Option<SwapRequest>> {
        self.run(move |conn| SwapRequestsRepo::find_by_id(conn, request_id))
            .await
    }

    async fn list_swap_requests(&self, team_id: Uuid) -> StoreResult<Vec<SwapRequest>> {
        self.run(move |conn| SwapRequestsRepo::list_by_team(conn, team_id))
            .await
    }

    async fn transition_swap_request(
        &self,
        request_id: Uuid,
        from: SwapRequestStatus,
        to: SwapRequestStatus,
        decided_at: DateTime<Utc>,
    ) -> StoreResult<Option<SwapRequest>> {
        self.run(move |conn| SwapRequestsRepo::transition(conn, request_id, from, to, decided_at))
            .await
    }

    async fn execute_swap_request(
        &self,
        request_id: Uuid,
        decided_at: DateTime<Utc>,
    ) -> StoreResult<Option<SwapRequest>> {
        self.run(move |conn| {
            conn.transaction::<_, StoreError, _>(|conn| {
                // The conditional update takes the row lock, so a second
                // executor blocks here and then sees EXECUTED.
                let Some(request) = SwapRequestsRepo::transition(
                    conn,
                    request_id,
                    SwapRequestStatus::Approved,
                    SwapRequestStatus::Executed,
                    decided_at,
                )?
                else {
                    return Ok(None);
                };

                if ShiftsRepo::find_by_id_for_update(conn, request.shift_id)?.is_none() {
                    return Err(StoreError::NotFound("Shift not found".to_string()));
                }
                ShiftsRepo::reassign(conn, request.shift_id, request.to_user_id)?;
                Ok(Some(request))
            })
        })
        .await
    }

    async fn insert_note(&self, note: Note) -> StoreResult<Note> {
        self.run(move |conn| NotesRepo::insert(conn, &note)).await
    }

    async fn list_notes(&self, filter: NoteFilter) -> StoreResult<Vec<Note>> {
        self.run(move |conn| NotesRepo::list(conn, &filter)).await
    }

    async fn update_note_status(
        &self,
        note_id: Uuid,
        status: NoteStatus,
    ) -> StoreResult<Option<Note>> {
        self.run(move |conn| NotesRepo::update_status(conn, note_id, status))
            .await
    }

    async fn insert_notification(&self, notification: Notification) -> StoreResult<Notification> {
        self.run(move |conn| NotificationsRepo::insert(conn, &notification))
            .await
    }

    async fn list_notifications(
        &self,
        filter: NotificationFilter,
        limit: usize,
    ) -> StoreResult<Vec<Notification>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.run(move |conn| NotificationsRepo::list(conn, &filter, limit))
            .await
    }

    async fn find_notification(&self, notification_id: Uuid) -> StoreResult<Option<Notification>> {
        self.run(move |conn| NotificationsRepo::find_by_id(conn, notification_id))
            .await
    }

    async fn mark_notification_read(
        &self,
        notification_id: Uuid,
    ) -> StoreResult<Option<Notification>> {
        self.run(move |conn| NotificationsRepo::mark_read(conn, notification_id))
            .await
    }

    async fn find_notification_settings(
        &self,
        team_id: Uuid,
    ) -> StoreResult<Option<NotificationSettings>> {
        self.run(move |conn| TeamsRepo::find_settings(conn, team_id))
            .await
    }

    async fn upsert_notification_settings(
        &self,
        settings: NotificationSettings,
    ) -> StoreResult<NotificationSettings> {
        self.run(move |conn| TeamsRepo::upsert_settings(conn, &settings))
            .await
    }
}
