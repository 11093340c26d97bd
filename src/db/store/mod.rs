//! Data-access seam used by every service.
//!
//! Services never talk to diesel directly; they hold an `Arc<dyn Store>` and
//! call the operations below. `PgStore` backs production, `MemoryStore` backs
//! tests and local runs without a database.

pub mod memory;
pub mod pg;

pub use memory::MemoryStore;
pub use pg::PgStore;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::db::enums::{NoteStatus, SwapRequestStatus, UserRole};
use crate::db::models::{
    NewTeam, Note, NoteFilter, Notification, NotificationFilter, NotificationSettings, Shift,
    ShiftChanges, ShiftFilter, ShiftType, ShiftTypeChanges, SwapRequest, Team, User,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),

    /// A uniqueness constraint rejected the write.
    #[error("{0}")]
    Duplicate(String),

    /// A delete was refused because other rows still reference the record.
    #[error("{0}")]
    InUse(String),

    #[error("backend failure: {0}")]
    Backend(String),
}

impl From<r2d2::Error> for StoreError {
    fn from(err: r2d2::Error) -> Self {
        StoreError::Backend(format!("connection pool: {}", err))
    }
}

impl From<diesel::result::Error> for StoreError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};
        match err {
            Error::NotFound => StoreError::NotFound("Record not found".to_string()),
            Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                StoreError::Duplicate(unique_violation_message(info.constraint_name()))
            }
            Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                StoreError::InUse(format!(
                    "Record is still referenced ({})",
                    info.constraint_name().unwrap_or("foreign key")
                ))
            }
            other => StoreError::Backend(other.to_string()),
        }
    }
}

pub(crate) const SHIFT_DUPLICATE_MESSAGE: &str = "Shift already exists";
pub(crate) const EMAIL_DUPLICATE_MESSAGE: &str = "Email already in use";
pub(crate) const SHIFT_TYPE_CODE_DUPLICATE_MESSAGE: &str = "Shift type code already exists";
pub(crate) const SHIFT_TYPE_IN_USE_MESSAGE: &str = "Shift type is in use";

fn unique_violation_message(constraint: Option<&str>) -> String {
    match constraint {
        Some("shifts_one_per_user_day") => SHIFT_DUPLICATE_MESSAGE.to_string(),
        Some("users_email_key") => EMAIL_DUPLICATE_MESSAGE.to_string(),
        Some("shift_types_code_key") => SHIFT_TYPE_CODE_DUPLICATE_MESSAGE.to_string(),
        Some(other) => format!("Duplicate value violates {}", other),
        None => "Duplicate value".to_string(),
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait Store: Send + Sync {
    // Teams

    /// Inserts the team together with its default notification settings.
    async fn create_team(&self, team: NewTeam) -> StoreResult<Team>;
    async fn find_team(&self, team_id: Uuid) -> StoreResult<Option<Team>>;
    async fn list_teams(&self) -> StoreResult<Vec<Team>>;
    /// Removes the team and everything it owns. Returns false if absent.
    async fn delete_team(&self, team_id: Uuid) -> StoreResult<bool>;

    // Users

    async fn create_user(&self, user: User) -> StoreResult<User>;
    async fn find_user(&self, user_id: Uuid) -> StoreResult<Option<User>>;
    async fn find_users(&self, user_ids: &[Uuid]) -> StoreResult<Vec<User>>;
    async fn list_users(&self, team_id: Option<Uuid>) -> StoreResult<Vec<User>>;
    async fn update_user_role(&self, user_id: Uuid, role: UserRole) -> StoreResult<Option<User>>;

    // Shift types

    async fn create_shift_type(&self, shift_type: ShiftType) -> StoreResult<ShiftType>;
    async fn find_shift_type(&self, shift_type_id: Uuid) -> StoreResult<Option<ShiftType>>;
    async fn find_shift_types(&self, shift_type_ids: &[Uuid]) -> StoreResult<Vec<ShiftType>>;
    async fn list_shift_types(&self) -> StoreResult<Vec<ShiftType>>;
    async fn update_shift_type(
        &self,
        shift_type_id: Uuid,
        changes: ShiftTypeChanges,
    ) -> StoreResult<Option<ShiftType>>;
    /// Fails with `InUse` while any shift references the type.
    async fn delete_shift_type(&self, shift_type_id: Uuid) -> StoreResult<bool>;

    // Shifts

    /// Fails with `Duplicate` when (team, user, date) is already taken.
    async fn insert_shift(&self, shift: Shift) -> StoreResult<Shift>;
    async fn find_shift(&self, shift_id: Uuid) -> StoreResult<Option<Shift>>;
    async fn find_shift_on(
        &self,
        team_id: Uuid,
        user_id: Uuid,
        date: NaiveDate,
    ) -> StoreResult<Option<Shift>>;
    /// Ordered by date, then start time.
    async fn list_shifts(&self, filter: ShiftFilter) -> StoreResult<Vec<Shift>>;
    /// Fails with `Duplicate` when the new (user, date) collides with another shift.
    async fn update_shift(&self, shift_id: Uuid, changes: ShiftChanges)
    -> StoreResult<Option<Shift>>;
    /// Also removes swap requests that reference the shift.
    async fn delete_shift(&self, shift_id: Uuid) -> StoreResult<bool>;

    // Swap requests

    async fn insert_swap_request(&self, request: SwapRequest) -> StoreResult<SwapRequest>;
    async fn find_swap_request(&self, request_id: Uuid) -> StoreResult<Option<SwapRequest>>;
    /// Newest first.
    async fn list_swap_requests(&self, team_id: Uuid) -> StoreResult<Vec<SwapRequest>>;
    /// Moves the request from `from` to `to`; `None` when it is not currently in `from`.
    async fn transition_swap_request(
        &self,
        request_id: Uuid,
        from: SwapRequestStatus,
        to: SwapRequestStatus,
        decided_at: DateTime<Utc>,
    ) -> StoreResult<Option<SwapRequest>>;
    /// Atomically hands the shift to `to_user_id` and marks the request EXECUTED.
    /// `None` when the request is not APPROVED.
    async fn execute_swap_request(
        &self,
        request_id: Uuid,
        decided_at: DateTime<Utc>,
    ) -> StoreResult<Option<SwapRequest>>;

    // Notes

    async fn insert_note(&self, note: Note) -> StoreResult<Note>;
    /// Newest first.
    async fn list_notes(&self, filter: NoteFilter) -> StoreResult<Vec<Note>>;
    async fn update_note_status(&self, note_id: Uuid, status: NoteStatus)
    -> StoreResult<Option<Note>>;

    // Notifications

    async fn insert_notification(&self, notification: Notification) -> StoreResult<Notification>;
    /// Newest first, at most `limit`.
    async fn list_notifications(
        &self,
        filter: NotificationFilter,
        limit: usize,
    ) -> StoreResult<Vec<Notification>>;
    async fn find_notification(&self, notification_id: Uuid) -> StoreResult<Option<Notification>>;
    async fn mark_notification_read(&self, notification_id: Uuid)
    -> StoreResult<Option<Notification>>;

    // Notification settings

    async fn find_notification_settings(
        &self,
        team_id: Uuid,
    ) -> StoreResult<Option<NotificationSettings>>;
    async fn upsert_notification_settings(
        &self,
        settings: NotificationSettings,
    ) -> StoreResult<NotificationSettings>;
}
