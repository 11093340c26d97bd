use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    EMAIL_DUPLICATE_MESSAGE, SHIFT_DUPLICATE_MESSAGE, SHIFT_TYPE_CODE_DUPLICATE_MESSAGE,
    SHIFT_TYPE_IN_USE_MESSAGE, Store, StoreError, StoreResult,
};
use crate::db::enums::{NoteStatus, SwapRequestStatus, UserRole};
use crate::db::models::{
    NewTeam, Note, NoteFilter, Notification, NotificationFilter, NotificationSettings, Shift,
    ShiftChanges, ShiftFilter, ShiftType, ShiftTypeChanges, SwapRequest, Team, User,
};

#[derive(Default)]
struct Tables {
    teams: HashMap<Uuid, Team>,
    users: HashMap<Uuid, User>,
    shift_types: HashMap<Uuid, ShiftType>,
    shifts: HashMap<Uuid, Shift>,
    swap_requests: HashMap<Uuid, SwapRequest>,
    notes: HashMap<Uuid, Note>,
    notifications: Vec<Notification>,
    settings: HashMap<Uuid, NotificationSettings>,
}

impl Tables {
    /// Same guarantee as the `shifts_one_per_user_day` constraint.
    fn slot_taken(&self, team_id: Uuid, user_id: Uuid, date: NaiveDate, except: Option<Uuid>) -> bool {
        self.shifts.values().any(|s| {
            s.team_id == team_id && s.user_id == user_id && s.date == date && Some(s.id) != except
        })
    }
}

/// Process-local store. Every write runs under one lock, so check-and-insert
/// sequences are atomic.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_team(&self, team: NewTeam) -> StoreResult<Team> {
        let mut tables = self.tables.write().await;
        let team = Team::from(team);
        tables
            .settings
            .insert(team.id, NotificationSettings::defaults_for(team.id));
        tables.teams.insert(team.id, team.clone());
        Ok(team)
    }

    async fn find_team(&self, team_id: Uuid) -> StoreResult<Option<Team>> {
        Ok(self.tables.read().await.teams.get(&team_id).cloned())
    }

    async fn list_teams(&self) -> StoreResult<Vec<Team>> {
        let mut teams: Vec<Team> = self.tables.read().await.teams.values().cloned().collect();
        teams.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(teams)
    }

    async fn delete_team(&self, team_id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.teams.remove(&team_id).is_none() {
            return Ok(false);
        }
        tables.notifications.retain(|n| n.team_id != team_id);
        tables.swap_requests.retain(|_, r| r.team_id != team_id);
        tables.notes.retain(|_, n| n.team_id != team_id);
        tables.shifts.retain(|_, s| s.team_id != team_id);
        tables.users.retain(|_, u| u.team_id != team_id);
        tables.settings.remove(&team_id);
        Ok(true)
    }

    async fn create_user(&self, user: User) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate(EMAIL_DUPLICATE_MESSAGE.to_string()));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, user_id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&user_id).cloned())
    }

    async fn find_users(&self, user_ids: &[Uuid]) -> StoreResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(user_ids
            .iter()
            .filter_map(|id| tables.users.get(id).cloned())
            .collect())
    }

    async fn list_users(&self, team_id: Option<Uuid>) -> StoreResult<Vec<User>> {
        let mut users: Vec<User> = self
            .tables
            .read()
            .await
            .users
            .values()
            .filter(|u| team_id.map_or(true, |t| u.team_id == t))
            .cloned()
            .collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }

    async fn update_user_role(&self, user_id: Uuid, role: UserRole) -> StoreResult<Option<User>> {
        let mut tables = self.tables.write().await;
        Ok(tables.users.get_mut(&user_id).map(|user| {
            user.role = role;
            user.clone()
        }))
    }

    async fn create_shift_type(&self, shift_type: ShiftType) -> StoreResult<ShiftType> {
        let mut tables = self.tables.write().await;
        if tables.shift_types.values().any(|t| t.code == shift_type.code) {
            return Err(StoreError::Duplicate(
                SHIFT_TYPE_CODE_DUPLICATE_MESSAGE.to_string(),
            ));
        }
        tables.shift_types.insert(shift_type.id, shift_type.clone());
        Ok(shift_type)
    }

    async fn find_shift_type(&self, shift_type_id: Uuid) -> StoreResult<Option<ShiftType>> {
        Ok(self.tables.read().await.shift_types.get(&shift_type_id).cloned())
    }

    async fn find_shift_types(&self, shift_type_ids: &[Uuid]) -> StoreResult<Vec<ShiftType>> {
        let tables = self.tables.read().await;
        Ok(shift_type_ids
            .iter()
            .filter_map(|id| tables.shift_types.get(id).cloned())
            .collect())
    }

    async fn list_shift_types(&self) -> StoreResult<Vec<ShiftType>> {
        let mut types: Vec<ShiftType> =
            self.tables.read().await.shift_types.values().cloned().collect();
        types.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(types)
    }

    async fn update_shift_type(
        &self,
        shift_type_id: Uuid,
        changes: ShiftTypeChanges,
    ) -> StoreResult<Option<ShiftType>> {
        let mut tables = self.tables.write().await;
        let code_taken = tables
            .shift_types
            .values()
            .any(|t| t.code == changes.code && t.id != shift_type_id);
        let Some(shift_type) = tables.shift_types.get_mut(&shift_type_id) else {
            return Ok(None);
        };
        if code_taken {
            return Err(StoreError::Duplicate(
                SHIFT_TYPE_CODE_DUPLICATE_MESSAGE.to_string(),
            ));
        }
        changes.apply_to(shift_type);
        Ok(Some(shift_type.clone()))
    }

    async fn delete_shift_type(&self, shift_type_id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.shifts.values().any(|s| s.shift_type_id == shift_type_id) {
            return Err(StoreError::InUse(SHIFT_TYPE_IN_USE_MESSAGE.to_string()));
        }
        Ok(tables.shift_types.remove(&shift_type_id).is_some())
    }

    async fn insert_shift(&self, shift: Shift) -> StoreResult<Shift> {
        let mut tables = self.tables.write().await;
        if tables.slot_taken(shift.team_id, shift.user_id, shift.date, None) {
            return Err(StoreError::Duplicate(SHIFT_DUPLICATE_MESSAGE.to_string()));
        }
        tables.shifts.insert(shift.id, shift.clone());
        Ok(shift)
    }

    async fn find_shift(&self, shift_id: Uuid) -> StoreResult<Option<Shift>> {
        Ok(self.tables.read().await.shifts.get(&shift_id).cloned())
    }

    async fn find_shift_on(
        &self,
        team_id: Uuid,
        user_id: Uuid,
        date: NaiveDate,
    ) -> StoreResult<Option<Shift>> {
        Ok(self
            .tables
            .read()
            .await
            .shifts
            .values()
            .find(|s| s.team_id == team_id && s.user_id == user_id && s.date == date)
            .cloned())
    }

    async fn list_shifts(&self, filter: ShiftFilter) -> StoreResult<Vec<Shift>> {
        let mut shifts: Vec<Shift> = self
            .tables
            .read()
            .await
            .shifts
            .values()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        shifts.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then(a.start_date_time.cmp(&b.start_date_time))
        });
        Ok(shifts)
    }

    async fn update_shift(
        &self,
        shift_id: Uuid,
        changes: ShiftChanges,
    ) -> StoreResult<Option<Shift>> {
        let mut tables = self.tables.write().await;
        let Some(team_id) = tables.shifts.get(&shift_id).map(|s| s.team_id) else {
            return Ok(None);
        };
        if tables.slot_taken(team_id, changes.user_id, changes.date, Some(shift_id)) {
            return Err(StoreError::Duplicate(SHIFT_DUPLICATE_MESSAGE.to_string()));
        }
        Ok(tables.shifts.get_mut(&shift_id).map(|shift| {
            changes.apply_to(shift);
            shift.clone()
        }))
    }

    async fn delete_shift(&self, shift_id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.shifts.remove(&shift_id).is_none() {
            return Ok(false);
        }
        tables.swap_requests.retain(|_, r| r.shift_id != shift_id);
        Ok(true)
    }

    async fn insert_swap_request(&self, request: SwapRequest) -> StoreResult<SwapRequest> {
        let mut tables = self.tables.write().await;
        tables.swap_requests.insert(request.id, request.clone());
        Ok(request)
    }

    async fn find_swap_request(&self, request_id: Uuid) -> StoreResult<Option<SwapRequest>> {
        Ok(self.tables.read().await.swap_requests.get(&request_id).cloned())
    }

    async fn list_swap_requests(&self, team_id: Uuid) -> StoreResult<Vec<SwapRequest>> {
        let mut requests: Vec<SwapRequest> = self
            .tables
            .read()
            .await
            .swap_requests
            .values()
            .filter(|r| r.team_id == team_id)
            .cloned()
            .collect();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(requests)
    }

    async fn transition_swap_request(
        &self,
        request_id: Uuid,
        from: SwapRequestStatus,
        to: SwapRequestStatus,
        decided_at: DateTime<Utc>,
    ) -> StoreResult<Option<SwapRequest>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .swap_requests
            .get_mut(&request_id)
            .filter(|r| r.status == from)
            .map(|request| {
                request.status = to;
                request.decided_at = Some(decided_at);
                request.clone()
            }))
    }

    async fn execute_swap_request(
        &self,
        request_id: Uuid,
        decided_at: DateTime<Utc>,
    ) -> StoreResult<Option<SwapRequest>> {
        let mut tables = self.tables.write().await;
        let Some(request) = tables
            .swap_requests
            .get(&request_id)
            .filter(|r| r.status == SwapRequestStatus::Approved)
            .cloned()
        else {
            return Ok(None);
        };

        let Some(shift) = tables.shifts.get(&request.shift_id).cloned() else {
            return Err(StoreError::NotFound("Shift not found".to_string()));
        };
        if tables.slot_taken(shift.team_id, request.to_user_id, shift.date, Some(shift.id)) {
            return Err(StoreError::Duplicate(SHIFT_DUPLICATE_MESSAGE.to_string()));
        }

        if let Some(shift) = tables.shifts.get_mut(&request.shift_id) {
            shift.user_id = request.to_user_id;
        }
        Ok(tables.swap_requests.get_mut(&request_id).map(|request| {
            request.status = SwapRequestStatus::Executed;
            request.decided_at = Some(decided_at);
            request.clone()
        }))
    }

    async fn insert_note(&self, note: Note) -> StoreResult<Note> {
        let mut tables = self.tables.write().await;
        tables.notes.insert(note.id, note.clone());
        Ok(note)
    }

    async fn list_notes(&self, filter: NoteFilter) -> StoreResult<Vec<Note>> {
        let mut notes: Vec<Note> = self
            .tables
            .read()
            .await
            .notes
            .values()
            .filter(|n| filter.matches(n))
            .cloned()
            .collect();
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notes)
    }

    async fn update_note_status(
        &self,
        note_id: Uuid,
        status: NoteStatus,
    ) -> StoreResult<Option<Note>> {
        let mut tables = self.tables.write().await;
        Ok(tables.notes.get_mut(&note_id).map(|note| {
            note.status = status;
            note.clone()
        }))
    }

    async fn insert_notification(&self, notification: Notification) -> StoreResult<Notification> {
        let mut tables = self.tables.write().await;
        tables.notifications.push(notification.clone());
        Ok(notification)
    }

    async fn list_notifications(
        &self,
        filter: NotificationFilter,
        limit: usize,
    ) -> StoreResult<Vec<Notification>> {
        // Appended in creation order, so reverse iteration is newest first.
        Ok(self
            .tables
            .read()
            .await
            .notifications
            .iter()
            .rev()
            .filter(|n| filter.matches(n))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn find_notification(&self, notification_id: Uuid) -> StoreResult<Option<Notification>> {
        Ok(self
            .tables
            .read()
            .await
            .notifications
            .iter()
            .find(|n| n.id == notification_id)
            .cloned())
    }

    async fn mark_notification_read(
        &self,
        notification_id: Uuid,
    ) -> StoreResult<Option<Notification>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .notifications
            .iter_mut()
            .find(|n| n.id == notification_id)
            .map(|notification| {
                notification.read = true;
                notification.clone()
            }))
    }

    async fn find_notification_settings(
        &self,
        team_id: Uuid,
    ) -> StoreResult<Option<NotificationSettings>> {
        Ok(self.tables.read().await.settings.get(&team_id).cloned())
    }

    async fn upsert_notification_settings(
        &self,
        settings: NotificationSettings,
    ) -> StoreResult<NotificationSettings> {
        let mut tables = self.tables.write().await;
        tables.settings.insert(settings.team_id, settings.clone());
        Ok(settings)
    }
}
