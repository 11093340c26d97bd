//! Batch create, update or delete of shifts with per-item failure reporting.
//!
//! Whole-batch checks (role, team, action, item count) run first and fail
//! the call. After that every item succeeds or fails on its own; the call
//! always returns both lists in input order.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    config::BulkConfig,
    db::enums::NotificationKind,
    db::models::{Shift, ShiftChanges, ShiftType, User},
    db::store::{Store, StoreError},
    error::{AppError, AppResult},
    routes::shifts::{BulkShiftItem, BulkShiftRequest},
    services::authz::{self, Action},
    services::context::RequestContext,
    services::notifications_service::{NotificationDraft, NotificationEmitter},
    services::shift_time::{parse_date, parse_time, resolve_shift_window},
    services::shifts_service::{SHIFT_CREATED_TITLE, SHIFT_DELETED_TITLE, SHIFT_UPDATED_TITLE},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    Create,
    Update,
    Delete,
}

impl FromStr for BulkAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(BulkAction::Create),
            "update" => Ok(BulkAction::Update),
            "delete" => Ok(BulkAction::Delete),
            _ => Err(AppError::validation("Invalid action")),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BulkSuccess {
    pub index: usize,
    pub user_id: Uuid,
    pub date: String,
    pub shift_id: Uuid,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BulkFailure {
    pub index: usize,
    pub user_id: Option<Uuid>,
    pub date: Option<String>,
    pub error: String,
}

#[derive(Serialize, Debug, Clone, Default)]
pub struct BulkShiftResult {
    pub successes: Vec<BulkSuccess>,
    pub failures: Vec<BulkFailure>,
}

enum ItemOutcome {
    Success(BulkSuccess),
    Failure(BulkFailure),
}

/// Read-only state shared by every item of one batch.
struct BatchContext<'a> {
    store: &'a dyn Store,
    emitter: &'a NotificationEmitter,
    action: BulkAction,
    team_id: Uuid,
    users: HashMap<Uuid, User>,
    shift_types: HashMap<Uuid, ShiftType>,
}

/// The single write an item resolved to.
enum PlannedWrite {
    Insert(Shift),
    Update(Uuid, ShiftChanges),
    Delete(Uuid),
}

struct PlannedItem {
    user_id: Uuid,
    date: String,
    write: PlannedWrite,
}

/// Item-level rejection: the reason plus whatever identity was known.
struct ItemError {
    user_id: Option<Uuid>,
    date: Option<String>,
    reason: String,
}

impl ItemError {
    fn new(user_id: Option<Uuid>, date: Option<&str>, reason: impl Into<String>) -> Self {
        Self {
            user_id,
            date: date.map(str::to_string),
            reason: reason.into(),
        }
    }
}

pub struct BulkShiftsService;

impl BulkShiftsService {
    pub async fn process(
        store: &dyn Store,
        emitter: &NotificationEmitter,
        limits: &BulkConfig,
        ctx: &RequestContext,
        req: &BulkShiftRequest,
    ) -> AppResult<BulkShiftResult> {
        authz::require(ctx, Action::EditShifts)?;

        let team_id = req.team_id.unwrap_or(ctx.team_id);
        authz::require_team(ctx, team_id)?;
        if store.find_team(team_id).await?.is_none() {
            return Err(AppError::not_found("Team not found"));
        }

        let action: BulkAction = req.action.parse()?;
        if req.items.is_empty() {
            return Err(AppError::validation("items is required"));
        }
        if req.items.len() > limits.max_items {
            return Err(AppError::validation(format!(
                "Too many items (max {})",
                limits.max_items
            )));
        }

        let batch = BatchContext {
            store,
            emitter,
            action,
            team_id,
            users: Self::prefetch_users(store, &req.items).await?,
            shift_types: Self::prefetch_shift_types(store, &req.items).await?,
        };

        info!(
            %team_id,
            ?action,
            items = req.items.len(),
            batch_size = limits.batch_size,
            requested_by = %ctx.user_id,
            "processing bulk shift request"
        );

        let item_timeout = Duration::from_millis(limits.item_timeout_ms);
        let mut result = BulkShiftResult::default();
        let indexed: Vec<(usize, &BulkShiftItem)> = req.items.iter().enumerate().collect();

        for chunk in indexed.chunks(limits.batch_size.max(1)) {
            let outcomes = join_all(
                chunk
                    .iter()
                    .map(|(index, item)| Self::run_item(&batch, *index, item, item_timeout)),
            )
            .await;

            for outcome in outcomes {
                match outcome {
                    ItemOutcome::Success(s) => result.successes.push(s),
                    ItemOutcome::Failure(f) => result.failures.push(f),
                }
            }
        }

        info!(
            %team_id,
            successes = result.successes.len(),
            failures = result.failures.len(),
            "bulk shift request finished"
        );
        Ok(result)
    }

    async fn prefetch_users(
        store: &dyn Store,
        items: &[BulkShiftItem],
    ) -> AppResult<HashMap<Uuid, User>> {
        let mut ids: Vec<Uuid> = items.iter().filter_map(|i| i.user_id).collect();
        ids.sort();
        ids.dedup();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        Ok(store
            .find_users(&ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect())
    }

    async fn prefetch_shift_types(
        store: &dyn Store,
        items: &[BulkShiftItem],
    ) -> AppResult<HashMap<Uuid, ShiftType>> {
        let mut ids: Vec<Uuid> = items.iter().filter_map(|i| i.shift_type_id).collect();
        ids.sort();
        ids.dedup();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        Ok(store
            .find_shift_types(&ids)
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect())
    }

    /// Only planning is bounded by `item_timeout`. Once a write is issued it
    /// runs to completion and its notification is emitted.
    async fn run_item(
        batch: &BatchContext<'_>,
        index: usize,
        item: &BulkShiftItem,
        item_timeout: Duration,
    ) -> ItemOutcome {
        let outcome = match tokio::time::timeout(item_timeout, Self::plan_item(batch, item)).await {
            Ok(Ok(planned)) => Self::apply_item(batch, planned).await,
            Ok(Err(e)) => Err(e),
            Err(_) => {
                warn!(index, timeout_ms = item_timeout.as_millis() as u64, "bulk item timed out");
                Err(ItemError::new(item.user_id, item.date.as_deref(), "Timed out"))
            }
        };
        match outcome {
            Ok(success) => ItemOutcome::Success(BulkSuccess { index, ..success }),
            Err(e) => {
                debug!(index, reason = %e.reason, "bulk item rejected");
                ItemOutcome::Failure(BulkFailure {
                    index,
                    user_id: e.user_id,
                    date: e.date,
                    error: e.reason,
                })
            }
        }
    }

    /// Validates the item and reads what the write needs. Nothing is mutated.
    async fn plan_item(
        batch: &BatchContext<'_>,
        item: &BulkShiftItem,
    ) -> Result<PlannedItem, ItemError> {
        let store = batch.store;
        let mut user_id = item.user_id;
        let mut date = item.date.clone();
        let mut existing: Option<Shift> = None;

        if let Some(shift_id) = item.shift_id {
            match store.find_shift(shift_id).await {
                Ok(Some(shift)) if shift.team_id == batch.team_id => {
                    user_id = Some(shift.user_id);
                    date = Some(shift.date.format("%Y-%m-%d").to_string());
                    existing = Some(shift);
                }
                Ok(_) => {
                    return Err(ItemError::new(user_id, date.as_deref(), "Shift not found"));
                }
                Err(e) => return Err(backend_failure(user_id, date.as_deref(), e)),
            }
        }

        let (user_id, date) = match (user_id, date) {
            (Some(user_id), Some(date)) => (user_id, date),
            (user_id, date) => {
                let reason = if batch.action == BulkAction::Create {
                    "userId and date are required"
                } else {
                    "Shift is required"
                };
                return Err(ItemError::new(user_id, date.as_deref(), reason));
            }
        };
        let fail = |reason: &str| ItemError::new(Some(user_id), Some(&date), reason);

        let day = parse_date(&date).map_err(|_| fail("Invalid date format"))?;

        let times = if batch.action == BulkAction::Delete {
            None
        } else {
            let (Some(shift_type_id), Some(start), Some(end)) =
                (item.shift_type_id, item.start_time.as_deref(), item.end_time.as_deref())
            else {
                return Err(fail("shiftTypeId, startTime, and endTime are required"));
            };
            let start = parse_time(start).map_err(|_| fail("Invalid time format"))?;
            let end = parse_time(end).map_err(|_| fail("Invalid time format"))?;
            Some((shift_type_id, start, end))
        };

        let user = match batch.users.get(&user_id) {
            Some(user) => user.clone(),
            None => match store.find_user(user_id).await {
                Ok(Some(user)) => user,
                Ok(None) => return Err(fail("User not found")),
                Err(e) => return Err(backend_failure(Some(user_id), Some(&date), e)),
            },
        };
        if user.team_id != batch.team_id {
            return Err(fail("User must belong to team"));
        }

        let resolved = match times {
            Some((shift_type_id, start, end)) => {
                let Some(shift_type) = batch.shift_types.get(&shift_type_id) else {
                    return Err(fail("Shift type not found"));
                };
                Some((
                    shift_type,
                    resolve_shift_window(day, start, end, shift_type.crosses_midnight),
                ))
            }
            None => None,
        };

        if existing.is_none() {
            existing = store
                .find_shift_on(batch.team_id, user_id, day)
                .await
                .map_err(|e| backend_failure(Some(user_id), Some(&date), e))?;
        }

        let comment = item
            .comment
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        let write = match (batch.action, resolved, existing) {
            (BulkAction::Create, Some(_), Some(_)) => return Err(fail("Shift already exists")),
            (BulkAction::Create, Some((shift_type, window)), None) => PlannedWrite::Insert(Shift {
                id: Uuid::new_v4(),
                team_id: batch.team_id,
                user_id,
                date: day,
                start_date_time: window.start,
                end_date_time: window.end,
                shift_type_id: shift_type.id,
                comment,
            }),
            (BulkAction::Update, Some((shift_type, window)), Some(shift)) => PlannedWrite::Update(
                shift.id,
                ShiftChanges {
                    user_id: shift.user_id,
                    date: shift.date,
                    start_date_time: window.start,
                    end_date_time: window.end,
                    shift_type_id: shift_type.id,
                    comment,
                },
            ),
            (BulkAction::Delete, _, Some(shift)) => PlannedWrite::Delete(shift.id),
            _ => return Err(fail("Shift not found")),
        };

        Ok(PlannedItem {
            user_id,
            date,
            write,
        })
    }

    /// Returns the success row with `index` left at 0; the caller fills it in.
    async fn apply_item(
        batch: &BatchContext<'_>,
        planned: PlannedItem,
    ) -> Result<BulkSuccess, ItemError> {
        let store = batch.store;
        let PlannedItem {
            user_id,
            date,
            write,
        } = planned;
        let fail = |reason: &str| ItemError::new(Some(user_id), Some(&date), reason);

        let (shift_id, kind, title, message) = match write {
            PlannedWrite::Insert(shift) => {
                let created = store.insert_shift(shift).await.map_err(|e| match e {
                    StoreError::Duplicate(_) => fail("Shift already exists"),
                    other => backend_failure(Some(user_id), Some(&date), other),
                })?;
                (
                    created.id,
                    NotificationKind::ShiftCreated,
                    SHIFT_CREATED_TITLE,
                    format!("Ny vakt opprettet for {}", date),
                )
            }
            PlannedWrite::Update(shift_id, changes) => {
                match store.update_shift(shift_id, changes).await {
                    Ok(Some(updated)) => (
                        updated.id,
                        NotificationKind::ShiftUpdated,
                        SHIFT_UPDATED_TITLE,
                        format!("Vakt oppdatert for {}", date),
                    ),
                    Ok(None) => return Err(fail("Shift not found")),
                    Err(e) => return Err(backend_failure(Some(user_id), Some(&date), e)),
                }
            }
            PlannedWrite::Delete(shift_id) => match store.delete_shift(shift_id).await {
                Ok(true) => (
                    shift_id,
                    NotificationKind::ShiftDeleted,
                    SHIFT_DELETED_TITLE,
                    format!("Vakt slettet for {}", date),
                ),
                Ok(false) => return Err(fail("Shift not found")),
                Err(e) => return Err(backend_failure(Some(user_id), Some(&date), e)),
            },
        };

        batch
            .emitter
            .emit(NotificationDraft::new(
                batch.team_id,
                Some(user_id),
                kind,
                title,
                message,
            ))
            .await;

        Ok(BulkSuccess {
            index: 0,
            user_id,
            date,
            shift_id,
        })
    }
}

fn backend_failure(user_id: Option<Uuid>, date: Option<&str>, err: StoreError) -> ItemError {
    error!(?user_id, ?date, error = %err, "bulk item store failure");
    ItemError::new(user_id, date, "Internal error")
}
