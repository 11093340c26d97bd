use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    db::enums::NotificationKind,
    db::models::api::error_codes,
    db::models::{Shift, ShiftChanges, ShiftDetail, ShiftFilter, ShiftType, User, UserSummary},
    db::store::{Store, StoreError},
    error::{AppError, AppResult},
    routes::shifts::{ShiftQuery, ShiftRequest},
    services::authz::{self, Action},
    services::context::RequestContext,
    services::notifications_service::{NotificationDraft, NotificationEmitter},
    services::shift_time::{parse_date, parse_time, resolve_shift_window},
};

pub(crate) const SHIFT_CREATED_TITLE: &str = "Vakt opprettet";
pub(crate) const SHIFT_UPDATED_TITLE: &str = "Vakt oppdatert";
pub(crate) const SHIFT_DELETED_TITLE: &str = "Vakt slettet";

/// Raw request fields once presence has been checked.
struct ShiftInput<'a> {
    date: &'a str,
    user_id: Uuid,
    shift_type_id: Uuid,
    start_time: &'a str,
    end_time: &'a str,
}

impl<'a> ShiftInput<'a> {
    fn from_request(req: &'a ShiftRequest) -> AppResult<Self> {
        match (
            req.date.as_deref(),
            req.user_id,
            req.shift_type_id,
            req.start_time.as_deref(),
            req.end_time.as_deref(),
        ) {
            (Some(date), Some(user_id), Some(shift_type_id), Some(start_time), Some(end_time)) => {
                Ok(Self {
                    date,
                    user_id,
                    shift_type_id,
                    start_time,
                    end_time,
                })
            }
            _ => Err(AppError::validation("Missing required fields")),
        }
    }
}

fn normalize_comment(comment: &Option<String>) -> Option<String> {
    comment
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

fn duplicate_conflict(err: StoreError) -> AppError {
    match err {
        StoreError::Duplicate(message) => {
            AppError::conflict_with_code(message, None, error_codes::SHIFT_DUPLICATE)
        }
        other => other.into(),
    }
}

pub struct ShiftsService;

impl ShiftsService {
    /// Lists the given team's shifts, the caller's team by default.
    /// `date_from`/`date_to` narrow the result only when both are given.
    pub async fn list(
        store: &dyn Store,
        ctx: &RequestContext,
        query: &ShiftQuery,
    ) -> AppResult<Vec<ShiftDetail>> {
        let date_range = match (query.date_from.as_deref(), query.date_to.as_deref()) {
            (Some(from), Some(to)) => Some((parse_date(from)?, parse_date(to)?)),
            _ => None,
        };
        let shifts = store
            .list_shifts(ShiftFilter {
                team_id: query.team_id.unwrap_or(ctx.team_id),
                date_range,
                user_id: query.user_id,
            })
            .await?;
        Self::enrich(store, shifts).await
    }

    /// Attaches shift type and owner summary to each shift.
    pub async fn enrich(store: &dyn Store, shifts: Vec<Shift>) -> AppResult<Vec<ShiftDetail>> {
        let mut user_ids: Vec<Uuid> = shifts.iter().map(|s| s.user_id).collect();
        user_ids.sort();
        user_ids.dedup();
        let mut type_ids: Vec<Uuid> = shifts.iter().map(|s| s.shift_type_id).collect();
        type_ids.sort();
        type_ids.dedup();

        let users: HashMap<Uuid, User> = store
            .find_users(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();
        let types: HashMap<Uuid, ShiftType> = store
            .find_shift_types(&type_ids)
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect();

        Ok(shifts
            .into_iter()
            .map(|shift| ShiftDetail {
                shift_type: types.get(&shift.shift_type_id).cloned(),
                user: users.get(&shift.user_id).map(UserSummary::from),
                shift,
            })
            .collect())
    }

    pub async fn create(
        store: &dyn Store,
        emitter: &NotificationEmitter,
        ctx: &RequestContext,
        req: &ShiftRequest,
    ) -> AppResult<ShiftDetail> {
        authz::require(ctx, Action::EditShifts)?;
        let input = ShiftInput::from_request(req)?;
        let date = parse_date(input.date)?;
        let start = parse_time(input.start_time)?;
        let end = parse_time(input.end_time)?;

        let user = store
            .find_user(input.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        let team_id = req.team_id.unwrap_or(user.team_id);
        authz::require_team(ctx, team_id)?;
        if user.team_id != team_id {
            return Err(AppError::validation("User must belong to team"));
        }

        let shift_type = store
            .find_shift_type(input.shift_type_id)
            .await?
            .ok_or_else(|| AppError::not_found("Shift type not found"))?;

        let window = resolve_shift_window(date, start, end, shift_type.crosses_midnight);
        let shift = store
            .insert_shift(Shift {
                id: Uuid::new_v4(),
                team_id,
                user_id: user.id,
                date,
                start_date_time: window.start,
                end_date_time: window.end,
                shift_type_id: shift_type.id,
                comment: normalize_comment(&req.comment),
            })
            .await
            .map_err(duplicate_conflict)?;

        tracing::info!(
            shift_id = %shift.id,
            %team_id,
            user_id = %user.id,
            date = %shift.date,
            shift_type = %shift_type.code,
            "shift created"
        );

        emitter
            .emit(NotificationDraft::new(
                team_id,
                Some(user.id),
                NotificationKind::ShiftCreated,
                SHIFT_CREATED_TITLE,
                format!("Ny vakt opprettet for {} på {}", user.name, shift.date),
            ))
            .await;

        Ok(ShiftDetail {
            user: Some(UserSummary::from(&user)),
            shift_type: Some(shift_type),
            shift,
        })
    }

    pub async fn update(
        store: &dyn Store,
        emitter: &NotificationEmitter,
        ctx: &RequestContext,
        shift_id: Uuid,
        req: &ShiftRequest,
    ) -> AppResult<ShiftDetail> {
        authz::require(ctx, Action::EditShifts)?;
        let input = ShiftInput::from_request(req)?;
        let date = parse_date(input.date)?;
        let start = parse_time(input.start_time)?;
        let end = parse_time(input.end_time)?;

        let existing = store
            .find_shift(shift_id)
            .await?
            .ok_or_else(|| AppError::not_found("Shift not found"))?;
        authz::require_team(ctx, existing.team_id)?;

        let shift_type = store
            .find_shift_type(input.shift_type_id)
            .await?
            .ok_or_else(|| AppError::not_found("Shift type not found"))?;

        let user = store
            .find_user(input.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        if user.team_id != existing.team_id {
            return Err(AppError::validation("User must belong to team"));
        }

        let window = resolve_shift_window(date, start, end, shift_type.crosses_midnight);
        let changes = ShiftChanges {
            user_id: user.id,
            date,
            start_date_time: window.start,
            end_date_time: window.end,
            shift_type_id: shift_type.id,
            comment: normalize_comment(&req.comment),
        };

        let shift = store
            .update_shift(shift_id, changes)
            .await
            .map_err(duplicate_conflict)?
            .ok_or_else(|| AppError::not_found("Shift not found"))?;

        tracing::info!(
            %shift_id,
            previous_user_id = %existing.user_id,
            user_id = %shift.user_id,
            date = %shift.date,
            "shift updated"
        );

        emitter
            .emit(NotificationDraft::new(
                existing.team_id,
                Some(existing.user_id),
                NotificationKind::ShiftUpdated,
                SHIFT_UPDATED_TITLE,
                format!("Vakt oppdatert for {} på {}", user.name, shift.date),
            ))
            .await;

        Ok(ShiftDetail {
            user: Some(UserSummary::from(&user)),
            shift_type: Some(shift_type),
            shift,
        })
    }

    pub async fn delete(
        store: &dyn Store,
        emitter: &NotificationEmitter,
        ctx: &RequestContext,
        shift_id: Uuid,
    ) -> AppResult<()> {
        authz::require(ctx, Action::EditShifts)?;
        let shift = store
            .find_shift(shift_id)
            .await?
            .ok_or_else(|| AppError::not_found("Shift not found"))?;
        authz::require_team(ctx, shift.team_id)?;

        if !store.delete_shift(shift_id).await? {
            return Err(AppError::not_found("Shift not found"));
        }
        tracing::info!(%shift_id, user_id = %shift.user_id, date = %shift.date, "shift deleted");

        let owner_name = store
            .find_user(shift.user_id)
            .await
            .ok()
            .flatten()
            .map(|u| u.name)
            .unwrap_or_default();
        emitter
            .emit(NotificationDraft::new(
                shift.team_id,
                Some(shift.user_id),
                NotificationKind::ShiftDeleted,
                SHIFT_DELETED_TITLE,
                format!("Vakt slettet for {} på {}", owner_name, shift.date),
            ))
            .await;
        Ok(())
    }
}
