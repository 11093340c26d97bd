//! Swap request lifecycle: PENDING -> APPROVED | REJECTED, APPROVED -> EXECUTED.
//!
//! Every transition is a conditional update in the store, so of two
//! concurrent decisions on the same request only one lands; the other sees
//! a conflict.

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::enums::{NotificationKind, SwapRequestStatus},
    db::models::api::error_codes,
    db::models::{SwapRequest, SwapRequestDetail, User, UserSummary},
    db::store::{Store, StoreError},
    error::{AppError, AppResult},
    routes::swap_requests::CreateSwapRequest,
    services::authz::{self, Action},
    services::context::RequestContext,
    services::notifications_service::{NotificationDraft, NotificationEmitter},
    services::shifts_service::ShiftsService,
};

const NOT_PENDING: &str = "Swap request is not pending";
const NOT_APPROVED: &str = "Swap request must be approved before execution";

pub struct SwapRequestsService;

impl SwapRequestsService {
    /// Newest first.
    pub async fn list(
        store: &dyn Store,
        ctx: &RequestContext,
        team_id: Option<Uuid>,
    ) -> AppResult<Vec<SwapRequestDetail>> {
        let requests = store
            .list_swap_requests(team_id.unwrap_or(ctx.team_id))
            .await?;
        Self::enrich(store, requests).await
    }

    async fn enrich(
        store: &dyn Store,
        requests: Vec<SwapRequest>,
    ) -> AppResult<Vec<SwapRequestDetail>> {
        let mut user_ids: Vec<Uuid> = requests
            .iter()
            .flat_map(|r| [r.requested_by_user_id, r.from_user_id, r.to_user_id])
            .collect();
        user_ids.sort();
        user_ids.dedup();
        let users: HashMap<Uuid, UserSummary> = store
            .find_users(&user_ids)
            .await?
            .iter()
            .map(|u| (u.id, UserSummary::from(u)))
            .collect();

        let mut shifts = Vec::new();
        for shift_id in requests.iter().map(|r| r.shift_id) {
            if let Some(shift) = store.find_shift(shift_id).await? {
                shifts.push(shift);
            }
        }
        let shifts: HashMap<Uuid, _> = ShiftsService::enrich(store, shifts)
            .await?
            .into_iter()
            .map(|detail| (detail.shift.id, detail))
            .collect();

        Ok(requests
            .into_iter()
            .map(|request| SwapRequestDetail {
                requested_by: users.get(&request.requested_by_user_id).cloned(),
                from_user: users.get(&request.from_user_id).cloned(),
                to_user: users.get(&request.to_user_id).cloned(),
                shift: shifts.get(&request.shift_id).cloned(),
                request,
            })
            .collect())
    }

    /// Records a PENDING request from the caller to hand `shiftId` to `toUserId`.
    pub async fn create(
        store: &dyn Store,
        emitter: &NotificationEmitter,
        ctx: &RequestContext,
        req: &CreateSwapRequest,
    ) -> AppResult<SwapRequestDetail> {
        let (Some(shift_id), Some(to_user_id)) = (req.shift_id, req.to_user_id) else {
            return Err(AppError::validation("Missing required fields"));
        };
        if req.requested_by_user_id.is_some_and(|id| id != ctx.user_id) {
            return Err(AppError::forbidden(
                "Swap requests can only be made on your own behalf",
            ));
        }
        let team_id = req.team_id.unwrap_or(ctx.team_id);
        if team_id != ctx.team_id {
            return Err(AppError::forbidden("You are not a member of this team"));
        }

        let shift = store
            .find_shift(shift_id)
            .await?
            .filter(|s| s.team_id == team_id)
            .ok_or_else(|| AppError::not_found("Shift not found"))?;

        let to_user = store
            .find_user(to_user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        if to_user.team_id != team_id {
            return Err(AppError::validation("User must belong to team"));
        }
        if to_user.id == shift.user_id {
            return Err(AppError::validation("User already owns this shift"));
        }

        let request = store
            .insert_swap_request(SwapRequest {
                id: Uuid::new_v4(),
                team_id,
                requested_by_user_id: ctx.user_id,
                from_user_id: shift.user_id,
                to_user_id,
                shift_id,
                status: SwapRequestStatus::Pending,
                message: req
                    .message
                    .as_deref()
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .map(str::to_string),
                decided_at: None,
                created_at: Utc::now(),
            })
            .await?;

        tracing::info!(
            swap_request_id = %request.id,
            %shift_id,
            from_user_id = %request.from_user_id,
            %to_user_id,
            "swap request created"
        );

        let requester = store.find_user(ctx.user_id).await?;
        let requester_name = requester.as_ref().map(|u| u.name.as_str()).unwrap_or("Ukjent");
        emitter
            .emit(NotificationDraft::new(
                team_id,
                None,
                NotificationKind::SwapRequested,
                "Ny vaktbytteforespørsel",
                format!("{} har forespurt vaktbytte", requester_name),
            ))
            .await;

        let mut details = Self::enrich(store, vec![request]).await?;
        details
            .pop()
            .ok_or_else(|| AppError::internal("Swap request vanished after insert"))
    }

    pub async fn approve(
        store: &dyn Store,
        emitter: &NotificationEmitter,
        ctx: &RequestContext,
        request_id: Uuid,
    ) -> AppResult<SwapRequest> {
        let request = Self::decide(store, ctx, request_id, SwapRequestStatus::Approved).await?;
        emitter
            .emit(NotificationDraft::new(
                request.team_id,
                Some(request.requested_by_user_id),
                NotificationKind::SwapApproved,
                "Vaktbytteforespørsel godkjent",
                "Din forespørsel om vaktbytte er godkjent",
            ))
            .await;
        Ok(request)
    }

    pub async fn reject(
        store: &dyn Store,
        emitter: &NotificationEmitter,
        ctx: &RequestContext,
        request_id: Uuid,
    ) -> AppResult<SwapRequest> {
        let request = Self::decide(store, ctx, request_id, SwapRequestStatus::Rejected).await?;
        emitter
            .emit(NotificationDraft::new(
                request.team_id,
                Some(request.requested_by_user_id),
                NotificationKind::SwapRejected,
                "Vaktbytteforespørsel avvist",
                "Din forespørsel om vaktbytte er avvist",
            ))
            .await;
        Ok(request)
    }

    /// Hands the shift to the target user and closes the request.
    pub async fn execute(
        store: &dyn Store,
        emitter: &NotificationEmitter,
        ctx: &RequestContext,
        request_id: Uuid,
    ) -> AppResult<SwapRequest> {
        authz::require(ctx, Action::ApproveSwaps)?;
        let current = Self::find_in_team(store, ctx, request_id).await?;
        if current.status != SwapRequestStatus::Approved {
            return Err(not_approved());
        }

        let executed = match store.execute_swap_request(request_id, Utc::now()).await {
            Ok(Some(request)) => request,
            Ok(None) => return Err(not_approved()),
            Err(StoreError::Duplicate(message)) => {
                return Err(AppError::conflict_with_code(
                    message,
                    None,
                    error_codes::SHIFT_DUPLICATE,
                ));
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            swap_request_id = %executed.id,
            shift_id = %executed.shift_id,
            from_user_id = %executed.from_user_id,
            to_user_id = %executed.to_user_id,
            "swap request executed"
        );

        let names = Self::names(store, &[executed.from_user_id, executed.to_user_id]).await;
        let name_of = |id: Uuid| names.get(&id).cloned().unwrap_or_default();
        emitter
            .emit(NotificationDraft::new(
                executed.team_id,
                Some(executed.from_user_id),
                NotificationKind::SwapExecuted,
                "Vaktbytte utført",
                format!(
                    "Vaktbytte utført: {} har overtatt vakten",
                    name_of(executed.to_user_id)
                ),
            ))
            .await;
        emitter
            .emit(NotificationDraft::new(
                executed.team_id,
                Some(executed.to_user_id),
                NotificationKind::SwapExecuted,
                "Vaktbytte utført",
                format!(
                    "Du har overtatt vakten fra {}",
                    name_of(executed.from_user_id)
                ),
            ))
            .await;

        Ok(executed)
    }

    /// PENDING -> `to` for approve and reject.
    async fn decide(
        store: &dyn Store,
        ctx: &RequestContext,
        request_id: Uuid,
        to: SwapRequestStatus,
    ) -> AppResult<SwapRequest> {
        authz::require(ctx, Action::ApproveSwaps)?;
        let current = Self::find_in_team(store, ctx, request_id).await?;
        if !current.status.can_transition_to(to) {
            return Err(not_pending());
        }

        let updated = store
            .transition_swap_request(request_id, SwapRequestStatus::Pending, to, Utc::now())
            .await?
            .ok_or_else(not_pending)?;
        tracing::info!(
            swap_request_id = %request_id,
            status = updated.status.as_str(),
            decided_by = %ctx.user_id,
            "swap request decided"
        );
        Ok(updated)
    }

    async fn find_in_team(
        store: &dyn Store,
        ctx: &RequestContext,
        request_id: Uuid,
    ) -> AppResult<SwapRequest> {
        store
            .find_swap_request(request_id)
            .await?
            .filter(|r| r.team_id == ctx.team_id)
            .ok_or_else(|| AppError::not_found("Swap request not found"))
    }

    async fn names(store: &dyn Store, ids: &[Uuid]) -> HashMap<Uuid, String> {
        match store.find_users(ids).await {
            Ok(users) => users.into_iter().map(|u: User| (u.id, u.name)).collect(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to resolve user names for notification");
                HashMap::new()
            }
        }
    }
}

fn not_pending() -> AppError {
    AppError::conflict_with_code(NOT_PENDING, None, error_codes::SWAP_NOT_PENDING)
}

fn not_approved() -> AppError {
    AppError::conflict_with_code(NOT_APPROVED, None, error_codes::SWAP_NOT_APPROVED)
}
