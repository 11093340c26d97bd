use crate::db::enums::SwapRequestStatus;
use crate::db::models::{ShiftDetail, UserSummary};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Proposal to move a shift from `from_user_id` to `to_user_id`.
#[derive(Queryable, Selectable, Insertable, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[diesel(table_name = crate::schema::swap_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    pub id: Uuid,
    pub team_id: Uuid,
    pub requested_by_user_id: Uuid,
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    pub shift_id: Uuid,
    pub status: SwapRequestStatus,
    pub message: Option<String>,
    pub decided_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Swap request as listed to clients, with the people and shift resolved.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequestDetail {
    #[serde(flatten)]
    pub request: SwapRequest,
    pub requested_by: Option<UserSummary>,
    pub from_user: Option<UserSummary>,
    pub to_user: Option<UserSummary>,
    pub shift: Option<ShiftDetail>,
}
