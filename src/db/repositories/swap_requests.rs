use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::enums::SwapRequestStatus;
use crate::db::models::SwapRequest;

pub struct SwapRequestsRepo;

impl SwapRequestsRepo {
    pub fn insert(
        conn: &mut PgConnection,
        request: &SwapRequest,
    ) -> Result<SwapRequest, diesel::result::Error> {
        diesel::insert_into(crate::schema::swap_requests::table)
            .values(request)
            .returning(SwapRequest::as_returning())
            .get_result(conn)
    }

    pub fn find_by_id(
        conn: &mut PgConnection,
        request_id: Uuid,
    ) -> Result<Option<SwapRequest>, diesel::result::Error> {
        use crate::schema::swap_requests::dsl::*;
        swap_requests
            .filter(id.eq(request_id))
            .select(SwapRequest::as_select())
            .first(conn)
            .optional()
    }

    pub fn list_by_team(
        conn: &mut PgConnection,
        team: Uuid,
    ) -> Result<Vec<SwapRequest>, diesel::result::Error> {
        use crate::schema::swap_requests::dsl::*;
        swap_requests
            .filter(team_id.eq(team))
            .order(created_at.desc())
            .select(SwapRequest::as_select())
            .load(conn)
    }

    /// Compare-and-set on `status`; returns `None` when the row is not in `from`.
    pub fn transition(
        conn: &mut PgConnection,
        request_id: Uuid,
        from: SwapRequestStatus,
        to: SwapRequestStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<SwapRequest>, diesel::result::Error> {
        use crate::schema::swap_requests::dsl::*;
        diesel::update(swap_requests.filter(id.eq(request_id)).filter(status.eq(from)))
            .set((status.eq(to), decided_at.eq(Some(at))))
            .returning(SwapRequest::as_returning())
            .get_result(conn)
            .optional()
    }
}
