use chrono::NaiveDate;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::models::{Shift, ShiftChanges, ShiftFilter};

pub struct ShiftsRepo;

impl ShiftsRepo {
    pub fn insert(conn: &mut PgConnection, shift: &Shift) -> Result<Shift, diesel::result::Error> {
        diesel::insert_into(crate::schema::shifts::table)
            .values(shift)
            .returning(Shift::as_returning())
            .get_result(conn)
    }

    pub fn find_by_id(
        conn: &mut PgConnection,
        shift_id: Uuid,
    ) -> Result<Option<Shift>, diesel::result::Error> {
        use crate::schema::shifts::dsl::*;
        shifts
            .filter(id.eq(shift_id))
            .select(Shift::as_select())
            .first(conn)
            .optional()
    }

    /// Row-locks the shift for the rest of the transaction.
    pub fn find_by_id_for_update(
        conn: &mut PgConnection,
        shift_id: Uuid,
    ) -> Result<Option<Shift>, diesel::result::Error> {
        use crate::schema::shifts::dsl::*;
        shifts
            .filter(id.eq(shift_id))
            .select(Shift::as_select())
            .for_update()
            .first(conn)
            .optional()
    }

    pub fn find_on_date(
        conn: &mut PgConnection,
        team: Uuid,
        user: Uuid,
        on: NaiveDate,
    ) -> Result<Option<Shift>, diesel::result::Error> {
        use crate::schema::shifts::dsl::*;
        shifts
            .filter(team_id.eq(team))
            .filter(user_id.eq(user))
            .filter(date.eq(on))
            .select(Shift::as_select())
            .first(conn)
            .optional()
    }

    pub fn list(
        conn: &mut PgConnection,
        filter: &ShiftFilter,
    ) -> Result<Vec<Shift>, diesel::result::Error> {
        use crate::schema::shifts::dsl::*;
        let mut query = shifts.filter(team_id.eq(filter.team_id)).into_boxed();
        if let Some((from, to)) = filter.date_range {
            query = query.filter(date.ge(from)).filter(date.le(to));
        }
        if let Some(user) = filter.user_id {
            query = query.filter(user_id.eq(user));
        }
        query
            .order((date.asc(), start_date_time.asc()))
            .select(Shift::as_select())
            .load(conn)
    }

    pub fn update(
        conn: &mut PgConnection,
        shift_id: Uuid,
        changes: &ShiftChanges,
    ) -> Result<Option<Shift>, diesel::result::Error> {
        use crate::schema::shifts::dsl::*;
        diesel::update(shifts.filter(id.eq(shift_id)))
            .set(changes)
            .returning(Shift::as_returning())
            .get_result(conn)
            .optional()
    }

    pub fn reassign(
        conn: &mut PgConnection,
        shift_id: Uuid,
        new_owner: Uuid,
    ) -> Result<usize, diesel::result::Error> {
        use crate::schema::shifts::dsl::*;
        diesel::update(shifts.filter(id.eq(shift_id)))
            .set(user_id.eq(new_owner))
            .execute(conn)
    }

    /// Drops swap requests that point at the shift, then the shift.
    pub fn delete_cascade(
        conn: &mut PgConnection,
        shift_id: Uuid,
    ) -> Result<bool, diesel::result::Error> {
        use crate::schema::{shifts, swap_requests};
        diesel::delete(swap_requests::table.filter(swap_requests::shift_id.eq(shift_id)))
            .execute(conn)?;
        let removed = diesel::delete(shifts::table.filter(shifts::id.eq(shift_id))).execute(conn)?;
        Ok(removed > 0)
    }
}
