use diesel::prelude::*;
use uuid::Uuid;

use crate::db::models::{ShiftType, ShiftTypeChanges};

pub struct ShiftTypesRepo;

impl ShiftTypesRepo {
    pub fn insert(
        conn: &mut PgConnection,
        shift_type: &ShiftType,
    ) -> Result<ShiftType, diesel::result::Error> {
        diesel::insert_into(crate::schema::shift_types::table)
            .values(shift_type)
            .returning(ShiftType::as_returning())
            .get_result(conn)
    }

    pub fn find_by_id(
        conn: &mut PgConnection,
        type_id: Uuid,
    ) -> Result<Option<ShiftType>, diesel::result::Error> {
        use crate::schema::shift_types::dsl::*;
        shift_types
            .filter(id.eq(type_id))
            .select(ShiftType::as_select())
            .first(conn)
            .optional()
    }

    pub fn find_by_ids(
        conn: &mut PgConnection,
        type_ids: &[Uuid],
    ) -> Result<Vec<ShiftType>, diesel::result::Error> {
        use crate::schema::shift_types::dsl::*;
        shift_types
            .filter(id.eq_any(type_ids))
            .select(ShiftType::as_select())
            .load(conn)
    }

    pub fn list(conn: &mut PgConnection) -> Result<Vec<ShiftType>, diesel::result::Error> {
        use crate::schema::shift_types::dsl::*;
        shift_types
            .order(code.asc())
            .select(ShiftType::as_select())
            .load(conn)
    }

    pub fn update(
        conn: &mut PgConnection,
        type_id: Uuid,
        changes: &ShiftTypeChanges,
    ) -> Result<Option<ShiftType>, diesel::result::Error> {
        use crate::schema::shift_types::dsl::*;
        diesel::update(shift_types.filter(id.eq(type_id)))
            .set(changes)
            .returning(ShiftType::as_returning())
            .get_result(conn)
            .optional()
    }

    pub fn is_referenced(
        conn: &mut PgConnection,
        type_id: Uuid,
    ) -> Result<bool, diesel::result::Error> {
        use crate::schema::shifts::dsl::*;
        diesel::select(diesel::dsl::exists(shifts.filter(shift_type_id.eq(type_id))))
            .get_result(conn)
    }

    pub fn delete(conn: &mut PgConnection, type_id: Uuid) -> Result<bool, diesel::result::Error> {
        use crate::schema::shift_types::dsl::*;
        let removed = diesel::delete(shift_types.filter(id.eq(type_id))).execute(conn)?;
        Ok(removed > 0)
    }
}
