use diesel::prelude::*;
use uuid::Uuid;

use crate::db::enums::NoteStatus;
use crate::db::models::{Note, NoteFilter};

pub struct NotesRepo;

impl NotesRepo {
    pub fn insert(conn: &mut PgConnection, note: &Note) -> Result<Note, diesel::result::Error> {
        diesel::insert_into(crate::schema::notes::table)
            .values(note)
            .returning(Note::as_returning())
            .get_result(conn)
    }

    pub fn list(
        conn: &mut PgConnection,
        filter: &NoteFilter,
    ) -> Result<Vec<Note>, diesel::result::Error> {
        use crate::schema::notes::dsl::*;
        let mut query = notes.filter(team_id.eq(filter.team_id)).into_boxed();
        if let Some((from, to)) = filter.overlapping {
            query = query.filter(date_from.le(to)).filter(date_to.ge(from));
        }
        query
            .order(created_at.desc())
            .select(Note::as_select())
            .load(conn)
    }

    pub fn update_status(
        conn: &mut PgConnection,
        note_id: Uuid,
        new_status: NoteStatus,
    ) -> Result<Option<Note>, diesel::result::Error> {
        use crate::schema::notes::dsl::*;
        diesel::update(notes.filter(id.eq(note_id)))
            .set(status.eq(new_status))
            .returning(Note::as_returning())
            .get_result(conn)
            .optional()
    }
}
