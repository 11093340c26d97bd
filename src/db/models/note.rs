use crate::db::enums::{NoteStatus, NoteType};
use crate::db::models::UserSummary;
use chrono::NaiveDate;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const NOTE_VISIBILITY_ALL: &str = "ALL";

#[derive(Queryable, Selectable, Insertable, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[diesel(table_name = crate::schema::notes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub team_id: Uuid,
    pub created_by_user_id: Uuid,
    #[serde(rename = "type")]
    pub note_type: NoteType,
    pub status: NoteStatus,
    pub title: Option<String>,
    pub body: String,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub visibility: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Note {
    /// Display name used in notifications: the title, else the type.
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(self.note_type.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct NoteFilter {
    pub team_id: Uuid,
    pub overlapping: Option<(NaiveDate, NaiveDate)>,
}

impl NoteFilter {
    pub fn matches(&self, note: &Note) -> bool {
        note.team_id == self.team_id
            && self
                .overlapping
                .map_or(true, |(from, to)| note.date_from <= to && note.date_to >= from)
    }
}

/// Note as listed to clients, with its author resolved.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NoteDetail {
    #[serde(flatten)]
    pub note: Note,
    pub created_by: Option<UserSummary>,
}
