use crate::db::models::{ShiftType, UserSummary};
use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One user's work period on one calendar date.
#[derive(Queryable, Selectable, Insertable, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[diesel(table_name = crate::schema::shifts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub start_date_time: NaiveDateTime,
    pub end_date_time: NaiveDateTime,
    pub shift_type_id: Uuid,
    pub comment: Option<String>,
}

/// Full replacement of a shift's mutable fields. `comment: None` clears it.
#[derive(AsChangeset, Clone, Debug)]
#[diesel(table_name = crate::schema::shifts)]
#[diesel(treat_none_as_null = true)]
pub struct ShiftChanges {
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub start_date_time: NaiveDateTime,
    pub end_date_time: NaiveDateTime,
    pub shift_type_id: Uuid,
    pub comment: Option<String>,
}

impl ShiftChanges {
    pub fn apply_to(&self, shift: &mut Shift) {
        shift.user_id = self.user_id;
        shift.date = self.date;
        shift.start_date_time = self.start_date_time;
        shift.end_date_time = self.end_date_time;
        shift.shift_type_id = self.shift_type_id;
        shift.comment = self.comment.clone();
    }
}

#[derive(Debug, Clone, Default)]
pub struct ShiftFilter {
    pub team_id: Uuid,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub user_id: Option<Uuid>,
}

impl ShiftFilter {
    pub fn matches(&self, shift: &Shift) -> bool {
        shift.team_id == self.team_id
            && self
                .date_range
                .map_or(true, |(from, to)| shift.date >= from && shift.date <= to)
            && self.user_id.map_or(true, |user_id| shift.user_id == user_id)
    }
}

/// Shift as listed to clients, with its type and owner resolved.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ShiftDetail {
    #[serde(flatten)]
    pub shift: Shift,
    pub shift_type: Option<ShiftType>,
    pub user: Option<UserSummary>,
}
