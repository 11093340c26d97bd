use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Global template for a category of shift.
#[derive(Queryable, Selectable, Insertable, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[diesel(table_name = crate::schema::shift_types)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct ShiftType {
    pub id: Uuid,
    pub code: String,
    pub label: String,
    pub color: String,
    pub default_start_time: String,
    pub default_end_time: String,
    pub crosses_midnight: bool,
}

#[derive(AsChangeset, Clone, Debug)]
#[diesel(table_name = crate::schema::shift_types)]
pub struct ShiftTypeChanges {
    pub code: String,
    pub label: String,
    pub color: String,
    pub default_start_time: String,
    pub default_end_time: String,
    pub crosses_midnight: bool,
}

impl ShiftTypeChanges {
    pub fn apply_to(&self, shift_type: &mut ShiftType) {
        shift_type.code = self.code.clone();
        shift_type.label = self.label.clone();
        shift_type.color = self.color.clone();
        shift_type.default_start_time = self.default_start_time.clone();
        shift_type.default_end_time = self.default_end_time.clone();
        shift_type.crosses_midnight = self.crosses_midnight;
    }
}
