use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Queryable, Selectable, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[diesel(table_name = crate::schema::teams)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Insertable, Clone, Debug)]
#[diesel(table_name = crate::schema::teams)]
pub struct NewTeam {
    pub id: Uuid,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl NewTeam {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: chrono::Utc::now(),
        }
    }
}

impl From<NewTeam> for Team {
    fn from(new: NewTeam) -> Self {
        Team {
            id: new.id,
            name: new.name,
            created_at: new.created_at,
        }
    }
}
