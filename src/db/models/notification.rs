use crate::db::enums::NotificationKind;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Side-effect record of a state change; `user_id: None` means team-wide.
#[derive(Queryable, Selectable, Insertable, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[diesel(table_name = crate::schema::notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NotificationFilter {
    pub user_id: Option<Uuid>,
    pub team_id: Option<Uuid>,
}

impl NotificationFilter {
    pub fn matches(&self, notification: &Notification) -> bool {
        self.user_id.map_or(true, |id| notification.user_id == Some(id))
            && self.team_id.map_or(true, |id| notification.team_id == id)
    }
}

#[derive(Queryable, Selectable, Insertable, AsChangeset, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[diesel(table_name = crate::schema::notification_settings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub team_id: Uuid,
    pub email_enabled: bool,
    pub sms_endpoint: Option<String>,
}

impl NotificationSettings {
    pub fn defaults_for(team_id: Uuid) -> Self {
        Self {
            team_id,
            email_enabled: true,
            sms_endpoint: None,
        }
    }
}
