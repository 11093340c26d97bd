use diesel::prelude::*;
use uuid::Uuid;

use crate::db::models::{Notification, NotificationFilter};

pub struct NotificationsRepo;

impl NotificationsRepo {
    pub fn insert(
        conn: &mut PgConnection,
        notification: &Notification,
    ) -> Result<Notification, diesel::result::Error> {
        diesel::insert_into(crate::schema::notifications::table)
            .values(notification)
            .returning(Notification::as_returning())
            .get_result(conn)
    }

    pub fn list(
        conn: &mut PgConnection,
        filter: &NotificationFilter,
        limit: i64,
    ) -> Result<Vec<Notification>, diesel::result::Error> {
        use crate::schema::notifications::dsl::*;
        let mut query = notifications.into_boxed();
        if let Some(user) = filter.user_id {
            query = query.filter(user_id.eq(user));
        }
        if let Some(team) = filter.team_id {
            query = query.filter(team_id.eq(team));
        }
        query
            .order(created_at.desc())
            .limit(limit)
            .select(Notification::as_select())
            .load(conn)
    }

    pub fn find_by_id(
        conn: &mut PgConnection,
        notification_id: Uuid,
    ) -> Result<Option<Notification>, diesel::result::Error> {
        use crate::schema::notifications::dsl::*;
        notifications
            .filter(id.eq(notification_id))
            .select(Notification::as_select())
            .first(conn)
            .optional()
    }

    pub fn mark_read(
        conn: &mut PgConnection,
        notification_id: Uuid,
    ) -> Result<Option<Notification>, diesel::result::Error> {
        use crate::schema::notifications::dsl::*;
        diesel::update(notifications.filter(id.eq(notification_id)))
            .set(read.eq(true))
            .returning(Notification::as_returning())
            .get_result(conn)
            .optional()
    }
}
