use diesel::prelude::*;
use uuid::Uuid;

use crate::db::enums::UserRole;
use crate::db::models::User;

pub struct UsersRepo;

impl UsersRepo {
    pub fn insert(conn: &mut PgConnection, user: &User) -> Result<User, diesel::result::Error> {
        diesel::insert_into(crate::schema::users::table)
            .values(user)
            .returning(User::as_returning())
            .get_result(conn)
    }

    pub fn find_by_id(
        conn: &mut PgConnection,
        user_id: Uuid,
    ) -> Result<Option<User>, diesel::result::Error> {
        use crate::schema::users::dsl::*;
        users
            .filter(id.eq(user_id))
            .select(User::as_select())
            .first(conn)
            .optional()
    }

    pub fn find_by_ids(
        conn: &mut PgConnection,
        user_ids: &[Uuid],
    ) -> Result<Vec<User>, diesel::result::Error> {
        use crate::schema::users::dsl::*;
        users
            .filter(id.eq_any(user_ids))
            .select(User::as_select())
            .load(conn)
    }

    pub fn list(
        conn: &mut PgConnection,
        team: Option<Uuid>,
    ) -> Result<Vec<User>, diesel::result::Error> {
        use crate::schema::users::dsl::*;
        let mut query = users.into_boxed();
        if let Some(team) = team {
            query = query.filter(team_id.eq(team));
        }
        query.order(name.asc()).select(User::as_select()).load(conn)
    }

    pub fn update_role(
        conn: &mut PgConnection,
        user_id: Uuid,
        new_role: UserRole,
    ) -> Result<Option<User>, diesel::result::Error> {
        use crate::schema::users::dsl::*;
        diesel::update(users.filter(id.eq(user_id)))
            .set(role.eq(new_role))
            .returning(User::as_returning())
            .get_result(conn)
            .optional()
    }
}
