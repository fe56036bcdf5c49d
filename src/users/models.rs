use diesel::{Queryable, Selectable};

use crate::db::schema::users;

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize)]
#[diesel(table_name = users, check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub username: String,
    pub name: String,
    pub avatar_url: String,
}
