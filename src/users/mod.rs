use crate::db::Db;
use crate::types::ApiResult;
use rocket::serde::json::Json;

pub mod models;

#[derive(Debug, Serialize)]
pub struct UsersContainer {
    users: Vec<models::User>,
}

#[get("/users")]
pub fn list(db: Db) -> ApiResult<UsersContainer> {
    let users = db.users()?;
    Ok(Json(UsersContainer { users }))
}
