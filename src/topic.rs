use diesel::{Queryable, Selectable};
use rocket::serde::json::Json;

use crate::db::schema::topics;
use crate::db::Db;
use crate::types::ApiResult;

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize)]
#[diesel(table_name = topics, check_for_backend(diesel::pg::Pg))]
pub struct Topic {
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct TopicsContainer {
    topics: Vec<Topic>,
}

#[get("/topics")]
pub fn list(db: Db) -> ApiResult<TopicsContainer> {
    let topics = db.topics()?;
    Ok(Json(TopicsContainer { topics }))
}
