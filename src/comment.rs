use chrono::{NaiveDateTime, Utc};
use diesel::{Insertable, Queryable, Selectable};
use log::info;
use rocket::serde::json::{Json, Value};
use serde_json::json;

use crate::db::schema::comments;
use crate::db::Db;
use crate::types::{ApiError, ApiResult, Validate};
use crate::utils::serialize_date;
use crate::validators;

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize)]
#[diesel(table_name = comments, check_for_backend(diesel::pg::Pg))]
pub struct Comment {
    pub comment_id: i32,
    pub body: String,
    pub article_id: i32,
    pub author: String,
    pub votes: i32,
    #[serde(serialize_with = "serialize_date")]
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
pub struct NewComment {
    pub article_id: i32,
    pub author: String,
    pub body: String,
    pub created_at: NaiveDateTime,
}

/// Body of `POST /api/articles/<id>/comments`. Missing fields count as empty.
#[derive(Debug, Deserialize)]
pub struct CommentBody {
    #[serde(default)]
    username: String,
    #[serde(default)]
    body: String,
}

impl Validate for CommentBody {
    type Error = ApiError;
    fn validate(self) -> Result<Self, ApiError> {
        if self.username.is_empty() || self.body.is_empty() {
            Err(ApiError::bad_request("username or comment are empty"))
        } else {
            Ok(self)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommentContainer<T> {
    comment: T,
}

#[derive(Debug, Serialize)]
pub struct CommentsContainer<T> {
    comments: T,
}

#[get("/articles/<article_id>/comments")]
pub fn list(db: Db, article_id: &str) -> ApiResult<CommentsContainer<Vec<Comment>>> {
    let id = validators::article_id(&*db, article_id)?;
    let comments = db.comments(id)?;
    Ok(Json(CommentsContainer { comments }))
}

#[post("/articles/<article_id>/comments", data = "<details>")]
pub fn add(
    db: Db,
    article_id: &str,
    details: Json<CommentBody>,
) -> ApiResult<CommentContainer<Comment>> {
    let details = details.validate()?.into_inner();
    let id = validators::article_id(&*db, article_id)?;
    validators::username(&*db, &details.username)?;

    let new_comment = NewComment {
        article_id: id,
        author: details.username,
        body: details.body,
        created_at: Utc::now().naive_utc(),
    };
    let comment = db.insert_comment(&new_comment)?;
    info!(
        "comment {} added to article {} by {}",
        comment.comment_id, comment.article_id, comment.author
    );

    Ok(Json(CommentContainer { comment }))
}

#[delete("/comments/<comment_id>")]
pub fn delete(db: Db, comment_id: &str) -> ApiResult<Value> {
    let id = validators::comment_id(&*db, comment_id)?;
    let deleted = db.delete_comment(id)?;
    info!("comment {} deleted", id);
    Ok(Json(json!({ "data": [{ "bool": deleted }] })))
}
