use chrono::NaiveDateTime;
use diesel::sql_types::{BigInt, Integer, Text, Timestamp};
use diesel::{Queryable, QueryableByName, Selectable};
use log::info;
use rocket::serde::json::{Json, Value};

use crate::db::schema::articles;
use crate::db::Db;
use crate::types::{ApiError, ApiResult};
use crate::utils::serialize_date;
use crate::validators;

/// Articles newest first with their comment counts. `$1` is the topic to
/// filter on, or NULL for every topic.
pub static SELECT_ARTICLE_SUMMARIES: &str = "select articles.article_id as article_id,
       articles.title as title,
       articles.topic as topic,
       articles.author as author,
       articles.created_at as created_at,
       articles.votes as votes,
       articles.article_img_url as article_img_url,
       count(comments.comment_id) as comment_count
  from articles LEFT JOIN comments on comments.article_id = articles.article_id
 where ($1::varchar is null or articles.topic = $1)
 group by articles.article_id
 order by articles.created_at desc, articles.article_id desc;";

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize)]
#[diesel(table_name = articles, check_for_backend(diesel::pg::Pg))]
pub struct Article {
    pub article_id: i32,
    pub title: String,
    pub topic: String,
    pub author: String,
    pub body: String,
    #[serde(serialize_with = "serialize_date")]
    pub created_at: NaiveDateTime,
    pub votes: i32,
    pub article_img_url: String,
}

/// An article as it appears in listings: no body, plus how many comments it
/// has.
#[derive(Debug, Clone, PartialEq, QueryableByName, Serialize)]
pub struct ArticleSummary {
    #[diesel(sql_type = Integer)]
    pub article_id: i32,
    #[diesel(sql_type = Text)]
    pub title: String,
    #[diesel(sql_type = Text)]
    pub topic: String,
    #[diesel(sql_type = Text)]
    pub author: String,
    #[diesel(sql_type = Timestamp)]
    #[serde(serialize_with = "serialize_date")]
    pub created_at: NaiveDateTime,
    #[diesel(sql_type = Integer)]
    pub votes: i32,
    #[diesel(sql_type = Text)]
    pub article_img_url: String,
    #[diesel(sql_type = BigInt)]
    pub comment_count: i64,
}

#[derive(Debug, Serialize)]
pub struct ArticleContainer {
    result: Vec<Article>,
}

#[derive(Debug, Serialize)]
pub struct ArticlesContainer {
    articles: Vec<ArticleSummary>,
}

#[derive(Debug, Serialize)]
pub struct VotesContainer {
    votes: i32,
}

/// Body of `PATCH /api/articles/<id>`. `IncrementBy` may arrive as a JSON
/// number or as a string holding one, so it is kept raw until the article
/// has been checked.
#[derive(Debug, Deserialize)]
pub struct VotePatch {
    #[serde(rename = "IncrementBy", default)]
    increment_by: Option<Value>,
}

impl VotePatch {
    pub fn delta(&self) -> Result<i32, ApiError> {
        let delta = match self.increment_by {
            Some(Value::Number(ref n)) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
            Some(Value::String(ref s)) => s.trim().parse::<i32>().ok(),
            _ => None,
        };
        delta.ok_or_else(|| ApiError::bad_request("IncrementBy must be an integer"))
    }
}

#[get("/articles?<topic>")]
pub fn list(db: Db, topic: Option<&str>) -> ApiResult<ArticlesContainer> {
    if let Some(slug) = topic {
        validators::topic(&*db, slug)?;
    }
    let articles = db.articles(topic)?;
    Ok(Json(ArticlesContainer { articles }))
}

#[get("/articles/<article_id>")]
pub fn get(db: Db, article_id: &str) -> ApiResult<ArticleContainer> {
    let id = validators::article_id(&*db, article_id)?;
    let article = db.article(id)?;
    Ok(Json(ArticleContainer {
        result: vec![article],
    }))
}

#[patch("/articles/<article_id>", data = "<patch>")]
pub fn patch_votes(
    db: Db,
    article_id: &str,
    patch: Json<VotePatch>,
) -> ApiResult<VotesContainer> {
    let id = validators::article_id(&*db, article_id)?;
    let delta = patch.delta()?;
    let article = db
        .apply_vote_delta(id, delta)?
        .ok_or_else(|| ApiError::bad_request("IncrementBy takes votes out of range"))?;
    info!("article {} votes {:+} -> {}", id, delta, article.votes);
    Ok(Json(VotesContainer {
        votes: article.votes,
    }))
}
