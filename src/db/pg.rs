use diesel::dsl::exists;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::ConnectionManager;
use diesel::sql_types::{Nullable, Text};
use diesel::{delete, insert_into, select, sql_query, update};

use super::schema::{articles, comments, topics, users};
use super::{Pool, Result, Store};
use crate::article::{Article, ArticleSummary, SELECT_ARTICLE_SUMMARIES};
use crate::comment::{Comment, NewComment};
use crate::topic::Topic;
use crate::users::models::User;

type PooledConn = r2d2::PooledConnection<ConnectionManager<PgConnection>>;

/// `Store` over a pool of Postgres connections. Each call checks out one
/// connection and returns it when done.
pub struct PgStore {
    pool: Pool,
}

impl PgStore {
    pub fn new(pool: Pool) -> PgStore {
        PgStore { pool }
    }

    fn connection(&self) -> Result<PooledConn> {
        Ok(self.pool.get()?)
    }
}

impl Store for PgStore {
    fn topics(&self) -> Result<Vec<Topic>> {
        let mut conn = self.connection()?;
        let topics = topics::table
            .order(topics::slug.asc())
            .select(Topic::as_select())
            .load(&mut *conn)?;
        Ok(topics)
    }

    fn users(&self) -> Result<Vec<User>> {
        let mut conn = self.connection()?;
        let users = users::table
            .order(users::username.asc())
            .select(User::as_select())
            .load(&mut *conn)?;
        Ok(users)
    }

    fn topic_exists(&self, slug: &str) -> Result<bool> {
        let mut conn = self.connection()?;
        let found = select(exists(topics::table.filter(topics::slug.eq(slug))))
            .get_result::<bool>(&mut *conn)?;
        Ok(found)
    }

    fn user_exists(&self, username: &str) -> Result<bool> {
        let mut conn = self.connection()?;
        let found = select(exists(users::table.filter(users::username.eq(username))))
            .get_result::<bool>(&mut *conn)?;
        Ok(found)
    }

    fn article_exists(&self, article_id: i32) -> Result<bool> {
        let mut conn = self.connection()?;
        let found = select(exists(articles::table.find(article_id)))
            .get_result::<bool>(&mut *conn)?;
        Ok(found)
    }

    fn comment_exists(&self, comment_id: i32) -> Result<bool> {
        let mut conn = self.connection()?;
        let found = select(exists(comments::table.find(comment_id)))
            .get_result::<bool>(&mut *conn)?;
        Ok(found)
    }

    fn article(&self, article_id: i32) -> Result<Article> {
        let mut conn = self.connection()?;
        let article = articles::table
            .find(article_id)
            .select(Article::as_select())
            .first(&mut *conn)?;
        Ok(article)
    }

    fn articles(&self, topic: Option<&str>) -> Result<Vec<ArticleSummary>> {
        let mut conn = self.connection()?;
        let summaries = sql_query(SELECT_ARTICLE_SUMMARIES)
            .bind::<Nullable<Text>, _>(topic.map(str::to_owned))
            .load::<ArticleSummary>(&mut *conn)?;
        Ok(summaries)
    }

    fn comments(&self, article_id: i32) -> Result<Vec<Comment>> {
        let mut conn = self.connection()?;
        let comments = comments::table
            .filter(comments::article_id.eq(article_id))
            .order((comments::created_at.desc(), comments::comment_id.desc()))
            .select(Comment::as_select())
            .load(&mut *conn)?;
        Ok(comments)
    }

    fn insert_comment(&self, comment: &NewComment) -> Result<Comment> {
        let mut conn = self.connection()?;
        let comment = insert_into(comments::table)
            .values(comment)
            .returning(Comment::as_returning())
            .get_result(&mut *conn)?;
        Ok(comment)
    }

    fn delete_comment(&self, comment_id: i32) -> Result<bool> {
        let mut conn = self.connection()?;
        let deleted = delete(comments::table.find(comment_id)).execute(&mut *conn)?;
        Ok(deleted > 0)
    }

    fn apply_vote_delta(&self, article_id: i32, delta: i32) -> Result<Option<Article>> {
        let (low, high) = votes_accepting(delta);
        let mut conn = self.connection()?;
        let article = update(
            articles::table
                .find(article_id)
                .filter(articles::votes.between(low, high)),
        )
        .set(articles::votes.eq(articles::votes + delta))
        .returning(Article::as_returning())
        .get_result(&mut *conn)
        .optional()?;
        Ok(article)
    }
}

/// The range of current vote counts that `delta` can be added to without
/// leaving `i32`.
fn votes_accepting(delta: i32) -> (i32, i32) {
    if delta >= 0 {
        (i32::MIN, i32::MAX - delta)
    } else {
        (i32::MIN - delta, i32::MAX)
    }
}
