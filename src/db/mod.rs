use diesel::pg::PgConnection;
use diesel::r2d2::ConnectionManager;
use diesel::result::Error as DieselError;
use log::warn;
use rocket::http::Status;
use rocket::outcome::Outcome;
use rocket::request::{self, FromRequest};
use rocket::Request;
use std::ops::Deref;

use crate::article::{Article, ArticleSummary};
use crate::comment::{Comment, NewComment};
use crate::config::Settings;
use crate::topic::Topic;
use crate::users::models::User;

#[cfg(test)]
pub mod memory;
mod pg;
pub mod schema;

pub use self::pg::PgStore;

// An alias to the type for a pool of Diesel Postgres connections.
pub type Pool = r2d2::Pool<ConnectionManager<PgConnection>>;

error_chain! {
    foreign_links {
        R2D2(r2d2::Error);
        Diesel(DieselError);
    }
}

pub fn init_pool(settings: &Settings) -> Result<Pool> {
    let manager = ConnectionManager::<PgConnection>::new(settings.database_url.as_str());
    let pool = Pool::builder()
        .max_size(settings.pool_size)
        .build(manager)?;
    Ok(pool)
}

/// Every query the API issues. Existence checks are kept separate from the
/// fetches so handlers can validate before touching anything.
pub trait Store: Send + Sync {
    fn topics(&self) -> Result<Vec<Topic>>;
    fn users(&self) -> Result<Vec<User>>;

    fn topic_exists(&self, slug: &str) -> Result<bool>;
    fn user_exists(&self, username: &str) -> Result<bool>;
    fn article_exists(&self, article_id: i32) -> Result<bool>;
    fn comment_exists(&self, comment_id: i32) -> Result<bool>;

    fn article(&self, article_id: i32) -> Result<Article>;

    /// Articles newest first, each with its number of comments. `None`
    /// lists every topic.
    fn articles(&self, topic: Option<&str>) -> Result<Vec<ArticleSummary>>;

    /// Comments on one article, newest first.
    fn comments(&self, article_id: i32) -> Result<Vec<Comment>>;
    fn insert_comment(&self, comment: &NewComment) -> Result<Comment>;
    fn delete_comment(&self, comment_id: i32) -> Result<bool>;

    /// Adds `delta` to the article's votes in one statement and returns the
    /// updated row. The result may go negative. `None` when the new total
    /// would not fit in an `i32`; the row is then left as it was.
    fn apply_vote_delta(&self, article_id: i32, delta: i32) -> Result<Option<Article>>;
}

/// What Rocket manages: one store for the lifetime of the server.
pub type Storage = Box<dyn Store>;

/// Request guard handing out the managed store. Fails with
/// `InternalServerError` when no store is being managed.
pub struct Db<'r>(&'r dyn Store);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Db<'r> {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, ()> {
        match request.rocket().state::<Storage>() {
            Some(store) => Outcome::Success(Db(store.as_ref())),
            None => {
                warn!("no store is managed, refusing {}", request.uri());
                Outcome::Error((Status::InternalServerError, ()))
            }
        }
    }
}

// For the convenience of calling store methods straight on the guard.
impl<'r> Deref for Db<'r> {
    type Target = dyn Store + 'r;

    fn deref(&self) -> &Self::Target {
        self.0
    }
}
