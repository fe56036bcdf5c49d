//! Existence checks run before a handler reads or mutates anything. Each one
//! issues a single query and fails the request with the message clients see.

use crate::db::Store;
use crate::types::ApiError;

/// Parses and checks an article id taken from the path.
pub fn article_id(store: &dyn Store, raw: &str) -> Result<i32, ApiError> {
    let id = raw
        .parse::<i32>()
        .map_err(|_| ApiError::bad_request(format!("{} is invalid", raw)))?;

    if store.article_exists(id)? {
        Ok(id)
    } else {
        Err(ApiError::bad_request(format!("article_id: {} not found", id)))
    }
}

pub fn username(store: &dyn Store, name: &str) -> Result<(), ApiError> {
    if store.user_exists(name)? {
        Ok(())
    } else {
        Err(ApiError::not_found(format!(
            "The username \"{}\" does not exist",
            name
        )))
    }
}

pub fn topic(store: &dyn Store, slug: &str) -> Result<(), ApiError> {
    if store.topic_exists(slug)? {
        Ok(())
    } else {
        Err(ApiError::not_found("topic does not exist"))
    }
}

/// Parses and checks a comment id. Malformed and unknown ids are reported
/// the same way.
pub fn comment_id(store: &dyn Store, raw: &str) -> Result<i32, ApiError> {
    let invalid = || ApiError::bad_request(format!("{} is not a valid comment id", raw));
    let id = raw.parse::<i32>().map_err(|_| invalid())?;

    if store.comment_exists(id)? {
        Ok(id)
    } else {
        Err(invalid())
    }
}
