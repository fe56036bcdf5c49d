use log::error;
use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;

use crate::db;
use crate::utils::try_respond;

/// Request bodies that can be checked for shape before any store access.
pub trait Validate
where
    Self: Sized,
{
    type Error;
    fn validate(self) -> Result<Self, Self::Error>;
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Store(db::Error),
}

impl ApiError {
    pub fn bad_request<S: Into<String>>(message: S) -> ApiError {
        ApiError::BadRequest(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> ApiError {
        ApiError::NotFound(message.into())
    }
}

impl From<db::Error> for ApiError {
    fn from(err: db::Error) -> ApiError {
        ApiError::Store(err)
    }
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        match self {
            ApiError::BadRequest(message) => try_respond(req, message, Status::BadRequest),
            ApiError::NotFound(message) => try_respond(req, message, Status::NotFound),
            ApiError::Store(error) => {
                error!("{} {} failed: {}", req.method(), req.uri(), error);
                for cause in error.iter().skip(1) {
                    error!("caused by: {}", cause);
                }
                Err(Status::InternalServerError)
            }
        }
    }
}

impl<T> Validate for Json<T>
where
    T: Validate,
{
    type Error = <T as Validate>::Error;
    fn validate(self) -> Result<Self, Self::Error> {
        let inner = self.into_inner();
        let validated = inner.validate()?;
        Ok(Json(validated))
    }
}
