use chrono::{NaiveDateTime, SecondsFormat};
use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, Responder, Response};
use serde::Serializer;

/// Plain-text body with an arbitrary status, the shape every validation
/// failure is reported in.
pub fn try_respond(req: &Request, text: String, status: Status) -> response::Result<'static> {
    let resp = text.respond_to(req)?;
    Response::build_from(resp).status(status).ok()
}

pub fn serialize_date<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let s = date.and_utc().to_rfc3339_opts(SecondsFormat::Millis, true);
    serializer.serialize_str(&s)
}
