use rocket::serde::json::{Json, Value};
use rocket::State;
use std::fs;
use std::path::Path;

use crate::config;

/// The hand-written description of every route, served as-is from `GET /api`.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoints(Value);

impl Endpoints {
    pub fn load<P: AsRef<Path>>(path: P) -> config::Result<Endpoints> {
        let raw = fs::read_to_string(path.as_ref())?;
        Endpoints::parse(&raw)
    }

    pub fn parse(raw: &str) -> config::Result<Endpoints> {
        let document = serde_json::from_str::<Value>(raw)?;
        if !document.is_object() {
            bail!("endpoints document must be a JSON object");
        }
        Ok(Endpoints(document))
    }

    /// Number of documented routes.
    pub fn len(&self) -> usize {
        self.0.as_object().map_or(0, |routes| routes.len())
    }
}

#[get("/")]
pub fn describe(endpoints: &State<Endpoints>) -> Json<Value> {
    Json(endpoints.0.clone())
}
