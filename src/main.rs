#[macro_use]
extern crate rocket;

#[macro_use]
extern crate error_chain;

#[macro_use]
extern crate diesel;

#[macro_use]
extern crate serde_derive;

mod api;
mod article;
mod comment;
mod config;
mod db;
mod topic;
mod types;
mod users;
mod utils;
mod validators;


use log::info;
use rocket::fairing::AdHoc;
use rocket::request::Request;
use rocket::serde::json::Value;
use rocket::{Build, Rocket};
use serde_json::json;

use api::Endpoints;
use config::{ResultExt, Settings};
use db::{PgStore, Storage};

#[catch(400)]
fn bad_request(_req: &Request) -> Value {
    json!({ "error": "bad request" })
}

#[catch(404)]
fn not_found(_req: &Request) -> Value {
    json!({ "error": "endpoint not found" })
}

#[catch(422)]
fn handle_422(_req: &Request) -> Value {
    json!({ "error": "unprocessable entity" })
}

#[catch(500)]
fn internal_error(_req: &Request) -> Value {
    json!({ "error": "internal server error" })
}

pub fn build(store: Storage, endpoints: Endpoints) -> Rocket<Build> {
    rocket::build()
        .manage(store)
        .manage(endpoints)
        .mount(
            "/api",
            routes![
                api::describe,
                topic::list,
                article::list,
                article::get,
                article::patch_votes,
                comment::list,
                comment::add,
                comment::delete,
                users::list,
            ],
        )
        .register(
            "/",
            catchers![bad_request, not_found, handle_422, internal_error],
        )
}

fn setup() -> config::Result<Rocket<Build>> {
    let settings = Settings::from_env()?;
    let pool = db::init_pool(&settings)?;
    let endpoints = Endpoints::load(&settings.endpoints_path)
        .chain_err(|| format!("failed to load {}", settings.endpoints_path))?;

    let summary = format!(
        "pool of {} connections, {} documented routes from {}",
        settings.pool_size,
        endpoints.len(),
        settings.endpoints_path
    );
    let rocket = build(Box::new(PgStore::new(pool)), endpoints).attach(AdHoc::on_liftoff(
        "Startup summary",
        move |_| {
            let summary = summary.clone();
            Box::pin(async move {
                info!("{}", summary);
            })
        },
    ));
    Ok(rocket)
}

#[rocket::main]
async fn main() {
    let rocket = match setup() {
        Ok(rocket) => rocket,
        Err(e) => {
            eprintln!("error: {}", e);
            for cause in e.iter().skip(1) {
                eprintln!("caused by: {}", cause);
            }
            ::std::process::exit(1);
        }
    };

    if let Err(e) = rocket.launch().await {
        eprintln!("server failed to launch: {}", launch_failure(&e));
        ::std::process::exit(1);
    }
}

/// Logs Rocket's account of a failed launch and returns the abort reason.
/// A `rocket::Error` that is dropped without being looked at panics.
fn launch_failure(e: &rocket::Error) -> &'static str {
    e.pretty_print()
}
