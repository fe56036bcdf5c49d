use dotenv::dotenv;
use std::env;

use crate::db;

const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_ENDPOINTS_PATH: &str = "endpoints.json";

error_chain! {
    links {
        Db(db::Error, db::ErrorKind);
    }

    foreign_links {
        Io(::std::io::Error);
        Json(::serde_json::Error);
        Var(::std::env::VarError);
        ParseInt(::std::num::ParseIntError);
    }
}

/// Process settings, read from the environment (and `.env` when present).
/// Address, port and log level stay with Rocket's own configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub database_url: String,
    pub pool_size: u32,
    pub endpoints_path: String,
}

impl Settings {
    pub fn from_env() -> Result<Settings> {
        dotenv().ok();
        Settings::from_vars(|key| env::var(key))
    }

    fn from_vars<F>(var: F) -> Result<Settings>
    where
        F: Fn(&str) -> ::std::result::Result<String, env::VarError>,
    {
        let database_url = var("DATABASE_URL").chain_err(|| "DATABASE_URL must be set")?;

        let pool_size = match var("DATABASE_POOL_SIZE") {
            Ok(size) => size
                .trim()
                .parse::<u32>()
                .chain_err(|| format!("DATABASE_POOL_SIZE is not a number: {}", size))?,
            Err(env::VarError::NotPresent) => DEFAULT_POOL_SIZE,
            Err(e) => return Err(e.into()),
        };
        if pool_size == 0 {
            bail!("DATABASE_POOL_SIZE must be at least 1");
        }

        let endpoints_path = match var("ENDPOINTS_PATH") {
            Ok(path) => path,
            Err(env::VarError::NotPresent) => DEFAULT_ENDPOINTS_PATH.to_owned(),
            Err(e) => return Err(e.into()),
        };

        Ok(Settings {
            database_url,
            pool_size,
            endpoints_path,
        })
    }
}
