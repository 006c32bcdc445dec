use std::{env, fmt::Display, net::SocketAddr, str::FromStr};

use tracing::info;

use crate::utils::error::{AppError, AppResult};

const DEFAULT_DB_NAME: &str = "polling_app";
const DEFAULT_PORT: &str = "5000";

/// Process configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Without a connection string polls are kept in memory.
    pub mongo_uri: Option<String>,
    pub db_name: String,
    pub port: u16,
    pub cors_origin: Option<String>,
}

impl Config {
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Ok(Self {
            mongo_uri: var("MONGO_URI"),
            db_name: var("DB_NAME").unwrap_or_else(|| DEFAULT_DB_NAME.to_string()),
            port: try_load("PORT", var("PORT"), DEFAULT_PORT)?,
            cors_origin: var("CORS_ORIGIN"),
        })
    }

    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

fn try_load<T: FromStr>(key: &str, value: Option<String>, default: &str) -> AppResult<T>
where
    T::Err: Display,
{
    let value = value.unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value
        .trim()
        .parse()
        .map_err(|e| AppError::InternalError(format!("Invalid {key} value {value:?}: {e}")))
}
