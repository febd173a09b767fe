use std::env;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use dotenvy::dotenv;

use crate::error::CustomError;

const DEFAULT_LISTEN_ADDR: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(127, 0, 0, 1), 8080));
const DEFAULT_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub listen_addr: SocketAddr,
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, CustomError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, `from_env` passes the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CustomError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = required(&lookup, "JWT_SECRET")?;
        if jwt_secret.trim().is_empty() {
            return Err(CustomError::ConfigError(
                "JWT_SECRET".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let token_ttl_hours = optional(&lookup, "JWT_TTL_HOURS", DEFAULT_TTL_HOURS)?;
        if token_ttl_hours <= 0 {
            return Err(CustomError::ConfigError(
                "JWT_TTL_HOURS".to_string(),
                "must be positive".to_string(),
            ));
        }

        Ok(Config {
            database_url: required(&lookup, "DATABASE_URL")?,
            jwt_secret,
            listen_addr: optional(&lookup, "LISTEN_ADDR", DEFAULT_LISTEN_ADDR)?,
            token_ttl_hours,
            bcrypt_cost: optional(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?,
        })
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String, CustomError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).ok_or_else(|| CustomError::EnvError(key.to_string(), env::VarError::NotPresent))
}

fn optional<F, T>(lookup: &F, key: &str, default: T) -> Result<T, CustomError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| CustomError::ConfigError(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}
