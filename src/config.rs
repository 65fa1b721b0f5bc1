use std::path::PathBuf;

use anyhow::{bail, Context};
use serde::Deserialize;

/// Upper bound for any token lifetime: one year.
const MAX_TTL_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub filepath_root: PathBuf,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "chirpy".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "chirpy-users".into()),
            ttl_minutes: ttl_from_env("JWT_TTL_MINUTES", 60)?,
            refresh_ttl_minutes: ttl_from_env("JWT_REFRESH_TTL_MINUTES", 60 * 24)?,
        };
        Ok(Self {
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "database.json".into())
                .into(),
            filepath_root: std::env::var("FILEPATH_ROOT")
                .unwrap_or_else(|_| ".".into())
                .into(),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_parse("APP_PORT").unwrap_or(8080),
            jwt,
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}

fn ttl_from_env(key: &str, default: i64) -> anyhow::Result<i64> {
    match std::env::var(key) {
        Ok(raw) => {
            let minutes = raw
                .parse::<i64>()
                .with_context(|| format!("{key} must be a whole number of minutes"))?;
            check_ttl(key, minutes)
        }
        Err(_) => Ok(default),
    }
}

fn check_ttl(key: &str, minutes: i64) -> anyhow::Result<i64> {
    if !(1..=MAX_TTL_MINUTES).contains(&minutes) {
        bail!("{key} must be between 1 and {MAX_TTL_MINUTES} minutes, got {minutes}");
    }
    Ok(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_bounds() {
        assert_eq!(check_ttl("JWT_TTL_MINUTES", 1).unwrap(), 1);
        assert_eq!(check_ttl("JWT_TTL_MINUTES", MAX_TTL_MINUTES).unwrap(), MAX_TTL_MINUTES);

        for bad in [0, -5, MAX_TTL_MINUTES + 1, i64::MAX] {
            let err = check_ttl("JWT_TTL_MINUTES", bad).unwrap_err();
            assert!(err.to_string().contains("JWT_TTL_MINUTES"));
        }
    }

    #[test]
    fn unset_ttl_uses_default() {
        let key = "CHIRPY_TEST_UNSET_TTL";
        std::env::remove_var(key);
        assert_eq!(ttl_from_env(key, 42).unwrap(), 42);
    }
}
