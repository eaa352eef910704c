use std::env;
use std::path::PathBuf;
use std::time::Duration;

use chrono::FixedOffset;
use thiserror::Error;

pub const DEFAULT_API_BASE_URL: &str = "https://merchportalswd-796324132621.asia-south1.run.app/api";
pub const DEFAULT_STORAGE_BASE_URL: &str = "https://firebasestorage.googleapis.com/v0";
pub const DEFAULT_STORAGE_BUCKET: &str = "swd-store.firebasestorage.app";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub api_base_url: String,
    pub storage_base_url: String,
    pub storage_bucket: String,
    pub session_file: PathBuf,
    /// Offset order dates are shown in (IST by default).
    pub display_offset: FixedOffset,
    pub notice_ttl: Duration,
}

impl AppConfig {
    /// Read from the process environment. `main` loads `.env` first.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let port = parse(&lookup, "PORT", 8080u16)?;
        let offset_minutes = parse(&lookup, "DISPLAY_UTC_OFFSET_MINUTES", 330i32)?;
        let display_offset = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or(ConfigError::Invalid {
                name: "DISPLAY_UTC_OFFSET_MINUTES",
                reason: format!("{} minutes is out of range", offset_minutes),
            })?;
        let notice_ttl = Duration::from_secs(parse(&lookup, "NOTICE_TTL_SECS", 5u64)?);

        Ok(Self {
            host: text("HOST", "127.0.0.1"),
            port,
            api_base_url: text("API_BASE_URL", DEFAULT_API_BASE_URL),
            storage_base_url: text("STORAGE_BASE_URL", DEFAULT_STORAGE_BASE_URL),
            storage_bucket: text("STORAGE_BUCKET", DEFAULT_STORAGE_BUCKET),
            session_file: PathBuf::from(text("SESSION_FILE", ".merch_portal_session.json")),
            display_offset,
            notice_ttl,
        })
    }
}

fn parse<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
    }
}
