//! Runtime configuration, built once and handed to services at construction.

use std::path::PathBuf;

use chrono::Duration;
use thiserror::Error;

use crate::auth::JwtConfig;
use crate::models::SchedulerConfig;

/// Shortest accepted token signing secret, in bytes
pub const MIN_SECRET_LEN: usize = 32;

/// Longest accepted token lifetime
pub const MAX_TTL_DAYS: i64 = 365;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: PathBuf,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
    pub scheduler: SchedulerConfig,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT secret must be at least {MIN_SECRET_LEN} bytes")]
    SecretTooShort,

    #[error("{name} must be a positive number of seconds")]
    NonPositiveTtl { name: &'static str },

    #[error("{name} must not exceed {MAX_TTL_DAYS} days")]
    TtlTooLong { name: &'static str },

    #[error("access token lifetime must be shorter than the refresh token lifetime")]
    TtlOrder,
}

/// Converts a lifetime given in seconds, rejecting values chrono cannot hold
pub fn ttl_from_secs(name: &'static str, secs: i64) -> Result<Duration, ConfigError> {
    Duration::try_seconds(secs).ok_or(ConfigError::TtlTooLong { name })
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::SecretTooShort);
        }
        if self.jwt.access_ttl.num_seconds() <= 0 {
            return Err(ConfigError::NonPositiveTtl {
                name: "access token lifetime",
            });
        }
        if self.jwt.refresh_ttl.num_seconds() <= 0 {
            return Err(ConfigError::NonPositiveTtl {
                name: "refresh token lifetime",
            });
        }
        let max = Duration::days(MAX_TTL_DAYS);
        if self.jwt.access_ttl > max {
            return Err(ConfigError::TtlTooLong {
                name: "access token lifetime",
            });
        }
        if self.jwt.refresh_ttl > max {
            return Err(ConfigError::TtlTooLong {
                name: "refresh token lifetime",
            });
        }
        if self.jwt.access_ttl >= self.jwt.refresh_ttl {
            return Err(ConfigError::TtlOrder);
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
