use std::path::PathBuf;
use std::str::FromStr;

use vidsqueeze_core::access::{AccessPolicy, DEFAULT_DASHBOARD_PATH, DEFAULT_SIGN_IN_PATH};

use crate::auth::session::SessionConfig;

/// Default request body cap: 263 MiB, the largest upload the form accepts.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 263 * 1024 * 1024;

/// Must stay above the 120 s media upload timeout.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 180;

const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Process-wide settings read once at startup.
///
/// All fields except the session key have defaults suitable for local
/// development. Media and text-generation credentials are loaded by their
/// own config types in `vidsqueeze-cloud`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Frontend origins allowed to call the API with credentials.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// Request body limit in bytes (default: 263 MiB).
    pub max_upload_bytes: usize,
    /// Directory of a built frontend served for non-API paths.
    pub static_dir: Option<PathBuf>,
    /// Route access policy applied by the gate.
    pub access: AccessPolicy,
    /// Session token verification settings.
    pub session: SessionConfig,
}

impl ServerConfig {
    /// Read every setting from the environment.
    ///
    /// | Variable               | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS` | `180`                      |
    /// | `MAX_UPLOAD_BYTES`     | `275775488`                |
    /// | `STATIC_DIR`           | unset                      |
    /// | `SIGN_IN_PATH`         | `/sign-in`                 |
    /// | `DASHBOARD_PATH`       | `/home`                    |
    ///
    /// Session variables are documented on [`SessionConfig::from_env`].
    pub fn from_env() -> Self {
        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        let static_dir = std::env::var("STATIC_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let access = AccessPolicy::with_targets(
            &env_or("DASHBOARD_PATH", DEFAULT_DASHBOARD_PATH),
            &env_or("SIGN_IN_PATH", DEFAULT_SIGN_IN_PATH),
        );

        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: env_parse("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
            static_dir,
            access,
            session: SessionConfig::from_env(),
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Parse an optional variable. A present but malformed value aborts startup.
fn env_parse<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{name}='{raw}' is invalid: {e}")),
        Err(_) => default,
    }
}
