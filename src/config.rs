//! Gateway configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Content-store credentials are required
//! and the gateway refuses to start without them.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::ConfigError;

/// Origins accepted when `CORS_ALLOWED_ORIGINS` is not set.
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 3] = [
    "https://mgphoto-new.vercel.app",
    "http://localhost:3000",
    "https://photos.manchestergents.com",
];

/// Content-store API version used when `SANITY_API_VERSION` is not set.
pub const DEFAULT_API_VERSION: &str = "2023-08-03";

/// Default request body limit for `/upload` (25 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Cross-origin policy applied to the upload route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsPolicy {
    /// Any origin may call the gateway.
    Permissive,
    /// Only the listed origins (exact match, no trailing slash) may call
    /// the gateway. Requests without an `Origin` header are accepted.
    Allowlist(Vec<String>),
}

impl CorsPolicy {
    /// Parses a comma-separated origin list. A `*` entry selects
    /// [`CorsPolicy::Permissive`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.split(',').any(|o| o.trim() == "*") {
            return Self::Permissive;
        }
        let origins = raw
            .split(',')
            .map(|o| o.trim().trim_end_matches('/'))
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();
        Self::Allowlist(origins)
    }

    /// Returns `true` if a request carrying `origin` may proceed.
    #[must_use]
    pub fn allows(&self, origin: Option<&str>) -> bool {
        match (self, origin) {
            (Self::Permissive, _) | (Self::Allowlist(_), None) => true,
            (Self::Allowlist(list), Some(origin)) => list.iter().any(|o| o == origin),
        }
    }
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self::Allowlist(DEFAULT_ALLOWED_ORIGINS.iter().map(|o| (*o).to_string()).collect())
    }
}

/// Connection parameters for the Sanity content store.
#[derive(Clone)]
pub struct StoreConfig {
    /// Sanity project identifier.
    pub project_id: String,
    /// Dataset documents and assets are written to.
    pub dataset: String,
    /// Bearer token with write access to the dataset.
    pub token: String,
    /// API version without the leading `v` (e.g. `2023-08-03`).
    pub api_version: String,
    /// Base URL of the API, e.g. `https://abc123.api.sanity.io`.
    pub base_url: String,
    /// Upper bound for every remote call.
    pub timeout: Duration,
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("project_id", &self.project_id)
            .field("dataset", &self.dataset)
            .field("token", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`GatewayConfig::from_env`] and handed to the
/// components that need it; nothing reads the environment afterwards.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Content-store connection parameters.
    pub store: StoreConfig,

    /// Cross-origin policy for `/upload`.
    pub cors: CorsPolicy,

    /// Maximum accepted request body size in bytes.
    pub max_upload_bytes: usize,

    /// Delete the uploaded asset when the photo document cannot be created.
    pub cleanup_orphaned_assets: bool,
}

impl GatewayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if `SANITY_PROJECT_ID`,
    /// `SANITY_DATASET` or `SANITY_API_TOKEN` is absent or blank, and
    /// [`ConfigError::Invalid`] if a set variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`GatewayConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_addr = parse_var(&lookup, "LISTEN_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?;

        let project_id = required(&lookup, "SANITY_PROJECT_ID")?;
        let dataset = required(&lookup, "SANITY_DATASET")?;
        let token = required(&lookup, "SANITY_API_TOKEN")?;

        let api_version = lookup("SANITY_API_VERSION")
            .map(|v| v.trim().trim_start_matches('v').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        let base_url = match lookup("SANITY_API_URL").filter(|v| !v.trim().is_empty()) {
            Some(url) => url.trim().trim_end_matches('/').to_string(),
            None => {
                let host = lookup("SANITY_API_HOST").unwrap_or_else(|| "api.sanity.io".to_string());
                format!("https://{project_id}.{}", host.trim())
            }
        };

        let timeout_secs: u64 = parse_var(&lookup, "STORE_TIMEOUT_SECS", 30)?;

        let cors = lookup("CORS_ALLOWED_ORIGINS")
            .map(|raw| CorsPolicy::parse(&raw))
            .unwrap_or_default();

        let max_upload_bytes = parse_var(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?;
        let cleanup_orphaned_assets = parse_bool(&lookup, "CLEANUP_ORPHANED_ASSETS", false)?;

        Ok(Self {
            listen_addr,
            store: StoreConfig {
                project_id,
                dataset,
                token,
                api_version,
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            },
            cors,
            max_upload_bytes,
            cleanup_orphaned_assets,
        })
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(key))
}

/// Parses an optional variable as `T`, returning `default` when unset.
/// A set but unparsable value is an error rather than a silent default.
fn parse_var<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

/// Parses a boolean variable. Accepts `true`/`1`/`yes` and `false`/`0`/`no`
/// (case-insensitive).
fn parse_bool<F>(lookup: &F, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(ConfigError::Invalid { key, value: raw }),
        },
    }
}
