use std::env;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::{AppError, AppResult};
use crate::refresh::LoadingPolicy;

pub const DEFAULT_METADATA_ENDPOINT: &str =
    "https://open-apis.hax.cloud/api/services/website/metadata";

#[derive(Clone, Debug)]
pub struct Config {
    pub metadata_endpoint: Url,
    /// Prefix of a public CORS relay, e.g. `https://corsproxy.io/?url=`.
    pub cors_relay: Option<String>,
    pub default_web_link: String,
    pub loading_policy: LoadingPolicy,
    pub fetch_timeout: Duration,
    pub locales_dir: Option<PathBuf>,
    pub locale: String,
    pub server_host: String,
    pub server_port: u16,
    pub is_dev: bool,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. `from_env` uses the
    /// process environment; tests pass a closure over a map.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let endpoint = var("METADATA_ENDPOINT")
            .unwrap_or_else(|| DEFAULT_METADATA_ENDPOINT.to_string());
        let metadata_endpoint = Url::parse(&endpoint)
            .map_err(|e| AppError::Config(format!("METADATA_ENDPOINT {endpoint:?}: {e}")))?;

        let delay_secs: u64 = parse_or(var("LOADING_DELAY_SECS"), "LOADING_DELAY_SECS", 5)?;
        let loading_policy = match var("LOADING_POLICY").as_deref() {
            None | Some("on-completion") => LoadingPolicy::OnCompletion,
            Some("fixed-delay") => LoadingPolicy::FixedDelay(Duration::from_secs(delay_secs)),
            Some(other) => {
                return Err(AppError::Config(format!(
                    "LOADING_POLICY must be on-completion or fixed-delay, got {other:?}"
                )))
            }
        };

        let timeout_secs: u64 = parse_or(var("FETCH_TIMEOUT_SECS"), "FETCH_TIMEOUT_SECS", 10)?;

        Ok(Config {
            metadata_endpoint,
            cors_relay: var("CORS_RELAY"),
            default_web_link: var("DEFAULT_WEB_LINK").unwrap_or_default(),
            loading_policy,
            fetch_timeout: Duration::from_secs(timeout_secs),
            locales_dir: var("LOCALES_DIR").map(PathBuf::from),
            locale: var("LOCALE").unwrap_or_else(|| "en".to_string()),
            server_host: var("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            server_port: parse_or(var("SERVER_PORT"), "SERVER_PORT", 8080)?,
            is_dev: var("APP_ENV").as_deref() != Some("production"),
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, key: &str, default: T) -> AppResult<T> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{key} is not a valid number: {raw:?}"))),
    }
}
