// Runtime configuration read from the environment.

use crate::error::{ApiError, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Variable holding the API base URL, e.g. `http://localhost:8080/api/v1`.
pub const BASE_URL_VAR: &str = "GOPRESS_API_BASE_URL";
pub const TIMEOUT_VAR: &str = "GOPRESS_TIMEOUT_SECS";
pub const STATE_DIR_VAR: &str = "GOPRESS_STATE_DIR";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_NOTICE_DURATION: Duration = Duration::from_secs(5);

/// Settings for one run of the client.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    /// Overall per-request timeout enforced by the HTTP layer.
    pub timeout: Duration,
    /// Directory backing the durable key/value store.
    pub state_dir: PathBuf,
    /// How long error notifications stay visible.
    pub notice_duration: Duration,
}

impl Config {
    /// Build a config for `base_url` with default timeout, notice
    /// duration and state directory.
    pub fn new(base_url: impl Into<String>) -> Self {
        Config {
            base_url: normalize_base_url(&base_url.into()),
            timeout: DEFAULT_TIMEOUT,
            state_dir: default_state_dir(),
            notice_duration: DEFAULT_NOTICE_DURATION,
        }
    }

    /// Read the configuration from the process environment.
    ///
    /// The base URL is taken from `GOPRESS_API_BASE_URL` at run time and
    /// falls back to the value the variable had at build time. There is
    /// no built-in default.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup(BASE_URL_VAR)
            .or_else(|| option_env!("GOPRESS_API_BASE_URL").map(str::to_owned))
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ApiError::Config(format!("{BASE_URL_VAR} is not set")))?;
        // let base_url = "http://localhost:8080/api/v1".to_string();

        let mut config = Config::new(base_url);

        if let Some(raw) = lookup(TIMEOUT_VAR) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    ApiError::Config(format!(
                        "{TIMEOUT_VAR} must be a positive number of seconds, got {raw:?}"
                    ))
                })?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(dir) = lookup(STATE_DIR_VAR).filter(|d| !d.is_empty()) {
            config.state_dir = PathBuf::from(dir);
        }
        Ok(config)
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// `~/.gopress`, or `./.gopress` when the home directory is unknown.
fn default_state_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".gopress")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn reads_base_url_and_trims_trailing_slash() {
        let vars = lookup(&[(BASE_URL_VAR, "http://localhost:8080/api/v1/")]);
        let config = Config::from_lookup(vars).unwrap();
        assert_eq!(config.base_url, "http://localhost:8080/api/v1");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.notice_duration, Duration::from_secs(5));
        assert!(config.state_dir.ends_with(".gopress"));
    }

    #[test]
    fn overrides_timeout_and_state_dir() {
        let config = Config::from_lookup(lookup(&[
            (BASE_URL_VAR, "http://api"),
            (TIMEOUT_VAR, "3"),
            (STATE_DIR_VAR, "/tmp/gopress-state"),
        ]))
        .unwrap();
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.state_dir, PathBuf::from("/tmp/gopress-state"));
    }

    #[test]
    fn rejects_garbage_timeout() {
        for raw in ["soon", "-1", ""] {
            let vars = lookup(&[(BASE_URL_VAR, "http://api"), (TIMEOUT_VAR, raw)]);
            let err = Config::from_lookup(vars).unwrap_err();
            assert!(matches!(err, ApiError::Config(_)), "{raw:?}");
        }
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = Config::from_lookup(lookup(&[(BASE_URL_VAR, "http://api"), (TIMEOUT_VAR, "0")]))
            .unwrap_err();
        assert!(err.to_string().contains(TIMEOUT_VAR));
    }

    #[test]
    fn missing_base_url_is_an_error_unless_baked_in() {
        let result = Config::from_lookup(lookup(&[]));
        match option_env!("GOPRESS_API_BASE_URL") {
            Some(url) if !url.trim().is_empty() => assert!(result.is_ok()),
            _ => assert!(matches!(result, Err(ApiError::Config(_)))),
        }
    }
}
