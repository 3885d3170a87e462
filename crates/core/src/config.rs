use std::{path::PathBuf, time::Duration};

use crate::{
    agent::AgentConfig,
    error::{Result, VidlensError},
    poll::{DEFAULT_MAX_WAIT, DEFAULT_POLL_INTERVAL, PollPolicy},
};

pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";
pub const FALLBACK_API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-lite";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Runtime settings resolved once at start-up.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub poll_interval: Duration,
    pub max_wait: Duration,
    pub web_search: bool,
}

impl Settings {
    /// Load `.env` files, then resolve from the process environment.
    pub fn load() -> Result<Self> {
        load_env_files();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get(API_KEY_VAR)
            .or_else(|| get(FALLBACK_API_KEY_VAR))
            .ok_or_else(|| VidlensError::MissingApiKey {
                env_var: API_KEY_VAR.to_string(),
            })?;

        let poll_interval = match get("VIDLENS_POLL_INTERVAL_SECS") {
            Some(v) => parse_interval("VIDLENS_POLL_INTERVAL_SECS", &v)?,
            None => DEFAULT_POLL_INTERVAL,
        };
        let max_wait = match get("VIDLENS_MAX_WAIT_SECS") {
            Some(v) => parse_secs("VIDLENS_MAX_WAIT_SECS", &v)?,
            None => DEFAULT_MAX_WAIT,
        };
        let web_search = match get("VIDLENS_WEB_SEARCH") {
            Some(v) => parse_bool("VIDLENS_WEB_SEARCH", &v)?,
            None => true,
        };

        Ok(Self {
            api_key,
            base_url: get("VIDLENS_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: get("VIDLENS_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            poll_interval,
            max_wait,
            web_search,
        })
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy::from_wait(self.poll_interval, self.max_wait)
    }

    pub fn agent_config(&self) -> AgentConfig {
        AgentConfig::new(&self.model).with_web_search(self.web_search)
    }
}

/// User-level env file, e.g. `~/.config/vidlens/.env`.
pub fn user_env_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("vidlens").join(".env"))
}

fn load_env_files() {
    // Process variables win over both files, and ./.env wins over the user file.
    let _ = dotenvy::dotenv();
    if let Some(path) = user_env_path() {
        if path.exists() {
            let _ = dotenvy::from_path(&path);
        }
    }
}

fn parse_secs(key: &str, value: &str) -> Result<Duration> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| invalid(key, value))
}

/// Like [`parse_secs`] but zero is rejected; the wait budget needs a real delay.
fn parse_interval(key: &str, value: &str) -> Result<Duration> {
    match parse_secs(key, value)? {
        interval if interval.is_zero() => Err(invalid(key, value)),
        interval => Ok(interval),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}

fn invalid(key: &str, value: &str) -> VidlensError {
    VidlensError::InvalidSetting {
        key: key.to_string(),
        value: value.to_string(),
    }
}
