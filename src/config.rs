use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::TogglError;

pub const DEFAULT_HOST: &str = "https://api.track.toggl.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_IDLE_CONNECTIONS: usize = 10;

const TOKEN_FILE: &str = ".toggl_token";

/// Settings supplied by the embedding application.
///
/// `TogglClient::new` reads this by reference and resolves its own copy, so
/// the caller's value is never modified. When `http_client` is set it is used
/// as given, and `timeout` and `max_idle_connections` are ignored.
#[derive(Clone, Default)]
pub struct Config {
    pub host: String,
    pub api_token: String,
    pub http_client: Option<Client>,
    pub timeout: Option<Duration>,
    pub max_idle_connections: Option<usize>,
    pub debug: bool,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("api_token", &"<redacted>")
            .field("http_client", &self.http_client.is_some())
            .field("timeout", &self.timeout)
            .field("max_idle_connections", &self.max_idle_connections)
            .field("debug", &self.debug)
            .finish()
    }
}

impl Config {
    pub fn new(host: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            api_token: api_token.into(),
            ..Self::default()
        }
    }

    /// Loads settings from `TOGGL_*` environment variables, falling back to
    /// `~/.toggl_token` for the API token.
    pub fn from_env() -> Result<Self, TogglError> {
        Self::from_env_with_token(None)
    }

    /// Like `from_env`, but a non-empty `token` takes the place of
    /// `TOGGL_API_TOKEN` and the token file. The rest of the environment is
    /// still read and validated.
    pub fn from_env_with_token(token: Option<String>) -> Result<Self, TogglError> {
        Self::from_lookup(|key| env::var(key).ok(), token, token_path())
    }

    pub(crate) fn from_lookup<F>(
        lookup: F,
        token: Option<String>,
        token_file: Option<PathBuf>,
    ) -> Result<Self, TogglError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_token = token
            .filter(|value| !value.trim().is_empty())
            .or_else(|| read("TOGGL_API_TOKEN"))
            .or_else(|| read_token_file(token_file))
            .ok_or_else(|| {
                TogglError::Config(
                    "TOGGL_API_TOKEN is not set and no token file was found".to_string(),
                )
            })?;

        let host = read("TOGGL_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let timeout = read("TOGGL_TIMEOUT_SECS")
            .map(|value| {
                value
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|_| TogglError::Config(format!("Invalid TOGGL_TIMEOUT_SECS: {value}")))
            })
            .transpose()?;

        let debug = read("TOGGL_DEBUG")
            .map(|value| parse_flag(&value))
            .transpose()?
            .unwrap_or(false);

        Ok(Self {
            host: host.trim().to_string(),
            api_token: api_token.trim().to_string(),
            timeout,
            debug,
            ..Self::default()
        })
    }

    pub(crate) fn validate(&self) -> Result<(), TogglError> {
        if self.api_token.trim().is_empty() {
            return Err(TogglError::Config("Config.api_token is not set".to_string()));
        }
        if self.host.trim().is_empty() {
            return Err(TogglError::Config("Config.host is not set".to_string()));
        }
        Ok(())
    }

    pub(crate) fn effective_timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }

    pub(crate) fn build_http_client(&self) -> Result<Client, TogglError> {
        if let Some(client) = &self.http_client {
            return Ok(client.clone());
        }
        Client::builder()
            .user_agent(concat!("toggl-client/", env!("CARGO_PKG_VERSION")))
            .timeout(self.effective_timeout())
            .pool_max_idle_per_host(
                self.max_idle_connections
                    .unwrap_or(DEFAULT_MAX_IDLE_CONNECTIONS),
            )
            .build()
            .map_err(|err| TogglError::Config(format!("Failed to build HTTP client: {err}")))
    }
}

fn parse_flag(value: &str) -> Result<bool, TogglError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(TogglError::Config(format!("Invalid TOGGL_DEBUG: {other}"))),
    }
}

fn token_path() -> Option<PathBuf> {
    let mut path = dirs::home_dir()?;
    path.push(TOKEN_FILE);
    Some(path)
}

fn read_token_file(path: Option<PathBuf>) -> Option<String> {
    let contents = fs::read_to_string(path?).ok()?;
    contents
        .lines()
        .next()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
}
