use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use togglapi::DEFAULT_BASE_URL;

pub const TOKEN_ENV: &str = "TOGGL_API_TOKEN";
pub const BASE_URL_ENV: &str = "TOGGL_API_URL";

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pause_between_requests_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Values given on the command line; they win over everything else.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub token: Option<String>,
    pub base_url: Option<String>,
    pub pause_ms: Option<u64>,
}

/// Values read from the environment and the token file.
#[derive(Debug, Default, Clone)]
pub struct Sources {
    pub env_token: Option<String>,
    pub env_base_url: Option<String>,
    pub file_token: Option<String>,
    pub settings: Settings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub pause_between_requests: Duration,
    pub timeout: Option<Duration>,
}

impl Sources {
    pub fn load() -> Self {
        Self {
            env_token: env::var(TOKEN_ENV).ok(),
            env_base_url: env::var(BASE_URL_ENV).ok(),
            file_token: read_token_file(),
            settings: read_settings().unwrap_or_default(),
        }
    }
}

pub fn resolve(overrides: &Overrides, sources: &Sources) -> ClientConfig {
    let token = first_non_empty([
        overrides.token.as_deref(),
        sources.env_token.as_deref(),
        sources.file_token.as_deref(),
    ]);
    let base_url = first_non_empty([
        overrides.base_url.as_deref(),
        sources.env_base_url.as_deref(),
        sources.settings.base_url.as_deref(),
    ])
    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let pause_ms = overrides
        .pause_ms
        .or(sources.settings.pause_between_requests_ms)
        .unwrap_or(0);

    ClientConfig {
        base_url,
        token,
        pause_between_requests: Duration::from_millis(pause_ms),
        timeout: sources.settings.timeout_secs.map(Duration::from_secs),
    }
}

fn first_non_empty<const N: usize>(values: [Option<&str>; N]) -> Option<String> {
    values
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

pub fn write_token(token: &str) -> Result<PathBuf, io::Error> {
    let path = token_path()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Home directory not found"))?;
    fs::write(&path, token.trim())?;
    Ok(path)
}

fn read_token_file() -> Option<String> {
    let path = token_path()?;
    fs::read_to_string(path)
        .ok()
        .map(|value| value.trim().to_string())
}

fn token_path() -> Option<PathBuf> {
    let mut path = dirs::home_dir()?;
    path.push(".togglapi");
    Some(path)
}

fn settings_path() -> Option<PathBuf> {
    let mut path = dirs::home_dir()?;
    path.push(".togglapi.json");
    Some(path)
}

fn read_settings() -> Option<Settings> {
    let path = settings_path()?;
    let contents = fs::read_to_string(path).ok()?;
    parse_settings(&contents)
}

fn parse_settings(contents: &str) -> Option<Settings> {
    match serde_json::from_str(contents) {
        Ok(settings) => Some(settings),
        Err(err) => {
            tracing::warn!("ignoring unreadable settings file: {err}");
            None
        }
    }
}
