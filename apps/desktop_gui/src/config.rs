use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use client_core::{DEFAULT_REQUEST_TIMEOUT, DEFAULT_SERVER_URL};
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "user_directory.toml";
pub const SERVER_URL_ENV: &str = "USER_DIRECTORY_URL";
pub const TIMEOUT_ENV: &str = "USER_DIRECTORY_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.into(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Command-line flags win over every other layer.
    pub fn with_overrides(mut self, server_url: Option<String>, timeout_secs: Option<u64>) -> Self {
        if let Some(url) = server_url {
            self.server_url = url;
        }
        if let Some(secs) = timeout_secs {
            self.request_timeout_secs = secs;
        }
        self
    }

    fn apply_file(&mut self, file: FileSettings) {
        if let Some(url) = file.server_url {
            self.server_url = url;
        }
        if let Some(secs) = file.request_timeout_secs {
            self.request_timeout_secs = secs;
        }
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(SERVER_URL_ENV) {
            self.server_url = url;
        }
        if let Some(raw) = lookup(TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) => self.request_timeout_secs = secs,
                Err(err) => tracing::warn!(value = %raw, "ignoring {TIMEOUT_ENV}: {err}"),
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
    request_timeout_secs: Option<u64>,
}

/// Defaults, then the config file, then the process environment.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    load_settings_with(config_path, |key| std::env::var(key).ok())
}

fn load_settings_with(
    config_path: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match config_path {
        Some(path) => settings.apply_file(read_file_settings(path)?),
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if path.exists() {
                match read_file_settings(&path) {
                    Ok(file) => settings.apply_file(file),
                    Err(err) => tracing::warn!("skipping {DEFAULT_CONFIG_FILE}: {err:#}"),
                }
            }
        }
    }

    settings.apply_env(lookup);
    Ok(settings)
}

fn read_file_settings(path: &Path) -> anyhow::Result<FileSettings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file '{}'", path.display()))?;
    toml::from_str(&raw)
        .with_context(|| format!("failed to parse config file '{}'", path.display()))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
