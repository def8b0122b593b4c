use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Environment prefix for overrides, e.g. `INTERVIEW__API__BASE_URL`
pub const ENV_PREFIX: &str = "INTERVIEW";

/// API key used when nothing else is configured. Only meaningful against a
/// local development backend.
pub const DEFAULT_API_KEY: &str = "local-dev-key";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/resume-flow";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base address of the interview backend, e.g. `https://host/api/resume-flow`
    pub base_url: String,

    /// Static key sent as `X-API-Key` on every request
    pub key: String,
}

impl ApiConfig {
    /// Whether the built-in development key is still in use
    pub fn uses_default_key(&self) -> bool {
        self.key == DEFAULT_API_KEY
    }

    /// Key prefix safe to put in logs
    pub fn masked_key(&self) -> String {
        mask_key(&self.key)
    }
}

impl Config {
    /// Load defaults, then the optional file at `path`, then `INTERVIEW__*` variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    /// Same as [`Config::load`] with a custom environment prefix.
    pub fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("service.name", "interview-room")?
            .set_default("service.http.bind", "127.0.0.1")?
            .set_default("service.http.port", 3000)?
            .set_default("api.base_url", DEFAULT_API_BASE_URL)?
            .set_default("api.key", DEFAULT_API_KEY)?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(env_prefix)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .context("Failed to build configuration")?;

        settings
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

pub(crate) fn mask_key(key: &str) -> String {
    if key.is_empty() {
        return "No API key".to_string();
    }
    let prefix: String = key.chars().take(10).collect();
    format!("{}...", prefix)
}
