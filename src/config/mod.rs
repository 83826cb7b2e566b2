//! Configuration (env-driven with programmatic overrides).

use std::fmt;

use crate::error::{ChuteKitError, Result};

/// Default platform host; individual chutes live on per-model subdomains.
pub const DEFAULT_BASE_URL: &str = "https://api.chutes.ai";

/// Configuration for talking to the Chutes platform.
///
/// Resolution order for the API key:
/// 1. Explicit value via [`ChutesConfig::with_api_key`]
/// 2. `CHUTES_API_KEY` / `CHUTES_API_TOKEN` environment variables
#[derive(Clone, Default)]
pub struct ChutesConfig {
    api_key: Option<String>,
    base_url: Option<String>,
}

impl fmt::Debug for ChutesConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChutesConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| ".."))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ChutesConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from environment variables (CHUTES_API_KEY, CHUTES_BASE_URL).
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let mut config = Self::new();

        let key_vars = ["CHUTES_API_KEY", "CHUTES_API_TOKEN"];
        for var in &key_vars {
            if let Ok(key) = std::env::var(var) {
                config.api_key = Some(key);
                break;
            }
        }

        if let Ok(url) = std::env::var("CHUTES_BASE_URL") {
            config.base_url = Some(url);
        }

        config
    }

    /// Set the API key explicitly.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Override the base URL (e.g., for a self-hosted deployment or tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Resolved API key, or an authentication error if none is configured.
    pub fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| ChuteKitError::Authentication("Missing CHUTES_API_KEY".into()))
    }

    /// Resolved base URL (override or platform default).
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }
}
