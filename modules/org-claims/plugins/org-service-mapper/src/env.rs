//! Per-call environment settings.
//!
//! The org service URL and API key are re-read on every resolution so that a
//! running host picks up changes without a restart. Reads go through
//! [`EnvSource`], which tests replace with a [`MapEnv`].

use std::collections::HashMap;
use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::config::OrgMapperConfig;

/// Source of environment variables.
pub trait EnvSource: Send + Sync {
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// In-memory environment.
#[derive(Debug, Clone, Default)]
pub struct MapEnv(HashMap<String, String>);

impl MapEnv {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }
}

impl EnvSource for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }
}

/// Org service API key. Never printed, zeroed on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ApiKey(String);

impl ApiKey {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Read-only access for building the request header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Org service settings in effect for one resolution.
#[derive(Debug, Clone)]
pub struct OrgServiceSettings {
    /// Lookup URL or `%s` template.
    pub base_url: String,
    /// API key, present only when set and non-blank.
    pub api_key: Option<ApiKey>,
}

impl OrgServiceSettings {
    /// Reads the current settings, falling back to `config.default_url` for
    /// an absent or blank URL.
    #[must_use]
    pub fn read(env: &dyn EnvSource, config: &OrgMapperConfig) -> Self {
        let base_url =
            non_blank(env.var(&config.url_env)).unwrap_or_else(|| config.default_url.clone());
        let api_key = non_blank(env.var(&config.api_key_env)).map(ApiKey::new);
        Self { base_url, api_key }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
