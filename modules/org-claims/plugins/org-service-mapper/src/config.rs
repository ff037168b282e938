//! Configuration for the org service mapper.
//!
//! Static settings live here and are loaded once. The org service URL and API
//! key are *not* part of this struct: they are read from the environment on
//! every call (see [`crate::env`]), only the variable names are configured.

use std::path::Path;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix for environment overrides of the static settings, e.g.
/// `ORG_MAPPER__REQUEST_TIMEOUT=2s`.
pub const CONFIG_ENV_PREFIX: &str = "ORG_MAPPER__";

/// Fallback lookup URL, used when the URL variable is absent or blank.
pub const DEFAULT_ORG_SERVICE_URL: &str = "http://api:3000/api/users/%s/organizations";

/// Value sent in the service token header by [`ServiceTokenValue::Literal`].
pub const LEGACY_SERVICE_TOKEN_VALUE: &str = "serviceToken";

/// What goes into the service token header when an API key is configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceTokenValue {
    /// The API key itself.
    #[default]
    ApiKey,
    /// The fixed string [`LEGACY_SERVICE_TOKEN_VALUE`]; the key only toggles the header.
    Literal,
}

/// Plugin configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrgMapperConfig {
    /// Lookup URL used when the URL variable is absent or blank.
    pub default_url: String,

    /// Environment variable holding the lookup URL or template.
    pub url_env: String,

    /// Environment variable holding the org service API key.
    pub api_key_env: String,

    /// Connection establishment timeout.
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,

    /// Overall request timeout, including reading the body.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Maximum accepted response body size in bytes.
    pub max_body_size: usize,

    /// Name of the header carrying the service token.
    pub service_token_header: String,

    /// Header value policy.
    pub service_token_value: ServiceTokenValue,
}

impl Default for OrgMapperConfig {
    fn default() -> Self {
        Self {
            default_url: DEFAULT_ORG_SERVICE_URL.to_owned(),
            url_env: "ORG_SERVICE_URL".to_owned(),
            api_key_env: "ORG_SERVICE_API_KEY".to_owned(),
            connect_timeout: Duration::from_secs(3),
            request_timeout: Duration::from_secs(5),
            max_body_size: 1024 * 1024,
            service_token_header: "service_token".to_owned(),
            service_token_value: ServiceTokenValue::default(),
        }
    }
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file does not exist: {0}")]
    MissingFile(String),

    #[error("invalid org mapper configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),
}

impl OrgMapperConfig {
    /// Layered load: defaults, then the YAML file (if given), then
    /// `ORG_MAPPER__*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or a layer fails to
    /// deserialize.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = path {
            if !path.is_file() {
                return Err(ConfigError::MissingFile(path.display().to_string()));
            }
            figment = figment.merge(Yaml::file(path));
        }

        figment
            .merge(Env::prefixed(CONFIG_ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| ConfigError::Invalid(Box::new(e)))
    }
}

/// Humantime (de)serialization for `Duration` fields (`"3s"`, `"500ms"`).
mod humantime_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&humantime::format_duration(*d))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(d)?;
        humantime::parse_duration(&raw).map_err(de::Error::custom)
    }
}
