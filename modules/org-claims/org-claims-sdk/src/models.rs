//! Token pipeline models shared between the host and mapper providers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::properties::{
    INCLUDE_IN_ACCESS_TOKEN, INCLUDE_IN_ID_TOKEN, INCLUDE_IN_USERINFO, JSON_TYPE, MULTIVALUED,
    TOKEN_CLAIM_NAME,
};

/// Kind of token (or response) being assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    AccessToken,
    IdToken,
    UserInfo,
}

impl TokenKind {
    pub const ALL: [TokenKind; 3] = [Self::AccessToken, Self::IdToken, Self::UserInfo];

    /// Mapper config key that opts a mapper into this token kind.
    #[must_use]
    pub const fn include_key(self) -> &'static str {
        match self {
            Self::AccessToken => INCLUDE_IN_ACCESS_TOKEN,
            Self::IdToken => INCLUDE_IN_ID_TOKEN,
            Self::UserInfo => INCLUDE_IN_USERINFO,
        }
    }
}

/// The authenticated user, as far as mappers are concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserModel {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl UserModel {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: None,
        }
    }
}

/// Session the token is being issued for.
///
/// The user is optional: some flows (service accounts, broken sessions)
/// reach the mappers without one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    #[serde(default)]
    pub user: Option<UserModel>,
}

impl UserSession {
    #[must_use]
    pub fn for_user(user: UserModel) -> Self {
        Self { user: Some(user) }
    }

    /// Identifier of the session's user, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str())
    }
}

/// One configured mapper instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapperModel {
    /// Display name of this instance.
    pub name: String,
    /// Id of the provider implementing it.
    pub provider_id: String,
    /// Raw string configuration, keyed by [`ConfigProperty::name`](crate::ConfigProperty).
    #[serde(default)]
    pub config: HashMap<String, String>,
}

impl MapperModel {
    #[must_use]
    pub fn new(name: impl Into<String>, provider_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            provider_id: provider_id.into(),
            config: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    /// Configured claim name, `None` when unset or blank.
    #[must_use]
    pub fn claim_name(&self) -> Option<&str> {
        self.config
            .get(TOKEN_CLAIM_NAME)
            .map(String::as_str)
            .filter(|name| !name.trim().is_empty())
    }

    /// Whether this instance writes into tokens of `kind`.
    ///
    /// Only the literal `"true"` opts in; a missing key means no.
    #[must_use]
    pub fn includes(&self, kind: TokenKind) -> bool {
        self.flag(kind.include_key()) == Some(true)
    }

    /// Explicit multivalued setting, `None` when not configured.
    #[must_use]
    pub fn multivalued(&self) -> Option<bool> {
        self.flag(MULTIVALUED)
    }

    /// Configured JSON type label, `None` when unset or blank.
    #[must_use]
    pub fn json_type(&self) -> Option<&str> {
        self.config
            .get(JSON_TYPE)
            .map(String::as_str)
            .filter(|t| !t.trim().is_empty())
    }

    fn flag(&self, key: &str) -> Option<bool> {
        self.config.get(key).map(|v| v == "true")
    }
}

/// Claims of a single token, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimSet(Map<String, Value>);

impl ClaimSet {
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Follows nested objects along `path`.
    #[must_use]
    pub fn get_path<S: AsRef<str>>(&self, path: &[S]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.0.get(first.as_ref())?;
        for segment in rest {
            current = current.as_object()?.get(segment.as_ref())?;
        }
        Some(current)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(name.into(), value)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn as_map_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.0
    }

    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for ClaimSet {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
