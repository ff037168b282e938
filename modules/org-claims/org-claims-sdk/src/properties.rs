//! Configuration-property declarations shown in the admin UI.
//!
//! The keys here double as the keys of [`MapperModel::config`](crate::MapperModel).

use serde::{Deserialize, Serialize};

/// Name of the claim to write.
pub const TOKEN_CLAIM_NAME: &str = "claim.name";
/// Whether the claim goes into access tokens.
pub const INCLUDE_IN_ACCESS_TOKEN: &str = "access.token.claim";
/// Whether the claim goes into ID tokens.
pub const INCLUDE_IN_ID_TOKEN: &str = "id.token.claim";
/// Whether the claim goes into user-info responses.
pub const INCLUDE_IN_USERINFO: &str = "userinfo.token.claim";
/// Whether list values are written as arrays.
pub const MULTIVALUED: &str = "multivalued";
/// JSON type single values are converted to.
pub const JSON_TYPE: &str = "jsonType.label";

/// Widget type of a configuration property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    String,
    Boolean,
}

/// A single configuration property declared by a mapper provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigProperty {
    /// Key under which the value is stored in the mapper model.
    pub name: String,
    /// Short label.
    pub label: String,
    /// Tooltip text.
    pub help_text: String,
    /// Widget type.
    pub kind: PropertyKind,
    /// Value pre-filled for new mapper instances.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl ConfigProperty {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        help_text: impl Into<String>,
        kind: PropertyKind,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            help_text: help_text.into(),
            kind,
            default_value: None,
        }
    }

    #[must_use]
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

/// The standard "Token Claim Name" property.
#[must_use]
pub fn token_claim_name_property() -> ConfigProperty {
    ConfigProperty::new(
        TOKEN_CLAIM_NAME,
        "Token Claim Name",
        "Name of the claim to insert into the token. This can be a fully qualified name \
         like 'address.street'. In this case, a nested json object will be created. \
         To prevent nesting and use dot literally, escape the dot with backslash (\\.).",
        PropertyKind::String,
    )
}

/// The standard "Add to access token / ID token / userinfo" properties, in that order.
#[must_use]
pub fn include_in_tokens_properties() -> Vec<ConfigProperty> {
    vec![
        ConfigProperty::new(
            INCLUDE_IN_ID_TOKEN,
            "Add to ID token",
            "Indicates if the claim should be added to the ID token.",
            PropertyKind::Boolean,
        )
        .with_default("true"),
        ConfigProperty::new(
            INCLUDE_IN_ACCESS_TOKEN,
            "Add to access token",
            "Indicates if the claim should be added to the access token.",
            PropertyKind::Boolean,
        )
        .with_default("true"),
        ConfigProperty::new(
            INCLUDE_IN_USERINFO,
            "Add to userinfo",
            "Indicates if the claim should be added to the userinfo.",
            PropertyKind::Boolean,
        )
        .with_default("true"),
    ]
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn include_properties_default_to_true() {
        let props = include_in_tokens_properties();
        assert_eq!(props.len(), 3);
        assert!(
            props
                .iter()
                .all(|p| p.kind == PropertyKind::Boolean && p.default_value.as_deref() == Some("true"))
        );
    }

    #[test]
    fn claim_name_property_serializes_without_default() {
        let json = serde_json::to_value(token_claim_name_property()).unwrap();
        assert_eq!(json["name"], "claim.name");
        assert_eq!(json["kind"], "string");
        assert!(json.get("default_value").is_none());
    }
}
