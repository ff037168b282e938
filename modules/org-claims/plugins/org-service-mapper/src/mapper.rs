//! The `custom-organization-mapper` provider.

use std::sync::Arc;

use async_trait::async_trait;
use org_claims_sdk::{
    ClaimSet, ConfigProperty, MapperModel, MapperRegistry, ProtocolMapper, TokenClaimMapper,
    UserSession, include_in_tokens_properties, map_claim, token_claim_name_property,
};

use crate::config::OrgMapperConfig;
use crate::domain::OrganizationResolver;

/// Provider id referenced by mapper models.
pub const PROVIDER_ID: &str = "custom-organization-mapper";

const DISPLAY_CATEGORY: &str = "Token Mapper";
const DISPLAY_TYPE: &str = "Custom Organization Mapper";
const HELP_TEXT: &str = "Adds open-dpp organizations to the token";

/// Writes the user's organizations into the configured token claim.
pub struct CustomOrganizationMapper {
    resolver: OrganizationResolver,
    properties: Vec<ConfigProperty>,
}

impl CustomOrganizationMapper {
    #[must_use]
    pub fn new(resolver: OrganizationResolver) -> Self {
        let mut properties = vec![token_claim_name_property()];
        properties.extend(include_in_tokens_properties());
        Self {
            resolver,
            properties,
        }
    }

    #[must_use]
    pub fn from_config(config: OrgMapperConfig) -> Self {
        Self::new(OrganizationResolver::new(config))
    }

    #[must_use]
    pub fn resolver(&self) -> &OrganizationResolver {
        &self.resolver
    }
}

impl ProtocolMapper for CustomOrganizationMapper {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn display_category(&self) -> &'static str {
        DISPLAY_CATEGORY
    }

    fn display_type(&self) -> &'static str {
        DISPLAY_TYPE
    }

    fn help_text(&self) -> &'static str {
        HELP_TEXT
    }

    fn config_properties(&self) -> &[ConfigProperty] {
        &self.properties
    }
}

#[async_trait]
impl TokenClaimMapper for CustomOrganizationMapper {
    #[tracing::instrument(skip_all, fields(mapper = %model.name))]
    async fn set_claim(&self, claims: &mut ClaimSet, model: &MapperModel, session: &UserSession) {
        let organizations = self.resolver.resolve(session.user_id()).await;
        map_claim(claims, model, &organizations);
    }
}

/// Registers the provider with the token pipeline's registry.
pub fn register(registry: &mut MapperRegistry, config: OrgMapperConfig) {
    registry.register(Arc::new(CustomOrganizationMapper::from_config(config)));
    tracing::info!(provider_id = PROVIDER_ID, "registered claim mapper provider");
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use org_claims_sdk::{
        INCLUDE_IN_ACCESS_TOKEN, INCLUDE_IN_ID_TOKEN, INCLUDE_IN_USERINFO, PropertyKind,
        TOKEN_CLAIM_NAME, TokenKind,
    };
    use serde_json::json;

    #[test]
    fn exposes_static_metadata() {
        let mapper = CustomOrganizationMapper::from_config(OrgMapperConfig::default());

        assert_eq!(mapper.id(), "custom-organization-mapper");
        assert_eq!(mapper.display_category(), "Token Mapper");
        assert_eq!(mapper.display_type(), "Custom Organization Mapper");
        assert_eq!(mapper.help_text(), "Adds open-dpp organizations to the token");

        let names: Vec<&str> = mapper
            .config_properties()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                TOKEN_CLAIM_NAME,
                INCLUDE_IN_ID_TOKEN,
                INCLUDE_IN_ACCESS_TOKEN,
                INCLUDE_IN_USERINFO
            ]
        );
        assert_eq!(mapper.config_properties()[0].kind, PropertyKind::String);
    }

    #[test]
    fn register_uses_provider_id() {
        let mut registry = MapperRegistry::default();
        register(&mut registry, OrgMapperConfig::default());
        assert!(registry.contains(PROVIDER_ID));
    }

    #[tokio::test]
    async fn session_without_user_gets_empty_claim() {
        let mapper = CustomOrganizationMapper::from_config(OrgMapperConfig::default());
        let model = MapperModel::new("orgs", PROVIDER_ID)
            .with_config(TOKEN_CLAIM_NAME, "organizations")
            .with_config(INCLUDE_IN_ACCESS_TOKEN, "true");

        let mut claims = ClaimSet::new();
        let ran = mapper
            .transform(
                TokenKind::AccessToken,
                &mut claims,
                &model,
                &UserSession::default(),
            )
            .await;

        assert!(ran);
        assert_eq!(claims.get("organizations"), Some(&json!([])));
    }
}
