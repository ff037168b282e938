//! Organization resolution for a single user.

use std::sync::Arc;

use http::header::{HeaderName, HeaderValue};

use super::endpoint::lookup_url;
use super::error::ResolveError;
use crate::config::{LEGACY_SERVICE_TOKEN_VALUE, OrgMapperConfig, ServiceTokenValue};
use crate::env::{ApiKey, EnvSource, OrgServiceSettings, ProcessEnv};
use crate::infra::{HyperTransport, OrgLookupRequest, OrgServiceTransport};

/// Ordered organization ids of one user.
pub type OrganizationList = Vec<String>;

/// Looks up the organizations a user belongs to.
///
/// Every call reads its settings from the environment, performs at most one
/// GET, and never fails: any problem yields an empty list.
pub struct OrganizationResolver {
    config: OrgMapperConfig,
    env: Arc<dyn EnvSource>,
    transport: Arc<dyn OrgServiceTransport>,
}

impl OrganizationResolver {
    /// Resolver reading the process environment and calling out over HTTP.
    #[must_use]
    pub fn new(config: OrgMapperConfig) -> Self {
        let transport = Arc::new(HyperTransport::new(&config));
        Self::with_parts(config, Arc::new(ProcessEnv), transport)
    }

    #[must_use]
    pub fn with_parts(
        config: OrgMapperConfig,
        env: Arc<dyn EnvSource>,
        transport: Arc<dyn OrgServiceTransport>,
    ) -> Self {
        Self {
            config,
            env,
            transport,
        }
    }

    #[must_use]
    pub fn config(&self) -> &OrgMapperConfig {
        &self.config
    }

    /// Organizations of `user_id`, or an empty list on any failure.
    pub async fn resolve(&self, user_id: Option<&str>) -> OrganizationList {
        match self.try_resolve(user_id).await {
            Ok(organizations) => {
                tracing::debug!(
                    user_id,
                    count = organizations.len(),
                    "resolved organizations"
                );
                organizations
            }
            Err(e) => {
                log_failure(user_id, &e);
                OrganizationList::new()
            }
        }
    }

    /// Fallible lookup behind [`resolve`](Self::resolve).
    ///
    /// # Errors
    ///
    /// Returns the [`ResolveError`] describing why no organizations could be
    /// read; see its variants.
    pub async fn try_resolve(
        &self,
        user_id: Option<&str>,
    ) -> Result<OrganizationList, ResolveError> {
        let user_id = user_id
            .filter(|id| !id.trim().is_empty())
            .ok_or(ResolveError::MissingUser)?;

        let settings = OrgServiceSettings::read(self.env.as_ref(), &self.config);
        let url = lookup_url(&settings.base_url, user_id);

        let mut headers = Vec::new();
        if let Some(api_key) = settings.api_key.as_ref() {
            headers.push(self.service_token_header(api_key)?);
        }

        tracing::debug!(user_id, url = %url, "fetching organizations");
        let response = self
            .transport
            .get(OrgLookupRequest { url, headers })
            .await?;

        if !response.status.is_success() {
            return Err(ResolveError::UpstreamStatus(response.status));
        }
        parse_organizations(&response.body)
    }

    fn service_token_header(
        &self,
        api_key: &ApiKey,
    ) -> Result<(HeaderName, HeaderValue), ResolveError> {
        let name = HeaderName::from_bytes(self.config.service_token_header.as_bytes())?;
        let mut value = match self.config.service_token_value {
            ServiceTokenValue::ApiKey => HeaderValue::from_str(api_key.expose())?,
            ServiceTokenValue::Literal => HeaderValue::from_static(LEGACY_SERVICE_TOKEN_VALUE),
        };
        value.set_sensitive(true);
        Ok((name, value))
    }
}

/// Parses a 2xx body as a JSON array of organization ids.
///
/// # Errors
///
/// `EmptyBody` for an empty or whitespace-only body, `MalformedBody` when it
/// is not a JSON array of strings.
pub fn parse_organizations(body: &[u8]) -> Result<OrganizationList, ResolveError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ResolveError::EmptyBody);
    }
    Ok(serde_json::from_slice(body)?)
}

fn log_failure(user_id: Option<&str>, err: &ResolveError) {
    match err {
        ResolveError::MissingUser => {
            tracing::warn!("user id is absent or blank; using empty organizations list");
        }
        ResolveError::UpstreamStatus(status) => {
            tracing::warn!(
                user_id,
                status = status.as_u16(),
                "non-2xx status from org service; using empty organizations list"
            );
        }
        e if e.is_benign() => {
            tracing::debug!(user_id, "empty response body; using empty organizations list");
        }
        e => {
            tracing::warn!(user_id, error = %e, "error fetching organizations; using empty organizations list");
        }
    }
}
