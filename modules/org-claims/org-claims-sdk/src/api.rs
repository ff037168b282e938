//! Mapper traits implemented by claim mapper providers.
//!
//! The token pipeline owns the lifecycle: it looks providers up by
//! [`ProtocolMapper::id`], renders their [`ConfigProperty`] declarations in the
//! admin UI, and calls [`TokenClaimMapper::transform`] for every configured
//! mapper instance while assembling a token.

use async_trait::async_trait;

use crate::models::{ClaimSet, MapperModel, TokenKind, UserSession};
use crate::properties::ConfigProperty;

/// Identity and display metadata of a mapper provider.
pub trait ProtocolMapper: Send + Sync {
    /// Stable provider id referenced by [`MapperModel::provider_id`].
    fn id(&self) -> &str;

    /// Category the provider is grouped under in the admin UI.
    fn display_category(&self) -> &str;

    /// Human readable provider name.
    fn display_type(&self) -> &str;

    /// One-line description shown next to the provider.
    fn help_text(&self) -> &str;

    /// Properties an administrator can set on a mapper instance.
    fn config_properties(&self) -> &[ConfigProperty];
}

/// A mapper that writes claims into tokens.
///
/// Implementations must not fail: whatever goes wrong while computing a
/// claim value, token issuance continues.
#[async_trait]
pub trait TokenClaimMapper: ProtocolMapper {
    /// Computes the claim value for `session` and writes it into `claims`.
    async fn set_claim(&self, claims: &mut ClaimSet, model: &MapperModel, session: &UserSession);

    /// Runs [`set_claim`](Self::set_claim) if `model` is enabled for `kind`.
    ///
    /// Returns whether the mapper ran.
    async fn transform(
        &self,
        kind: TokenKind,
        claims: &mut ClaimSet,
        model: &MapperModel,
        session: &UserSession,
    ) -> bool {
        if !model.includes(kind) {
            return false;
        }
        self.set_claim(claims, model, session).await;
        true
    }
}
