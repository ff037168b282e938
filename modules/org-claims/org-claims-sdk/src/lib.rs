//! Org Claims SDK
//!
//! This crate provides the host contract for token claim mappers:
//!
//! - [`ProtocolMapper`] - Provider identity and admin UI metadata
//! - [`TokenClaimMapper`] - The claim-embedding operation run during token issuance
//! - [`MapperModel`], [`TokenKind`], [`UserSession`], [`ClaimSet`] - Token pipeline models
//! - [`ConfigProperty`] - Static configuration-property declarations
//! - [`MapperRegistry`] - Provider-id keyed registry used by the token pipeline
//! - [`map_claim`] - The generic "map claim" convention
//!
//! ## Usage
//!
//! ```ignore
//! use org_claims_sdk::{ClaimSet, MapperModel, MapperRegistry, TokenKind, UserSession};
//!
//! let mut registry = MapperRegistry::default();
//! registry.register(mapper);
//!
//! let mut claims = ClaimSet::new();
//! let applied = registry
//!     .apply(TokenKind::AccessToken, &mut claims, &models, &session)
//!     .await;
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod claims;
pub mod error;
pub mod models;
pub mod properties;
pub mod registry;

pub use api::{ProtocolMapper, TokenClaimMapper};
pub use claims::{map_claim, split_claim_path};
pub use error::MapperError;
pub use models::{ClaimSet, MapperModel, TokenKind, UserModel, UserSession};
pub use properties::{
    ConfigProperty, INCLUDE_IN_ACCESS_TOKEN, INCLUDE_IN_ID_TOKEN, INCLUDE_IN_USERINFO, JSON_TYPE,
    MULTIVALUED, PropertyKind, TOKEN_CLAIM_NAME, include_in_tokens_properties,
    token_claim_name_property,
};
pub use registry::MapperRegistry;
