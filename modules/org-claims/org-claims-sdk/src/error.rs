//! Error types for the claim mapper registry.

use thiserror::Error;

/// Errors raised by the host side of the mapper contract.
///
/// Mappers themselves never fail token issuance; these errors only surface
/// from registry lookups.
#[derive(Debug, Error)]
pub enum MapperError {
    /// No mapper is registered under the requested provider id.
    #[error("unknown claim mapper provider: {0}")]
    UnknownMapper(String),
}
