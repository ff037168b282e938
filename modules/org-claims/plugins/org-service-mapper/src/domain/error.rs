//! Failure taxonomy of an organization lookup.

use std::time::Duration;

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Why a lookup produced no organizations.
///
/// None of these reach the token pipeline: [`OrganizationResolver::resolve`]
/// logs them and returns an empty list.
///
/// [`OrganizationResolver::resolve`]: crate::domain::OrganizationResolver::resolve
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The session has no user, or the user id is blank.
    #[error("user id is absent or blank")]
    MissingUser,

    /// The resolved lookup URL is not a usable absolute URL.
    #[error("invalid org service URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Header name or value rejected by the HTTP stack.
    #[error("invalid service token header: {0}")]
    InvalidHeader(String),

    /// Request building failed.
    #[error("failed to build org service request: {0}")]
    Request(#[from] http::Error),

    /// TCP/TLS connection could not be established.
    #[error("connection to org service failed: {0}")]
    Connect(#[source] BoxError),

    /// Any other transport or IO failure.
    #[error("org service transport error: {0}")]
    Transport(#[source] BoxError),

    /// No complete response within the overall request timeout.
    #[error("org service did not respond within {}", humantime::format_duration(*.0))]
    Timeout(Duration),

    /// Response body exceeded the configured limit.
    #[error("org service response body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    /// Non-2xx status.
    #[error("org service returned HTTP {0}")]
    UpstreamStatus(http::StatusCode),

    /// 2xx with an empty or whitespace-only body.
    #[error("org service returned an empty body")]
    EmptyBody,

    /// Body is not a JSON array of strings.
    #[error("org service body is not a JSON array of strings: {0}")]
    MalformedBody(#[from] serde_json::Error),
}

impl ResolveError {
    /// Whether this outcome is routine and only worth a debug log.
    #[must_use]
    pub fn is_benign(&self) -> bool {
        matches!(self, Self::EmptyBody)
    }
}

impl From<http::header::InvalidHeaderName> for ResolveError {
    fn from(err: http::header::InvalidHeaderName) -> Self {
        Self::InvalidHeader(err.to_string())
    }
}

impl From<http::header::InvalidHeaderValue> for ResolveError {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::InvalidHeader(err.to_string())
    }
}

impl From<hyper_util::client::legacy::Error> for ResolveError {
    fn from(err: hyper_util::client::legacy::Error) -> Self {
        if err.is_connect() {
            Self::Connect(Box::new(err))
        } else {
            Self::Transport(Box::new(err))
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn only_empty_body_is_benign() {
        assert!(ResolveError::EmptyBody.is_benign());
        assert!(!ResolveError::MissingUser.is_benign());
        assert!(!ResolveError::UpstreamStatus(http::StatusCode::NOT_FOUND).is_benign());
        assert!(!ResolveError::Timeout(Duration::from_secs(5)).is_benign());
    }

    #[test]
    fn upstream_status_message_contains_code() {
        let err = ResolveError::UpstreamStatus(http::StatusCode::SERVICE_UNAVAILABLE);
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn malformed_body_preserves_source() {
        let json_err = serde_json::from_str::<Vec<String>>("not json").unwrap_err();
        let err = ResolveError::from(json_err);
        assert!(err.source().is_some());
    }

    #[test]
    fn invalid_header_value_is_mapped() {
        let err: ResolveError = http::HeaderValue::from_str("bad\nvalue").unwrap_err().into();
        assert!(matches!(err, ResolveError::InvalidHeader(_)));
    }
}
