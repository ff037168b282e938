//! Outbound HTTP to the org service.
//!
//! A fresh client is built for every lookup: nothing is pooled or cached
//! between token issuances. Two deadlines apply:
//!
//! - `connect_timeout` on the connector, for TCP connection establishment;
//! - `request_timeout` around the whole exchange, including the body read.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::{Request, StatusCode, Uri};
use http_body_util::{BodyExt, Empty, LengthLimitError, Limited};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;

use crate::config::OrgMapperConfig;
use crate::domain::ResolveError;

/// A single organization lookup.
#[derive(Debug, Clone)]
pub struct OrgLookupRequest {
    pub url: String,
    pub headers: Vec<(HeaderName, HeaderValue)>,
}

/// Status and fully read body of a lookup.
#[derive(Debug, Clone)]
pub struct OrgLookupResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

/// Executes lookups against the org service.
#[async_trait]
pub trait OrgServiceTransport: Send + Sync {
    /// Sends a GET and reads the whole body.
    ///
    /// Returns `Ok` for every HTTP status; only transport-level failures are
    /// errors.
    async fn get(&self, request: OrgLookupRequest) -> Result<OrgLookupResponse, ResolveError>;
}

type OrgServiceClient = Client<HttpsConnector<HttpConnector>, Empty<Bytes>>;

/// hyper-based transport with per-call clients.
#[derive(Debug, Clone)]
pub struct HyperTransport {
    connect_timeout: Duration,
    request_timeout: Duration,
    max_body_size: usize,
}

impl HyperTransport {
    #[must_use]
    pub fn new(config: &OrgMapperConfig) -> Self {
        Self {
            connect_timeout: config.connect_timeout,
            request_timeout: config.request_timeout,
            max_body_size: config.max_body_size,
        }
    }

    fn client(&self) -> Result<OrgServiceClient, ResolveError> {
        let mut http = HttpConnector::new();
        http.set_connect_timeout(Some(self.connect_timeout));
        http.enforce_http(false);

        let https = hyper_rustls::HttpsConnectorBuilder::new()
            .with_provider_and_webpki_roots(crypto_provider())
            .map_err(|e| ResolveError::Transport(Box::new(e)))?
            .https_or_http()
            .enable_http1()
            .wrap_connector(http);

        Ok(Client::builder(TokioExecutor::new()).build(https))
    }

    async fn exchange(
        client: OrgServiceClient,
        request: Request<Empty<Bytes>>,
        max_body_size: usize,
    ) -> Result<OrgLookupResponse, ResolveError> {
        let response = client.request(request).await?;
        let status = response.status();

        let body = Limited::new(response.into_body(), max_body_size)
            .collect()
            .await
            .map_err(|e| {
                if e.is::<LengthLimitError>() {
                    ResolveError::BodyTooLarge {
                        limit: max_body_size,
                    }
                } else {
                    ResolveError::Transport(e)
                }
            })?
            .to_bytes();

        Ok(OrgLookupResponse { status, body })
    }
}

#[async_trait]
impl OrgServiceTransport for HyperTransport {
    async fn get(&self, request: OrgLookupRequest) -> Result<OrgLookupResponse, ResolveError> {
        let uri = parse_uri(&request.url)?;

        let mut builder = Request::get(uri);
        for (name, value) in request.headers {
            builder = builder.header(name, value);
        }
        let http_request = builder.body(Empty::new())?;

        let client = self.client()?;
        tokio::time::timeout(
            self.request_timeout,
            Self::exchange(client, http_request, self.max_body_size),
        )
        .await
        .map_err(|_| ResolveError::Timeout(self.request_timeout))?
    }
}

fn parse_uri(url: &str) -> Result<Uri, ResolveError> {
    let uri: Uri = url.parse().map_err(|e: http::uri::InvalidUri| {
        ResolveError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        }
    })?;

    if uri.scheme().is_none() || uri.host().is_none() {
        return Err(ResolveError::InvalidUrl {
            url: url.to_owned(),
            reason: "URL must be absolute".to_owned(),
        });
    }
    Ok(uri)
}

/// Uses the process-wide rustls provider when one is installed, otherwise
/// aws-lc-rs without installing it globally.
fn crypto_provider() -> Arc<rustls::crypto::CryptoProvider> {
    rustls::crypto::CryptoProvider::get_default()
        .cloned()
        .unwrap_or_else(|| Arc::new(rustls::crypto::aws_lc_rs::default_provider()))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn transport(request_timeout: Duration) -> HyperTransport {
        HyperTransport::new(&OrgMapperConfig {
            request_timeout,
            max_body_size: 64,
            ..OrgMapperConfig::default()
        })
    }

    fn lookup(url: String) -> OrgLookupRequest {
        OrgLookupRequest {
            url,
            headers: Vec::new(),
        }
    }

    #[test]
    fn relative_url_is_rejected() {
        let err = parse_uri("/api/users/u-1/organizations").unwrap_err();
        assert!(matches!(err, ResolveError::InvalidUrl { .. }));

        let err = parse_uri("http://exa mple.com").unwrap_err();
        assert!(matches!(err, ResolveError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn returns_non_success_status_as_ok() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/orgs");
            then.status(404).body("Not Found");
        });

        let response = transport(Duration::from_secs(5))
            .get(lookup(server.url("/orgs")))
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.body, Bytes::from_static(b"Not Found"));
        mock.assert();
    }

    #[tokio::test]
    async fn forwards_headers() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/orgs").header("x-probe", "1");
            then.status(200).body("[]");
        });

        let request = OrgLookupRequest {
            url: server.url("/orgs"),
            headers: vec![(
                HeaderName::from_static("x-probe"),
                HeaderValue::from_static("1"),
            )],
        };
        let response = transport(Duration::from_secs(5)).get(request).await.unwrap();

        assert_eq!(response.status, StatusCode::OK);
        mock.assert();
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/orgs");
            then.status(200)
                .body("[]")
                .delay(Duration::from_millis(1500));
        });

        let err = transport(Duration::from_millis(200))
            .get(lookup(server.url("/orgs")))
            .await
            .unwrap_err();

        assert!(matches!(err, ResolveError::Timeout(d) if d == Duration::from_millis(200)));
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/orgs");
            then.status(200).body("x".repeat(1024));
        });

        let err = transport(Duration::from_secs(5))
            .get(lookup(server.url("/orgs")))
            .await
            .unwrap_err();

        assert!(matches!(err, ResolveError::BodyTooLarge { limit: 64 }));
    }

    #[tokio::test]
    async fn refused_connection_is_a_connect_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = transport(Duration::from_secs(5))
            .get(lookup(format!("http://{addr}/orgs")))
            .await
            .unwrap_err();

        assert!(matches!(err, ResolveError::Connect(_)), "got: {err}");
    }
}
