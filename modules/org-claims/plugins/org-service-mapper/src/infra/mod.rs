//! Infrastructure layer: outbound transport to the org service.

pub mod transport;

pub use transport::{HyperTransport, OrgLookupRequest, OrgLookupResponse, OrgServiceTransport};
