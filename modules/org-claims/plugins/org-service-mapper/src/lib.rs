//! Org Service Mapper Plugin
//!
//! Adds the organizations a user belongs to into issued tokens. The list is
//! fetched from the org service at issuance time; any failure results in an
//! empty list and token issuance carries on.
//!
//! ## Environment
//!
//! | Variable | Effect |
//! |---|---|
//! | `ORG_SERVICE_URL` | Lookup URL. With `%s` the user id is substituted, otherwise `/api/users/{id}/organizations` is appended. |
//! | `ORG_SERVICE_API_KEY` | When non-blank, a `service_token` header is sent. |
//!
//! Both are read on every call.
//!
//! ## Configuration
//!
//! ```yaml
//! default_url: "http://api:3000/api/users/%s/organizations"
//! connect_timeout: 3s
//! request_timeout: 5s
//! max_body_size: 1048576
//! service_token_header: service_token
//! service_token_value: api_key   # or `literal`
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;
pub mod env;
pub mod infra;
pub mod mapper;

pub use config::{OrgMapperConfig, ServiceTokenValue};
pub use domain::{OrganizationList, OrganizationResolver, ResolveError};
pub use mapper::{CustomOrganizationMapper, PROVIDER_ID, register};
