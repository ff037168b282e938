//! Domain layer for the org service mapper.

pub mod endpoint;
pub mod error;
pub mod resolver;

pub use endpoint::{USER_ID_PLACEHOLDER, lookup_url};
pub use error::ResolveError;
pub use resolver::{OrganizationList, OrganizationResolver, parse_organizations};
