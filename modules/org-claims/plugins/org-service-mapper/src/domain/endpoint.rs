//! Lookup URL resolution.

/// Placeholder replaced by the user id in a templated base URL.
pub const USER_ID_PLACEHOLDER: &str = "%s";

/// Builds the lookup URL for `user_id`.
///
/// A templated `base` gets its first `%s` replaced; any other base has
/// `/api/users/{user_id}/organizations` appended.
#[must_use]
pub fn lookup_url(base: &str, user_id: &str) -> String {
    if base.contains(USER_ID_PLACEHOLDER) {
        base.replacen(USER_ID_PLACEHOLDER, user_id, 1)
    } else {
        format!("{base}/api/users/{user_id}/organizations")
    }
}
