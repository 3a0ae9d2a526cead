//! Identity headers set by the upstream identity provider.
//!
//! The access layer trusts these headers as given; authentication itself
//! happens before requests reach this service.

use axum::http::HeaderMap;

use crate::access::{Identity, Viewer};

/// Username of the caller; absent for anonymous requests
pub const USER_HEADER: &str = "x-user";
/// Comma-separated group names
pub const GROUPS_HEADER: &str = "x-user-groups";
/// `true` or `1` for superusers
pub const SUPERUSER_HEADER: &str = "x-user-superuser";

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

pub fn identity_from_headers(headers: &HeaderMap) -> Identity {
    let username = header_str(headers, USER_HEADER).map(str::to_string);

    let groups = header_str(headers, GROUPS_HEADER)
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let is_superuser = header_str(headers, SUPERUSER_HEADER)
        .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
        .unwrap_or(false);

    Identity {
        username,
        groups,
        is_superuser,
    }
}

/// Resolve the caller once per request
pub fn viewer_from_headers(headers: &HeaderMap) -> Viewer {
    Viewer::new(identity_from_headers(headers))
}
