//! Bearer-token gate for the admin endpoints.
//!
//! The identity collaborator reduces to a single boolean here: a request is
//! authenticated iff it presents the configured token. Session mechanics
//! beyond that live outside this service.

use axum::http::{header, HeaderMap};
use sha2::{Digest, Sha256};

/// Check the bearer token on an admin request against the configured token.
///
/// With no token configured, nothing is authorized. Digests are compared
/// instead of the raw strings so comparison time does not track the position
/// of the first mismatching byte.
pub fn is_authorized(headers: &HeaderMap, expected_token: Option<&str>) -> bool {
    let Some(expected) = expected_token else {
        return false;
    };

    let Some(presented) = bearer_token(headers) else {
        return false;
    };

    sha256_hex(presented.as_bytes()) == sha256_hex(expected.as_bytes())
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
