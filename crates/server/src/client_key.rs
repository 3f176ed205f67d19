use axum::http::HeaderMap;

/// Shared budget key for requests with no extractable client address.
///
/// All unidentifiable clients pool into this one bucket rather than failing
/// the request; coarse, but deterministic.
pub const FALLBACK_CLIENT_KEY: &str = "unknown";

/// Derive the admission key for a request from its forwarded-address header.
///
/// Uses the first (client-most) hop of `X-Forwarded-For`. The value is an
/// opaque map key from here on; nothing downstream parses it as an address.
pub fn extract_client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| FALLBACK_CLIENT_KEY.to_string())
}
