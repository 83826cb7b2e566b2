//! Shared HTTP client and auth header helpers for schema fetches.

use std::sync::OnceLock;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .pool_max_idle_per_host(10)
            .build()
            .expect("Failed to build HTTP client")
    })
}

/// Build default headers for a Bearer-token API.
pub fn bearer_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(val) = HeaderValue::from_str(&format!("Bearer {api_key}")) {
        headers.insert(AUTHORIZATION, val);
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_headers_set_auth_and_content_type() {
        let headers = bearer_headers("cpk_123");
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer cpk_123");
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn invalid_key_omits_auth_header() {
        // Header values cannot contain newlines; the key is dropped rather
        // than panicking mid-request.
        let headers = bearer_headers("bad\nkey");
        assert!(headers.get(AUTHORIZATION).is_none());
    }
}
