//! Schema fetching, caching, and capability discovery.
//!
//! Discovery is total: network errors, non-2xx responses, unparseable bodies,
//! and placeholder schemas all degrade to the synthetic fallback capability
//! set instead of surfacing as errors. Blocking a caller on discovery
//! uncertainty is the one failure mode this module is not allowed to have.

pub mod http;
pub mod interpret;

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{debug, warn};

use crate::types::CapabilityDescriptor;

use self::http::{bearer_headers, shared_client};
use self::interpret::{interpret_schema, schema_is_broken};

/// How long a fetched schema stays live. Not externally configurable.
pub const SCHEMA_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Time source seam so cache expiry is deterministic in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock time; the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct CacheEntry {
    /// Parsed schema, or `None` when the fetch fell back. Fallback answers
    /// are cached for the TTL too; `clear_entry` forces an earlier retry.
    schema: Option<Value>,
    fetched_at: Instant,
}

/// Per-chute schema cache keyed by base URL.
///
/// An explicit object rather than module-level state: whoever composes the
/// engine owns the cache lifetime, and tests get isolation for free. Entries
/// older than [`SCHEMA_CACHE_TTL`] are treated as absent. Concurrent
/// discovery of the same base URL before the first fetch resolves is not
/// deduplicated; both fetches produce equivalent results and the cache ends
/// up holding the latest.
pub struct SchemaCache {
    entries: HashMap<String, CacheEntry>,
    ttl: Duration,
    clock: Box<dyn Clock>,
}

impl Default for SchemaCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaCache {
    /// Create an empty cache using the system clock.
    pub fn new() -> Self {
        Self::with_clock(Box::new(SystemClock))
    }

    /// Create an empty cache with an injected time source.
    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            ttl: SCHEMA_CACHE_TTL,
            clock,
        }
    }

    /// Discover the capability surface of the chute at `base_url`.
    ///
    /// Reuses a live cached schema when present; otherwise fetches
    /// `{base_url}/openapi.json` with the bearer credential. This call never
    /// fails — every failure branch degrades to the fallback capability set.
    pub async fn discover(&mut self, base_url: &str, api_key: &str) -> CapabilityDescriptor {
        if let Some(entry) = self.entries.get(base_url) {
            // Only entries strictly older than the TTL are treated as absent.
            if self.clock.now().duration_since(entry.fetched_at) <= self.ttl {
                debug!(base_url, "schema cache hit");
                return interpret_schema(entry.schema.as_ref());
            }
        }

        let schema = fetch_schema(base_url, api_key).await;
        let descriptor = interpret_schema(schema.as_ref());
        self.entries.insert(
            base_url.to_string(),
            CacheEntry {
                schema,
                fetched_at: self.clock.now(),
            },
        );
        descriptor
    }

    /// Drop every cache entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drop the entry for one base URL, forcing the next discovery to fetch.
    pub fn clear_entry(&mut self, base_url: &str) {
        self.entries.remove(base_url);
    }
}

/// Single-attempt schema fetch. Every failure is a normal branch returning
/// `None`; discovery failure is an expected, common case.
async fn fetch_schema(base_url: &str, api_key: &str) -> Option<Value> {
    let url = format!("{}/openapi.json", base_url.trim_end_matches('/'));
    debug!(%url, "fetching chute schema");

    let resp = match shared_client()
        .get(&url)
        .headers(bearer_headers(api_key))
        .send()
        .await
    {
        Ok(resp) => resp,
        Err(err) => {
            warn!(%url, error = %err, "schema fetch failed; using fallback capabilities");
            return None;
        }
    };

    if !resp.status().is_success() {
        warn!(
            %url,
            status = resp.status().as_u16(),
            "schema fetch returned non-success; using fallback capabilities"
        );
        return None;
    }

    let schema: Value = match resp.json().await {
        Ok(value) => value,
        Err(err) => {
            warn!(%url, error = %err, "schema body is not valid JSON; using fallback capabilities");
            return None;
        }
    };

    if schema_is_broken(&schema) {
        warn!(%url, "schema contains templated placeholder paths; discarding");
        return None;
    }

    Some(schema)
}
