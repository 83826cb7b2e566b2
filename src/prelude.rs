//! Convenience re-exports for common use.

pub use crate::config::ChutesConfig;
pub use crate::discovery::{Clock, SchemaCache, SystemClock, SCHEMA_CACHE_TTL};
pub use crate::error::{ChuteKitError, Result};
pub use crate::request::build_request;
pub use crate::types::{
    CapabilityDescriptor, EndpointDescriptor, EndpointParameter, HttpMethod, InferenceOperation,
    PrimitiveType, RequestPlan,
};
