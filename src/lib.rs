//! chutekit — capability discovery and request normalization for Chutes.
//!
//! Chutes exposes thousands of independently-deployed model endpoints
//! ("chutes") with heterogeneous HTTP APIs: different parameter names,
//! different required fields, no canonical schema across models. This crate
//! discovers what a chute can do from its OpenAPI document (or a fallback
//! when there isn't one) and translates a uniform logical parameter bag into
//! the exact wire shape that chute expects. Sending the inference request is
//! left to the caller.
//!
//! # Quick Start
//!
//! ```no_run
//! use chutekit::prelude::*;
//!
//! # async fn example() {
//! let mut cache = SchemaCache::new();
//! let caps = cache
//!     .discover("https://chutes-wan-video.chutes.ai", "cpk_example")
//!     .await;
//!
//! let mut params = serde_json::Map::new();
//! params.insert("prompt".into(), "a red fox at dawn".into());
//! params.insert("resolution".into(), "1280*720".into());
//!
//! let plan = build_request(&caps, InferenceOperation::TextToVideo, &params);
//! println!("POST {} with {:?}", plan.endpoint, plan.body);
//! # }
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod prelude;
pub mod request;
pub mod types;
