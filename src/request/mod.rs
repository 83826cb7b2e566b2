//! Request building: operation + logical parameters → a concrete wire plan.
//!
//! A pure, synchronous function of its inputs. The builder resolves the best
//! endpoint for the requested operation, translates the caller's logical
//! parameter bag into that endpoint's declared wire names, and returns a
//! [`RequestPlan`] for the transport collaborator to POST. It does not
//! validate; missing required fields are the remote server's call to make.

pub mod alias;

use serde_json::{Map, Value};
use tracing::debug;

use crate::types::{
    CapabilityDescriptor, EndpointDescriptor, InferenceOperation, PrimitiveType, RequestPlan,
};

use self::alias::aliases_for;

/// Width/height alignment required by one known video model family. Applied
/// whenever an endpoint takes width/height instead of a resolution string.
const PIXEL_ALIGNMENT: u32 = 64;

/// Build a request plan for `op` against the discovered capability surface.
///
/// Always produces a plan. When no endpoint resolves at all (an entirely
/// empty descriptor), the plan targets the conventional path for the
/// operation and passes the parameter bag through unmodified.
pub fn build_request(
    caps: &CapabilityDescriptor,
    op: InferenceOperation,
    params: &Map<String, Value>,
) -> RequestPlan {
    match resolve_endpoint(caps, op) {
        Some(endpoint) => {
            debug!(operation = %op, path = %endpoint.path, "resolved endpoint");
            RequestPlan {
                endpoint: endpoint.path.clone(),
                body: build_body(endpoint, op, params),
            }
        }
        None => {
            let path = match op {
                InferenceOperation::TextToVideo => "/text2video",
                InferenceOperation::ImageEdit => "/edit",
                _ => "/generate",
            };
            debug!(operation = %op, path, "no endpoint resolved; using last-resort path");
            RequestPlan {
                endpoint: path.to_string(),
                body: params.clone(),
            }
        }
    }
}

/// Endpoint resolution, in priority order: the capability's preferred path,
/// a per-operation heuristic among discovered endpoints, then any endpoint
/// at `/generate`.
fn resolve_endpoint(
    caps: &CapabilityDescriptor,
    op: InferenceOperation,
) -> Option<&EndpointDescriptor> {
    if let Some(path) = caps.preferred_path(op) {
        if let Some(endpoint) = caps.endpoint_at(path) {
            return Some(endpoint);
        }
    }

    let heuristic = caps.endpoints.iter().find(|ep| match op {
        InferenceOperation::TextToVideo => {
            ep.path == "/generate" && ep.has_prompt() && !ep.has_image()
        }
        InferenceOperation::ImageToVideo => ep.path == "/generate" && ep.has_image(),
        InferenceOperation::ImageEdit => ep.path == "/edit" || ep.path == "/v1/images/edits",
        InferenceOperation::VideoToVideo | InferenceOperation::KeyframeInterp => false,
    });
    if heuristic.is_some() {
        return heuristic;
    }

    caps.endpoint_at("/generate")
}

/// Run the transformation pipeline and map the bag onto the endpoint's
/// declared parameters. The result is always a flat key/value body.
fn build_body(
    endpoint: &EndpointDescriptor,
    op: InferenceOperation,
    params: &Map<String, Value>,
) -> Map<String, Value> {
    let mut bag = params.clone();

    decompose_resolution(endpoint, &mut bag);
    compose_size(endpoint, &mut bag);
    if op.is_edit() {
        coerce_image_array(endpoint, &mut bag);
    }

    // Endpoints under /v1/ follow an external standard and reject unknown
    // fields; everything else is provider-custom and permissive.
    let strict = endpoint.path.starts_with("/v1/");

    let mut body = Map::new();
    for (key, value) in bag {
        if endpoint.declares(&key) {
            body.insert(key, value);
            continue;
        }
        if let Some(aliases) = aliases_for(&key) {
            if let Some(wire) = aliases.iter().find(|a| endpoint.declares(a)) {
                body.insert((*wire).to_string(), value);
                continue;
            }
        }
        if strict {
            debug!(parameter = %key, path = %endpoint.path, "dropping unmapped parameter");
        } else {
            body.insert(key, value);
        }
    }
    body
}

/// Split a `"<width>*<height>"` resolution string into aligned width/height
/// when the endpoint takes those instead of a resolution parameter.
fn decompose_resolution(endpoint: &EndpointDescriptor, bag: &mut Map<String, Value>) {
    if endpoint.declares("resolution") {
        return;
    }
    if !(endpoint.declares("width") && endpoint.declares("height")) {
        return;
    }
    let Some(resolution) = bag.get("resolution").and_then(Value::as_str) else {
        return;
    };
    let Some((w, h)) = resolution.split_once('*') else {
        return;
    };
    let (Ok(w), Ok(h)) = (w.trim().parse::<u64>(), h.trim().parse::<u64>()) else {
        return;
    };

    bag.insert("width".to_string(), align(w).into());
    bag.insert("height".to_string(), align(h).into());
    bag.remove("resolution");
}

/// Round to the nearest multiple of [`PIXEL_ALIGNMENT`]. Saturates on
/// absurdly large inputs; malformed caller input must never panic here, the
/// remote server gets to reject it instead.
fn align(v: u64) -> u64 {
    ((v as f64 / PIXEL_ALIGNMENT as f64).round() as u64).saturating_mul(PIXEL_ALIGNMENT as u64)
}

/// Compose `"{width}x{height}"` into a `size` parameter when the endpoint
/// declares one, dropping width/height unless the endpoint also takes them.
fn compose_size(endpoint: &EndpointDescriptor, bag: &mut Map<String, Value>) {
    if !endpoint.declares("size") {
        return;
    }
    let (Some(w), Some(h)) = (bag.get("width"), bag.get("height")) else {
        return;
    };

    let size = format!("{}x{}", scalar_string(w), scalar_string(h));
    bag.insert("size".to_string(), Value::String(size));
    if !endpoint.declares("width") {
        bag.remove("width");
    }
    if !endpoint.declares("height") {
        bag.remove("height");
    }
}

fn scalar_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Edit operations only: wrap a singular `image` into a one-element
/// `image_b64s` array when the endpoint declares the array form and the
/// caller did not already supply it. Video operations pass a pre-built
/// `images` array of keyframe objects instead and are never coerced here.
fn coerce_image_array(endpoint: &EndpointDescriptor, bag: &mut Map<String, Value>) {
    if bag.contains_key("image_b64s") {
        return;
    }
    let declares_array = endpoint
        .parameter("image_b64s")
        .map_or(false, |p| p.kind == PrimitiveType::Array);
    if !declares_array {
        return;
    }
    if let Some(image) = bag.remove("image") {
        bag.insert("image_b64s".to_string(), Value::Array(vec![image]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alignment_rounds_to_nearest_multiple() {
        assert_eq!(align(1280), 1280);
        assert_eq!(align(720), 704); // 11.25 → 11
        assert_eq!(align(736), 768); // 11.5 rounds away from zero
    }

    #[test]
    fn alignment_saturates_instead_of_overflowing() {
        assert_eq!(align(u32::MAX as u64), 4_294_967_296);
        assert_eq!(align(u64::MAX), u64::MAX);
    }

    #[test]
    fn scalar_string_unquotes() {
        assert_eq!(scalar_string(&Value::from(1280)), "1280");
        assert_eq!(scalar_string(&Value::from("720")), "720");
    }
}
