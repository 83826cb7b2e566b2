//! Capability interpretation: raw chute schema → [`CapabilityDescriptor`].
//!
//! Interpretation is deliberately permissive. Chute schemas vary per model
//! and are frequently incomplete, so an ambiguous schema should yield too
//! many capabilities rather than too few; the remote server's own validation
//! is the final backstop.

use serde_json::Value;
use tracing::debug;

use crate::types::{
    CapabilityDescriptor, EndpointDescriptor, EndpointParameter, HttpMethod, PrimitiveType,
};

/// Whether a fetched schema is unusable placeholder output.
///
/// Some chutes return a templated document whose path keys are literal
/// placeholders (`{path}` and friends). A partially-templated schema is worse
/// than no schema, so any `{` in a top-level path key condemns the whole
/// document.
pub fn schema_is_broken(schema: &Value) -> bool {
    schema
        .get("paths")
        .and_then(Value::as_object)
        .map(|paths| paths.keys().any(|key| key.contains('{')))
        .unwrap_or(false)
}

/// Interpret a fetched schema (or `None` for a failed/absent fetch) into the
/// chute's capability surface.
pub fn interpret_schema(schema: Option<&Value>) -> CapabilityDescriptor {
    let mut caps = CapabilityDescriptor::default();

    if let Some(paths) = schema.and_then(|s| s.get("paths")).and_then(Value::as_object) {
        // Path iteration follows schema declaration order; capability
        // detection is first-match-wins, so order matters.
        for (path, item) in paths {
            let Some(methods) = item.as_object() else {
                continue;
            };
            for (method_key, operation) in methods {
                let Some(method) = HttpMethod::from_schema_key(method_key) else {
                    continue;
                };
                let mut endpoint = EndpointDescriptor::new(path.clone(), method);
                endpoint.parameters = extract_parameters(operation);
                detect_capabilities(&mut caps, &endpoint);
                caps.endpoints.push(endpoint);
            }
        }
    }

    augment_with_fallback(&mut caps);

    // Optimistic forcing: a false negative blocks the user, a false positive
    // just earns a 404 from the chute itself.
    if !caps.supports_text_to_video && !caps.supports_image_to_video {
        caps.supports_text_to_video = true;
        caps.supports_image_to_video = true;
    }

    if caps.text_to_video_path.is_none() {
        caps.text_to_video_path = Some("/generate".to_string());
    }
    if caps.image_to_video_path.is_none() {
        caps.image_to_video_path = Some("/generate".to_string());
    }
    if caps.image_edit_path.is_none() {
        caps.image_edit_path = Some("/edit".to_string());
    }

    caps
}

/// Extract the declared body parameters for one (path, method) operation.
///
/// Parameters normally live at
/// `requestBody.content["application/json"].schema.properties` with the
/// sibling `required` array. A top-level `input_args` object property is a
/// provider wrapper convention; its nested properties are flattened into the
/// list so the flat-body convention holds end to end.
fn extract_parameters(operation: &Value) -> Vec<EndpointParameter> {
    let Some(body_schema) = operation
        .get("requestBody")
        .and_then(|b| b.get("content"))
        .and_then(|c| c.get("application/json"))
        .and_then(|j| j.get("schema"))
    else {
        return Vec::new();
    };

    let mut params = Vec::new();
    collect_properties(body_schema, &mut params, true);
    params
}

fn collect_properties(schema: &Value, params: &mut Vec<EndpointParameter>, unwrap_input_args: bool) {
    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return;
    };
    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|r| r.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    for (name, prop) in properties {
        if unwrap_input_args
            && name == "input_args"
            && prop.get("properties").map_or(false, Value::is_object)
        {
            collect_properties(prop, params, false);
            continue;
        }
        if params.iter().any(|p| p.name == *name) {
            continue; // names are unique within one descriptor
        }
        let kind = prop
            .get("type")
            .and_then(Value::as_str)
            .map(PrimitiveType::from_schema_type)
            .unwrap_or(PrimitiveType::String);
        params.push(EndpointParameter::new(
            name.clone(),
            required.contains(&name.as_str()),
            kind,
        ));
    }
}

/// Apply the per-endpoint capability detection rules. Flags accumulate;
/// preferred paths are first-match-wins and never overwritten.
fn detect_capabilities(caps: &mut CapabilityDescriptor, endpoint: &EndpointDescriptor) {
    let path = endpoint.path.as_str();
    let has_prompt = endpoint.has_prompt();
    let has_image = endpoint.has_image();

    if path == "/text2video" || (has_prompt && !has_image) {
        caps.supports_text_to_video = true;
        if caps.text_to_video_path.is_none() {
            caps.text_to_video_path = Some(path.to_string());
        }
    }

    if path == "/image2video" || (has_prompt && has_image) {
        caps.supports_image_to_video = true;
        if caps.image_to_video_path.is_none() {
            caps.image_to_video_path = Some(path.to_string());
        }
    }

    let declares_image_array = endpoint
        .parameter("image_b64s")
        .map_or(false, |p| p.kind == PrimitiveType::Array);
    if path == "/edit"
        || path == "/v1/images/edits"
        || (path.contains("edit") && has_prompt && has_image)
        || (path == "/generate" && has_prompt && declares_image_array)
    {
        caps.supports_image_edit = true;
        if caps.image_edit_path.is_none() {
            caps.image_edit_path = Some(path.to_string());
        }
    }

    if path.contains("video2video") {
        caps.supports_video_to_video = true;
        if caps.video_to_video_path.is_none() {
            caps.video_to_video_path = Some(path.to_string());
        }
    }

    if path.contains("keyframe") || path.contains("interpolate") {
        caps.supports_keyframe_interp = true;
        if caps.keyframe_interp_path.is_none() {
            caps.keyframe_interp_path = Some(path.to_string());
        }
    }
}

/// Paths we recognize as inference-style; anything else is a health check,
/// warm-up hook, or similar.
fn is_known_inference_path(path: &str) -> bool {
    matches!(path, "/generate" | "/text2video" | "/image2video" | "/edit")
        || path.starts_with("/v1/")
}

/// Append the synthetic fallback endpoints when discovery found nothing
/// usable: no endpoints at all, or none on a known inference-style path.
fn augment_with_fallback(caps: &mut CapabilityDescriptor) {
    let usable = caps
        .endpoints
        .iter()
        .any(|e| is_known_inference_path(&e.path));
    if !caps.endpoints.is_empty() && usable {
        return;
    }

    debug!("no usable endpoints discovered; appending synthetic fallback set");
    caps.endpoints.extend(fallback_endpoints());

    // The synthetic /generate descriptor carries image_b64s, so edit support
    // rides along with the fallback.
    caps.supports_image_edit = true;
    if caps.image_edit_path.is_none() {
        caps.image_edit_path = Some("/generate".to_string());
    }
}

/// Synthetic descriptors modeling the union of parameters seen across known
/// chute families. All parameters are optional; the remote server decides
/// what it actually requires.
fn fallback_endpoints() -> Vec<EndpointDescriptor> {
    use PrimitiveType::{Array, Boolean, Integer, Number, String as Str};

    let generate = [
        ("prompt", Str),
        ("negative_prompt", Str),
        ("image", Str),
        ("image_b64", Str),
        ("image_b64s", Array),
        ("image_url", Str),
        ("video", Str),
        ("video_b64", Str),
        ("images", Array),
        ("width", Integer),
        ("height", Integer),
        ("resolution", Str),
        ("frames", Integer),
        ("fps", Integer),
        ("steps", Integer),
        ("guidance_scale", Number),
        ("seed", Integer),
        ("distilled", Boolean),
    ];
    let text2video = [
        ("prompt", Str),
        ("negative_prompt", Str),
        ("resolution", Str),
        ("width", Integer),
        ("height", Integer),
        ("frames", Integer),
        ("fps", Integer),
        ("steps", Integer),
        ("guidance_scale", Number),
        ("seed", Integer),
    ];
    let image2video = [
        ("prompt", Str),
        ("negative_prompt", Str),
        ("image", Str),
        ("image_b64", Str),
        ("image_url", Str),
        ("resolution", Str),
        ("width", Integer),
        ("height", Integer),
        ("frames", Integer),
        ("fps", Integer),
        ("steps", Integer),
        ("guidance_scale", Number),
        ("seed", Integer),
    ];

    let build = |path: &str, fields: &[(&str, PrimitiveType)]| {
        let mut ep = EndpointDescriptor::new(path, HttpMethod::Post);
        ep.parameters = fields
            .iter()
            .map(|(name, kind)| EndpointParameter::optional(*name, *kind))
            .collect();
        ep
    };

    vec![
        build("/generate", &generate),
        build("/text2video", &text2video),
        build("/image2video", &image2video),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn broken_schema_detection() {
        let broken = json!({ "paths": { "{path}": {} } });
        assert!(schema_is_broken(&broken));

        let templated = json!({ "paths": { "/items/{id}": {} } });
        assert!(schema_is_broken(&templated));

        let ok = json!({ "paths": { "/generate": {} } });
        assert!(!schema_is_broken(&ok));

        assert!(!schema_is_broken(&json!({})));
    }

    #[test]
    fn input_args_wrapper_is_flattened() {
        let schema = json!({
            "paths": {
                "/generate": {
                    "post": {
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "properties": {
                                            "input_args": {
                                                "type": "object",
                                                "properties": {
                                                    "prompt": { "type": "string" },
                                                    "steps": { "type": "integer" }
                                                },
                                                "required": ["prompt"]
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        });

        let caps = interpret_schema(Some(&schema));
        let ep = caps.endpoint_at("/generate").unwrap();
        assert!(ep.parameter("prompt").unwrap().required);
        assert!(!ep.parameter("steps").unwrap().required);
        assert!(!ep.declares("input_args"));
    }

    #[test]
    fn get_methods_are_ignored() {
        let schema = json!({
            "paths": {
                "/health": { "get": {} },
                "/generate": { "post": {} }
            }
        });
        let caps = interpret_schema(Some(&schema));
        assert_eq!(caps.endpoints.len(), 1);
        assert_eq!(caps.endpoints[0].path, "/generate");
    }
}
