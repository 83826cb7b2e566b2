//! Core data model: endpoint descriptors, capability surfaces, request plans.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ChuteKitError;

/// Primitive parameter types a chute schema can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

impl PrimitiveType {
    /// Map an OpenAPI `type` string; anything unrecognized is treated as a string.
    pub fn from_schema_type(s: &str) -> Self {
        match s {
            "integer" => Self::Integer,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "array" => Self::Array,
            "object" => Self::Object,
            _ => Self::String,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

/// One declared request-body parameter on a chute endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointParameter {
    pub name: String,
    pub required: bool,
    #[serde(rename = "type")]
    pub kind: PrimitiveType,
}

impl EndpointParameter {
    pub fn new(name: impl Into<String>, required: bool, kind: PrimitiveType) -> Self {
        Self {
            name: name.into(),
            required,
            kind,
        }
    }

    /// Optional parameter shorthand; the common case in chute schemas.
    pub fn optional(name: impl Into<String>, kind: PrimitiveType) -> Self {
        Self::new(name, false, kind)
    }
}

/// HTTP methods that count as inference operations. GET and the rest are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Post,
    Put,
}

impl HttpMethod {
    /// Parse a schema method key (lowercased in OpenAPI documents).
    pub fn from_schema_key(s: &str) -> Option<Self> {
        match s {
            "post" => Some(Self::Post),
            "put" => Some(Self::Put),
            _ => None,
        }
    }
}

/// One discovered operation surface on a remote chute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    pub path: String,
    pub method: HttpMethod,
    /// Declared body parameters; names are unique within one descriptor.
    pub parameters: Vec<EndpointParameter>,
}

impl EndpointDescriptor {
    pub fn new(path: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            path: path.into(),
            method,
            parameters: Vec::new(),
        }
    }

    /// Look up a declared parameter by exact wire name.
    pub fn parameter(&self, name: &str) -> Option<&EndpointParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Whether the endpoint declares `name` at all.
    pub fn declares(&self, name: &str) -> bool {
        self.parameter(name).is_some()
    }

    /// Prompt-like parameter present (`prompt` or `text`).
    pub fn has_prompt(&self) -> bool {
        self.declares("prompt") || self.declares("text")
    }

    /// Image-like parameter present (`image`, `image_b64`, or `image_url`).
    pub fn has_image(&self) -> bool {
        self.declares("image") || self.declares("image_b64") || self.declares("image_url")
    }
}

/// The full inferred capability surface of one chute.
///
/// Invariant: a `supports_*` flag being true means either the matching
/// preferred-path field is set or an endpoint matching that capability's
/// detection rule exists in `endpoints`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapabilityDescriptor {
    pub endpoints: Vec<EndpointDescriptor>,

    pub supports_text_to_video: bool,
    pub supports_image_to_video: bool,
    pub supports_image_edit: bool,
    pub supports_video_to_video: bool,
    pub supports_keyframe_interp: bool,

    pub text_to_video_path: Option<String>,
    pub image_to_video_path: Option<String>,
    pub image_edit_path: Option<String>,
    pub video_to_video_path: Option<String>,
    pub keyframe_interp_path: Option<String>,
}

impl CapabilityDescriptor {
    /// Find a discovered endpoint by exact path.
    pub fn endpoint_at(&self, path: &str) -> Option<&EndpointDescriptor> {
        self.endpoints.iter().find(|e| e.path == path)
    }

    /// Preferred path recorded for an operation, if discovery set one.
    pub fn preferred_path(&self, op: InferenceOperation) -> Option<&str> {
        match op {
            InferenceOperation::TextToVideo => self.text_to_video_path.as_deref(),
            InferenceOperation::ImageToVideo => self.image_to_video_path.as_deref(),
            InferenceOperation::ImageEdit => self.image_edit_path.as_deref(),
            InferenceOperation::VideoToVideo => self.video_to_video_path.as_deref(),
            InferenceOperation::KeyframeInterp => self.keyframe_interp_path.as_deref(),
        }
    }
}

/// The request builder's output: a target path and a flat JSON body.
///
/// The transport collaborator is expected to POST this to
/// `{chute_base_url}{endpoint}` with the bearer credential; issuing the
/// inference call itself is outside this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestPlan {
    pub endpoint: String,
    pub body: Map<String, Value>,
}

/// High-level inference operations a chute may support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferenceOperation {
    TextToVideo,
    ImageToVideo,
    ImageEdit,
    VideoToVideo,
    KeyframeInterp,
}

impl InferenceOperation {
    /// Logical operation name as callers pass it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextToVideo => "text2video",
            Self::ImageToVideo => "image2video",
            Self::ImageEdit => "edit",
            Self::VideoToVideo => "video2video",
            Self::KeyframeInterp => "keyframe",
        }
    }

    /// Whether this is an edit-style operation (image-array coercion applies).
    pub fn is_edit(&self) -> bool {
        matches!(self, Self::ImageEdit)
    }
}

impl FromStr for InferenceOperation {
    type Err = ChuteKitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text2video" => Ok(Self::TextToVideo),
            "image2video" => Ok(Self::ImageToVideo),
            "edit" | "image_edit" => Ok(Self::ImageEdit),
            "video2video" => Ok(Self::VideoToVideo),
            "keyframe" => Ok(Self::KeyframeInterp),
            other => Err(ChuteKitError::InvalidArgument(format!(
                "Unknown inference operation '{other}': expected text2video, image2video, edit, video2video, or keyframe"
            ))),
        }
    }
}

impl fmt::Display for InferenceOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_parse_aliases() {
        assert_eq!(
            "edit".parse::<InferenceOperation>().unwrap(),
            InferenceOperation::ImageEdit
        );
        assert_eq!(
            "image_edit".parse::<InferenceOperation>().unwrap(),
            InferenceOperation::ImageEdit
        );
        assert!("text-to-video".parse::<InferenceOperation>().is_err());
    }

    #[test]
    fn endpoint_prompt_and_image_detection() {
        let mut ep = EndpointDescriptor::new("/generate", HttpMethod::Post);
        ep.parameters
            .push(EndpointParameter::optional("text", PrimitiveType::String));
        assert!(ep.has_prompt());
        assert!(!ep.has_image());

        ep.parameters
            .push(EndpointParameter::optional("image_url", PrimitiveType::String));
        assert!(ep.has_image());
    }

    #[test]
    fn primitive_type_from_unknown_falls_back_to_string() {
        assert_eq!(
            PrimitiveType::from_schema_type("binary"),
            PrimitiveType::String
        );
        assert_eq!(PrimitiveType::from_schema_type("array"), PrimitiveType::Array);
    }
}
