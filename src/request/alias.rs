//! Static parameter alias table.
//!
//! Chutes expose per-model parameter names with no canonical schema across
//! models. Each entry maps a canonical logical name to the wire names to try
//! against a target endpoint's declared parameters, in priority order.
//! The table is constant for the process lifetime.

/// Canonical logical name → ordered wire-name candidates.
///
/// `image_b64s` deliberately has no alternatives: once a caller (or the
/// builder's coercion step) has committed to the array form, it must never
/// silently revert to a singular `image`.
pub const PARAMETER_ALIASES: &[(&str, &[&str])] = &[
    ("prompt", &["prompt", "text", "description"]),
    ("image", &["image", "image_b64", "image_url", "input_image"]),
    ("image_b64s", &["image_b64s"]),
    ("resolution", &["resolution", "size", "dimensions"]),
    ("steps", &["steps", "num_inference_steps", "sampling_steps"]),
    ("fps", &["fps", "frame_rate", "frames_per_second"]),
    ("frames", &["frames", "num_frames", "frame_num"]),
    ("seed", &["seed", "random_seed"]),
    ("n", &["n", "num_images", "num_outputs"]),
    ("response_format", &["response_format", "format", "output_format"]),
    (
        "guidance_scale",
        &["cfg_guidance_scale", "guidance_scale", "true_cfg_scale", "cfg_scale"],
    ),
    ("negative_prompt", &["negative_prompt", "neg_prompt"]),
];

/// Wire-name candidates for a canonical logical name, if the table knows it.
pub fn aliases_for(canonical: &str) -> Option<&'static [&'static str]> {
    PARAMETER_ALIASES
        .iter()
        .find(|(name, _)| *name == canonical)
        .map(|(_, aliases)| *aliases)
}
