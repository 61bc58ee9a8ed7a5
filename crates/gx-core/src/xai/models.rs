//! Grok model catalog
//!
//! Mirrors the model ids currently served by the xAI API. The Discord
//! layer builds its option choices from the same ids.

/// All available Grok language models
pub const CHAT_MODELS: [&str; 9] = [
    "grok-4-1-fast-reasoning",
    "grok-4-1-fast-non-reasoning",
    "grok-code-fast-1",
    "grok-4-fast-reasoning",
    "grok-4-fast-non-reasoning",
    "grok-4-0709",
    "grok-3-mini",
    "grok-3",
    "grok-2-vision-1212",
];

/// Image generation models
pub const IMAGE_MODELS: [&str; 3] = [
    "grok-imagine-image-pro",
    "grok-imagine-image",
    "grok-2-image-1212",
];

/// Video generation model
pub const VIDEO_MODEL: &str = "grok-imagine-video";

/// Models that accept the `reasoning_effort` request knob
pub const REASONING_MODELS: [&str; 3] = [
    "grok-4-1-fast-reasoning",
    "grok-4-fast-reasoning",
    "grok-3-mini",
];

pub const DEFAULT_CHAT_MODEL: &str = "grok-4-1-fast-reasoning";
pub const DEFAULT_IMAGE_MODEL: &str = "grok-imagine-image";

/// Whether `reasoning_effort` should be sent for this model
pub fn is_reasoning_model(model: &str) -> bool {
    REASONING_MODELS.contains(&model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reasoning_models_are_chat_models() {
        for model in REASONING_MODELS {
            assert!(CHAT_MODELS.contains(&model));
        }
    }

    #[test]
    fn test_is_reasoning_model() {
        assert!(is_reasoning_model("grok-3-mini"));
        assert!(!is_reasoning_model("grok-3"));
        assert!(!is_reasoning_model("grok-imagine-image"));
    }

    #[test]
    fn test_defaults_are_listed() {
        assert!(CHAT_MODELS.contains(&DEFAULT_CHAT_MODEL));
        assert!(IMAGE_MODELS.contains(&DEFAULT_IMAGE_MODEL));
    }
}
