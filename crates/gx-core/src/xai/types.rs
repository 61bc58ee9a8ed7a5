//! xAI API wire types
//!
//! The chat endpoint speaks the OpenAI-compatible completions shape; the
//! image and video endpoints use the generations shape. Optional request
//! fields are omitted from the payload when unset.

use serde::{Deserialize, Serialize};

use crate::tools::ToolSpec;

/// Image media types accepted as chat attachments
pub const SUPPORTED_IMAGE_TYPES: [&str; 4] =
    ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Whether an attachment content type can be forwarded to the model
pub fn is_supported_image(content_type: &str) -> bool {
    SUPPORTED_IMAGE_TYPES.contains(&content_type)
}

/// Message author role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One content block inside a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    pub fn image_url(url: impl Into<String>) -> Self {
        ContentPart::ImageUrl {
            image_url: ImageUrl { url: url.into() },
        }
    }
}

/// Image reference for multimodal input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// Message in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: Vec<ContentPart>,
}

impl ChatMessage {
    /// Create a system message
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: vec![ContentPart::text(text)],
        }
    }

    /// Create a user message with text only
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentPart::text(text)],
        }
    }

    /// Create a user message from prepared content parts
    pub fn user(content: Vec<ContentPart>) -> Self {
        Self {
            role: Role::User,
            content,
        }
    }

    /// Create an assistant message with text
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: vec![ContentPart::text(text)],
        }
    }

    /// Concatenated text content of the message
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Check if the message carries image references
    pub fn has_images(&self) -> bool {
        self.content
            .iter()
            .any(|part| matches!(part, ContentPart::ImageUrl { .. }))
    }
}

/// Chat completions request
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_effort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolSpec>>,
}

/// Chat completions response
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub id: String,
    #[serde(default)]
    pub model: Option<String>,
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatResponse {
    /// Text of the first choice, if any was returned
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .filter(|text| !text.is_empty())
    }

    /// Reasoning trace of the first choice, if the model produced one
    pub fn reasoning(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.reasoning_content.as_deref())
            .filter(|text| !text.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub index: u32,
    pub message: AssistantReply,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantReply {
    pub role: Role,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub reasoning_content: Option<String>,
}

/// Token usage information
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// Image generations request
#[derive(Debug, Clone, Serialize)]
pub struct ImageRequest {
    pub model: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
}

/// Image generations response
#[derive(Debug, Clone, Deserialize)]
pub struct ImageResponse {
    pub data: Vec<GeneratedImage>,
}

/// One generated image, delivered as a URL or inline base64
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneratedImage {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub b64_json: Option<String>,
    #[serde(default)]
    pub revised_prompt: Option<String>,
}

impl GeneratedImage {
    /// Decode the inline base64 payload, if present
    pub fn decode_b64(&self) -> Option<Vec<u8>> {
        use base64::Engine;
        let data = self.b64_json.as_deref()?;
        base64::engine::general_purpose::STANDARD.decode(data).ok()
    }
}

/// Video generations request
#[derive(Debug, Clone, Serialize)]
pub struct VideoRequest {
    pub model: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
}

/// Acknowledgement for a queued video job
#[derive(Debug, Clone, Deserialize)]
pub struct VideoJob {
    pub request_id: String,
}

/// Polled state of a video job
#[derive(Debug, Clone, Deserialize)]
pub struct VideoStatus {
    pub status: VideoJobState,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoJobState {
    Queued,
    Processing,
    Done,
    Failed,
    #[serde(other)]
    Unknown,
}

/// Completed video generation result
#[derive(Debug, Clone)]
pub struct GeneratedVideo {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_image_types() {
        assert!(is_supported_image("image/png"));
        assert!(is_supported_image("image/webp"));
        assert!(!is_supported_image("image/tiff"));
        assert!(!is_supported_image("text/plain"));
    }

    #[test]
    fn test_message_constructors() {
        let msg = ChatMessage::user_text("hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.text_content(), "hello");
        assert!(!msg.has_images());

        let msg = ChatMessage::user(vec![
            ContentPart::text("look at this"),
            ContentPart::image_url("https://example.com/cat.png"),
        ]);
        assert!(msg.has_images());
        assert_eq!(msg.text_content(), "look at this");
    }

    #[test]
    fn test_content_part_serialization() {
        let part = ContentPart::text("hi");
        let json = serde_json::to_string(&part).unwrap();
        assert_eq!(json, r#"{"type":"text","text":"hi"}"#);

        let part = ContentPart::image_url("https://example.com/a.png");
        let json = serde_json::to_string(&part).unwrap();
        assert_eq!(
            json,
            r#"{"type":"image_url","image_url":{"url":"https://example.com/a.png"}}"#
        );
    }

    #[test]
    fn test_request_omits_unset_knobs() {
        let request = ChatRequest {
            model: "grok-3".to_string(),
            messages: vec![ChatMessage::user_text("hi")],
            max_tokens: Some(256),
            temperature: None,
            top_p: None,
            frequency_penalty: None,
            presence_penalty: None,
            reasoning_effort: None,
            tools: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""max_tokens":256"#));
        assert!(!json.contains("temperature"));
        assert!(!json.contains("top_p"));
        assert!(!json.contains("reasoning_effort"));
        assert!(!json.contains("tools"));
    }

    #[test]
    fn test_response_accessors() {
        let body = r#"{
            "id": "resp-1",
            "model": "grok-3",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": "The answer is 4.",
                    "reasoning_content": "2 + 2 = 4"
                },
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 12, "completion_tokens": 7, "total_tokens": 19}
        }"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.text(), Some("The answer is 4."));
        assert_eq!(response.reasoning(), Some("2 + 2 = 4"));
    }

    #[test]
    fn test_response_empty_content() {
        let body = r#"{
            "id": "resp-2",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": ""}}]
        }"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.text(), None);
        assert_eq!(response.reasoning(), None);
    }

    #[test]
    fn test_generated_image_decode() {
        let image = GeneratedImage {
            b64_json: Some("dGVzdA==".to_string()),
            ..Default::default()
        };
        assert_eq!(image.decode_b64().unwrap(), b"test");

        let image = GeneratedImage::default();
        assert!(image.decode_b64().is_none());
    }

    #[test]
    fn test_video_state_deserialization() {
        let status: VideoStatus =
            serde_json::from_str(r#"{"status": "done", "url": "https://example.com/v.mp4"}"#)
                .unwrap();
        assert_eq!(status.status, VideoJobState::Done);

        let status: VideoStatus = serde_json::from_str(r#"{"status": "rendering"}"#).unwrap();
        assert_eq!(status.status, VideoJobState::Unknown);
    }
}
