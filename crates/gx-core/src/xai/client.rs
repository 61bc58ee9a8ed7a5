//! xAI API HTTP client

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};

use super::types::*;

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.x.ai/v1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Interval between video job polls
const VIDEO_POLL_INTERVAL: Duration = Duration::from_secs(5);
/// Overall deadline for a video job
const VIDEO_POLL_TIMEOUT: Duration = Duration::from_secs(600);

/// xAI API client
#[derive(Clone)]
pub struct XaiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl XaiClient {
    /// Create a new client from configuration
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(Error::Http)?;

        let base_url = config
            .xai
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            client,
            api_key: config.xai.api_key.clone(),
            base_url,
        })
    }

    /// Create with a custom base URL (for testing or custom endpoints)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into(),
        })
    }

    /// Send a chat completions request
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let response: ChatResponse = self.post_json("/chat/completions", request).await?;

        info!(
            "xAI chat response: id={}, finish_reason={:?}, completion_tokens={}",
            response.id,
            response
                .choices
                .first()
                .and_then(|choice| choice.finish_reason.as_deref()),
            response
                .usage
                .map(|usage| usage.completion_tokens)
                .unwrap_or(0)
        );

        Ok(response)
    }

    /// Generate an image and return the first result
    pub async fn generate_image(&self, request: &ImageRequest) -> Result<GeneratedImage> {
        let response: ImageResponse = self.post_json("/images/generations", request).await?;

        response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| Error::Provider("no image data returned from the API".to_string()))
    }

    /// Generate a video, polling the job until it completes.
    ///
    /// Video generation is deferred on the provider side: the initial
    /// request only queues a job. The job is polled until it reports done
    /// or failed, bounded by an overall deadline.
    pub async fn generate_video(&self, request: &VideoRequest) -> Result<GeneratedVideo> {
        let job: VideoJob = self.post_json("/videos/generations", request).await?;
        info!("xAI video job queued: request_id={}", job.request_id);

        let deadline = tokio::time::Instant::now() + VIDEO_POLL_TIMEOUT;
        loop {
            tokio::time::sleep(VIDEO_POLL_INTERVAL).await;
            if tokio::time::Instant::now() >= deadline {
                return Err(Error::VideoTimeout(VIDEO_POLL_TIMEOUT.as_secs()));
            }

            let status: VideoStatus = self
                .get_json(&format!("/videos/generations/{}", job.request_id))
                .await?;

            match status.status {
                VideoJobState::Done => {
                    return status.url.map(|url| GeneratedVideo { url }).ok_or_else(|| {
                        Error::Provider("no video URL returned from the API".to_string())
                    });
                }
                VideoJobState::Failed => {
                    return Err(Error::Provider(
                        status
                            .error
                            .unwrap_or_else(|| "video generation failed".to_string()),
                    ));
                }
                state => {
                    debug!("xAI video job {}: {:?}", job.request_id, state);
                }
            }
        }
    }

    /// Download generated media (or any other attachment) as raw bytes
    pub async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await.map_err(Error::Http)?;

        let status = response.status();
        if !status.is_success() {
            warn!("Failed to download {}: HTTP {}", url, status);
            return Err(Error::Api {
                status: status.as_u16(),
                message: format!("failed to download {url}"),
            });
        }

        Ok(response.bytes().await.map_err(Error::Http)?.to_vec())
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Sending request to xAI API: {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(Error::Http)?;

        Self::parse_response(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(Error::Http)?;

        Self::parse_response(response).await
    }

    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await.map_err(Error::Http)?;

        if !status.is_success() {
            warn!("xAI API error: {} - {}", status, body);
            return Err(Error::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| Error::Provider(format!("failed to parse response: {e} - {body}")))
    }
}

/// Extract a readable message from an API error body.
///
/// The API wraps errors as `{"error": {"message": ...}}` or
/// `{"error": "..."}`; anything else is reported verbatim.
fn api_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value
            .get("error")
            .and_then(|error| error.get("message"))
            .and_then(|message| message.as_str())
        {
            return message.to_string();
        }
        if let Some(message) = value.get("error").and_then(|error| error.as_str()) {
            return message.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no error details returned".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message_nested() {
        let body = r#"{"error": {"message": "Invalid API key", "code": "unauthorized"}}"#;
        assert_eq!(api_error_message(body), "Invalid API key");
    }

    #[test]
    fn test_api_error_message_flat() {
        let body = r#"{"error": "model not found"}"#;
        assert_eq!(api_error_message(body), "model not found");
    }

    #[test]
    fn test_api_error_message_opaque() {
        assert_eq!(api_error_message("service unavailable"), "service unavailable");
        assert_eq!(api_error_message("  "), "no error details returned");
    }

    #[test]
    fn test_error_display_includes_status() {
        let error = Error::Api {
            status: 429,
            message: "rate limited".to_string(),
        };
        let text = error.to_string();
        assert!(text.contains("429"));
        assert!(text.contains("rate limited"));
    }
}
