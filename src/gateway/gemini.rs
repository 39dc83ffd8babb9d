//! Generative Language REST client.
//!
//! Text and image generation go through `generateContent`; video uses the
//! long-running `predictLongRunning` operation, polled until done.

use crate::config::ModelConfig;
use crate::gateway::credentials::CredentialStore;
use crate::gateway::error::ApiErrorResponse;
use crate::gateway::{AspectRatio, Attachment, GenerativeService, ImageSize, ServiceError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::time::{self, Duration};
use tracing::{debug, instrument};

pub const VIDEO_POLL_INTERVAL: Duration = Duration::from_secs(10);
const THINKING_BUDGET: u32 = 32_768;
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: Value,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    text: Option<String>,
    inline_data: Option<InlineData>,
}

impl GenerateContentResponse {
    fn parts(&self) -> impl Iterator<Item = &ResponsePart> {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .into_iter()
            .flat_map(|content| content.parts.iter())
    }

    fn text(&self) -> String {
        self.parts()
            .filter_map(|part| part.text.as_deref())
            .collect::<Vec<_>>()
            .join("")
    }

    fn first_image(&self) -> Option<&InlineData> {
        self.parts().find_map(|part| part.inline_data.as_ref())
    }
}

#[derive(Debug, Deserialize)]
struct Operation {
    name: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    response: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

impl Operation {
    fn video_uri(&self) -> Option<&str> {
        let response = self.response.as_ref()?;
        response
            .pointer("/generateVideoResponse/generatedSamples/0/video/uri")
            .or_else(|| response.pointer("/generatedVideos/0/video/uri"))
            .and_then(Value::as_str)
    }
}

pub struct GeminiService {
    client: reqwest::Client,
    models: ModelConfig,
    credentials: Arc<CredentialStore>,
    poll_interval: Duration,
}

impl GeminiService {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(models: ModelConfig, credentials: Arc<CredentialStore>) -> Result<Self, ServiceError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            models,
            credentials,
            poll_interval: VIDEO_POLL_INTERVAL,
        })
    }

    fn api_key(&self) -> Result<SecretString, ServiceError> {
        self.credentials.current().ok_or(ServiceError::MissingCredential)
    }

    fn model_url(&self, model: &str, method: &str) -> String {
        format!("{}/models/{model}:{method}", self.models.api_base)
    }

    async fn post(&self, url: &str, body: &impl Serialize) -> Result<reqwest::Response, ServiceError> {
        let key = self.api_key()?;
        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, key.expose_secret())
            .json(body)
            .send()
            .await?;
        check_status(response).await
    }

    async fn generate_content(
        &self,
        model: &str,
        parts: Vec<Part>,
        generation_config: Value,
    ) -> Result<GenerateContentResponse, ServiceError> {
        let request = GenerateContentRequest {
            contents: vec![Content { parts }],
            generation_config,
        };
        let response = self
            .post(&self.model_url(model, "generateContent"), &request)
            .await?;
        Ok(response.json().await?)
    }

    async fn poll_operation(&self, name: &str) -> Result<Operation, ServiceError> {
        let key = self.api_key()?;
        let url = format!("{}/{name}", self.models.api_base);
        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, key.expose_secret())
            .send()
            .await?;
        Ok(check_status(response).await?.json().await?)
    }
}

#[async_trait]
impl GenerativeService for GeminiService {
    #[instrument(skip(self, prompt), fields(model = %self.models.image_model, size = size.as_str()))]
    async fn generate_image(&self, prompt: &str, size: ImageSize) -> Result<String, ServiceError> {
        let response = self
            .generate_content(
                &self.models.image_model,
                vec![text_part(prompt)],
                json!({
                    "imageConfig": {
                        "aspectRatio": "1:1",
                        "imageSize": size.as_str(),
                    }
                }),
            )
            .await?;

        let image = response
            .first_image()
            .ok_or_else(|| ServiceError::Unexpected("response contained no image".to_string()))?;
        Ok(format!("data:image/png;base64,{}", image.data))
    }

    #[instrument(skip(self, prompt), fields(model = %self.models.video_model, aspect_ratio = aspect_ratio.as_str()))]
    async fn generate_video(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<String, ServiceError> {
        let body = json!({
            "instances": [{ "prompt": prompt }],
            "parameters": {
                "numberOfVideos": 1,
                "resolution": "720p",
                "aspectRatio": aspect_ratio.as_str(),
            }
        });
        let mut operation: Operation = self
            .post(&self.model_url(&self.models.video_model, "predictLongRunning"), &body)
            .await?
            .json()
            .await?;

        while !operation.done {
            debug!(operation = %operation.name, "video not ready, polling again");
            time::sleep(self.poll_interval).await;
            operation = self.poll_operation(&operation.name).await?;
        }

        if let Some(error) = &operation.error {
            return Err(ServiceError::Unexpected(format!("video operation failed: {error}")));
        }
        let uri = operation
            .video_uri()
            .ok_or_else(|| ServiceError::Unexpected("operation returned no video".to_string()))?;

        // The download link only serves the clip when the key is attached.
        let key = self.api_key()?;
        let separator = if uri.contains('?') { '&' } else { '?' };
        Ok(format!("{uri}{separator}key={}", key.expose_secret()))
    }

    #[instrument(skip(self, query, attachment), fields(model = %self.models.text_model))]
    async fn analyze(
        &self,
        query: &str,
        attachment: Option<&Attachment>,
    ) -> Result<String, ServiceError> {
        let mut parts = Vec::new();
        if let Some(attachment) = attachment {
            parts.push(Part {
                text: None,
                inline_data: Some(InlineData {
                    mime_type: attachment.mime_type.clone(),
                    data: attachment.data.clone(),
                }),
            });
        }
        parts.push(text_part(query));

        let response = self
            .generate_content(
                &self.models.text_model,
                parts,
                json!({
                    "thinkingConfig": { "thinkingBudget": THINKING_BUDGET },
                    "temperature": 0.7,
                }),
            )
            .await?;
        Ok(response.text())
    }
}

fn text_part(text: &str) -> Part {
    Part {
        text: Some(text.to_string()),
        inline_data: None,
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorResponse>(&body)
        .map(|parsed| parsed.error.message)
        .unwrap_or(body);
    Err(classify_failure(status.as_u16(), message))
}

fn classify_failure(status: u16, message: String) -> ServiceError {
    if status == 404 || message.contains("Requested entity was not found") {
        ServiceError::EntityNotFound(message)
    } else {
        ServiceError::Api { status, message }
    }
}
