//! Boundary to the external generative-AI service.
//!
//! The gateway owns the credential precondition protocol and contains every
//! remote failure: callers get a result, an absent result, or one of the
//! few errors in [`GenerationError`] that the UI must react to.

pub mod credentials;
pub mod error;
pub mod gemini;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

pub use error::{CredentialError, GenerationError, ServiceError};

pub const DEFAULT_ANALYSIS_QUERY: &str = "Analyze the current style trends.";
pub const EMPTY_ANALYSIS_TEXT: &str = "Neural analysis complete but returned empty.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationTool {
    #[default]
    Image,
    Video,
    Analysis,
}

impl GenerationTool {
    pub const ALL: [GenerationTool; 3] = [Self::Image, Self::Video, Self::Analysis];

    pub fn label(self) -> &'static str {
        match self {
            Self::Image => "Design",
            Self::Video => "Motion",
            Self::Analysis => "Inspect",
        }
    }

    /// Image and video models are billed and need a selected credential.
    pub fn requires_credential(self) -> bool {
        matches!(self, Self::Image | Self::Video)
    }
}

impl fmt::Display for GenerationTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Analysis => "analysis",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImageSize {
    #[default]
    #[serde(rename = "1K")]
    OneK,
    #[serde(rename = "2K")]
    TwoK,
    #[serde(rename = "4K")]
    FourK,
}

impl ImageSize {
    pub const ALL: [ImageSize; 3] = [Self::OneK, Self::TwoK, Self::FourK];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OneK => "1K",
            Self::TwoK => "2K",
            Self::FourK => "4K",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 2] = [Self::Landscape, Self::Portrait];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Landscape => "16:9",
            Self::Portrait => "9:16",
        }
    }
}

/// Inline media sent along with an analysis request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub mime_type: String,
    /// Base64 payload without the `data:` prefix.
    pub data: String,
}

impl Attachment {
    /// Splits a `data:<mime>;base64,<payload>` URI. Returns `None` when the
    /// URI is not base64 data or the payload does not decode.
    pub fn from_data_uri(uri: &str) -> Option<Self> {
        let rest = uri.strip_prefix("data:")?;
        let (header, payload) = rest.split_once(',')?;
        let mime_type = header.strip_suffix(";base64")?;
        if mime_type.is_empty() || STANDARD.decode(payload).is_err() {
            return None;
        }
        Some(Self {
            mime_type: mime_type.to_string(),
            data: payload.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub tool: GenerationTool,
    pub prompt: String,
    #[serde(default)]
    pub image_size: ImageSize,
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
    #[serde(default)]
    pub attachment: Option<Attachment>,
}

impl GenerationRequest {
    pub fn new(tool: GenerationTool, prompt: impl Into<String>) -> Self {
        Self {
            tool,
            prompt: prompt.into(),
            image_size: ImageSize::default(),
            aspect_ratio: AspectRatio::default(),
            attachment: None,
        }
    }

    /// A fashion consultation over a free-form measurement summary.
    pub fn style_advice(measurements: &str) -> Self {
        Self::new(
            GenerationTool::Analysis,
            format!(
                "Analyze these body measurements: {measurements}. \
                 Provide a high-end fashion consultation. Focus on structural silhouettes and fabric weight."
            ),
        )
    }

    /// Image and video need something to render; analysis falls back to a
    /// default query.
    pub fn is_submittable(&self) -> bool {
        self.tool == GenerationTool::Analysis || !self.prompt.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationResult {
    /// Inline PNG as a `data:` URI.
    Image { data_uri: String },
    /// Fetchable locator of the rendered clip.
    Video { uri: String },
    Text { text: String },
}

impl GenerationResult {
    pub fn summary(&self) -> String {
        match self {
            Self::Image { data_uri } => format!("image ({} bytes inline)", data_uri.len()),
            Self::Video { uri } => {
                let locator = uri.split_once('?').map_or(uri.as_str(), |(base, _)| base);
                format!("video at {locator}")
            }
            Self::Text { text } => format!("text ({} chars)", text.chars().count()),
        }
    }
}

/// The external generative-AI capability.
#[async_trait]
pub trait GenerativeService: Send + Sync {
    /// Returns a `data:image/png;base64,...` URI.
    async fn generate_image(&self, prompt: &str, size: ImageSize) -> Result<String, ServiceError>;

    /// Returns a fetchable locator for the finished clip.
    async fn generate_video(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<String, ServiceError>;

    async fn analyze(
        &self,
        query: &str,
        attachment: Option<&Attachment>,
    ) -> Result<String, ServiceError>;
}

/// The external credential-selection step.
#[async_trait]
pub trait CredentialSelector: Send + Sync {
    async fn has_credential(&self) -> bool;

    async fn select_credential(&self) -> Result<(), CredentialError>;

    /// Runs selection again after the service rejected the current key.
    async fn reselect_credential(&self) -> Result<(), CredentialError> {
        self.select_credential().await
    }
}

#[derive(Clone)]
pub struct GenerationGateway {
    service: Arc<dyn GenerativeService>,
    credentials: Arc<dyn CredentialSelector>,
}

impl GenerationGateway {
    pub fn new(
        service: Arc<dyn GenerativeService>,
        credentials: Arc<dyn CredentialSelector>,
    ) -> Self {
        Self {
            service,
            credentials,
        }
    }

    /// Runs one generation request.
    ///
    /// Image and video requests first make sure a credential is selected.
    /// A remote "entity not found" re-triggers credential selection once and
    /// is then returned as an error; any other remote failure is logged and
    /// yields `Ok(None)`.
    #[instrument(skip(self, request), fields(tool = %request.tool))]
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Option<GenerationResult>, GenerationError> {
        if request.tool.requires_credential() && !self.credentials.has_credential().await {
            info!("no credential selected, delegating to credential selection");
            self.credentials.select_credential().await?;
        }

        match self.dispatch(request).await {
            Ok(result) => {
                info!(result = %result.summary(), "generation completed");
                Ok(Some(result))
            }
            Err(ServiceError::EntityNotFound(message)) => {
                warn!(%message, "remote entity not found, re-selecting credential");
                if let Err(err) = self.credentials.reselect_credential().await {
                    warn!(error = %err, "credential re-selection failed");
                }
                Err(GenerationError::EntityNotFound(message))
            }
            Err(err) => {
                error!(error = %err, "generation failed");
                Ok(None)
            }
        }
    }

    async fn dispatch(&self, request: &GenerationRequest) -> Result<GenerationResult, ServiceError> {
        match request.tool {
            GenerationTool::Image => {
                let data_uri = self
                    .service
                    .generate_image(&request.prompt, request.image_size)
                    .await?;
                Ok(GenerationResult::Image { data_uri })
            }
            GenerationTool::Video => {
                let uri = self
                    .service
                    .generate_video(&request.prompt, request.aspect_ratio)
                    .await?;
                Ok(GenerationResult::Video { uri })
            }
            GenerationTool::Analysis => {
                let query = match request.prompt.trim() {
                    "" => DEFAULT_ANALYSIS_QUERY,
                    prompt => prompt,
                };
                let text = self
                    .service
                    .analyze(query, request.attachment.as_ref())
                    .await?;
                let text = if text.trim().is_empty() {
                    EMPTY_ANALYSIS_TEXT.to_string()
                } else {
                    text
                };
                Ok(GenerationResult::Text { text })
            }
        }
    }
}
