//! Error types for the generation gateway and its collaborators.

use thiserror::Error;

/// Failures reported by a [`super::GenerativeService`].
#[derive(Debug, Error)]
pub enum ServiceError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote service does not know the requested model or resource.
    /// Usually means the selected credential has no access to it.
    #[error("requested entity was not found: {0}")]
    EntityNotFound(String),

    /// No credential was available when the request was built.
    #[error("no API credential configured")]
    MissingCredential,

    /// The service answered with an error status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response did not contain what the request asked for.
    #[error("unexpected response: {0}")]
    Unexpected(String),
}

/// Failures of the credential-selection step.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("credential selection was dismissed")]
    Dismissed,

    #[error("credential selection unavailable: {0}")]
    Unavailable(String),
}

/// Failures the gateway surfaces to its caller. Everything else is logged
/// and reported as an absent result.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("requested entity was not found: {0}")]
    EntityNotFound(String),

    #[error(transparent)]
    Credential(#[from] CredentialError),
}

/// Error body returned by the Generative Language API.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}
