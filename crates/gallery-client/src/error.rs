//! Gallery client errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Authentication failed")]
    Unauthorized,

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GalleryError {
    /// Message suitable for showing to a chat: the gallery's own message when it sent one.
    pub fn user_message(&self) -> String {
        match self {
            GalleryError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
