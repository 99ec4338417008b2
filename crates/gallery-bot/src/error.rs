//! Application error types.

use thiserror::Error;

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Telegram error: {0}")]
    Telegram(#[from] telegram_client::TelegramError),

    #[error("Gallery error: {0}")]
    Gallery(#[from] gallery_client::GalleryError),

    #[error("Tag index error: {0}")]
    TagIndex(#[from] tag_index::TagIndexError),

    #[error("{0}")]
    PermissionDenied(String),

    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Reply to an image or file to use this command")]
    MissingAttachment,

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

impl AppError {
    /// Text reported back to the chat the failing update came from.
    pub fn chat_message(&self) -> String {
        match self {
            AppError::Gallery(e) => e.user_message(),
            AppError::Telegram(telegram_client::TelegramError::Api { description, .. }) => {
                description.clone()
            }
            other => other.to_string(),
        }
    }
}

/// Result type alias for application errors.
pub type AppResult<T> = Result<T, AppError>;
