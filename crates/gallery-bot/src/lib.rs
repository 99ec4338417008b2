//! Telegram bot for a media gallery: slash commands for browsing and
//! curating images, plus free-text lookup of tags.

pub mod commands;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod format;
pub mod parser;
pub mod services;
pub mod webhook;

pub use dispatcher::{DispatchOutcome, DispatchSettings, Dispatcher};
pub use error::{AppError, AppResult};
pub use services::BotServices;
