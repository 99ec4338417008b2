//! Tag index errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TagIndexError {
    #[error("Tag source unavailable: {0}")]
    Source(String),
}
