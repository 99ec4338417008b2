//! Where tag vocabularies come from.

use crate::error::TagIndexError;
use crate::types::ChatId;
use async_trait::async_trait;

/// Supplies the full tag vocabulary visible to a chat.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagSource: Send + Sync {
    /// Every tag title in the chat's gallery scope.
    async fn tag_titles(&self, chat_id: ChatId) -> Result<Vec<String>, TagIndexError>;
}
