//! Per-chat tag index store with atomic rebuilds.

use crate::error::TagIndexError;
use crate::source::TagSource;
use crate::types::{ChatId, TagIndex};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

/// Index slot for a single chat.
///
/// `generation` is bumped by every invalidation; `built_generation` records
/// the generation that was current when the published index started fetching.
/// The slot is fresh only when both agree.
#[derive(Default)]
struct ChatSlot {
    index: Option<Arc<TagIndex>>,
    generation: u64,
    built_generation: u64,
}

impl ChatSlot {
    fn is_fresh(&self) -> bool {
        self.index.is_some() && self.built_generation == self.generation
    }
}

/// Result of indexing every configured chat at startup.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct InitReport {
    pub indexed: Vec<ChatId>,
    pub failed: Vec<ChatId>,
}

/// In-memory store of one tag index per chat.
///
/// Indexes are immutable once built. A rebuild constructs a complete new
/// index outside the lock and swaps the `Arc` in, so readers always see
/// either the whole old index or the whole new one.
#[derive(Clone, Default)]
pub struct TagIndexStore {
    chats: Arc<RwLock<HashMap<ChatId, ChatSlot>>>,
}

impl TagIndexStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the chat's vocabulary and replace its index.
    ///
    /// On source failure the previous index is left untouched. Returns the
    /// number of entries in the new index.
    #[instrument(skip(self, source))]
    pub async fn rebuild(
        &self,
        chat_id: ChatId,
        source: &dyn TagSource,
    ) -> Result<usize, TagIndexError> {
        let generation = {
            let chats = self.chats.read().await;
            chats.get(&chat_id).map(|s| s.generation).unwrap_or(0)
        };

        let titles = match source.tag_titles(chat_id).await {
            Ok(titles) => titles,
            Err(e) => {
                warn!("Tag index rebuild failed for chat {}: {}", chat_id, e);
                return Err(e);
            }
        };

        let index = Arc::new(TagIndex::from_titles(titles));
        let count = index.len();

        let mut chats = self.chats.write().await;
        let slot = chats.entry(chat_id).or_default();

        // A rebuild that started later already published
        if slot.index.is_some() && generation < slot.built_generation {
            debug!("Discarding outdated tag index for chat {}", chat_id);
            return Ok(count);
        }

        slot.index = Some(index);
        slot.built_generation = generation;
        info!("Indexed {} tags for chat {}", count, chat_id);

        Ok(count)
    }

    /// Mark the chat's index stale so the next fresh lookup rebuilds it.
    pub async fn invalidate(&self, chat_id: ChatId) {
        let mut chats = self.chats.write().await;
        let slot = chats.entry(chat_id).or_default();
        slot.generation += 1;
        debug!("Invalidated tag index for chat {}", chat_id);
    }

    /// Mark every chat's index stale.
    ///
    /// Used when a change can reach the vocabulary of chats other than the
    /// one it came from.
    pub async fn invalidate_all(&self) {
        let mut chats = self.chats.write().await;
        for slot in chats.values_mut() {
            slot.generation += 1;
        }
        debug!("Invalidated tag indexes for {} chats", chats.len());
    }

    /// Whether the chat has no index yet or its index was invalidated.
    pub async fn is_stale(&self, chat_id: ChatId) -> bool {
        let chats = self.chats.read().await;
        !chats.get(&chat_id).is_some_and(ChatSlot::is_fresh)
    }

    /// Current index for the chat, regardless of freshness.
    pub async fn snapshot(&self, chat_id: ChatId) -> Option<Arc<TagIndex>> {
        let chats = self.chats.read().await;
        chats.get(&chat_id).and_then(|s| s.index.clone())
    }

    /// Look up `text` in the chat's current index.
    pub async fn lookup(&self, chat_id: ChatId, text: &str) -> Option<String> {
        let index = self.snapshot(chat_id).await?;
        index.get(text).map(str::to_string)
    }

    /// Look up `text`, rebuilding the chat's index first if it is missing or stale.
    pub async fn lookup_fresh(
        &self,
        chat_id: ChatId,
        text: &str,
        source: &dyn TagSource,
    ) -> Result<Option<String>, TagIndexError> {
        if self.is_stale(chat_id).await {
            self.rebuild(chat_id, source).await?;
        }
        Ok(self.lookup(chat_id, text).await)
    }

    /// Build indexes for every given chat, one at a time.
    ///
    /// A failing chat is recorded and does not stop the others.
    pub async fn initialize(&self, chat_ids: &[ChatId], source: &dyn TagSource) -> InitReport {
        let mut report = InitReport::default();

        for &chat_id in chat_ids {
            match self.rebuild(chat_id, source).await {
                Ok(_) => report.indexed.push(chat_id),
                Err(_) => report.failed.push(chat_id),
            }
        }

        info!(
            "Tag indexes initialized ({} ok, {} failed)",
            report.indexed.len(),
            report.failed.len()
        );
        report
    }

    /// Number of chats with a published index.
    pub async fn chat_count(&self) -> usize {
        let chats = self.chats.read().await;
        chats.values().filter(|s| s.index.is_some()).count()
    }
}
