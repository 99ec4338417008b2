//! Clients and shared state handed to every handler.

use crate::error::{AppError, AppResult};
use crate::format;
use async_trait::async_trait;
use gallery_client::{FileUpload, GalleryClient, Image, ImageVariant};
use std::sync::Arc;
use tag_index::{TagIndexError, TagIndexStore, TagSource};
use telegram_client::{ChatId, Message, SendOptions, TelegramClient, User};
use tracing::{debug, warn};

/// Serves the gallery's tag list as every chat's vocabulary.
pub struct GalleryTags {
    gallery: Arc<GalleryClient>,
}

impl GalleryTags {
    pub fn new(gallery: Arc<GalleryClient>) -> Self {
        Self { gallery }
    }
}

#[async_trait]
impl TagSource for GalleryTags {
    async fn tag_titles(&self, _chat_id: ChatId) -> Result<Vec<String>, TagIndexError> {
        let tags = self
            .gallery
            .list_tags()
            .await
            .map_err(|e| TagIndexError::Source(e.to_string()))?;
        Ok(tags.into_iter().map(|t| t.title).collect())
    }
}

#[derive(Clone)]
pub struct BotServices {
    pub telegram: Arc<TelegramClient>,
    pub gallery: Arc<GalleryClient>,
    pub tags: TagIndexStore,
    tag_source: Arc<GalleryTags>,
}

impl BotServices {
    pub fn new(telegram: Arc<TelegramClient>, gallery: Arc<GalleryClient>) -> Self {
        Self {
            tag_source: Arc::new(GalleryTags::new(gallery.clone())),
            telegram,
            gallery,
            tags: TagIndexStore::new(),
        }
    }

    pub fn tag_source(&self) -> &dyn TagSource {
        self.tag_source.as_ref()
    }

    /// Fail unless `user` is the creator or an administrator of the chat.
    pub async fn require_admin(&self, chat_id: ChatId, user: Option<&User>) -> AppResult<()> {
        let user = user.ok_or_else(|| {
            AppError::PermissionDenied("Unknown user, admin rights required".into())
        })?;

        if self.telegram.is_chat_admin(chat_id, user.id).await? {
            Ok(())
        } else {
            warn!("User {} is not an admin of chat {}", user.id, chat_id);
            Err(AppError::PermissionDenied(format!(
                "{} is not an admin of this chat",
                format::display_name(user)
            )))
        }
    }

    pub async fn send_text(&self, chat_id: ChatId, text: &str) -> AppResult<()> {
        self.telegram
            .send_message(chat_id, text, &SendOptions::default())
            .await?;
        Ok(())
    }

    /// Send the image, captioned with its info when `with_info` is set.
    ///
    /// Falls back to the info text when the image has no rendered variant,
    /// and to the not-found notice when there is no image at all.
    pub async fn send_image(
        &self,
        chat_id: ChatId,
        image: Option<&Image>,
        with_info: bool,
    ) -> AppResult<()> {
        let Some(image) = image else {
            return self.send_text(chat_id, format::NOT_FOUND).await;
        };

        let info = with_info.then(|| format::image_info(image));
        match self.gallery.image_url(image, ImageVariant::NoBorder) {
            Some(url) => {
                self.telegram
                    .send_photo(chat_id, &url, info.as_deref())
                    .await?;
            }
            None => match info {
                Some(info) => self.send_text(chat_id, &info).await?,
                None => self.send_text(chat_id, format::NOT_FOUND).await?,
            },
        }
        Ok(())
    }

    /// Download the file attached to the message or to the message it replies to.
    pub async fn fetch_upload(&self, message: &Message) -> AppResult<Option<FileUpload>> {
        let Some(attachment) = message.reply_attachment() else {
            return Ok(None);
        };

        let bytes = self.telegram.fetch_file(&attachment.file_id).await?;
        let mime_type = attachment
            .mime_type
            .unwrap_or_else(|| "application/octet-stream".into());
        let file_name = attachment
            .file_name
            .unwrap_or_else(|| format!("{}.{}", attachment.file_id, extension(&mime_type)));
        debug!("Fetched attachment {} ({} bytes)", file_name, bytes.len());

        Ok(Some(FileUpload {
            file_name,
            mime_type,
            bytes,
        }))
    }

    /// Mark every chat's tag index stale after the gallery changed.
    ///
    /// Every chat indexes the same gallery-wide tag list, so a mutation in
    /// one chat can change what any other chat is able to look up.
    pub async fn invalidate_tags(&self) {
        self.tags.invalidate_all().await;
    }

    /// Rebuild the chat's tag index after the gallery changed.
    ///
    /// Callers invalidate the indexes as soon as the mutation succeeds, so a
    /// failed rebuild here is retried by the next lookup.
    pub async fn rebuild_tags(&self, chat_id: ChatId) {
        if let Err(e) = self.tags.rebuild(chat_id, self.tag_source()).await {
            warn!("Tag index for chat {} stays stale: {}", chat_id, e);
        }
    }
}

fn extension(mime_type: &str) -> &str {
    match mime_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "bin",
    }
}
