//! Gallery HTTP client.

use crate::error::GalleryError;
use crate::types::*;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::{debug, instrument, warn};
use urlencoding::encode;

/// Gallery REST API client.
///
/// The API token is stored using `SecretString` to prevent accidental
/// exposure in logs or debug output.
#[derive(Clone)]
pub struct GalleryClient {
    client: Client,
    base_url: String,
    media_url: String,
    api_token: SecretString,
}

impl GalleryClient {
    /// Create a new gallery client.
    ///
    /// `media_url` is where rendered images and profile pictures are served from.
    pub fn new(
        api_token: impl Into<String>,
        base_url: impl Into<String>,
        media_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GalleryError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            media_url: media_url.into().trim_end_matches('/').to_string(),
            api_token: SecretString::new(api_token.into()),
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(
            "Authorization",
            format!("Bearer {}", self.api_token.expose_secret()),
        )
    }

    /// Get an image by numeric id or slug.
    #[instrument(skip(self))]
    pub async fn get_image(&self, id_or_slug: &str) -> Result<Image, GalleryError> {
        let response = self
            .authorized(
                self.client
                    .get(format!("{}/api/images/{}", self.base_url, encode(id_or_slug))),
            )
            .send()
            .await?;

        self.handle_response(response, || format!("Image {}", id_or_slug))
            .await
    }

    /// Get a random image, optionally restricted to a tag title.
    ///
    /// Returns `None` when nothing matches.
    #[instrument(skip(self))]
    pub async fn get_random_image(&self, tag: Option<&str>) -> Result<Option<Image>, GalleryError> {
        let mut request = self
            .client
            .get(format!("{}/api/images/random", self.base_url));
        if let Some(tag) = tag {
            request = request.query(&[("tag", tag)]);
        }

        let response = self.authorized(request).send().await?;

        match self.handle_response(response, || "Random image".into()).await {
            Ok(image) => Ok(Some(image)),
            Err(GalleryError::NotFound(_)) => {
                debug!("No random image for tag {:?}", tag);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Upload a new image.
    #[instrument(skip(self, data, file), fields(has_file = file.is_some()))]
    pub async fn upload_image(
        &self,
        data: &ImageData,
        file: Option<FileUpload>,
    ) -> Result<Image, GalleryError> {
        let form = multipart_form(data, file)?;
        let response = self
            .authorized(self.client.post(format!("{}/api/images", self.base_url)))
            .multipart(form)
            .send()
            .await?;

        self.handle_response(response, || "Image".into()).await
    }

    /// Replace an image's fields, and optionally its file.
    #[instrument(skip(self, data, file), fields(has_file = file.is_some()))]
    pub async fn edit_image(
        &self,
        id: i64,
        data: &ImageData,
        file: Option<FileUpload>,
    ) -> Result<Image, GalleryError> {
        let form = multipart_form(data, file)?;
        let response = self
            .authorized(
                self.client
                    .put(format!("{}/api/images/{}", self.base_url, id)),
            )
            .multipart(form)
            .send()
            .await?;

        self.handle_response(response, || format!("Image {}", id))
            .await
    }

    /// Get an artist by numeric id or slug.
    #[instrument(skip(self))]
    pub async fn get_artist(&self, id_or_slug: &str) -> Result<Artist, GalleryError> {
        let response = self
            .authorized(
                self.client
                    .get(format!("{}/api/artists/{}", self.base_url, encode(id_or_slug))),
            )
            .send()
            .await?;

        self.handle_response(response, || format!("Artist {}", id_or_slug))
            .await
    }

    /// Replace an artist's fields, and optionally the profile picture.
    #[instrument(skip(self, data, picture), fields(has_picture = picture.is_some()))]
    pub async fn edit_artist(
        &self,
        id: i64,
        data: &ArtistData,
        picture: Option<FileUpload>,
    ) -> Result<Artist, GalleryError> {
        let form = multipart_form(data, picture)?;
        let response = self
            .authorized(
                self.client
                    .put(format!("{}/api/artists/{}", self.base_url, id)),
            )
            .multipart(form)
            .send()
            .await?;

        self.handle_response(response, || format!("Artist {}", id))
            .await
    }

    /// List every tag in the gallery.
    #[instrument(skip(self))]
    pub async fn list_tags(&self) -> Result<Vec<Tag>, GalleryError> {
        let response = self
            .authorized(self.client.get(format!("{}/api/tags", self.base_url)))
            .send()
            .await?;

        let tags: Vec<Tag> = self.handle_response(response, || "Tags".into()).await?;
        debug!("Fetched {} tags", tags.len());
        Ok(tags)
    }

    /// Health check - returns true if the tag listing is reachable.
    pub async fn health_check(&self) -> bool {
        self.list_tags().await.is_ok()
    }

    /// URL of the preferred rendered variant, or of the first one available.
    pub fn image_url(&self, image: &Image, preferred: ImageVariant) -> Option<String> {
        let variant = if image.variants.contains(&preferred) {
            preferred
        } else {
            *image.variants.first()?
        };

        Some(format!(
            "{}/images/{}-{}.png",
            self.media_url,
            image.id,
            variant.as_str()
        ))
    }

    pub fn artist_picture_url(&self, artist: &Artist) -> Option<String> {
        artist
            .has_profile_picture
            .then(|| format!("{}/artists/{}-original.png", self.media_url, artist.id))
    }

    /// Handle HTTP response, converting errors appropriately.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
        subject: impl FnOnce() -> String,
    ) -> Result<T, GalleryError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            debug!("Response body: {}", preview(&body, 200));
            serde_json::from_str(&body).map_err(GalleryError::from)
        } else if status == StatusCode::NOT_FOUND {
            Err(GalleryError::NotFound(subject()))
        } else {
            Err(self.extract_error(response).await)
        }
    }

    /// Extract error information from failed response.
    async fn extract_error(&self, response: reqwest::Response) -> GalleryError {
        let status = response.status();

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                warn!("Gallery authentication failed");
                GalleryError::Unauthorized
            }
            _ => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".into());
                let message = serde_json::from_str::<ErrorBody>(&body)
                    .ok()
                    .and_then(|b| b.message)
                    .unwrap_or(body);
                GalleryError::Api {
                    status: status.as_u16(),
                    message,
                }
            }
        }
    }
}

fn multipart_form<T: serde::Serialize>(
    data: &T,
    file: Option<FileUpload>,
) -> Result<Form, GalleryError> {
    let mut form = Form::new().text("data", serde_json::to_string(data)?);

    if let Some(file) = file {
        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.mime_type)?;
        form = form.part("file", part);
    }

    Ok(form)
}

/// At most `max_chars` characters of `body`, cut on a char boundary.
pub(crate) fn preview(body: &str, max_chars: usize) -> &str {
    match body.char_indices().nth(max_chars) {
        Some((end, _)) => &body[..end],
        None => body,
    }
}
