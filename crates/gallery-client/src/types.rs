//! Request and response types for the gallery API.

use serde::{Deserialize, Serialize};

/// Rendered versions of an image the gallery can serve.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ImageVariant {
    NoBorder,
    Border,
    Original,
}

impl ImageVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageVariant::NoBorder => "no-border",
            ImageVariant::Border => "border",
            ImageVariant::Original => "original",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub id: i64,
    pub title: String,
}

/// Artist as embedded in an image record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArtistRef {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Image {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    #[serde(default)]
    pub variants: Vec<ImageVariant>,
}

impl Image {
    pub fn tag_titles(&self) -> Vec<String> {
        self.tags.iter().map(|t| t.title.clone()).collect()
    }

    pub fn artist_names(&self) -> Vec<String> {
        self.artists.iter().map(|a| a.name.clone()).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Artist {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub deca_username: Option<String>,
    #[serde(default)]
    pub foundation_username: Option<String>,
    #[serde(default)]
    pub instagram_username: Option<String>,
    #[serde(default)]
    pub superrare_username: Option<String>,
    #[serde(default)]
    pub twitter_username: Option<String>,
    #[serde(default)]
    pub has_profile_picture: bool,
}

/// Writable image fields, sent as the `data` part of an upload or edit.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ImageData {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub tag_titles: Vec<String>,
    pub artist_names: Vec<String>,
}

impl From<&Image> for ImageData {
    fn from(image: &Image) -> Self {
        Self {
            title: image.title.clone(),
            slug: image.slug.clone(),
            tag_titles: image.tag_titles(),
            artist_names: image.artist_names(),
        }
    }
}

/// Writable artist fields.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ArtistData {
    pub name: String,
    pub slug: Option<String>,
    pub deca_username: Option<String>,
    pub foundation_username: Option<String>,
    pub instagram_username: Option<String>,
    pub superrare_username: Option<String>,
    pub twitter_username: Option<String>,
}

impl From<&Artist> for ArtistData {
    fn from(artist: &Artist) -> Self {
        Self {
            name: artist.name.clone(),
            slug: artist.slug.clone(),
            deca_username: artist.deca_username.clone(),
            foundation_username: artist.foundation_username.clone(),
            instagram_username: artist.instagram_username.clone(),
            superrare_username: artist.superrare_username.clone(),
            twitter_username: artist.twitter_username.clone(),
        }
    }
}

/// Binary file sent alongside image or artist data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
