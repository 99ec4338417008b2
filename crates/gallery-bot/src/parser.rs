//! Flag-style argument parsing for the upload and edit commands.
//!
//! Arguments look like `-t Sleepy Cat -ts cats, pfp -s sleepy-cat`. A flag
//! token is `-` followed by ASCII letters; its value is every token up to the
//! next flag, joined with single spaces. Flags a command does not know open a
//! section whose value is dropped.

use gallery_client::{Artist, ArtistData, Image, ImageData};
use std::collections::HashMap;

/// A parsed optional parameter.
///
/// `Unset` means the flag never appeared, `Empty` means it appeared with no
/// usable value. The distinction decides whether an edit keeps or clears the
/// previous value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<T> {
    Unset,
    Empty,
    Value(T),
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Unset
    }
}

impl<T> Field<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, Field::Unset)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Field::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl<T: Clone> Field<T> {
    /// Resolve against a previous value: unset keeps it, empty replaces it
    /// with `cleared`, a value replaces it.
    pub fn resolve(&self, previous: T, cleared: T) -> T {
        match self {
            Field::Unset => previous,
            Field::Empty => cleared,
            Field::Value(v) => v.clone(),
        }
    }
}

impl Field<String> {
    fn text(raw: Option<String>) -> Self {
        match raw {
            None => Field::Unset,
            Some(v) if v.is_empty() => Field::Empty,
            Some(v) => Field::Value(v),
        }
    }

    fn resolve_optional(&self, previous: Option<String>) -> Option<String> {
        match self {
            Field::Unset => previous,
            Field::Empty => None,
            Field::Value(v) => Some(v.clone()),
        }
    }
}

impl Field<Vec<String>> {
    fn list(raw: Option<String>) -> Self {
        let Some(raw) = raw else {
            return Field::Unset;
        };

        let items: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if items.is_empty() {
            Field::Empty
        } else {
            Field::Value(items)
        }
    }
}

/// Image fields shared by upload and edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageParams {
    pub title: Field<String>,
    pub tags: Field<Vec<String>>,
    pub artists: Field<Vec<String>>,
    pub slug: Field<String>,
}

impl ImageParams {
    fn from_flags(flags: &mut FlagValues) -> Self {
        Self {
            title: Field::text(flags.take("t")),
            tags: Field::list(flags.take("ts")),
            artists: Field::list(flags.take("a")),
            slug: Field::text(flags.take("s")),
        }
    }

    /// Data for a brand new image.
    pub fn to_new_image(&self) -> ImageData {
        self.apply_to(ImageData::default())
    }

    /// Merge onto an existing record.
    pub fn apply_to(&self, previous: ImageData) -> ImageData {
        ImageData {
            title: self.title.resolve_optional(previous.title),
            slug: self.slug.resolve_optional(previous.slug),
            tag_titles: self.tags.resolve(previous.tag_titles, Vec::new()),
            artist_names: self.artists.resolve(previous.artist_names, Vec::new()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditImageParams {
    pub id: Field<String>,
    pub image: ImageParams,
}

impl EditImageParams {
    pub fn merge(&self, previous: &Image) -> ImageData {
        self.image.apply_to(ImageData::from(previous))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditArtistParams {
    pub id: Field<String>,
    pub name: Field<String>,
    pub slug: Field<String>,
    pub deca_username: Field<String>,
    pub foundation_username: Field<String>,
    pub instagram_username: Field<String>,
    pub superrare_username: Field<String>,
    pub twitter_username: Field<String>,
}

impl EditArtistParams {
    /// Merge onto the artist's current record. The gallery requires a name,
    /// so an empty `-n` keeps the old one.
    pub fn merge(&self, previous: &Artist) -> ArtistData {
        let previous = ArtistData::from(previous);

        ArtistData {
            name: self.name.value().cloned().unwrap_or(previous.name),
            slug: self.slug.resolve_optional(previous.slug),
            deca_username: self.deca_username.resolve_optional(previous.deca_username),
            foundation_username: self
                .foundation_username
                .resolve_optional(previous.foundation_username),
            instagram_username: self
                .instagram_username
                .resolve_optional(previous.instagram_username),
            superrare_username: self
                .superrare_username
                .resolve_optional(previous.superrare_username),
            twitter_username: self
                .twitter_username
                .resolve_optional(previous.twitter_username),
        }
    }
}

const UPLOAD_FLAGS: &[&str] = &["t", "ts", "a", "s"];
const EDIT_IMAGE_FLAGS: &[&str] = &["i", "t", "ts", "a", "s"];
const EDIT_ARTIST_FLAGS: &[&str] = &[
    "i",
    "n",
    "s",
    "deca",
    "foundation",
    "instagram",
    "superrare",
    "twitter",
];

pub fn parse_upload(args: &str) -> ImageParams {
    let mut flags = FlagValues::scan(args, UPLOAD_FLAGS);
    ImageParams::from_flags(&mut flags)
}

pub fn parse_edit_image(args: &str) -> EditImageParams {
    let mut flags = FlagValues::scan(args, EDIT_IMAGE_FLAGS);
    EditImageParams {
        id: Field::text(flags.take("i")),
        image: ImageParams::from_flags(&mut flags),
    }
}

pub fn parse_edit_artist(args: &str) -> EditArtistParams {
    let mut flags = FlagValues::scan(args, EDIT_ARTIST_FLAGS);
    EditArtistParams {
        id: Field::text(flags.take("i")),
        name: Field::text(flags.take("n")),
        slug: Field::text(flags.take("s")),
        deca_username: Field::text(flags.take("deca")),
        foundation_username: Field::text(flags.take("foundation")),
        instagram_username: Field::text(flags.take("instagram")),
        superrare_username: Field::text(flags.take("superrare")),
        twitter_username: Field::text(flags.take("twitter")),
    }
}

fn flag_name(token: &str) -> Option<&str> {
    let name = token.strip_prefix('-')?;
    (!name.is_empty() && name.chars().all(|c| c.is_ascii_alphabetic())).then_some(name)
}

/// Raw joined values per known flag; the last occurrence of a flag wins.
struct FlagValues {
    values: HashMap<&'static str, String>,
}

impl FlagValues {
    fn scan(args: &str, known: &[&'static str]) -> Self {
        let mut values = HashMap::new();
        // None while inside an unknown flag section or before the first flag
        let mut current: Option<(&'static str, Vec<&str>)> = None;

        for token in args.split_whitespace() {
            if let Some(name) = flag_name(token) {
                if let Some((flag, words)) = current.take() {
                    values.insert(flag, words.join(" "));
                }
                current = known
                    .iter()
                    .find(|k| **k == name)
                    .map(|k| (*k, Vec::new()));
            } else if let Some((_, words)) = current.as_mut() {
                words.push(token);
            }
        }

        if let Some((flag, words)) = current {
            values.insert(flag, words.join(" "));
        }

        Self { values }
    }

    fn take(&mut self, flag: &str) -> Option<String> {
        self.values.remove(flag)
    }
}
