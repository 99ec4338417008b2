//! Reply text for images, artists and users.

use gallery_client::{Artist, Image};
use telegram_client::User;

pub const NOT_FOUND: &str = "Image not found";

pub fn image_info(image: &Image) -> String {
    let mut lines = vec![
        format!("Title: {}", image.title.as_deref().unwrap_or("Untitled")),
        format!("ID: {}", image.id),
    ];

    if let Some(slug) = &image.slug {
        lines.push(format!("Slug: {}", slug));
    }

    lines.push(format!("Tags: {}", list_or_none(&image.tag_titles())));
    lines.push(format!("Artists: {}", list_or_none(&image.artist_names())));

    lines.join("\n")
}

pub fn artist_info(artist: &Artist) -> String {
    let mut lines = vec![
        format!("Name: {}", artist.name),
        format!("ID: {}", artist.id),
    ];

    if let Some(slug) = &artist.slug {
        lines.push(format!("Slug: {}", slug));
    }

    let socials = [
        ("Deca", &artist.deca_username),
        ("Foundation", &artist.foundation_username),
        ("Instagram", &artist.instagram_username),
        ("SuperRare", &artist.superrare_username),
        ("Twitter", &artist.twitter_username),
    ];
    for (site, username) in socials {
        if let Some(username) = username {
            lines.push(format!("{}: {}", site, username));
        }
    }

    lines.join("\n")
}

/// Name used when talking about a user: first name, else username.
pub fn display_name(user: &User) -> &str {
    if !user.first_name.is_empty() {
        &user.first_name
    } else {
        user.username.as_deref().unwrap_or("Anon")
    }
}

/// Mention of the user: plain `@username` when they have one, otherwise a
/// MarkdownV2 link to their profile.
pub fn mention(user: &User) -> String {
    match &user.username {
        Some(username) => format!("@{}", username),
        None => format!(
            "[{}](tg://user?id={})",
            escape_markdown_v2(display_name(user)),
            user.id
        ),
    }
}

/// Backslash-escape every character MarkdownV2 reserves.
pub fn escape_markdown_v2(text: &str) -> String {
    const RESERVED: &[char] = &[
        '\\', '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}',
        '.', '!',
    ];
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if RESERVED.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".into()
    } else {
        items.join(", ")
    }
}
