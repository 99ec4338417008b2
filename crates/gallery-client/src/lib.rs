//! Client for the media gallery REST API (images, artists, tags).

mod client;
mod error;
mod types;

pub use client::GalleryClient;
pub use error::GalleryError;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_client(mock_server: &MockServer) -> GalleryClient {
        GalleryClient::new(
            "test-token",
            mock_server.uri(),
            "https://media.example",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn image_json() -> serde_json::Value {
        serde_json::json!({
            "id": 7,
            "title": "Sleepy Cat",
            "slug": "sleepy-cat",
            "tags": [{ "id": 1, "title": "Cats" }, { "id": 2, "title": "pfp" }],
            "artists": [{ "id": 3, "name": "Ada" }],
            "variants": ["original", "no-border"]
        })
    }

    #[tokio::test]
    async fn test_get_image() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/images/sleepy-cat"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(image_json()))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let image = client.get_image("sleepy-cat").await.unwrap();

        assert_eq!(image.id, 7);
        assert_eq!(image.tag_titles(), vec!["Cats", "pfp"]);
        assert_eq!(image.artist_names(), vec!["Ada"]);
    }

    #[tokio::test]
    async fn test_get_image_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/images/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let result = client.get_image("missing").await;

        assert!(matches!(result, Err(GalleryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_random_image_with_tag() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/images/random"))
            .and(query_param("tag", "Cats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(image_json()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let image = client.get_random_image(Some("Cats")).await.unwrap();

        assert_eq!(image.map(|i| i.id), Some(7));
    }

    #[tokio::test]
    async fn test_get_random_image_none() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/images/random"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let image = client.get_random_image(Some("Dogs")).await.unwrap();

        assert!(image.is_none());
    }

    #[tokio::test]
    async fn test_api_error_message() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(serde_json::json!({ "message": "database offline" })),
            )
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let err = client.list_tags().await.unwrap_err();

        assert!(matches!(err, GalleryError::Api { status: 500, .. }));
        assert_eq!(err.user_message(), "database offline");
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        assert!(matches!(
            client.list_tags().await,
            Err(GalleryError::Unauthorized)
        ));
        assert!(!client.health_check().await);
    }

    #[tokio::test]
    async fn test_upload_image_multipart() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/images"))
            .and(body_string_contains("\"tag_titles\":[\"Cats\"]"))
            .and(body_string_contains("filename=\"cat.png\""))
            .respond_with(ResponseTemplate::new(201).set_body_json(image_json()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let data = ImageData {
            title: Some("Sleepy Cat".into()),
            slug: None,
            tag_titles: vec!["Cats".into()],
            artist_names: vec![],
        };
        let file = FileUpload {
            file_name: "cat.png".into(),
            mime_type: "image/png".into(),
            bytes: b"fake-png".to_vec(),
        };

        let image = client.upload_image(&data, Some(file)).await.unwrap();
        assert_eq!(image.slug.as_deref(), Some("sleepy-cat"));
    }

    #[tokio::test]
    async fn test_edit_artist() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/api/artists/3"))
            .and(body_string_contains("\"twitter_username\":\"ada_draws\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 3,
                "name": "Ada",
                "twitter_username": "ada_draws"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let data = ArtistData {
            name: "Ada".into(),
            twitter_username: Some("ada_draws".into()),
            ..ArtistData::default()
        };

        let artist = client.edit_artist(3, &data, None).await.unwrap();
        assert_eq!(artist.twitter_username.as_deref(), Some("ada_draws"));
        assert!(!artist.has_profile_picture);
    }

    #[tokio::test]
    async fn test_image_url_prefers_requested_variant() {
        let mock_server = MockServer::start().await;
        let client = create_test_client(&mock_server);
        let image: Image = serde_json::from_value(image_json()).unwrap();

        assert_eq!(
            client.image_url(&image, ImageVariant::NoBorder).as_deref(),
            Some("https://media.example/images/7-no-border.png")
        );
        assert_eq!(
            client.image_url(&image, ImageVariant::Border).as_deref(),
            Some("https://media.example/images/7-original.png")
        );
    }

    #[tokio::test]
    async fn test_image_url_without_variants() {
        let mock_server = MockServer::start().await;
        let client = create_test_client(&mock_server);
        let image: Image = serde_json::from_value(serde_json::json!({ "id": 1 })).unwrap();

        assert!(client.image_url(&image, ImageVariant::NoBorder).is_none());
    }

    #[tokio::test]
    async fn test_artist_picture_url() {
        let mock_server = MockServer::start().await;
        let client = create_test_client(&mock_server);
        let mut artist: Artist =
            serde_json::from_value(serde_json::json!({ "id": 3, "name": "Ada" })).unwrap();

        assert!(client.artist_picture_url(&artist).is_none());

        artist.has_profile_picture = true;
        assert_eq!(
            client.artist_picture_url(&artist).as_deref(),
            Some("https://media.example/artists/3-original.png")
        );
    }

    #[test]
    fn test_image_data_from_image() {
        let image: Image = serde_json::from_value(image_json()).unwrap();
        let data = ImageData::from(&image);

        assert_eq!(data.title.as_deref(), Some("Sleepy Cat"));
        assert_eq!(data.tag_titles, vec!["Cats", "pfp"]);
        assert_eq!(data.artist_names, vec!["Ada"]);
    }

    #[test]
    fn test_preview_cuts_on_char_boundary() {
        let body = format!("{}été", "a".repeat(199));
        assert_eq!(crate::client::preview(&body, 200), format!("{}é", "a".repeat(199)));
        assert_eq!(crate::client::preview("short", 200), "short");
    }

    #[tokio::test]
    async fn test_list_tags_with_multibyte_titles_under_debug_logging() {
        let _guard = tracing::subscriber::set_default(
            tracing_subscriber::fmt()
                .with_max_level(tracing::Level::DEBUG)
                .with_test_writer()
                .finish(),
        );
        let mock_server = MockServer::start().await;

        // Pad so a two-byte 'é' straddles byte 200 of the body
        let padding = "x".repeat(158);
        let body = format!(r#"[{{"id":1,"title":"{}"}},{{"id":2,"title":"été"}}]"#, padding);
        assert!(!body.is_char_boundary(200));

        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let tags = client.list_tags().await.unwrap();

        assert_eq!(tags.len(), 2);
        assert_eq!(tags[1].title, "été");
    }
}
