//! Common test utilities for integration tests.

#![allow(dead_code)]

use gallery_bot::{BotServices, DispatchSettings, Dispatcher};
use gallery_client::GalleryClient;
use std::sync::Arc;
use std::time::Duration;
use telegram_client::{TelegramClient, Update};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CHAT_ID: i64 = -100123;
pub const ADMIN_ID: i64 = 7;
pub const MEMBER_ID: i64 = 8;
pub const OTHER_CHAT_ID: i64 = -100999;
pub const BOT_USERNAME: &str = "gallerybot";
pub const MEDIA_URL: &str = "https://media.example";

/// Mock Telegram and gallery servers wired into a dispatcher.
pub struct TestBot {
    pub telegram_server: MockServer,
    pub gallery_server: MockServer,
    pub services: BotServices,
    pub telegram: Arc<TelegramClient>,
    pub dispatcher: Arc<Dispatcher>,
}

pub async fn test_bot() -> TestBot {
    let telegram_server = MockServer::start().await;
    let gallery_server = MockServer::start().await;

    let telegram = Arc::new(
        TelegramClient::new(telegram_server.uri(), "test-token", Duration::from_secs(5)).unwrap(),
    );
    let gallery = Arc::new(
        GalleryClient::new(
            "gallery-token",
            gallery_server.uri(),
            MEDIA_URL,
            Duration::from_secs(5),
        )
        .unwrap(),
    );

    let services = BotServices::new(telegram.clone(), gallery);
    let dispatcher = Arc::new(Dispatcher::new(
        services.clone(),
        DispatchSettings {
            bot_username: BOT_USERNAME.into(),
            min_tag_lookup_chars: 1,
        },
    ));

    TestBot {
        telegram_server,
        gallery_server,
        services,
        telegram,
        dispatcher,
    }
}

pub fn telegram_path(method_name: &str) -> String {
    format!("/bottest-token/{}", method_name)
}

fn sent_message() -> serde_json::Value {
    serde_json::json!({
        "ok": true,
        "result": {
            "message_id": 500,
            "chat": { "id": CHAT_ID, "type": "supergroup" }
        }
    })
}

/// Mount `sendMessage` and `sendPhoto` with canned successes.
pub async fn mock_sends(server: &MockServer) {
    for method_name in ["sendMessage", "sendPhoto"] {
        Mock::given(method("POST"))
            .and(path(telegram_path(method_name)))
            .respond_with(ResponseTemplate::new(200).set_body_json(sent_message()))
            .mount(server)
            .await;
    }
}

/// `ADMIN_ID` administers the chat, everybody else is a plain member.
pub async fn mock_chat_members(server: &MockServer) {
    for (user_id, status) in [(ADMIN_ID, "administrator"), (MEMBER_ID, "member")] {
        Mock::given(method("POST"))
            .and(path(telegram_path("getChatMember")))
            .and(wiremock::matchers::body_partial_json(
                serde_json::json!({ "user_id": user_id }),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": { "status": status, "user": { "id": user_id, "first_name": "U" } }
            })))
            .mount(server)
            .await;
    }
}

/// Serve `documents/cat.png` for file id `doc-1`.
pub async fn mock_file_download(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(telegram_path("getFile")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": true,
            "result": { "file_id": "doc-1", "file_path": "documents/cat.png" }
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/file/bottest-token/documents/cat.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"fake-png".to_vec()))
        .mount(server)
        .await;
}

pub async fn mock_tags(server: &MockServer, titles: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tags_json(titles)))
        .mount(server)
        .await;
}

pub fn tags_json(titles: &[&str]) -> serde_json::Value {
    serde_json::Value::Array(
        titles
            .iter()
            .enumerate()
            .map(|(i, t)| serde_json::json!({ "id": i + 1, "title": t }))
            .collect(),
    )
}

pub fn image_json(id: i64, title: &str, tags: &[&str]) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": title,
        "slug": title.to_lowercase().replace(' ', "-"),
        "tags": tags_json(tags),
        "artists": [],
        "variants": ["no-border", "original"]
    })
}

pub fn text_update(user_id: i64, text: &str) -> Update {
    text_update_in(CHAT_ID, user_id, text)
}

pub fn text_update_in(chat_id: i64, user_id: i64, text: &str) -> Update {
    serde_json::from_value(serde_json::json!({
        "update_id": 1,
        "message": {
            "message_id": 10,
            "from": { "id": user_id, "first_name": "Ada", "username": "ada" },
            "chat": { "id": chat_id, "type": "supergroup" },
            "text": text
        }
    }))
    .unwrap()
}

/// Command sent as a reply to a message carrying a PNG document.
pub fn reply_to_document_update(user_id: i64, text: &str) -> Update {
    serde_json::from_value(serde_json::json!({
        "update_id": 2,
        "message": {
            "message_id": 11,
            "from": { "id": user_id, "first_name": "Ada" },
            "chat": { "id": CHAT_ID, "type": "supergroup" },
            "text": text,
            "reply_to_message": {
                "message_id": 9,
                "chat": { "id": CHAT_ID, "type": "supergroup" },
                "document": {
                    "file_id": "doc-1",
                    "file_name": "cat.png",
                    "mime_type": "image/png"
                }
            }
        }
    }))
    .unwrap()
}

pub fn callback_update(user_id: i64, data: &str) -> Update {
    serde_json::from_value(serde_json::json!({
        "update_id": 3,
        "callback_query": {
            "id": "cb-1",
            "from": { "id": user_id, "first_name": "Ada" },
            "message": {
                "message_id": 12,
                "chat": { "id": CHAT_ID, "type": "supergroup" },
                "text": "Gallery admin"
            },
            "data": data
        }
    }))
    .unwrap()
}
