//! Telegram client tests against a mock API server

mod helpers;

use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use goalboard::bot::TelegramClient;
use goalboard::utils::errors::{GoalboardError, TelegramError};

use helpers::{text_update, TelegramMockServer, TEST_TOKEN};

#[tokio::test]
async fn test_get_updates_passes_offset_and_parses_batch() {
    let mock = TelegramMockServer::new().await;
    mock.mock_get_updates_once(42, json!([text_update(735, 12345, "alice", "hello")]))
        .await;
    mock.mock_get_updates_empty().await;

    let client = TelegramClient::new(&mock.bot_config()).unwrap();

    let updates = client.get_updates(42).await.unwrap();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].update_id, 735);
    let message = updates[0].message.as_ref().unwrap();
    assert_eq!(message.chat.id, 12345);
    assert_eq!(message.text.as_deref(), Some("hello"));

    // The offset travels as a query parameter
    assert_eq!(mock.polled_offsets().await, vec![42]);
}

#[tokio::test]
async fn test_get_updates_rejects_not_ok_payload() {
    let mock = TelegramMockServer::new().await;
    Mock::given(method("GET"))
        .and(path(format!("/bot{TEST_TOKEN}/getUpdates")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"ok": false, "result": []})),
        )
        .mount(&mock.server)
        .await;

    let client = TelegramClient::new(&mock.bot_config()).unwrap();

    let err = client.get_updates(0).await.unwrap_err();
    assert_matches!(
        err,
        GoalboardError::Telegram(TelegramError::InvalidResponse(_))
    );
}

#[tokio::test]
async fn test_get_updates_maps_http_failure() {
    let mock = TelegramMockServer::new().await;
    Mock::given(method("GET"))
        .and(path(format!("/bot{TEST_TOKEN}/getUpdates")))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock.server)
        .await;

    let client = TelegramClient::new(&mock.bot_config()).unwrap();

    let err = client.get_updates(0).await.unwrap_err();
    assert_matches!(
        err,
        GoalboardError::Telegram(TelegramError::RequestFailed(_))
    );
}

#[tokio::test]
async fn test_send_message_posts_chat_and_text() {
    let mock = TelegramMockServer::new().await;
    mock.mock_send_message().await;

    let client = TelegramClient::new(&mock.bot_config()).unwrap();
    client.send_message(12345, "Hi alice!").await.unwrap();

    let sent = mock.sent_messages().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["chat_id"], 12345);
    assert_eq!(sent[0]["text"], "Hi alice!");
}

#[tokio::test]
async fn test_send_message_requires_chat_id() {
    let mock = TelegramMockServer::new().await;
    mock.mock_send_message().await;

    let client = TelegramClient::new(&mock.bot_config()).unwrap();

    let err = client.send_message(0, "nobody home").await.unwrap_err();
    assert_matches!(err, GoalboardError::Validation(_));

    // The guard fires before any request leaves the process
    assert!(mock.sent_messages().await.is_empty());
}
