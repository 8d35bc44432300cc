//! Bot linking flow tests
//!
//! Exercises the per-chat state machine end-to-end: first contact issues
//! a verification code, redemption links the account and consumes the
//! code, later messages only greet. Requires a test database; each test
//! skips when none is configured.

mod helpers;

use std::time::Duration;

use assert_matches::assert_matches;
use serde_json::json;
use tokio::sync::watch;

use goalboard::bot::{BotPoller, TelegramClient};
use goalboard::services::LinkingService;
use goalboard::utils::errors::GoalboardError;

use helpers::{create_test_user, test_database, text_update, TelegramMockServer};

#[tokio::test]
async fn test_first_contact_issues_code_and_redemption_links() {
    let Some(db) = test_database().await else {
        eprintln!("skipping: no test database configured");
        return;
    };
    let mock = TelegramMockServer::new().await;
    mock.mock_send_message().await;

    let chat_id: i64 = (rand::random::<u64>() >> 1) as i64 + 1;
    let client = TelegramClient::new(&mock.bot_config()).unwrap();
    let linking = LinkingService::new(db.tg_links.clone(), client);

    // First inbound message: a linking record with a fresh code appears
    linking.process_message(chat_id, Some("alice")).await.unwrap();

    let link = db.tg_links.find_by_chat_id(chat_id).await.unwrap().unwrap();
    assert!(link.user_id.is_none());
    let code = link.verification_code.clone().unwrap();
    assert_eq!(code.len(), 32);

    let sent = mock.sent_messages().await;
    assert_eq!(sent.len(), 1);
    let text = sent[0]["text"].as_str().unwrap();
    assert!(text.contains(&code), "instructional message carries the code");

    // A second message before redemption replaces the code
    linking.process_message(chat_id, Some("alice")).await.unwrap();
    let link = db.tg_links.find_by_chat_id(chat_id).await.unwrap().unwrap();
    let second_code = link.verification_code.clone().unwrap();
    assert_ne!(code, second_code);

    // Redemption attaches the user and clears the code
    let user = create_test_user(&db, "link").await;
    let linked = linking.redeem(&second_code, user.id).await.unwrap();
    assert_eq!(linked.tg_chat_id, chat_id);
    assert_eq!(linked.user_id, Some(user.id));

    let link = db.tg_links.find_by_chat_id(chat_id).await.unwrap().unwrap();
    assert_eq!(link.user_id, Some(user.id));
    assert!(link.verification_code.is_none());

    // Redeeming the same code again fails: single use
    let other = create_test_user(&db, "link").await;
    let err = linking.redeem(&second_code, other.id).await.unwrap_err();
    assert_matches!(err, GoalboardError::Validation(_));

    // A linked chat gets a greeting and never a new code
    linking.process_message(chat_id, Some("alice")).await.unwrap();
    let link = db.tg_links.find_by_chat_id(chat_id).await.unwrap().unwrap();
    assert_eq!(link.user_id, Some(user.id), "user_id is never overwritten");
    assert!(link.verification_code.is_none(), "no code reissued once linked");

    let sent = mock.sent_messages().await;
    let last = sent.last().unwrap()["text"].as_str().unwrap().to_string();
    assert_eq!(last, "Hi alice!");
}

#[tokio::test]
async fn test_unknown_code_is_rejected() {
    let Some(db) = test_database().await else {
        eprintln!("skipping: no test database configured");
        return;
    };
    let mock = TelegramMockServer::new().await;
    mock.mock_send_message().await;

    let client = TelegramClient::new(&mock.bot_config()).unwrap();
    let linking = LinkingService::new(db.tg_links.clone(), client);

    let user = create_test_user(&db, "nocode").await;
    let err = linking.redeem("deadbeef", user.id).await.unwrap_err();
    assert_matches!(err, GoalboardError::Validation(_));

    // No confirmation goes out for a failed redemption
    assert!(mock.sent_messages().await.is_empty());
}

#[tokio::test]
async fn test_poller_advances_offset_past_processed_batch() {
    let Some(db) = test_database().await else {
        eprintln!("skipping: no test database configured");
        return;
    };
    let mock = TelegramMockServer::new().await;

    let chat_a: i64 = (rand::random::<u64>() >> 1) as i64 + 1;
    let chat_b: i64 = (rand::random::<u64>() >> 1) as i64 + 1;
    mock.mock_get_updates_once(
        0,
        json!([
            text_update(700, chat_a, "alice", "/start"),
            text_update(701, chat_b, "bob", "/start"),
        ]),
    )
    .await;
    mock.mock_get_updates_empty().await;
    mock.mock_send_message().await;

    let client = TelegramClient::new(&mock.bot_config()).unwrap();
    let linking = LinkingService::new(db.tg_links.clone(), client.clone());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let poller = BotPoller::new(client, linking, shutdown_rx);
    let handle = tokio::spawn(poller.run());

    // Let the poller consume the batch and at least one empty poll
    tokio::time::sleep(Duration::from_millis(500)).await;
    shutdown_tx.send(true).unwrap();
    handle.await.unwrap();

    // Both chats got a message, in arrival order
    let sent = mock.sent_messages().await;
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0]["chat_id"], chat_a);
    assert_eq!(sent[1]["chat_id"], chat_b);

    // Both now hold pending codes
    for chat_id in [chat_a, chat_b] {
        let link = db.tg_links.find_by_chat_id(chat_id).await.unwrap().unwrap();
        assert!(link.verification_code.is_some());
        assert!(link.user_id.is_none());
    }

    // The offset advanced to last_update_id + 1 after the batch and no
    // update was fetched twice
    let offsets = mock.polled_offsets().await;
    assert_eq!(offsets.first(), Some(&0));
    assert!(offsets[1..].iter().all(|&o| o == 702), "offsets were: {offsets:?}");
}
