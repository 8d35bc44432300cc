//! Shared test infrastructure
//!
//! A wiremock stand-in for the Telegram Bot API plus a guarded test
//! database handle. Database-backed tests run only when
//! `GOALBOARD_TEST_DATABASE_URL` points at a disposable Postgres; they
//! skip silently otherwise.

#![allow(dead_code)]

use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use goalboard::config::BotConfig;
use goalboard::database::{DatabasePool, DatabaseService};
use goalboard::models::user::{CreateUserRequest, User};

pub const TEST_TOKEN: &str = "12345:test_token";

/// Mock Telegram API server for testing
pub struct TelegramMockServer {
    pub server: MockServer,
}

impl TelegramMockServer {
    /// Create a new mock Telegram API server
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Bot configuration pointing at the mock server
    pub fn bot_config(&self) -> BotConfig {
        BotConfig {
            token: TEST_TOKEN.to_string(),
            api_url: self.server.uri(),
            poll_timeout_seconds: 1,
        }
    }

    /// Serve one batch of updates for the given offset; later polls get
    /// empty batches.
    pub async fn mock_get_updates_once(&self, offset: i64, updates: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(format!("/bot{TEST_TOKEN}/getUpdates")))
            .and(query_param("offset", offset.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": updates,
            })))
            .up_to_n_times(1)
            .mount(&self.server)
            .await;
    }

    /// All other polls return an empty batch
    pub async fn mock_get_updates_empty(&self) {
        Mock::given(method("GET"))
            .and(path(format!("/bot{TEST_TOKEN}/getUpdates")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"ok": true, "result": []})),
            )
            .mount(&self.server)
            .await;
    }

    /// Accept sendMessage calls
    pub async fn mock_send_message(&self) {
        Mock::given(method("POST"))
            .and(path(format!("/bot{TEST_TOKEN}/sendMessage")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": {
                    "message_id": 1,
                    "chat": {"id": 12345, "type": "private"},
                    "date": 1640995200,
                    "text": "ok"
                }
            })))
            .mount(&self.server)
            .await;
    }

    /// Bodies of every sendMessage request received so far
    pub async fn sent_messages(&self) -> Vec<serde_json::Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path().ends_with("/sendMessage"))
            .map(|r| serde_json::from_slice(&r.body).expect("sendMessage body is JSON"))
            .collect()
    }

    /// Offsets of every getUpdates request received so far
    pub async fn polled_offsets(&self) -> Vec<i64> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path().ends_with("/getUpdates"))
            .filter_map(|r| {
                r.url
                    .query_pairs()
                    .find(|(k, _)| k == "offset")
                    .and_then(|(_, v)| v.parse().ok())
            })
            .collect()
    }
}

/// A single inbound text message update, in Telegram wire shape
pub fn text_update(update_id: i64, chat_id: i64, username: &str, text: &str) -> serde_json::Value {
    json!({
        "update_id": update_id,
        "message": {
            "message_id": update_id,
            "from": {"id": chat_id, "is_bot": false, "username": username},
            "chat": {"id": chat_id, "username": username, "type": "private"},
            "date": 1640995200,
            "text": text
        }
    })
}

/// Connect to the test database and run migrations, or None when no test
/// database is configured.
pub async fn test_pool() -> Option<DatabasePool> {
    let url = std::env::var("GOALBOARD_TEST_DATABASE_URL").ok()?;

    let pool = PgPoolOptions::new()
        .max_connections(4)
        .connect(&url)
        .await
        .ok()?;

    sqlx::migrate!("./migrations").run(&pool).await.ok()?;
    Some(pool)
}

/// Guarded database service handle
pub async fn test_database() -> Option<DatabaseService> {
    Some(DatabaseService::new(test_pool().await?))
}

/// Create a user with a unique username
pub async fn create_test_user(db: &DatabaseService, prefix: &str) -> User {
    let request = CreateUserRequest {
        username: format!("{prefix}_{:016x}", rand::random::<u64>()),
        password_hash: "x".to_string(),
        first_name: None,
        last_name: None,
        email: None,
    };

    db.users.create(&request).await.expect("create test user")
}
