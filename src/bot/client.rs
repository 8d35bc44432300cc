//! Telegram Bot API client
//!
//! Thin RPC wrapper over the two methods the system uses. Failed sends
//! are not retried; message content is not validated beyond a non-empty
//! chat id.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::bot::api::{
    GetUpdatesResponse, SendMessageRequest, SendMessageResponse, TgMessage, TgUpdate,
};
use crate::config::BotConfig;
use crate::utils::errors::{GoalboardError, Result, TelegramError};

/// Extra headroom on top of the long-poll timeout so the HTTP client
/// does not cut off a poll the server is still holding open.
const CLIENT_TIMEOUT_MARGIN: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct TelegramClient {
    client: Client,
    base_url: String,
    poll_timeout_seconds: u64,
}

impl TelegramClient {
    /// Create a new TelegramClient instance
    pub fn new(config: &BotConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.poll_timeout_seconds) + CLIENT_TIMEOUT_MARGIN;
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("goalboard-bot/1.0")
            .build()
            .map_err(GoalboardError::Http)?;

        Ok(Self {
            client,
            base_url: format!("{}/bot{}", config.api_url.trim_end_matches('/'), config.token),
            poll_timeout_seconds: config.poll_timeout_seconds,
        })
    }

    /// Long-poll for updates after the given offset (exclusive of
    /// everything below it)
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<TgUpdate>> {
        let url = format!("{}/getUpdates", self.base_url);
        debug!(offset = offset, "Polling for updates");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("offset", offset),
                ("timeout", self.poll_timeout_seconds as i64),
            ])
            .send()
            .await
            .map_err(map_transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GoalboardError::Telegram(TelegramError::RequestFailed(
                format!("HTTP {status}: {body}"),
            )));
        }

        let payload: GetUpdatesResponse = response
            .json()
            .await
            .map_err(|e| GoalboardError::Telegram(TelegramError::InvalidResponse(e.to_string())))?;

        if !payload.ok {
            return Err(GoalboardError::Telegram(TelegramError::InvalidResponse(
                "getUpdates returned ok: false".to_string(),
            )));
        }

        Ok(payload.result)
    }

    /// Send a text message to a chat
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<Option<TgMessage>> {
        if chat_id == 0 {
            return Err(GoalboardError::Validation("chat id is required".to_string()));
        }

        let url = format!("{}/sendMessage", self.base_url);
        debug!(chat_id = chat_id, "Sending message");

        let response = self
            .client
            .post(&url)
            .json(&SendMessageRequest {
                chat_id,
                text: text.to_string(),
            })
            .send()
            .await
            .map_err(map_transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GoalboardError::Telegram(TelegramError::RequestFailed(
                format!("HTTP {status}: {body}"),
            )));
        }

        let payload: SendMessageResponse = response
            .json()
            .await
            .map_err(|e| GoalboardError::Telegram(TelegramError::InvalidResponse(e.to_string())))?;

        if !payload.ok {
            return Err(GoalboardError::Telegram(TelegramError::InvalidResponse(
                "sendMessage returned ok: false".to_string(),
            )));
        }

        Ok(payload.result)
    }
}

fn map_transport_error(e: reqwest::Error) -> GoalboardError {
    if e.is_timeout() {
        GoalboardError::Telegram(TelegramError::Timeout)
    } else if e.is_connect() {
        GoalboardError::Telegram(TelegramError::ServiceUnavailable)
    } else {
        GoalboardError::Telegram(TelegramError::RequestFailed(e.to_string()))
    }
}
