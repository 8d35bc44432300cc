//! Telegram account linking service
//!
//! Implements the per-chat linking state machine: an unlinked chat gets a
//! fresh verification code on every inbound message; a linked chat only
//! ever gets a greeting. Redemption happens out-of-band through the web
//! API and consumes the code.

use rand::RngCore;
use tracing::{debug, info};

use crate::bot::client::TelegramClient;
use crate::database::TgLinkRepository;
use crate::models::tg_link::TgLink;
use crate::utils::errors::{GoalboardError, Result};
use crate::utils::logging::log_link_event;

#[derive(Debug, Clone)]
pub struct LinkingService {
    links: TgLinkRepository,
    client: TelegramClient,
}

impl LinkingService {
    pub fn new(links: TgLinkRepository, client: TelegramClient) -> Self {
        Self { links, client }
    }

    /// Handle one inbound chat message.
    ///
    /// Linked chats get a greeting and keep their `user_id`; anything
    /// else gets a fresh code, replacing whatever unredeemed code the
    /// chat held before.
    pub async fn process_message(&self, chat_id: i64, username: Option<&str>) -> Result<()> {
        let link = self.links.find_by_chat_id(chat_id).await?;

        if link.as_ref().is_some_and(TgLink::is_linked) {
            debug!(chat_id = chat_id, "Chat already linked, greeting");
            let greeting = match username {
                Some(name) => format!("Hi {name}!"),
                None => "Hi!".to_string(),
            };
            self.client.send_message(chat_id, &greeting).await?;
            return Ok(());
        }

        let code = generate_verification_code();
        self.links.upsert_code(chat_id, username, &code).await?;
        log_link_event(chat_id, "verification_code_issued", None);

        let text = format!(
            "Hello! To link this chat to your goalboard account, enter this \
             verification code on the site: {code}"
        );
        self.client.send_message(chat_id, &text).await?;

        Ok(())
    }

    /// Redeem a verification code on behalf of an authenticated user.
    ///
    /// The lookup is solely by code; an unknown code (including one that
    /// was already consumed) is a validation failure. On success the code
    /// is cleared and the originating chat is notified.
    pub async fn redeem(&self, verification_code: &str, user_id: i64) -> Result<TgLink> {
        let link = self
            .links
            .redeem_code(verification_code, user_id)
            .await?
            .ok_or_else(|| {
                GoalboardError::Validation("incorrect verification code".to_string())
            })?;

        info!(chat_id = link.tg_chat_id, user_id = user_id, "Telegram chat linked");
        log_link_event(link.tg_chat_id, "linked", Some(user_id));

        self.client
            .send_message(link.tg_chat_id, "Telegram account linked successfully")
            .await?;

        Ok(link)
    }
}

/// 128 bits of entropy, hex-encoded
pub fn generate_verification_code() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
