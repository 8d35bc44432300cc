//! Bot long-poll loop
//!
//! Repeatedly asks the Telegram API for updates past the last-seen
//! offset, hands each message to the linking service in arrival order,
//! then advances the offset. Delivery is at-most-once: the offset moves
//! past every update whose processing was attempted, so a failed side
//! effect is not replayed.

use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::bot::api::TgUpdate;
use crate::bot::client::TelegramClient;
use crate::services::LinkingService;
use crate::utils::errors::Result;

/// Delay before retrying after a failed poll call
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

pub struct BotPoller {
    client: TelegramClient,
    linking: LinkingService,
    shutdown: watch::Receiver<bool>,
}

impl BotPoller {
    pub fn new(
        client: TelegramClient,
        linking: LinkingService,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            client,
            linking,
            shutdown,
        }
    }

    /// Run until the shutdown channel fires.
    pub async fn run(mut self) {
        let mut offset: i64 = 0;
        info!("Bot poller started");

        loop {
            let updates = tokio::select! {
                _ = self.shutdown.changed() => {
                    info!("Bot poller shutting down");
                    break;
                }
                result = self.client.get_updates(offset) => match result {
                    Ok(updates) => updates,
                    Err(e) => {
                        if e.is_recoverable() {
                            warn!(error = %e, "Poll failed, will retry");
                        } else {
                            error!(error = %e, "Poll failed");
                        }
                        tokio::time::sleep(POLL_RETRY_DELAY).await;
                        continue;
                    }
                }
            };

            offset = self.process_batch(&updates, offset).await;
        }
    }

    /// Process a batch in arrival order. A failing update aborts the rest
    /// of the iteration; the offset still moves past it.
    async fn process_batch(&self, updates: &[TgUpdate], offset: i64) -> i64 {
        let mut next = offset;

        for update in updates {
            next = next_offset(update.update_id, next);
            if let Err(e) = self.handle_update(update).await {
                error!(
                    update_id = update.update_id,
                    error = %e,
                    "Update processing failed, aborting iteration"
                );
                break;
            }
        }

        next
    }

    async fn handle_update(&self, update: &TgUpdate) -> Result<()> {
        let Some(message) = &update.message else {
            return Ok(());
        };

        let username = message.from.as_ref().and_then(|f| f.username.as_deref());
        self.linking.process_message(message.chat.id, username).await
    }
}

/// Offset the next `getUpdates` call should use after seeing `update_id`
fn next_offset(update_id: i64, current: i64) -> i64 {
    (update_id + 1).max(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_advances_past_seen_update() {
        assert_eq!(next_offset(735, 0), 736);
        assert_eq!(next_offset(736, 736), 737);
    }

    #[test]
    fn test_offset_never_regresses() {
        // A stale update id must not move the offset backwards.
        assert_eq!(next_offset(10, 100), 100);
    }
}
