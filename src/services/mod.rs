//! Services module
//!
//! This module contains business logic services

pub mod access;
pub mod account;
pub mod linking;

// Re-export commonly used services
pub use access::{AccessService, Capability, Subject};
pub use account::{AccountService, Claims};
pub use linking::LinkingService;

use crate::bot::client::TelegramClient;
use crate::config::Settings;
use crate::database::DatabaseService;

/// Service factory for creating and managing all services
#[derive(Debug, Clone)]
pub struct ServiceFactory {
    pub accounts: AccountService,
    pub access: AccessService,
    pub linking: LinkingService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(db: DatabaseService, client: TelegramClient, settings: &Settings) -> Self {
        let accounts = AccountService::new(db.users.clone(), settings.auth.clone());
        let access = AccessService::new(db.clone());
        let linking = LinkingService::new(db.tg_links.clone(), client);

        Self {
            accounts,
            access,
            linking,
        }
    }
}
