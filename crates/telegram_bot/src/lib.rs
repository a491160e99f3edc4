//! Telegram bot.
//!
//! Handlers talk to the user registry directly and receive the social read
//! client and the upload store as injected collaborators; nothing reaches
//! for a global.

use std::path::PathBuf;
use std::sync::Arc;

use registry::Registry;
use teloxide::prelude::*;

use crate::{storage::FileStore, twitter::TwitterClient};

pub mod twitter;

mod commands;
mod handlers;
mod storage;

const DEFAULT_FILES_DIR: &str = "files";

#[derive(Clone)]
pub struct ConfigParameters {
    registry: Arc<Registry>,
    files: FileStore,
    twitter: Option<TwitterClient>,
    default_twitter_handle: Option<String>,
}

pub struct Bot {
    token: String,
    registry: Arc<Registry>,
    files_dir: PathBuf,
    twitter: Option<TwitterClient>,
    default_twitter_handle: Option<String>,
}

impl Bot {
    pub fn builder() -> BotBuilder {
        BotBuilder::default()
    }

    /// Run the telegram bot.
    pub async fn run(&self) {
        tracing::info!("Starting telegram bot...");

        let bot = teloxide::Bot::new(&self.token);
        let parameters = ConfigParameters {
            registry: self.registry.clone(),
            files: FileStore::new(self.files_dir.clone()),
            twitter: self.twitter.clone(),
            default_twitter_handle: self.default_twitter_handle.clone(),
        };

        Dispatcher::builder(bot, handlers::schema())
            .dependencies(dptree::deps![parameters])
            .default_handler(|upd| async move {
                tracing::warn!("Unhandled update: {:?}", upd);
            })
            .error_handler(LoggingErrorHandler::with_custom_text(
                "An error has occurred in the dispatcher",
            ))
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }
}

#[derive(Default, Debug)]
pub struct BotBuilder {
    token: String,
    registry: Option<Arc<Registry>>,
    files_dir: Option<PathBuf>,
    twitter: Option<TwitterClient>,
    default_twitter_handle: Option<String>,
}

impl BotBuilder {
    pub fn token(mut self, token: &str) -> BotBuilder {
        self.token = token.to_string();
        self
    }

    /// Pass the required user registry.
    pub fn registry(mut self, registry: Registry) -> BotBuilder {
        self.registry = Some(Arc::new(registry));
        self
    }

    /// Directory where uploaded files and photos land.
    pub fn files_dir(mut self, dir: impl Into<PathBuf>) -> BotBuilder {
        self.files_dir = Some(dir.into());
        self
    }

    /// Pass the social read client (`None` disables `/sync_twitter`) and the
    /// fallback handle used when the command has no argument.
    pub fn twitter(
        mut self,
        client: Option<TwitterClient>,
        default_handle: Option<String>,
    ) -> BotBuilder {
        self.twitter = client;
        self.default_twitter_handle = default_handle;
        self
    }

    pub fn build(self) -> Result<Bot, String> {
        tracing::info!("Initializing telegram bot...");
        if self.token.is_empty() {
            return Err("missing telegram token".to_string());
        }
        let registry = self.registry.ok_or_else(|| "missing registry".to_string())?;
        Ok(Bot {
            token: self.token,
            registry,
            files_dir: self
                .files_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_FILES_DIR)),
            twitter: self.twitter,
            default_twitter_handle: self.default_twitter_handle,
        })
    }
}
