//! Handlers for the /start and /help commands.

use teloxide::{
    RequestError,
    dispatching::{HandlerExt, UpdateHandler},
    prelude::*,
};

use crate::{ConfigParameters, commands::BaseCommands};

use super::GENERIC_FAILURE;

const WELCOME_TEXT: &str =
    "Hello! Welcome to the Chiffon Telegram bot. Send /help to see the supported commands.";

const HELP_TEXT: &str = "Available commands:\n\
                         /start - initialize the bot\n\
                         /help - show this help\n\
                         /fortune - today's fortune\n\
                         /upload - upload a file or photo\n\
                         /manage_user - user and permission management\n\
                         /sync_twitter - sync recent tweets";

/// Build the schema for `BaseCommands` commands
pub(super) fn schema() -> UpdateHandler<RequestError> {
    Update::filter_message()
        .filter_command::<BaseCommands>()
        .endpoint(handle_base_commands)
}

async fn handle_base_commands(
    bot: Bot,
    cfg: ConfigParameters,
    msg: Message,
    cmd: BaseCommands,
) -> ResponseResult<()> {
    match cmd {
        BaseCommands::Start => {
            if let Some(user) = msg.from.as_ref() {
                let registered = cfg
                    .registry
                    .upsert_user(
                        user.id.0,
                        user.username.as_deref(),
                        Some(user.first_name.as_str()),
                        user.last_name.as_deref(),
                        None,
                    )
                    .await;
                if let Err(err) = registered {
                    tracing::error!("failed to upsert user {}: {err}", user.id);
                    bot.send_message(msg.chat.id, GENERIC_FAILURE).await?;
                    return Ok(());
                }
                tracing::info!("User {} triggered /start", user.id);
            }
            bot.send_message(msg.chat.id, WELCOME_TEXT).await?;
        }
        BaseCommands::Help => {
            bot.send_message(msg.chat.id, HELP_TEXT).await?;
        }
    }

    Ok(())
}
