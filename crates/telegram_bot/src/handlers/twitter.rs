//! Handler for the /sync_twitter command.

use teloxide::{RequestError, dispatching::UpdateHandler, prelude::*};

use crate::{
    ConfigParameters,
    commands::{SyncTwitterArgs, parse_sync_twitter},
    twitter::TwitterError,
};

/// How many recent posts one sync forwards. Fixed by policy.
const RECENT_POST_LIMIT: u8 = 5;

/// Build the schema for the /sync_twitter command
pub(super) fn schema() -> UpdateHandler<RequestError> {
    Update::filter_message()
        .filter_map(|msg: Message| msg.text().and_then(parse_sync_twitter))
        .endpoint(handle_sync_twitter)
}

async fn handle_sync_twitter(
    bot: Bot,
    cfg: ConfigParameters,
    msg: Message,
    args: SyncTwitterArgs,
) -> ResponseResult<()> {
    let Some(client) = cfg.twitter.as_ref() else {
        bot.send_message(
            msg.chat.id,
            "Twitter sync is not configured. Add the credentials to settings.toml first.",
        )
        .await?;
        return Ok(());
    };

    let handle = match args.0.as_deref().or(cfg.default_twitter_handle.as_deref()) {
        Some(handle) => handle,
        None => {
            bot.send_message(
                msg.chat.id,
                "Provide a Twitter handle, e.g. /sync_twitter TwitterDev",
            )
            .await?;
            return Ok(());
        }
    };

    let posts = match client.recent_posts(handle, RECENT_POST_LIMIT).await {
        Ok(posts) => posts,
        Err(TwitterError::UnknownHandle(_)) => {
            bot.send_message(msg.chat.id, format!("No posts found for {handle}."))
                .await?;
            return Ok(());
        }
        Err(err) => {
            tracing::error!("failed to fetch tweets for {handle}: {err}");
            bot.send_message(msg.chat.id, "Twitter sync failed. Please try again later.")
                .await?;
            return Ok(());
        }
    };

    if posts.is_empty() {
        bot.send_message(msg.chat.id, format!("No posts found for {handle}."))
            .await?;
        return Ok(());
    }

    let count = posts.len();
    for post in posts {
        bot.send_message(msg.chat.id, format!("{}: {}", post.author, post.text))
            .await?;
    }
    tracing::info!("Synced {count} tweets for handle {handle}");

    Ok(())
}
