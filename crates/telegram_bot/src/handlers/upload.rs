//! Handler for file and photo uploads.
//!
//! `/upload` and bare document/photo messages take the same path: the
//! attachment is fetched from the platform and handed to the blob store.

use std::path::PathBuf;

use teloxide::{
    RequestError,
    dispatching::{HandlerExt, UpdateHandler},
    net::Download,
    prelude::*,
    types::FileId,
};

use crate::{ConfigParameters, commands::UploadCommands};

use super::GENERIC_FAILURE;

/// Build the schema for upload commands and attachment messages
pub(super) fn schema() -> UpdateHandler<RequestError> {
    Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<UploadCommands>()
                .endpoint(handle_upload),
        )
        .branch(
            dptree::filter(|msg: Message| msg.document().is_some() || msg.photo().is_some())
                .endpoint(handle_upload),
        )
}

async fn handle_upload(bot: Bot, cfg: ConfigParameters, msg: Message) -> ResponseResult<()> {
    if let Some(document) = msg.document() {
        let name = document
            .file_name
            .clone()
            .unwrap_or_else(|| format!("document_{}", document.file.unique_id));
        match fetch_and_store(&bot, &cfg, document.file.id.clone(), &name).await? {
            Some(path) => {
                tracing::info!("Stored file {}", path.display());
                bot.send_message(msg.chat.id, format!("File {name} uploaded!"))
                    .await?;
            }
            None => {
                bot.send_message(msg.chat.id, GENERIC_FAILURE).await?;
            }
        }
        return Ok(());
    }

    // Highest resolution size comes last.
    if let Some([.., photo]) = msg.photo() {
        let name = format!("photo_{}.jpg", photo.file.unique_id);
        match fetch_and_store(&bot, &cfg, photo.file.id.clone(), &name).await? {
            Some(path) => {
                tracing::info!("Stored photo {}", path.display());
                bot.send_message(msg.chat.id, "Photo uploaded!").await?;
            }
            None => {
                bot.send_message(msg.chat.id, GENERIC_FAILURE).await?;
            }
        }
        return Ok(());
    }

    tracing::warn!("upload triggered without an attachment in chat {}", msg.chat.id);
    bot.send_message(msg.chat.id, "Please attach a file or photo!")
        .await?;
    Ok(())
}

/// Downloads a file from the platform and hands it to the blob store.
///
/// Returns `None` when the download or the store fails; the caller replies
/// with a generic failure.
async fn fetch_and_store(
    bot: &Bot,
    cfg: &ConfigParameters,
    file_id: FileId,
    name: &str,
) -> ResponseResult<Option<PathBuf>> {
    let file = bot.get_file(file_id).await?;

    let mut bytes: Vec<u8> = Vec::with_capacity(file.meta.size as usize);
    if let Err(err) = bot.download_file(&file.path, &mut bytes).await {
        tracing::error!("failed to download {name}: {err}");
        return Ok(None);
    }

    match cfg.files.store_blob(name, &bytes).await {
        Ok(path) => Ok(Some(path)),
        Err(err) => {
            tracing::error!("failed to store {name}: {err}");
            Ok(None)
        }
    }
}
