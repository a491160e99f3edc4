//! Handler for the /fortune command.

use chrono::{NaiveDate, Utc};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use sha2::{Digest, Sha256};
use teloxide::{
    RequestError,
    dispatching::{HandlerExt, UpdateHandler},
    prelude::*,
};

use crate::commands::FortuneCommands;

const FORTUNES: &[&str] = &[
    "A lucky day ahead. Keep smiling!",
    "Move carefully and a surprise will find you.",
    "Effort pays off today. Hold on!",
    "A good day for thinking and planning.",
    "Relax and enjoy the small pleasures of life.",
];

/// Build the schema for `FortuneCommands` commands
pub(super) fn schema() -> UpdateHandler<RequestError> {
    Update::filter_message()
        .filter_command::<FortuneCommands>()
        .endpoint(handle_fortune)
}

async fn handle_fortune(bot: Bot, msg: Message, cmd: FortuneCommands) -> ResponseResult<()> {
    let FortuneCommands::Fortune = cmd;
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };

    let fortune = fortune_for(user.id.0, Utc::now().date_naive());
    bot.send_message(msg.chat.id, fortune).await?;
    Ok(())
}

/// Picks the fortune for `(user, date)`.
///
/// Same user and same UTC calendar day always draw the same entry, across
/// process restarts; other days and other users are independent draws.
fn fortune_for(user_id: u64, date: NaiveDate) -> &'static str {
    let mut rng = StdRng::seed_from_u64(seed_for(user_id, date));
    FORTUNES.choose(&mut rng).copied().unwrap_or(FORTUNES[0])
}

/// Derives the daily seed: the first 4 bytes of `sha256("{user_id}:{date}")`
/// read big-endian, the date formatted as `YYYY-MM-DD`.
fn seed_for(user_id: u64, date: NaiveDate) -> u64 {
    let digest = Sha256::digest(format!("{user_id}:{date}").as_bytes());
    u64::from(u32::from_be_bytes([
        digest[0], digest[1], digest[2], digest[3],
    ]))
}
