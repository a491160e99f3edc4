use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use telegram_bot::twitter::TwitterClient;

mod settings;

const DEFAULT_TWITTER_TIMEOUT_SECS: u64 = 10;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "chiffon={level},telegram_bot={level},registry={level}",
            level = settings.app.level
        ))
        .init();

    let database = parse_database(&settings.database).await?;
    let registry = registry::Registry::builder().database(database).build().await?;

    let twitter = build_twitter_client(settings.twitter.as_ref());
    let default_handle = settings
        .twitter
        .as_ref()
        .and_then(|twitter| twitter.default_handle.clone());

    let bot = telegram_bot::Bot::builder()
        .token(&settings.telegram.token)
        .registry(registry)
        .files_dir(&settings.files.dir)
        .twitter(twitter, default_handle)
        .build()?;

    bot.run().await;

    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        settings::Database::Memory => String::from("sqlite::memory:"),
        settings::Database::Sqlite { path } => format!("sqlite:{path}?mode=rwc"),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}

/// Builds the Twitter client once at startup.
///
/// Missing or unusable credentials disable the sync feature with a visible
/// warning instead of failing the whole process.
fn build_twitter_client(config: Option<&settings::Twitter>) -> Option<TwitterClient> {
    let Some(config) = config else {
        tracing::warn!("Twitter credentials not configured; /sync_twitter is disabled");
        return None;
    };
    if config.bearer_token.trim().is_empty() {
        tracing::warn!("Twitter bearer token is empty; /sync_twitter is disabled");
        return None;
    }

    let timeout = Duration::from_secs(
        config.timeout_secs.unwrap_or(DEFAULT_TWITTER_TIMEOUT_SECS),
    );
    match TwitterClient::new(&config.bearer_token, timeout) {
        Ok(client) => Some(client),
        Err(err) => {
            tracing::warn!("failed to initialize Twitter client; /sync_twitter is disabled: {err}");
            None
        }
    }
}
