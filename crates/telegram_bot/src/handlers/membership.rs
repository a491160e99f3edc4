//! Handlers for group membership service messages.
//!
//! Joins upsert the user and append a `join` audit row; leaves flip the user
//! inactive and append a `leave` row. Bot accounts are skipped entirely.

use registry::{EventKind, Registry, RegistryError};
use teloxide::{RequestError, dispatching::UpdateHandler, prelude::*, types::User};

use crate::ConfigParameters;

/// Build the schema for membership service messages
pub(super) fn schema() -> UpdateHandler<RequestError> {
    Update::filter_message()
        .branch(
            dptree::filter(|msg: Message| msg.new_chat_members().is_some())
                .endpoint(handle_new_members),
        )
        .branch(
            dptree::filter(|msg: Message| msg.left_chat_member().is_some())
                .endpoint(handle_member_left),
        )
}

async fn handle_new_members(cfg: ConfigParameters, msg: Message) -> ResponseResult<()> {
    let Some(members) = msg.new_chat_members() else {
        return Ok(());
    };

    for member in members {
        match observe_join(&cfg.registry, member, msg.chat.id.0, msg.chat.title()).await {
            Ok(true) => tracing::info!("Member {} joined chat {}", member.id, msg.chat.id),
            Ok(false) => {}
            Err(err) => {
                tracing::error!("failed to record join of {} in {}: {err}", member.id, msg.chat.id);
            }
        }
    }

    Ok(())
}

async fn handle_member_left(cfg: ConfigParameters, msg: Message) -> ResponseResult<()> {
    let Some(member) = msg.left_chat_member() else {
        return Ok(());
    };

    match observe_leave(&cfg.registry, member, msg.chat.id.0, msg.chat.title()).await {
        Ok(true) => tracing::info!("Member {} left chat {}", member.id, msg.chat.id),
        Ok(false) => {}
        Err(err) => {
            tracing::error!("failed to record leave of {} in {}: {err}", member.id, msg.chat.id);
        }
    }

    Ok(())
}

/// Registers one joined member. Bots are ignored; returns whether anything
/// was recorded.
async fn observe_join(
    registry: &Registry,
    member: &User,
    chat_id: i64,
    chat_title: Option<&str>,
) -> Result<bool, RegistryError> {
    if member.is_bot {
        return Ok(false);
    }

    registry
        .upsert_user(
            member.id.0,
            member.username.as_deref(),
            Some(member.first_name.as_str()),
            member.last_name.as_deref(),
            None,
        )
        .await?;
    registry
        .record_membership_event(
            member.id.0,
            chat_id,
            EventKind::Join.as_str(),
            chat_title,
            member.username.as_deref(),
        )
        .await?;
    Ok(true)
}

/// Marks one departed member inactive. Bots are ignored; returns whether
/// anything was recorded.
async fn observe_leave(
    registry: &Registry,
    member: &User,
    chat_id: i64,
    chat_title: Option<&str>,
) -> Result<bool, RegistryError> {
    if member.is_bot {
        return Ok(false);
    }

    registry.mark_inactive(member.id.0).await?;
    registry
        .record_membership_event(
            member.id.0,
            chat_id,
            EventKind::Leave.as_str(),
            chat_title,
            member.username.as_deref(),
        )
        .await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use migration::MigratorTrait;
    use sea_orm::Database;
    use teloxide::types::UserId;

    use super::*;

    async fn registry_with_db() -> Registry {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        Registry::builder().database(db).build().await.unwrap()
    }

    fn member(id: u64, username: &str, is_bot: bool) -> User {
        User {
            id: UserId(id),
            is_bot,
            first_name: "Test".to_string(),
            last_name: None,
            username: Some(username.to_string()),
            language_code: None,
            is_premium: false,
            added_to_attachment_menu: false,
        }
    }

    #[tokio::test]
    async fn join_registers_user_and_event() {
        let registry = registry_with_db().await;

        let recorded = observe_join(&registry, &member(42, "alice", false), -100, Some("testers"))
            .await
            .unwrap();

        assert!(recorded);
        let user = registry.user(42).await.unwrap().unwrap();
        assert!(user.is_active);
        let events = registry.membership_events(42).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, EventKind::Join);
        assert_eq!(events[0].chat_title.as_deref(), Some("testers"));
    }

    #[tokio::test]
    async fn bot_accounts_are_ignored() {
        let registry = registry_with_db().await;

        let recorded = observe_join(&registry, &member(9, "helper_bot", true), -100, None)
            .await
            .unwrap();

        assert!(!recorded);
        assert!(registry.user(9).await.unwrap().is_none());
        assert!(registry.membership_events(9).await.unwrap().is_empty());

        let recorded = observe_leave(&registry, &member(9, "helper_bot", true), -100, None)
            .await
            .unwrap();
        assert!(!recorded);
        assert!(registry.membership_events(9).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn leave_then_rejoin_reuses_the_row() {
        let registry = registry_with_db().await;
        let alice = member(42, "alice", false);

        observe_join(&registry, &alice, -100, None).await.unwrap();
        observe_leave(&registry, &alice, -100, None).await.unwrap();

        let user = registry.user(42).await.unwrap().unwrap();
        assert!(!user.is_active);
        assert!(user.left_at.is_some());

        observe_join(&registry, &alice, -100, None).await.unwrap();

        let user = registry.user(42).await.unwrap().unwrap();
        assert!(user.is_active);
        assert!(user.left_at.is_none());

        // The only trace of the cycle is the audit log.
        let kinds: Vec<EventKind> = registry
            .membership_events(42)
            .await
            .unwrap()
            .iter()
            .map(|event| event.event)
            .collect();
        assert_eq!(kinds, vec![EventKind::Join, EventKind::Leave, EventKind::Join]);
    }

    #[tokio::test]
    async fn leave_of_unknown_member_still_logs_the_event() {
        let registry = registry_with_db().await;

        let recorded = observe_leave(&registry, &member(7, "ghost", false), -100, None)
            .await
            .unwrap();

        assert!(recorded);
        assert!(registry.user(7).await.unwrap().is_none());
        assert_eq!(registry.membership_events(7).await.unwrap().len(), 1);
    }
}
