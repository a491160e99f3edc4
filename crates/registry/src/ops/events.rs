use chrono::Utc;
use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{EventKind, MembershipEvent, ResultRegistry, membership_events};

use super::{Registry, normalize_optional_text, with_tx};

impl Registry {
    /// Appends a join/leave observation to the audit log.
    ///
    /// `event` must be `join` or `leave`; anything else fails with
    /// `InvalidEventKind` and writes nothing. User rows are never touched
    /// here.
    pub async fn record_membership_event(
        &self,
        telegram_id: u64,
        chat_id: i64,
        event: &str,
        chat_title: Option<&str>,
        username: Option<&str>,
    ) -> ResultRegistry<()> {
        let kind = EventKind::try_from(event)?;
        let row = MembershipEvent::new(
            telegram_id,
            chat_id,
            kind,
            normalize_optional_text(chat_title),
            normalize_optional_text(username),
            Utc::now(),
        );

        with_tx!(self, |db_tx| {
            membership_events::ActiveModel::from(&row)
                .insert(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Lists a user's join/leave history, oldest first.
    pub async fn membership_events(
        &self,
        telegram_id: u64,
    ) -> ResultRegistry<Vec<MembershipEvent>> {
        let models = membership_events::Entity::find()
            .filter(membership_events::Column::TelegramId.eq(telegram_id.to_string()))
            .order_by_asc(membership_events::Column::CreatedAt)
            .all(&self.database)
            .await?;
        models.into_iter().map(MembershipEvent::try_from).collect()
    }
}
