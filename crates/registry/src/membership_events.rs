//! Membership audit events.
//!
//! One row per observed join/leave. The log is append-only and never
//! deduplicated: a user who leaves and rejoins twice produces four rows.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::RegistryError;

/// Kind of membership change observed in a chat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    Join,
    Leave,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Join => "join",
            Self::Leave => "leave",
        }
    }
}

impl TryFrom<&str> for EventKind {
    type Error = RegistryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "join" => Ok(Self::Join),
            "leave" => Ok(Self::Leave),
            other => Err(RegistryError::InvalidEventKind(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MembershipEvent {
    pub id: Uuid,
    pub telegram_id: u64,
    pub chat_id: i64,
    pub chat_title: Option<String>,
    pub username: Option<String>,
    pub event: EventKind,
    pub created_at: DateTime<Utc>,
}

impl MembershipEvent {
    pub fn new(
        telegram_id: u64,
        chat_id: i64,
        event: EventKind,
        chat_title: Option<String>,
        username: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            telegram_id,
            chat_id,
            chat_title,
            username,
            event,
            created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "membership_events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub telegram_id: String,
    pub chat_id: String,
    pub chat_title: Option<String>,
    pub username: Option<String>,
    pub event: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for MembershipEvent {
    type Error = RegistryError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&model.id).map_err(|_| RegistryError::InvalidId(model.id.clone()))?;
        let telegram_id = model
            .telegram_id
            .parse::<u64>()
            .map_err(|_| RegistryError::InvalidId(model.telegram_id.clone()))?;
        let chat_id = model
            .chat_id
            .parse::<i64>()
            .map_err(|_| RegistryError::InvalidId(model.chat_id.clone()))?;
        let event = EventKind::try_from(model.event.as_str())?;
        Ok(Self {
            id,
            telegram_id,
            chat_id,
            chat_title: model.chat_title,
            username: model.username,
            event,
            created_at: model.created_at,
        })
    }
}

impl From<&MembershipEvent> for ActiveModel {
    fn from(event: &MembershipEvent) -> Self {
        Self {
            id: ActiveValue::Set(event.id.to_string()),
            telegram_id: ActiveValue::Set(event.telegram_id.to_string()),
            chat_id: ActiveValue::Set(event.chat_id.to_string()),
            chat_title: ActiveValue::Set(event.chat_title.clone()),
            username: ActiveValue::Set(event.username.clone()),
            event: ActiveValue::Set(event.event.as_str().to_string()),
            created_at: ActiveValue::Set(event.created_at),
        }
    }
}
