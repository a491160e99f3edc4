//! User records.
//!
//! A `User` is one known Telegram account. The platform id is the primary
//! key, so there is exactly one row per account; leaving a group only flips
//! `is_active`, it never deletes the row.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::{RegistryError, Role};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub telegram_id: u64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub left_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(
        telegram_id: u64,
        username: Option<String>,
        first_name: Option<String>,
        last_name: Option<String>,
        role: Role,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            telegram_id,
            username,
            first_name,
            last_name,
            role,
            is_active: true,
            created_at,
            updated_at: created_at,
            left_at: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub telegram_id: String,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub left_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for User {
    type Error = RegistryError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let telegram_id = model
            .telegram_id
            .parse::<u64>()
            .map_err(|_| RegistryError::InvalidId(model.telegram_id.clone()))?;
        let role = Role::try_from(model.role.as_str())?;
        Ok(Self {
            telegram_id,
            username: model.username,
            first_name: model.first_name,
            last_name: model.last_name,
            role,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
            left_at: model.left_at,
        })
    }
}

impl From<&User> for ActiveModel {
    fn from(user: &User) -> Self {
        Self {
            telegram_id: ActiveValue::Set(user.telegram_id.to_string()),
            username: ActiveValue::Set(user.username.clone()),
            first_name: ActiveValue::Set(user.first_name.clone()),
            last_name: ActiveValue::Set(user.last_name.clone()),
            role: ActiveValue::Set(user.role.as_str().to_string()),
            is_active: ActiveValue::Set(user.is_active),
            created_at: ActiveValue::Set(user.created_at),
            updated_at: ActiveValue::Set(user.updated_at),
            left_at: ActiveValue::Set(user.left_at),
        }
    }
}
