use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{ResultRegistry, Role, User, users};

use super::{Registry, normalize_optional_text, with_tx};

impl Registry {
    /// Inserts or updates a user keyed by `telegram_id`.
    ///
    /// Display fields are only overwritten by non-empty values, `role` only
    /// when explicitly supplied. The row always comes back active with
    /// `left_at` cleared, so a leave-then-rejoin reuses the original row.
    pub async fn upsert_user(
        &self,
        telegram_id: u64,
        username: Option<&str>,
        first_name: Option<&str>,
        last_name: Option<&str>,
        role: Option<Role>,
    ) -> ResultRegistry<User> {
        let now = Utc::now();
        let username = normalize_optional_text(username);
        let first_name = normalize_optional_text(first_name);
        let last_name = normalize_optional_text(last_name);

        with_tx!(self, |db_tx| {
            let existing = users::Entity::find_by_id(telegram_id.to_string())
                .one(&db_tx)
                .await?;

            let model = match existing {
                Some(model) => {
                    let mut active = users::ActiveModel {
                        telegram_id: ActiveValue::Set(model.telegram_id),
                        is_active: ActiveValue::Set(true),
                        left_at: ActiveValue::Set(None),
                        updated_at: ActiveValue::Set(now),
                        ..Default::default()
                    };
                    if let Some(username) = username {
                        active.username = ActiveValue::Set(Some(username));
                    }
                    if let Some(first_name) = first_name {
                        active.first_name = ActiveValue::Set(Some(first_name));
                    }
                    if let Some(last_name) = last_name {
                        active.last_name = ActiveValue::Set(Some(last_name));
                    }
                    if let Some(role) = role {
                        active.role = ActiveValue::Set(role.as_str().to_string());
                    }
                    active.update(&db_tx).await?
                }
                None => {
                    let user = User::new(
                        telegram_id,
                        username,
                        first_name,
                        last_name,
                        role.unwrap_or(Role::Member),
                        now,
                    );
                    users::ActiveModel::from(&user).insert(&db_tx).await?
                }
            };

            User::try_from(model)
        })
    }

    /// Returns the user's record, if known.
    pub async fn user(&self, telegram_id: u64) -> ResultRegistry<Option<User>> {
        let model = users::Entity::find_by_id(telegram_id.to_string())
            .one(&self.database)
            .await?;
        model.map(User::try_from).transpose()
    }

    /// Changes a user's role. Returns `None` for an unknown id; no row is
    /// created.
    pub async fn set_role(&self, telegram_id: u64, role: Role) -> ResultRegistry<Option<User>> {
        let now = Utc::now();
        with_tx!(self, |db_tx| {
            let existing = users::Entity::find_by_id(telegram_id.to_string())
                .one(&db_tx)
                .await?;

            let model = match existing {
                Some(model) => {
                    let active = users::ActiveModel {
                        telegram_id: ActiveValue::Set(model.telegram_id),
                        role: ActiveValue::Set(role.as_str().to_string()),
                        updated_at: ActiveValue::Set(now),
                        ..Default::default()
                    };
                    Some(active.update(&db_tx).await?)
                }
                None => None,
            };

            model.map(User::try_from).transpose()
        })
    }

    /// Lists every known user in registration order.
    pub async fn list_users(&self) -> ResultRegistry<Vec<User>> {
        let models = users::Entity::find()
            .order_by_asc(users::Column::CreatedAt)
            .all(&self.database)
            .await?;
        models.into_iter().map(User::try_from).collect()
    }

    /// Hard-deletes a user row. Returns whether a row existed.
    pub async fn remove_user(&self, telegram_id: u64) -> ResultRegistry<bool> {
        with_tx!(self, |db_tx| {
            let result = users::Entity::delete_by_id(telegram_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(result.rows_affected > 0)
        })
    }

    /// Marks a user as having left. Returns `None` for an unknown id; no row
    /// is created.
    pub async fn mark_inactive(&self, telegram_id: u64) -> ResultRegistry<Option<User>> {
        let now = Utc::now();
        with_tx!(self, |db_tx| {
            let existing = users::Entity::find_by_id(telegram_id.to_string())
                .one(&db_tx)
                .await?;

            let model = match existing {
                Some(model) => {
                    let active = users::ActiveModel {
                        telegram_id: ActiveValue::Set(model.telegram_id),
                        is_active: ActiveValue::Set(false),
                        left_at: ActiveValue::Set(Some(now)),
                        updated_at: ActiveValue::Set(now),
                        ..Default::default()
                    };
                    Some(active.update(&db_tx).await?)
                }
                None => None,
            };

            model.map(User::try_from).transpose()
        })
    }

    /// Returns whether the user currently holds one of `roles`. Unknown
    /// users hold no role.
    pub async fn has_role(&self, telegram_id: u64, roles: &[Role]) -> ResultRegistry<bool> {
        let user = self.user(telegram_id).await?;
        Ok(user.is_some_and(|user| roles.contains(&user.role)))
    }

    /// Returns whether any admin is registered.
    pub async fn has_admin(&self) -> ResultRegistry<bool> {
        let exists = users::Entity::find()
            .filter(users::Column::Role.eq(Role::Admin.as_str()))
            .one(&self.database)
            .await?
            .is_some();
        Ok(exists)
    }
}
