//! Handler for user and role management (/manage_user).

use registry::{AdminAction, Registry, RegistryError, Role, User, is_authorized};
use teloxide::{RequestError, dispatching::UpdateHandler, prelude::*};

use crate::{
    ConfigParameters,
    commands::{ManageUserArgs, parse_manage_user},
};

use super::GENERIC_FAILURE;

const USAGE_TEXT: &str = "Usage: /manage_user <register|setrole|remove|list> ...\n\
                          Examples:\n\
                          \x20 /manage_user register\n\
                          \x20 /manage_user setrole <telegram_id> <member|admin>\n\
                          \x20 /manage_user remove <telegram_id>\n\
                          \x20 /manage_user list";

const SETROLE_USAGE: &str = "Usage: /manage_user setrole <telegram_id> <member|admin>";
const REMOVE_USAGE: &str = "Usage: /manage_user remove <telegram_id>";
const NOT_A_NUMBER: &str = "telegram_id must be a number";
const DENIED: &str = "Only admins can run this command. Register with /manage_user register and ask an admin for access.";

/// Build the schema for the /manage_user command
pub(super) fn schema() -> UpdateHandler<RequestError> {
    Update::filter_message()
        .filter_map(|msg: Message| msg.text().and_then(parse_manage_user))
        .endpoint(handle_manage_user)
}

/// Identity of the user issuing the command.
#[derive(Clone, Debug)]
struct Actor {
    id: u64,
    username: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
}

async fn handle_manage_user(
    bot: Bot,
    cfg: ConfigParameters,
    msg: Message,
    args: ManageUserArgs,
) -> ResponseResult<()> {
    let Some(from) = msg.from.as_ref() else {
        bot.send_message(msg.chat.id, "Could not identify the user.")
            .await?;
        return Ok(());
    };

    let actor = Actor {
        id: from.id.0,
        username: from.username.clone(),
        first_name: Some(from.first_name.clone()),
        last_name: from.last_name.clone(),
    };
    let args: Vec<&str> = args.0.split_whitespace().collect();

    let reply = manage_user_reply(&cfg.registry, &actor, &args).await;
    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

/// Runs the sub-command state machine and returns the reply text.
///
/// Argument validation always happens before any registry mutation, and the
/// actor's role is looked up fresh on every call.
async fn manage_user_reply(registry: &Registry, actor: &Actor, args: &[&str]) -> String {
    let Some((&subcommand, rest)) = args.split_first() else {
        return USAGE_TEXT.to_string();
    };

    let action = match subcommand {
        "register" => AdminAction::Register,
        "setrole" => AdminAction::SetRole,
        "remove" => AdminAction::Remove,
        "list" => AdminAction::List,
        _ => return USAGE_TEXT.to_string(),
    };

    if action != AdminAction::Register {
        let actor_role = match registry.user(actor.id).await {
            Ok(user) => user.map(|user| user.role),
            Err(err) => return storage_failure(err),
        };
        if !is_authorized(actor_role, action) {
            tracing::warn!("User {} tried admin command {subcommand}", actor.id);
            return DENIED.to_string();
        }
    }

    match action {
        AdminAction::Register => register(registry, actor).await,
        AdminAction::SetRole => set_role(registry, actor, rest).await,
        AdminAction::Remove => remove(registry, actor, rest).await,
        AdminAction::List => list(registry, rest).await,
    }
}

async fn register(registry: &Registry, actor: &Actor) -> String {
    let promote = match registry.has_admin().await {
        Ok(has_admin) => !has_admin,
        Err(err) => return storage_failure(err),
    };
    let role = if promote { Role::Admin } else { Role::Member };

    let record = match registry
        .upsert_user(
            actor.id,
            actor.username.as_deref(),
            actor.first_name.as_deref(),
            actor.last_name.as_deref(),
            Some(role),
        )
        .await
    {
        Ok(record) => record,
        Err(err) => return storage_failure(err),
    };

    tracing::info!(
        "Registered user {} with role {}",
        record.telegram_id,
        record.role.as_str()
    );
    let suffix = if promote {
        " (first registered user becomes admin)"
    } else {
        ""
    };
    format!(
        "User {} registered with role {}{suffix}",
        record.telegram_id,
        record.role.as_str()
    )
}

async fn set_role(registry: &Registry, actor: &Actor, args: &[&str]) -> String {
    let [target, role_name] = args else {
        return SETROLE_USAGE.to_string();
    };
    let Ok(role) = Role::try_from(*role_name) else {
        return format!("Role {role_name} is not valid. Choose one of: member, admin");
    };
    let Ok(target_id) = target.parse::<u64>() else {
        return NOT_A_NUMBER.to_string();
    };

    match registry.set_role(target_id, role).await {
        Ok(Some(record)) => {
            tracing::info!(
                "User {} set role of {} to {}",
                actor.id,
                record.telegram_id,
                record.role.as_str()
            );
            format!("User {} is now {}", record.telegram_id, record.role.as_str())
        }
        Ok(None) => {
            "User not found. Ask them to run /manage_user register or join the group first."
                .to_string()
        }
        Err(err) => storage_failure(err),
    }
}

async fn remove(registry: &Registry, actor: &Actor, args: &[&str]) -> String {
    let [target] = args else {
        return REMOVE_USAGE.to_string();
    };
    let Ok(target_id) = target.parse::<u64>() else {
        return NOT_A_NUMBER.to_string();
    };

    match registry.remove_user(target_id).await {
        Ok(true) => {
            tracing::info!("User {} removed {target_id}", actor.id);
            format!("Removed user {target_id}")
        }
        Ok(false) => "User not found".to_string(),
        Err(err) => storage_failure(err),
    }
}

async fn list(registry: &Registry, args: &[&str]) -> String {
    if !args.is_empty() {
        return USAGE_TEXT.to_string();
    }

    match registry.list_users().await {
        Ok(users) if users.is_empty() => "No registered users".to_string(),
        Ok(users) => render_user_list(&users),
        Err(err) => storage_failure(err),
    }
}

fn render_user_list(users: &[User]) -> String {
    let lines: Vec<String> = users
        .iter()
        .map(|user| {
            format!(
                "{} - {} - {} - {}",
                user.telegram_id,
                user.username.as_deref().unwrap_or("unknown"),
                user.role.as_str(),
                if user.is_active { "active" } else { "left" },
            )
        })
        .collect();
    format!("Users:\n{}", lines.join("\n"))
}

fn storage_failure(err: RegistryError) -> String {
    tracing::error!("user management failed: {err}");
    GENERIC_FAILURE.to_string()
}
