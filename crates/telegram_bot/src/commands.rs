//! Command structs

use teloxide::utils::command::BotCommands;

/// Entry commands available to everyone.
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum BaseCommands {
    #[command(description = "Initialize the bot.")]
    Start,
    #[command(description = "Show the command list.")]
    Help,
}

/// Daily fortune command.
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
pub enum FortuneCommands {
    #[command(description = "Today's fortune.")]
    Fortune,
}

/// Upload command. Bare document/photo messages take the same path.
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
pub enum UploadCommands {
    #[command(description = "Upload a file or photo.")]
    Upload,
}

/// Raw argument tail of a `/manage_user` invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManageUserArgs(pub String);

/// Handle argument of a `/sync_twitter` invocation, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncTwitterArgs(pub Option<String>);

pub fn parse_manage_user(text: &str) -> Option<ManageUserArgs> {
    command_tail(text, "manage_user").map(|tail| ManageUserArgs(tail.to_string()))
}

pub fn parse_sync_twitter(text: &str) -> Option<SyncTwitterArgs> {
    command_tail(text, "sync_twitter")
        .map(|tail| SyncTwitterArgs((!tail.is_empty()).then(|| tail.to_string())))
}

/// Splits `/cmd@botname args...` and returns the trimmed tail when the
/// command token matches `name` exactly (case-sensitive).
fn command_tail<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    let rest = text.trim().strip_prefix('/')?;
    let mut parts = rest.splitn(2, char::is_whitespace);
    let token = parts.next().unwrap_or("");
    let tail = parts.next().unwrap_or("").trim();

    let token = token.split('@').next().unwrap_or(token);
    (token == name).then_some(tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manage_user_matches_with_and_without_args() {
        assert_eq!(
            parse_manage_user("/manage_user"),
            Some(ManageUserArgs(String::new()))
        );
        assert_eq!(
            parse_manage_user("/manage_user setrole 7 admin"),
            Some(ManageUserArgs("setrole 7 admin".to_string()))
        );
        assert_eq!(
            parse_manage_user("/manage_user@chiffon_bot list"),
            Some(ManageUserArgs("list".to_string()))
        );
    }

    #[test]
    fn command_match_is_exact_and_case_sensitive() {
        assert_eq!(parse_manage_user("/manage_users"), None);
        assert_eq!(parse_manage_user("/Manage_User"), None);
        assert_eq!(parse_manage_user("manage_user list"), None);
        assert_eq!(parse_sync_twitter("/sync_twitterx"), None);
    }

    #[test]
    fn sync_twitter_handle_is_optional() {
        assert_eq!(parse_sync_twitter("/sync_twitter"), Some(SyncTwitterArgs(None)));
        assert_eq!(
            parse_sync_twitter("/sync_twitter TwitterDev"),
            Some(SyncTwitterArgs(Some("TwitterDev".to_string())))
        );
    }
}
