pub mod adherence;
pub mod init;
pub mod med;
pub mod reminder;
pub mod tick;

use pillbox::models::config::Config;

/// `--user` flag wins; otherwise the configured default user.
pub(crate) fn resolve_user(config: &Config, user: Option<&str>) -> String {
    user.map(String::from)
        .unwrap_or_else(|| config.profile.user.clone())
}
