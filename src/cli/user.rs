//! User CLI commands
//!
//! Users own groups; the active user is kept in the settings file.

use clap::Subcommand;

use crate::config::paths::LedgerPaths;
use crate::config::settings::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::services::UserService;
use crate::storage::Storage;

/// User subcommands
#[derive(Subcommand)]
pub enum UserCommands {
    /// Create a new user
    Create {
        /// Display name
        name: String,
        /// Email address (must be unique)
        #[arg(short, long)]
        email: Option<String>,
        /// Make the new user the active user
        #[arg(long)]
        switch: bool,
    },
    /// List all users
    List,
    /// Make another user the active user
    Switch {
        /// User name, email or ID
        user: String,
    },
}

/// Handle a user command
pub fn handle_user_command(
    storage: &Storage,
    paths: &LedgerPaths,
    settings: &mut Settings,
    cmd: UserCommands,
) -> LedgerResult<()> {
    let service = UserService::new(storage);

    match cmd {
        UserCommands::Create {
            name,
            email,
            switch,
        } => {
            let user = service.create(&name, email.as_deref())?;
            println!("Created user: {}", user.name);
            if let Some(email) = &user.email {
                println!("  Email: {}", email);
            }
            println!("  ID: {}", user.id);

            if switch || settings.active_user_id.is_none() {
                settings.active_user_id = Some(user.id);
                settings.save(paths)?;
                println!("Active user is now {}", user.name);
            }
        }

        UserCommands::List => {
            let users = service.list()?;
            if users.is_empty() {
                println!("No users. Run 'splitledger init --name <NAME>' to get started.");
                return Ok(());
            }
            for user in users {
                let marker = if settings.active_user_id == Some(user.id) {
                    "*"
                } else {
                    " "
                };
                println!(
                    "{} {:<12}  {:<20}  {}",
                    marker,
                    user.id.to_string(),
                    user.name,
                    user.email.as_deref().unwrap_or("")
                );
            }
        }

        UserCommands::Switch { user } => {
            let found = service
                .find(&user)?
                .ok_or_else(|| LedgerError::user_not_found(&user))?;
            settings.active_user_id = Some(found.id);
            settings.save(paths)?;
            println!("Active user is now {}", found.name);
        }
    }

    Ok(())
}
