//! User CLI commands
//!
//! Registration, role changes and the logged-in identity.

use clap::Subcommand;

use crate::auth::Operation;
use crate::config::Settings;
use crate::display::{format_session, format_user_list};
use crate::error::{LedgerError, LedgerResult};
use crate::models::Role;
use crate::services::UserService;
use crate::storage::Storage;

use super::auth::Credentials;

/// User subcommands
#[derive(Subcommand)]
pub enum UserCommands {
    /// Register a new user (password from --password, the environment, or a prompt)
    Register {
        /// Username
        username: String,
        /// Role: accountant or viewer
        #[arg(short, long, default_value = "accountant")]
        role: String,
    },
    /// Change a user's role (accountants only)
    SetRole {
        /// Username to change
        username: String,
        /// New role: accountant or viewer
        role: String,
    },
    /// Show the logged-in user
    Whoami,
    /// List registered users (accountants only)
    List,
}

/// Handle a user command
pub fn handle_user_command(
    storage: &Storage,
    settings: &Settings,
    credentials: &Credentials,
    cmd: UserCommands,
) -> LedgerResult<()> {
    let service = UserService::with_params(storage, settings.password_hashing.clone());

    match cmd {
        UserCommands::Register { username, role } => {
            let role = parse_role(&role)?;
            let password = credentials.new_password()?;
            let user = service.register(&username, &password, role)?;
            println!("Registered user '{}' as {}", user.username, user.role);
        }
        UserCommands::SetRole { username, role } => {
            let role = parse_role(&role)?;
            let session = credentials.login(storage, settings)?;
            let user = service.set_role(&session, &username, role)?;
            println!("User '{}' is now {}", user.username, user.role);
        }
        UserCommands::Whoami => {
            let session = credentials.login(storage, settings)?;
            print!("{}", format_session(&session));
        }
        UserCommands::List => {
            credentials.login_for(storage, settings, Operation::ManageUsers)?;
            print!("{}", format_user_list(&service.list()?));
        }
    }

    Ok(())
}

fn parse_role(s: &str) -> LedgerResult<Role> {
    Role::parse(s).ok_or_else(|| {
        LedgerError::Validation(format!(
            "Unknown role '{}'. Expected accountant or viewer",
            s
        ))
    })
}
