//! User display formatting

use crate::auth::Session;
use crate::models::User;

/// Format the current session
pub fn format_session(session: &Session) -> String {
    format!(
        "User:  {}\nRole:  {}\nID:    {}\n",
        session.username(),
        session.role(),
        session.user_id().as_uuid()
    )
}

/// Format a list of users
pub fn format_user_list(users: &[User]) -> String {
    if users.is_empty() {
        return "No users registered.\n".to_string();
    }

    let mut output = format!("{:<24} {:<12} {}\n", "Username", "Role", "Registered");
    output.push_str(&"-".repeat(56));
    output.push('\n');
    for user in users {
        output.push_str(&format!(
            "{:<24} {:<12} {}\n",
            user.username,
            user.role.to_string(),
            user.created_at.format("%Y-%m-%d")
        ));
    }
    output
}
