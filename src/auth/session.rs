//! Request-scoped authentication context

use chrono::{DateTime, Utc};

use crate::models::{Role, User, UserId};

/// Who is making a request. Obtained from
/// [`UserService::authenticate`](crate::services::UserService::authenticate)
/// and passed explicitly into every operation that needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user_id: UserId,
    username: String,
    role: Role,
    authenticated_at: DateTime<Utc>,
}

impl Session {
    pub(crate) fn for_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            role: user.role,
            authenticated_at: Utc::now(),
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Role at login time. Posting re-reads the stored role.
    pub fn role(&self) -> Role {
        self.role
    }

    pub fn authenticated_at(&self) -> DateTime<Utc> {
        self.authenticated_at
    }
}
