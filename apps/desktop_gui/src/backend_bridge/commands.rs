//! Backend commands queued from UI to backend worker.

use shared::domain::{UserFields, UserId};
use tokio_util::sync::CancellationToken;

/// One open/close cycle of the user form. Requests issued from the form are
/// abandoned once the session's token is cancelled.
#[derive(Debug, Clone)]
pub struct ModalSession {
    id: u64,
    token: CancellationToken,
}

impl ModalSession {
    pub fn new(id: u64, token: CancellationToken) -> Self {
        Self { id, token }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    #[cfg(test)]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[derive(Debug)]
pub enum BackendCommand {
    FetchUsers {
        generation: u64,
        cancel: CancellationToken,
    },
    CreateUser {
        session: ModalSession,
        fields: UserFields,
    },
    UpdateUser {
        session: ModalSession,
        id: UserId,
        fields: UserFields,
    },
    DeleteUser {
        id: UserId,
        cancel: CancellationToken,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::FetchUsers { .. } => "fetch_users",
            BackendCommand::CreateUser { .. } => "create_user",
            BackendCommand::UpdateUser { .. } => "update_user",
            BackendCommand::DeleteUser { .. } => "delete_user",
        }
    }
}
