//! UI/backend events and error modeling for the directory controller.

use std::fmt;

use client_core::ClientError;
use shared::domain::User;

use crate::controller::state::MutationOrigin;

#[derive(Debug)]
pub enum UiEvent {
    Info(String),
    UsersLoaded {
        generation: u64,
        users: Vec<User>,
    },
    MutationApplied(MutationOrigin),
    /// The server refused a create/update; `message` is shown verbatim.
    MutationRejected {
        session: u64,
        message: String,
    },
    /// A create/update never got an answer (transport or decode failure).
    SubmissionFailed {
        session: u64,
        error: UiError,
    },
    /// Blocking notification the user has to dismiss.
    Notice(String),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Decode,
    Startup,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    LoadUsers,
    SubmitUser,
    DeleteUser,
}

impl UiErrorContext {
    fn label(self) -> &'static str {
        match self {
            UiErrorContext::BackendStartup => "Backend startup",
            UiErrorContext::LoadUsers => "Loading users",
            UiErrorContext::SubmitUser => "Saving user",
            UiErrorContext::DeleteUser => "Deleting user",
        }
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_client(context: UiErrorContext, err: &ClientError) -> Self {
        let category = match err {
            ClientError::Transport(_) => UiErrorCategory::Transport,
            ClientError::Decode { .. } => UiErrorCategory::Decode,
            _ => UiErrorCategory::Unknown,
        };
        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    pub fn startup(message: impl Into<String>) -> Self {
        Self {
            category: UiErrorCategory::Startup,
            context: UiErrorContext::BackendStartup,
            message: message.into(),
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Short text for the status bar.
    pub fn status_line(&self) -> String {
        let summary = match self.category {
            UiErrorCategory::Transport => "server unreachable; check the server URL and network",
            UiErrorCategory::Decode => "server sent an unexpected response",
            UiErrorCategory::Startup => "backend worker failed to start",
            UiErrorCategory::Unknown => "unexpected error",
        };
        format!("{} failed: {summary}", self.context.label())
    }
}

impl fmt::Display for UiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.context.label(), self.message)
    }
}
