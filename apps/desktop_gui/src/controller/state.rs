//! Root view state: the user collection, modal visibility and the edit target.
//!
//! Only the transition methods below mutate it. Every successful mutation is
//! answered with a full re-fetch rather than a local patch.

use shared::domain::{EditTarget, User};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::backend_bridge::commands::{BackendCommand, ModalSession};

/// Where a completed mutation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOrigin {
    Form { session: u64 },
    Delete,
}

#[derive(Debug)]
pub struct DirectoryState {
    users: Vec<User>,
    modal_open: bool,
    edit_target: EditTarget,
    session: Option<ModalSession>,
    last_session_id: u64,
    issued_generation: u64,
    applied_generation: u64,
    lifetime: CancellationToken,
}

impl DirectoryState {
    pub fn new(lifetime: CancellationToken) -> Self {
        Self {
            users: Vec::new(),
            modal_open: false,
            edit_target: EditTarget::Create,
            session: None,
            last_session_id: 0,
            issued_generation: 0,
            applied_generation: 0,
            lifetime,
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    pub fn edit_target(&self) -> &EditTarget {
        &self.edit_target
    }

    pub fn session(&self) -> Option<&ModalSession> {
        self.session.as_ref()
    }

    pub fn is_current_session(&self, session_id: u64) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.id() == session_id)
    }

    pub fn lifetime(&self) -> &CancellationToken {
        &self.lifetime
    }

    /// Initial load: modal closed, collection requested.
    pub fn start(&mut self) -> BackendCommand {
        self.close();
        self.fetch()
    }

    /// Returns `false` and changes nothing if the modal is already open.
    pub fn open_create(&mut self) -> bool {
        self.open(EditTarget::Create)
    }

    /// Returns `false` and changes nothing if the modal is already open.
    pub fn open_edit(&mut self, user: User) -> bool {
        self.open(EditTarget::Update(user))
    }

    fn open(&mut self, target: EditTarget) -> bool {
        if self.modal_open {
            debug!("modal already open; ignoring open request");
            return false;
        }

        self.last_session_id += 1;
        self.session = Some(ModalSession::new(
            self.last_session_id,
            self.lifetime.child_token(),
        ));
        self.edit_target = target;
        self.modal_open = true;
        true
    }

    /// Closes the modal and abandons anything the form still has in flight.
    pub fn close(&mut self) {
        if let Some(session) = self.session.take() {
            session.cancel();
        }
        self.modal_open = false;
        self.edit_target = EditTarget::Create;
    }

    /// A create, update or delete succeeded. Closes the modal (unless the
    /// completion belongs to an earlier form session) and asks for exactly one
    /// re-fetch.
    pub fn complete_mutation(&mut self, origin: MutationOrigin) -> BackendCommand {
        match origin {
            MutationOrigin::Form { session } if !self.is_current_session(session) => {
                debug!(session, "completion from a previous form session");
            }
            _ => self.close(),
        }
        self.fetch()
    }

    /// Replaces the collection unless a newer fetch has already been applied.
    pub fn apply_users(&mut self, generation: u64, users: Vec<User>) -> bool {
        if generation <= self.applied_generation {
            debug!(
                generation,
                applied = self.applied_generation,
                "dropping stale user list"
            );
            return false;
        }
        self.applied_generation = generation;
        self.users = users;
        true
    }

    fn fetch(&mut self) -> BackendCommand {
        self.issued_generation += 1;
        BackendCommand::FetchUsers {
            generation: self.issued_generation,
            cancel: self.lifetime.clone(),
        }
    }
}
