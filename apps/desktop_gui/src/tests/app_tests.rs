use super::*;
use crossbeam_channel::bounded;
use shared::domain::{EditTarget, UserFields};

use crate::controller::events::UiError;

struct Harness {
    app: DirectoryApp,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
}

impl Harness {
    fn new() -> Self {
        Self::with_command_capacity(32)
    }

    fn with_command_capacity(capacity: usize) -> Self {
        let (cmd_tx, cmd_rx) = bounded(capacity);
        let (ui_tx, ui_rx) = bounded(32);
        let app = DirectoryApp::new(
            cmd_tx,
            ui_rx,
            "http://127.0.0.1:5000/".to_string(),
            CancellationToken::new(),
        );
        Self { app, cmd_rx, ui_tx }
    }

    fn deliver(&mut self, event: UiEvent) {
        self.ui_tx.send(event).expect("ui channel");
        self.app.process_ui_events();
    }

    fn drain(&self) -> Vec<BackendCommand> {
        self.cmd_rx.try_iter().collect()
    }

    fn expect_single_fetch(&self) -> u64 {
        let commands = self.drain();
        assert_eq!(commands.len(), 1, "expected exactly one command");
        match &commands[0] {
            BackendCommand::FetchUsers { generation, .. } => *generation,
            other => panic!("expected fetch, got {}", other.name()),
        }
    }

    fn session_id(&self) -> u64 {
        self.app.state().session().expect("open session").id()
    }
}

fn ann() -> User {
    User {
        id: UserId(1),
        first_name: "Ann".into(),
        last_name: "Lee".into(),
        email: "a@x.com".into(),
    }
}

#[test]
fn startup_fetches_and_populates_the_table() {
    let mut h = Harness::new();
    let generation = h.expect_single_fetch();
    assert!(!h.app.state().is_modal_open());

    h.deliver(UiEvent::UsersLoaded {
        generation,
        users: vec![ann()],
    });
    assert_eq!(h.app.state().users(), &[ann()]);
    assert_eq!(h.app.status(), "Loaded 1 users");
}

#[test]
fn edit_submit_and_refresh_round_trip() {
    let mut h = Harness::new();
    let first = h.expect_single_fetch();
    h.deliver(UiEvent::UsersLoaded {
        generation: first,
        users: vec![ann()],
    });

    h.app.open_edit_modal(ann());
    let form = h.app.form_mut().expect("form open");
    assert_eq!(form.fields(), &UserFields::new("Ann", "Lee", "a@x.com"));
    form.fields_mut().email = "ann@x.com".to_string();

    h.app.submit_form();
    let session = h.session_id();
    let commands = h.drain();
    assert_eq!(commands.len(), 1);
    match &commands[0] {
        BackendCommand::UpdateUser { id, fields, .. } => {
            assert_eq!(*id, UserId(1));
            assert_eq!(fields, &UserFields::new("Ann", "Lee", "ann@x.com"));
        }
        other => panic!("expected update, got {}", other.name()),
    }

    h.deliver(UiEvent::MutationApplied(MutationOrigin::Form { session }));
    assert!(!h.app.state().is_modal_open());
    assert!(h.app.form().is_none());
    let second = h.expect_single_fetch();

    let mut updated = ann();
    updated.email = "ann@x.com".to_string();
    h.deliver(UiEvent::UsersLoaded {
        generation: second,
        users: vec![updated.clone()],
    });
    assert_eq!(h.app.state().users(), &[updated]);
}

#[test]
fn create_modal_submits_a_create_request() {
    let mut h = Harness::new();
    h.drain();

    h.app.open_create_modal();
    assert_eq!(h.app.state().edit_target(), &EditTarget::Create);
    *h.app.form_mut().expect("form").fields_mut() = UserFields::new("Cy", "Po", "cy@x.com");
    h.app.submit_form();

    let commands = h.drain();
    assert!(matches!(
        commands.as_slice(),
        [BackendCommand::CreateUser { fields, .. }] if fields.first_name == "Cy"
    ));
}

#[test]
fn rejection_keeps_form_open_and_raises_notice() {
    let mut h = Harness::new();
    h.drain();
    h.app.open_create_modal();
    h.app.form_mut().expect("form").fields_mut().first_name = "Dee".to_string();
    h.app.submit_form();
    h.drain();
    let session = h.session_id();

    h.deliver(UiEvent::MutationRejected {
        session,
        message: "You must include a first name, last name and email".to_string(),
    });

    assert!(h.app.state().is_modal_open());
    assert_eq!(
        h.app.notice(),
        Some("You must include a first name, last name and email")
    );
    let form = h.app.form().expect("form");
    assert_eq!(form.fields().first_name, "Dee");
    assert!(!form.is_submitting());
    assert!(h.drain().is_empty(), "rejection must not re-fetch");
}

#[test]
fn opening_twice_keeps_the_first_target() {
    let mut h = Harness::new();
    h.app.open_edit_modal(ann());
    h.app.open_create_modal();
    assert_eq!(h.app.state().edit_target(), &EditTarget::Update(ann()));
    assert!(h.app.form().expect("form").is_update());
}

#[test]
fn closing_resets_target_and_discards_form() {
    let mut h = Harness::new();
    h.app.open_edit_modal(ann());
    h.app.close_modal();
    assert!(!h.app.state().is_modal_open());
    assert_eq!(h.app.state().edit_target(), &EditTarget::Create);
    assert!(h.app.form().is_none());
}

#[test]
fn delete_success_refetches_once() {
    let mut h = Harness::new();
    h.drain();

    h.app.request_delete(UserId(1));
    assert!(matches!(
        h.drain().as_slice(),
        [BackendCommand::DeleteUser { id: UserId(1), .. }]
    ));

    h.deliver(UiEvent::MutationApplied(MutationOrigin::Delete));
    h.expect_single_fetch();
    assert!(h.drain().is_empty());
}

#[test]
fn answers_for_closed_forms_are_ignored() {
    let mut h = Harness::new();
    h.app.open_create_modal();
    let stale = h.session_id();
    h.app.close_modal();

    h.deliver(UiEvent::MutationRejected {
        session: stale,
        message: "too late".to_string(),
    });
    assert!(h.app.notice().is_none());
}

#[test]
fn failures_surface_on_status_line_or_notice() {
    let mut h = Harness::new();
    h.deliver(UiEvent::Error(UiError::startup("no runtime")));
    assert_eq!(
        h.app.status(),
        "Backend startup failed: backend worker failed to start"
    );

    h.deliver(UiEvent::Notice("Deleting user: connection refused".to_string()));
    assert_eq!(h.app.notice(), Some("Deleting user: connection refused"));
}

#[test]
fn dropping_the_app_cancels_open_sessions() {
    let mut h = Harness::new();
    h.app.open_create_modal();
    let session = h.app.state().session().cloned().expect("session");
    drop(h);
    assert!(session.is_cancelled());
}

#[test]
fn full_command_queue_releases_the_form_for_a_retry() {
    // The initial fetch takes the only slot.
    let mut h = Harness::with_command_capacity(1);
    h.app.open_create_modal();
    h.app.form_mut().expect("form").fields_mut().first_name = "Eve".to_string();

    h.app.submit_form();
    assert_eq!(h.app.status(), "UI command queue is full; please retry");
    let form = h.app.form().expect("form kept open");
    assert!(!form.is_submitting());
    assert_eq!(form.fields().first_name, "Eve");

    h.expect_single_fetch();
    h.app.submit_form();
    assert!(matches!(
        h.drain().as_slice(),
        [BackendCommand::CreateUser { fields, .. }] if fields.first_name == "Eve"
    ));
    assert!(h.app.form().expect("form").is_submitting());
}
