use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::{User, UserId};
use tokio_util::sync::CancellationToken;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::state::{DirectoryState, MutationOrigin};
use crate::ui::{
    notice,
    user_form::UserForm,
    user_list::{self, ListAction},
};

pub struct DirectoryApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    server_url: String,
    state: DirectoryState,
    form: Option<UserForm>,
    notice: Option<String>,
    status: String,
}

impl DirectoryApp {
    /// Builds the app and immediately requests the initial collection.
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        server_url: String,
        lifetime: CancellationToken,
    ) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            server_url,
            state: DirectoryState::new(lifetime),
            form: None,
            notice: None,
            status: "Loading users...".to_string(),
        };
        let initial_fetch = app.state.start();
        app.queue(initial_fetch);
        app
    }

    pub fn state(&self) -> &DirectoryState {
        &self.state
    }

    pub fn form(&self) -> Option<&UserForm> {
        self.form.as_ref()
    }

    #[cfg(test)]
    pub fn form_mut(&mut self) -> Option<&mut UserForm> {
        self.form.as_mut()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    fn queue(&mut self, cmd: BackendCommand) -> bool {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status)
    }

    pub fn open_create_modal(&mut self) {
        if self.state.open_create() {
            self.form = Some(UserForm::new(self.state.edit_target().clone()));
        }
    }

    pub fn open_edit_modal(&mut self, user: User) {
        if self.state.open_edit(user) {
            self.form = Some(UserForm::new(self.state.edit_target().clone()));
        }
    }

    pub fn close_modal(&mut self) {
        self.state.close();
        self.form = None;
    }

    pub fn submit_form(&mut self) {
        let Some(session) = self.state.session().cloned() else {
            return;
        };
        let Some(cmd) = self.form.as_mut().and_then(|form| form.submit(&session)) else {
            return;
        };
        if !self.queue(cmd) {
            // Never reached the worker; no answer will come back.
            if let Some(form) = self.form.as_mut() {
                form.submission_finished();
            }
        }
    }

    pub fn request_delete(&mut self, id: UserId) {
        let cancel = self.state.lifetime().clone();
        self.queue(BackendCommand::DeleteUser { id, cancel });
    }

    fn on_mutation_completed(&mut self, origin: MutationOrigin) {
        let refetch = self.state.complete_mutation(origin);
        if !self.state.is_modal_open() {
            self.form = None;
        }
        self.queue(refetch);
    }

    fn release_form(&mut self, session: u64) -> bool {
        if !self.state.is_current_session(session) {
            tracing::debug!(session, "ignoring answer for a closed form");
            return false;
        }
        if let Some(form) = self.form.as_mut() {
            form.submission_finished();
        }
        true
    }

    pub fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.handle_event(event);
        }
    }

    fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Info(message) => {
                self.status = message;
            }
            UiEvent::UsersLoaded { generation, users } => {
                let count = users.len();
                if self.state.apply_users(generation, users) {
                    self.status = format!("Loaded {count} users");
                }
            }
            UiEvent::MutationApplied(origin) => {
                self.on_mutation_completed(origin);
            }
            UiEvent::MutationRejected { session, message } => {
                if self.release_form(session) {
                    self.notice = Some(message);
                }
            }
            UiEvent::SubmissionFailed { session, error } => {
                if self.release_form(session) {
                    self.status = error.status_line();
                }
            }
            UiEvent::Notice(message) => {
                self.notice = Some(message);
            }
            UiEvent::Error(error) => {
                tracing::warn!(category = ?error.category(), "{}", error.message());
                self.status = error.status_line();
            }
        }
    }

    fn show_form_window(&mut self, ctx: &egui::Context) {
        if !self.state.is_modal_open() {
            return;
        }
        let Some(form) = self.form.as_mut() else {
            return;
        };

        let mut open = true;
        let mut submit = false;
        egui::Window::new(form.title())
            .id(egui::Id::new("user_form_window"))
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                submit = form.show(ui);
            });

        if submit {
            self.submit_form();
        }
        if !open {
            self.close_modal();
        }
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.small("Server:");
                ui.small(egui::RichText::new(&self.server_url).monospace());
                ui.separator();
                ui.small(egui::RichText::new(&self.status).weak());
            });
        });
    }

    fn show_directory(&mut self, ctx: &egui::Context) {
        let mut list_action = None;
        let mut create_clicked = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            list_action = user_list::show(ui, self.state.users());
            ui.add_space(10.0);
            create_clicked = ui.button("Create New User").clicked();
        });

        match list_action {
            Some(ListAction::Edit(user)) => self.open_edit_modal(user),
            Some(ListAction::Delete(id)) => self.request_delete(id),
            None => {}
        }
        if create_clicked {
            self.open_create_modal();
        }
    }
}

impl eframe::App for DirectoryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        self.show_status_bar(ctx);
        self.show_directory(ctx);
        self.show_form_window(ctx);

        if let Some(message) = self.notice.clone() {
            if notice::show(ctx, &message) {
                self.notice = None;
            }
        }

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}

impl Drop for DirectoryApp {
    fn drop(&mut self) {
        self.state.lifetime().cancel();
    }
}

#[cfg(test)]
#[path = "../tests/app_tests.rs"]
mod tests;
