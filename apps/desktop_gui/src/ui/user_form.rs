//! Create/update form shown inside the modal window.

use eframe::egui;
use shared::domain::{EditTarget, UserFields};

use crate::backend_bridge::commands::{BackendCommand, ModalSession};

#[derive(Debug)]
pub struct UserForm {
    target: EditTarget,
    fields: UserFields,
    submitting: bool,
}

impl UserForm {
    pub fn new(target: EditTarget) -> Self {
        let fields = target.initial_fields();
        Self {
            target,
            fields,
            submitting: false,
        }
    }

    #[cfg(test)]
    pub fn fields(&self) -> &UserFields {
        &self.fields
    }

    #[cfg(test)]
    pub fn fields_mut(&mut self) -> &mut UserFields {
        &mut self.fields
    }

    pub fn is_update(&self) -> bool {
        !self.target.is_create()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn title(&self) -> &'static str {
        if self.is_update() {
            "Update User"
        } else {
            "Create User"
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_update() {
            "Update"
        } else {
            "Create"
        }
    }

    /// Builds the request for the current field values. Returns `None` while
    /// an earlier submission is still waiting for its answer.
    pub fn submit(&mut self, session: &ModalSession) -> Option<BackendCommand> {
        if self.submitting {
            return None;
        }
        self.submitting = true;

        let fields = self.fields.clone();
        let session = session.clone();
        Some(match &self.target {
            EditTarget::Create => BackendCommand::CreateUser { session, fields },
            EditTarget::Update(user) => BackendCommand::UpdateUser {
                session,
                id: user.id,
                fields,
            },
        })
    }

    /// The server answered without applying the change; edits stay in place.
    pub fn submission_finished(&mut self) {
        self.submitting = false;
    }

    /// Renders the fields; returns `true` when the user asked to submit.
    pub fn show(&mut self, ui: &mut egui::Ui) -> bool {
        let mut submit = false;

        egui::Grid::new("user_form_fields")
            .num_columns(2)
            .spacing([10.0, 8.0])
            .show(ui, |ui| {
                submit |= field(ui, "First Name:", "first_name", &mut self.fields.first_name, "");
                ui.end_row();
                submit |= field(ui, "Last Name:", "last_name", &mut self.fields.last_name, "");
                ui.end_row();
                submit |= field(
                    ui,
                    "Email:",
                    "email",
                    &mut self.fields.email,
                    "name@example.com",
                );
                ui.end_row();
            });

        ui.add_space(8.0);
        let button = egui::Button::new(self.submit_label());
        if ui.add_enabled(!self.submitting, button).clicked() {
            submit = true;
        }
        if self.submitting {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.weak("Saving...");
            });
        }

        submit && !self.submitting
    }
}

fn field(ui: &mut egui::Ui, label: &str, id: &'static str, value: &mut String, hint: &str) -> bool {
    ui.label(label);
    let response = ui.add(
        egui::TextEdit::singleline(value)
            .id_salt(id)
            .hint_text(hint)
            .desired_width(260.0),
    );
    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter))
}
