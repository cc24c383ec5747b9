//! User table. Stateless: renders whatever collection it is handed and
//! reports which row action was clicked.

use eframe::egui;
use shared::domain::{User, UserId};

pub const COLUMNS: [&str; 4] = ["First Name", "Last Name", "Email", "Actions"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListAction {
    Edit(User),
    Delete(UserId),
}

/// Displayed text cells for each record, in collection order.
pub fn rows(users: &[User]) -> Vec<[&str; 3]> {
    users
        .iter()
        .map(|user| {
            [
                user.first_name.as_str(),
                user.last_name.as_str(),
                user.email.as_str(),
            ]
        })
        .collect()
}

pub fn show(ui: &mut egui::Ui, users: &[User]) -> Option<ListAction> {
    let mut action = None;

    ui.heading("Users");
    ui.add_space(6.0);

    egui::ScrollArea::vertical()
        .auto_shrink([false, true])
        .show(ui, |ui| {
            egui::Grid::new("users_table")
                .num_columns(COLUMNS.len())
                .striped(true)
                .spacing([18.0, 6.0])
                .show(ui, |ui| {
                    for title in COLUMNS {
                        ui.label(egui::RichText::new(title).strong());
                    }
                    ui.end_row();

                    for (user, cells) in users.iter().zip(rows(users)) {
                        for cell in cells {
                            ui.label(cell);
                        }
                        ui.horizontal(|ui| {
                            if ui.button("Update").clicked() {
                                action = Some(ListAction::Edit(user.clone()));
                            }
                            if ui.button("Delete").clicked() {
                                action = Some(ListAction::Delete(user.id));
                            }
                        });
                        ui.end_row();
                    }
                });

            if users.is_empty() {
                ui.add_space(8.0);
                ui.weak("No users yet.");
            }
        });

    action
}
