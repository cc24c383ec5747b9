use eframe::egui;

/// Blocking notification: everything behind it is inert until dismissed.
/// Returns `true` once the user acknowledged it.
pub fn show(ctx: &egui::Context, message: &str) -> bool {
    let response = egui::Modal::new(egui::Id::new("directory_notice")).show(ctx, |ui| {
        ui.set_max_width(360.0);
        ui.label(message);
        ui.add_space(10.0);
        ui.vertical_centered(|ui| ui.button("OK").clicked()).inner
    });
    response.inner || response.should_close()
}
