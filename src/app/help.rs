use eframe::egui;

pub(super) fn draw_help_window(ctx: &egui::Context, open: &mut bool) {
    egui::Window::new("Help")
        .open(open)
        .resizable(true)
        .collapsible(false)
        .default_width(460.0)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Keyboard Shortcuts");
                ui.separator();

                ui.label("General");
                help_row(ui, "F1", "Show / hide this help");
                help_row(ui, "Escape", "Close help, then popup, then quit");
                help_row(ui, "S", "Save diagram (JSON)");
                help_row(ui, "L", "Load diagram");
                help_row(ui, "C", "Clear everything and reset the view");

                ui.add_space(10.0);
                ui.label("Tools");
                help_row(ui, "T", "Straight track (drag to draw)");
                help_row(ui, "I", "Circuit node (click to place)");
                help_row(ui, "K", "Simple switch (click to place)");
                help_row(ui, "V", "Toggle filled tracks");
                help_row(ui, "+ / -", "Grow / shrink gauge (1 to 50)");

                ui.add_space(10.0);
                ui.label("Colors");
                for (i, entry) in super::PALETTE.iter().enumerate() {
                    help_row(ui, &(i + 1).to_string(), entry.name);
                }
                for (i, preset) in super::BACKGROUNDS.iter().enumerate() {
                    help_row(ui, &format!("F{}", i + 2), &format!("{} background", preset.name));
                }

                ui.add_space(10.0);
                ui.label("Mouse & View");
                help_row(ui, "Left drag", "Draw track or move an element");
                help_row(ui, "Right-click", "Element menu: color, flip, delete");
                help_row(ui, "Scroll wheel", "Zoom around the cursor");
                help_row(ui, "Arrow keys", "Pan");

                ui.add_space(20.0);
                ui.heading("Files");
                ui.separator();
                ui.label("• Diagrams are JSON arrays; .json is appended when missing");
                ui.label("• Files from the older track editor open unchanged");
                ui.label("• Settings are read from ~/.config/railsketch.toml or settings.toml");
            });
        });
}

fn help_row(ui: &mut egui::Ui, shortcut: &str, description: &str) {
    ui.horizontal(|ui| {
        ui.add_sized(
            [100.0, 16.0],
            egui::Label::new(egui::RichText::new(shortcut).monospace().strong()),
        );
        ui.label(description);
    });
}
