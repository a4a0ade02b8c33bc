use eframe::egui;
use tracing::debug;

use super::interaction::{Command, EditorEvent, Signal};
use super::{BACKGROUNDS, PALETTE, RailSketchApp, Tool, render};

const TOOL_KEYS: [(egui::Key, Tool); 3] = [
    (egui::Key::T, Tool::StraightTrack),
    (egui::Key::I, Tool::CircuitNode),
    (egui::Key::K, Tool::SimpleSwitch),
];

const PAN_KEYS: [(egui::Key, f32, f32); 4] = [
    (egui::Key::ArrowLeft, -1.0, 0.0),
    (egui::Key::ArrowRight, 1.0, 0.0),
    (egui::Key::ArrowUp, 0.0, -1.0),
    (egui::Key::ArrowDown, 0.0, 1.0),
];

impl eframe::App for RailSketchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let editor = &self.editor;
                let camera = &editor.camera;
                ui.label(format!("Offset: ({:.0}, {:.0})", camera.offset.x, camera.offset.y));
                ui.separator();
                ui.label(format!("Zoom: {:.2}x", camera.zoom));
                ui.separator();
                ui.label(format!("{:.1} m/px", camera.meters_per_screen_pixel()));
                ui.separator();
                ui.label(format!("Tool: {}", editor.tool.label()));
                ui.separator();
                ui.label(if editor.fill_tracks { "Fill: on [V]" } else { "Fill: off [V]" });
                ui.separator();
                ui.label(format!("Gauge: {:.0}", editor.gauge));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(self.status.as_deref().unwrap_or("F1 for help"));
                });
            });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let (rect, _response) =
                    ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
                self.editor.camera.set_viewport(rect.size());

                let wants_keyboard = ctx.wants_keyboard_input();
                let events = ctx.input(|i| gather_events(i, rect, wants_keyboard));
                for event in events {
                    match self.editor.handle(event) {
                        Signal::None => {}
                        Signal::Save => self.save_dialog(),
                        Signal::Load => self.load_dialog(),
                        Signal::Quit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
                    }
                }
                self.editor.refresh_hover();

                if ctx.input(|i| PAN_KEYS.iter().any(|(key, _, _)| i.key_down(*key))) {
                    ctx.request_repaint();
                }

                let painter = ui.painter_at(rect);
                render::draw_editor(&painter, rect.min, &self.editor);
            });

        super::help::draw_help_window(ctx, &mut self.editor.show_help);
    }
}

/// Translates this frame's raw input into editor events. Pointer positions
/// are made relative to the canvas corner.
fn gather_events(
    input: &egui::InputState,
    canvas: egui::Rect,
    wants_keyboard: bool,
) -> Vec<EditorEvent> {
    let mut events = Vec::new();
    let local = |p: egui::Pos2| (p - canvas.min).to_pos2();

    if !wants_keyboard {
        let mut command = |c: Command| events.push(EditorEvent::Command(c));
        if input.key_pressed(egui::Key::F1) {
            command(Command::ToggleHelp);
        }
        if input.key_pressed(egui::Key::Escape) {
            command(Command::Escape);
        }
        for (key, tool) in TOOL_KEYS {
            if input.key_pressed(key) {
                command(Command::SelectTool(tool));
            }
        }
        if let Some(index) = PALETTE.iter().position(|entry| input.key_pressed(entry.key)) {
            command(Command::PaletteColor(index));
        }
        if let Some(index) = BACKGROUNDS
            .iter()
            .position(|preset| input.key_pressed(preset.key))
        {
            command(Command::Background(index));
        }
        if input.key_pressed(egui::Key::V) {
            command(Command::ToggleFill);
        }
        if input.key_pressed(egui::Key::Equals) || input.key_pressed(egui::Key::Plus) {
            command(Command::GrowGauge);
        }
        if input.key_pressed(egui::Key::Minus) {
            command(Command::ShrinkGauge);
        }
        if input.key_pressed(egui::Key::C) {
            command(Command::ClearAll);
        }
        if input.key_pressed(egui::Key::S) {
            command(Command::Save);
        }
        if input.key_pressed(egui::Key::L) {
            command(Command::Load);
        }
        for (key, dx, dy) in PAN_KEYS {
            if input.key_down(key) {
                command(Command::Pan { dx, dy });
            }
        }
    }

    let pointer = &input.pointer;
    let Some(pos) = pointer.latest_pos() else {
        return events;
    };
    let inside = canvas.contains(pos);
    let p = local(pos);
    if pointer.is_moving() {
        events.push(EditorEvent::PointerMoved(p));
    }
    if inside && pointer.primary_pressed() {
        events.push(EditorEvent::PrimaryPressed(p));
    }
    if pointer.primary_released() {
        events.push(EditorEvent::PrimaryReleased(p));
    }
    if inside && pointer.secondary_pressed() {
        events.push(EditorEvent::SecondaryPressed(p));
    }
    let scroll = input.raw_scroll_delta.y;
    if inside && scroll != 0.0 {
        debug!("Wheel {scroll:+.1}");
        events.push(EditorEvent::Wheel {
            pos: p,
            zoom_in: scroll > 0.0,
        });
    }
    events
}
