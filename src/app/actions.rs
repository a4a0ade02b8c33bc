use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::codec::{self, PersistResult};
use crate::model::ElementKind;

use super::context_menu::PopupAction;
use super::interaction::{Command, InteractionState, Signal};
use super::settings;
use super::{BACKGROUNDS, Editor, GAUGE_MAX, GAUGE_MIN, PALETTE, RailSketchApp};

impl Editor {
    pub(super) fn run_command(&mut self, command: Command) -> Signal {
        match command {
            Command::SelectTool(tool) => {
                self.tool = tool;
                info!("Tool: {}", tool.label());
            }
            Command::PaletteColor(index) => {
                if let Some(entry) = PALETTE.get(index) {
                    self.color = entry.color;
                    info!("Color: {}", entry.name);
                }
            }
            Command::GrowGauge => self.set_gauge(self.gauge + 1.0),
            Command::ShrinkGauge => self.set_gauge(self.gauge - 1.0),
            Command::ToggleFill => {
                self.fill_tracks = !self.fill_tracks;
                info!("Filled tracks: {}", self.fill_tracks);
            }
            Command::Background(index) => {
                if let Some(preset) = BACKGROUNDS.get(index) {
                    self.background = preset.color;
                    info!("Background: {}", preset.name);
                }
            }
            Command::ClearAll => self.clear_all(),
            Command::Save => return Signal::Save,
            Command::Load => return Signal::Load,
            Command::ToggleHelp => {
                self.show_help = !self.show_help;
                if self.show_help {
                    self.hovered = None;
                }
            }
            Command::Escape => return self.escape(),
            Command::Pan { dx, dy } => self.camera.pan(dx, dy),
        }
        Signal::None
    }

    fn set_gauge(&mut self, gauge: f32) {
        let gauge = gauge.clamp(GAUGE_MIN, GAUGE_MAX);
        if gauge != self.gauge {
            self.gauge = gauge;
            info!("Gauge: {gauge:.0}");
        }
    }

    /// Escape unwinds one layer at a time: help, then an open popup, then
    /// the application.
    fn escape(&mut self) -> Signal {
        if self.show_help {
            self.show_help = false;
            return Signal::None;
        }
        if matches!(self.state, InteractionState::PopupOpen(_)) {
            self.state = InteractionState::Idle;
            return Signal::None;
        }
        info!("Quit requested");
        Signal::Quit
    }

    fn clear_all(&mut self) {
        let removed = self.store.len();
        self.store.clear();
        self.camera.reset();
        self.reset_interaction();
        info!("Cleared {removed} element(s)");
    }

    fn reset_interaction(&mut self) {
        self.state = InteractionState::Idle;
        self.selected = None;
        self.hovered = None;
    }

    pub(super) fn apply_popup_action(&mut self, action: PopupAction) {
        match action {
            PopupAction::SetColor { id, color, name } => {
                let Some(element) = self.store.get_mut_by_id(id) else {
                    warn!("Element {id} is gone, color change dropped");
                    return;
                };
                element.color = color;
                info!("{} recolored {name}", element.label());
            }
            PopupAction::ToggleOrientation { id } => {
                let Some(element) = self.store.get_mut_by_id(id) else {
                    warn!("Element {id} is gone, flip dropped");
                    return;
                };
                if let ElementKind::CircuitNode { orientation, .. } = &mut element.kind {
                    *orientation = orientation.toggled();
                    let now = *orientation;
                    info!("{} flipped to {}", element.label(), now.label());
                }
            }
            PopupAction::Delete { id } => {
                let Some(index) = self.store.index_of(id) else {
                    warn!("Element {id} is gone, delete dropped");
                    return;
                };
                if let Some(element) = self.store.remove(index) {
                    info!("Deleted {}", element.label());
                }
                self.selected = None;
                self.hovered = None;
            }
        }
    }

    pub(super) fn save_to(&self, path: &Path) -> PersistResult<PathBuf> {
        let written = codec::write_file(path, self.store.elements())?;
        info!("Saved {} element(s) to {}", self.store.len(), written.display());
        Ok(written)
    }

    /// Replaces the scene with the file contents. On failure the current scene
    /// is left untouched.
    pub(super) fn load_from(&mut self, path: &Path) -> PersistResult<usize> {
        let elements = codec::read_file(path)?;
        let count = elements.len();
        self.store.replace_all(elements);
        self.camera.reset();
        self.reset_interaction();
        info!(
            "Loaded {count} element(s) from {}, next id {}",
            path.display(),
            self.store.next_id()
        );
        Ok(count)
    }
}

impl RailSketchApp {
    fn dialog(&self) -> rfd::FileDialog {
        let dialog = rfd::FileDialog::new().add_filter("JSON", &["json"]);
        match &self.settings.last_directory {
            Some(dir) => dialog.set_directory(dir),
            None => dialog,
        }
    }

    pub(super) fn save_dialog(&mut self) {
        let Some(path) = self.dialog().set_file_name("diagram.json").save_file() else {
            info!("Save cancelled");
            return;
        };
        match self.editor.save_to(&path) {
            Ok(written) => {
                self.status = Some(format!("Saved {}", written.display()));
                self.remember_directory(&written);
            }
            Err(e) => {
                error!("Save failed: {e}");
                self.status = Some(format!("Save failed: {e}"));
            }
        }
    }

    pub(super) fn load_dialog(&mut self) {
        let Some(path) = self.dialog().pick_file() else {
            info!("Load cancelled");
            return;
        };
        match self.editor.load_from(&path) {
            Ok(count) => {
                self.status = Some(format!("Loaded {count} element(s) from {}", path.display()));
                self.remember_directory(&path);
            }
            Err(e) => {
                error!("Load failed: {e}");
                self.status = Some(format!("Load failed: {e}"));
            }
        }
    }

    fn remember_directory(&mut self, file: &Path) {
        let Some(dir) = file.parent().map(|d| d.display().to_string()) else {
            return;
        };
        if self.settings.last_directory.as_deref() == Some(dir.as_str()) {
            return;
        }
        self.settings.last_directory = Some(dir);
        self.persist_settings();
    }

    fn persist_settings(&mut self) {
        match settings::save_settings(&self.settings_path, &self.settings) {
            Ok(()) => debug!("Settings written to {}", self.settings_path),
            Err(e) => {
                warn!("Settings save failed: {e}");
                self.status = Some(format!("Settings save failed: {e}"));
            }
        }
    }
}
