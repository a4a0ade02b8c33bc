use crate::model::Rgba;
use crate::store::ElementStore;
use eframe::egui;

mod actions;
mod camera;
mod context_menu;
mod help;
mod interaction;
mod render;
mod settings;
mod update;

pub(crate) use settings::{AppSettings, config_path, load_settings};

use camera::Camera;
use interaction::InteractionState;

const GAUGE_MIN: f32 = 1.0;
const GAUGE_MAX: f32 = 50.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tool {
    StraightTrack,
    CircuitNode,
    SimpleSwitch,
}

impl Tool {
    fn label(self) -> &'static str {
        match self {
            Tool::StraightTrack => "Track [T]",
            Tool::CircuitNode => "Circuit [I]",
            Tool::SimpleSwitch => "Switch [K]",
        }
    }
}

struct PaletteEntry {
    key: egui::Key,
    color: Rgba,
    name: &'static str,
}

/// Element colors in key order. Lookups walk this list front to back.
const PALETTE: [PaletteEntry; 5] = [
    PaletteEntry {
        key: egui::Key::Num1,
        color: Rgba::opaque(255, 0, 0),
        name: "red",
    },
    PaletteEntry {
        key: egui::Key::Num2,
        color: Rgba::opaque(0, 0, 255),
        name: "blue",
    },
    PaletteEntry {
        key: egui::Key::Num3,
        color: Rgba::opaque(255, 255, 0),
        name: "yellow",
    },
    PaletteEntry {
        key: egui::Key::Num4,
        color: Rgba::opaque(0, 255, 0),
        name: "green",
    },
    PaletteEntry {
        key: egui::Key::Num5,
        color: Rgba::opaque(0, 206, 209),
        name: "turquoise",
    },
];

struct BackgroundPreset {
    key: egui::Key,
    color: Rgba,
    name: &'static str,
}

const BACKGROUNDS: [BackgroundPreset; 3] = [
    BackgroundPreset {
        key: egui::Key::F2,
        color: Rgba::opaque(50, 50, 50),
        name: "dark gray",
    },
    BackgroundPreset {
        key: egui::Key::F3,
        color: Rgba::opaque(100, 100, 120),
        name: "bluish gray",
    },
    BackgroundPreset {
        key: egui::Key::F4,
        color: Rgba::opaque(240, 240, 240),
        name: "ice white",
    },
];

/// Everything the canvas edits, owned in one place and handed by reference
/// to the update and paint passes.
struct Editor {
    store: ElementStore,
    camera: Camera,
    state: InteractionState,
    selected: Option<u64>,
    hovered: Option<u64>,
    tool: Tool,
    color: Rgba,
    gauge: f32,
    fill_tracks: bool,
    background: Rgba,
    show_help: bool,
    cursor: Option<egui::Pos2>,
}

impl Editor {
    fn new(viewport: egui::Vec2, settings: &AppSettings) -> Self {
        Self {
            store: ElementStore::default(),
            camera: Camera::new(viewport),
            state: InteractionState::Idle,
            selected: None,
            hovered: None,
            tool: Tool::StraightTrack,
            color: PALETTE[0].color,
            gauge: settings.default_gauge.clamp(GAUGE_MIN, GAUGE_MAX),
            fill_tracks: settings.filled_tracks,
            background: settings.background,
            show_help: false,
            cursor: None,
        }
    }
}

pub struct RailSketchApp {
    editor: Editor,
    settings: AppSettings,
    settings_path: String,
    status: Option<String>,
}

impl RailSketchApp {
    pub(crate) fn new(
        _cc: &eframe::CreationContext<'_>,
        settings: AppSettings,
        settings_path: String,
    ) -> Self {
        let viewport = egui::vec2(settings.window_width, settings.window_height);
        Self {
            editor: Editor::new(viewport, &settings),
            settings,
            settings_path,
            status: None,
        }
    }
}
