use eframe::egui;

use crate::model::{Element, ElementKind, Rgba};

use super::PALETTE;

pub(super) const POPUP_WIDTH: f32 = 150.0;
pub(super) const OPTION_HEIGHT: f32 = 20.0;
pub(super) const PADDING: f32 = 5.0;
pub(super) const SWATCH_SIZE: f32 = 16.0;
const SWATCH_SPACING: f32 = SWATCH_SIZE + 5.0;

/// What a popup option does once clicked. Targets are element ids, resolved
/// to an index only when the action runs.
#[derive(Clone, Debug, PartialEq)]
pub(super) enum PopupAction {
    SetColor {
        id: u64,
        color: Rgba,
        name: &'static str,
    },
    ToggleOrientation {
        id: u64,
    },
    Delete {
        id: u64,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub(super) struct PopupOption {
    pub label: Option<String>,
    /// Screen rectangle as laid out at the anchor, before viewport clamping.
    pub rect: egui::Rect,
    pub color: Option<Rgba>,
    pub action: PopupAction,
}

#[derive(Clone, Debug, PartialEq)]
pub(super) struct ContextMenu {
    target: u64,
    anchor: egui::Pos2,
    options: Vec<PopupOption>,
}

impl ContextMenu {
    pub fn build(element: &Element, anchor: egui::Pos2) -> Self {
        let id = element.id;
        let mut options = Vec::new();
        let mut row_y = anchor.y + PADDING;

        let swatch_x = anchor.x + PADDING;
        for (i, entry) in PALETTE.iter().enumerate() {
            let min = egui::pos2(swatch_x + i as f32 * SWATCH_SPACING, row_y);
            options.push(PopupOption {
                label: None,
                rect: egui::Rect::from_min_size(min, egui::vec2(SWATCH_SIZE, SWATCH_SIZE)),
                color: Some(entry.color),
                action: PopupAction::SetColor {
                    id,
                    color: entry.color,
                    name: entry.name,
                },
            });
        }
        row_y += SWATCH_SIZE + PADDING;

        if let ElementKind::CircuitNode { orientation, .. } = element.kind {
            options.push(PopupOption {
                label: Some(format!("Flip ({})", orientation.label())),
                rect: full_width_row(anchor.x, row_y),
                color: None,
                action: PopupAction::ToggleOrientation { id },
            });
            row_y += OPTION_HEIGHT + PADDING;
        }

        options.push(PopupOption {
            label: Some("Delete".to_string()),
            rect: full_width_row(anchor.x, row_y),
            color: None,
            action: PopupAction::Delete { id },
        });

        Self {
            target: id,
            anchor,
            options,
        }
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn anchor(&self) -> egui::Pos2 {
        self.anchor
    }

    pub fn options(&self) -> &[PopupOption] {
        &self.options
    }

    pub fn height(&self) -> f32 {
        let bottom = self
            .options
            .iter()
            .map(|o| o.rect.max.y)
            .fold(self.anchor.y, f32::max);
        bottom - self.anchor.y + PADDING
    }

    /// Top-left corner actually drawn, shifted so the panel stays inside the
    /// current viewport.
    pub fn origin(&self, viewport: egui::Vec2) -> egui::Pos2 {
        let height = self.height();
        let mut origin = self.anchor;
        if origin.x + POPUP_WIDTH > viewport.x {
            origin.x = viewport.x - POPUP_WIDTH;
        }
        if origin.y + height > viewport.y {
            origin.y = viewport.y - height;
        }
        origin.x = origin.x.max(0.0);
        origin.y = origin.y.max(0.0);
        origin
    }

    pub fn clamp_offset(&self, viewport: egui::Vec2) -> egui::Vec2 {
        self.origin(viewport) - self.anchor
    }

    pub fn panel_rect(&self, viewport: egui::Vec2) -> egui::Rect {
        egui::Rect::from_min_size(self.origin(viewport), egui::vec2(POPUP_WIDTH, self.height()))
    }

    /// Option rectangles where they are drawn.
    pub fn placed_options(
        &self,
        viewport: egui::Vec2,
    ) -> impl Iterator<Item = (egui::Rect, &PopupOption)> {
        let offset = self.clamp_offset(viewport);
        self.options.iter().map(move |o| (o.rect.translate(offset), o))
    }

    pub fn option_at(&self, screen: egui::Pos2, viewport: egui::Vec2) -> Option<&PopupOption> {
        self.placed_options(viewport)
            .find(|(rect, _)| rect.contains(screen))
            .map(|(_, o)| o)
    }
}

fn full_width_row(anchor_x: f32, y: f32) -> egui::Rect {
    egui::Rect::from_min_max(
        egui::pos2(anchor_x + PADDING, y),
        egui::pos2(anchor_x + POPUP_WIDTH - PADDING, y + OPTION_HEIGHT),
    )
}
