use eframe::egui;

use crate::model::{Element, ElementKind, Rgba};

use super::camera::Camera;
use super::context_menu::ContextMenu;
use super::interaction::InteractionState;
use super::Editor;

const MOVING_COLOR: Rgba = Rgba::opaque(255, 165, 0);
const POPUP_TARGET_COLOR: Rgba = Rgba::opaque(255, 255, 255);
const HOVER_BRIGHTEN: u8 = 60;
const POPUP_BACKGROUND: Rgba = Rgba {
    r: 50,
    g: 50,
    b: 50,
    a: 220,
};
/// Rail line width in world units.
const RAIL_STROKE: f32 = 1.0;
const MIN_STROKE_PX: f32 = 0.5;

/// Paints the whole canvas. `origin` is the top-left of the canvas in window
/// coordinates; editor positions are relative to it.
pub(super) fn draw_editor(painter: &egui::Painter, origin: egui::Pos2, editor: &Editor) {
    let shift = origin.to_vec2();
    painter.rect_filled(painter.clip_rect(), 0.0, editor.background.to_color32());

    let camera = &editor.camera;
    for element in editor.store.elements() {
        let color = element_color(editor, element);
        draw_element(painter, shift, camera, element, color);
    }

    match &editor.state {
        InteractionState::DrawingElement { start } => {
            if let Some(cursor) = editor.cursor {
                let a = camera.world_to_screen(*start) + shift;
                draw_track(
                    painter,
                    a,
                    cursor + shift,
                    editor.gauge * camera.zoom,
                    rail_width(camera),
                    editor.fill_tracks,
                    editor.color.to_color32(),
                );
            }
        }
        InteractionState::PopupOpen(menu) => draw_popup(painter, shift, menu, camera.viewport()),
        InteractionState::Idle | InteractionState::MovingElement { .. } => {}
    }
}

/// Display color with the interaction highlight applied.
fn element_color(editor: &Editor, element: &Element) -> Rgba {
    match &editor.state {
        InteractionState::MovingElement { id, .. } if *id == element.id => MOVING_COLOR,
        InteractionState::PopupOpen(menu) if menu.target() == element.id => POPUP_TARGET_COLOR,
        _ if editor.hovered == Some(element.id) => element.color.brightened(HOVER_BRIGHTEN),
        _ => element.color,
    }
}

fn rail_width(camera: &Camera) -> f32 {
    (RAIL_STROKE * camera.zoom).max(MIN_STROKE_PX)
}

fn draw_element(
    painter: &egui::Painter,
    shift: egui::Vec2,
    camera: &Camera,
    element: &Element,
    color: Rgba,
) {
    let color = color.to_color32();
    let to_screen = |p: egui::Pos2| camera.world_to_screen(p) + shift;
    let size = element.gauge * camera.zoom;
    match element.kind {
        ElementKind::StraightTrack { filled, .. } => {
            let Some(end) = element.track_end() else {
                return;
            };
            draw_track(
                painter,
                to_screen(element.pos.to_pos2()),
                to_screen(end),
                size,
                rail_width(camera),
                filled,
                color,
            );
        }
        ElementKind::CircuitNode { .. } => {
            let Some(segments) = element.circuit_segments() else {
                return;
            };
            let stroke = egui::Stroke::new(size.max(MIN_STROKE_PX), color);
            for [a, b] in segments {
                painter.line_segment([to_screen(a), to_screen(b)], stroke);
            }
        }
        ElementKind::SimpleSwitch => {
            painter.circle_filled(to_screen(element.pos.to_pos2()), size.max(1.0), color);
        }
    }
}

/// Corners of a track band between `a` and `b`, in drawing order: upper-start,
/// lower-start, lower-end, upper-end. The band edges are offset vertically
/// on screen regardless of the track angle.
fn track_outline(a: egui::Pos2, b: egui::Pos2, gauge_px: f32) -> [egui::Pos2; 4] {
    let half = (gauge_px.max(1.0) / 2.0).max(MIN_STROKE_PX);
    let dy = egui::vec2(0.0, half);
    [a - dy, a + dy, b + dy, b - dy]
}

fn draw_track(
    painter: &egui::Painter,
    a: egui::Pos2,
    b: egui::Pos2,
    gauge_px: f32,
    rail_px: f32,
    filled: bool,
    color: egui::Color32,
) {
    let corners = track_outline(a, b, gauge_px);
    if filled {
        painter.add(egui::Shape::convex_polygon(
            corners.to_vec(),
            color,
            egui::Stroke::NONE,
        ));
        return;
    }
    let [upper_a, lower_a, lower_b, upper_b] = corners;
    let stroke = egui::Stroke::new(rail_px, color);
    painter.line_segment([upper_a, upper_b], stroke);
    painter.line_segment([lower_a, lower_b], stroke);
    painter.line_segment([upper_a, lower_a], stroke);
    painter.line_segment([upper_b, lower_b], stroke);
}

fn draw_popup(
    painter: &egui::Painter,
    shift: egui::Vec2,
    menu: &ContextMenu,
    viewport: egui::Vec2,
) {
    painter.rect_filled(
        menu.panel_rect(viewport).translate(shift),
        0.0,
        POPUP_BACKGROUND.to_color32(),
    );
    for (rect, option) in menu.placed_options(viewport) {
        let rect = rect.translate(shift);
        if let Some(color) = option.color {
            painter.rect_filled(rect, 0.0, color.to_color32());
            painter.rect_stroke(
                rect,
                0.0,
                egui::Stroke::new(1.0, egui::Color32::WHITE),
                egui::StrokeKind::Middle,
            );
        }
        if let Some(label) = &option.label {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                label,
                egui::FontId::proportional(13.0),
                egui::Color32::WHITE,
            );
        }
    }
}
