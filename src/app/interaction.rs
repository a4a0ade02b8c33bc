use eframe::egui;
use tracing::{debug, info};

use crate::model::{self, Element};

use super::camera::WHEEL_ZOOM_STEP;
use super::context_menu::ContextMenu;
use super::hit_test::find_closest;
use super::{Editor, Tool};

/// Drags shorter than this many screen pixels do not create a track.
const MIN_DRAW_PX: f32 = 1.0;

#[derive(Clone, Debug, PartialEq)]
pub(super) enum InteractionState {
    Idle,
    DrawingElement {
        start: egui::Pos2,
    },
    MovingElement {
        id: u64,
        grab_offset: egui::Vec2,
    },
    PopupOpen(ContextMenu),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) enum Command {
    SelectTool(Tool),
    PaletteColor(usize),
    GrowGauge,
    ShrinkGauge,
    ToggleFill,
    Background(usize),
    ClearAll,
    Save,
    Load,
    ToggleHelp,
    Escape,
    Pan { dx: f32, dy: f32 },
}

/// Input for one update pass. Positions are in canvas screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) enum EditorEvent {
    PointerMoved(egui::Pos2),
    PrimaryPressed(egui::Pos2),
    PrimaryReleased(egui::Pos2),
    SecondaryPressed(egui::Pos2),
    Wheel { pos: egui::Pos2, zoom_in: bool },
    Command(Command),
}

/// Work the host shell has to do after an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Signal {
    None,
    Save,
    Load,
    Quit,
}

impl Editor {
    pub(super) fn handle(&mut self, event: EditorEvent) -> Signal {
        if let EditorEvent::Command(command) = event {
            return self.run_command(command);
        }
        if self.show_help {
            return Signal::None;
        }
        match event {
            EditorEvent::PointerMoved(p) => self.pointer_moved(p),
            EditorEvent::PrimaryPressed(p) => self.primary_pressed(p),
            EditorEvent::PrimaryReleased(p) => self.primary_released(p),
            EditorEvent::SecondaryPressed(p) => self.secondary_pressed(p),
            EditorEvent::Wheel { pos, zoom_in } => {
                let factor = if zoom_in {
                    WHEEL_ZOOM_STEP
                } else {
                    1.0 / WHEEL_ZOOM_STEP
                };
                self.camera.zoom_at(pos, factor);
            }
            EditorEvent::Command(_) => {}
        }
        Signal::None
    }

    /// Hover only tracks the cursor while nothing else is going on.
    pub(super) fn refresh_hover(&mut self) {
        self.hovered = match (&self.state, self.cursor) {
            (InteractionState::Idle, Some(cursor)) if !self.show_help => {
                self.hit_at(cursor).map(|element| element.id)
            }
            _ => None,
        };
    }

    fn hit_at(&self, screen: egui::Pos2) -> Option<&Element> {
        let world = self.camera.screen_to_world(screen);
        find_closest(world, self.store.elements(), self.camera.zoom)
            .and_then(|index| self.store.get(index))
    }

    fn pointer_moved(&mut self, p: egui::Pos2) {
        self.cursor = Some(p);
        if let InteractionState::MovingElement { id, grab_offset } = self.state {
            let world = self.camera.screen_to_world(p);
            if let Some(element) = self.store.get_mut_by_id(id) {
                element.pos = model::Point::from_pos2(world - grab_offset);
            }
        }
    }

    fn primary_pressed(&mut self, p: egui::Pos2) {
        self.cursor = Some(p);
        match &self.state {
            InteractionState::PopupOpen(menu) => {
                let viewport = self.camera.viewport();
                let action = menu.option_at(p, viewport).map(|o| o.action.clone());
                self.state = InteractionState::Idle;
                match action {
                    Some(action) => self.apply_popup_action(action),
                    None => debug!("Popup dismissed"),
                }
            }
            InteractionState::Idle => {
                let world = self.camera.screen_to_world(p);
                let grabbed = self.hit_at(p).map(|element| {
                    debug!("Moving {}", element.label());
                    (element.id, world - element.pos.to_pos2())
                });
                match grabbed {
                    Some((id, grab_offset)) => {
                        self.state = InteractionState::MovingElement { id, grab_offset };
                        self.selected = Some(id);
                        self.hovered = None;
                    }
                    None => {
                        self.selected = None;
                        match self.tool {
                            Tool::StraightTrack => {
                                self.state = InteractionState::DrawingElement { start: world };
                            }
                            Tool::CircuitNode => {
                                self.place(Element::circuit_node(world, self.color));
                            }
                            Tool::SimpleSwitch => {
                                self.place(Element::simple_switch(world, self.color));
                            }
                        }
                    }
                }
            }
            InteractionState::DrawingElement { .. } | InteractionState::MovingElement { .. } => {}
        }
    }

    fn primary_released(&mut self, p: egui::Pos2) {
        self.pointer_moved(p);
        match self.state {
            InteractionState::MovingElement { id, .. } => {
                if let Some(element) = self.store.get_by_id(id) {
                    info!(
                        "{} moved to ({:.0}, {:.0})",
                        element.label(),
                        element.pos.x,
                        element.pos.y
                    );
                }
                self.state = InteractionState::Idle;
                self.selected = Some(id);
            }
            InteractionState::DrawingElement { start } => {
                let end = self.camera.screen_to_world(p);
                self.commit_track(start, end);
                self.state = InteractionState::Idle;
                self.selected = None;
            }
            InteractionState::Idle | InteractionState::PopupOpen(_) => {}
        }
    }

    fn secondary_pressed(&mut self, p: egui::Pos2) {
        self.cursor = Some(p);
        match self.state {
            InteractionState::PopupOpen(_) => {
                self.state = InteractionState::Idle;
            }
            InteractionState::Idle => {
                let Some(element) = self.hit_at(p) else {
                    return;
                };
                let menu = ContextMenu::build(element, p);
                debug!(
                    "Menu for {} at ({:.0}, {:.0}), {} option(s)",
                    element.label(),
                    menu.anchor().x,
                    menu.anchor().y,
                    menu.options().len()
                );
                self.selected = Some(menu.target());
                self.hovered = None;
                self.state = InteractionState::PopupOpen(menu);
            }
            InteractionState::DrawingElement { .. } | InteractionState::MovingElement { .. } => {}
        }
    }

    fn place(&mut self, element: Element) {
        let id = self.store.add(element);
        if let Some(element) = self.store.get_by_id(id) {
            info!(
                "Added {} at ({:.0}, {:.0}), gauge {:.0}",
                element.label(),
                element.pos.x,
                element.pos.y,
                element.gauge
            );
        }
    }

    fn commit_track(&mut self, start: egui::Pos2, end: egui::Pos2) {
        let delta = end - start;
        // NaN fails this comparison too
        if !(delta.length() * self.camera.zoom > MIN_DRAW_PX) {
            return;
        }
        let length = model::length_in_meters(start, end);
        if !length.is_finite() {
            return;
        }
        let rotation = delta.y.atan2(delta.x).to_degrees();
        let track = Element::straight_track(
            start,
            length,
            rotation,
            self.color,
            self.gauge,
            self.fill_tracks,
        );
        let id = self.store.add(track);
        info!("Added Track {id}: {length:.2} m at {rotation:.1}°, gauge {:.0}", self.gauge);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppSettings;
    use crate::app::PALETTE;
    use crate::app::context_menu::PopupAction;
    use crate::model::{ElementKind, Orientation};

    const CENTER: egui::Pos2 = egui::pos2(400.0, 300.0);

    fn editor() -> Editor {
        Editor::new(egui::vec2(800.0, 600.0), &AppSettings::default())
    }

    fn click(editor: &mut Editor, p: egui::Pos2) {
        editor.handle(EditorEvent::PrimaryPressed(p));
        editor.handle(EditorEvent::PrimaryReleased(p));
    }

    fn place(editor: &mut Editor, tool: Tool, p: egui::Pos2) -> u64 {
        editor.handle(EditorEvent::Command(Command::SelectTool(tool)));
        click(editor, p);
        editor.store.elements().last().unwrap().id
    }

    fn open_menu(editor: &mut Editor, p: egui::Pos2) -> ContextMenu {
        editor.handle(EditorEvent::SecondaryPressed(p));
        match &editor.state {
            InteractionState::PopupOpen(menu) => menu.clone(),
            other => panic!("expected open popup, got {other:?}"),
        }
    }

    fn click_option(editor: &mut Editor, menu: &ContextMenu, pick: impl Fn(&PopupAction) -> bool) {
        let (rect, _) = menu
            .placed_options(editor.camera.viewport())
            .find(|(_, o)| pick(&o.action))
            .unwrap();
        click(editor, rect.center());
    }

    #[test]
    fn drag_draws_a_measured_track() {
        let mut editor = editor();
        editor.handle(EditorEvent::PrimaryPressed(CENTER));
        assert!(matches!(editor.state, InteractionState::DrawingElement { .. }));
        editor.handle(EditorEvent::PrimaryReleased(CENTER + egui::vec2(10_000.0, 0.0)));

        assert_eq!(editor.state, InteractionState::Idle);
        assert_eq!(editor.store.len(), 1);
        let track = &editor.store.elements()[0];
        assert_eq!(track.id, 1);
        assert_eq!(track.gauge, 8.0);
        assert_eq!(track.color, PALETTE[0].color);
        let ElementKind::StraightTrack {
            length,
            rotation,
            filled,
        } = track.kind
        else {
            panic!("expected a track");
        };
        assert!((length - 1_000_000.0).abs() < 1.0, "length {length}");
        assert_eq!(rotation, 0.0);
        assert!(!filled);
    }

    #[test]
    fn track_rotation_is_in_degrees() {
        let mut editor = editor();
        editor.handle(EditorEvent::PrimaryPressed(CENTER));
        editor.handle(EditorEvent::PrimaryReleased(CENTER + egui::vec2(0.0, 50.0)));
        let ElementKind::StraightTrack { rotation, .. } = editor.store.elements()[0].kind else {
            panic!("expected a track");
        };
        assert!((rotation - 90.0).abs() < 1e-3);
    }

    #[test]
    fn tiny_drag_is_discarded() {
        let mut editor = editor();
        editor.handle(EditorEvent::PrimaryPressed(CENTER));
        editor.handle(EditorEvent::PrimaryReleased(CENTER + egui::vec2(0.5, 0.5)));
        assert!(editor.store.is_empty());
        assert_eq!(editor.state, InteractionState::Idle);
    }

    #[test]
    fn point_tools_place_immediately() {
        let mut editor = editor();
        editor.handle(EditorEvent::Command(Command::SelectTool(Tool::SimpleSwitch)));
        editor.handle(EditorEvent::PrimaryPressed(CENTER + egui::vec2(100.0, 0.0)));
        assert_eq!(editor.state, InteractionState::Idle);
        assert_eq!(editor.store.len(), 1);
        let switch = &editor.store.elements()[0];
        assert_eq!(switch.kind, ElementKind::SimpleSwitch);
        assert_eq!(switch.pos.to_pos2(), egui::pos2(100.0, 0.0));
        assert_eq!(switch.gauge, model::DEFAULT_SWITCH_RADIUS);

        place(&mut editor, Tool::CircuitNode, CENTER + egui::vec2(-200.0, 0.0));
        assert!(matches!(
            editor.store.elements()[1].kind,
            ElementKind::CircuitNode { .. }
        ));
    }

    #[test]
    fn dragging_an_element_moves_it() {
        let mut editor = editor();
        let id = place(&mut editor, Tool::SimpleSwitch, CENTER);
        editor.handle(EditorEvent::PrimaryPressed(CENTER));
        assert!(matches!(editor.state, InteractionState::MovingElement { .. }));
        editor.handle(EditorEvent::PointerMoved(CENTER + egui::vec2(20.0, 0.0)));
        editor.handle(EditorEvent::PrimaryReleased(CENTER + egui::vec2(50.0, 0.0)));

        assert_eq!(editor.state, InteractionState::Idle);
        assert_eq!(editor.selected, Some(id));
        let moved = editor.store.get_by_id(id).unwrap();
        assert_eq!(moved.pos.to_pos2(), egui::pos2(50.0, 0.0));
        assert_eq!(editor.store.len(), 1);
    }

    #[test]
    fn grab_offset_is_preserved() {
        let mut editor = editor();
        let id = place(&mut editor, Tool::SimpleSwitch, CENTER);
        let grab = CENTER + egui::vec2(6.0, 0.0);
        editor.handle(EditorEvent::PrimaryPressed(grab));
        editor.handle(EditorEvent::PrimaryReleased(grab + egui::vec2(0.0, 30.0)));
        let moved = editor.store.get_by_id(id).unwrap();
        assert_eq!(moved.pos.to_pos2(), egui::pos2(0.0, 30.0));
    }

    #[test]
    fn move_distance_scales_with_zoom() {
        let mut editor = editor();
        let id = place(&mut editor, Tool::SimpleSwitch, CENTER);
        editor.camera.zoom = 2.0;
        editor.handle(EditorEvent::PrimaryPressed(CENTER));
        editor.handle(EditorEvent::PrimaryReleased(CENTER + egui::vec2(50.0, 0.0)));
        let moved = editor.store.get_by_id(id).unwrap();
        assert_eq!(moved.pos.to_pos2(), egui::pos2(25.0, 0.0));
    }

    #[test]
    fn popup_delete_removes_only_the_target() {
        let mut editor = editor();
        let keep = place(&mut editor, Tool::SimpleSwitch, CENTER + egui::vec2(-100.0, 0.0));
        let doomed = place(&mut editor, Tool::SimpleSwitch, CENTER);
        let menu = open_menu(&mut editor, CENTER);
        assert_eq!(menu.options().len(), PALETTE.len() + 1);
        assert_eq!(editor.selected, Some(doomed));

        click_option(&mut editor, &menu, |a| matches!(a, PopupAction::Delete { .. }));

        assert_eq!(editor.state, InteractionState::Idle);
        assert_eq!(editor.store.len(), 1);
        assert!(editor.store.get_by_id(doomed).is_none());
        assert!(editor.store.get_by_id(keep).is_some());
        assert_eq!(editor.selected, None);
        assert_eq!(editor.hovered, None);
    }

    #[test]
    fn circuit_popup_toggles_orientation() {
        let mut editor = editor();
        let id = place(&mut editor, Tool::CircuitNode, CENTER);
        let menu = open_menu(&mut editor, CENTER);
        assert_eq!(menu.options().len(), PALETTE.len() + 2);
        click_option(&mut editor, &menu, |a| matches!(a, PopupAction::ToggleOrientation { .. }));
        let ElementKind::CircuitNode { orientation, .. } = editor.store.get_by_id(id).unwrap().kind
        else {
            panic!("expected a circuit node");
        };
        assert_eq!(orientation, Orientation::Inverted);
    }

    #[test]
    fn popup_swatch_recolors_target() {
        let mut editor = editor();
        let id = place(&mut editor, Tool::SimpleSwitch, CENTER);
        let menu = open_menu(&mut editor, CENTER);
        click_option(&mut editor, &menu, |a| {
            matches!(a, PopupAction::SetColor { color, .. } if *color == PALETTE[3].color)
        });
        assert_eq!(editor.store.get_by_id(id).unwrap().color, PALETTE[3].color);
        // default color for new elements is untouched
        assert_eq!(editor.color, PALETTE[0].color);
    }

    #[test]
    fn click_outside_popup_only_closes_it() {
        let mut editor = editor();
        place(&mut editor, Tool::SimpleSwitch, CENTER);
        open_menu(&mut editor, CENTER);
        editor.handle(EditorEvent::PrimaryPressed(egui::pos2(5.0, 5.0)));
        assert_eq!(editor.state, InteractionState::Idle);
        assert_eq!(editor.store.len(), 1);
    }

    #[test]
    fn popup_clicks_use_the_resized_viewport() {
        let mut editor = editor();
        let anchor = CENTER + egui::vec2(200.0, 0.0);
        let id = place(&mut editor, Tool::SimpleSwitch, anchor);
        let menu = open_menu(&mut editor, anchor);
        let last_swatch = menu.options()[PALETTE.len() - 1].rect;

        // the panel shifts left by 50 px and the swatch moves with it
        editor.camera.set_viewport(egui::vec2(700.0, 600.0));
        click(&mut editor, last_swatch.center());
        assert_eq!(editor.state, InteractionState::Idle);
        assert_eq!(editor.store.get_by_id(id).unwrap().color, PALETTE[0].color);

        let menu = open_menu(&mut editor, egui::pos2(550.0, 300.0));
        assert_eq!(menu.anchor(), egui::pos2(550.0, 300.0));
        click_option(&mut editor, &menu, |a| matches!(a, PopupAction::Delete { .. }));
        assert!(editor.store.get_by_id(id).is_none());
    }

    #[test]
    fn right_click_closes_popup() {
        let mut editor = editor();
        place(&mut editor, Tool::SimpleSwitch, CENTER);
        open_menu(&mut editor, CENTER);
        editor.handle(EditorEvent::SecondaryPressed(CENTER));
        assert_eq!(editor.state, InteractionState::Idle);
    }

    #[test]
    fn right_click_on_empty_space_opens_nothing() {
        let mut editor = editor();
        editor.handle(EditorEvent::SecondaryPressed(CENTER));
        assert_eq!(editor.state, InteractionState::Idle);
        assert_eq!(editor.selected, None);
    }

    #[test]
    fn hover_is_suppressed_outside_idle() {
        let mut editor = editor();
        let id = place(&mut editor, Tool::SimpleSwitch, CENTER);
        editor.handle(EditorEvent::PointerMoved(CENTER));
        editor.refresh_hover();
        assert_eq!(editor.hovered, Some(id));

        open_menu(&mut editor, CENTER);
        editor.refresh_hover();
        assert_eq!(editor.hovered, None);

        editor.handle(EditorEvent::SecondaryPressed(CENTER));
        editor.handle(EditorEvent::PrimaryPressed(CENTER));
        editor.refresh_hover();
        assert_eq!(editor.hovered, None);
    }

    #[test]
    fn wheel_zoom_keeps_cursor_world_point() {
        let mut editor = editor();
        let cursor = egui::pos2(650.0, 120.0);
        let before = editor.camera.screen_to_world(cursor);
        editor.handle(EditorEvent::Wheel {
            pos: cursor,
            zoom_in: true,
        });
        assert!((editor.camera.zoom - WHEEL_ZOOM_STEP).abs() < 1e-6);
        assert!((editor.camera.screen_to_world(cursor) - before).length() < 1e-3);
    }

    #[test]
    fn help_overlay_blocks_pointer_input() {
        let mut editor = editor();
        editor.handle(EditorEvent::Command(Command::ToggleHelp));
        editor.handle(EditorEvent::PrimaryPressed(CENTER));
        assert_eq!(editor.state, InteractionState::Idle);
        editor.handle(EditorEvent::PrimaryReleased(CENTER + egui::vec2(100.0, 0.0)));
        assert!(editor.store.is_empty());
    }
}
