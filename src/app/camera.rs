use eframe::egui;

use crate::model::PIXELS_PER_METER;

pub(super) const MIN_ZOOM: f32 = 0.1;
pub(super) const MAX_ZOOM: f32 = 10.0;
/// World units per frame at zoom 1.0.
pub(super) const PAN_SPEED: f32 = 5.0;
pub(super) const WHEEL_ZOOM_STEP: f32 = 1.1;

/// Pan/zoom transform between world space and the canvas viewport. The
/// world point at `offset` sits in the middle of the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct Camera {
    pub offset: egui::Vec2,
    pub zoom: f32,
    viewport: egui::Vec2,
}

impl Camera {
    pub fn new(viewport: egui::Vec2) -> Self {
        Self {
            offset: egui::Vec2::ZERO,
            zoom: 1.0,
            viewport,
        }
    }

    pub fn viewport(&self) -> egui::Vec2 {
        self.viewport
    }

    /// Host window resized. The pan offset is kept as is.
    pub fn set_viewport(&mut self, viewport: egui::Vec2) {
        self.viewport = viewport;
    }

    pub fn reset(&mut self) {
        self.offset = egui::Vec2::ZERO;
        self.zoom = 1.0;
    }

    pub fn world_to_screen(&self, world: egui::Pos2) -> egui::Pos2 {
        ((world.to_vec2() - self.offset) * self.zoom + self.viewport * 0.5).to_pos2()
    }

    pub fn screen_to_world(&self, screen: egui::Pos2) -> egui::Pos2 {
        ((screen.to_vec2() - self.viewport * 0.5) / self.zoom + self.offset).to_pos2()
    }

    /// Zooms by `factor` while keeping the world point under `screen_point`
    /// fixed on screen.
    pub fn zoom_at(&mut self, screen_point: egui::Pos2, factor: f32) {
        let before = self.screen_to_world(screen_point);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let after = self.screen_to_world(screen_point);
        self.offset += before - after;
    }

    /// Pans by `(dx, dy)` steps. A step covers the same screen distance at
    /// every zoom level.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.offset += egui::vec2(dx, dy) * (PAN_SPEED / self.zoom);
    }

    pub fn meters_per_screen_pixel(&self) -> f32 {
        (1.0 / PIXELS_PER_METER) / self.zoom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: egui::Pos2, b: egui::Pos2) -> bool {
        (a - b).length() < 1e-2
    }

    fn cameras() -> Vec<Camera> {
        let mut out = Vec::new();
        for (offset, zoom) in [
            (egui::vec2(0.0, 0.0), 1.0),
            (egui::vec2(120.0, -40.0), 2.5),
            (egui::vec2(-3000.0, 900.0), 0.1),
            (egui::vec2(17.0, 3.0), 10.0),
        ] {
            let mut camera = Camera::new(egui::vec2(1024.0, 768.0));
            camera.offset = offset;
            camera.zoom = zoom;
            out.push(camera);
        }
        out
    }

    #[test]
    fn origin_maps_to_viewport_center() {
        let camera = Camera::new(egui::vec2(800.0, 600.0));
        assert!(close(camera.world_to_screen(egui::Pos2::ZERO), egui::pos2(400.0, 300.0)));
    }

    #[test]
    fn screen_to_world_inverts_world_to_screen() {
        let points = [
            egui::pos2(0.0, 0.0),
            egui::pos2(512.0, -77.5),
            egui::pos2(-250.0, 1300.0),
        ];
        for camera in cameras() {
            for p in points {
                let back = camera.screen_to_world(camera.world_to_screen(p));
                assert!(close(back, p), "{p:?} -> {back:?} with {camera:?}");
            }
        }
    }

    #[test]
    fn zoom_keeps_cursor_world_point() {
        for mut camera in cameras() {
            let cursor = egui::pos2(700.0, 120.0);
            let before = camera.screen_to_world(cursor);
            camera.zoom_at(cursor, WHEEL_ZOOM_STEP);
            assert!(close(camera.screen_to_world(cursor), before));
            camera.zoom_at(cursor, 1.0 / WHEEL_ZOOM_STEP);
            assert!(close(camera.screen_to_world(cursor), before));
        }
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = Camera::new(egui::vec2(800.0, 600.0));
        camera.zoom_at(egui::pos2(10.0, 10.0), 1000.0);
        assert_eq!(camera.zoom, MAX_ZOOM);
        camera.zoom_at(egui::pos2(10.0, 10.0), 1e-6);
        assert_eq!(camera.zoom, MIN_ZOOM);
    }

    #[test]
    fn pan_speed_is_constant_on_screen() {
        let mut near = Camera::new(egui::vec2(800.0, 600.0));
        near.zoom = 4.0;
        let mut far = near;
        far.zoom = 0.5;
        let probe = egui::pos2(0.0, 0.0);
        let near_before = near.world_to_screen(probe);
        let far_before = far.world_to_screen(probe);
        near.pan(1.0, 0.0);
        far.pan(1.0, 0.0);
        let near_shift = near_before.x - near.world_to_screen(probe).x;
        let far_shift = far_before.x - far.world_to_screen(probe).x;
        assert!((near_shift - PAN_SPEED).abs() < 1e-3);
        assert!((far_shift - PAN_SPEED).abs() < 1e-3);
    }
}
