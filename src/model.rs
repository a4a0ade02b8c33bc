use eframe::egui;
use serde::{Deserialize, Serialize};

use crate::codec::ElementRecord;

/// World units per meter. A track drawn 1 world unit long measures 100 m.
pub const PIXELS_PER_METER: f32 = 0.01;

pub const DEFAULT_CIRCUIT_BAR_LENGTH: f32 = 30.0;
pub const DEFAULT_CIRCUIT_STROKE: f32 = 3.0;
pub const DEFAULT_SWITCH_RADIUS: f32 = 10.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn from_pos2(p: egui::Pos2) -> Self {
        Self { x: p.x, y: p.y }
    }

    pub fn to_pos2(self) -> egui::Pos2 {
        egui::pos2(self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn to_color32(self) -> egui::Color32 {
        egui::Color32::from_rgba_unmultiplied(self.r, self.g, self.b, self.a)
    }

    /// Each RGB channel raised by `amount`, saturating at 255.
    pub fn brightened(self, amount: u8) -> Self {
        Self {
            r: self.r.saturating_add(amount),
            g: self.g.saturating_add(amount),
            b: self.b.saturating_add(amount),
            a: self.a,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Normal,
    Inverted,
}

impl Orientation {
    pub fn toggled(self) -> Self {
        match self {
            Orientation::Normal => Orientation::Inverted,
            Orientation::Inverted => Orientation::Normal,
        }
    }

    /// Horizontal direction of the circuit stem: +1 right, -1 left.
    pub fn stem_sign(self) -> f32 {
        match self {
            Orientation::Normal => 1.0,
            Orientation::Inverted => -1.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Orientation::Normal => "Normal ト",
            Orientation::Inverted => "Inverted ┤",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ElementKind {
    StraightTrack {
        /// Meters; world length is `length * PIXELS_PER_METER`.
        length: f32,
        /// Degrees, clockwise from +x in screen orientation.
        rotation: f32,
        filled: bool,
    },
    CircuitNode {
        bar_length: f32,
        orientation: Orientation,
    },
    /// Radius is carried by the element gauge.
    SimpleSwitch,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ElementRecord", into = "ElementRecord")]
pub struct Element {
    pub id: u64,
    pub pos: Point,
    pub color: Rgba,
    /// Stroke width, track gauge or switch radius, in world units.
    pub gauge: f32,
    pub kind: ElementKind,
}

impl Element {
    pub fn straight_track(
        start: egui::Pos2,
        length: f32,
        rotation: f32,
        color: Rgba,
        gauge: f32,
        filled: bool,
    ) -> Self {
        Self {
            id: 0,
            pos: Point::from_pos2(start),
            color,
            gauge,
            kind: ElementKind::StraightTrack {
                length,
                rotation,
                filled,
            },
        }
    }

    pub fn circuit_node(pos: egui::Pos2, color: Rgba) -> Self {
        Self {
            id: 0,
            pos: Point::from_pos2(pos),
            color,
            gauge: DEFAULT_CIRCUIT_STROKE,
            kind: ElementKind::CircuitNode {
                bar_length: DEFAULT_CIRCUIT_BAR_LENGTH,
                orientation: Orientation::Normal,
            },
        }
    }

    pub fn simple_switch(pos: egui::Pos2, color: Rgba) -> Self {
        Self {
            id: 0,
            pos: Point::from_pos2(pos),
            color,
            gauge: DEFAULT_SWITCH_RADIUS,
            kind: ElementKind::SimpleSwitch,
        }
    }

    /// World-space end point of a straight track's centerline.
    pub fn track_end(&self) -> Option<egui::Pos2> {
        let ElementKind::StraightTrack {
            length, rotation, ..
        } = self.kind
        else {
            return None;
        };
        let world_len = length * PIXELS_PER_METER;
        let rad = rotation.to_radians();
        Some(self.pos.to_pos2() + egui::vec2(rad.cos(), rad.sin()) * world_len)
    }

    /// Vertical bar and horizontal stem centerlines of a circuit node.
    pub fn circuit_segments(&self) -> Option<[[egui::Pos2; 2]; 2]> {
        let ElementKind::CircuitNode {
            bar_length,
            orientation,
        } = self.kind
        else {
            return None;
        };
        let center = self.pos.to_pos2();
        let half = bar_length / 2.0;
        let bar = [center - egui::vec2(0.0, half), center + egui::vec2(0.0, half)];
        let stem = [center, center + egui::vec2(half * orientation.stem_sign(), 0.0)];
        Some([bar, stem])
    }

    pub fn label(&self) -> String {
        match &self.kind {
            ElementKind::StraightTrack { .. } => format!("Track {}", self.id),
            ElementKind::CircuitNode { .. } => format!("Circuit {}", self.id),
            ElementKind::SimpleSwitch => format!("Switch {}", self.id),
        }
    }
}

/// World length in meters of the segment `a`-`b`.
pub fn length_in_meters(a: egui::Pos2, b: egui::Pos2) -> f32 {
    let world = (b - a).length();
    if PIXELS_PER_METER <= 0.0 {
        return world;
    }
    world / PIXELS_PER_METER
}

pub fn distance_to_segment(p: egui::Pos2, a: egui::Pos2, b: egui::Pos2) -> f32 {
    let ab = b - a;
    let ap = p - a;
    let ab_len2 = ab.x * ab.x + ab.y * ab.y;
    if ab_len2 <= f32::EPSILON {
        return (p - a).length();
    }
    let t = (ap.x * ab.x + ap.y * ab.y) / ab_len2;
    let t = t.clamp(0.0, 1.0);
    let closest = a + ab * t;
    (p - closest).length()
}
