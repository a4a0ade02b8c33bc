//! Diagram file format.
//!
//! A diagram is a JSON array of flat element records. Field names follow the
//! legacy track-editor files so older diagrams still open.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Element, ElementKind, Orientation, Point, Rgba};

const KIND_STRAIGHT_TRACK: u8 = 0;
const KIND_CIRCUIT_NODE: u8 = 1;
const KIND_SIMPLE_SWITCH: u8 = 2;

const ORIENTATION_NORMAL: &str = "Normal";
const ORIENTATION_INVERTED: &str = "Invertido";

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("cannot access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed diagram: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("cannot encode diagram: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("unknown element kind {0}")]
    UnknownKind(u8),

    #[error("element id {0} is out of range")]
    InvalidId(u64),

    #[error("element id {0} appears more than once")]
    DuplicateId(u64),
}

pub type PersistResult<T> = Result<T, PersistError>;

#[derive(Serialize, Deserialize)]
pub(crate) struct ElementRecord {
    #[serde(rename = "tipo")]
    kind: u8,
    id: u64,
    x: f32,
    y: f32,
    #[serde(rename = "comprimento", default)]
    length: f32,
    #[serde(rename = "largura", default)]
    width: f32,
    #[serde(rename = "rotacao", default)]
    rotation: f32,
    #[serde(rename = "cor")]
    color: Rgba,
    #[serde(rename = "espessura")]
    gauge: f32,
    #[serde(rename = "modoCheio", default, skip_serializing_if = "is_false")]
    filled: bool,
    #[serde(rename = "orientacaoTC", default, skip_serializing_if = "Option::is_none")]
    orientation: Option<String>,
}

fn is_false(v: &bool) -> bool {
    !*v
}

impl From<Element> for ElementRecord {
    fn from(e: Element) -> Self {
        let mut record = ElementRecord {
            kind: KIND_SIMPLE_SWITCH,
            id: e.id,
            x: e.pos.x,
            y: e.pos.y,
            length: 0.0,
            width: 0.0,
            rotation: 0.0,
            color: e.color,
            gauge: e.gauge,
            filled: false,
            orientation: None,
        };
        match e.kind {
            ElementKind::StraightTrack {
                length,
                rotation,
                filled,
            } => {
                record.kind = KIND_STRAIGHT_TRACK;
                record.length = length;
                record.rotation = rotation;
                record.filled = filled;
            }
            ElementKind::CircuitNode {
                bar_length,
                orientation,
            } => {
                record.kind = KIND_CIRCUIT_NODE;
                record.width = bar_length;
                record.orientation = Some(
                    match orientation {
                        Orientation::Normal => ORIENTATION_NORMAL,
                        Orientation::Inverted => ORIENTATION_INVERTED,
                    }
                    .to_string(),
                );
            }
            ElementKind::SimpleSwitch => {}
        }
        record
    }
}

impl TryFrom<ElementRecord> for Element {
    type Error = PersistError;

    fn try_from(r: ElementRecord) -> Result<Self, Self::Error> {
        // 0 is never allocated and MAX leaves no successor id
        if r.id == 0 || r.id == u64::MAX {
            return Err(PersistError::InvalidId(r.id));
        }
        let kind = match r.kind {
            KIND_STRAIGHT_TRACK => ElementKind::StraightTrack {
                length: r.length,
                rotation: r.rotation,
                filled: r.filled,
            },
            KIND_CIRCUIT_NODE => ElementKind::CircuitNode {
                bar_length: r.width,
                orientation: match r.orientation.as_deref() {
                    Some(ORIENTATION_INVERTED) => Orientation::Inverted,
                    _ => Orientation::Normal,
                },
            },
            KIND_SIMPLE_SWITCH => ElementKind::SimpleSwitch,
            other => return Err(PersistError::UnknownKind(other)),
        };
        Ok(Element {
            id: r.id,
            pos: Point { x: r.x, y: r.y },
            color: r.color,
            gauge: r.gauge,
            kind,
        })
    }
}

pub fn encode(elements: &[Element]) -> PersistResult<String> {
    serde_json::to_string_pretty(elements).map_err(PersistError::Encode)
}

/// Parses a diagram. Element ids must be unique and usable by the id
/// allocator.
pub fn decode(json: &str) -> PersistResult<Vec<Element>> {
    let elements: Vec<Element> = serde_json::from_str(json).map_err(PersistError::Decode)?;
    let mut seen = HashSet::with_capacity(elements.len());
    for element in &elements {
        if !seen.insert(element.id) {
            return Err(PersistError::DuplicateId(element.id));
        }
    }
    Ok(elements)
}

/// Appends `.json` unless the path already ends with it (any case).
pub fn with_json_extension(path: &Path) -> PathBuf {
    let has_ext = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if has_ext {
        path.to_path_buf()
    } else {
        let mut s = path.as_os_str().to_owned();
        s.push(".json");
        PathBuf::from(s)
    }
}

/// Writes `elements` to `path` (with `.json` appended when missing) and
/// returns the path actually written.
pub fn write_file(path: &Path, elements: &[Element]) -> PersistResult<PathBuf> {
    let path = with_json_extension(path);
    let json = encode(elements)?;
    std::fs::write(&path, json).map_err(|source| PersistError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

pub fn read_file(path: &Path) -> PersistResult<Vec<Element>> {
    let json = std::fs::read_to_string(path).map_err(|source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode(&json)
}
