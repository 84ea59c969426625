//! Input model: drawing modes, UI state, and the gesture state machine.
//!
//! `Mode` captures which brush (if any) pointer events feed. `InputState` is
//! the gesture tracked between pointer-down and pointer-up; freehand modes
//! accumulate stroke points there and emit a document mutation (pencil) or an
//! [`EraseGesture`] (eraser) on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_BRUSH_WIDTH, DEFAULT_PENCIL_COLOR};
use crate::doc::{EraseStroke, ObjectId};
use crate::geometry::Point;

/// Which drawing mode is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Select and manipulate objects (default).
    #[default]
    Cursor,
    /// Freehand drawing.
    Pencil,
    /// Freehand erasing.
    Eraser,
}

/// Persistent UI state.
#[derive(Debug, Clone)]
pub struct UiState {
    pub mode: Mode,
    /// The id of the currently selected object, if any.
    pub selected_id: Option<ObjectId>,
    pub pencil_width: f64,
    pub pencil_color: String,
    pub eraser_width: f64,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            mode: Mode::Cursor,
            selected_id: None,
            pencil_width: DEFAULT_BRUSH_WIDTH,
            pencil_color: DEFAULT_PENCIL_COLOR.to_owned(),
            eraser_width: DEFAULT_BRUSH_WIDTH,
        }
    }
}

/// A completed erase stroke and the objects it crossed.
///
/// Produced once on pointer-up in eraser mode and handed straight to the
/// erase coordinator; nothing retains it afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct EraseGesture {
    pub stroke: EraseStroke,
    /// Erasable objects under the stroke, top-most first.
    pub targets: Vec<ObjectId>,
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// A pencil stroke is being drawn.
    Drawing {
        /// Stroke points collected so far, in world coordinates.
        points: Vec<Point>,
    },
    /// An erase stroke is being drawn.
    Erasing {
        /// Stroke points collected so far, in world coordinates.
        points: Vec<Point>,
    },
}

impl InputState {
    /// Append a point to an in-progress stroke. Returns false when idle.
    pub fn push_point(&mut self, pt: Point) -> bool {
        match self {
            Self::Idle => false,
            Self::Drawing { points } | Self::Erasing { points } => {
                points.push(pt);
                true
            }
        }
    }
}
