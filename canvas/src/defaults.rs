//! Per-kind object defaults and the factory that stamps them onto new objects.
//!
//! Defaults are built once at startup with [`CanvasDefaults::standard`] and
//! handed to an [`ObjectFactory`]. Every object the application creates goes
//! through the factory, so there is no global default state to patch.

#[cfg(test)]
#[path = "defaults_test.rs"]
mod defaults_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{CONTROL_COLOR, CONTROL_PADDING, CORNER_SIZE};
use crate::doc::{Controls, CornerStyle, DrawableObject, Locks, ObjectKind};
use crate::geometry::{Bounds, Point};

/// Primitive shapes offered by the shape menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Circle,
    Square,
    Triangle,
    /// Listed in the menu but not drawable yet.
    Arrow,
    Line,
}

/// Defaults applied to one object kind at creation.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDefaults {
    pub erasable: bool,
    pub lock_scaling_flip: bool,
    pub controls: Controls,
}

/// Defaults for every object kind.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasDefaults {
    pub circle: ObjectDefaults,
    pub rect: ObjectDefaults,
    pub triangle: ObjectDefaults,
    pub line: ObjectDefaults,
    pub path: ObjectDefaults,
    pub image: ObjectDefaults,
    pub text: ObjectDefaults,
    pub group: ObjectDefaults,
}

fn standard_controls() -> Controls {
    Controls {
        has_controls: true,
        transparent_corners: false,
        border_color: CONTROL_COLOR.to_owned(),
        corner_color: CONTROL_COLOR.to_owned(),
        corner_size: CORNER_SIZE,
        corner_style: CornerStyle::Circle,
        padding: CONTROL_PADDING,
        stroke_uniform: true,
        no_scale_cache: false,
        centered_scaling: true,
    }
}

fn kind_defaults(erasable: bool, lock_scaling_flip: bool) -> ObjectDefaults {
    ObjectDefaults { erasable, lock_scaling_flip, controls: standard_controls() }
}

impl CanvasDefaults {
    /// The application's standard look: blue circular handles, padded
    /// selection, centered scaling. Vector primitives and freehand paths are
    /// erasable; images, text, lines and groups are not. Text and groups
    /// refuse to flip when scaled past zero.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            circle: kind_defaults(true, false),
            rect: kind_defaults(true, false),
            triangle: kind_defaults(true, false),
            line: kind_defaults(false, false),
            path: kind_defaults(true, false),
            image: kind_defaults(false, false),
            text: kind_defaults(false, true),
            group: kind_defaults(false, true),
        }
    }

    #[must_use]
    pub fn for_kind(&self, kind: ObjectKind) -> &ObjectDefaults {
        match kind {
            ObjectKind::Circle => &self.circle,
            ObjectKind::Rect => &self.rect,
            ObjectKind::Triangle => &self.triangle,
            ObjectKind::Line => &self.line,
            ObjectKind::Path => &self.path,
            ObjectKind::Image => &self.image,
            ObjectKind::Text => &self.text,
            ObjectKind::Group => &self.group,
        }
    }
}

impl Default for CanvasDefaults {
    fn default() -> Self {
        Self::standard()
    }
}

/// Creates objects with a fresh id, the kind's defaults, and a z-index above
/// everything created before.
#[derive(Debug, Clone)]
pub struct ObjectFactory {
    defaults: CanvasDefaults,
    next_z: i64,
}

impl ObjectFactory {
    #[must_use]
    pub fn new(defaults: CanvasDefaults) -> Self {
        Self { defaults, next_z: 0 }
    }

    /// Make sure the next object stacks above `z`.
    pub fn stack_above(&mut self, z: i64) {
        self.next_z = self.next_z.max(z.saturating_add(1));
    }

    /// Create an object of `kind` occupying `bounds`.
    pub fn create(&mut self, kind: ObjectKind, bounds: Bounds, props: serde_json::Value) -> DrawableObject {
        let d = self.defaults.for_kind(kind);
        let z_index = self.next_z;
        self.next_z += 1;
        DrawableObject {
            id: Uuid::new_v4(),
            kind,
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            z_index,
            points: Vec::new(),
            props,
            visible: true,
            selectable: true,
            evented: true,
            selected: false,
            locked: false,
            erasable: d.erasable,
            locks: Locks { scaling_flip: d.lock_scaling_flip, ..Locks::default() },
            controls: d.controls.clone(),
            name: None,
            erase_mask: Vec::new(),
        }
    }

    /// Create a line or path through `points`. Bounds follow the points.
    /// Returns `None` for an empty point list.
    pub fn create_polyline(
        &mut self,
        kind: ObjectKind,
        points: Vec<Point>,
        props: serde_json::Value,
    ) -> Option<DrawableObject> {
        let bounds = Bounds::from_points(&points)?;
        let mut obj = self.create(kind, bounds, props);
        obj.points = points;
        Some(obj)
    }
}
