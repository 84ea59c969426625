//! Document model: drawable objects, their properties, and the scene graph store.
//!
//! This module defines what is on the canvas (`DrawableObject`, `ObjectKind`),
//! the interaction and control-chrome state every object carries (`Locks`,
//! `Controls`), a typed accessor for the open-ended `props` JSON bag
//! (`Props`), the erase strokes committed onto an object (`EraseStroke`), and
//! the runtime store that owns all live objects (`DocStore`).
//!
//! Objects are addressed by a stable [`ObjectId`] assigned when they are
//! created. The store is the explicit id → object table; nothing outside it
//! holds references to objects.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{Bounds, Point};

/// Unique identifier for a drawable object.
pub type ObjectId = Uuid;

/// The kind of a drawable object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// Circle inscribed within the bounding box.
    Circle,
    /// Axis-aligned rectangle.
    Rect,
    /// Isosceles triangle with its apex at the top edge midpoint.
    Triangle,
    /// Straight segment between the first two `points`.
    Line,
    /// Freehand polyline through `points`.
    Path,
    /// Imported raster image.
    Image,
    /// Editable text.
    Text,
    /// Group of imported SVG elements.
    Group,
}

impl ObjectKind {
    /// Whether the kind's outline is closed and can be filled.
    #[must_use]
    pub fn is_closed(self) -> bool {
        matches!(self, Self::Circle | Self::Rect | Self::Triangle)
    }

    /// Whether geometry comes from `points` rather than the bounding box.
    #[must_use]
    pub fn is_polyline(self) -> bool {
        matches!(self, Self::Line | Self::Path)
    }
}

/// Shape of the selection corner handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CornerStyle {
    #[default]
    Rect,
    Circle,
}

/// Transform locks. All of them flip together when an object is locked.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Locks {
    pub movement_x: bool,
    pub movement_y: bool,
    pub scaling_x: bool,
    pub scaling_y: bool,
    pub rotation: bool,
    pub scaling_flip: bool,
    pub skewing_x: bool,
    pub skewing_y: bool,
}

impl Locks {
    /// Every lock set to `value`.
    #[must_use]
    pub fn all(value: bool) -> Self {
        Self {
            movement_x: value,
            movement_y: value,
            scaling_x: value,
            scaling_y: value,
            rotation: value,
            scaling_flip: value,
            skewing_x: value,
            skewing_y: value,
        }
    }
}

/// Selection chrome and scaling behavior.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Controls {
    pub has_controls: bool,
    pub transparent_corners: bool,
    pub border_color: String,
    pub corner_color: String,
    pub corner_size: f64,
    pub corner_style: CornerStyle,
    pub padding: f64,
    pub stroke_uniform: bool,
    pub no_scale_cache: bool,
    pub centered_scaling: bool,
}

/// One erase stroke committed into an object's erase mask.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EraseStroke {
    /// Stroke centerline in world coordinates.
    pub points: Vec<Point>,
    /// Brush diameter in world units.
    pub width: f64,
}

impl EraseStroke {
    #[must_use]
    pub fn new(points: Vec<Point>, width: f64) -> Self {
        Self { points, width }
    }
}

/// A drawable object as stored in the scene graph.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawableObject {
    /// Stable identifier assigned at creation.
    pub id: ObjectId,
    pub kind: ObjectKind,
    /// Left edge of the bounding box in world coordinates.
    pub x: f64,
    /// Top edge of the bounding box in world coordinates.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Stacking order; lower values are drawn beneath higher values.
    pub z_index: i64,
    /// Geometry for lines and paths, in world coordinates.
    #[serde(default)]
    pub points: Vec<Point>,
    /// Open-ended style properties (fill, stroke, stroke width).
    pub props: serde_json::Value,
    pub visible: bool,
    pub selectable: bool,
    pub evented: bool,
    pub selected: bool,
    pub locked: bool,
    /// Whether erase strokes apply to this object.
    pub erasable: bool,
    pub locks: Locks,
    pub controls: Controls,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Erase strokes committed so far. Empty means no mask.
    #[serde(default)]
    pub erase_mask: Vec<EraseStroke>,
}

impl DrawableObject {
    /// The object's geometric bounding box (stroke not included).
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }

    /// Move the object so its bounding box is centered on `center`.
    pub fn center_on(&mut self, center: Point) {
        let dx = center.x - (self.x + self.width / 2.0);
        let dy = center.y - (self.y + self.height / 2.0);
        self.x += dx;
        self.y += dy;
        for p in &mut self.points {
            p.x += dx;
            p.y += dy;
        }
    }

    /// Lock or unlock the object. Locking freezes every transform and makes
    /// the object immune to the eraser; unlocking reverses both.
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
        self.locks = Locks::all(locked);
        self.erasable = !locked;
    }

    /// Whether any erase stroke has been committed.
    #[must_use]
    pub fn has_erase_mask(&self) -> bool {
        !self.erase_mask.is_empty()
    }
}

/// Typed access to common props fields from a `DrawableObject.props` JSON value.
pub struct Props<'a> {
    value: &'a serde_json::Value,
}

impl<'a> Props<'a> {
    /// Wrap a reference to a `props` JSON value for typed access.
    #[must_use]
    pub fn new(value: &'a serde_json::Value) -> Self {
        Self { value }
    }

    /// Fill color as a CSS color string. `None` when absent or null.
    #[must_use]
    pub fn fill(&self) -> Option<&str> {
        self.value.get("fill").and_then(|v| v.as_str())
    }

    /// Stroke color as a CSS color string. Defaults to `"#000000"` when absent.
    #[must_use]
    pub fn stroke(&self) -> &str {
        self.value
            .get("stroke")
            .and_then(|v| v.as_str())
            .unwrap_or("#000000")
    }

    /// Stroke width in world units. Defaults to `1.0` when absent.
    #[must_use]
    pub fn stroke_width(&self) -> f64 {
        self.value
            .get("stroke_width")
            .and_then(serde_json::Value::as_f64)
            .unwrap_or(1.0)
    }
}

/// In-memory scene graph.
pub struct DocStore {
    objects: HashMap<ObjectId, DrawableObject>,
}

impl DocStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { objects: HashMap::new() }
    }

    /// Insert or replace an object. If an object with the same `id` already
    /// exists it is overwritten.
    pub fn insert(&mut self, obj: DrawableObject) {
        self.objects.insert(obj.id, obj);
    }

    /// Remove an object by id, returning it if it was present.
    pub fn remove(&mut self, id: &ObjectId) -> Option<DrawableObject> {
        self.objects.remove(id)
    }

    /// Return a reference to an object by id.
    #[must_use]
    pub fn get(&self, id: &ObjectId) -> Option<&DrawableObject> {
        self.objects.get(id)
    }

    /// Return a mutable reference to an object by id.
    pub fn get_mut(&mut self, id: &ObjectId) -> Option<&mut DrawableObject> {
        self.objects.get_mut(id)
    }

    /// Append an erase stroke to an object's mask. Returns false if the
    /// object doesn't exist or is not erasable.
    pub fn commit_erase_stroke(&mut self, id: &ObjectId, stroke: &EraseStroke) -> bool {
        match self.objects.get_mut(id) {
            Some(obj) if obj.erasable => {
                obj.erase_mask.push(stroke.clone());
                true
            }
            _ => false,
        }
    }

    /// Return all objects sorted by `(z_index, id)` for draw-order.
    #[must_use]
    pub fn sorted_objects(&self) -> Vec<&DrawableObject> {
        let mut objs: Vec<&DrawableObject> = self.objects.values().collect();
        objs.sort_by(|a, b| a.z_index.cmp(&b.z_index).then_with(|| a.id.cmp(&b.id)));
        objs
    }

    /// Number of objects currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if the store contains no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for DocStore {
    fn default() -> Self {
        Self::new()
    }
}
