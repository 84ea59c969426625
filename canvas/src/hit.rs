//! Hit-testing: which objects sit under a point or an erase stroke.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use std::f64::consts::PI;

use crate::consts::MITER_LIMIT;
use crate::doc::{DocStore, DrawableObject, EraseStroke, ObjectId, ObjectKind, Props};
use crate::geometry::{Bounds, Point};

/// Bounds of the painted area: geometry plus however far the outline
/// reaches past it, mitered corners included.
#[must_use]
pub fn painted_bounds(obj: &DrawableObject) -> Bounds {
    let half = Props::new(&obj.props).stroke_width().max(0.0) / 2.0;
    obj.bounds().inflate(half * join_reach(obj))
}

/// Distance a corner's miter tip sticks out past the geometry, in half
/// stroke widths. Axis-aligned rect corners stay inside the half-width box.
fn join_reach(obj: &DrawableObject) -> f64 {
    if obj.kind != ObjectKind::Triangle {
        return 1.0;
    }
    let apex = 2.0 * (obj.width.abs() / 2.0).atan2(obj.height.abs());
    let base = (PI - apex) / 2.0;
    let ratio = 1.0 / (apex.min(base) / 2.0).sin();
    if ratio.is_finite() && ratio <= MITER_LIMIT { ratio } else { 1.0 }
}

/// Top-most visible, evented object whose painted bounds contain `world_pt`.
#[must_use]
pub fn hit_test(world_pt: Point, doc: &DocStore) -> Option<ObjectId> {
    doc.sorted_objects()
        .into_iter()
        .rev()
        .filter(|o| o.visible && o.evented)
        .find(|o| painted_bounds(o).contains(world_pt))
        .map(|o| o.id)
}

/// Erasable, visible objects touched by `stroke`, top-most first.
///
/// An object is touched when the stroke centerline passes within half the
/// brush width of its painted bounds.
#[must_use]
pub fn objects_under_stroke(stroke: &EraseStroke, doc: &DocStore) -> Vec<ObjectId> {
    let reach = stroke.width.max(0.0) / 2.0;
    doc.sorted_objects()
        .into_iter()
        .rev()
        .filter(|o| o.visible && o.erasable)
        .filter(|o| painted_bounds(o).inflate(reach).intersects_polyline(&stroke.points))
        .map(|o| o.id)
        .collect()
}
