//! Offscreen rasterising: draws one object plus its erase mask into RGBA pixels.
//!
//! This module is the only place that touches [`tiny_skia`]. It reads a single
//! [`DrawableObject`] and produces a straight-alpha RGBA buffer covering the
//! object's painted bounds. Erase strokes are painted with a clearing blend, so
//! fully erased areas end up with alpha 0 and brush edges with partial alpha.
//! It never mutates application state.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use tiny_skia::{BlendMode, Color, FillRule, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, Rect, Stroke, Transform};
use tracing::debug;

use crate::consts::{MAX_RASTER_DIM, MITER_LIMIT, RASTER_MARGIN_PX};
use crate::doc::{DrawableObject, EraseStroke, ObjectId, ObjectKind, Props};
use crate::geometry::Bounds;
use crate::hit::painted_bounds;

/// Error returned when an object cannot be rasterised.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    /// The object covers no area, so there is nothing to render.
    #[error("object {id} has empty bounds ({width}x{height})")]
    EmptyBounds { id: ObjectId, width: f64, height: f64 },
    /// The offscreen pixmap would exceed [`MAX_RASTER_DIM`] on some edge.
    #[error("object {id} needs a {width}x{height} pixmap, over the {MAX_RASTER_DIM}px limit")]
    TooLarge { id: ObjectId, width: f64, height: f64 },
    /// The object kind has no vector outline this rasteriser can draw.
    #[error("{0:?} objects have no vector geometry to rasterise")]
    Unsupported(ObjectKind),
    /// A fill or stroke color string could not be parsed.
    #[error("invalid color {value:?}: {reason}")]
    InvalidColor { value: String, reason: String },
}

/// Straight-alpha RGBA pixels, row-major, top-to-bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl RgbaImage {
    /// Alpha byte of every pixel, in buffer order.
    pub fn alphas(&self) -> impl Iterator<Item = u8> + '_ {
        self.data.chunks_exact(4).map(|px| px[3])
    }

    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// Render an object for erase evaluation.
///
/// Returns `Ok(None)` when the object is not erasable or carries no erase
/// mask: there is nothing to evaluate.
///
/// # Errors
///
/// Propagates [`render_object`] failures.
pub fn extract_erase_pixels(obj: &DrawableObject) -> Result<Option<RgbaImage>, RasterError> {
    if !obj.erasable || !obj.has_erase_mask() {
        return Ok(None);
    }
    render_object(obj).map(Some)
}

/// Render an object with its erase mask applied.
///
/// The pixmap covers the object's painted bounds, miter tips included, plus a
/// one-pixel margin for anti-aliased edges.
///
/// # Errors
///
/// Returns [`RasterError::EmptyBounds`] for zero-area objects,
/// [`RasterError::TooLarge`] for oversized ones, [`RasterError::Unsupported`]
/// for images, text and groups, and [`RasterError::InvalidColor`] for
/// unparseable style colors.
pub fn render_object(obj: &DrawableObject) -> Result<RgbaImage, RasterError> {
    let props = Props::new(&obj.props);
    let outline = object_path(obj)?;

    let area = painted_bounds(obj).inflate(RASTER_MARGIN_PX);
    let (width, height) = pixmap_size(obj.id, area)?;
    let mut pixmap = Pixmap::new(width, height).ok_or(RasterError::EmptyBounds {
        id: obj.id,
        width: area.width,
        height: area.height,
    })?;
    let transform = Transform::from_translate(to_f32(-area.x), to_f32(-area.y));

    if obj.kind.is_closed() {
        if let Some(fill) = props.fill() {
            let paint = solid_paint(parse_color(fill)?);
            pixmap.fill_path(&outline, &paint, FillRule::Winding, transform, None);
        }
    }

    let stroke_width = props.stroke_width();
    if stroke_width > 0.0 {
        let paint = solid_paint(parse_color(props.stroke())?);
        let (line_cap, line_join) = if obj.kind.is_polyline() {
            (LineCap::Round, LineJoin::Round)
        } else {
            (LineCap::Butt, LineJoin::Miter)
        };
        let stroke = Stroke {
            width: to_f32(stroke_width),
            miter_limit: to_f32(MITER_LIMIT),
            line_cap,
            line_join,
            ..Stroke::default()
        };
        pixmap.stroke_path(&outline, &paint, &stroke, transform, None);
    }

    for erase in &obj.erase_mask {
        clear_stroke(&mut pixmap, erase, transform);
    }

    debug!(id = %obj.id, width, height, strokes = obj.erase_mask.len(), "rasterised object");

    let data = pixmap
        .pixels()
        .iter()
        .flat_map(|px| {
            let c = px.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    Ok(RgbaImage { width, height, data })
}

fn object_path(obj: &DrawableObject) -> Result<Path, RasterError> {
    let empty = || RasterError::EmptyBounds { id: obj.id, width: obj.width, height: obj.height };

    if obj.kind.is_closed() && !(obj.width > 0.0 && obj.height > 0.0) {
        return Err(empty());
    }

    match obj.kind {
        ObjectKind::Circle => {
            let rect = Rect::from_xywh(to_f32(obj.x), to_f32(obj.y), to_f32(obj.width), to_f32(obj.height))
                .ok_or_else(empty)?;
            PathBuilder::from_oval(rect).ok_or_else(empty)
        }
        ObjectKind::Rect => {
            let rect = Rect::from_xywh(to_f32(obj.x), to_f32(obj.y), to_f32(obj.width), to_f32(obj.height))
                .ok_or_else(empty)?;
            Ok(PathBuilder::from_rect(rect))
        }
        ObjectKind::Triangle => {
            let b = obj.bounds();
            let mut pb = PathBuilder::new();
            pb.move_to(to_f32(b.x), to_f32(b.bottom()));
            pb.line_to(to_f32(b.center().x), to_f32(b.y));
            pb.line_to(to_f32(b.right()), to_f32(b.bottom()));
            pb.close();
            pb.finish().ok_or_else(empty)
        }
        ObjectKind::Line | ObjectKind::Path => {
            let points = if obj.kind == ObjectKind::Line {
                &obj.points[..obj.points.len().min(2)]
            } else {
                &obj.points[..]
            };
            polyline(points.iter().map(|p| (p.x, p.y))).ok_or_else(empty)
        }
        ObjectKind::Image | ObjectKind::Text | ObjectKind::Group => Err(RasterError::Unsupported(obj.kind)),
    }
}

/// Open polyline through the points. A lone point becomes a zero-length
/// segment so round caps still paint a dot.
fn polyline(mut points: impl Iterator<Item = (f64, f64)>) -> Option<Path> {
    let (x0, y0) = points.next()?;
    let mut pb = PathBuilder::new();
    pb.move_to(to_f32(x0), to_f32(y0));
    let mut segments = 0;
    for (x, y) in points {
        pb.line_to(to_f32(x), to_f32(y));
        segments += 1;
    }
    if segments == 0 {
        pb.line_to(to_f32(x0), to_f32(y0));
    }
    pb.finish()
}

fn clear_stroke(pixmap: &mut Pixmap, erase: &EraseStroke, transform: Transform) {
    if erase.width <= 0.0 {
        return;
    }
    let paint = Paint { blend_mode: BlendMode::Clear, anti_alias: true, ..Paint::default() };

    if let [p] = erase.points.as_slice() {
        if let Some(dot) = PathBuilder::from_circle(to_f32(p.x), to_f32(p.y), to_f32(erase.width / 2.0)) {
            pixmap.fill_path(&dot, &paint, FillRule::Winding, transform, None);
        }
        return;
    }

    if let Some(path) = polyline(erase.points.iter().map(|p| (p.x, p.y))) {
        let stroke = Stroke {
            width: to_f32(erase.width),
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &paint, &stroke, transform, None);
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn pixmap_size(id: ObjectId, area: Bounds) -> Result<(u32, u32), RasterError> {
    let (w, h) = (area.width.ceil(), area.height.ceil());
    if !(w.is_finite() && h.is_finite()) || w < 1.0 || h < 1.0 {
        return Err(RasterError::EmptyBounds { id, width: area.width, height: area.height });
    }
    if w > f64::from(MAX_RASTER_DIM) || h > f64::from(MAX_RASTER_DIM) {
        return Err(RasterError::TooLarge { id, width: w, height: h });
    }
    Ok((w as u32, h as u32))
}

fn parse_color(value: &str) -> Result<Color, RasterError> {
    let parsed = csscolorparser::parse(value)
        .map_err(|e| RasterError::InvalidColor { value: value.to_owned(), reason: e.to_string() })?;
    let [r, g, b, a] = parsed.to_rgba8();
    Ok(Color::from_rgba8(r, g, b, a))
}

fn solid_paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;
    paint
}

#[allow(clippy::cast_possible_truncation)]
fn to_f32(v: f64) -> f32 {
    v as f32
}
