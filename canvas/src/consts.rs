//! Shared numeric constants for the canvas crate.

// ── Canvas ──────────────────────────────────────────────────────

/// Default logical canvas edge length (square canvas).
pub const DEFAULT_CANVAS_SIZE: f64 = 800.0;

/// Default width for both the pencil and the eraser brush.
pub const DEFAULT_BRUSH_WIDTH: f64 = 10.0;

/// Narrowest brush the engine accepts.
pub const MIN_BRUSH_WIDTH: f64 = 1.0;

/// Pencil stroke color.
pub const DEFAULT_PENCIL_COLOR: &str = "#000000";

// ── Shapes ──────────────────────────────────────────────────────

/// Circle radius as a fraction of canvas width.
pub const CIRCLE_RADIUS_RATIO: f64 = 0.1;

/// Square and triangle edge as a fraction of canvas width.
pub const SHAPE_SIZE_RATIO: f64 = 0.2;

/// Line end coordinate as a fraction of canvas width; the start is fixed.
pub const LINE_END_RATIO: f64 = 0.3;

/// Fixed start coordinate of a new line.
pub const LINE_START: f64 = 50.0;

/// Stroke width for newly added shapes.
pub const SHAPE_STROKE_WIDTH: f64 = 3.0;

// ── Controls ────────────────────────────────────────────────────

/// Selection border and corner color.
pub const CONTROL_COLOR: &str = "#3b82f6";

/// Corner handle size in pixels.
pub const CORNER_SIZE: f64 = 10.0;

/// Gap between an object and its selection border.
pub const CONTROL_PADDING: f64 = 10.0;

// ── Rasterising ─────────────────────────────────────────────────

/// Extra pixels around the stroke-inflated bounds for anti-aliased edges.
pub const RASTER_MARGIN_PX: f64 = 1.0;

/// Miter length limit for closed outlines, in half stroke widths. Sharper
/// corners fall back to a bevel.
pub const MITER_LIMIT: f64 = 4.0;

/// Largest offscreen pixmap edge the rasteriser will allocate.
pub const MAX_RASTER_DIM: u32 = 8192;
