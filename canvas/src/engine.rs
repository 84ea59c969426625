use serde_json::json;
use tracing::{debug, info};

use crate::consts::{
    CIRCLE_RADIUS_RATIO, DEFAULT_CANVAS_SIZE, LINE_END_RATIO, LINE_START, MIN_BRUSH_WIDTH, SHAPE_SIZE_RATIO,
    SHAPE_STROKE_WIDTH,
};
use crate::defaults::{CanvasDefaults, ObjectFactory, Shape};
use crate::doc::{DocStore, DrawableObject, EraseStroke, ObjectId, ObjectKind};
use crate::geometry::{Bounds, Point};
use crate::hit;
use crate::input::{EraseGesture, InputState, Mode, UiState};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ObjectCreated(ObjectId),
    SelectionChanged(Option<ObjectId>),
    /// An erase stroke finished; hand it to the erase coordinator.
    EraseCompleted(EraseGesture),
    RenderNeeded,
}

/// Core engine state: the scene graph, UI state, and the gesture in progress.
///
/// Everything here is plain data so it can be driven and inspected in tests
/// without a window or a browser.
pub struct EngineCore {
    pub doc: DocStore,
    pub ui: UiState,
    pub input: InputState,
    factory: ObjectFactory,
    canvas_width: f64,
    canvas_height: f64,
    redraw_requested: bool,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(CanvasDefaults::standard(), DEFAULT_CANVAS_SIZE, DEFAULT_CANVAS_SIZE)
    }
}

impl EngineCore {
    /// Create an engine for a `width` × `height` canvas using `defaults` for
    /// every object it creates.
    #[must_use]
    pub fn new(defaults: CanvasDefaults, width: f64, height: f64) -> Self {
        Self {
            doc: DocStore::new(),
            ui: UiState::default(),
            input: InputState::Idle,
            factory: ObjectFactory::new(defaults),
            canvas_width: width,
            canvas_height: height,
            redraw_requested: false,
        }
    }

    // --- Data inputs ---

    /// Insert an externally built object (e.g. an imported image or SVG group),
    /// keeping the factory's stacking order above it.
    pub fn add_object(&mut self, object: DrawableObject) -> ObjectId {
        let id = object.id;
        self.factory.stack_above(object.z_index);
        self.doc.insert(object);
        self.request_redraw();
        id
    }

    /// Add one of the menu shapes, centered on the canvas.
    ///
    /// Returns `None` for shapes that have no drawing yet.
    pub fn add_shape(&mut self, shape: Shape) -> Option<ObjectId> {
        let w = self.canvas_width;
        let style = json!({ "fill": "transparent", "stroke": "black", "stroke_width": SHAPE_STROKE_WIDTH });
        let mut obj = match shape {
            Shape::Circle => {
                let d = w * CIRCLE_RADIUS_RATIO * 2.0;
                self.factory.create(ObjectKind::Circle, Bounds::new(0.0, 0.0, d, d), style)
            }
            Shape::Square => {
                let s = w * SHAPE_SIZE_RATIO;
                self.factory.create(ObjectKind::Rect, Bounds::new(0.0, 0.0, s, s), style)
            }
            Shape::Triangle => {
                let s = w * SHAPE_SIZE_RATIO;
                self.factory.create(ObjectKind::Triangle, Bounds::new(0.0, 0.0, s, s), style)
            }
            Shape::Line => {
                let end = w * LINE_END_RATIO;
                let points = vec![Point::new(LINE_START, LINE_START), Point::new(end, end)];
                self.factory.create_polyline(
                    ObjectKind::Line,
                    points,
                    json!({ "stroke": "black", "stroke_width": SHAPE_STROKE_WIDTH }),
                )?
            }
            Shape::Arrow => {
                debug!(?shape, "shape not drawable");
                return None;
            }
        };
        obj.controls.stroke_uniform = false;
        obj.center_on(Point::new(self.canvas_width / 2.0, self.canvas_height / 2.0));
        info!(id = %obj.id, kind = ?obj.kind, "shape added");
        Some(self.add_object(obj))
    }

    /// Remove an object from the scene graph.
    pub fn delete(&mut self, id: &ObjectId) -> Option<DrawableObject> {
        let removed = self.doc.remove(id)?;
        if self.ui.selected_id.as_ref() == Some(id) {
            self.ui.selected_id = None;
        }
        self.request_redraw();
        Some(removed)
    }

    /// Lock or unlock an object. Returns false if it doesn't exist.
    pub fn set_locked(&mut self, id: &ObjectId, locked: bool) -> bool {
        let Some(obj) = self.doc.get_mut(id) else {
            return false;
        };
        obj.set_locked(locked);
        true
    }

    /// Append an erase stroke to an object's mask. Returns false if the object
    /// is missing or not erasable.
    pub fn commit_erase(&mut self, id: &ObjectId, stroke: &EraseStroke) -> bool {
        let committed = self.doc.commit_erase_stroke(id, stroke);
        if committed {
            self.request_redraw();
        }
        committed
    }

    // --- Mode / brushes ---

    /// Switch drawing mode. Any stroke in progress is dropped; erase work
    /// already handed off is unaffected.
    pub fn set_mode(&mut self, mode: Mode) {
        if !matches!(self.input, InputState::Idle) {
            debug!(from = ?self.ui.mode, to = ?mode, "dropping in-progress stroke on mode change");
        }
        self.ui.mode = mode;
        self.input = InputState::Idle;
    }

    pub fn set_pencil_width(&mut self, width: f64) {
        self.ui.pencil_width = width.max(MIN_BRUSH_WIDTH);
    }

    pub fn set_eraser_width(&mut self, width: f64) {
        self.ui.eraser_width = width.max(MIN_BRUSH_WIDTH);
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, world_pt: Point) -> Vec<Action> {
        match self.ui.mode {
            Mode::Cursor => {
                let hit = hit::hit_test(world_pt, &self.doc);
                self.select(hit)
            }
            Mode::Pencil => {
                self.input = InputState::Drawing { points: vec![world_pt] };
                Vec::new()
            }
            Mode::Eraser => {
                self.input = InputState::Erasing { points: vec![world_pt] };
                Vec::new()
            }
        }
    }

    pub fn on_pointer_move(&mut self, world_pt: Point) -> Vec<Action> {
        if self.input.push_point(world_pt) {
            vec![Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    pub fn on_pointer_up(&mut self, world_pt: Point) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::Idle => Vec::new(),
            InputState::Drawing { mut points } => {
                points.push(world_pt);
                self.finish_pencil_stroke(points)
            }
            InputState::Erasing { mut points } => {
                points.push(world_pt);
                self.finish_erase_stroke(points)
            }
        }
    }

    fn finish_pencil_stroke(&mut self, points: Vec<Point>) -> Vec<Action> {
        let props = json!({ "stroke": self.ui.pencil_color, "stroke_width": self.ui.pencil_width });
        let Some(obj) = self.factory.create_polyline(ObjectKind::Path, points, props) else {
            return Vec::new();
        };
        let id = self.add_object(obj);
        vec![Action::ObjectCreated(id), Action::RenderNeeded]
    }

    fn finish_erase_stroke(&mut self, points: Vec<Point>) -> Vec<Action> {
        let stroke = EraseStroke::new(points, self.ui.eraser_width);
        let targets = hit::objects_under_stroke(&stroke, &self.doc);
        debug!(points = stroke.points.len(), targets = targets.len(), "erase stroke finished");
        vec![Action::EraseCompleted(EraseGesture { stroke, targets }), Action::RenderNeeded]
    }

    fn select(&mut self, id: Option<ObjectId>) -> Vec<Action> {
        if self.ui.selected_id == id {
            return Vec::new();
        }
        if let Some(prev) = self.ui.selected_id.and_then(|p| self.doc.get_mut(&p)) {
            prev.selected = false;
        }
        if let Some(obj) = id.and_then(|n| self.doc.get_mut(&n)) {
            obj.selected = true;
        }
        self.ui.selected_id = id;
        vec![Action::SelectionChanged(id), Action::RenderNeeded]
    }

    // --- Redraw ---

    /// Ask the host to repaint the visible surface.
    pub fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }

    /// Consume the pending redraw request, if any.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    // --- Queries ---

    /// The currently selected object, if any.
    #[must_use]
    pub fn selection(&self) -> Option<ObjectId> {
        self.ui.selected_id
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.ui.mode
    }

    /// Look up an object by ID.
    #[must_use]
    pub fn object(&self, id: &ObjectId) -> Option<&DrawableObject> {
        self.doc.get(id)
    }

    /// Objects in draw order.
    #[must_use]
    pub fn objects(&self) -> Vec<&DrawableObject> {
        self.doc.sorted_objects()
    }

    #[must_use]
    pub fn canvas_size(&self) -> (f64, f64) {
        (self.canvas_width, self.canvas_height)
    }
}
