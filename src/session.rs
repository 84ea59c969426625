//! Session replay: drives the engine and the erase pipeline from a script of
//! user actions, then reports what is left on the canvas.
//!
//! A script is a JSON document `{"steps": [...]}`. Each step is tagged by
//! `op`; objects are referred to by the order the script added them in.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::path::{Path, PathBuf};
use std::time::Duration;

use canvas::defaults::{CanvasDefaults, Shape};
use canvas::doc::{ObjectId, ObjectKind};
use canvas::engine::{Action, EngineCore};
use canvas::geometry::Point;
use canvas::input::Mode;
use eraser::{EraseCoordinator, EvaluatorWorker, Outcome, ResultReceiver, WorkerError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{AppConfig, ConfigError};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("evaluator worker: {0}")]
    Worker(#[from] WorkerError),
    #[error("failed to read script {path}: {source}")]
    ScriptRead { path: PathBuf, source: std::io::Error },
    #[error("invalid script: {0}")]
    ScriptParse(#[source] serde_json::Error),
    #[error("step {step}: no object #{index} (script added {added})")]
    UnknownObject { step: usize, index: usize, added: usize },
    #[error("step {step}: stroke needs at least one point")]
    EmptyStroke { step: usize },
    #[error("failed to encode summary: {0}")]
    Summary(#[source] serde_json::Error),
}

/// One user action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    AddShape { shape: Shape },
    SetMode { mode: Mode },
    PencilWidth { width: f64 },
    EraserWidth { width: f64 },
    /// Pointer down on the first point, moves through the rest, up on the last.
    Stroke { points: Vec<Point> },
    Lock {
        index: usize,
        #[serde(default = "default_locked")]
        locked: bool,
    },
    /// Wait for outstanding erase verdicts.
    Settle,
}

fn default_locked() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub steps: Vec<Step>,
}

impl Script {
    /// Load a script from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ScriptRead`] or [`AppError::ScriptParse`].
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| AppError::ScriptRead { path: path.to_owned(), source })?;
        Self::parse(&text)
    }

    /// # Errors
    ///
    /// Returns [`AppError::ScriptParse`] for malformed JSON or unknown steps.
    pub fn parse(text: &str) -> Result<Self, AppError> {
        serde_json::from_str(text).map_err(AppError::ScriptParse)
    }

    /// Built-in demo: wipes a circle completely, leaves a line alone (lines
    /// are not erasable), and nicks a pencil stroke.
    #[must_use]
    pub fn demo(config: &AppConfig) -> Self {
        let cx = config.canvas_width / 2.0;
        let cy = config.canvas_height / 2.0;
        let wipe = config.canvas_width.max(config.canvas_height) / 2.0;
        let y = config.canvas_height * 0.875;
        let x0 = config.canvas_width * 0.125;
        let x1 = config.canvas_width * 0.3;
        let mid = (x0 + x1) / 2.0;
        Self {
            steps: vec![
                Step::AddShape { shape: Shape::Circle },
                Step::AddShape { shape: Shape::Line },
                Step::SetMode { mode: Mode::Eraser },
                Step::EraserWidth { width: wipe },
                Step::Stroke { points: vec![Point::new(cx - 1.0, cy), Point::new(cx + 1.0, cy)] },
                Step::Settle,
                Step::SetMode { mode: Mode::Pencil },
                Step::Stroke { points: vec![Point::new(x0, y), Point::new(mid, y), Point::new(x1, y)] },
                Step::SetMode { mode: Mode::Eraser },
                Step::EraserWidth { width: config.eraser_width },
                Step::Stroke { points: vec![Point::new(mid, y - 20.0), Point::new(mid, y + 20.0)] },
            ],
        }
    }
}

/// A surviving object as reported at the end of a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectSummary {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub locked: bool,
    pub erase_strokes: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub objects: Vec<ObjectSummary>,
    pub removed: Vec<ObjectId>,
    pub gestures: usize,
    pub dispatched: usize,
    pub skipped: usize,
    pub retained: usize,
    /// Evaluations still outstanding when the session shut down.
    pub abandoned: usize,
}

impl Summary {
    /// # Errors
    ///
    /// Returns [`AppError::Summary`] if serialisation fails.
    pub fn to_json(&self) -> Result<String, AppError> {
        serde_json::to_string_pretty(self).map_err(AppError::Summary)
    }
}

/// The engine, the erase coordinator, and the verdict channel for one run.
pub struct Session {
    coord: EraseCoordinator<EngineCore, EvaluatorWorker>,
    results: ResultReceiver,
    added: Vec<ObjectId>,
    settle_timeout: Duration,
    summary: Summary,
}

impl Session {
    /// Build the engine from `config` and start the evaluator worker.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Worker`] if the worker cannot start.
    pub fn start(config: &AppConfig) -> Result<Self, AppError> {
        let mut core = EngineCore::new(CanvasDefaults::standard(), config.canvas_width, config.canvas_height);
        core.set_pencil_width(config.pencil_width);
        core.set_eraser_width(config.eraser_width);
        let (worker, results) = EvaluatorWorker::spawn(config.evaluator_queue)?;
        info!(
            width = config.canvas_width,
            height = config.canvas_height,
            queue = config.evaluator_queue,
            "session started"
        );
        Ok(Self {
            coord: EraseCoordinator::new(core, worker),
            results,
            added: Vec::new(),
            settle_timeout: config.settle_timeout,
            summary: Summary::default(),
        })
    }

    /// Replay every step in order.
    ///
    /// # Errors
    ///
    /// Stops at the first step that refers to a missing object or carries an
    /// empty stroke.
    pub async fn run(&mut self, script: &Script) -> Result<(), AppError> {
        for (step, action) in script.steps.iter().enumerate() {
            self.apply(step, action).await?;
        }
        Ok(())
    }

    async fn apply(&mut self, step: usize, action: &Step) -> Result<(), AppError> {
        debug!(step, ?action, "applying step");
        match action {
            Step::AddShape { shape } => {
                if let Some(id) = self.coord.surface_mut().add_shape(*shape) {
                    self.added.push(id);
                }
            }
            Step::SetMode { mode } => self.coord.surface_mut().set_mode(*mode),
            Step::PencilWidth { width } => self.coord.surface_mut().set_pencil_width(*width),
            Step::EraserWidth { width } => self.coord.surface_mut().set_eraser_width(*width),
            Step::Stroke { points } => {
                let actions = self.stroke(step, points)?;
                self.handle_actions(actions);
                self.drain();
            }
            Step::Lock { index, locked } => {
                let id = self.object_at(step, *index)?;
                self.coord.surface_mut().set_locked(&id, *locked);
            }
            Step::Settle => {
                let outcomes = self.coord.settle(&mut self.results, self.settle_timeout).await;
                self.record(&outcomes);
            }
        }
        Ok(())
    }

    fn stroke(&mut self, step: usize, points: &[Point]) -> Result<Vec<Action>, AppError> {
        let Some((first, rest)) = points.split_first() else {
            return Err(AppError::EmptyStroke { step });
        };
        let last = rest.last().unwrap_or(first);
        let core = self.coord.surface_mut();
        let mut actions = core.on_pointer_down(*first);
        for p in rest.iter().take(rest.len().saturating_sub(1)) {
            actions.extend(core.on_pointer_move(*p));
        }
        actions.extend(core.on_pointer_up(*last));
        Ok(actions)
    }

    fn handle_actions(&mut self, actions: Vec<Action>) {
        for action in actions {
            match action {
                Action::EraseCompleted(gesture) => {
                    let report = self.coord.handle_gesture(&gesture);
                    self.summary.gestures += 1;
                    self.summary.dispatched += report.dispatched.len();
                    self.summary.skipped += report.skipped.len();
                    for (object, reason) in &report.skipped {
                        debug!(%object, %reason, "object not evaluated");
                    }
                }
                Action::ObjectCreated(id) => self.added.push(id),
                Action::SelectionChanged(_) | Action::RenderNeeded => {}
            }
        }
    }

    /// Apply whatever verdicts have already arrived.
    fn drain(&mut self) {
        let outcomes = self.coord.drain_results(&mut self.results);
        self.record(&outcomes);
    }

    fn record(&mut self, outcomes: &[Outcome]) {
        for outcome in outcomes {
            match outcome {
                Outcome::Removed(id) => self.summary.removed.push(*id),
                Outcome::Retained(_) => self.summary.retained += 1,
                Outcome::Ignored | Outcome::AlreadyGone(_) => {}
            }
        }
    }

    fn object_at(&self, step: usize, index: usize) -> Result<ObjectId, AppError> {
        self.added
            .get(index)
            .copied()
            .ok_or(AppError::UnknownObject { step, index, added: self.added.len() })
    }

    /// Wait for outstanding verdicts, shut the pipeline down, and report the
    /// surviving objects.
    pub async fn finish(mut self) -> Summary {
        let outcomes = self.coord.settle(&mut self.results, self.settle_timeout).await;
        self.record(&outcomes);

        self.summary.abandoned = self.coord.pending_len();
        if self.summary.abandoned > 0 {
            warn!(abandoned = self.summary.abandoned, "shutting down with erase verdicts outstanding");
        }
        self.coord.shutdown();

        self.summary.objects = self
            .coord
            .surface()
            .objects()
            .into_iter()
            .map(|o| ObjectSummary { id: o.id, kind: o.kind, locked: o.locked, erase_strokes: o.erase_mask.len() })
            .collect();
        info!(
            objects = self.summary.objects.len(),
            removed = self.summary.removed.len(),
            gestures = self.summary.gestures,
            "session finished"
        );
        self.summary
    }
}
