//! Erase coordinator: turns finished erase gestures into evaluations and
//! applies the verdicts to the scene graph.
//!
//! DESIGN
//! ======
//! The coordinator lives on the interactive thread next to the surface it
//! mutates. For each object under a gesture it commits the stroke into the
//! object's mask, rasterises the object, and dispatches the pixels under a
//! fresh [`CorrelationId`]. The `pending` table maps each in-flight id to its
//! object and is the only record of outstanding work; a verdict whose id is
//! not in the table is dropped.
//!
//! ERROR HANDLING
//! ==============
//! Failures are per object. A rasterising error, a missing mask, or a refused
//! dispatch skips that one object and is reported in the [`GestureReport`];
//! the rest of the gesture proceeds. An object whose evaluation never
//! completes simply keeps its partial mask.

#[cfg(test)]
#[path = "coordinator_test.rs"]
mod coordinator_test;

use std::collections::HashMap;
use std::time::Duration;

use canvas::doc::ObjectId;
use canvas::input::EraseGesture;
use canvas::render::RasterError;
use protocol::{CorrelationId, CorrelationIds, EvaluationRequest, EvaluationResult};
use tracing::{debug, info, warn};

use crate::surface::EraseSurface;
use crate::worker::{Dispatch, DispatchError, ResultReceiver};

/// Why an object under a gesture was not sent for evaluation.
#[derive(Debug, thiserror::Error)]
pub enum SkipReason {
    #[error("object has no erase mask")]
    NoMask,
    #[error("rasterising failed: {0}")]
    Raster(#[from] RasterError),
    #[error("evaluator has been shut down")]
    EvaluatorUnavailable,
    #[error("dispatch failed: {0}")]
    DispatchFailed(#[from] DispatchError),
}

/// What one gesture produced.
#[derive(Debug, Default)]
pub struct GestureReport {
    /// Objects sent for evaluation, with the id their verdict will carry.
    pub dispatched: Vec<(CorrelationId, ObjectId)>,
    pub skipped: Vec<(ObjectId, SkipReason)>,
}

/// What applying one verdict did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No pending entry for the id.
    Ignored,
    Removed(ObjectId),
    Retained(ObjectId),
    /// The verdict said erased but the object was already gone.
    AlreadyGone(ObjectId),
}

pub struct EraseCoordinator<S, D> {
    surface: S,
    evaluator: Option<D>,
    pending: HashMap<CorrelationId, ObjectId>,
    ids: CorrelationIds,
}

impl<S: EraseSurface, D: Dispatch> EraseCoordinator<S, D> {
    #[must_use]
    pub fn new(surface: S, evaluator: D) -> Self {
        Self { surface, evaluator: Some(evaluator), pending: HashMap::new(), ids: CorrelationIds::new() }
    }

    /// Process a completed erase gesture.
    ///
    /// Masks are committed for every target before any of them is rendered.
    /// Nothing is removed here; removal waits for a verdict.
    pub fn handle_gesture(&mut self, gesture: &EraseGesture) -> GestureReport {
        for target in &gesture.targets {
            if !self.surface.commit_erase_mask(target, &gesture.stroke) {
                debug!(object = %target, "erase mask not committed");
            }
        }

        let mut report = GestureReport::default();
        for &target in &gesture.targets {
            match self.dispatch(target) {
                Ok(id) => report.dispatched.push((id, target)),
                Err(reason) => report.skipped.push((target, reason)),
            }
        }

        debug!(
            targets = gesture.targets.len(),
            dispatched = report.dispatched.len(),
            skipped = report.skipped.len(),
            pending = self.pending.len(),
            "erase gesture handled"
        );
        report
    }

    fn dispatch(&mut self, target: ObjectId) -> Result<CorrelationId, SkipReason> {
        let pixels = match self.surface.extract_erase_pixels(&target) {
            Ok(Some(pixels)) => pixels,
            Ok(None) => return Err(SkipReason::NoMask),
            Err(e) => {
                warn!(object = %target, error = %e, "skipping object that failed to rasterise");
                return Err(e.into());
            }
        };
        let Some(evaluator) = self.evaluator.as_mut() else {
            debug!(object = %target, "evaluator shut down; object keeps its partial mask");
            return Err(SkipReason::EvaluatorUnavailable);
        };

        let id = self.ids.next_id();
        self.pending.insert(id, target);
        if let Err(e) = evaluator.dispatch(EvaluationRequest::new(id, pixels)) {
            self.pending.remove(&id);
            warn!(%id, object = %target, error = %e, "evaluation dispatch failed; object keeps its partial mask");
            return Err(e.into());
        }
        Ok(id)
    }

    /// Apply one verdict. Safe in any order relative to other verdicts and to
    /// new gestures.
    pub fn handle_evaluation_result(&mut self, result: EvaluationResult) -> Outcome {
        let Some(object) = self.pending.remove(&result.id) else {
            debug!(id = %result.id, "no pending erasure for verdict");
            return Outcome::Ignored;
        };
        if !result.is_erased {
            debug!(id = %result.id, %object, "object partially erased; keeping it");
            return Outcome::Retained(object);
        }
        if !self.surface.remove_object(&object) {
            debug!(id = %result.id, %object, "fully erased object was already removed");
            return Outcome::AlreadyGone(object);
        }
        self.surface.request_redraw();
        info!(id = %result.id, %object, "fully erased object removed");
        Outcome::Removed(object)
    }

    /// Apply every verdict that has already arrived, without waiting.
    pub fn drain_results(&mut self, results: &mut ResultReceiver) -> Vec<Outcome> {
        let mut outcomes = Vec::new();
        while let Ok(result) = results.try_recv() {
            outcomes.push(self.handle_evaluation_result(result));
        }
        outcomes
    }

    /// Wait for outstanding verdicts until none are pending, the results
    /// channel closes, or `timeout` elapses.
    pub async fn settle(&mut self, results: &mut ResultReceiver, timeout: Duration) -> Vec<Outcome> {
        let deadline = tokio::time::Instant::now() + timeout;
        let mut outcomes = Vec::new();
        while !self.pending.is_empty() {
            match tokio::time::timeout_at(deadline, results.recv()).await {
                Ok(Some(result)) => outcomes.push(self.handle_evaluation_result(result)),
                Ok(None) => {
                    warn!(outstanding = self.pending.len(), "results channel closed with erasures pending");
                    break;
                }
                Err(_) => {
                    warn!(outstanding = self.pending.len(), ?timeout, "timed out waiting for erase verdicts");
                    break;
                }
            }
        }
        outcomes
    }

    /// Release the evaluator and forget all pending entries. Later verdicts are
    /// ignored and later gestures commit masks without dispatching.
    pub fn shutdown(&mut self) {
        let Some(mut evaluator) = self.evaluator.take() else {
            return;
        };
        evaluator.shutdown();
        let discarded = self.pending.len();
        self.pending.clear();
        info!(discarded, "erase coordinator shut down");
    }

    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.evaluator.is_none()
    }

    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn pending_object(&self, id: CorrelationId) -> Option<ObjectId> {
        self.pending.get(&id).copied()
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn evaluator_mut(&mut self) -> Option<&mut D> {
        self.evaluator.as_mut()
    }
}
