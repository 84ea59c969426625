//! Erasure evaluator: decides from an object's pixels whether it is fully erased.
//!
//! The check only looks at alpha. A pixel is settled when its alpha is exactly
//! 0 (erased) or 255 (untouched); anything in between is an anti-aliased
//! brush edge, so some of the object is still showing. An object with no
//! partial-alpha pixel left counts as fully erased.
//!
//! The predicate is kept exactly as stated: any object whose buffer holds
//! only 0 and 255 alphas passes, whether or not an erase stroke ever touched
//! its painted pixels. A pixel-aligned, hard-edged shape crossed by a stroke
//! that misses its outline is one such case.

#[cfg(test)]
#[path = "evaluator_test.rs"]
mod evaluator_test;

use protocol::{EvaluationRequest, EvaluationResult, MalformedBuffer};
use tracing::warn;

/// Scan the alpha channel of a request.
///
/// An empty buffer is vacuously fully erased.
///
/// # Errors
///
/// Returns [`MalformedBuffer`] when the buffer is not a whole number of RGBA
/// pixels.
pub fn scan(request: &EvaluationRequest) -> Result<bool, MalformedBuffer> {
    Ok(request.alpha_samples()?.all(is_settled))
}

/// Evaluate a request into the verdict sent back to the coordinator.
///
/// Malformed buffers yield a deterministic "not erased" verdict so the object
/// is kept and the worker keeps running.
#[must_use]
pub fn evaluate(request: &EvaluationRequest) -> EvaluationResult {
    let is_erased = match scan(request) {
        Ok(erased) => erased,
        Err(e) => {
            warn!(id = %request.id, error = %e, "malformed pixel buffer; reporting not erased");
            false
        }
    };
    EvaluationResult::new(request.id, is_erased)
}

fn is_settled(alpha: u8) -> bool {
    alpha == 0 || alpha == u8::MAX
}
