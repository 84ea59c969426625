//! Shared message contract between the erase coordinator and the erasure evaluator.
//!
//! This crate owns the values that cross the worker boundary. Requests carry a
//! correlation id and a value-copied RGBA pixel buffer; results carry the same
//! id and a boolean verdict. Field names on the serde representation match the
//! worker message shape (`id`, `imageData`, `isErased`) so either side can be
//! moved behind a real message port without changing the contract.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Bytes per pixel in an interleaved RGBA buffer.
pub const RGBA_STRIDE: usize = 4;

/// Offset of the alpha byte inside one RGBA pixel.
pub const ALPHA_OFFSET: usize = 3;

/// Error returned when a pixel buffer does not hold a whole number of RGBA pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("pixel buffer length {len} is not a multiple of {RGBA_STRIDE}")]
pub struct MalformedBuffer {
    /// Length of the rejected buffer in bytes.
    pub len: usize,
}

/// Opaque token pairing an evaluation request with its eventual result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(u64);

impl CorrelationId {
    /// Wrap a raw id. Used when decoding messages produced elsewhere.
    #[must_use]
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw integer value.
    #[must_use]
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic in-process allocator for correlation ids.
///
/// Ids start at 1 and strictly increase, so two dispatches in the same
/// millisecond still get distinct ids.
#[derive(Debug, Default)]
pub struct CorrelationIds {
    last: u64,
}

impl CorrelationIds {
    /// Create an allocator that has not handed out any id yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id.
    pub fn next_id(&mut self) -> CorrelationId {
        self.last = self.last.saturating_add(1);
        CorrelationId(self.last)
    }
}

/// One object's rendered pixels, sent to the evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    /// Correlation id allocated by the coordinator.
    pub id: CorrelationId,
    /// Interleaved RGBA bytes, row-major, top-to-bottom.
    #[serde(rename = "imageData")]
    pub image_data: Vec<u8>,
}

impl EvaluationRequest {
    #[must_use]
    pub fn new(id: CorrelationId, image_data: Vec<u8>) -> Self {
        Self { id, image_data }
    }

    /// Iterate the alpha channel of every pixel in the buffer.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedBuffer`] when the buffer length is not a multiple of
    /// [`RGBA_STRIDE`].
    pub fn alpha_samples(&self) -> Result<impl Iterator<Item = u8> + '_, MalformedBuffer> {
        if self.image_data.len() % RGBA_STRIDE != 0 {
            return Err(MalformedBuffer { len: self.image_data.len() });
        }
        Ok(self
            .image_data
            .chunks_exact(RGBA_STRIDE)
            .map(|px| px[ALPHA_OFFSET]))
    }
}

/// The evaluator's verdict for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Correlation id copied from the request.
    pub id: CorrelationId,
    /// `true` when the object is fully erased and may be removed.
    #[serde(rename = "isErased")]
    pub is_erased: bool,
}

impl EvaluationResult {
    #[must_use]
    pub fn new(id: CorrelationId, is_erased: bool) -> Self {
        Self { id, is_erased }
    }
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
