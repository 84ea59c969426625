//! Background evaluator worker.
//!
//! DESIGN
//! ======
//! One long-lived OS thread named `erase-evaluator` owns the evaluator. The
//! interactive side hands it requests through a bounded queue with
//! `try_send`, so dispatch never blocks; verdicts come back on an unbounded
//! results channel the interactive side drains whenever it likes. Requests
//! are evaluated in arrival order, but every result carries its own id, so
//! consumers never depend on that order.
//!
//! ERROR HANDLING
//! ==============
//! A full or closed queue is reported to the caller as a [`DispatchError`];
//! the caller decides what that means for its pending state. Shutdown raises
//! a stop flag, closes the queue and joins the thread. Requests still queued
//! at that point are dropped unevaluated, so the join waits for at most the
//! one evaluation in flight. A panicked worker is logged, never propagated.

#[cfg(test)]
#[path = "worker_test.rs"]
mod worker_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use protocol::{EvaluationRequest, EvaluationResult};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, error, info};

use crate::evaluator::evaluate;

pub const WORKER_THREAD_NAME: &str = "erase-evaluator";

/// Receiving end of the verdict channel.
pub type ResultReceiver = mpsc::UnboundedReceiver<EvaluationResult>;

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("evaluator queue capacity must be at least 1")]
    ZeroCapacity,
    #[error("failed to spawn evaluator thread: {0}")]
    Spawn(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("evaluator queue is full")]
    QueueFull,
    #[error("evaluator is not running")]
    Closed,
}

/// Something that accepts evaluation requests without blocking.
///
/// The real implementation is [`EvaluatorWorker`]; tests use synchronous stubs.
pub trait Dispatch {
    /// Hand a request off for evaluation.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] when the request cannot be queued. No result
    /// will ever arrive for it.
    fn dispatch(&mut self, request: EvaluationRequest) -> Result<(), DispatchError>;

    /// Stop accepting requests and release the evaluator. Must be idempotent.
    fn shutdown(&mut self);
}

/// Handle to the evaluator thread.
pub struct EvaluatorWorker {
    requests: Option<mpsc::Sender<EvaluationRequest>>,
    stopping: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl EvaluatorWorker {
    /// Start the worker with a request queue of `queue_capacity`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::ZeroCapacity`] for an empty queue and
    /// [`WorkerError::Spawn`] if the OS refuses the thread.
    pub fn spawn(queue_capacity: usize) -> Result<(Self, ResultReceiver), WorkerError> {
        if queue_capacity == 0 {
            return Err(WorkerError::ZeroCapacity);
        }
        let (req_tx, req_rx) = mpsc::channel(queue_capacity);
        let (res_tx, res_rx) = mpsc::unbounded_channel();
        let stopping = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&stopping);
        let thread = std::thread::Builder::new()
            .name(WORKER_THREAD_NAME.into())
            .spawn(move || run(req_rx, res_tx, &flag))?;

        info!(queue_capacity, "erase evaluator started");
        Ok((Self { requests: Some(req_tx), stopping, thread: Some(thread) }, res_rx))
    }

    /// Whether the worker still accepts requests.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.requests.as_ref().is_some_and(|tx| !tx.is_closed())
    }
}

impl Dispatch for EvaluatorWorker {
    fn dispatch(&mut self, request: EvaluationRequest) -> Result<(), DispatchError> {
        let Some(tx) = &self.requests else {
            return Err(DispatchError::Closed);
        };
        tx.try_send(request).map_err(|e| match e {
            TrySendError::Full(_) => DispatchError::QueueFull,
            TrySendError::Closed(_) => DispatchError::Closed,
        })
    }

    fn shutdown(&mut self) {
        // The flag turns the rest of the queue into no-ops; dropping the
        // sender then ends the loop.
        self.stopping.store(true, Ordering::Release);
        drop(self.requests.take());
        let Some(thread) = self.thread.take() else {
            return;
        };
        match thread.join() {
            Ok(()) => info!("erase evaluator stopped"),
            Err(_) => error!("erase evaluator thread panicked"),
        }
    }
}

impl Drop for EvaluatorWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run(
    mut requests: mpsc::Receiver<EvaluationRequest>,
    results: mpsc::UnboundedSender<EvaluationResult>,
    stopping: &AtomicBool,
) {
    let mut evaluated: u64 = 0;
    let mut discarded: u64 = 0;
    while let Some(request) = requests.blocking_recv() {
        if stopping.load(Ordering::Acquire) {
            discarded += 1;
            continue;
        }
        let result = evaluate(&request);
        evaluated += 1;
        if results.send(result).is_err() {
            debug!(id = %result.id, "result receiver dropped; discarding verdict");
        }
    }
    debug!(evaluated, discarded, "erase evaluator queue closed");
}
