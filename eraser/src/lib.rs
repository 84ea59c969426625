//! Eraser pipeline for Next Pen.
//!
//! When an erase stroke ends, the [`coordinator::EraseCoordinator`] commits
//! the stroke into every object it crossed, rasterises each object, and
//! sends the pixels to the [`worker::EvaluatorWorker`] thread. The worker runs
//! the [`evaluator`] and sends back a verdict; a "fully erased" verdict
//! removes the object from the scene graph.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`coordinator`] | Pending-entry table, gesture handling, verdict application |
//! | [`evaluator`] | Alpha-channel scan producing the verdict |
//! | [`worker`] | Evaluator thread, request/result channels, the [`worker::Dispatch`] seam |
//! | [`surface`] | The [`surface::EraseSurface`] capabilities and their canvas binding |

pub mod coordinator;
pub mod evaluator;
pub mod surface;
pub mod worker;

pub use coordinator::{EraseCoordinator, GestureReport, Outcome, SkipReason};
pub use surface::EraseSurface;
pub use worker::{Dispatch, DispatchError, EvaluatorWorker, ResultReceiver, WorkerError};
