use protocol::CorrelationId;

use super::*;

fn req(id: u64, data: Vec<u8>) -> EvaluationRequest {
    EvaluationRequest::new(CorrelationId::from_raw(id), data)
}

// =============================================================
// Spawn
// =============================================================

#[test]
fn zero_capacity_is_rejected() {
    assert!(matches!(EvaluatorWorker::spawn(0), Err(WorkerError::ZeroCapacity)));
}

#[test]
fn dispatch_error_messages() {
    assert_eq!(DispatchError::QueueFull.to_string(), "evaluator queue is full");
    assert_eq!(DispatchError::Closed.to_string(), "evaluator is not running");
}

// =============================================================
// Round trip
// =============================================================

#[tokio::test]
async fn verdicts_come_back_tagged_with_their_id() {
    let (mut worker, mut results) = EvaluatorWorker::spawn(8).unwrap();
    assert!(worker.is_running());

    worker.dispatch(req(1, vec![0, 0, 0, 0, 0, 0, 0, 255])).unwrap();
    worker.dispatch(req(2, vec![0, 0, 0, 128])).unwrap();

    let first = results.recv().await.unwrap();
    let second = results.recv().await.unwrap();
    assert_eq!(first, EvaluationResult::new(CorrelationId::from_raw(1), true));
    assert_eq!(second, EvaluationResult::new(CorrelationId::from_raw(2), false));

    worker.shutdown();
}

#[tokio::test]
async fn malformed_buffer_does_not_stop_worker() {
    let (mut worker, mut results) = EvaluatorWorker::spawn(4).unwrap();

    worker.dispatch(req(10, vec![0, 0, 0])).unwrap();
    let bad = results.recv().await.unwrap();
    assert_eq!(bad, EvaluationResult::new(CorrelationId::from_raw(10), false));

    worker.dispatch(req(11, vec![0, 0, 0, 0])).unwrap();
    let good = results.recv().await.unwrap();
    assert_eq!(good, EvaluationResult::new(CorrelationId::from_raw(11), true));

    worker.shutdown();
}

#[tokio::test]
async fn empty_buffer_is_erased() {
    let (mut worker, mut results) = EvaluatorWorker::spawn(1).unwrap();
    worker.dispatch(req(3, Vec::new())).unwrap();
    assert!(results.recv().await.unwrap().is_erased);
    worker.shutdown();
}

// =============================================================
// Shutdown
// =============================================================

#[tokio::test]
async fn shutdown_is_idempotent_and_closes_results() {
    let (mut worker, mut results) = EvaluatorWorker::spawn(4).unwrap();
    worker.dispatch(req(1, vec![0, 0, 0, 255])).unwrap();
    worker.shutdown();
    worker.shutdown();
    assert!(!worker.is_running());

    // The request may or may not have been evaluated before the stop flag
    // went up; either way the channel closes afterwards.
    if let Some(result) = results.recv().await {
        assert_eq!(result, EvaluationResult::new(CorrelationId::from_raw(1), true));
        assert_eq!(results.recv().await, None);
    }
}

#[test]
fn stopped_loop_discards_queued_requests() {
    let (req_tx, req_rx) = mpsc::channel(64);
    let (res_tx, mut res_rx) = mpsc::unbounded_channel();
    for id in 1..=64 {
        req_tx.try_send(req(id, vec![0; 64 * 64 * 4])).unwrap();
    }
    drop(req_tx);

    run(req_rx, res_tx, &AtomicBool::new(true));
    assert!(res_rx.blocking_recv().is_none());
}

#[test]
fn running_loop_evaluates_everything_queued() {
    let (req_tx, req_rx) = mpsc::channel(8);
    let (res_tx, mut res_rx) = mpsc::unbounded_channel();
    for id in 1..=8 {
        req_tx.try_send(req(id, vec![0, 0, 0, 0])).unwrap();
    }
    drop(req_tx);

    run(req_rx, res_tx, &AtomicBool::new(false));
    let mut ids = Vec::new();
    while let Ok(result) = res_rx.try_recv() {
        ids.push(result.id.as_u64());
    }
    assert_eq!(ids, (1..=8).collect::<Vec<_>>());
}

#[test]
fn dispatch_after_shutdown_is_closed() {
    let (mut worker, _results) = EvaluatorWorker::spawn(4).unwrap();
    worker.shutdown();
    assert_eq!(worker.dispatch(req(1, Vec::new())), Err(DispatchError::Closed));
}

#[test]
fn dropped_results_receiver_does_not_wedge_worker() {
    let (mut worker, results) = EvaluatorWorker::spawn(4).unwrap();
    drop(results);
    worker.dispatch(req(1, vec![0, 0, 0, 0])).unwrap();
    worker.dispatch(req(2, vec![0, 0, 0, 0])).unwrap();
    worker.shutdown();
    assert!(!worker.is_running());
}

#[test]
fn drop_joins_the_thread() {
    let (worker, mut results) = EvaluatorWorker::spawn(2).unwrap();
    drop(worker);
    assert!(results.blocking_recv().is_none());
}
