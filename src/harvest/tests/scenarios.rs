//! End-to-end runs of the coordinator over scripted processors

use super::support::*;
use crate::harvest::api::*;
use std::time::Duration;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_single_transient_failure_is_retried_by_pool() {
    let processor = arc(ScriptedProcessor::new().fail_item(2, 1));
    let summary = bounded(coordinator(settings(2, 2)).run(
        items(&[1, 2, 3]),
        clients(2),
        processor.clone(),
        &shutdown(),
    ))
    .await;

    assert_eq!(processor.written_sorted(), items(&[1, 2, 3]));
    assert_eq!(summary.written(), 3);
    assert_eq!(summary.requeued(), 1);
    assert!(summary.is_complete());
    assert_eq!(summary.workers_in(WorkerState::Done), 2);
    assert_eq!(processor.attempts(), 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_lone_broken_client_leaves_item_in_queue() {
    let processor = arc(ScriptedProcessor::always_failing());
    let summary = bounded(coordinator(settings(10, 1)).run(
        items(&[42]),
        clients(1),
        processor.clone(),
        &shutdown(),
    ))
    .await;

    assert_eq!(summary.remaining, items(&[42]));
    assert_eq!(summary.workers.len(), 1);
    assert_eq!(summary.workers[0].state, WorkerState::StoppedExhausted);
    assert_eq!(summary.workers[0].failed, 1);
    assert_eq!(summary.written(), 0);
    assert!(processor.written().is_empty());
    assert_eq!(processor.attempts(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_healthy_clients_absorb_work_of_broken_ones() {
    let ids: Vec<u64> = (1..=30).collect();
    let processor = arc(ScriptedProcessor::new().broken_clients(&[0, 1]));
    let summary = bounded(coordinator(settings(4, 2)).run(
        items(&ids),
        clients(5),
        processor.clone(),
        &shutdown(),
    ))
    .await;

    assert_eq!(processor.written_sorted(), {
        let mut expected = items(&ids);
        expected.sort();
        expected
    });
    assert!(summary.is_complete());
    for report in &summary.workers {
        match report.client_index {
            0 | 1 => {
                // May finish before reaching the threshold if the queue drains first
                assert_eq!(report.succeeded, 0);
                assert!(report.failed <= 2);
                if report.failed == 2 {
                    assert_eq!(report.state, WorkerState::StoppedExhausted);
                }
            }
            _ => assert_eq!(report.state, WorkerState::Done),
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_all_clients_exhausted_keeps_every_item() {
    let processor = arc(ScriptedProcessor::always_failing());
    let summary = bounded(coordinator(settings(2, 2)).run(
        items(&[1, 2, 3, 4, 5]),
        clients(2),
        processor.clone(),
        &shutdown(),
    ))
    .await;

    let mut remaining = summary.remaining.clone();
    remaining.sort();
    assert_eq!(remaining, items(&[1, 2, 3, 4, 5]));
    assert_eq!(summary.workers_in(WorkerState::StoppedExhausted), 2);
    assert_eq!(summary.requeued(), 4);
    assert_eq!(processor.attempts(), 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_empty_input_finishes_immediately() {
    let processor = arc(ScriptedProcessor::new());
    let summary = bounded(coordinator(settings(3, 3)).run(
        Vec::new(),
        clients(3),
        processor.clone(),
        &shutdown(),
    ))
    .await;

    assert_eq!(summary.total_items, 0);
    assert!(summary.is_complete());
    assert_eq!(summary.workers_in(WorkerState::Done), 3);
    assert_eq!(processor.attempts(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_no_clients_leaves_queue_untouched() {
    let processor = arc(ScriptedProcessor::new());
    let summary = bounded(coordinator(settings(3, 3)).run(
        items(&[7, 8]),
        Vec::new(),
        processor.clone(),
        &shutdown(),
    ))
    .await;

    assert!(summary.workers.is_empty());
    assert_eq!(summary.remaining, items(&[7, 8]));
    assert_eq!(processor.attempts(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_panicking_processor_counts_as_failure() {
    let processor = arc(
        ScriptedProcessor::new()
            .panic_item(5, 1)
            .with_delay(Duration::from_millis(1)),
    );
    let summary = bounded(coordinator(settings(2, 3)).run(
        items(&[4, 5, 6]),
        clients(2),
        processor.clone(),
        &shutdown(),
    ))
    .await;

    assert_eq!(processor.written_sorted(), items(&[4, 5, 6]));
    assert!(summary.is_complete());
    assert_eq!(summary.requeued(), 1);
    assert_eq!(summary.workers_in(WorkerState::Done), 2);
    assert_eq!(summary.workers_in(WorkerState::Aborted), 0);
}
