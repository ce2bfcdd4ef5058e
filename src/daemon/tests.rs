use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use super::shutdown::RunState;
use super::worker::Worker;
use crate::ingress::{IngressQueue, Message};
use crate::persistence::{FormatOptions, LogRotator};

fn msg(topic: &str, payload: &str) -> Message {
    Message {
        topic: topic.to_string(),
        payload: payload.as_bytes().to_vec(),
        qos: 0,
        retained: false,
    }
}

fn newline_only() -> FormatOptions {
    FormatOptions {
        newline: true,
        timestamp: false,
        topic: false,
    }
}

fn log_files(dir: &Path) -> Vec<std::path::PathBuf> {
    let mut files: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    files.sort();
    files
}

#[test]
fn test_run_state_transitions_exactly_once() {
    let run = RunState::new();
    assert!(run.is_running());

    // Only the first call performs the transition; invoking shutdown again
    // must be safe and report that nothing was left to do.
    assert!(run.shutdown());
    assert!(!run.is_running());
    assert!(!run.shutdown());
    assert!(!run.is_running());
}

#[tokio::test]
async fn test_worker_writes_queued_messages_in_receipt_order() {
    let tmp = TempDir::new().unwrap();
    let queue = Arc::new(IngressQueue::new());
    let run = Arc::new(RunState::new());

    let mut rotator = LogRotator::new(tmp.path(), None);
    rotator.create().unwrap();

    // Topic filter sensors/#, three messages, timestamp/topic off,
    // newline on, rotation unlimited.
    queue.enqueue(msg("sensors/a", "1"));
    queue.enqueue(msg("sensors/b", "2"));
    queue.enqueue(msg("sensors/a", "3"));

    run.shutdown();
    queue.signal();

    let worker = Worker::new(queue.clone(), run, rotator, newline_only());
    worker.run().await.unwrap();

    let files = log_files(tmp.path());
    assert_eq!(files.len(), 1);
    let content = fs::read_to_string(&files[0]).unwrap();
    assert_eq!(content, "1\n2\n3");
    assert!(queue.is_empty());
}

#[tokio::test]
async fn test_worker_drains_everything_before_stopping() {
    let tmp = TempDir::new().unwrap();
    let queue = Arc::new(IngressQueue::new());
    let run = Arc::new(RunState::new());

    let mut rotator = LogRotator::new(tmp.path(), None);
    rotator.create().unwrap();

    for i in 0..50 {
        queue.enqueue(msg("bulk", &i.to_string()));
    }
    run.shutdown();
    queue.signal();

    let worker = Worker::new(queue.clone(), run, rotator, newline_only());
    worker.run().await.unwrap();

    let files = log_files(tmp.path());
    assert_eq!(files.len(), 1);
    let content = fs::read_to_string(&files[0]).unwrap();
    let records: Vec<&str> = content.split('\n').collect();
    assert_eq!(records.len(), 50);
    for (i, record) in records.iter().enumerate() {
        assert_eq!(*record, i.to_string());
    }
}

#[tokio::test]
async fn test_worker_rotates_files_at_threshold() {
    let tmp = TempDir::new().unwrap();
    let queue = Arc::new(IngressQueue::new());
    let run = Arc::new(RunState::new());

    let mut rotator = LogRotator::new(tmp.path(), Some(2));
    rotator.create().unwrap();

    let worker = Worker::new(queue.clone(), run.clone(), rotator, newline_only());
    let handle = tokio::spawn(worker.run());

    // File names carry second precision, so pace the batches across seconds
    // to give every rotated file a distinct name.
    let batches: [&[&str]; 3] = [&["1", "2"], &["3", "4"], &["5"]];
    for batch in batches {
        tokio::time::sleep(Duration::from_millis(1200)).await;
        for payload in batch {
            queue.enqueue(msg("sensors/a", payload));
        }
        queue.signal();
    }
    tokio::time::sleep(Duration::from_millis(200)).await;

    run.shutdown();
    queue.signal();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("worker did not stop")
        .unwrap()
        .unwrap();

    // 2*2 + 1 messages with threshold 2: three files holding 2, 2, 1 records.
    let files = log_files(tmp.path());
    assert_eq!(files.len(), 3);
    let contents: Vec<String> = files
        .iter()
        .map(|p| fs::read_to_string(p).unwrap())
        .collect();
    assert_eq!(contents[0], "1\n2");
    assert_eq!(contents[1], "3\n4");
    assert_eq!(contents[2], "5");
}

#[tokio::test]
async fn test_worker_survives_append_failures() {
    let tmp = TempDir::new().unwrap();
    let queue = Arc::new(IngressQueue::new());
    let run = Arc::new(RunState::new());

    // No file was ever opened, so every append fails; the worker must log
    // and skip rather than die.
    let rotator = LogRotator::new(tmp.path().join("logs"), None);

    queue.enqueue(msg("t", "1"));
    queue.enqueue(msg("t", "2"));
    run.shutdown();
    queue.signal();

    let worker = Worker::new(queue.clone(), run, rotator, newline_only());
    worker.run().await.unwrap();

    assert!(queue.is_empty());
    assert!(!tmp.path().join("logs").exists());
}

#[tokio::test]
async fn test_failed_rotation_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let logs = tmp.path().join("logs");
    let queue = Arc::new(IngressQueue::new());
    let run = Arc::new(RunState::new());

    let mut rotator = LogRotator::new(&logs, Some(1));
    rotator.create().unwrap();

    // Replace the log directory with a plain file so the next create fails.
    fs::remove_dir_all(&logs).unwrap();
    fs::write(&logs, "").unwrap();

    queue.enqueue(msg("t", "1"));
    queue.enqueue(msg("t", "2"));
    run.shutdown();
    queue.signal();

    let worker = Worker::new(queue, run, rotator, newline_only());
    let result = worker.run().await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_worker_wakes_on_signal_while_running() {
    let tmp = TempDir::new().unwrap();
    let queue = Arc::new(IngressQueue::new());
    let run = Arc::new(RunState::new());

    let mut rotator = LogRotator::new(tmp.path(), None);
    rotator.create().unwrap();

    let worker = Worker::new(queue.clone(), run.clone(), rotator, newline_only());
    let handle = tokio::spawn(worker.run());

    // Let the worker suspend, then feed it while it is live.
    tokio::time::sleep(Duration::from_millis(50)).await;
    queue.enqueue(msg("live", "a"));
    queue.signal();
    tokio::time::sleep(Duration::from_millis(200)).await;

    run.shutdown();
    queue.signal();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("worker did not stop")
        .unwrap()
        .unwrap();

    let files = log_files(tmp.path());
    assert_eq!(files.len(), 1);
    assert_eq!(fs::read_to_string(&files[0]).unwrap(), "a");
}
