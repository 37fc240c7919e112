mod common;

use common::{Call, FakeService};
use sheet_agent::api::{Run, RunStatus};
use sheet_agent::error::AgentError;
use sheet_agent::run::{wait_for_run, PollPolicy, PollingAwaiter, RunAwaiter};
use std::time::Duration;

fn run_with(status: RunStatus) -> Run {
    Run {
        id: "run_42".to_string(),
        thread_id: "thread_1".to_string(),
        assistant_id: None,
        status,
        last_error: None,
    }
}

fn policy() -> PollPolicy {
    PollPolicy {
        interval: Duration::from_secs(1),
        max_wait: Duration::from_secs(5),
    }
}

fn get_run_calls(service: &FakeService) -> usize {
    service.count(|c| matches!(c, Call::GetRun(_)))
}

#[tokio::test(start_paused = true)]
async fn test_stops_fetching_after_terminal_status() {
    let service = FakeService::new().with_statuses(&[
        RunStatus::Queued,
        RunStatus::InProgress,
        RunStatus::Completed,
        RunStatus::InProgress,
    ]);

    let run = wait_for_run(&service, run_with(RunStatus::Queued), policy(), false)
        .await
        .unwrap();

    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(get_run_calls(&service), 3);
}

#[tokio::test(start_paused = true)]
async fn test_already_terminal_run_is_not_fetched() {
    let service = FakeService::new();

    let run = wait_for_run(&service, run_with(RunStatus::Failed), policy(), false)
        .await
        .unwrap();

    assert_eq!(run.status, RunStatus::Failed);
    assert_eq!(get_run_calls(&service), 0);
}

#[tokio::test(start_paused = true)]
async fn test_every_non_pending_status_ends_the_wait() {
    for terminal in [
        RunStatus::RequiresAction,
        RunStatus::Cancelling,
        RunStatus::Cancelled,
        RunStatus::Failed,
        RunStatus::Incomplete,
        RunStatus::Expired,
    ] {
        let service = FakeService::new().with_statuses(&[terminal]);
        let run = wait_for_run(&service, run_with(RunStatus::InProgress), policy(), false)
            .await
            .unwrap();
        assert_eq!(run.status, terminal);
        assert_eq!(get_run_calls(&service), 1);
    }
}

#[tokio::test(start_paused = true)]
async fn test_times_out_with_typed_error() {
    let mut service = FakeService::new();
    service.fallback_status = RunStatus::InProgress;

    let err = wait_for_run(&service, run_with(RunStatus::Queued), policy(), false)
        .await
        .unwrap_err();

    match err {
        AgentError::Timeout { operation, waited } => {
            assert!(operation.contains("run_42"));
            assert!(waited >= Duration::from_secs(5));
        }
        other => panic!("expected timeout, got {:?}", other),
    }
    assert_eq!(get_run_calls(&service), 5);
}

#[tokio::test(start_paused = true)]
async fn test_hung_fetch_is_bounded_by_max_wait() {
    let mut service = FakeService::new();
    service.stalled_fetch = true;
    let started = tokio::time::Instant::now();

    let err = wait_for_run(&service, run_with(RunStatus::Queued), policy(), false)
        .await
        .unwrap_err();

    assert!(matches!(err, AgentError::Timeout { .. }));
    assert_eq!(started.elapsed(), Duration::from_secs(5));
    assert_eq!(get_run_calls(&service), 1);
}

#[tokio::test(start_paused = true)]
async fn test_final_sleep_does_not_overshoot_max_wait() {
    let mut service = FakeService::new();
    service.fallback_status = RunStatus::InProgress;
    let policy = PollPolicy {
        interval: Duration::from_secs(3),
        max_wait: Duration::from_secs(5),
    };
    let started = tokio::time::Instant::now();

    let err = wait_for_run(&service, run_with(RunStatus::Queued), policy, false)
        .await
        .unwrap_err();

    assert!(matches!(err, AgentError::Timeout { .. }));
    assert_eq!(started.elapsed(), Duration::from_secs(5));
}

#[tokio::test(start_paused = true)]
async fn test_polling_awaiter_creates_one_run() {
    let service = FakeService::new().with_statuses(&[RunStatus::InProgress, RunStatus::Completed]);
    let awaiter = PollingAwaiter::new(policy(), Duration::from_millis(250), false);

    let completed = awaiter.execute(&service, "thread_1", "asst_1").await.unwrap();

    assert_eq!(completed.run.status, RunStatus::Completed);
    assert!(!completed.text_already_shown());
    assert_eq!(service.count(|c| *c == Call::CreateRun), 1);
    assert_eq!(get_run_calls(&service), 2);
}
