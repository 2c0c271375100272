use std::ops::ControlFlow;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use timekit::logger::MemoryLogger;
use timekit::timer::{self, poll_until, spawn_interval, IntervalCommand};
use timekit::TimeError;
use tokio::time::Instant;

fn assert_elapsed(started: Instant, expected_ms: u64) {
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(expected_ms), "elapsed {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(expected_ms + 50), "elapsed {:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn test_poll_until_stops_on_third_call() {
    let logger = MemoryLogger::new();
    let calls = AtomicUsize::new(0);
    let started = Instant::now();

    let result = poll_until(
        || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n == 3 {
                    anyhow::Ok(ControlFlow::Break(()))
                } else {
                    anyhow::Ok(ControlFlow::Continue(()))
                }
            }
        },
        Duration::from_millis(1000),
        false,
        &logger,
    )
    .await;

    assert!(result.is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    // two delays separate three calls; no delay after the stopping call
    assert_elapsed(started, 2000);
    assert!(logger.get_logs().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_poll_until_fail_fast_propagates_first_error() {
    let logger = MemoryLogger::new();
    let calls = AtomicUsize::new(0);

    let result = poll_until(
        || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<ControlFlow<()>, _>(anyhow::anyhow!("disk full")) }
        },
        Duration::from_millis(500),
        true,
        &logger,
    )
    .await;

    match result {
        Err(TimeError::Operation(err)) => assert_eq!(err.to_string(), "disk full"),
        other => panic!("expected operation error, got {:?}", other),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(logger.count("ERROR"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_poll_until_logs_and_continues_by_default() {
    let logger = MemoryLogger::new();
    let calls = AtomicUsize::new(0);

    let result = poll_until(
        || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n < 3 {
                    anyhow::bail!("transient failure {}", n);
                }
                anyhow::Ok(ControlFlow::Break(()))
            }
        },
        Duration::from_millis(500),
        false,
        &logger,
    )
    .await;

    assert!(result.is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(logger.count("ERROR"), 2);
    assert!(logger.get_logs()[0].contains("transient failure 2"));
}

fn counting_task(
    calls: &Arc<AtomicUsize>,
    script: fn(usize) -> anyhow::Result<IntervalCommand>,
) -> impl FnMut() -> std::future::Ready<anyhow::Result<IntervalCommand>> + Send + 'static {
    let calls = Arc::clone(calls);
    move || {
        let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
        std::future::ready(script(n))
    }
}

#[tokio::test(start_paused = true)]
async fn test_spawn_interval_runs_until_terminate() {
    let calls = Arc::new(AtomicUsize::new(0));
    let started = Instant::now();

    let handle = spawn_interval(
        counting_task(&calls, |n| Ok(if n == 3 { IntervalCommand::Terminate } else { IntervalCommand::Run })),
        Duration::from_millis(100),
        Arc::new(MemoryLogger::new()),
    );
    handle.join().await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    // three running ticks plus the tick that observes Terminate
    assert_elapsed(started, 400);
}

#[tokio::test(start_paused = true)]
async fn test_spawn_interval_skip_passes_one_tick() {
    let calls = Arc::new(AtomicUsize::new(0));
    let logger = MemoryLogger::new();
    let started = Instant::now();

    let handle = spawn_interval(
        counting_task(&calls, |n| Ok(if n == 1 { IntervalCommand::Skip } else { IntervalCommand::Terminate })),
        Duration::from_millis(100),
        Arc::new(logger.clone()),
    );
    handle.join().await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_elapsed(started, 400);
    assert_eq!(logger.count("INFO"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_spawn_interval_pause_until_resumed() {
    let calls = Arc::new(AtomicUsize::new(0));

    let handle = spawn_interval(
        counting_task(&calls, |n| Ok(if n == 1 { IntervalCommand::Pause } else { IntervalCommand::Terminate })),
        Duration::from_millis(100),
        Arc::new(MemoryLogger::new()),
    );

    timer::sleep_ms(1000).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(handle.command(), IntervalCommand::Pause);
    assert!(!handle.is_finished());

    handle.set_command(IntervalCommand::Run);
    handle.join().await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_spawn_interval_command_set_mid_invocation_wins() {
    let calls = Arc::new(AtomicUsize::new(0));
    let task_calls = Arc::clone(&calls);

    let handle = spawn_interval(
        move || {
            task_calls.fetch_add(1, Ordering::SeqCst);
            async {
                timer::sleep_ms(500).await;
                anyhow::Ok(IntervalCommand::Run)
            }
        },
        Duration::from_millis(100),
        Arc::new(MemoryLogger::new()),
    );

    // first invocation starts at 100ms and is still sleeping at 300ms
    timer::sleep_ms(300).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    handle.set_command(IntervalCommand::Terminate);

    handle.join().await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_spawn_interval_keeps_command_after_error() {
    let calls = Arc::new(AtomicUsize::new(0));
    let logger = MemoryLogger::new();

    let handle = spawn_interval(
        counting_task(&calls, |n| {
            if n == 1 {
                anyhow::bail!("tick failed");
            }
            Ok(IntervalCommand::Terminate)
        }),
        Duration::from_millis(100),
        Arc::new(logger.clone()),
    );
    handle.join().await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(logger.count("ERROR"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_spawn_interval_abort() {
    let calls = Arc::new(AtomicUsize::new(0));

    let handle = spawn_interval(
        counting_task(&calls, |_| Ok(IntervalCommand::Run)),
        Duration::from_millis(100),
        Arc::new(MemoryLogger::new()),
    );

    timer::sleep_ms(350).await;
    handle.abort();
    let result = handle.join().await;

    assert!(matches!(result, Err(TimeError::Join(_))));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}
