// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use sluice_core::{AsyncStream, Outcome, SluiceError};
use sluice_exec::subscribe;
use sluice_stream::AsyncQueue;
use sluice_stream_time::{debounce, DebounceExt};
use sluice_test_utils::{drain, settle, test_error, CountingStream, StreamProbe, TestError};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::{sleep, Instant};

const WINDOW: Duration = Duration::from_millis(5);
const COUNT: u32 = 5;

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

#[tokio::test(start_paused = true)]
async fn test_debounce_fast_source_emits_only_last_value() -> anyhow::Result<()> {
    // Arrange
    let interval = ms(2);
    let mut debounced = CountingStream::new(COUNT, interval).debounce(WINDOW);
    let start = Instant::now();

    // Act
    let (values, ()) = drain(&mut debounced).await?;

    // Assert
    assert_eq!(values, vec![4], "only the last value survives");
    assert!(start.elapsed() >= interval * COUNT + WINDOW);
    assert_eq!(debounced.advance(()).await?, Outcome::Finished(()));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_debounce_slow_source_emits_every_value() -> anyhow::Result<()> {
    // Arrange
    let interval = ms(6);
    let mut debounced = debounce(CountingStream::new(COUNT, interval), WINDOW);
    let start = Instant::now();

    // Act
    let (values, ()) = drain(&mut debounced).await?;

    // Assert
    assert_eq!(values, vec![0, 1, 2, 3, 4]);
    assert!(start.elapsed() >= interval * COUNT + WINDOW);
    assert_eq!(debounced.advance(()).await?, Outcome::Finished(()));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_debounce_variable_rate_emits_after_each_quiet_period() -> anyhow::Result<()> {
    // Arrange
    let queue = AsyncQueue::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let subscription = subscribe(
        queue.clone().debounce(WINDOW),
        move |value: u32, _token| {
            let sink = sink.clone();
            async move {
                sink.lock().unwrap().push(value);
                Ok(())
            }
        },
        None,
    );

    // Act
    for (pause, value) in [(1, 0), (1, 1), (1, 2), (10, 3), (10, 4), (2, 5), (3, 6), (10, 7)] {
        sleep(ms(pause)).await;
        queue.add(value)?;
    }
    settle().await;
    queue.close();
    subscription.await?;

    // Assert
    assert_eq!(*seen.lock().unwrap(), vec![2, 3, 6, 7]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_debounce_source_error_cancels_window_and_is_delivered_once() -> anyhow::Result<()> {
    // Arrange
    let queue = AsyncQueue::new();
    let mut debounced = debounce(queue.clone(), WINDOW);
    queue.add(1)?;
    settle().await;

    // Act
    queue.fail(test_error("source broke"));
    let error = debounced.advance(()).await.unwrap_err();

    // Assert
    assert_eq!(
        error.downcast_callback_ref::<TestError>(),
        Some(&TestError::new("source broke"))
    );
    assert_eq!(debounced.advance(()).await?, Outcome::Finished(()));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_debounce_graceful_termination_drops_pending_value() -> anyhow::Result<()> {
    // Arrange
    let probe = StreamProbe::new();
    let mut debounced = CountingStream::with_probe(COUNT, ms(1), probe.clone()).debounce(WINDOW);
    sleep(ms(2)).await;

    // Act
    let terminated = debounced.terminate_gracefully().await?;
    sleep(WINDOW * 2).await;

    // Assert
    assert_eq!(terminated, Outcome::Finished(()));
    assert_eq!(debounced.advance(()).await?, Outcome::Finished(()));
    assert_eq!(probe.cleanups(), 1);
    assert!(probe.last_error().is_none());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_debounce_error_termination_reaches_source() -> anyhow::Result<()> {
    // Arrange
    let probe = StreamProbe::new();
    let mut debounced = CountingStream::with_probe(COUNT, ms(1), probe.clone()).debounce(WINDOW);
    sleep(ms(2)).await;

    // Act
    let result = debounced
        .terminate_with_error(SluiceError::cancelled("shutdown"))
        .await;

    // Assert
    assert_eq!(result.unwrap_err().to_string(), "shutdown");
    assert_eq!(probe.cleanups(), 1);
    assert_eq!(
        probe.last_error().map(|reason| reason.to_string()),
        Some("shutdown".to_string())
    );
    assert_eq!(debounced.advance(()).await?, Outcome::Finished(()));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_debounce_termination_after_source_finished() -> anyhow::Result<()> {
    // Arrange
    let queue = AsyncQueue::<u8>::new();
    let mut debounced = debounce(queue.clone(), WINDOW);
    queue.close();
    settle().await;

    // Act
    let result = debounced
        .terminate_with_error(SluiceError::cancelled("late"))
        .await;

    // Assert
    assert_eq!(result.unwrap_err().to_string(), "late");
    assert_eq!(debounced.advance(()).await?, Outcome::Finished(()));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_debounce_subscription_cancel_still_sees_running_window() -> anyhow::Result<()> {
    // Arrange
    let queue = AsyncQueue::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let subscription = subscribe(
        debounce(queue.clone(), WINDOW),
        move |value: u32, _token| {
            let sink = sink.clone();
            async move {
                sink.lock().unwrap().push(value);
                Ok(())
            }
        },
        None,
    );

    // Act
    for value in 0..3 {
        sleep(ms(1)).await;
        queue.add(value)?;
    }
    sleep(ms(1)).await;
    subscription.cancel();
    let result = subscription.await;

    // Assert
    let error = result.unwrap_err();
    assert!(error.is_cancellation());
    assert_eq!(error.to_string(), "Stream was cancelled.");
    assert_eq!(*seen.lock().unwrap(), vec![2]);
    assert!(queue.is_done(), "cancellation reaches the source queue");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_dropping_debounce_closes_source() -> anyhow::Result<()> {
    // Arrange
    let queue = AsyncQueue::<u8>::new();
    let debounced = debounce(queue.clone(), WINDOW);
    queue.add(1)?;
    settle().await;

    // Act
    drop(debounced);
    settle().await;

    // Assert
    assert!(queue.is_done());
    Ok(())
}
