// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use sluice_core::{from_stream, AsyncStream, CancellationToken, Outcome};
use sluice_exec::subscribe;
use sluice_stream::{compose, filter, map, map_async, reduce, AsyncStreamExt};
use sluice_test_utils::{drain, test_error, CountingStream, StreamProbe, TestError};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const COUNT: u32 = 5;
const DELAY: Duration = Duration::from_millis(1);

#[tokio::test]
async fn test_compose_applies_operators_left_to_right() -> anyhow::Result<()> {
    // Arrange
    let mut map_first = compose!(
        CountingStream::new(COUNT, Duration::ZERO),
        map(|value: u32| value * 2),
        filter(|value: &u32| *value > 2),
    );
    let mut filter_first = compose!(
        CountingStream::new(COUNT, Duration::ZERO),
        filter(|value: &u32| *value > 2),
        map(|value: u32| value * 2),
    );

    // Act
    let (mapped_then_filtered, ()) = drain(&mut map_first).await?;
    let (filtered_then_mapped, ()) = drain(&mut filter_first).await?;

    // Assert
    assert_eq!(mapped_then_filtered, vec![4, 6, 8]);
    assert_eq!(filtered_then_mapped, vec![6, 8]);
    Ok(())
}

#[tokio::test]
async fn test_compose_without_operators_is_identity() -> anyhow::Result<()> {
    // Arrange
    let mut stream = compose!(from_stream(futures::stream::iter(["a", "b"])));

    // Act
    let (values, ()) = drain(&mut stream).await?;

    // Assert
    assert_eq!(values, vec!["a", "b"]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_cancelling_composed_pipeline_cleans_up_source() -> anyhow::Result<()> {
    // Arrange
    let probe = StreamProbe::new();
    let pipeline = compose!(
        CountingStream::with_probe(COUNT, DELAY, probe.clone()),
        filter(|value: &u32| *value > 2),
        map(|value: u32| value * 2),
    );
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();

    // Act
    let result = subscribe(
        pipeline,
        move |value: u32, token: CancellationToken| {
            let sink = sink.clone();
            async move {
                sink.lock().unwrap().push(value);
                token.cancel();
                Ok(())
            }
        },
        None,
    )
    .await;

    // Assert
    let error = result.unwrap_err();
    assert!(error.is_cancellation());
    assert_eq!(*seen.lock().unwrap(), vec![6]);
    assert_eq!(probe.cleanups(), 1);
    assert!(probe.last_error().is_some_and(|reason| reason.is_cancellation()));
    Ok(())
}

#[tokio::test]
async fn test_reduce_emits_running_total() -> anyhow::Result<()> {
    // Arrange
    let mut totals = compose!(
        CountingStream::new(COUNT, Duration::ZERO),
        reduce(|sum: u32, value: u32| sum + value, 0),
    );

    // Act
    let (values, ()) = drain(&mut totals).await?;

    // Assert
    assert_eq!(values, vec![0, 1, 3, 6, 10]);
    assert_eq!(values.last(), Some(&10));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_reduce_cancelled_after_first_value() -> anyhow::Result<()> {
    // Arrange
    let probe = StreamProbe::new();
    let totals = CountingStream::with_probe(COUNT, DELAY, probe.clone())
        .reduce(|sum: u32, value: u32| sum + value, 0);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();

    // Act
    let result = subscribe(
        totals,
        move |value: u32, token: CancellationToken| {
            let sink = sink.clone();
            async move {
                sink.lock().unwrap().push(value);
                token.cancel();
                Ok(())
            }
        },
        None,
    )
    .await;

    // Assert
    assert!(result.unwrap_err().is_cancellation());
    assert_eq!(*seen.lock().unwrap(), vec![0]);
    assert_eq!(probe.cleanups(), 1);
    Ok(())
}

#[tokio::test]
async fn test_map_async_failure_terminates_upstream() -> anyhow::Result<()> {
    // Arrange
    let probe = StreamProbe::new();
    let mut stream = CountingStream::with_probe(COUNT, Duration::ZERO, probe.clone()).map_async(
        |value: u32| async move {
            if value == 2 {
                Err(test_error("boom"))
            } else {
                Ok(value * 10)
            }
        },
    );

    // Act
    let first = stream.advance(()).await?;
    let second = stream.advance(()).await?;
    let failure = stream.advance(()).await.unwrap_err();
    let after = stream.advance(()).await?;

    // Assert
    assert_eq!(first, Outcome::Yielded(0));
    assert_eq!(second, Outcome::Yielded(10));
    assert_eq!(
        failure.downcast_callback_ref::<TestError>(),
        Some(&TestError::new("boom"))
    );
    assert_eq!(after, Outcome::Finished(()));
    assert_eq!(probe.cleanups(), 1);
    assert_eq!(probe.advances(), 3);
    Ok(())
}

#[tokio::test]
async fn test_graceful_termination_reaches_every_stage() -> anyhow::Result<()> {
    // Arrange
    let probe = StreamProbe::new();
    let mut stream = CountingStream::with_probe(COUNT, Duration::ZERO, probe.clone())
        .map(|value: u32| value + 1)
        .filter(|value: &u32| value % 2 == 1);
    assert_eq!(stream.advance(()).await?, Outcome::Yielded(1));

    // Act
    let terminated = stream.terminate_gracefully().await?;

    // Assert
    assert_eq!(terminated, Outcome::Finished(()));
    assert_eq!(probe.cleanups(), 1);
    assert_eq!(stream.advance(()).await?, Outcome::Finished(()));
    assert_eq!(probe.advances(), 1, "terminal stages do not pull again");
    Ok(())
}

#[tokio::test]
async fn test_pipe_accepts_prebuilt_operator() -> anyhow::Result<()> {
    // Arrange
    let squares = map(|value: u32| value * value);

    // Act
    let (values, ()) = drain(&mut CountingStream::new(4, Duration::ZERO).pipe(squares)).await?;

    // Assert
    assert_eq!(values, vec![0, 1, 4, 9]);
    Ok(())
}
