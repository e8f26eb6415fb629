// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::channel::mpsc::unbounded;
use futures::StreamExt;
use sluice_core::{from_stream, AsyncStream, IntoFuturesStream, Outcome, SluiceError};

#[tokio::test]
async fn test_stream_source_yields_then_finishes() -> anyhow::Result<()> {
    // Arrange
    let mut source = from_stream(futures::stream::iter(vec![1, 2]));

    // Act & Assert
    assert_eq!(source.advance(()).await?, Outcome::Yielded(1));
    assert_eq!(source.advance(()).await?, Outcome::Yielded(2));
    assert_eq!(source.advance(()).await?, Outcome::Finished(()));
    assert!(source.is_done());
    assert_eq!(source.advance(()).await?, Outcome::Finished(()));

    Ok(())
}

#[tokio::test]
async fn test_stream_source_terminate_with_error_drops_source() -> anyhow::Result<()> {
    // Arrange
    let (tx, rx) = unbounded::<i32>();
    let mut source = from_stream(rx);

    // Act
    let result = source
        .terminate_with_error(SluiceError::cancelled("stop"))
        .await;

    // Assert
    assert_eq!(result.unwrap_err().to_string(), "stop");
    assert!(tx.is_closed(), "receiver should be dropped by cleanup");
    assert_eq!(
        source
            .terminate_with_error(SluiceError::cancelled("again"))
            .await?,
        Outcome::Finished(())
    );

    Ok(())
}

#[tokio::test]
async fn test_into_futures_stream_collects_values() {
    let source = from_stream(futures::stream::iter(vec![1, 2, 3]));

    let values: Vec<i32> = source
        .into_futures_stream()
        .map(|item| item.expect("no error expected"))
        .collect()
        .await;

    assert_eq!(values, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_into_futures_stream_round_trips_through_channel() -> anyhow::Result<()> {
    // Arrange
    let (tx, rx) = unbounded::<&'static str>();
    let mut stream = from_stream(rx).into_futures_stream();

    // Act
    tx.unbounded_send("a")?;
    tx.unbounded_send("b")?;
    drop(tx);

    // Assert
    assert_eq!(stream.next().await.transpose()?, Some("a"));
    assert_eq!(stream.next().await.transpose()?, Some("b"));
    assert!(stream.next().await.is_none());

    Ok(())
}
