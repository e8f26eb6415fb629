// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// SPDX-License-Identifier: MIT OR Apache-2.0

use sluice_core::{CancellationToken, SluiceError};
use sluice_exec::{signal_task, Signal};
use sluice_test_utils::settle;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_confirm_resolves_every_waiter() -> anyhow::Result<()> {
    // Arrange
    let signal = Signal::new();
    let first = tokio::spawn(signal.completion());
    let second = tokio::spawn(signal.completion());

    // Act
    assert!(signal.confirm(5));

    // Assert
    assert_eq!(first.await??, 5);
    assert_eq!(second.await??, 5);
    assert!(signal.is_confirmed());
    assert!(!signal.is_cancelled());
    Ok(())
}

#[tokio::test]
async fn test_first_writer_wins() -> anyhow::Result<()> {
    // Arrange
    let signal: Signal<u8> = Signal::new();

    // Act
    assert!(signal.cancel_with(SluiceError::cancelled("r1")));
    assert!(!signal.confirm(1));
    assert!(!signal.cancel());

    // Assert
    assert!(signal.is_cancelled());
    assert_eq!(signal.completion().await.unwrap_err().to_string(), "r1");
    Ok(())
}

#[tokio::test]
async fn test_cancel_uses_default_reason() {
    let signal: Signal<()> = Signal::new();

    signal.cancel();

    assert_eq!(
        signal.completion().await.unwrap_err().to_string(),
        "Signal was cancelled."
    );
}

#[tokio::test]
async fn test_linked_signal_cancels_on_abort() -> anyhow::Result<()> {
    // Arrange
    let abort = CancellationToken::new();
    let signal: Signal<()> = Signal::linked(&abort);
    settle().await;
    assert!(!signal.is_settled());

    // Act
    abort.cancel();

    // Assert
    let error = signal.completion().await.unwrap_err();
    assert!(error.is_cancellation());
    assert!(signal.is_cancelled());
    Ok(())
}

#[tokio::test]
async fn test_linked_signal_ignores_abort_after_confirm() -> anyhow::Result<()> {
    let abort = CancellationToken::new();
    let signal = Signal::linked(&abort);

    signal.confirm("kept");
    abort.cancel();
    settle().await;

    assert_eq!(signal.completion().await?, "kept");
    Ok(())
}

#[tokio::test]
async fn test_dropped_linked_signal_stops_watching_abort() -> anyhow::Result<()> {
    // Arrange
    let abort = CancellationToken::new();
    let signal: Signal<u8> = Signal::linked(&abort);
    settle().await;
    assert_eq!(abort.listener_count(), 1);

    // Act
    drop(signal);
    settle().await;

    // Assert
    assert_eq!(abort.listener_count(), 0);
    assert!(abort.cancel());
    Ok(())
}

#[tokio::test]
async fn test_signal_task_runs_on_confirm() -> anyhow::Result<()> {
    // Arrange
    let signal = Signal::new();
    let handle = signal_task(|| async { Ok("ran") }, &signal, None);
    settle().await;
    assert!(handle.is_scheduled());

    // Act
    signal.confirm(());

    // Assert
    assert_eq!(handle.await?, "ran");
    Ok(())
}

#[tokio::test]
async fn test_signal_task_propagates_signal_cancel_reason() -> anyhow::Result<()> {
    // Arrange
    let ran = Arc::new(AtomicBool::new(false));
    let flag = ran.clone();
    let signal: Signal<()> = Signal::new();
    let handle = signal_task(
        move || async move {
            flag.store(true, Ordering::SeqCst);
            Ok(())
        },
        &signal,
        None,
    );

    // Act
    signal.cancel_with(SluiceError::cancelled("upstream"));

    // Assert
    assert_eq!(handle.await.unwrap_err().to_string(), "upstream");
    assert!(!ran.load(Ordering::SeqCst));
    Ok(())
}

#[tokio::test]
async fn test_signal_task_own_cancel_uses_default_reason() -> anyhow::Result<()> {
    let signal: Signal<()> = Signal::new();
    let handle = signal_task(|| async { Ok(()) }, &signal, None);

    handle.cancel();
    signal.confirm(());

    assert_eq!(
        handle.await.unwrap_err().to_string(),
        "Signaltask was cancelled."
    );
    Ok(())
}

#[tokio::test]
async fn test_signal_task_linked_abort() -> anyhow::Result<()> {
    let abort = CancellationToken::new();
    let signal: Signal<()> = Signal::new();
    let handle = signal_task(|| async { Ok(()) }, &signal, Some(abort.clone()));

    abort.cancel();

    assert_eq!(
        handle.await.unwrap_err().to_string(),
        "Signaltask was cancelled."
    );
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_cancel_after_times_out_pending_signal() -> anyhow::Result<()> {
    // Arrange
    let signal: Signal<()> = Signal::new();
    let after = Duration::from_millis(50);

    // Act
    let _timeout = signal.cancel_after(after);
    let result = signal.completion().await;

    // Assert
    assert!(matches!(result, Err(SluiceError::Timeout { after: a }) if a == after));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_cancel_after_is_harmless_once_confirmed() -> anyhow::Result<()> {
    // Arrange
    let signal = Signal::new();
    let timeout = signal.cancel_after(Duration::from_millis(50));

    // Act
    signal.confirm(9);
    timeout.await?;

    // Assert
    assert_eq!(signal.completion().await?, 9);
    Ok(())
}
