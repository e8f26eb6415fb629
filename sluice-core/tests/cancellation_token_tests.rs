// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tests for the reason-carrying CancellationToken.

use futures::FutureExt;
use sluice_core::{CancellationToken, SluiceError};
use std::time::Duration;

// ============================================================================
// Unit Tests
// ============================================================================

#[test]
fn test_new_token_not_cancelled() {
    let token = CancellationToken::new();
    assert!(!token.is_cancelled());
    assert!(token.reason().is_none());
}

#[test]
fn test_cancel_sets_flag() {
    let token = CancellationToken::new();
    assert!(token.cancel());
    assert!(token.is_cancelled());
    assert!(token.reason().is_none());
}

#[test]
fn test_cancel_is_idempotent() {
    let token = CancellationToken::new();
    assert!(token.cancel());
    assert!(!token.cancel());
    assert!(!token.cancel());
    assert!(token.is_cancelled());
}

#[test]
fn test_first_reason_wins() {
    let token = CancellationToken::new();

    assert!(token.cancel_with(SluiceError::cancelled("r1")));
    assert!(!token.cancel_with(SluiceError::cancelled("r2")));
    assert!(!token.cancel());

    assert_eq!(token.reason().unwrap().to_string(), "r1");
}

#[test]
fn test_reasonless_cancel_blocks_later_reason() {
    let token = CancellationToken::new();
    token.cancel();
    token.cancel_with(SluiceError::cancelled("late"));

    let reason = token.reason_or_else(|| SluiceError::cancelled("default"));
    assert_eq!(reason.to_string(), "default");
}

#[test]
fn test_clone_shares_state() {
    let token1 = CancellationToken::new();
    let token2 = token1.clone();

    token2.cancel_with(SluiceError::cancelled("shared"));

    assert!(token1.is_cancelled());
    assert_eq!(token1.reason().unwrap().to_string(), "shared");
}

#[test]
fn test_cancelled_not_ready_before_cancel() {
    let token = CancellationToken::new();
    assert!(token.cancelled().now_or_never().is_none());
}

#[tokio::test]
async fn test_cancelled_resolves_immediately_if_already_cancelled() {
    let token = CancellationToken::new();
    token.cancel();

    token.cancelled().await;
}

#[tokio::test]
async fn test_cancelled_waits_until_cancel() -> anyhow::Result<()> {
    // Arrange
    let token = CancellationToken::new();
    let waiter = tokio::spawn(token.clone().cancelled_owned());

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(!waiter.is_finished());

    // Act
    token.cancel();

    // Assert
    tokio::time::timeout(Duration::from_millis(500), waiter).await??;
    Ok(())
}

#[tokio::test]
async fn test_cancel_wakes_all_waiters() -> anyhow::Result<()> {
    // Arrange
    let token = CancellationToken::new();
    let waiters: Vec<_> = (0..8)
        .map(|_| tokio::spawn(token.clone().cancelled_owned()))
        .collect();

    tokio::time::sleep(Duration::from_millis(10)).await;

    // Act
    token.cancel_with(SluiceError::cancelled("all"));

    // Assert
    for waiter in waiters {
        tokio::time::timeout(Duration::from_millis(500), waiter).await??;
    }
    Ok(())
}

#[test]
fn test_listener_count_tracks_parked_waiters() {
    // Arrange
    let token = CancellationToken::new();
    let mut waiter = Box::pin(token.cancelled());
    assert_eq!(token.listener_count(), 0);

    // Act
    assert!(waiter.as_mut().now_or_never().is_none());

    // Assert
    assert_eq!(token.listener_count(), 1);
    drop(waiter);
    assert_eq!(token.listener_count(), 0);
}
