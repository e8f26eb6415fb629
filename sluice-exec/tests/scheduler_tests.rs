// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// SPDX-License-Identifier: MIT OR Apache-2.0

use sluice_core::SluiceError;
use sluice_exec::{IntervalFrames, Scheduler, Tier};
use sluice_runtime::TokioTimer;
use std::time::Duration;
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn test_frame_tier_without_source_is_unsupported() -> anyhow::Result<()> {
    // Arrange
    let scheduler = Scheduler::new();

    // Act
    let result = scheduler.schedule(Tier::Frame, || async { Ok(()) }, None);

    // Assert
    assert!(!scheduler.supports(Tier::Frame));
    assert!(matches!(
        result,
        Err(SluiceError::UnsupportedScheduler { tier: "frame" })
    ));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_every_timer_tier_is_supported() {
    let scheduler = Scheduler::with_timer(TokioTimer);

    assert!(scheduler.supports(Tier::Microtask));
    assert!(scheduler.supports(Tier::Task));
    assert!(scheduler.supports(Tier::Delay(Duration::from_secs(1))));
}

#[tokio::test(start_paused = true)]
async fn test_frame_tier_fires_on_next_frame() -> anyhow::Result<()> {
    // Arrange
    let interval = Duration::from_millis(16);
    let scheduler =
        Scheduler::new().with_frame_source(IntervalFrames::with_timer(TokioTimer, interval));
    let start = Instant::now();

    // Act
    let value = scheduler
        .schedule(Tier::Frame, || async { Ok("frame") }, None)?
        .await?;

    // Assert
    assert!(scheduler.supports(Tier::Frame));
    assert_eq!(value, "frame");
    let elapsed = start.elapsed();
    assert!(elapsed >= interval && elapsed < interval * 2);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_frame_task_uses_frame_reason() -> anyhow::Result<()> {
    let scheduler = Scheduler::new().with_frame_source(IntervalFrames::new());

    let handle = scheduler.schedule(Tier::Frame, || async { Ok(()) }, None)?;
    handle.cancel();

    assert_eq!(
        handle.await.unwrap_err().to_string(),
        "Frame task was cancelled."
    );
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_delay_tier_uses_scheduler_timer() -> anyhow::Result<()> {
    // Arrange
    let scheduler = Scheduler::with_timer(TokioTimer);
    let wait = Duration::from_millis(25);
    let start = Instant::now();

    // Act
    scheduler
        .schedule(Tier::Delay(wait), || async { Ok(()) }, None)?
        .await?;

    // Assert
    assert!(start.elapsed() >= wait);
    Ok(())
}

#[test]
fn test_tiers_are_ordered_soonest_to_latest() {
    let mut tiers = vec![
        Tier::Frame,
        Tier::Delay(Duration::from_millis(5)),
        Tier::Task,
        Tier::Microtask,
    ];
    tiers.sort();

    assert_eq!(
        tiers,
        vec![
            Tier::Microtask,
            Tier::Task,
            Tier::Delay(Duration::from_millis(5)),
            Tier::Frame
        ]
    );
}
