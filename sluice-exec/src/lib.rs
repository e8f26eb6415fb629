// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Execution primitives for sluice: tiered task scheduling, signals and the
//! subscription driver.

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

pub mod scheduler;
pub mod signal;
pub mod subscribe;
pub mod task;

pub use scheduler::{
    delay, microtask, task, FrameSource, IntervalFrames, Scheduler, Tier,
    DEFAULT_FRAME_INTERVAL, TASK_MIN_DELAY,
};
pub use signal::{signal_task, Signal};
pub use subscribe::{subscribe, SubscribeExt, Subscription};
pub use task::{TaskCanceller, TaskHandle};
