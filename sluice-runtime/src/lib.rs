// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Runtime abstraction for sluice.
//!
//! Everything above this crate is runtime-agnostic: timers go through [`Timer`],
//! background work through [`spawn_detached`] / [`BackgroundTask`], and cooperative
//! rescheduling through [`yield_now`]. Pick the executor with a feature flag
//! (`runtime-tokio`, the default, or `runtime-smol`).

pub mod impls;
pub mod task;
pub mod timer;

pub use task::{spawn_detached, yield_now, BackgroundTask};
pub use timer::Timer;

#[cfg(feature = "runtime-smol")]
pub use impls::smol::SmolTimer;
#[cfg(feature = "runtime-tokio")]
pub use impls::tokio::TokioTimer;

/// The timer of the selected runtime.
#[cfg(feature = "runtime-tokio")]
pub type DefaultTimer = TokioTimer;

/// The timer of the selected runtime.
#[cfg(all(feature = "runtime-smol", not(feature = "runtime-tokio")))]
pub type DefaultTimer = SmolTimer;
