// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for the sluice workspace.
//!
//! Not for production code. The fixtures are plain [`AsyncStream`](sluice_core::AsyncStream)
//! implementations whose cleanup is observable through a [`StreamProbe`], so tests
//! can assert that termination reached every stage of a pipeline.
//!
//! # Key Types
//!
//! - [`CountingStream`] - yields `0..max` with a delay per value, returns `true`
//! - [`IncrementStream`] - feedback stream yielding `next + 1` for every resumption
//! - [`StreamProbe`] - shared counters for advances and cleanups
//! - [`TestError`] - a user error for callback failure tests

pub mod counting;
pub mod helpers;
pub mod increment;
pub mod probe;
pub mod test_error;

pub use counting::CountingStream;
pub use helpers::{drain, settle};
pub use increment::IncrementStream;
pub use probe::StreamProbe;
pub use test_error::{test_error, TestError};
