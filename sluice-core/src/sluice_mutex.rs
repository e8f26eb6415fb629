// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Synchronization primitive shared by every sluice crate.
//!
//! State is never held locked across an `.await`, so a blocking, non-poisoning
//! `parking_lot` mutex is sufficient.

pub use parking_lot::{Mutex, MutexGuard};
