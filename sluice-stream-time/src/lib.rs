// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Time-based operators for sluice streams.
//!
//! - **[`debounce`]** / **[`DebounceExt`]** - emit the latest value once the source
//!   has been quiet for a window
//!
//! Timing runs on the `Delay` tier of `sluice-exec`, so the operators follow
//! whichever runtime feature (`runtime-tokio` by default, or `runtime-smol`) is
//! enabled.

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

mod debounce;

pub use debounce::{debounce, Debounce, DebounceExt};
