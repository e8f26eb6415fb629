// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use sluice_core::SluiceError;

/// User error raised by test callbacks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TestError(pub String);

impl TestError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// A [`SluiceError::Callback`] wrapping a [`TestError`] with `msg`.
pub fn test_error(msg: impl Into<String>) -> SluiceError {
    SluiceError::callback(TestError::new(msg))
}
