// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use parking_lot::Mutex;
use sluice_core::SluiceError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Shared observation point of a fixture stream.
///
/// Clone it before handing the stream to a driver; the clone keeps seeing updates.
#[derive(Debug, Clone, Default)]
pub struct StreamProbe {
    inner: Arc<ProbeInner>,
}

#[derive(Debug, Default)]
struct ProbeInner {
    advances: AtomicUsize,
    cleanups: AtomicUsize,
    last_error: Mutex<Option<SluiceError>>,
}

impl StreamProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `advance` calls that reached an active stream.
    pub fn advances(&self) -> usize {
        self.inner.advances.load(Ordering::SeqCst)
    }

    /// Number of times the stream's cleanup ran. Should never exceed 1.
    pub fn cleanups(&self) -> usize {
        self.inner.cleanups.load(Ordering::SeqCst)
    }

    /// The reason injected through `terminate_with_error`, if any.
    pub fn last_error(&self) -> Option<SluiceError> {
        self.inner.last_error.lock().clone()
    }

    pub fn record_advance(&self) {
        self.inner.advances.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_cleanup(&self) {
        self.inner.cleanups.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_error(&self, reason: &SluiceError) {
        *self.inner.last_error.lock() = Some(reason.clone());
    }
}
