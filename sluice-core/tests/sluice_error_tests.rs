// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use sluice_core::{IntoSluiceError, Result, ResultExt, SluiceError};
use std::error::Error;
use std::io;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
#[error("Test error: {0}")]
struct TestError(String);

#[test]
fn test_cancelled_displays_reason() {
    let err = SluiceError::cancelled("Stream was cancelled.");
    assert_eq!(err.to_string(), "Stream was cancelled.");
    assert!(err.is_cancellation());
    assert!(!err.is_capacity());
}

#[test]
fn test_capacity_displays_limit() {
    let err = SluiceError::capacity(3);
    assert_eq!(err.to_string(), "AsyncQueue: maximum queue size reached: 3");
    assert!(err.is_capacity());
}

#[test]
fn test_unsupported_scheduler_names_tier() {
    let err = SluiceError::unsupported("frame");
    assert!(err.to_string().contains("`frame`"));
}

#[test]
fn test_timeout_displays_duration() {
    let err = SluiceError::timeout(Duration::from_millis(5));
    assert_eq!(err.to_string(), "Timed out after 5ms");
}

#[test]
fn test_callback_is_passed_through_unchanged() {
    let err = SluiceError::callback(TestError("boom".into()));

    assert!(err.is_callback());
    assert_eq!(err.to_string(), "Test error: boom");
    assert_eq!(
        err.downcast_callback_ref::<TestError>().map(|e| e.0.as_str()),
        Some("boom")
    );
    assert!(err.source().is_some());
}

#[test]
fn test_downcast_of_other_variant_is_none() {
    let err = SluiceError::cancelled("nope");
    assert!(err.downcast_callback_ref::<TestError>().is_none());
}

#[test]
fn test_clone_shares_callback_payload() {
    let err = SluiceError::callback(io::Error::other("shared"));
    let cloned = err.clone();

    assert_eq!(err.to_string(), cloned.to_string());
    assert!(cloned.downcast_callback_ref::<io::Error>().is_some());
}

#[test]
fn test_into_sluice_wraps_user_error() {
    let err = io::Error::other("disk").into_sluice();
    assert!(err.is_callback());
}

#[test]
fn test_into_callback_result() {
    let ok: std::result::Result<i32, TestError> = Ok(1);
    assert_eq!(ok.into_callback_result().unwrap(), 1);

    let failed: std::result::Result<i32, TestError> = Err(TestError("x".into()));
    let result: Result<i32> = failed.into_callback_result();
    assert!(result.unwrap_err().is_callback());
}
