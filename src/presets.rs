//! Ready-made retry policies.
//!
//! Pre-assembled policies for the common "retry on any error with a sensible
//! curve" cases, so call sites don't have to re-derive the same numbers.
//! Each preset documents its exact parameters; reach for
//! [`RetryPolicy::builder`] the moment one of them doesn't fit.

use crate::condition;
use crate::delay::Delay;
use crate::retry::RetryPolicy;
use std::time::Duration;

const QUICK_RETRIES: usize = 3;
const QUICK_PAUSE_MILLIS: u64 = 100;

const STEADY_RETRIES: usize = 5;
const STEADY_BASE_MILLIS: u64 = 200;

const PATIENT_RETRIES: usize = 8;
const PATIENT_BASE_MILLIS: u64 = 250;
const PATIENT_MAX_SECS: u64 = 30;

/// Three retries on any error with a constant 100ms pause.
///
/// **Use case:** in-process or same-host calls where failures clear quickly.
pub fn quick<T, E>() -> RetryPolicy<T, E>
where
    T: Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    RetryPolicy::builder()
        .max_retries(QUICK_RETRIES)
        .retry_when(condition::on_error)
        .delay(Delay::constant(Duration::from_millis(QUICK_PAUSE_MILLIS)))
        .operation_name("quick")
        .build()
        .expect("valid preset")
}

/// Five retries on any error with linearly growing pauses (200ms base).
///
/// **Use case:** networked dependencies that shed load within a second or
/// two.
pub fn steady<T, E>() -> RetryPolicy<T, E>
where
    T: Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    RetryPolicy::builder()
        .max_retries(STEADY_RETRIES)
        .retry_when(condition::on_error)
        .delay(Delay::linear(Duration::from_millis(STEADY_BASE_MILLIS)))
        .operation_name("steady")
        .build()
        .expect("valid preset")
}

/// Eight retries on any error with quadratically growing pauses (250ms base,
/// capped at 30s), raising [`crate::RetryError::Exhausted`] when spent.
///
/// **Use case:** batch jobs talking to dependencies with long recovery
/// windows, where the caller wants an unambiguous exhaustion signal.
pub fn patient<T, E>() -> RetryPolicy<T, E>
where
    T: Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    RetryPolicy::builder()
        .max_retries(PATIENT_RETRIES)
        .retry_when(condition::on_error)
        .delay(
            Delay::quadratic(Duration::from_millis(PATIENT_BASE_MILLIS))
                .with_max(Duration::from_secs(PATIENT_MAX_SECS))
                .expect("valid preset cap"),
        )
        .error_on_exhaustion(true)
        .operation_name("patient")
        .build()
        .expect("valid preset")
}
