//! Convenient re-exports for common Second Wind types.
pub use crate::{
    condition,
    delay::{Delay, DelayError, DelayFn, DelayStrategy, MAX_DELAY},
    error::RetryError,
    presets,
    retry::{BuildError, RetryLayer, RetryPolicy, RetryPolicyBuilder, RetryService},
    sleeper::{InstantSleeper, RecordingSleeper, Sleeper, TokioSleeper},
    wrap::retrying,
};
