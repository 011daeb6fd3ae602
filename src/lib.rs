#![forbid(unsafe_code)]
#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::all))]

//! # Second Wind 🌬️
//!
//! Outcome-aware retry for async Rust: re-invoke a fallible operation until
//! its outcome stops warranting another attempt or the retry budget runs
//! out.
//!
//! ## Features
//!
//! - **Retry conditions over the whole outcome** — retry on errors, on
//!   unsatisfying successes (`Ok(None)`), or on anything a closure can
//!   decide
//! - **Delay curves** (none, constant, linear, quadratic) with caps and
//!   overflow saturation; custom strategies see the last error
//! - **Silent or loud exhaustion** — hand back the last outcome unchanged,
//!   or raise a dedicated exhaustion error chaining the cause
//! - **Transparent wrapping** of async callables and tower services
//! - **Deterministic tests** via an injectable sleeper
//!
//! ## Quick Start
//!
//! ```rust
//! use secondwind::{condition, Delay, RetryPolicy};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let policy = RetryPolicy::builder()
//!         .max_retries(3)
//!         .retry_when(condition::on_error)
//!         .delay(Delay::linear(Duration::from_millis(100)))
//!         .build()
//!         .expect("valid policy");
//!
//!     let result = policy.execute(|| async {
//!         // Your async operation here
//!         Ok::<_, std::io::Error>(())
//!     }).await;
//!     assert!(result.is_ok());
//! }
//! ```

pub mod condition;
pub mod delay;
pub mod error;
pub mod presets;
pub mod prelude;
pub mod retry;
pub mod sleeper;
pub mod wrap;

// Re-exports
pub use delay::{Delay, DelayError, DelayFn, DelayStrategy, MAX_DELAY};
pub use error::RetryError;
pub use retry::{BuildError, RetryLayer, RetryPolicy, RetryPolicyBuilder, RetryService};
pub use sleeper::{InstantSleeper, RecordingSleeper, Sleeper, TokioSleeper};
pub use wrap::retrying;
