//! Delay strategies for retry policies.
//!
//! Provides none, constant, linear, and quadratic curves with optional caps.
//! Attempt semantics: `attempts` counts retry-worthy attempts so far, so the
//! first retry is computed with `attempts = 1`; an index of `0` represents the
//! initial call and always yields no delay. Delays saturate at a documented
//! maximum to avoid overflow.
//!
//! Built-ins ignore `last_error`; it exists so custom strategies can scale the
//! pause by what actually went wrong (e.g. honoring a server-supplied
//! retry-after hint).
//!
//! Example
//! ```rust
//! use std::time::Duration;
//! use secondwind::{Delay, DelayStrategy};
//!
//! let delay = Delay::quadratic(Duration::from_millis(100))
//!     .with_max(Duration::from_secs(2))
//!     .unwrap();
//! assert_eq!(DelayStrategy::<std::io::Error>::delay(&delay, 1, None), Duration::from_millis(100));
//! assert_eq!(DelayStrategy::<std::io::Error>::delay(&delay, 3, None), Duration::from_millis(900));
//! assert_eq!(DelayStrategy::<std::io::Error>::delay(&delay, 9, None), Duration::from_secs(2)); // capped
//! ```
//!
//! Overflow behavior: computations that would overflow saturate to
//! `MAX_DELAY` (1 day). Attempt counts beyond `u32::MAX` are clamped before
//! computing multipliers.

use std::time::Duration;
use thiserror::Error;

/// Maximum delay used when calculations overflow (1 day).
pub const MAX_DELAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Errors returned by delay configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DelayError {
    /// `with_max` only applies to curves that grow.
    #[error("with_max is only valid for linear or quadratic delays")]
    MaxUnsupported,
    /// A zero cap would suppress every pause.
    #[error("max must be greater than zero")]
    MaxMustBePositive,
    /// A cap below the base delay can never be reached meaningfully.
    #[error("max ({max:?}) must be >= base ({base:?})")]
    MaxLessThanBase { base: Duration, max: Duration },
}

/// Trait implemented by all delay strategies.
///
/// `attempts` is the number of retry-worthy attempts so far (1-based for the
/// first retry); `last_error` is the error produced by the most recent
/// attempt, absent when the attempt succeeded but still warrants a retry.
pub trait DelayStrategy<E>: Send + Sync {
    fn delay(&self, attempts: usize, last_error: Option<&E>) -> Duration;
}

/// Adapter turning a plain function into a [`DelayStrategy`].
///
/// Constructed by [`crate::RetryPolicyBuilder::delay_fn`]; also usable
/// directly when a strategy needs to be stored or passed around.
pub struct DelayFn<F>(pub F);

impl<E, F> DelayStrategy<E> for DelayFn<F>
where
    F: Fn(usize, Option<&E>) -> Duration + Send + Sync,
{
    fn delay(&self, attempts: usize, last_error: Option<&E>) -> Duration {
        (self.0)(attempts, last_error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ConstantDelay {
    pause: Duration,
}

impl ConstantDelay {
    fn delay(&self, attempts: usize) -> Duration {
        if attempts == 0 {
            Duration::ZERO
        } else {
            self.pause
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct LinearDelay {
    base: Duration,
    max: Option<Duration>,
}

impl LinearDelay {
    fn delay(&self, attempts: usize) -> Duration {
        if attempts == 0 {
            return Duration::ZERO;
        }
        let attempts_u32 = attempts.min(u32::MAX as usize) as u32; // clamp to prevent truncation
        let linear = self.base.checked_mul(attempts_u32).unwrap_or(MAX_DELAY);
        let capped = self.max.map(|m| linear.min(m)).unwrap_or(linear);
        capped.min(MAX_DELAY)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct QuadraticDelay {
    base: Duration,
    max: Option<Duration>,
}

impl QuadraticDelay {
    fn delay(&self, attempts: usize) -> Duration {
        if attempts == 0 {
            return Duration::ZERO;
        }
        let n = attempts.min(u32::MAX as usize) as u128;
        let nanos = self.base.as_nanos().saturating_mul(n.saturating_mul(n));
        let quadratic = Duration::from_nanos(nanos.min(MAX_DELAY.as_nanos()) as u64);
        let capped = self.max.map(|m| quadratic.min(m)).unwrap_or(quadratic);
        capped.min(MAX_DELAY)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DelayKind {
    None,
    Constant(ConstantDelay),
    Linear(LinearDelay),
    Quadratic(QuadraticDelay),
}

/// Built-in delay curves behind a single concrete type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delay {
    kind: DelayKind,
}

impl Delay {
    /// No pause between attempts.
    pub fn none() -> Self {
        Self { kind: DelayKind::None }
    }

    /// The same pause before every retry.
    pub fn constant(pause: Duration) -> Self {
        Self { kind: DelayKind::Constant(ConstantDelay { pause }) }
    }

    /// `base * attempts`.
    pub fn linear(base: Duration) -> Self {
        Self { kind: DelayKind::Linear(LinearDelay { base, max: None }) }
    }

    /// `base * attempts^2`.
    pub fn quadratic(base: Duration) -> Self {
        Self { kind: DelayKind::Quadratic(QuadraticDelay { base, max: None }) }
    }

    /// Set a maximum pause for a growing curve (linear or quadratic).
    /// Returns an error on `none`/`constant`, if `max` is zero, or if
    /// `max < base`.
    pub fn with_max(mut self, max: Duration) -> Result<Self, DelayError> {
        if max.is_zero() {
            return Err(DelayError::MaxMustBePositive);
        }
        match &mut self.kind {
            DelayKind::Linear(LinearDelay { base, max: existing }) => {
                if max < *base {
                    return Err(DelayError::MaxLessThanBase { base: *base, max });
                }
                *existing = Some(max);
                Ok(self)
            }
            DelayKind::Quadratic(QuadraticDelay { base, max: existing }) => {
                if max < *base {
                    return Err(DelayError::MaxLessThanBase { base: *base, max });
                }
                *existing = Some(max);
                Ok(self)
            }
            DelayKind::None | DelayKind::Constant(_) => Err(DelayError::MaxUnsupported),
        }
    }

    fn compute(&self, attempts: usize) -> Duration {
        match &self.kind {
            DelayKind::None => Duration::ZERO,
            DelayKind::Constant(c) => c.delay(attempts),
            DelayKind::Linear(l) => l.delay(attempts),
            DelayKind::Quadratic(q) => q.delay(attempts),
        }
    }
}

impl<E> DelayStrategy<E> for Delay {
    fn delay(&self, attempts: usize, _last_error: Option<&E>) -> Duration {
        self.compute(attempts)
    }
}
