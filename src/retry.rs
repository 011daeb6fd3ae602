//! Retry policy implementation
//!
//! Retry policy for fallible async operations, deciding over the whole
//! outcome rather than errors alone.
//!
//! Semantics:
//! - `max_retries` counts retries *beyond* the initial attempt; one call of
//!   [`RetryPolicy::execute`] invokes the operation at most `max_retries + 1`
//!   times.
//! - `retry_when` sees the full `&Result<T, E>` of every attempt, so a retry
//!   can be driven by an error or by an unsatisfying success (see
//!   [`crate::condition::on_none`]).
//! - The condition is evaluated after every attempt, the last allowable one
//!   included; the bound takes precedence over a positive decision.
//! - Exhaustion is silent by default: the last value is returned or the last
//!   error re-raised as [`RetryError::Inner`]. Opt into
//!   [`RetryError::Exhausted`] with `error_on_exhaustion`.
//! - The delay strategy is consulted once per retry (1-based) and the pause
//!   fully elapses before the next attempt begins.
//! - Sleeper controls how pauses are applied (production uses
//!   [`TokioSleeper`]; tests can inject `InstantSleeper`/`RecordingSleeper`).
//!
//! Invariants:
//! - Attempts are strictly sequential and never exceed `max_retries + 1`.
//! - Delay and sleeper are invoked exactly once per performed retry, never
//!   for the initial attempt.
//!
//! Example
//! ```rust
//! use std::time::Duration;
//! use secondwind::{condition, Delay, RetryPolicy, RetryError};
//!
//! #[derive(Debug)]
//! struct MyErr;
//! impl std::fmt::Display for MyErr { fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "oops") } }
//! impl std::error::Error for MyErr {}
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let policy = RetryPolicy::builder()
//!     .max_retries(2) // retries beyond the initial attempt
//!     .retry_when(condition::on_error)
//!     .delay(Delay::constant(Duration::from_millis(100)))
//!     .build()
//!     .unwrap();
//! let result: Result<(), RetryError<(), MyErr>> =
//!     policy.execute(|| async { Err(MyErr) }).await;
//! assert!(result.is_err());
//! # });
//! ```

use crate::delay::{Delay, DelayFn, DelayStrategy};
use crate::error::RetryError;
use crate::sleeper::{Sleeper, TokioSleeper};
use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tower_layer::Layer;
use tower_service::Service;

/// Retry policy combining the attempt bound, condition, delay strategy, and
/// sleeper.
pub struct RetryPolicy<T, E> {
    max_retries: usize,
    retry_when: Arc<dyn Fn(&Result<T, E>) -> bool + Send + Sync>,
    delay: Arc<dyn DelayStrategy<E>>,
    error_on_exhaustion: bool,
    operation_name: Option<Arc<str>>,
    sleeper: Arc<dyn Sleeper>,
}

impl<T, E> Clone for RetryPolicy<T, E> {
    fn clone(&self) -> Self {
        Self {
            max_retries: self.max_retries,
            retry_when: self.retry_when.clone(),
            delay: self.delay.clone(),
            error_on_exhaustion: self.error_on_exhaustion,
            operation_name: self.operation_name.clone(),
            sleeper: self.sleeper.clone(),
        }
    }
}

impl<T, E> std::fmt::Debug for RetryPolicy<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_retries", &self.max_retries)
            .field("error_on_exhaustion", &self.error_on_exhaustion)
            .field("operation_name", &self.operation_name)
            .field("retry_when", &"<condition>")
            .field("delay", &"<strategy>")
            .field("sleeper", &"<sleeper>")
            .finish()
    }
}

impl<T, E> RetryPolicy<T, E>
where
    T: Send,
    E: std::error::Error + Send + Sync + 'static,
{
    /// Construct a new builder with defaults.
    pub fn builder() -> RetryPolicyBuilder<T, E> {
        RetryPolicyBuilder::new()
    }

    /// Execute an async operation with retry semantics.
    ///
    /// The operation is re-invoked until the condition declines a retry or
    /// the bound is reached; the resolution is then the last outcome, with
    /// errors wrapped in [`RetryError::Inner`], or [`RetryError::Exhausted`]
    /// when opted in.
    pub async fn execute<Fut, Op>(&self, mut operation: Op) -> Result<T, RetryError<T, E>>
    where
        Fut: Future<Output = Result<T, E>> + Send,
        Op: FnMut() -> Fut + Send,
    {
        let mut retries: usize = 0;

        loop {
            let outcome = operation().await;

            if !(self.retry_when)(&outcome) {
                return outcome.map_err(RetryError::Inner);
            }

            if retries >= self.max_retries {
                let attempts = retries + 1;
                tracing::warn!(
                    operation = self.operation_name.as_deref().unwrap_or("anonymous"),
                    attempts,
                    "retry budget exhausted"
                );
                if self.error_on_exhaustion {
                    return Err(RetryError::exhausted(
                        attempts,
                        self.operation_name.clone(),
                        outcome,
                    ));
                }
                return outcome.map_err(RetryError::Inner);
            }

            retries += 1;
            let pause = self.delay.delay(retries, outcome.as_ref().err());
            tracing::debug!(
                operation = self.operation_name.as_deref().unwrap_or("anonymous"),
                retry = retries,
                pause_ms = pause.as_millis() as u64,
                "retry scheduled"
            );
            self.sleeper.sleep(pause).await;
        }
    }

    /// Convert this policy into a tower layer; see [`RetryLayer`].
    pub fn into_layer(self) -> RetryLayer<T, E> {
        RetryLayer { policy: self }
    }
}

/// Errors produced while building a retry policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// Every policy needs a retry condition.
    #[error("a retry condition is required; set one with `retry_when`")]
    MissingCondition,
}

/// Builder for [`RetryPolicy`].
pub struct RetryPolicyBuilder<T, E> {
    max_retries: usize,
    retry_when: Option<Arc<dyn Fn(&Result<T, E>) -> bool + Send + Sync>>,
    delay: Arc<dyn DelayStrategy<E>>,
    error_on_exhaustion: bool,
    operation_name: Option<Arc<str>>,
    sleeper: Arc<dyn Sleeper>,
}

impl<T, E> RetryPolicyBuilder<T, E>
where
    T: Send,
    E: std::error::Error + Send + Sync + 'static,
{
    /// Create a builder with the smallest safe defaults: zero retries, no
    /// pause, silent exhaustion.
    pub fn new() -> Self {
        Self {
            max_retries: 0,
            retry_when: None,
            delay: Arc::new(Delay::none()),
            error_on_exhaustion: false,
            operation_name: None,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Set the number of retries allowed beyond the initial attempt.
    pub fn max_retries(mut self, retries: usize) -> Self {
        self.max_retries = retries;
        self
    }

    /// Condition deciding whether an attempt's outcome warrants another
    /// attempt. Required; see [`crate::condition`] for built-ins.
    pub fn retry_when<F>(mut self, condition: F) -> Self
    where
        F: Fn(&Result<T, E>) -> bool + Send + Sync + 'static,
    {
        self.retry_when = Some(Arc::new(condition));
        self
    }

    /// Set the delay strategy.
    pub fn delay<D>(mut self, delay: D) -> Self
    where
        D: DelayStrategy<E> + 'static,
    {
        self.delay = Arc::new(delay);
        self
    }

    /// Set the delay strategy from a plain function of
    /// `(attempts, last_error)`.
    pub fn delay_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(usize, Option<&E>) -> std::time::Duration + Send + Sync + 'static,
    {
        self.delay = Arc::new(DelayFn(f));
        self
    }

    /// Resolve exhaustion with [`RetryError::Exhausted`] instead of the last
    /// outcome.
    pub fn error_on_exhaustion(mut self, enabled: bool) -> Self {
        self.error_on_exhaustion = enabled;
        self
    }

    /// Label this policy's operation for diagnostics and the exhaustion
    /// message. No behavioral effect.
    pub fn operation_name<S>(mut self, name: S) -> Self
    where
        S: Into<Arc<str>>,
    {
        self.operation_name = Some(name.into());
        self
    }

    /// Provide a custom sleeper implementation.
    pub fn with_sleeper<S>(mut self, sleeper: S) -> Self
    where
        S: Sleeper + 'static,
    {
        self.sleeper = Arc::new(sleeper);
        self
    }

    /// Build the retry policy, validating inputs.
    pub fn build(self) -> Result<RetryPolicy<T, E>, BuildError> {
        let retry_when = self.retry_when.ok_or(BuildError::MissingCondition)?;
        Ok(RetryPolicy {
            max_retries: self.max_retries,
            retry_when,
            delay: self.delay,
            error_on_exhaustion: self.error_on_exhaustion,
            operation_name: self.operation_name,
            sleeper: self.sleeper,
        })
    }
}

impl<T, E> Default for RetryPolicyBuilder<T, E>
where
    T: Send,
    E: std::error::Error + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Tower-native retry layer wrapping a [`RetryPolicy`].
pub struct RetryLayer<T, E> {
    policy: RetryPolicy<T, E>,
}

impl<T, E> Clone for RetryLayer<T, E> {
    fn clone(&self) -> Self {
        Self { policy: self.policy.clone() }
    }
}

impl<S, T, E> Layer<S> for RetryLayer<T, E> {
    type Service = RetryService<S, T, E>;

    fn layer(&self, inner: S) -> Self::Service {
        RetryService { inner, policy: self.policy.clone() }
    }
}

/// Retry service produced by [`RetryLayer`].
///
/// Requests must be `Clone`: each attempt re-invokes the inner service with a
/// fresh copy of the original request.
pub struct RetryService<S, T, E> {
    inner: S,
    policy: RetryPolicy<T, E>,
}

impl<S: Clone, T, E> Clone for RetryService<S, T, E> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone(), policy: self.policy.clone() }
    }
}

impl<S, T, E, Request> Service<Request> for RetryService<S, T, E>
where
    Request: Clone + Send + 'static,
    S: Service<Request, Response = T> + Clone + Send + 'static,
    S::Error: Into<E>,
    S::Future: Send + 'static,
    T: Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    type Response = T;
    type Error = RetryError<T, E>;
    type Future = BoxFuture<'static, Result<T, RetryError<T, E>>>;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(|e| RetryError::Inner(e.into()))
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let policy = self.policy.clone();
        let mut inner = self.inner.clone();
        Box::pin(async move {
            policy
                .execute(move || {
                    let fut = inner.call(req.clone());
                    async move { fut.await.map_err(Into::into) }
                })
                .await
        })
    }
}
