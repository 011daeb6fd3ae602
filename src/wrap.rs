//! Transparent call wrapping.
//!
//! [`retrying`] composes a policy with an async callable and hands back a new
//! callable of the same shape: every invocation routes through
//! [`RetryPolicy::execute`], re-invoking the original with a clone of the
//! original argument on each attempt. The wrapper holds no retry logic of its
//! own; its resolution is exactly the executor's.
//!
//! Callables taking several arguments wrap as a single tuple argument, the
//! same convention tower uses for requests. For wrapping a whole
//! [`tower_service::Service`], see [`crate::RetryLayer`].
//!
//! Example
//! ```rust
//! use secondwind::{condition, wrap::retrying, RetryPolicy};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let policy = RetryPolicy::builder()
//!     .max_retries(2)
//!     .retry_when(condition::on_error)
//!     .build()
//!     .unwrap();
//!
//! let fetch = retrying(policy, |id: u32| async move {
//!     Ok::<_, std::io::Error>(id * 2)
//! });
//!
//! assert_eq!(fetch(21).await.unwrap(), 42);
//! # });
//! ```

use crate::error::RetryError;
use crate::retry::RetryPolicy;
use futures::future::BoxFuture;
use std::future::Future;

/// Wrap `f` so every call retries per `policy`.
///
/// The argument is cloned once per attempt; the receiver state, if any, lives
/// in the captured environment of `f` and is shared across attempts.
pub fn retrying<A, T, E, F, Fut>(
    policy: RetryPolicy<T, E>,
    f: F,
) -> impl Fn(A) -> BoxFuture<'static, Result<T, RetryError<T, E>>>
where
    A: Clone + Send + 'static,
    T: Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
    F: Fn(A) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    move |arg: A| {
        let policy = policy.clone();
        let f = f.clone();
        Box::pin(async move { policy.execute(move || f(arg.clone())).await })
    }
}

impl<T, E> RetryPolicy<T, E>
where
    T: Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    /// Convenience form of [`retrying`] borrowing this policy by clone.
    pub fn wrap<A, F, Fut>(
        &self,
        f: F,
    ) -> impl Fn(A) -> BoxFuture<'static, Result<T, RetryError<T, E>>>
    where
        A: Clone + Send + 'static,
        F: Fn(A) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        retrying(self.clone(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition;
    use crate::sleeper::InstantSleeper;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct TestError(&'static str);

    impl std::fmt::Display for TestError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl std::error::Error for TestError {}

    fn policy(max_retries: usize) -> RetryPolicy<u32, TestError> {
        RetryPolicy::builder()
            .max_retries(max_retries)
            .retry_when(condition::on_error)
            .with_sleeper(InstantSleeper)
            .build()
            .expect("builder")
    }

    #[tokio::test]
    async fn wrapped_call_forwards_the_argument() {
        let double = retrying(policy(0), |n: u32| async move { Ok::<_, TestError>(n * 2) });
        assert_eq!(double(21).await.unwrap(), 42);
        assert_eq!(double(4).await.unwrap(), 8);
    }

    #[tokio::test]
    async fn wrapped_call_reinvokes_with_the_same_argument() {
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = seen.clone();

        let op = retrying(policy(3), move |n: u32| {
            let seen = seen_clone.clone();
            async move {
                let attempt = seen.fetch_add(1, Ordering::SeqCst);
                assert_eq!(n, 9, "every attempt receives the original argument");
                if attempt < 2 {
                    Err(TestError("not yet"))
                } else {
                    Ok(n)
                }
            }
        });

        assert_eq!(op(9).await.unwrap(), 9);
        assert_eq!(seen.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn wrapped_call_raises_exactly_once_when_spent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();

        let op = retrying(policy(2), move |_: ()| {
            let calls = calls_clone.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(TestError("down"))
            }
        });

        let err = op(()).await.unwrap_err();
        assert!(matches!(err, RetryError::Inner(TestError("down"))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn independent_calls_do_not_share_attempt_state() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();

        // Fails on every odd global invocation; each wrapped call retries it
        // to success on its own budget.
        let op = retrying(policy(1), move |n: u32| {
            let calls = calls_clone.clone();
            async move {
                if calls.fetch_add(1, Ordering::SeqCst) % 2 == 0 {
                    Err(TestError("transient"))
                } else {
                    Ok(n)
                }
            }
        });

        assert_eq!(op(1).await.unwrap(), 1);
        assert_eq!(op(2).await.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 4, "two invocations each, budgets reset");
    }

    #[tokio::test]
    async fn policy_wrap_matches_the_free_function() {
        let via_method = policy(1).wrap(|n: u32| async move { Ok::<_, TestError>(n + 1) });
        assert_eq!(via_method(1).await.unwrap(), 2);
    }
}
