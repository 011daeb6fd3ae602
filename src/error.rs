//! Error types for retry resolution
use std::fmt;
use std::sync::Arc;

/// Unified error type returned by the retry executor.
///
/// `Inner` re-raises the last operation error unchanged; `Exhausted` is the
/// opt-in signal that the retry budget ran out while the retry condition
/// still wanted another attempt.
#[derive(Debug, Clone)]
pub enum RetryError<T, E> {
    /// The retry budget was spent while the condition still requested a
    /// retry. Exactly one of `cause`/`last_value` is set, mirroring the last
    /// attempt's outcome.
    Exhausted {
        /// Total invocations of the operation, initial attempt included.
        attempts: usize,
        /// Diagnostic label from the policy, if one was configured.
        operation: Option<Arc<str>>,
        /// The last operation error, when the final attempt failed.
        cause: Option<E>,
        /// The last value, when the final attempt succeeded but still
        /// satisfied the retry condition.
        last_value: Option<T>,
    },
    /// The last operation error, re-raised as produced.
    Inner(E),
}

impl<T, E: fmt::Display> fmt::Display for RetryError<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted { attempts, operation, cause, .. } => {
                match operation {
                    Some(name) => {
                        write!(f, "`{}` exhausted its retries after {} attempts", name, attempts)?
                    }
                    None => write!(f, "retry exhausted after {} attempts", attempts)?,
                }
                if let Some(cause) = cause {
                    write!(f, "; last error: {}", cause)?;
                }
                Ok(())
            }
            Self::Inner(e) => write!(f, "{}", e),
        }
    }
}

impl<T: fmt::Debug, E: std::error::Error + 'static> std::error::Error for RetryError<T, E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Inner(e) => Some(e),
            Self::Exhausted { cause, .. } => {
                cause.as_ref().map(|e| e as &dyn std::error::Error)
            }
        }
    }
}

impl<T, E> RetryError<T, E> {
    /// Construct an `Exhausted` variant from the final attempt's outcome.
    pub fn exhausted(
        attempts: usize,
        operation: Option<Arc<str>>,
        last_outcome: Result<T, E>,
    ) -> Self {
        let (last_value, cause) = match last_outcome {
            Ok(v) => (Some(v), None),
            Err(e) => (None, Some(e)),
        };
        RetryError::Exhausted { attempts, operation, cause, last_value }
    }

    /// Check if this error is due to retry exhaustion.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }

    /// Check if this error wraps an operation error.
    pub fn is_inner(&self) -> bool {
        matches!(self, Self::Inner(_))
    }

    /// Get the operation error if this is an `Inner` variant.
    pub fn into_inner(self) -> Option<E> {
        match self {
            Self::Inner(e) => Some(e),
            _ => None,
        }
    }

    /// Borrow the operation error if this is an `Inner` variant.
    pub fn as_inner(&self) -> Option<&E> {
        match self {
            Self::Inner(e) => Some(e),
            _ => None,
        }
    }

    /// Total attempts recorded at exhaustion, if present.
    pub fn attempts(&self) -> Option<usize> {
        match self {
            Self::Exhausted { attempts, .. } => Some(*attempts),
            _ => None,
        }
    }

    /// Borrow the exhaustion cause, if one was recorded.
    pub fn cause(&self) -> Option<&E> {
        match self {
            Self::Exhausted { cause, .. } => cause.as_ref(),
            _ => None,
        }
    }

    /// Take the last value out of an exhaustion error, if the final attempt
    /// produced one.
    pub fn into_last_value(self) -> Option<T> {
        match self {
            Self::Exhausted { last_value, .. } => last_value,
            _ => None,
        }
    }

    /// The diagnostic label recorded at exhaustion, if any.
    pub fn operation(&self) -> Option<&str> {
        match self {
            Self::Exhausted { operation, .. } => operation.as_deref(),
            _ => None,
        }
    }
}
