//! Built-in retry conditions.
//!
//! A retry condition is any `Fn(&Result<T, E>) -> bool + Send + Sync`
//! examining the outcome of one attempt and answering "is another attempt
//! warranted?". The functions here cover the common cases; anything fancier
//! (matching on error kinds, inspecting response bodies) is a plain closure
//! passed to [`crate::RetryPolicyBuilder::retry_when`].

/// Retry whenever the attempt failed.
pub fn on_error<T, E>(outcome: &Result<T, E>) -> bool {
    outcome.is_err()
}

/// Retry unconditionally, success or not. Only the attempt bound stops the
/// loop.
pub fn always<T, E>(_outcome: &Result<T, E>) -> bool {
    true
}

/// Retry when the attempt succeeded but produced nothing. Failed attempts are
/// not retried by this condition.
pub fn on_none<T, E>(outcome: &Result<Option<T>, E>) -> bool {
    matches!(outcome, Ok(None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn err() -> io::Error {
        io::Error::new(io::ErrorKind::Other, "boom")
    }

    #[test]
    fn on_error_tracks_the_error_slot() {
        assert!(on_error(&Err::<u32, _>(err())));
        assert!(!on_error(&Ok::<_, io::Error>(7)));
        // The value plays no part in the decision.
        assert!(!on_error(&Ok::<Option<u32>, io::Error>(None)));
    }

    #[test]
    fn always_is_unconditional() {
        assert!(always(&Ok::<_, io::Error>(7)));
        assert!(always(&Err::<u32, _>(err())));
        assert!(always(&Ok::<Option<u32>, io::Error>(None)));
    }

    #[test]
    fn on_none_requires_a_successful_empty_outcome() {
        assert!(on_none(&Ok::<Option<u32>, io::Error>(None)));
        assert!(!on_none(&Ok::<_, io::Error>(Some(7))));
        assert!(!on_none(&Err::<Option<u32>, _>(err())));
    }
}
