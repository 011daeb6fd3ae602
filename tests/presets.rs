//! Preset policies carry the parameters they advertise.

mod common;

use common::TestError;
use secondwind::{presets, RetryError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn quick_retries_three_times_with_constant_pauses() {
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_clone = calls.clone();
    let started = tokio::time::Instant::now();

    let result = presets::quick::<u32, TestError>()
        .execute(move || {
            let calls = calls_clone.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(TestError::new("down"))
            }
        })
        .await;

    assert!(matches!(result, Err(RetryError::Inner(_))), "quick exhausts silently");
    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert_eq!(started.elapsed(), Duration::from_millis(300), "three constant 100ms pauses");
}

#[tokio::test(start_paused = true)]
async fn steady_grows_its_pauses_linearly() {
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_clone = calls.clone();
    let started = tokio::time::Instant::now();

    let result = presets::steady::<u32, TestError>()
        .execute(move || {
            let calls = calls_clone.clone();
            async move {
                let attempt = calls.fetch_add(1, Ordering::SeqCst);
                if attempt < 2 {
                    Err(TestError::new("busy"))
                } else {
                    Ok(attempt as u32)
                }
            }
        })
        .await;

    assert_eq!(result.unwrap(), 2);
    // 200ms then 400ms.
    assert_eq!(started.elapsed(), Duration::from_millis(600));
}

#[tokio::test(start_paused = true)]
async fn patient_raises_a_labeled_exhaustion_error() {
    let result = presets::patient::<u32, TestError>()
        .execute(|| async { Err::<u32, _>(TestError::new("still down")) })
        .await;

    match result.unwrap_err() {
        RetryError::Exhausted { attempts, operation, cause, .. } => {
            assert_eq!(attempts, 9, "1 initial + 8 retries");
            assert_eq!(operation.as_deref(), Some("patient"));
            assert_eq!(cause, Some(TestError::new("still down")));
        }
        e => panic!("expected exhaustion, got {:?}", e),
    }
}
