use criterion::{black_box, criterion_group, criterion_main, Criterion};
use secondwind::{condition, InstantSleeper, RetryPolicy};
use std::io;

// Executor overhead on the happy path and under full exhaustion; sleeping is
// stubbed out so only loop bookkeeping is measured.
fn retry_overhead(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("runtime");

    let first_try: RetryPolicy<u32, io::Error> = RetryPolicy::builder()
        .max_retries(3)
        .retry_when(condition::on_error)
        .with_sleeper(InstantSleeper)
        .build()
        .expect("policy");

    c.bench_function("execute_first_try_success", |b| {
        b.to_async(&rt).iter(|| async {
            first_try
                .execute(|| async { Ok::<_, io::Error>(black_box(1u32)) })
                .await
                .expect("succeeds")
        });
    });

    let exhausting: RetryPolicy<u32, io::Error> = RetryPolicy::builder()
        .max_retries(5)
        .retry_when(condition::on_error)
        .with_sleeper(InstantSleeper)
        .build()
        .expect("policy");

    c.bench_function("execute_exhausts_five_retries", |b| {
        b.to_async(&rt).iter(|| async {
            let result = exhausting
                .execute(|| async {
                    Err::<u32, _>(io::Error::new(io::ErrorKind::Other, black_box("boom")))
                })
                .await;
            assert!(result.is_err());
        });
    });
}

criterion_group!(benches, retry_overhead);
criterion_main!(benches);
