use std::time::Duration;

use rtgl_check::incremental::{ScheduleOptions, par_map_sorted, run_deterministic_parallel};

#[tokio::test]
async fn test_output_order_ignores_delays() {
    for width in [1, 2, 4, 8] {
        let out = run_deterministic_parallel(
            vec!["zeta", "alpha", "gamma", "beta"],
            |v| v.to_string(),
            |v| async move {
                let delay = match v {
                    "alpha" => 30,
                    "gamma" => 10,
                    _ => 0,
                };
                tokio::time::sleep(Duration::from_millis(delay)).await;
                v
            },
            ScheduleOptions::with_concurrency(width),
        )
        .await;
        assert_eq!(out, vec!["alpha", "beta", "gamma", "zeta"], "width {width}");
    }
}

#[test]
fn test_blocking_and_async_agree() {
    let items: Vec<u32> = vec![9, 3, 7, 1, 5];
    let blocking = par_map_sorted(items.clone(), |n| *n, |n| n * 10, ScheduleOptions::default());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();
    let asynchronous = runtime.block_on(run_deterministic_parallel(
        items,
        |n| *n,
        |n| async move { n * 10 },
        ScheduleOptions::default(),
    ));

    assert_eq!(blocking, vec![10, 30, 50, 70, 90]);
    assert_eq!(blocking, asynchronous);
}
