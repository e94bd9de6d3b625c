//! Deterministic parallel scheduling.
//!
//! Items are sorted by `(key, original index)` before any work starts; that
//! order, never submission or completion order, is the order of the
//! results.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use parking_lot::Mutex;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Upper bound for the default width.
pub const MAX_DEFAULT_CONCURRENCY: usize = 8;

/// Hardware parallelism capped at [`MAX_DEFAULT_CONCURRENCY`], floor 1.
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .clamp(1, MAX_DEFAULT_CONCURRENCY)
}

/// Options for the scheduler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScheduleOptions {
    /// Worker count; `None` uses [`default_concurrency`].
    pub concurrency: Option<usize>,
}

impl ScheduleOptions {
    pub fn with_concurrency(concurrency: usize) -> Self {
        Self {
            concurrency: Some(concurrency),
        }
    }

    /// Effective width, never below 1.
    pub fn width(&self) -> usize {
        self.concurrency.unwrap_or_else(default_concurrency).max(1)
    }
}

fn sort_by_key_index<T, K: Ord>(items: Vec<T>, key_fn: impl Fn(&T) -> K) -> Vec<T> {
    let mut keyed: Vec<(K, usize, T)> = items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| (key_fn(&item), idx, item))
        .collect();
    keyed.sort_by(|a, b| (&a.0, a.1).cmp(&(&b.0, b.1)));
    keyed.into_iter().map(|(_, _, item)| item).collect()
}

/// Run `worker` over every item with at most `options.width()` units in
/// flight and return the results in `(key, original index)` order.
///
/// Workers are plain futures polled on the caller's task; each pulls the
/// next position from a shared cursor and writes into a pre-sized slot.
pub async fn run_deterministic_parallel<T, K, R, F, Fut>(
    items: Vec<T>,
    key_fn: impl Fn(&T) -> K,
    worker: F,
    options: ScheduleOptions,
) -> Vec<R>
where
    K: Ord,
    F: Fn(T) -> Fut,
    Fut: Future<Output = R>,
{
    let sorted = sort_by_key_index(items, key_fn);
    let total = sorted.len();
    if total == 0 {
        return Vec::new();
    }

    let width = options.width().min(total);
    let inputs: Vec<Mutex<Option<T>>> = sorted.into_iter().map(|item| Mutex::new(Some(item))).collect();
    let slots: Mutex<Vec<Option<R>>> = Mutex::new((0..total).map(|_| None).collect());
    let cursor = AtomicUsize::new(0);

    tracing::trace!(total, width, "scheduling deterministic batch");

    {
        let (inputs, slots, cursor, worker) = (&inputs, &slots, &cursor, &worker);
        let mut workers: FuturesUnordered<_> = (0..width).map(move |_| async move {
            loop {
                let pos = cursor.fetch_add(1, Ordering::Relaxed);
                if pos >= total {
                    break;
                }
                let Some(item) = inputs[pos].lock().take() else {
                    continue;
                };
                let result = worker(item).await;
                slots.lock()[pos] = Some(result);
            }
        }).collect();
        while workers.next().await.is_some() {}
    }

    slots.into_inner().into_iter().flatten().collect()
}

/// Blocking counterpart of [`run_deterministic_parallel`] for CPU-bound
/// work, run on a rayon pool of `options.width()` threads.
pub fn par_map_sorted<T, K, R, F>(
    items: Vec<T>,
    key_fn: impl Fn(&T) -> K,
    worker: F,
    options: ScheduleOptions,
) -> Vec<R>
where
    T: Send,
    K: Ord,
    R: Send,
    F: Fn(T) -> R + Send + Sync,
{
    let sorted = sort_by_key_index(items, key_fn);
    if sorted.is_empty() {
        return Vec::new();
    }
    let width = options.width().min(sorted.len());

    match rayon::ThreadPoolBuilder::new().num_threads(width).build() {
        Ok(pool) => pool.install(|| sorted.into_par_iter().map(&worker).collect()),
        Err(err) => {
            tracing::warn!(%err, "thread pool unavailable, running batch sequentially");
            sorted.into_iter().map(worker).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_default_concurrency_bounds() {
        let n = default_concurrency();
        assert!((1..=MAX_DEFAULT_CONCURRENCY).contains(&n));
        assert_eq!(ScheduleOptions::with_concurrency(0).width(), 1);
        assert_eq!(ScheduleOptions::with_concurrency(3).width(), 3);
    }

    #[test]
    fn test_par_map_sorted_orders_by_key() {
        let items = vec!["zeta", "alpha", "gamma", "beta"];
        let out = par_map_sorted(
            items,
            |s| s.to_string(),
            |s| s.to_uppercase(),
            ScheduleOptions::with_concurrency(4),
        );
        assert_eq!(out, vec!["ALPHA", "BETA", "GAMMA", "ZETA"]);
    }

    #[test]
    fn test_equal_keys_keep_original_order() {
        let items = vec![(1, "first"), (0, "x"), (1, "second")];
        let out = par_map_sorted(items, |(k, _)| *k, |(_, v)| v, ScheduleOptions::default());
        assert_eq!(out, vec!["x", "first", "second"]);
    }

    #[tokio::test]
    async fn test_results_ignore_completion_order() {
        let items = vec!["zeta", "alpha", "gamma", "beta"];
        let delays = |s: &str| match s {
            "alpha" => 40,
            "beta" => 5,
            "gamma" => 20,
            _ => 1,
        };
        let out = run_deterministic_parallel(
            items,
            |s| s.to_string(),
            |s| async move {
                tokio::time::sleep(Duration::from_millis(delays(s))).await;
                s
            },
            ScheduleOptions::with_concurrency(4),
        )
        .await;
        assert_eq!(out, vec!["alpha", "beta", "gamma", "zeta"]);
    }

    #[tokio::test]
    async fn test_width_limits_in_flight_units() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let out = run_deterministic_parallel(
            (0..10u32).collect(),
            |n| *n,
            |n| {
                let in_flight = in_flight.clone();
                let peak = peak.clone();
                async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(2)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    n * 2
                }
            },
            ScheduleOptions::with_concurrency(3),
        )
        .await;

        assert_eq!(out, (0..10u32).map(|n| n * 2).collect::<Vec<_>>());
        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert!(peak.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let out: Vec<u8> = run_deterministic_parallel(
            Vec::<u8>::new(),
            |n| *n,
            |n| async move { n },
            ScheduleOptions::default(),
        )
        .await;
        assert!(out.is_empty());
    }
}
