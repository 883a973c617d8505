/*!
 * Process-wide concurrency bound for LLM work.
 *
 * A single `ConcurrencyGate` is created per process and cloned into every
 * component that issues LLM calls, so concurrent batches share one cap.
 * `map_ordered` runs a closure over many items under the gate and returns
 * the results in input order regardless of completion order.
 */

use futures::stream::{self, StreamExt};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Default number of simultaneous in-flight operations
pub const DEFAULT_MAX_IN_FLIGHT: usize = 100;

/// Shared semaphore bounding in-flight operations
#[derive(Debug, Clone)]
pub struct ConcurrencyGate {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

impl Default for ConcurrencyGate {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_IN_FLIGHT)
    }
}

impl ConcurrencyGate {
    /// Create a gate admitting `capacity` operations at once (at least 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Configured capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits currently free
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Run a future while holding one permit
    pub async fn run<F: Future>(&self, future: F) -> F::Output {
        // The semaphore is never closed, so acquire only fails if that changes
        let _permit = self.semaphore.acquire().await.ok();
        future.await
    }

    /// Apply `f` to every item under the gate and return results in input order
    pub async fn map_ordered<I, T, R, F, Fut>(&self, items: I, f: F) -> Vec<R>
    where
        I: IntoIterator<Item = T>,
        F: Fn(usize, T) -> Fut,
        Fut: Future<Output = R>,
    {
        let mut results: Vec<(usize, R)> = stream::iter(items.into_iter().enumerate())
            .map(|(index, item)| {
                let future = f(index, item);
                async move { (index, self.run(future).await) }
            })
            .buffer_unordered(self.capacity)
            .collect()
            .await;

        // Restore the original order
        results.sort_by_key(|(index, _)| *index);
        results.into_iter().map(|(_, result)| result).collect()
    }
}
