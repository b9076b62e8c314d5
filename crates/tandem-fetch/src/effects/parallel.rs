//! Fan-out fetching.
//!
//! This module launches one task per target, waits for all of them and hands
//! the results back in input order.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::core::ResultSlots;
use crate::data::{FetchRequest, FetchResult, ParallelOptions};
use crate::effects::{Fetcher, HttpClient};

/// Fetches many targets concurrently.
///
/// The join policy is "wait for all": a failing target yields
/// [`FetchResult::Empty`] in its own slot and never cancels its siblings.
pub struct ParallelFetcher<C: HttpClient> {
    fetcher: Arc<Fetcher<C>>,
    options: ParallelOptions,
}

impl<C: HttpClient + 'static> ParallelFetcher<C> {
    /// Create a new parallel fetcher. Accepts an owned or already shared
    /// [`Fetcher`].
    pub fn new(fetcher: impl Into<Arc<Fetcher<C>>>) -> Self {
        Self {
            fetcher: fetcher.into(),
            options: ParallelOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ParallelOptions) -> Self {
        self.options = options;
        self
    }

    pub fn fetcher(&self) -> &Arc<Fetcher<C>> { &self.fetcher }

    /// Fetch every request concurrently and return the results in input order.
    ///
    /// The output always has the same length as `requests`; index `i` of the
    /// output belongs to index `i` of the input, whatever order the fetches
    /// finish in. Dropping the returned future aborts the fetches still
    /// running. A panic inside a fetch is resumed on the caller.
    pub async fn fetch_all(&self, requests: &[FetchRequest]) -> Vec<FetchResult> {
        if requests.is_empty() {
            return Vec::new();
        }

        let limiter = self
            .options
            .max_concurrent
            .map(|limit| Arc::new(Semaphore::new(limit.max(1))));
        let mut tasks = JoinSet::new();

        for (index, request) in requests.iter().cloned().enumerate() {
            let fetcher = Arc::clone(&self.fetcher);
            let limiter = limiter.clone();

            tasks.spawn(async move {
                let _permit = match limiter {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };
                (index, fetcher.fetch(&request).await)
            });
        }

        let mut slots = ResultSlots::new(requests.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => {
                    slots.fill(index, result);
                }
                Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                Err(e) => warn!("fetch task ended without a result: {}", e),
            }
        }

        let missing = slots.len() - slots.filled();
        if missing > 0 {
            warn!(missing, "fan-out slots left without a result");
        }

        let results = slots.into_results();
        info!(
            targets = results.len(),
            succeeded = results.iter().filter(|r| !r.is_empty()).count(),
            "fan-out complete"
        );
        results
    }
}
