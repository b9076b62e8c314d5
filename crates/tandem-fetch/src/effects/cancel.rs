//! Cooperative cancellation for single fetches.
//!
//! A [`CancellationSignal`] is a cloneable flag with wake-up notification. One
//! side fires it (directly or through a deadline armed with
//! [`CancellationSignal::cancel_after`]); the fetch observes it at its
//! checkpoints. [`CancellableFetcher`] drives one request through the
//! `Idle → InFlight → Completed | Cancelled` state machine.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};
use tracing::debug;

use crate::data::{FetchOutcome, FetchPhase, FetchRequest};
use crate::effects::fetcher::Fetcher;
use crate::effects::http::HttpClient;

/// Shared, externally triggerable cancellation flag.
///
/// Clones observe the same flag. Firing is idempotent.
#[derive(Debug, Clone, Default)]
pub struct CancellationSignal {
    token: CancellationToken,
}

impl CancellationSignal {
    pub fn new() -> Self { Self::default() }

    /// Fire the signal. Later calls are no-ops.
    pub fn cancel(&self) { self.token.cancel(); }

    pub fn is_cancelled(&self) -> bool { self.token.is_cancelled() }

    /// Resolves once the signal has fired.
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> { self.token.cancelled() }

    /// Arm a deadline that fires the signal after `delay`.
    ///
    /// The timer runs as a task on the current Tokio runtime and is aborted
    /// when the returned [`DeadlineTimer`] is dropped, so a fetch that finished
    /// early leaves no pending timer behind.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use = "dropping the DeadlineTimer disarms the deadline"]
    pub fn cancel_after(&self, delay: Duration) -> DeadlineTimer {
        let token = self.token.clone();
        let handle = tokio::spawn(async move {
            tokio::select! {
                () = tokio::time::sleep(delay) => {
                    debug!(?delay, "deadline elapsed");
                    token.cancel();
                }
                () = token.cancelled() => {}
            }
        });
        DeadlineTimer { handle }
    }
}

/// Handle to a deadline armed by [`CancellationSignal::cancel_after`].
#[derive(Debug)]
pub struct DeadlineTimer {
    handle: JoinHandle<()>,
}

impl DeadlineTimer {
    /// Returns `true` once the timer task has fired or been disarmed.
    pub fn is_finished(&self) -> bool { self.handle.is_finished() }

    /// Disarm the deadline without firing the signal.
    pub fn disarm(self) {}
}

impl Drop for DeadlineTimer {
    fn drop(&mut self) { self.handle.abort(); }
}

/// One cancellable fetch of a single request.
///
/// The fetch is not restartable: running it again after it reached a terminal
/// phase returns the recorded outcome without touching the network.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use tandem_fetch::{CancellableFetcher, CancellationSignal, FetchRequest, Fetcher, ReqwestClient};
///
/// # async fn demo() -> Result<(), tandem_fetch::FetchError> {
/// let fetcher = Fetcher::new(ReqwestClient::new()?);
/// let signal = CancellationSignal::new();
/// let _deadline = signal.cancel_after(Duration::from_millis(500));
///
/// let request = FetchRequest::new("https://example.com/slow")?;
/// let mut fetch = CancellableFetcher::new(&fetcher, request, signal);
/// if fetch.run().await.is_cancelled() {
///     println!("Task was canceled.");
/// }
/// # Ok(())
/// # }
/// ```
pub struct CancellableFetcher<'a, C: HttpClient> {
    fetcher: &'a Fetcher<C>,
    request: FetchRequest,
    signal: CancellationSignal,
    phase: FetchPhase,
    outcome: Option<FetchOutcome>,
}

impl<'a, C: HttpClient> CancellableFetcher<'a, C> {
    pub fn new(fetcher: &'a Fetcher<C>, request: FetchRequest, signal: CancellationSignal) -> Self {
        Self {
            fetcher,
            request,
            signal,
            phase: FetchPhase::Idle,
            outcome: None,
        }
    }

    pub fn phase(&self) -> FetchPhase { self.phase }

    pub fn request(&self) -> &FetchRequest { &self.request }

    /// Drive the fetch to a terminal phase.
    ///
    /// If an earlier `run` future was dropped while in flight, that attempt
    /// counts as cancelled and the request is not sent again.
    pub async fn run(&mut self) -> FetchOutcome {
        if let Some(ref outcome) = self.outcome {
            return outcome.clone();
        }

        if self.phase == FetchPhase::InFlight {
            debug!(url = self.request.url(), "previous run abandoned in flight");
            self.advance(FetchPhase::Cancelled);
            self.outcome = Some(FetchOutcome::Cancelled);
            return FetchOutcome::Cancelled;
        }

        self.advance(FetchPhase::InFlight);
        let outcome = self
            .fetcher
            .fetch_with_signal(&self.request, &self.signal)
            .await;

        self.advance(match outcome {
            FetchOutcome::Completed(_) => FetchPhase::Completed,
            FetchOutcome::Cancelled => FetchPhase::Cancelled,
        });
        self.outcome = Some(outcome.clone());
        outcome
    }

    fn advance(&mut self, next: FetchPhase) {
        if !self.phase.can_advance_to(next) {
            return;
        }
        debug!(url = self.request.url(), from = %self.phase, to = %next, "fetch phase");
        self.phase = next;
        self.fetcher.options().notify_phase(next);
    }
}

impl<C: HttpClient> Fetcher<C> {
    /// Start a cancellable fetch of `request` observing `signal`.
    pub fn cancellable(&self, request: FetchRequest, signal: CancellationSignal) -> CancellableFetcher<'_, C> {
        CancellableFetcher::new(self, request, signal)
    }
}
