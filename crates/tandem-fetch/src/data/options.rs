use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Phases of a cancellable fetch.
///
/// A fetch moves through these phases in order:
/// Idle → InFlight → Completed | Cancelled
///
/// `Completed` and `Cancelled` are terminal. Whichever of "transport finished"
/// and "signal fired" is observed first decides which one is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    /// Created, no I/O started yet.
    #[default]
    Idle,

    /// The request has been issued and the body is being read.
    InFlight,

    /// The transport returned, either with a body or the empty marker.
    Completed,

    /// The cancellation signal was observed before the transport returned.
    Cancelled,
}

impl FetchPhase {
    pub fn is_terminal(self) -> bool { matches!(self, FetchPhase::Completed | FetchPhase::Cancelled) }

    /// Returns `true` if `next` is a legal successor of `self`.
    pub fn can_advance_to(self, next: FetchPhase) -> bool {
        matches!(
            (self, next),
            (FetchPhase::Idle, FetchPhase::InFlight)
                | (FetchPhase::InFlight, FetchPhase::Completed)
                | (FetchPhase::InFlight, FetchPhase::Cancelled)
        )
    }
}

impl fmt::Display for FetchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchPhase::Idle => write!(f, "Idle"),
            FetchPhase::InFlight => write!(f, "InFlight"),
            FetchPhase::Completed => write!(f, "Completed"),
            FetchPhase::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// Callback invoked on every phase transition of a cancellable fetch.
pub type PhaseObserver = Arc<dyn Fn(FetchPhase) + Send + Sync>;

/// Configuration for single fetches.
///
/// # Examples
///
/// ```
/// use tandem_fetch::FetchOptions;
/// use std::time::Duration;
///
/// let options = FetchOptions::default()
///     .timeout(Duration::from_secs(10))
///     .header("Accept", "application/json");
/// assert_eq!(options.headers.len(), 1);
/// ```
#[derive(Clone)]
pub struct FetchOptions {
    /// Custom HTTP headers sent with every request.
    ///
    /// Default: empty
    pub headers: Arc<[(String, String)]>,

    /// Upper bound on a whole fetch, connection through last body byte.
    ///
    /// Elapsing is treated like any other transport error: the fetch yields
    /// the empty marker. Default: None (no limit beyond the client's own)
    pub timeout: Option<Duration>,

    /// Observer for phase transitions of cancellable fetches.
    ///
    /// Default: None
    pub on_phase: Option<PhaseObserver>,
}

impl fmt::Debug for FetchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchOptions")
            .field("headers", &self.headers)
            .field("timeout", &self.timeout)
            .field("on_phase", &self.on_phase.as_ref().map(|_| "{ ... }"))
            .finish()
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            headers: Arc::new([]),
            timeout: None,
            on_phase: None,
        }
    }
}

impl FetchOptions {
    /// Add a single custom HTTP header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut headers: Vec<_> = self.headers.iter().cloned().collect();
        headers.push((key.into(), value.into()));
        self.headers = Arc::from(headers);
        self
    }

    /// Replace all custom headers.
    #[must_use]
    pub fn headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = Arc::from(headers);
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the phase observer.
    ///
    /// # Examples
    ///
    /// ```
    /// use tandem_fetch::{FetchOptions, FetchPhase};
    /// use std::sync::Arc;
    ///
    /// let options = FetchOptions::default().on_phase(Arc::new(|phase| {
    ///     if phase == FetchPhase::Cancelled {
    ///         eprintln!("deadline hit");
    ///     }
    /// }));
    /// assert!(options.on_phase.is_some());
    /// ```
    #[must_use]
    pub fn on_phase(mut self, on_phase: PhaseObserver) -> Self {
        self.on_phase = Some(on_phase);
        self
    }

    pub(crate) fn notify_phase(&self, phase: FetchPhase) {
        if let Some(ref observer) = self.on_phase {
            observer(phase);
        }
    }
}

/// Configuration for fan-out fetches.
#[derive(Debug, Clone, Default)]
pub struct ParallelOptions {
    /// Maximum number of fetches in flight at once.
    ///
    /// `None` launches every target immediately. Values of zero are treated
    /// as one. Default: None
    pub max_concurrent: Option<usize>,
}

impl ParallelOptions {
    #[must_use]
    pub fn max_concurrent(mut self, limit: usize) -> Self {
        self.max_concurrent = Some(limit.max(1));
        self
    }

    #[must_use]
    pub fn unbounded(mut self) -> Self {
        self.max_concurrent = None;
        self
    }
}

/// Configuration for paced sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacedOptions {
    /// Number of values produced, `0..count`.
    ///
    /// Default: 10
    pub count: u32,

    /// Delay inserted before each value.
    ///
    /// Default: 1s
    pub interval: Duration,
}

impl Default for PacedOptions {
    fn default() -> Self {
        Self {
            count: 10,
            interval: Duration::from_secs(1),
        }
    }
}

impl PacedOptions {
    #[must_use]
    pub fn count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    #[must_use]
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_phase_transitions() {
        assert!(FetchPhase::Idle.can_advance_to(FetchPhase::InFlight));
        assert!(FetchPhase::InFlight.can_advance_to(FetchPhase::Completed));
        assert!(FetchPhase::InFlight.can_advance_to(FetchPhase::Cancelled));

        assert!(!FetchPhase::Idle.can_advance_to(FetchPhase::Completed));
        assert!(!FetchPhase::Completed.can_advance_to(FetchPhase::Cancelled));
        assert!(!FetchPhase::Cancelled.can_advance_to(FetchPhase::Completed));
        assert!(!FetchPhase::Cancelled.can_advance_to(FetchPhase::InFlight));
    }

    #[test]
    fn test_phase_terminal() {
        assert!(!FetchPhase::Idle.is_terminal());
        assert!(!FetchPhase::InFlight.is_terminal());
        assert!(FetchPhase::Completed.is_terminal());
        assert!(FetchPhase::Cancelled.is_terminal());
        assert_eq!(FetchPhase::default(), FetchPhase::Idle);
        assert_eq!(FetchPhase::InFlight.to_string(), "InFlight");
    }

    #[test]
    fn test_fetch_options_builders() {
        let options = FetchOptions::default()
            .header("Accept", "text/plain")
            .header("User-Agent", "tandem")
            .timeout(Duration::from_millis(250));

        assert_eq!(options.headers.len(), 2);
        assert_eq!(options.headers[1].0, "User-Agent");
        assert_eq!(options.timeout, Some(Duration::from_millis(250)));

        let replaced = options.headers(vec![("X-Only".into(), "1".into())]);
        assert_eq!(replaced.headers.len(), 1);
    }

    #[test]
    fn test_notify_phase_reaches_observer() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let options =
            FetchOptions::default().on_phase(Arc::new(move |phase| sink.lock().unwrap().push(phase)));

        options.notify_phase(FetchPhase::InFlight);
        options.notify_phase(FetchPhase::Completed);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![FetchPhase::InFlight, FetchPhase::Completed]
        );
        assert!(format!("{options:?}").contains("on_phase"));
    }

    #[test]
    fn test_parallel_options() {
        assert_eq!(ParallelOptions::default().max_concurrent, None);
        assert_eq!(ParallelOptions::default().max_concurrent(0).max_concurrent, Some(1));
        assert_eq!(
            ParallelOptions::default().max_concurrent(4).unbounded().max_concurrent,
            None
        );
    }

    #[test]
    fn test_paced_options_default() {
        let options = PacedOptions::default();
        assert_eq!(options.count, 10);
        assert_eq!(options.interval, Duration::from_secs(1));

        let custom = options.count(3).interval(Duration::from_millis(5));
        assert_eq!(custom.count, 3);
        assert_eq!(custom.interval, Duration::from_millis(5));
    }
}
