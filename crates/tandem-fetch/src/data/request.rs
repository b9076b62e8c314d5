use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{FetchError, Result};

/// A single fetch target.
///
/// The URL is validated only for being non-blank; scheme and host problems
/// surface later as transport errors, the same way the HTTP client reports
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchRequest {
    url: Arc<str>,
}

impl FetchRequest {
    /// Create a request for `url`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tandem_fetch::FetchRequest;
    ///
    /// let request = FetchRequest::new("https://example.com/posts/1").unwrap();
    /// assert_eq!(request.url(), "https://example.com/posts/1");
    /// assert!(FetchRequest::new("   ").is_err());
    /// ```
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return Err(FetchError::InvalidUrl(url));
        }
        Ok(Self {
            url: Arc::from(trimmed),
        })
    }

    /// Build one request per URL, failing on the first blank entry.
    pub fn many<I, S>(urls: I) -> Result<Vec<Self>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        urls.into_iter().map(Self::new).collect()
    }

    pub fn url(&self) -> &str { &self.url }
}

impl FromStr for FetchRequest {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self> { Self::new(s) }
}

impl fmt::Display for FetchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.url) }
}

/// Result of one fetch attempt: the full body or the empty marker.
///
/// There is no partial state. A body that failed to arrive completely is
/// reported as [`FetchResult::Empty`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    Body(String),
    Empty,
}

impl FetchResult {
    pub fn is_empty(&self) -> bool { matches!(self, FetchResult::Empty) }

    pub fn body(&self) -> Option<&str> {
        match self {
            FetchResult::Body(body) => Some(body),
            FetchResult::Empty => None,
        }
    }

    pub fn into_body(self) -> Option<String> {
        match self {
            FetchResult::Body(body) => Some(body),
            FetchResult::Empty => None,
        }
    }

    /// The body text, or `""` for the empty marker.
    pub fn as_text(&self) -> &str { self.body().unwrap_or_default() }
}

impl fmt::Display for FetchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_text()) }
}

/// Terminal outcome of a fetch that can be cancelled.
///
/// `Cancelled` is kept apart from `Completed(FetchResult::Empty)` so callers
/// can tell a deadline from a network failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Completed(FetchResult),
    Cancelled,
}

impl FetchOutcome {
    pub fn is_cancelled(&self) -> bool { matches!(self, FetchOutcome::Cancelled) }

    pub fn completed(self) -> Option<FetchResult> {
        match self {
            FetchOutcome::Completed(result) => Some(result),
            FetchOutcome::Cancelled => None,
        }
    }

    /// Convert into a `Result`, mapping cancellation to [`FetchError::Cancelled`].
    pub fn into_result(self) -> Result<FetchResult> {
        match self {
            FetchOutcome::Completed(result) => Ok(result),
            FetchOutcome::Cancelled => Err(FetchError::Cancelled),
        }
    }
}
