use bytes::BytesMut;
use futures_util::StreamExt;
use tracing::{debug, warn};

use crate::core::decode_body;
use crate::data::{FetchOptions, FetchOutcome, FetchRequest, FetchResult};
use crate::effects::cancel::CancellationSignal;
use crate::effects::http::HttpClient;
use crate::error::{FetchError, Result};

/// Fetches one target at a time over an [`HttpClient`].
///
/// Transport failures never escape [`Fetcher::fetch`]: they are logged and
/// turned into [`FetchResult::Empty`]. Use [`Fetcher::try_fetch`] when the
/// error itself is needed.
pub struct Fetcher<C: HttpClient> {
    pub(crate) client: C,
    options: FetchOptions,
}

impl<C: HttpClient> Fetcher<C> {
    /// Create a new fetcher with the provided HTTP client and default options.
    pub fn new(client: C) -> Self {
        Self {
            client,
            options: FetchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &FetchOptions { &self.options }

    /// Fetch `request` and return the full body, or the empty marker on any
    /// transport error.
    pub async fn fetch(&self, request: &FetchRequest) -> FetchResult {
        match self.try_fetch(request).await {
            Ok(body) => FetchResult::Body(body),
            Err(e) => {
                warn!(url = request.url(), "request error: {}", e);
                FetchResult::Empty
            }
        }
    }

    /// Fetch `request` unless `signal` fires first.
    ///
    /// The signal is checked before any I/O starts and then raced against the
    /// transport. When both are ready at the same time the signal wins. A
    /// cancelled fetch drops its in-flight request, which releases the
    /// connection and discards any bytes already read.
    pub async fn fetch_with_signal(
        &self,
        request: &FetchRequest,
        signal: &CancellationSignal,
    ) -> FetchOutcome {
        if signal.is_cancelled() {
            debug!(url = request.url(), "cancelled before start");
            return FetchOutcome::Cancelled;
        }

        tokio::select! {
            biased;
            () = signal.cancelled() => {
                debug!(url = request.url(), "cancelled in flight");
                FetchOutcome::Cancelled
            }
            result = self.fetch(request) => FetchOutcome::Completed(result),
        }
    }

    /// Fetch `request`, returning the transport error instead of logging it.
    pub async fn try_fetch(&self, request: &FetchRequest) -> Result<String> {
        let read = self.read_body(request);
        match self.options.timeout {
            Some(limit) => tokio::time::timeout(limit, read)
                .await
                .map_err(|_| FetchError::Timeout(limit))?,
            None => read.await,
        }
    }

    /// Read the whole body before decoding it, so a stream that breaks midway
    /// never produces a truncated string.
    async fn read_body(&self, request: &FetchRequest) -> Result<String> {
        debug!(url = request.url(), "fetching");
        let mut stream = self
            .client
            .stream(request.url(), &self.options.headers)
            .await
            .map_err(Into::<FetchError>::into)?;

        let mut body = BytesMut::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(Into::<FetchError>::into)?;
            body.extend_from_slice(&chunk);
        }

        Ok(decode_body(&body))
    }
}
