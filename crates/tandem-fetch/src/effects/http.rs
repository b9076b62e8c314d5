use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;

use crate::error::FetchError;

/// A boxed stream type for HTTP response bodies.
///
/// The stream yields `Result<Bytes, E>` where E is the error type from the HTTP client.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// Asynchronous HTTP client abstraction.
///
/// This trait provides the minimal interface needed for fetching operations.
/// Implementations handle their own redirect following, TLS and timeout
/// configuration, and map their failures into [`FetchError`].
///
/// # Implementations
///
/// - [`ReqwestClient`]: Production implementation using `reqwest`
/// - Mock implementations for testing
pub trait HttpClient: Send + Sync {
    /// Error type for HTTP operations.
    type Error: Into<FetchError> + Send + 'static;

    /// Issue a GET request and return the response body as a stream.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to fetch
    /// * `headers` - Custom headers to include with the request
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails (DNS failure, connection error,
    /// non-2xx status). Errors while reading the body are yielded by the
    /// stream itself.
    fn stream(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> impl Future<Output = Result<BoxStream<'static, Result<Bytes, Self::Error>>, Self::Error>>
           + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use std::time::Duration;

    use futures_util::StreamExt;
    use tracing::debug;

    use super::*;
    use crate::core::is_success;

    /// Settings applied when building a [`ReqwestClient`].
    #[derive(Debug, Clone, Default)]
    pub struct ClientSettings {
        /// Timeout for establishing the TCP/TLS connection.
        pub connect_timeout: Option<Duration>,
        /// Value of the `User-Agent` header.
        pub user_agent: Option<String>,
    }

    impl ClientSettings {
        #[must_use]
        pub fn connect_timeout(mut self, timeout: Duration) -> Self {
            self.connect_timeout = Some(timeout);
            self
        }

        #[must_use]
        pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
            self.user_agent = Some(user_agent.into());
            self
        }

        pub fn build(self) -> Result<ReqwestClient, FetchError> {
            // No idle pool: each fetch opens its own connection and the
            // connection closes once the response is dropped.
            let mut builder = reqwest::Client::builder().pool_max_idle_per_host(0);
            if let Some(timeout) = self.connect_timeout {
                builder = builder.connect_timeout(timeout);
            }
            if let Some(user_agent) = self.user_agent {
                builder = builder.user_agent(user_agent);
            }
            Ok(ReqwestClient {
                client: builder.build()?,
            })
        }
    }

    /// Production HTTP client implementation using reqwest.
    pub struct ReqwestClient {
        client: reqwest::Client,
    }

    impl ReqwestClient {
        /// Create a new ReqwestClient with default settings.
        pub fn new() -> Result<Self, FetchError> { ClientSettings::default().build() }
    }

    impl HttpClient for ReqwestClient {
        type Error = FetchError;

        async fn stream(
            &self,
            url: &str,
            headers: &[(String, String)],
        ) -> Result<BoxStream<'static, Result<Bytes, Self::Error>>, Self::Error> {
            let mut request = self.client.get(url);

            for (key, value) in headers {
                request = request.header(key, value);
            }

            let response = request.send().await?;
            let status = response.status().as_u16();
            debug!("http get status={} url={}", status, url);
            if !is_success(status) {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status,
                });
            }

            let stream = response
                .bytes_stream()
                .map(|chunk| chunk.map_err(FetchError::from));

            Ok(Box::pin(stream))
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::{ClientSettings, ReqwestClient};
