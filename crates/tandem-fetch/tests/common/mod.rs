//! Scripted HTTP client shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll};
use std::time::Duration;

use bytes::Bytes;
use futures_util::Stream;
use tandem_fetch::{BoxStream, FetchError, FetchRequest, HttpClient};

/// How the mock answers one URL.
#[derive(Debug, Clone)]
pub enum Route {
    /// Respond with `body` after `delay`, delivered in `chunks` pieces.
    Body {
        body: String,
        delay: Duration,
        chunks: usize,
    },
    /// Fail with a non-2xx status after `delay`.
    Status { status: u16, delay: Duration },
    /// Deliver the first half of `body`, then break the stream.
    Broken { body: String, delay: Duration },
    /// Panic inside the request.
    Panic,
}

/// Mock HTTP client for testing.
#[derive(Debug, Default)]
pub struct MockClient {
    routes: HashMap<String, Route>,
    open: Arc<AtomicUsize>,
    opened: Arc<AtomicUsize>,
    seen_headers: Arc<std::sync::Mutex<Vec<(String, String)>>>,
}

impl MockClient {
    pub fn new() -> Self { Self::default() }

    pub fn body(mut self, url: &str, body: &str, delay: Duration) -> Self {
        self.routes.insert(
            url.to_string(),
            Route::Body {
                body: body.to_string(),
                delay,
                chunks: 1,
            },
        );
        self
    }

    pub fn chunked(mut self, url: &str, body: &str, delay: Duration, chunks: usize) -> Self {
        self.routes.insert(
            url.to_string(),
            Route::Body {
                body: body.to_string(),
                delay,
                chunks: chunks.max(1),
            },
        );
        self
    }

    pub fn status(mut self, url: &str, status: u16, delay: Duration) -> Self {
        self.routes
            .insert(url.to_string(), Route::Status { status, delay });
        self
    }

    pub fn broken(mut self, url: &str, body: &str, delay: Duration) -> Self {
        self.routes.insert(
            url.to_string(),
            Route::Broken {
                body: body.to_string(),
                delay,
            },
        );
        self
    }

    pub fn panicking(mut self, url: &str) -> Self {
        self.routes.insert(url.to_string(), Route::Panic);
        self
    }

    /// Handle on the number of connections currently held open.
    pub fn open_connections(&self) -> Arc<AtomicUsize> { Arc::clone(&self.open) }

    /// Handle on the number of connections ever opened.
    pub fn opened_connections(&self) -> Arc<AtomicUsize> { Arc::clone(&self.opened) }

    pub fn seen_headers(&self) -> Arc<std::sync::Mutex<Vec<(String, String)>>> {
        Arc::clone(&self.seen_headers)
    }
}

/// Counts as an open connection until dropped.
#[derive(Debug)]
struct Connection {
    open: Arc<AtomicUsize>,
}

impl Connection {
    fn open(open: &Arc<AtomicUsize>, opened: &Arc<AtomicUsize>) -> Self {
        open.fetch_add(1, Ordering::SeqCst);
        opened.fetch_add(1, Ordering::SeqCst);
        Self {
            open: Arc::clone(open),
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) { self.open.fetch_sub(1, Ordering::SeqCst); }
}

/// Body stream that keeps its connection open until the stream is dropped.
struct ConnectionStream {
    inner: BoxStream<'static, Result<Bytes, FetchError>>,
    _connection: Connection,
}

impl Stream for ConnectionStream {
    type Item = Result<Bytes, FetchError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().inner.as_mut().poll_next(cx)
    }
}

fn split(body: &str, pieces: usize) -> Vec<Result<Bytes, FetchError>> {
    let bytes = Bytes::from(body.to_string());
    let step = bytes.len().div_ceil(pieces).max(1);
    (0..bytes.len())
        .step_by(step)
        .map(|start| Ok(bytes.slice(start..(start + step).min(bytes.len()))))
        .collect()
}

impl HttpClient for MockClient {
    type Error = FetchError;

    fn stream(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> impl std::future::Future<
        Output = Result<BoxStream<'static, Result<Bytes, Self::Error>>, Self::Error>,
    > + Send {
        let route = self.routes.get(url).cloned();
        let url = url.to_string();
        let open = Arc::clone(&self.open);
        let opened = Arc::clone(&self.opened);
        self.seen_headers
            .lock()
            .unwrap()
            .extend(headers.iter().cloned());

        async move {
            let connection = Connection::open(&open, &opened);
            let Some(route) = route else {
                return Err(FetchError::Transport(format!("connection refused: {url}")));
            };

            let chunks = match route {
                Route::Body {
                    body,
                    delay,
                    chunks,
                } => {
                    tokio::time::sleep(delay).await;
                    split(&body, chunks)
                }
                Route::Status { status, delay } => {
                    tokio::time::sleep(delay).await;
                    return Err(FetchError::Status { url, status });
                }
                Route::Broken { body, delay } => {
                    tokio::time::sleep(delay).await;
                    let half = body.len() / 2;
                    vec![
                        Ok(Bytes::from(body[..half].to_string())),
                        Err(FetchError::Transport("connection reset".to_string())),
                    ]
                }
                Route::Panic => panic!("mock transport panicked for {url}"),
            };

            let stream: BoxStream<'static, Result<Bytes, FetchError>> = Box::pin(ConnectionStream {
                inner: Box::pin(futures_util::stream::iter(chunks)),
                _connection: connection,
            });
            Ok(stream)
        }
    }
}

pub fn requests(urls: &[&str]) -> Vec<FetchRequest> {
    FetchRequest::many(urls.iter().copied()).unwrap()
}

pub fn ms(millis: u64) -> Duration { Duration::from_millis(millis) }
