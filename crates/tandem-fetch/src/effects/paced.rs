//! Time-paced value streams.
//!
//! [`PacedSequence`] yields `0..count`, waiting a fixed interval before each
//! value. The wait only starts when the consumer polls, so nothing is
//! produced ahead of demand, and the pending wait lives inside the stream:
//! dropping the stream drops the timer with it.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll, ready};
use std::time::Duration;

use futures_util::Stream;
use futures_util::stream::FusedStream;

use crate::data::PacedOptions;

/// Abstracts over how a paced stream waits for a given [`Duration`].
///
/// This keeps [`PacedSequence`] independent of the timer so tests can count
/// outstanding waits.
pub trait Pacer {
    /// Future returned by [`Pacer::delay`].
    type Delay: Future<Output = ()> + Send;

    fn delay(&self, duration: Duration) -> Self::Delay;
}

/// [`Pacer`] backed by Tokio's timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

impl Pacer for TokioPacer {
    type Delay = tokio::time::Sleep;

    fn delay(&self, duration: Duration) -> Self::Delay { tokio::time::sleep(duration) }
}

/// A lazy, finite, non-restartable stream of `0..count`.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use futures_util::StreamExt;
/// use tandem_fetch::{PacedOptions, paced};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let options = PacedOptions::default().count(3).interval(Duration::from_millis(1));
/// let values: Vec<u32> = paced(options).collect().await;
/// assert_eq!(values, vec![0, 1, 2]);
/// # }
/// ```
pub struct PacedSequence<P: Pacer> {
    pacer: P,
    options: PacedOptions,
    cursor: u32,
    pending: Option<Pin<Box<P::Delay>>>,
}

impl<P: Pacer> PacedSequence<P> {
    pub fn new(pacer: P, options: PacedOptions) -> Self {
        Self {
            pacer,
            options,
            cursor: 0,
            pending: None,
        }
    }

    /// Number of values not yet yielded.
    pub fn remaining(&self) -> u32 { self.options.count.saturating_sub(self.cursor) }

    /// Returns `true` while a wait for the next value is armed.
    pub fn is_waiting(&self) -> bool { self.pending.is_some() }
}

/// Paced sequence on the Tokio timer.
pub fn paced(options: PacedOptions) -> PacedSequence<TokioPacer> { PacedSequence::new(TokioPacer, options) }

impl<P: Pacer + Unpin> Stream for PacedSequence<P> {
    type Item = u32;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if this.cursor >= this.options.count {
            this.pending = None;
            return Poll::Ready(None);
        }

        let interval = this.options.interval;
        let pacer = &this.pacer;
        let delay = this
            .pending
            .get_or_insert_with(|| Box::pin(pacer.delay(interval)));
        ready!(delay.as_mut().poll(cx));

        this.pending = None;
        let value = this.cursor;
        this.cursor += 1;
        Poll::Ready(Some(value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining() as usize;
        (remaining, Some(remaining))
    }
}

impl<P: Pacer + Unpin> FusedStream for PacedSequence<P> {
    fn is_terminated(&self) -> bool { self.cursor >= self.options.count }
}
