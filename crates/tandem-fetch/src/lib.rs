//! Concurrent HTTP fan-out, cancellable fetches and paced value streams.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Immutable requests, results and options
//! - [`core`] - Pure transformations
//! - [`effects`] - I/O operations with trait abstraction
//!
//! # Components
//!
//! - [`Fetcher`]: one GET, full body or the empty marker; transport errors are
//!   logged, never propagated
//! - [`ParallelFetcher`]: one task per target, wait for all, results in input order
//! - [`CancellableFetcher`]: `Idle → InFlight → Completed | Cancelled`, raced
//!   against a [`CancellationSignal`]
//! - [`PacedSequence`]: `0..N` with a fixed wait before each value, pulled on demand

pub mod core;
pub mod data;
pub mod effects;
mod error;

pub use crate::core::{ResultSlots, decode_body, is_success};
pub use data::{
    FetchOptions, FetchOutcome, FetchPhase, FetchRequest, FetchResult, PacedOptions,
    ParallelOptions, PhaseObserver,
};
pub use effects::{
    BoxStream, CancellableFetcher, CancellationSignal, DeadlineTimer, Fetcher, HttpClient,
    PacedSequence, Pacer, ParallelFetcher, TokioPacer, paced,
};

#[cfg(feature = "reqwest")]
pub use effects::{ClientSettings, ReqwestClient};

pub use error::{FetchError, Result};
