//! I/O operations for fetching and pacing.
//!
//! Everything that touches the network, spawns tasks or waits on the clock
//! lives here, behind the [`HttpClient`] and [`Pacer`] seams.

mod cancel;
mod fetcher;
mod http;
mod paced;
mod parallel;

pub use cancel::{CancellableFetcher, CancellationSignal, DeadlineTimer};
pub use fetcher::Fetcher;
pub use http::{BoxStream, HttpClient};
pub use paced::{PacedSequence, Pacer, TokioPacer, paced};
pub use parallel::ParallelFetcher;

#[cfg(feature = "reqwest")]
pub use http::{ClientSettings, ReqwestClient};
