//! Immutable data types for fetch operations.
//!
//! Requests, results and the option structs live here. Nothing in this module
//! performs I/O; the types are passed by value or shared through `Arc` between
//! the effectful components in [`crate::effects`].

pub mod options;
pub mod request;

pub use options::{FetchOptions, FetchPhase, PacedOptions, ParallelOptions, PhaseObserver};
pub use request::{FetchOutcome, FetchRequest, FetchResult};
