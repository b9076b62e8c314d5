//! Pure helpers for fetching.
//!
//! Nothing here touches the network or the clock: status classification,
//! body decoding and the index-ordered assembly of fan-out results.

mod body;
mod slots;
mod validation;

pub use body::decode_body;
pub use slots::ResultSlots;
pub use validation::is_success;
