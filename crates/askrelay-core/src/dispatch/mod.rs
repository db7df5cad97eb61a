//! Retrying dispatch of provider calls.
//!
//! - `Backoff`: attempt index to delay
//! - `Sleeper`: injectable wait, so tests never sleep for real
//! - `Dispatcher`: bounded retry loop with cancellation

pub mod backoff;
pub mod dispatcher;
pub mod sleeper;

pub use backoff::{Backoff, ExponentialBackoff};
pub use dispatcher::{Dispatcher, MAX_ATTEMPTS};
pub use sleeper::{NoopSleeper, Sleeper, TokioSleeper};
