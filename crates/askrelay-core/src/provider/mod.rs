//! Provider-call abstractions.
//!
//! - `ProviderCall`: RPITIT trait implemented by concrete provider clients
//! - `BoxProviderCall`: object-safe wrapper for runtime provider selection

pub mod box_call;
pub mod call;

pub use box_call::BoxProviderCall;
pub use call::ProviderCall;
