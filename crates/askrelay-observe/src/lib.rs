//! Observability setup for askrelay.

pub mod tracing_setup;
