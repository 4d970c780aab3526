//! Library half of the `fftconv` binary, exposed for integration tests.

pub mod app;
pub mod check;
pub mod config;
pub mod errors;
pub mod report;
