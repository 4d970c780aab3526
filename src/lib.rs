//! Root test package for the fftconv workspace.
//!
//! Holds no code of its own; the integration tests under `tests/` exercise
//! the workspace crates together.
