//! Error handling and exit codes.

use fftconv_core::ConvError;

/// Process exit codes.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Generic error.
    pub const ERROR_GENERIC: i32 = 1;
    /// An FFT result differed from the direct reference beyond tolerance.
    pub const ERROR_MISMATCH: i32 = 3;
    /// Invalid configuration.
    pub const ERROR_CONFIG: i32 = 4;
}

/// Failures of a conformance run.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("{failed} of {total} mode(s) exceeded tolerance {tolerance:e}")]
    Mismatch {
        failed: usize,
        total: usize,
        tolerance: f64,
    },
    #[error("{mode} failed: {message}")]
    Engine { mode: String, message: String },
}

/// Exit code for an engine error.
#[must_use]
pub fn handle_error(err: &ConvError) -> i32 {
    match err {
        ConvError::InvalidArgument(_) | ConvError::InvalidMode(_) => exit_codes::ERROR_CONFIG,
        ConvError::Allocation(_) => exit_codes::ERROR_GENERIC,
    }
}

/// Exit code for whatever error ended the run.
#[must_use]
pub fn exit_code(err: &anyhow::Error) -> i32 {
    if let Some(check) = err.downcast_ref::<CheckError>() {
        return match check {
            CheckError::Config(_) => exit_codes::ERROR_CONFIG,
            CheckError::Mismatch { .. } => exit_codes::ERROR_MISMATCH,
            CheckError::Engine { .. } => exit_codes::ERROR_GENERIC,
        };
    }
    err.downcast_ref::<ConvError>()
        .map_or(exit_codes::ERROR_GENERIC, handle_error)
}
