//! Error type for the convolution engine.

/// Errors raised while configuring or running a convolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvError {
    /// A dimension, factor list, or buffer did not satisfy the contract.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Buffers or transform plans could not be allocated.
    #[error("allocation failed: {0}")]
    Allocation(String),

    /// The mode is unknown, or the workspace has no mode configured.
    #[error("invalid mode: {0}")]
    InvalidMode(String),
}

impl ConvError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

impl From<std::collections::TryReserveError> for ConvError {
    fn from(err: std::collections::TryReserveError) -> Self {
        Self::Allocation(err.to_string())
    }
}
