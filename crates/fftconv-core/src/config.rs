//! Serializable convolution configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConvError;
use crate::factor::FactorSet;
use crate::mode::Mode;
use crate::shape::Dims;

/// Everything needed to configure a [`Workspace`](crate::Workspace).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvolutionConfig {
    pub mode: Mode,
    pub source: Dims,
    pub kernel: Dims,
    /// Factors for optimal modes; defaults to `7,6,5,4,3,2`.
    #[serde(default)]
    pub factors: FactorSet,
}

impl ConvolutionConfig {
    #[must_use]
    pub fn new(mode: Mode, source: Dims, kernel: Dims) -> Self {
        Self {
            mode,
            source,
            kernel,
            factors: FactorSet::default(),
        }
    }

    /// Replace the factor set used for optimal modes.
    #[must_use]
    pub fn with_factors(mut self, factors: FactorSet) -> Self {
        self.factors = factors;
        self
    }

    /// Check dimensions and report the transform size they lead to.
    pub fn validate(&self) -> Result<(usize, usize), ConvError> {
        self.mode
            .transform_size(self.source, self.kernel, &self.factors)
    }
}
