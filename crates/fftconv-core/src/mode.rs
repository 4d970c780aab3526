//! Convolution modes and the transform size each one needs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConvError;
use crate::factor::FactorSet;
use crate::shape::Dims;

/// Boundary handling and transform sizing of a convolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Zero boundary, smallest transform that avoids aliasing.
    Linear,
    /// Zero boundary, transform rounded up to a factorable size.
    LinearOptimal,
    /// Periodic boundary, transform of `source + kernel`.
    Circular,
    /// Periodic boundary, transform rounded up to a factorable size.
    CircularOptimal,
}

impl Mode {
    /// Every mode, in declaration order.
    pub const ALL: [Mode; 4] = [
        Mode::Linear,
        Mode::LinearOptimal,
        Mode::Circular,
        Mode::CircularOptimal,
    ];

    /// Canonical lowercase name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Mode::Linear => "linear",
            Mode::LinearOptimal => "linear-optimal",
            Mode::Circular => "circular",
            Mode::CircularOptimal => "circular-optimal",
        }
    }

    /// Whether the source is treated as periodic.
    #[must_use]
    pub fn is_circular(self) -> bool {
        matches!(self, Mode::Circular | Mode::CircularOptimal)
    }

    /// Whether the transform size is rounded up with a [`FactorSet`].
    #[must_use]
    pub fn is_optimal(self) -> bool {
        matches!(self, Mode::LinearOptimal | Mode::CircularOptimal)
    }

    /// Transform length pair `(h_res, w_res)` for these dimensions.
    pub fn transform_size(
        self,
        src: Dims,
        kernel: Dims,
        factors: &FactorSet,
    ) -> Result<(usize, usize), ConvError> {
        src.require_non_empty("source")?;
        kernel.require_non_empty("kernel")?;

        let (pad_h, pad_w) = if self.is_circular() {
            (kernel.height, kernel.width)
        } else {
            kernel.half_ceil()
        };
        let overflow = || ConvError::Allocation(format!("transform size overflow for {src}"));
        let h = src.height.checked_add(pad_h).ok_or_else(overflow)?;
        let w = src.width.checked_add(pad_w).ok_or_else(overflow)?;

        if self.is_optimal() {
            Ok((factors.closest_size(h)?, factors.closest_size(w)?))
        } else {
            Ok((h, w))
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = ConvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Mode::ALL
            .into_iter()
            .find(|m| m.name() == normalized)
            .ok_or_else(|| {
                ConvError::InvalidMode(format!(
                    "unrecognized mode {s:?}, expected one of: linear, linear-optimal, circular, circular-optimal"
                ))
            })
    }
}
