//! 2-D extents of row-major buffers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConvError;

/// Height and width of a row-major 2-D buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dims {
    pub height: usize,
    pub width: usize,
}

impl Dims {
    #[must_use]
    pub const fn new(height: usize, width: usize) -> Self {
        Self { height, width }
    }

    /// Number of elements, `None` on overflow.
    #[must_use]
    pub fn checked_len(&self) -> Option<usize> {
        self.height.checked_mul(self.width)
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.height * self.width
    }

    /// True when either side is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.height == 0 || self.width == 0
    }

    /// Half extents rounded down: the kernel centre.
    #[must_use]
    pub const fn half_floor(&self) -> (usize, usize) {
        (self.height / 2, self.width / 2)
    }

    /// Half extents rounded up.
    #[must_use]
    pub const fn half_ceil(&self) -> (usize, usize) {
        (self.height.div_ceil(2), self.width.div_ceil(2))
    }

    pub(crate) fn require_non_empty(&self, what: &str) -> Result<(), ConvError> {
        if self.is_empty() {
            return Err(ConvError::invalid(format!(
                "{what} dimensions must be positive, got {self}"
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Dims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.height, self.width)
    }
}

/// Parses `HxW`, e.g. `480x640`.
impl FromStr for Dims {
    type Err = ConvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (h, w) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| ConvError::invalid(format!("expected HxW, got {s:?}")))?;
        let parse = |part: &str| {
            part.trim()
                .parse::<usize>()
                .map_err(|e| ConvError::invalid(format!("bad dimension {part:?}: {e}")))
        };
        Ok(Self::new(parse(h)?, parse(w)?))
    }
}
