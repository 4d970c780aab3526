//! Transform size selection.
//!
//! FFT throughput depends heavily on the prime factorization of the
//! transform length. `closest_factorable_size` rounds a minimum length up
//! to the next value made only of the radices the FFT handles well.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_FACTORS;
use crate::error::ConvError;

/// Allowed transform factors, kept largest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct FactorSet {
    factors: Vec<usize>,
}

impl FactorSet {
    /// Build a factor set from any ordering of factors.
    ///
    /// Factors are sorted largest first and deduplicated. Every factor must
    /// be at least 2 and the list must not be empty.
    pub fn new(mut factors: Vec<usize>) -> Result<Self, ConvError> {
        if factors.is_empty() {
            return Err(ConvError::invalid("factor list is empty"));
        }
        if let Some(bad) = factors.iter().find(|&&f| f < 2) {
            return Err(ConvError::invalid(format!(
                "factor {bad} cannot be used to decompose a length"
            )));
        }
        factors.sort_unstable_by(|a, b| b.cmp(a));
        factors.dedup();
        Ok(Self { factors })
    }

    /// Build a factor set from a list terminated by a `0` sentinel.
    ///
    /// Entries after the sentinel are ignored.
    pub fn from_terminated(list: &[usize]) -> Result<Self, ConvError> {
        let end = list
            .iter()
            .position(|&f| f == 0)
            .ok_or_else(|| ConvError::invalid("factor list is missing its 0 terminator"))?;
        Self::new(list[..end].to_vec())
    }

    /// Factors, largest first.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.factors
    }

    /// Whether `n` reduces to 1 by dividing out the factors largest first.
    #[must_use]
    pub fn is_factorable(&self, n: usize) -> bool {
        if n == 0 {
            return false;
        }
        let mut rest = n;
        for &f in &self.factors {
            while rest % f == 0 {
                rest /= f;
            }
            if rest == 1 {
                return true;
            }
        }
        rest == 1
    }

    /// Smallest length `>= minimum` that is factorable with this set.
    pub fn closest_size(&self, minimum: usize) -> Result<usize, ConvError> {
        if minimum == 0 {
            return Err(ConvError::invalid("minimum transform length must be positive"));
        }
        // Terminates: every factor is >= 2, so its powers are factorable.
        let mut n = minimum;
        while !self.is_factorable(n) {
            n = n
                .checked_add(1)
                .ok_or_else(|| ConvError::Allocation("transform length overflow".into()))?;
        }
        Ok(n)
    }
}

impl Default for FactorSet {
    fn default() -> Self {
        Self {
            factors: DEFAULT_FACTORS.to_vec(),
        }
    }
}

impl TryFrom<Vec<usize>> for FactorSet {
    type Error = ConvError;

    fn try_from(factors: Vec<usize>) -> Result<Self, Self::Error> {
        Self::new(factors)
    }
}

impl From<FactorSet> for Vec<usize> {
    fn from(set: FactorSet) -> Self {
        set.factors
    }
}

/// Smallest integer `>= minimum` whose factorization only uses `factors`.
///
/// `factors` follows the C convention of a list ending with a `0` sentinel,
/// e.g. [`DEFAULT_FACTORS_TERMINATED`](crate::constants::DEFAULT_FACTORS_TERMINATED).
pub fn closest_factorable_size(minimum: usize, factors: &[usize]) -> Result<usize, ConvError> {
    FactorSet::from_terminated(factors)?.closest_size(minimum)
}
