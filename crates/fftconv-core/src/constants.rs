//! Constants shared by the engine, its tests, and the CLI.

/// Transform radices handled efficiently by the complex FFT, largest first.
pub const DEFAULT_FACTORS: [usize; 6] = [7, 6, 5, 4, 3, 2];

/// Same list in the zero-terminated form accepted by
/// [`FactorSet::from_terminated`](crate::factor::FactorSet::from_terminated).
pub const DEFAULT_FACTORS_TERMINATED: [usize; 7] = [7, 6, 5, 4, 3, 2, 0];

/// Relative tolerance for comparing FFT results against exact references.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;
