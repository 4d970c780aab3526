//! # fftconv-core
//!
//! 2-D convolution of real images with real kernels through the FFT.
//!
//! Source and kernel are packed into the real and imaginary channels of one
//! complex buffer, so a single complex 2-D transform yields both spectra;
//! Hermitian symmetry separates them again while forming their product.
//! Four modes are supported: linear and circular convolution, each with an
//! exact or a factor-optimised transform size.

pub mod config;
pub mod constants;
pub mod direct;
pub mod error;
pub mod factor;
pub mod mode;
pub mod placement;
pub mod shape;
pub mod spectrum;
pub mod transform;
pub mod workspace;

// Re-exports
pub use config::ConvolutionConfig;
pub use constants::{DEFAULT_FACTORS, DEFAULT_FACTORS_TERMINATED, DEFAULT_TOLERANCE};
pub use error::ConvError;
pub use factor::{closest_factorable_size, FactorSet};
pub use mode::Mode;
pub use shape::Dims;
pub use spectrum::pack_product;
pub use workspace::{convolve, Workspace};
