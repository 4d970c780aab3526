//! Application configuration from CLI flags and environment.

use clap::Parser;

use fftconv_core::{ConvError, Dims, FactorSet, DEFAULT_TOLERANCE};

/// fftconv: checks FFT 2-D convolution against direct summation.
#[derive(Parser, Debug)]
#[command(name = "fftconv", version, about)]
pub struct AppConfig {
    /// Convolution mode: linear, linear-optimal, circular, circular-optimal, or all.
    #[arg(short, long, default_value = "all", env = "FFTCONV_MODE")]
    pub mode: String,

    /// Source image size as HxW.
    #[arg(short, long, default_value = "64x64", env = "FFTCONV_SOURCE")]
    pub source: Dims,

    /// Kernel size as HxW.
    #[arg(short, long, default_value = "5x5", env = "FFTCONV_KERNEL")]
    pub kernel: Dims,

    /// Transform factors allowed for the optimal modes, comma separated.
    #[arg(long, value_delimiter = ',', default_value = "7,6,5,4,3,2")]
    pub factors: Vec<usize>,

    /// Largest accepted error relative to the reference magnitude.
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    pub tolerance: f64,

    /// Seed for the synthetic source and kernel values.
    #[arg(long, default_value_t = 1)]
    pub seed: u64,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Verbose output (debug logs).
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode (no human-readable report).
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// The factor set for the optimal modes.
    pub fn factor_set(&self) -> Result<FactorSet, ConvError> {
        FactorSet::new(self.factors.clone())
    }

    /// Default log level for the subscriber; `RUST_LOG` still applies on top.
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::ERROR
        } else {
            tracing::Level::WARN
        }
    }
}
