//! Conformance checks: FFT engine against the direct reference.

use std::time::{Duration, Instant};

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde::Serialize;
use tracing::{debug, info, warn};

use fftconv_core::{direct, ConvError, Dims, FactorSet, Mode, Workspace};

/// Seed perturbation separating kernel values from source values.
const KERNEL_SALT: u64 = 0x6b65_726e_656c;

/// Outcome of checking one mode.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub mode: Mode,
    /// `(h_res, w_res)` used by the engine, absent if configuration failed.
    pub transform: Option<(usize, usize)>,
    pub max_abs_error: f64,
    /// `max_abs_error` divided by the reference magnitude (at least 1).
    pub relative_error: f64,
    #[serde(skip)]
    pub duration: Duration,
    pub duration_secs: f64,
    pub error: Option<String>,
}

impl CheckResult {
    /// Whether the engine ran and stayed within `tolerance`.
    #[must_use]
    pub fn passed(&self, tolerance: f64) -> bool {
        self.error.is_none() && self.relative_error <= tolerance
    }
}

/// Modes named by a `--mode` value.
pub fn select_modes(name: &str) -> Result<Vec<Mode>, ConvError> {
    match name.trim() {
        "all" => Ok(Mode::ALL.to_vec()),
        name => Ok(vec![name.parse()?]),
    }
}

fn splitmix64(state: u64) -> u64 {
    let mut z = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// `len` deterministic values in `[-1, 1)`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn synthetic(len: usize, seed: u64) -> Vec<f64> {
    let scale = 1.0 / (1u64 << 53) as f64;
    (0..len as u64)
        .map(|k| {
            let bits = splitmix64(seed.wrapping_add(k.wrapping_mul(0x9e37_79b9)));
            (bits >> 11) as f64 * scale * 2.0 - 1.0
        })
        .collect()
}

/// Check every mode in `modes` on the same synthetic inputs.
///
/// Several modes run in parallel, each on its own workspace.
#[must_use]
pub fn run_checks(
    modes: &[Mode],
    src_dims: Dims,
    kernel_dims: Dims,
    factors: &FactorSet,
    seed: u64,
) -> Vec<CheckResult> {
    let src = synthetic(src_dims.len(), seed);
    let kernel = synthetic(kernel_dims.len(), seed ^ KERNEL_SALT);
    let inputs = Inputs {
        src_dims,
        kernel_dims,
        src: &src,
        kernel: &kernel,
        factors,
    };

    if modes.len() == 1 {
        return vec![inputs.check(modes[0])];
    }
    modes.par_iter().map(|&mode| inputs.check(mode)).collect()
}

struct Inputs<'a> {
    src_dims: Dims,
    kernel_dims: Dims,
    src: &'a [f64],
    kernel: &'a [f64],
    factors: &'a FactorSet,
}

impl Inputs<'_> {
    fn check(&self, mode: Mode) -> CheckResult {
        let start = Instant::now();
        let engine = self.engine(mode);
        let duration = start.elapsed();

        let mut result = CheckResult {
            mode,
            transform: None,
            max_abs_error: 0.0,
            relative_error: 0.0,
            duration,
            duration_secs: duration.as_secs_f64(),
            error: None,
        };
        let (transform, got) = match engine {
            Ok(done) => done,
            Err(e) => {
                warn!(%mode, error = %e, "Engine failed");
                result.error = Some(e.to_string());
                return result;
            }
        };
        result.transform = Some(transform);

        let mut want = vec![0.0; self.src_dims.len()];
        if let Err(e) = direct::convolve(
            mode,
            self.src,
            self.src_dims,
            self.kernel,
            self.kernel_dims,
            &mut want,
        ) {
            result.error = Some(e.to_string());
            return result;
        }

        let scale = want.iter().fold(1.0_f64, |m, v| m.max(v.abs()));
        result.max_abs_error = got
            .iter()
            .zip(&want)
            .fold(0.0_f64, |m, (g, w)| m.max((g - w).abs()));
        result.relative_error = result.max_abs_error / scale;
        info!(
            %mode,
            h_res = transform.0,
            w_res = transform.1,
            max_abs_error = result.max_abs_error,
            "Checked mode"
        );
        result
    }

    fn engine(&self, mode: Mode) -> Result<((usize, usize), Vec<f64>), ConvError> {
        let mut ws = Workspace::with_factors(self.factors.clone());
        ws.configure(mode, self.src_dims, self.kernel_dims)?;
        let transform = ws
            .transform_size()
            .ok_or_else(|| ConvError::InvalidMode(format!("{mode} left unconfigured")))?;
        debug!(%mode, ?transform, "Workspace ready");
        let out = ws.convolve_to_vec(self.src, self.kernel)?;
        ws.release();
        Ok((transform, out))
    }
}
