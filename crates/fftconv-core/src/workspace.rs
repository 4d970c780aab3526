//! Convolution workspace: buffers, plans, and the public entry point.

use std::fmt;

use rustfft::num_complex::Complex64;
use rustfft::FftPlanner;
use tracing::{debug, trace};

use crate::config::ConvolutionConfig;
use crate::error::ConvError;
use crate::factor::FactorSet;
use crate::mode::Mode;
use crate::placement::{self, Layout, Placement};
use crate::shape::Dims;
use crate::spectrum;
use crate::transform::{zeroed, LineTransform};

/// Reusable state for repeated convolutions of fixed dimensions.
///
/// A workspace is either unconfigured or configured for one mode, one
/// source size, and one kernel size. Configuring allocates the working and
/// product buffers and plans row and column transforms; every call to
/// [`convolve`](Self::convolve) reuses them without allocating.
///
/// ```
/// use fftconv_core::{Dims, Mode, Workspace};
///
/// let mut ws = Workspace::configured(Mode::Linear, Dims::new(2, 2), Dims::new(1, 1)).unwrap();
/// let mut out = [0.0; 4];
/// ws.convolve(&[1.0, 2.0, 3.0, 4.0], &[2.0], &mut out).unwrap();
/// assert!((out[3] - 8.0).abs() < 1e-12);
/// ```
pub struct Workspace {
    factors: FactorSet,
    state: Option<Configured>,
}

struct Configured {
    mode: Mode,
    layout: Layout,
    placement: &'static dyn Placement,
    work: Vec<Complex64>,
    product: Vec<Complex64>,
    rows: LineTransform,
    cols: LineTransform,
}

impl Workspace {
    /// Unconfigured workspace using the default factor set.
    #[must_use]
    pub fn new() -> Self {
        Self::with_factors(FactorSet::default())
    }

    /// Unconfigured workspace that sizes optimal modes with `factors`.
    #[must_use]
    pub fn with_factors(factors: FactorSet) -> Self {
        Self {
            factors,
            state: None,
        }
    }

    /// Workspace configured for `mode` in one step.
    pub fn configured(mode: Mode, src: Dims, kernel: Dims) -> Result<Self, ConvError> {
        let mut ws = Self::new();
        ws.configure(mode, src, kernel)?;
        Ok(ws)
    }

    /// Workspace configured from a validated [`ConvolutionConfig`].
    pub fn from_config(config: &ConvolutionConfig) -> Result<Self, ConvError> {
        config.validate()?;
        let mut ws = Self::with_factors(config.factors.clone());
        ws.configure(config.mode, config.source, config.kernel)?;
        Ok(ws)
    }

    /// Size buffers and plans for `mode`, `src`, and `kernel`.
    ///
    /// Any previous configuration is replaced only once the new one has been
    /// fully built; on error the workspace keeps its previous state.
    pub fn configure(&mut self, mode: Mode, src: Dims, kernel: Dims) -> Result<(), ConvError> {
        let (h_res, w_res) = mode.transform_size(src, kernel, &self.factors)?;
        let samples = h_res.checked_mul(w_res).ok_or_else(|| {
            ConvError::Allocation(format!("{h_res}x{w_res} transform overflows"))
        })?;

        let mut planner = FftPlanner::new();
        let next = Configured {
            mode,
            layout: Layout {
                src,
                kernel,
                h_res,
                w_res,
            },
            placement: placement::for_mode(mode),
            work: zeroed(samples)?,
            product: zeroed(samples)?,
            rows: LineTransform::new(&mut planner, w_res)?,
            cols: LineTransform::new(&mut planner, h_res)?,
        };

        debug!(
            mode = %mode,
            source = %src,
            kernel = %kernel,
            h_res,
            w_res,
            buffer_bytes = 2 * samples * std::mem::size_of::<Complex64>(),
            "Configured convolution workspace"
        );
        self.state = Some(next);
        Ok(())
    }

    /// Drop buffers and plans. Calling it again is a no-op.
    pub fn release(&mut self) {
        if let Some(state) = self.state.take() {
            debug!(mode = %state.mode, "Released convolution workspace");
        }
    }

    /// Convolve `src` with `kernel` into `dst`.
    ///
    /// All three slices are row-major and must match the dimensions given
    /// to [`configure`](Self::configure): `src` and `dst` hold
    /// `h_src · w_src` values and `kernel` holds `h_kernel · w_kernel`.
    pub fn convolve(
        &mut self,
        src: &[f64],
        kernel: &[f64],
        dst: &mut [f64],
    ) -> Result<(), ConvError> {
        let state = self
            .state
            .as_mut()
            .ok_or_else(|| ConvError::InvalidMode("workspace is not configured".into()))?;
        let layout = state.layout;
        check_len("source", src.len(), layout.src)?;
        check_len("kernel", kernel.len(), layout.kernel)?;
        check_len("destination", dst.len(), layout.src)?;

        trace!(mode = %state.mode, strategy = state.placement.name(), "Convolving");
        state.placement.pack(&mut state.work, &layout, src, kernel);
        spectrum::convolve_packed(
            &mut state.work,
            &mut state.product,
            &mut state.rows,
            &mut state.cols,
        );
        let origin = state.placement.origin(&layout);
        placement::extract(&state.product, &layout, origin, dst);
        Ok(())
    }

    /// Like [`convolve`](Self::convolve), allocating the result.
    pub fn convolve_to_vec(
        &mut self,
        src: &[f64],
        kernel: &[f64],
    ) -> Result<Vec<f64>, ConvError> {
        let dims = self
            .source_dims()
            .ok_or_else(|| ConvError::InvalidMode("workspace is not configured".into()))?;
        let mut dst = vec![0.0; dims.len()];
        self.convolve(src, kernel, &mut dst)?;
        Ok(dst)
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.state.is_some()
    }

    /// Configured mode, if any.
    #[must_use]
    pub fn mode(&self) -> Option<Mode> {
        self.state.as_ref().map(|s| s.mode)
    }

    /// Transform length pair `(h_res, w_res)`, if configured.
    #[must_use]
    pub fn transform_size(&self) -> Option<(usize, usize)> {
        self.state.as_ref().map(|s| (s.layout.h_res, s.layout.w_res))
    }

    #[must_use]
    pub fn source_dims(&self) -> Option<Dims> {
        self.state.as_ref().map(|s| s.layout.src)
    }

    #[must_use]
    pub fn kernel_dims(&self) -> Option<Dims> {
        self.state.as_ref().map(|s| s.layout.kernel)
    }

    /// Factor set used for optimal modes.
    #[must_use]
    pub fn factors(&self) -> &FactorSet {
        &self.factors
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("Workspace");
        d.field("factors", &self.factors.as_slice());
        match &self.state {
            Some(s) => d
                .field("mode", &s.mode)
                .field("layout", &s.layout)
                .field("strategy", &s.placement.name()),
            None => d.field("mode", &Option::<Mode>::None),
        };
        d.finish()
    }
}

fn check_len(what: &str, len: usize, dims: Dims) -> Result<(), ConvError> {
    if len != dims.len() {
        return Err(ConvError::invalid(format!(
            "{what} buffer holds {len} values, configured for {dims} ({})",
            dims.len()
        )));
    }
    Ok(())
}

/// One-shot convolution with a temporary workspace.
pub fn convolve(
    mode: Mode,
    src: &[f64],
    src_dims: Dims,
    kernel: &[f64],
    kernel_dims: Dims,
) -> Result<Vec<f64>, ConvError> {
    Workspace::configured(mode, src_dims, kernel_dims)?.convolve_to_vec(src, kernel)
}
