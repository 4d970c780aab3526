//! 1-D complex transforms over rows and columns of an interleaved buffer.
//!
//! Wraps a pair of `rustfft` plans (forward and inverse) for one length,
//! together with the scratch memory they need. Rows of a row-major buffer
//! are contiguous and transformed in place; columns are strided and go
//! through a gather line.

use std::sync::Arc;

use rustfft::num_complex::Complex64;
use rustfft::{Fft, FftPlanner};

use crate::error::ConvError;

/// Forward/inverse plans and scratch for transforms of a single length.
pub struct LineTransform {
    len: usize,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
    scratch: Vec<Complex64>,
    line: Vec<Complex64>,
}

impl LineTransform {
    /// Plan transforms of length `len`.
    ///
    /// Scratch and gather memory are reserved fallibly so a failed
    /// allocation surfaces as [`ConvError::Allocation`].
    pub fn new(planner: &mut FftPlanner<f64>, len: usize) -> Result<Self, ConvError> {
        if len == 0 {
            return Err(ConvError::invalid("transform length must be positive"));
        }
        let forward = planner.plan_fft_forward(len);
        let inverse = planner.plan_fft_inverse(len);
        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());

        Ok(Self {
            len,
            forward,
            inverse,
            scratch: zeroed(scratch_len)?,
            line: zeroed(len)?,
        })
    }

    /// Transform length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Forward transform of `len` samples starting at `offset`, `stride` apart.
    pub fn forward(&mut self, data: &mut [Complex64], offset: usize, stride: usize) {
        let plan = Arc::clone(&self.forward);
        self.apply(plan.as_ref(), data, offset, stride);
    }

    /// Inverse transform of `len` samples starting at `offset`, `stride` apart.
    ///
    /// Normalised by `1 / len`, so `inverse(forward(x)) == x`.
    #[allow(clippy::cast_precision_loss)]
    pub fn inverse(&mut self, data: &mut [Complex64], offset: usize, stride: usize) {
        let plan = Arc::clone(&self.inverse);
        self.apply(plan.as_ref(), data, offset, stride);

        let scale = 1.0 / self.len as f64;
        for k in 0..self.len {
            data[offset + k * stride] *= scale;
        }
    }

    fn apply(&mut self, plan: &dyn Fft<f64>, data: &mut [Complex64], offset: usize, stride: usize) {
        if stride == 1 {
            plan.process_with_scratch(&mut data[offset..offset + self.len], &mut self.scratch);
            return;
        }

        for (k, slot) in self.line.iter_mut().enumerate() {
            *slot = data[offset + k * stride];
        }
        plan.process_with_scratch(&mut self.line, &mut self.scratch);
        for (k, value) in self.line.iter().enumerate() {
            data[offset + k * stride] = *value;
        }
    }
}

/// Allocate `len` zeroed complex samples, reporting failure instead of aborting.
pub(crate) fn zeroed(len: usize) -> Result<Vec<Complex64>, ConvError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)?;
    buf.resize(len, Complex64::new(0.0, 0.0));
    Ok(buf)
}
