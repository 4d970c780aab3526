//! Human and JSON rendering of conformance results.

use std::fmt::Write as _;
use std::time::Duration;

use serde::Serialize;

use fftconv_core::Dims;

use crate::check::CheckResult;

/// Full report of one run.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub source: Dims,
    pub kernel: Dims,
    pub tolerance: f64,
    pub seed: u64,
    pub passed: bool,
    pub results: &'a [CheckResult],
}

impl<'a> Report<'a> {
    #[must_use]
    pub fn new(
        source: Dims,
        kernel: Dims,
        tolerance: f64,
        seed: u64,
        results: &'a [CheckResult],
    ) -> Self {
        let passed = results.iter().all(|r| r.passed(tolerance));
        Self {
            source,
            kernel,
            tolerance,
            seed,
            passed,
            results,
        }
    }

    /// Number of modes that errored or exceeded the tolerance.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.results
            .iter()
            .filter(|r| !r.passed(self.tolerance))
            .count()
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Table for the terminal.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Source {}, kernel {}, tolerance {:e}",
            self.source, self.kernel, self.tolerance
        );
        let _ = writeln!(out, "{:-<72}", "");
        for r in self.results {
            let transform = r
                .transform
                .map_or_else(|| "-".to_string(), |(h, w)| format!("{h}x{w}"));
            let status = match (&r.error, r.passed(self.tolerance)) {
                (Some(_), _) => "ERROR",
                (None, true) => "OK",
                (None, false) => "MISMATCH",
            };
            let _ = writeln!(
                out,
                "  {:<18} {:>11}  err {:>9.2e}  {:>10}  [{status}]",
                r.mode.name(),
                transform,
                r.max_abs_error,
                format_duration(r.duration),
            );
            if let Some(error) = &r.error {
                let _ = writeln!(out, "      {error}");
            }
        }
        out
    }
}

/// Format a duration for display.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 0.001 {
        format!("{:.2}µs", secs * 1_000_000.0)
    } else if secs < 1.0 {
        format!("{:.2}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{secs:.3}s")
    } else {
        let mins = (secs / 60.0).floor() as u64;
        let remaining = secs - (mins as f64 * 60.0);
        format!("{mins}m{remaining:.1}s")
    }
}
