//! Application entry point and dispatch.

use anyhow::Result;
use tracing::debug;

use fftconv_core::ConvolutionConfig;

use crate::check::{run_checks, select_modes};
use crate::config::AppConfig;
use crate::errors::CheckError;
use crate::report::Report;

/// Upper bound on source samples times kernel taps for the direct reference.
pub const DIRECT_WORK_LIMIT: usize = 1 << 30;

/// Run the application.
pub fn run(config: &AppConfig) -> Result<()> {
    let modes = select_modes(&config.mode)?;
    let factors = config.factor_set()?;

    if !config.tolerance.is_finite() || config.tolerance < 0.0 {
        return Err(CheckError::Config(format!(
            "tolerance must be a non-negative number, got {}",
            config.tolerance
        ))
        .into());
    }
    for &mode in &modes {
        let (h_res, w_res) = ConvolutionConfig::new(mode, config.source, config.kernel)
            .with_factors(factors.clone())
            .validate()?;
        debug!(%mode, h_res, w_res, "Validated configuration");
    }
    let work = config
        .source
        .checked_len()
        .and_then(|n| config.kernel.checked_len().and_then(|k| n.checked_mul(k)));
    if !work.is_some_and(|w| w <= DIRECT_WORK_LIMIT) {
        return Err(CheckError::Config(format!(
            "{} source with {} kernel is too large for the direct reference",
            config.source, config.kernel
        ))
        .into());
    }

    let results = run_checks(&modes, config.source, config.kernel, &factors, config.seed);
    let report = Report::new(
        config.source,
        config.kernel,
        config.tolerance,
        config.seed,
        &results,
    );

    if config.json {
        println!("{}", report.to_json()?);
    } else if !config.quiet {
        print!("{}", report.render());
    }

    if let Some(failed) = results.iter().find(|r| r.error.is_some()) {
        return Err(CheckError::Engine {
            mode: failed.mode.to_string(),
            message: failed.error.clone().unwrap_or_default(),
        }
        .into());
    }
    if !report.passed {
        return Err(CheckError::Mismatch {
            failed: report.failures(),
            total: results.len(),
            tolerance: config.tolerance,
        }
        .into());
    }
    Ok(())
}
