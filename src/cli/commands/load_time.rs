//! `measure-load-time` command
//!
//! Loads the selected network `--iterations` times and reports the mean
//! wall-clock load time.

use std::time::{Duration, Instant};

use tracing::info;

use crate::cli::args::{MeasureLoadTimeArgs, OutputFormat};
use crate::error::RoadnetError;

/// Load the network repeatedly and print the mean load time.
///
/// # Errors
///
/// Returns a usage error if `--iterations` is less than 1, or the
/// loader's error if any load fails.
pub fn run(args: &MeasureLoadTimeArgs) -> Result<(), RoadnetError> {
    let iterations = u32::try_from(args.iterations)
        .ok()
        .filter(|n| *n >= 1)
        .ok_or_else(|| {
            RoadnetError::Usage(format!(
                "iterations: {}. The number of iterations must be greater than zero",
                args.iterations
            ))
        })?;

    let mut total = Duration::ZERO;
    for i in 1..=iterations {
        info!(backend = %args.backend.backend, "building road network {i} of {iterations}");
        let start = Instant::now();
        super::load_network(&args.backend)?;
        total = total.saturating_add(start.elapsed());
    }

    let mean = mean_duration(total, iterations);
    match args.format {
        OutputFormat::Human => println!(
            "Mean load time: {:.6}s over {iterations} iteration(s)",
            mean.as_secs_f64()
        ),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string(&serde_json::json!({
                "backend": args.backend.backend,
                "iterations": iterations,
                "mean_seconds": mean.as_secs_f64(),
                "total_seconds": total.as_secs_f64(),
            }))?
        ),
    }
    Ok(())
}

/// Mean of `count` samples summing to `total`; zero when `count` is 0.
#[must_use]
pub fn mean_duration(total: Duration, count: u32) -> Duration {
    total.checked_div(count).unwrap_or_default()
}
