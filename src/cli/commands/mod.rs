//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod completions;
pub mod describe;
pub mod dynamic;
pub mod load_time;
pub mod query;
pub mod validate;
pub mod version;

use tracing::{info, warn};

use crate::cli::args::{BackendArgs, Cli, Commands};
use crate::config::{BookLoader, load_road_network};
use crate::error::RoadnetError;
use crate::network::RoadNetwork;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli) -> Result<(), RoadnetError> {
    match cli.command {
        Commands::DynamicEnvironment(args) => dynamic::run(&args).await,
        Commands::MeasureLoadTime(args) => load_time::run(&args),
        Commands::Describe(args) => describe::run(&args),
        Commands::Query(cmd) => query::run(&cmd),
        Commands::Validate(args) => validate::run(&args),
        Commands::Completions(args) => {
            completions::run(&args);
            Ok(())
        }
        Commands::Version(args) => version::run(&args),
    }
}

/// Loads the network selected by `args`, logging book warnings.
///
/// # Errors
///
/// Returns the loader's configuration or phase error.
pub fn load_network(args: &BackendArgs) -> Result<RoadNetwork, RoadnetError> {
    info!(backend = %args.backend, "loading road network");
    let mut loader = BookLoader::with_defaults();
    let loaded = load_road_network(args.backend, &args.build_properties(), &mut loader)?;

    for warning in &loaded.warnings {
        warn!(
            location = warning.location.as_deref().unwrap_or("<unknown>"),
            "{}",
            warning.message
        );
    }

    Ok(loaded.network)
}
