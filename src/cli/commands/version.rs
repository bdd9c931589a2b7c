//! Version information display.

use crate::cli::args::{OutputFormat, VersionArgs};
use crate::error::RoadnetError;

/// Print version information.
///
/// # Errors
///
/// Returns a JSON error if serialization fails.
pub fn run(args: &VersionArgs) -> Result<(), RoadnetError> {
    let name = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    match args.format {
        OutputFormat::Human => println!("{name} {version}"),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string(&serde_json::json!({ "name": name, "version": version }))?
        ),
    }
    Ok(())
}
