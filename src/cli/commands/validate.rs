//! `validate` command
//!
//! Loads each book file on its own and reports every issue found. With
//! `--strict`, warnings fail validation too.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::BookLoader;
use crate::error::{ConfigError, RoadnetError, Severity, ValidationIssue};

/// Validation outcome of one file.
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub file: String,
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

/// Validate book files and print a report.
///
/// # Errors
///
/// Returns [`ConfigError::ValidationError`] naming the failed files when
/// any file does not validate.
pub fn run(args: &ValidateArgs) -> Result<(), RoadnetError> {
    let mut loader = BookLoader::with_defaults();
    let reports: Vec<FileReport> = args
        .files
        .iter()
        .map(|path| validate_file(&mut loader, path, args.strict))
        .collect();

    match args.format {
        OutputFormat::Human => {
            for report in &reports {
                if report.valid {
                    println!("✓ {}", report.file);
                } else {
                    println!("✗ {}", report.file);
                }
                for issue in report.errors.iter().chain(&report.warnings) {
                    println!("    {issue}");
                }
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
    }

    let failed: Vec<&FileReport> = reports.iter().filter(|r| !r.valid).collect();
    if failed.is_empty() {
        return Ok(());
    }
    Err(ConfigError::ValidationError {
        path: failed
            .iter()
            .map(|r| r.file.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        errors: failed.iter().flat_map(|r| r.errors.clone()).collect(),
    }
    .into())
}

/// Loads `path` and turns the outcome into a report.
pub fn validate_file(loader: &mut BookLoader, path: &Path, strict: bool) -> FileReport {
    let file = path.display().to_string();
    info!(file = %file, "validating book");

    let (mut errors, warnings) = match loader.load(path) {
        Ok(result) => (
            Vec::new(),
            result
                .warnings
                .into_iter()
                .map(|w| ValidationIssue {
                    path: w.location.unwrap_or_default(),
                    message: w.message,
                    severity: Severity::Warning,
                })
                .collect::<Vec<_>>(),
        ),
        Err(ConfigError::ValidationError { errors, .. }) => (errors, Vec::new()),
        Err(other) => (
            vec![ValidationIssue {
                path: file.clone(),
                message: other.to_string(),
                severity: Severity::Error,
            }],
            Vec::new(),
        ),
    };

    if strict {
        errors.extend(warnings.iter().map(|w| ValidationIssue {
            severity: Severity::Error,
            ..w.clone()
        }));
    }

    FileReport {
        file,
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}
