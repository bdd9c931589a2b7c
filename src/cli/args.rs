//! CLI argument definitions
//!
//! All Clap derive structs for `roadnet` command-line parsing.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::config::schema::{
    BookFiles, BuildProperties, DragwayBuildProperties, MalidriveBuildProperties,
    MultilaneBuildProperties,
};
use crate::network::Backend;
use crate::observability::LogFormat;

// ============================================================================
// Root CLI
// ============================================================================

/// Road network inspection and dynamic environment tools.
#[derive(Parser, Debug)]
#[command(name = "roadnet", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "ROADNET_COLOR")]
    pub color: ColorChoice,

    /// Log output format.
    #[arg(long, default_value = "human", global = true, env = "ROADNET_LOG_FORMAT")]
    pub log_format: LogFormat,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load a network and iterate its phase rings on a fixed cadence.
    DynamicEnvironment(DynamicEnvironmentArgs),

    /// Measure how long a network takes to load.
    MeasureLoadTime(MeasureLoadTimeArgs),

    /// Print a description of a network.
    Describe(DescribeArgs),

    /// Query rules and phases of a network.
    Query(QueryCommand),

    /// Validate book files without loading a network.
    Validate(ValidateArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version information.
    Version(VersionArgs),
}

// ============================================================================
// Backend Selection
// ============================================================================

/// Backend selection and build properties shared by network-loading
/// commands.
#[derive(Args, Debug, Clone)]
pub struct BackendArgs {
    /// Road geometry backend.
    #[arg(long, default_value = "malidrive", env = "ROADNET_BACKEND")]
    pub backend: Backend,

    /// Number of dragway lanes.
    #[arg(long, default_value_t = 2, help_heading = "Dragway")]
    pub num_lanes: usize,

    /// Dragway length, in meters.
    #[arg(long, default_value_t = 10.0, help_heading = "Dragway")]
    pub length: f64,

    /// Dragway lane width, in meters.
    #[arg(long, default_value_t = 3.7, help_heading = "Dragway")]
    pub lane_width: f64,

    /// Dragway shoulder width, in meters.
    #[arg(long, default_value_t = 3.0, help_heading = "Dragway")]
    pub shoulder_width: f64,

    /// Maximum dragway height above the road surface, in meters.
    #[arg(long, default_value_t = 5.2, help_heading = "Dragway")]
    pub maximum_height: f64,

    /// Multilane road geometry YAML file.
    #[arg(long, help_heading = "Multilane")]
    pub yaml_file: Option<PathBuf>,

    /// OpenDRIVE file.
    #[arg(long, env = "ROADNET_XODR_FILE_PATH", help_heading = "Malidrive")]
    pub xodr_file_path: Option<PathBuf>,

    /// Linear tolerance used to load the map.
    #[arg(long, help_heading = "Malidrive")]
    pub linear_tolerance: Option<f64>,

    /// Upper bound the linear tolerance may be relaxed to.
    #[arg(long, help_heading = "Malidrive")]
    pub max_linear_tolerance: Option<f64>,

    /// Road rule book YAML file.
    #[arg(long, env = "ROADNET_ROAD_RULE_BOOK", help_heading = "Malidrive")]
    pub road_rule_book: Option<PathBuf>,

    /// Traffic light book YAML file.
    #[arg(long, env = "ROADNET_TRAFFIC_LIGHT_BOOK", help_heading = "Malidrive")]
    pub traffic_light_book: Option<PathBuf>,

    /// Phase ring book YAML file.
    #[arg(long, env = "ROADNET_PHASE_RING_BOOK", help_heading = "Malidrive")]
    pub phase_ring_book: Option<PathBuf>,

    /// Intersection book YAML file.
    #[arg(long, env = "ROADNET_INTERSECTION_BOOK", help_heading = "Malidrive")]
    pub intersection_book: Option<PathBuf>,
}

impl BackendArgs {
    /// Build properties for every backend from the parsed flags.
    #[must_use]
    pub fn build_properties(&self) -> BuildProperties {
        BuildProperties {
            dragway: DragwayBuildProperties {
                num_lanes: self.num_lanes,
                length: self.length,
                lane_width: self.lane_width,
                shoulder_width: self.shoulder_width,
                maximum_height: self.maximum_height,
            },
            multilane: MultilaneBuildProperties {
                yaml_file: self.yaml_file.clone(),
            },
            malidrive: MalidriveBuildProperties {
                xodr_file_path: self.xodr_file_path.clone(),
                linear_tolerance: self.linear_tolerance,
                max_linear_tolerance: self.max_linear_tolerance,
                books: BookFiles {
                    road_rule_book: self.road_rule_book.clone(),
                    traffic_light_book: self.traffic_light_book.clone(),
                    phase_ring_book: self.phase_ring_book.clone(),
                    intersection_book: self.intersection_book.clone(),
                },
            },
        }
    }
}

// ============================================================================
// Network Commands
// ============================================================================

/// Arguments for `dynamic-environment`.
#[derive(Args, Debug)]
pub struct DynamicEnvironmentArgs {
    #[command(flatten)]
    pub backend: BackendArgs,

    /// Seconds each phase stays active before the ring advances.
    #[arg(long, default_value_t = 2.0, allow_negative_numbers = true)]
    pub phase_duration: f64,

    /// Interval between updates (e.g. `250ms`, `1s`).
    #[arg(long, default_value = "250ms", value_parser = humantime::parse_duration)]
    pub period: Duration,

    /// Stop after this long instead of running until interrupted.
    #[arg(long, value_parser = humantime::parse_duration)]
    pub run_for: Option<Duration>,
}

/// Arguments for `measure-load-time`.
#[derive(Args, Debug)]
pub struct MeasureLoadTimeArgs {
    #[command(flatten)]
    pub backend: BackendArgs,

    /// Number of times the network is loaded.
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub iterations: i64,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `describe`.
#[derive(Args, Debug)]
pub struct DescribeArgs {
    #[command(flatten)]
    pub backend: BackendArgs,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `query`. Backend flags go before the query name.
#[derive(Args, Debug)]
pub struct QueryCommand {
    #[command(flatten)]
    pub backend: BackendArgs,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Query to run.
    #[command(subcommand)]
    pub query: QuerySubcommand,
}

/// Available queries.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum QuerySubcommand {
    /// List the phase rings and their phases.
    PhaseRings,

    /// Print the rule states of a phase.
    PhaseRightOfWay {
        /// Phase ring id.
        ring: String,
        /// Phase id.
        phase: String,
    },

    /// Print a discrete value rule.
    DiscreteRule {
        /// Rule id.
        id: String,
    },

    /// Print a range value rule.
    RangeRule {
        /// Rule id.
        id: String,
    },

    /// Print the current and pending phase of a ring.
    CurrentPhase {
        /// Phase ring id.
        ring: String,
    },
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Book files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Enable strict validation (warnings become errors).
    #[arg(long)]
    pub strict: bool,
}

// ============================================================================
// Completions / Version
// ============================================================================

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: Shell,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Shell type for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// `PowerShell`.
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell.
    Elvish,
}

// ============================================================================
// Tests
// ============================================================================
