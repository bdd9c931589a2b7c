//! Backend selection and network loading
//!
//! Turns a [`Backend`] plus its [`BuildProperties`] into a [`RoadNetwork`].
//! Only the malidrive backend carries rule and phase books; dragway and
//! multilane networks have geometry only.

use std::path::{Path, PathBuf};

use serde_yaml::Value;
use tracing::{debug, info};

use crate::config::loader::{BookLoader, LoadWarning};
use crate::config::schema::{
    BookFile, BuildProperties, DragwayBuildProperties, MalidriveBuildProperties,
    MultilaneBuildProperties,
};
use crate::error::{ConfigError, RoadnetError};
use crate::network::{
    Backend, IntersectionBook, PhaseRingBook, RoadGeometrySummary, RoadNetwork, RoadRulebook,
    TrafficLightBook,
};

/// Resource root for relative OpenDRIVE paths.
pub const XODR_RESOURCE_ROOT_ENV: &str = "ROADNET_XODR_RESOURCE_ROOT";

/// Resource root for relative multilane YAML paths.
pub const MULTILANE_RESOURCE_ROOT_ENV: &str = "ROADNET_MULTILANE_RESOURCE_ROOT";

/// Top-level key that marks a multilane description.
const MULTILANE_BUILDER_KEY: &str = "maliput_multilane_builder";

/// A loaded network and the warnings raised while loading its books.
#[derive(Debug)]
pub struct LoadedNetwork {
    pub network: RoadNetwork,
    pub warnings: Vec<LoadWarning>,
}

/// Resolves a relative resource path against the root named by `env_var`.
///
/// The path is returned unchanged when it is absolute, when the variable is
/// unset, or when no file exists under the root.
#[must_use]
pub fn resolve_resource(path: &Path, env_var: &str) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::var_os(env_var) {
        Some(root) => {
            let candidate = Path::new(&root).join(path);
            if candidate.exists() {
                debug!(file = %candidate.display(), env = env_var, "resolved resource path");
                candidate
            } else {
                path.to_path_buf()
            }
        }
        None => path.to_path_buf(),
    }
}

/// Builds the network of `backend` from its build properties.
///
/// # Errors
///
/// - [`ConfigError`] for missing or invalid properties, unreadable files,
///   and book parse or validation failures
/// - [`crate::error::PhaseError`] if the books cannot be assembled into a
///   network
pub fn load_road_network(
    backend: Backend,
    properties: &BuildProperties,
    loader: &mut BookLoader,
) -> Result<LoadedNetwork, RoadnetError> {
    let loaded = match backend {
        Backend::Dragway => LoadedNetwork {
            network: RoadNetwork::without_rules(dragway_geometry(&properties.dragway)?),
            warnings: Vec::new(),
        },
        Backend::Multilane => LoadedNetwork {
            network: RoadNetwork::without_rules(multilane_geometry(&properties.multilane)?),
            warnings: Vec::new(),
        },
        Backend::Malidrive => load_malidrive(&properties.malidrive, loader)?,
    };

    info!(
        backend = %backend,
        id = %loaded.network.geometry().id,
        phase_rings = loaded.network.phase_ring_book().len(),
        "loaded road network"
    );
    Ok(loaded)
}

/// Assembles a network from validated books.
///
/// # Errors
///
/// Returns [`crate::error::PhaseError`] on duplicated ids or rings that
/// cannot be registered.
pub fn network_from_books(
    geometry: RoadGeometrySummary,
    book: BookFile,
) -> Result<RoadNetwork, RoadnetError> {
    let rulebook = match book.road_rulebook {
        Some(section) => {
            RoadRulebook::from_rules(section.discrete_value_rules, section.range_value_rules)?
        }
        None => RoadRulebook::new(),
    };
    let traffic_lights = match book.traffic_lights {
        Some(lights) => TrafficLightBook::from_lights(lights)?,
        None => TrafficLightBook::new(),
    };
    let phase_rings = match book.phase_rings {
        Some(rings) => PhaseRingBook::from_rings(rings)?,
        None => PhaseRingBook::new(),
    };
    let intersections = match book.intersections {
        Some(intersections) => IntersectionBook::from_intersections(intersections)?,
        None => IntersectionBook::new(),
    };

    Ok(RoadNetwork::new(
        geometry,
        rulebook,
        traffic_lights,
        phase_rings,
        intersections,
    )?)
}

// ============================================================================
// Backends
// ============================================================================

fn dragway_geometry(props: &DragwayBuildProperties) -> Result<RoadGeometrySummary, ConfigError> {
    if props.num_lanes == 0 {
        return Err(invalid("num_lanes", props.num_lanes, "at least 1"));
    }
    for (field, value) in [
        ("length", props.length),
        ("lane_width", props.lane_width),
        ("maximum_height", props.maximum_height),
    ] {
        if !(value > 0.0 && value.is_finite()) {
            return Err(invalid(field, value, "a positive number of meters"));
        }
    }
    if !(props.shoulder_width >= 0.0 && props.shoulder_width.is_finite()) {
        return Err(invalid(
            "shoulder_width",
            props.shoulder_width,
            "a non-negative number of meters",
        ));
    }

    #[allow(clippy::cast_precision_loss)]
    let width = (props.num_lanes as f64).mul_add(props.lane_width, 2.0 * props.shoulder_width);

    let mut summary = RoadGeometrySummary::new(
        Backend::Dragway,
        format!("Dragway with {} lanes.", props.num_lanes),
    );
    summary.num_lanes = Some(props.num_lanes);
    summary.length = Some(props.length);
    summary.width = Some(width);
    Ok(summary)
}

fn multilane_geometry(
    props: &MultilaneBuildProperties,
) -> Result<RoadGeometrySummary, RoadnetError> {
    let path = props
        .yaml_file
        .as_deref()
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or_else(|| ConfigError::MissingRequired {
            field: "yaml_file".to_string(),
            location: "--yaml-file".to_string(),
        })?;
    let path = resolve_resource(path, MULTILANE_RESOURCE_ROOT_ENV);

    let raw = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => RoadnetError::Config(ConfigError::MissingFile { path: path.clone() }),
        _ => RoadnetError::Io(e),
    })?;
    let root: Value = serde_yaml::from_str(&raw).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        line: e.location().map(|l| l.line()),
        message: e.to_string(),
    })?;

    let Value::Mapping(root) = root else {
        return Err(ConfigError::ParseError {
            path,
            line: None,
            message: "multilane description must be a YAML mapping".to_string(),
        }
        .into());
    };
    let builder = root
        .get(MULTILANE_BUILDER_KEY)
        .ok_or_else(|| ConfigError::MissingRequired {
            field: MULTILANE_BUILDER_KEY.to_string(),
            location: path.display().to_string(),
        })?;

    let id = builder
        .get("id")
        .and_then(Value::as_str)
        .map_or_else(|| file_stem(&path), str::to_string);

    let mut summary = RoadGeometrySummary::new(Backend::Multilane, id);
    summary.width = builder.get("lane_width").and_then(Value::as_f64);
    summary.source = Some(path);
    Ok(summary)
}

fn load_malidrive(
    props: &MalidriveBuildProperties,
    loader: &mut BookLoader,
) -> Result<LoadedNetwork, RoadnetError> {
    let xodr = props
        .xodr_file_path
        .as_deref()
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or_else(|| ConfigError::MissingRequired {
            field: "xodr_file_path".to_string(),
            location: "--xodr-file-path".to_string(),
        })?;
    let xodr = resolve_resource(xodr, XODR_RESOURCE_ROOT_ENV);
    if !xodr.is_file() {
        return Err(ConfigError::MissingFile { path: xodr }.into());
    }

    if let Some(tolerance) = props.linear_tolerance
        && !(tolerance > 0.0 && tolerance.is_finite())
    {
        return Err(invalid("linear_tolerance", tolerance, "a positive number").into());
    }
    if let Some(max) = props.max_linear_tolerance {
        let floor = props.linear_tolerance.unwrap_or(0.0);
        if !(max >= floor && max > 0.0 && max.is_finite()) {
            return Err(invalid(
                "max_linear_tolerance",
                max,
                "a positive number no smaller than linear_tolerance",
            )
            .into());
        }
    }

    let mut geometry = RoadGeometrySummary::new(Backend::Malidrive, file_stem(&xodr));
    geometry.linear_tolerance = props.linear_tolerance;
    geometry.source = Some(xodr);

    if props.books.is_empty() {
        debug!("no book files configured; loading geometry only");
        return Ok(LoadedNetwork {
            network: RoadNetwork::without_rules(geometry),
            warnings: Vec::new(),
        });
    }

    let result = loader.load_books(&props.books)?;
    Ok(LoadedNetwork {
        network: network_from_books(geometry, result.book)?,
        warnings: result.warnings,
    })
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned())
}

fn invalid(field: &str, value: impl std::fmt::Display, expected: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        expected: expected.to_string(),
    }
}
