//! Backend selection and the geometry summary each backend produces.

use std::path::PathBuf;
use std::str::FromStr;

use clap::ValueEnum;
use serde::Serialize;

use crate::error::ConfigError;

/// Road geometry backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Synthetic straight multi-lane highway built from dimensions.
    Dragway,
    /// Lane-based network described by a YAML file.
    Multilane,
    /// OpenDRIVE network plus YAML rule and phase books.
    #[default]
    Malidrive,
}

impl Backend {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dragway => "dragway",
            Self::Multilane => "multilane",
            Self::Malidrive => "malidrive",
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dragway" => Ok(Self::Dragway),
            "multilane" => Ok(Self::Multilane),
            "malidrive" => Ok(Self::Malidrive),
            other => Err(ConfigError::InvalidValue {
                field: "backend".to_string(),
                value: other.to_string(),
                expected: "one of dragway, multilane, malidrive".to_string(),
            }),
        }
    }
}

/// What the loader knows about the geometry of a network.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadGeometrySummary {
    /// Backend that produced the geometry
    pub backend: Backend,
    /// Geometry identifier
    pub id: String,
    /// Lane count, when the backend declares it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_lanes: Option<usize>,
    /// Road length in meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    /// Total road width (lanes and shoulders) in meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Linear tolerance used to load the geometry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linear_tolerance: Option<f64>,
    /// Source file of the geometry description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
}

impl RoadGeometrySummary {
    /// Summary with only a backend and id set.
    #[must_use]
    pub fn new(backend: Backend, id: impl Into<String>) -> Self {
        Self {
            backend,
            id: id.into(),
            num_lanes: None,
            length: None,
            width: None,
            linear_tolerance: None,
            source: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_round_trip_strings() {
        for backend in [Backend::Dragway, Backend::Multilane, Backend::Malidrive] {
            assert_eq!(backend.to_string().parse::<Backend>().unwrap(), backend);
        }
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let err = "opendrive".parse::<Backend>().unwrap_err();
        assert!(err.to_string().contains("opendrive"));
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_default_backend_is_malidrive() {
        assert_eq!(Backend::default(), Backend::Malidrive);
    }
}
