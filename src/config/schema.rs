//! Book file schema and backend build properties.
//!
//! A book file is a YAML document with up to four top-level sections. The
//! same document may be passed as the rule book, traffic light book, phase
//! ring book and intersection book; each role reads only its own section.
//!
//! ```yaml
//! road_rulebook:
//!   discrete_value_rules: [...]
//!   range_value_rules: [...]
//! traffic_lights: [...]
//! phase_rings: [...]
//! intersections: [...]
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::network::{DiscreteValueRule, Intersection, PhaseRing, RangeValueRule, TrafficLight};

// ============================================================================
// Book file
// ============================================================================

/// Parsed contents of a book file. Missing sections are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookFile {
    /// Discrete and range value rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub road_rulebook: Option<RulebookSection>,

    /// Traffic lights and their bulbs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic_lights: Option<Vec<TrafficLight>>,

    /// Phase rings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_rings: Option<Vec<PhaseRing>>,

    /// Intersections
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intersections: Option<Vec<Intersection>>,
}

/// `road_rulebook` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RulebookSection {
    #[serde(default)]
    pub discrete_value_rules: Vec<DiscreteValueRule>,
    #[serde(default)]
    pub range_value_rules: Vec<RangeValueRule>,
}

/// Which file supplies each book. Any of them may point to the same file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFiles {
    pub road_rule_book: Option<PathBuf>,
    pub traffic_light_book: Option<PathBuf>,
    pub phase_ring_book: Option<PathBuf>,
    pub intersection_book: Option<PathBuf>,
}

impl BookFiles {
    /// Returns `true` if no book file is configured.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.road_rule_book.is_none()
            && self.traffic_light_book.is_none()
            && self.phase_ring_book.is_none()
            && self.intersection_book.is_none()
    }
}

// ============================================================================
// Backend build properties
// ============================================================================

/// Dimensions of a synthetic dragway.
///
/// Lane and shoulder widths default to the U.S. interstate standard
/// (3.7 m lanes, 3 m shoulders).
#[derive(Debug, Clone, PartialEq)]
pub struct DragwayBuildProperties {
    /// Number of lanes
    pub num_lanes: usize,
    /// Length of the lanes, in meters
    pub length: f64,
    /// Width of each lane, in meters
    pub lane_width: f64,
    /// Width of each shoulder, in meters
    pub shoulder_width: f64,
    /// Maximum modelled height above the road surface, in meters
    pub maximum_height: f64,
}

impl Default for DragwayBuildProperties {
    fn default() -> Self {
        Self {
            num_lanes: 2,
            length: 10.0,
            lane_width: 3.7,
            shoulder_width: 3.0,
            maximum_height: 5.2,
        }
    }
}

/// Inputs of the multilane backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultilaneBuildProperties {
    /// YAML file describing the multilane road geometry
    pub yaml_file: Option<PathBuf>,
}

/// Inputs of the malidrive backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MalidriveBuildProperties {
    /// OpenDRIVE file
    pub xodr_file_path: Option<PathBuf>,
    /// Linear tolerance used to load the map
    pub linear_tolerance: Option<f64>,
    /// Upper bound the tolerance may be relaxed to
    pub max_linear_tolerance: Option<f64>,
    /// Rule, light, phase ring and intersection books
    pub books: BookFiles,
}

/// Build properties of every backend; the selected backend reads its own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildProperties {
    pub dragway: DragwayBuildProperties,
    pub multilane: MultilaneBuildProperties,
    pub malidrive: MalidriveBuildProperties,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_file_sections_optional() {
        let book: BookFile = serde_yaml::from_str("phase_rings: []\n").unwrap();
        assert!(book.road_rulebook.is_none());
        assert!(book.traffic_lights.is_none());
        assert_eq!(book.phase_rings, Some(vec![]));
        assert!(book.intersections.is_none());
    }

    #[test]
    fn test_unrelated_keys_ignored() {
        let book: BookFile =
            serde_yaml::from_str("rule_registry:\n  foo: bar\nintersections: []\n").unwrap();
        assert_eq!(book.intersections, Some(vec![]));
    }

    #[test]
    fn test_dragway_defaults() {
        let props = DragwayBuildProperties::default();
        assert_eq!(props.num_lanes, 2);
        assert!((props.lane_width - 3.7).abs() < f64::EPSILON);
        assert!((props.shoulder_width - 3.0).abs() < f64::EPSILON);
        assert!((props.maximum_height - 5.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_book_files_is_empty() {
        assert!(BookFiles::default().is_empty());
        let files = BookFiles {
            phase_ring_book: Some(PathBuf::from("rings.yaml")),
            ..BookFiles::default()
        };
        assert!(!files.is_empty());
    }
}
