//! Book configuration
//!
//! Loads and validates the YAML rule, traffic light, phase ring and
//! intersection books, and turns backend build properties into a
//! [`crate::network::RoadNetwork`].

pub mod backend;
pub mod loader;
pub mod schema;
pub mod validation;

pub use backend::{LoadedNetwork, load_road_network, network_from_books, resolve_resource};
pub use loader::{BookLimits, BookLoader, LoadResult, LoadWarning, LoaderOptions};
pub use schema::*;
pub use validation::{ValidationResult, Validator, suggest_similar};
