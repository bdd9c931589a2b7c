//! Road network model
//!
//! In-memory model of the parts of a road network that the tools consume:
//! the rule book, the phase ring book with its live phase provider, the
//! intersection and traffic light books, and a summary of the geometry the
//! selected backend describes.
//!
//! # Architecture
//!
//! - [`RoadNetwork`]: aggregate owning every book plus the phase provider
//! - [`PhaseRingBook`] / [`PhaseRing`]: declared phases and their successors
//! - [`PhaseProvider`]: current and pending phase per ring (the only mutable state)
//! - [`RoadRulebook`]: discrete and range value rules
//! - [`Backend`] / [`RoadGeometrySummary`]: backend selection

pub mod geometry;
pub mod ids;
pub mod intersection;
pub mod phase;
pub mod provider;
pub mod road_network;
pub mod rules;

pub use geometry::{Backend, RoadGeometrySummary};
pub use ids::{BulbUniqueId, IntersectionId, PhaseId, PhaseRingId, RuleId, TrafficLightId};
pub use intersection::{
    Bulb, BulbColor, BulbGroup, BulbType, Intersection, IntersectionBook, TrafficLight,
    TrafficLightBook,
};
pub use phase::{BulbState, NextPhase, Phase, PhaseRing, PhaseRingBook};
pub use provider::{NextState, PhaseProvider, PhaseStateResult};
pub use road_network::RoadNetwork;
pub use rules::{DiscreteValueRule, Range, RangeValueRule, RoadRulebook};
