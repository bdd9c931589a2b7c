//! The `RoadNetwork` aggregate.

use serde::Serialize;
use tracing::debug;

use crate::error::PhaseError;

use super::geometry::RoadGeometrySummary;
use super::ids::{IntersectionId, PhaseRingId};
use super::intersection::{IntersectionBook, TrafficLightBook};
use super::phase::{Phase, PhaseRingBook};
use super::provider::{PhaseProvider, PhaseStateResult};
use super::rules::RoadRulebook;

/// Geometry summary plus every rule, phase, and intersection book of a
/// network, and the live phase state of its rings.
#[derive(Debug, Clone, Serialize)]
pub struct RoadNetwork {
    geometry: RoadGeometrySummary,
    rulebook: RoadRulebook,
    traffic_lights: TrafficLightBook,
    phase_rings: PhaseRingBook,
    intersections: IntersectionBook,
    phase_states: PhaseProvider,
}

impl RoadNetwork {
    /// Assembles a network and registers every ring in the phase provider.
    ///
    /// A ring starts in the `initial_phase` of the intersection it drives,
    /// or in its first declared phase. Its pending phase is the first
    /// declared successor of that phase, if any.
    ///
    /// # Errors
    ///
    /// - [`PhaseError::InvalidArgument`] if a ring has no phases
    /// - [`PhaseError::NotFound`] if an intersection's initial phase is not in its ring
    pub fn new(
        geometry: RoadGeometrySummary,
        rulebook: RoadRulebook,
        traffic_lights: TrafficLightBook,
        phase_rings: PhaseRingBook,
        intersections: IntersectionBook,
    ) -> Result<Self, PhaseError> {
        let mut phase_states = PhaseProvider::new();

        for ring in phase_rings.iter() {
            let initial = intersections
                .find_by_phase_ring(&ring.id)
                .and_then(|intersection| intersection.initial_phase.clone())
                .or_else(|| ring.first_phase().map(|phase| phase.id.clone()))
                .ok_or_else(|| {
                    PhaseError::InvalidArgument(format!("phase ring '{}' has no phases", ring.id))
                })?;

            let next = ring.get_next_phases(&initial)?.first().cloned();
            debug!(
                ring = %ring.id,
                phase = %initial,
                next = next.as_ref().map_or("<none>", |n| n.id.as_str()),
                "registering phase ring"
            );

            let duration_until = next.as_ref().and_then(|n| n.duration_until);
            phase_states.add_phase_ring(
                ring.id.clone(),
                initial,
                next.map(|n| n.id),
                duration_until,
            )?;
        }

        Ok(Self {
            geometry,
            rulebook,
            traffic_lights,
            phase_rings,
            intersections,
            phase_states,
        })
    }

    /// A network with geometry only and empty books.
    #[must_use]
    pub fn without_rules(geometry: RoadGeometrySummary) -> Self {
        Self {
            geometry,
            rulebook: RoadRulebook::new(),
            traffic_lights: TrafficLightBook::new(),
            phase_rings: PhaseRingBook::new(),
            intersections: IntersectionBook::new(),
            phase_states: PhaseProvider::new(),
        }
    }

    #[must_use]
    pub const fn geometry(&self) -> &RoadGeometrySummary {
        &self.geometry
    }

    #[must_use]
    pub const fn rulebook(&self) -> &RoadRulebook {
        &self.rulebook
    }

    #[must_use]
    pub const fn traffic_light_book(&self) -> &TrafficLightBook {
        &self.traffic_lights
    }

    #[must_use]
    pub const fn phase_ring_book(&self) -> &PhaseRingBook {
        &self.phase_rings
    }

    #[must_use]
    pub const fn intersection_book(&self) -> &IntersectionBook {
        &self.intersections
    }

    #[must_use]
    pub const fn phase_provider(&self) -> &PhaseProvider {
        &self.phase_states
    }

    /// Mutable access to the live phase state.
    pub fn phase_provider_mut(&mut self) -> &mut PhaseProvider {
        &mut self.phase_states
    }

    /// Current phase state of the ring driving `intersection`.
    #[must_use]
    pub fn intersection_phase(&self, intersection: &IntersectionId) -> Option<PhaseStateResult> {
        let intersection = self.intersections.get_intersection(intersection)?;
        self.phase_states.get_phase(&intersection.phase_ring)
    }

    /// Definition of the phase currently active in `ring`.
    #[must_use]
    pub fn current_phase(&self, ring: &PhaseRingId) -> Option<&Phase> {
        let state = self.phase_states.get_phase(ring)?;
        self.phase_rings.get_phase_ring(ring)?.get_phase(&state.state)
    }
}
