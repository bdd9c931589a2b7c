//! Phases, phase rings, and the phase ring book.
//!
//! A [`PhaseRing`] groups the phases of one signalized area and declares,
//! for every phase, the ordered list of phases that may follow it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::PhaseError;

use super::ids::{BulbUniqueId, PhaseId, PhaseRingId, RuleId};

/// State of a single traffic-light bulb within a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulbState {
    /// Bulb is lit
    On,
    /// Bulb is dark
    Off,
    /// Bulb is blinking
    Blinking,
}

impl std::fmt::Display for BulbState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::On => "On",
            Self::Off => "Off",
            Self::Blinking => "Blinking",
        };
        f.write_str(s)
    }
}

/// A named set of rule states and bulb states applied together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    /// Phase identifier
    pub id: PhaseId,
    /// Discrete value rule states applied while the phase is active
    #[serde(default)]
    pub rule_states: IndexMap<RuleId, String>,
    /// Bulb states applied while the phase is active
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bulb_states: Option<IndexMap<BulbUniqueId, BulbState>>,
}

/// A legal successor of a phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextPhase {
    /// Successor phase
    pub id: PhaseId,
    /// Nominal seconds until the successor becomes active
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_until: Option<f64>,
}

/// Cyclic group of phases with declared transitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseRing {
    /// Ring identifier
    pub id: PhaseRingId,
    /// Phases in declared order
    pub phases: Vec<Phase>,
    /// Ordered successors of each phase
    #[serde(default)]
    pub next_phases: IndexMap<PhaseId, Vec<NextPhase>>,
}

impl PhaseRing {
    #[must_use]
    pub fn get_phase(&self, id: &PhaseId) -> Option<&Phase> {
        self.phases.iter().find(|phase| &phase.id == id)
    }

    /// The first declared phase, used as the initial state by default.
    #[must_use]
    pub fn first_phase(&self) -> Option<&Phase> {
        self.phases.first()
    }

    /// Returns the declared successors of `id`, in declared order.
    ///
    /// A phase without an adjacency entry has no successors.
    ///
    /// # Errors
    ///
    /// Returns [`PhaseError::NotFound`] if `id` is not a phase of this ring.
    pub fn get_next_phases(&self, id: &PhaseId) -> Result<&[NextPhase], PhaseError> {
        if self.get_phase(id).is_none() {
            return Err(PhaseError::NotFound(format!(
                "phase '{id}' in phase ring '{}'",
                self.id
            )));
        }
        Ok(self.next_phases.get(id).map_or(&[], Vec::as_slice))
    }
}

/// Catalog of the phase rings of a road network.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct PhaseRingBook {
    rings: IndexMap<PhaseRingId, PhaseRing>,
}

impl PhaseRingBook {
    /// Creates an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a book from rings, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`PhaseError::InvalidArgument`] on a duplicated ring id.
    pub fn from_rings(rings: Vec<PhaseRing>) -> Result<Self, PhaseError> {
        let mut book = Self::new();
        for ring in rings {
            book.add_phase_ring(ring)?;
        }
        Ok(book)
    }

    /// Adds a ring.
    ///
    /// # Errors
    ///
    /// Returns [`PhaseError::InvalidArgument`] if the id is already used.
    pub fn add_phase_ring(&mut self, ring: PhaseRing) -> Result<(), PhaseError> {
        if self.rings.contains_key(&ring.id) {
            return Err(PhaseError::InvalidArgument(format!(
                "duplicate phase ring '{}'",
                ring.id
            )));
        }
        self.rings.insert(ring.id.clone(), ring);
        Ok(())
    }

    /// Ring identifiers in declared order.
    #[must_use]
    pub fn phase_ring_ids(&self) -> Vec<PhaseRingId> {
        self.rings.keys().cloned().collect()
    }

    #[must_use]
    pub fn get_phase_ring(&self, id: &PhaseRingId) -> Option<&PhaseRing> {
        self.rings.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PhaseRing> {
        self.rings.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }
}
