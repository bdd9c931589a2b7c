//! Phase provider: the active and pending phase of every phase ring.
//!
//! The provider is the only piece of the network that changes at runtime.
//! Rings are registered once by the loader; afterwards a single writer (the
//! dynamic environment handler) moves them with [`PhaseProvider::set_phase`].

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::PhaseError;

use super::ids::{PhaseId, PhaseRingId};

/// The phase queued after the current one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NextState {
    /// Pending phase
    pub state: PhaseId,
    /// Seconds until the pending phase becomes active, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_until: Option<f64>,
}

/// Current state of one phase ring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseStateResult {
    /// Active phase
    pub state: PhaseId,
    /// Pending phase, if the ring is under timed control
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<NextState>,
}

/// Manually driven phase state per ring.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct PhaseProvider {
    states: IndexMap<PhaseRingId, PhaseStateResult>,
}

impl PhaseProvider {
    /// Creates a provider with no registered rings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a ring with its initial state.
    ///
    /// # Errors
    ///
    /// - [`PhaseError::InvalidTransition`] if the ring is already registered
    /// - [`PhaseError::InvalidArgument`] if a duration is given without a next phase
    pub fn add_phase_ring(
        &mut self,
        ring: PhaseRingId,
        initial: PhaseId,
        next: Option<PhaseId>,
        duration_until: Option<f64>,
    ) -> Result<(), PhaseError> {
        if self.states.contains_key(&ring) {
            return Err(PhaseError::InvalidTransition(format!(
                "phase ring '{ring}' is already registered"
            )));
        }
        let result = make_state(&ring, initial, next, duration_until)?;
        self.states.insert(ring, result);
        Ok(())
    }

    /// Returns the state of `ring`, or `None` if it was never registered.
    #[must_use]
    pub fn get_phase(&self, ring: &PhaseRingId) -> Option<PhaseStateResult> {
        self.states.get(ring).cloned()
    }

    /// Replaces the state of a registered ring.
    ///
    /// # Errors
    ///
    /// - [`PhaseError::NotFound`] if the ring was never registered
    /// - [`PhaseError::InvalidArgument`] if a duration is given without a next phase
    pub fn set_phase(
        &mut self,
        ring: &PhaseRingId,
        current: PhaseId,
        next: Option<PhaseId>,
        duration_until: Option<f64>,
    ) -> Result<(), PhaseError> {
        let result = make_state(ring, current, next, duration_until)?;
        let slot = self
            .states
            .get_mut(ring)
            .ok_or_else(|| PhaseError::NotFound(format!("phase ring '{ring}'")))?;
        *slot = result;
        Ok(())
    }

    /// Number of registered rings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

fn make_state(
    ring: &PhaseRingId,
    state: PhaseId,
    next: Option<PhaseId>,
    duration_until: Option<f64>,
) -> Result<PhaseStateResult, PhaseError> {
    match (next, duration_until) {
        (None, Some(duration)) => Err(PhaseError::InvalidArgument(format!(
            "phase ring '{ring}': duration_until {duration} given without a next phase"
        ))),
        (next, duration_until) => Ok(PhaseStateResult {
            state,
            next: next.map(|state| NextState {
                state,
                duration_until,
            }),
        }),
    }
}
