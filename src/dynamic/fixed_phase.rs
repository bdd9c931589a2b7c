//! Fixed-duration phase iteration.
//!
//! Every phase ring under timed control moves to its pending phase once
//! the configured duration has elapsed since the previous transition. A
//! single elapsed-time gate drives all rings, so they advance together on
//! the polling cadence rather than on their own nominal durations.

use std::sync::Arc;

use tracing::{debug, info, trace};

use crate::error::PhaseError;
use crate::network::RoadNetwork;
use crate::timer::Timer;

use super::handler::DynamicEnvironmentHandler;

/// Advances every timed phase ring by one transition per `phase_duration`.
///
/// When a phase declares several successors the first declared one is
/// always taken, so rings cycle through a fixed order.
#[derive(Debug)]
pub struct FixedPhaseIterationHandler {
    timer: Arc<dyn Timer>,
    phase_duration: f64,
    last_elapsed_time: f64,
}

impl FixedPhaseIterationHandler {
    /// Creates a handler reading time from `timer`.
    ///
    /// # Errors
    ///
    /// Returns [`PhaseError::InvalidArgument`] if `phase_duration` is not a
    /// positive, finite number of seconds.
    pub fn new(timer: Arc<dyn Timer>, phase_duration: f64) -> Result<Self, PhaseError> {
        if !(phase_duration > 0.0 && phase_duration.is_finite()) {
            return Err(PhaseError::InvalidArgument(format!(
                "phase_duration must be a positive number of seconds, got {phase_duration}"
            )));
        }
        Ok(Self {
            timer,
            phase_duration,
            last_elapsed_time: 0.0,
        })
    }

    /// Duration of every phase, in seconds.
    #[must_use]
    pub const fn phase_duration(&self) -> f64 {
        self.phase_duration
    }

    /// Timer reading of the last transition (0 before the first one).
    #[must_use]
    pub const fn last_elapsed_time(&self) -> f64 {
        self.last_elapsed_time
    }
}

impl DynamicEnvironmentHandler for FixedPhaseIterationHandler {
    /// # Panics
    ///
    /// Panics if a ring listed by the phase ring book has no state in the
    /// phase provider, or if its pending phase is not a phase of the ring.
    /// Both mean the network was assembled inconsistently.
    fn update(&mut self, network: &mut RoadNetwork) {
        let elapsed = self.timer.elapsed();
        if elapsed - self.last_elapsed_time <= self.phase_duration {
            return;
        }
        self.last_elapsed_time = elapsed;
        debug!(elapsed, "phase duration elapsed; iterating phase rings");

        for ring_id in network.phase_ring_book().phase_ring_ids() {
            let Some(state) = network.phase_provider().get_phase(&ring_id) else {
                panic!("phase ring '{ring_id}' has no registered phase state");
            };

            let Some(next) = state.next else {
                trace!(ring = %ring_id, phase = %state.state, "no pending phase; skipping ring");
                continue;
            };

            let follow_on = network
                .phase_ring_book()
                .get_phase_ring(&ring_id)
                .and_then(|ring| ring.get_next_phases(&next.state).ok())
                .unwrap_or_else(|| {
                    panic!(
                        "pending phase '{}' is not a phase of ring '{ring_id}'",
                        next.state
                    )
                })
                .first()
                .cloned();

            info!(
                ring = %ring_id,
                from = %state.state,
                to = %next.state,
                "phase transition"
            );

            let (follow_on_id, duration_until) =
                follow_on.map_or((None, None), |n| (Some(n.id), n.duration_until));
            network
                .phase_provider_mut()
                .set_phase(&ring_id, next.state, follow_on_id, duration_until)
                .expect("ring was registered and duration implies a next phase");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{
        Backend, IntersectionBook, PhaseId, PhaseRing, PhaseRingBook, PhaseRingId,
        RoadGeometrySummary, RoadRulebook, TrafficLightBook,
    };
    use crate::timer::FakeTimer;

    const PHASE_DURATION: f64 = 0.5;

    fn ring(yaml: &str) -> PhaseRing {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn crosswalk_ring() -> PhaseRing {
        ring(
            r"
id: CrosswalkRing
phases:
  - id: AllGo
  - id: AllStop
next_phases:
  AllGo: [{ id: AllStop, duration_until: 45 }]
  AllStop: [{ id: AllGo, duration_until: 15 }]
",
        )
    }

    fn network(rings: Vec<PhaseRing>) -> RoadNetwork {
        RoadNetwork::new(
            RoadGeometrySummary::new(Backend::Malidrive, "test"),
            RoadRulebook::new(),
            TrafficLightBook::new(),
            PhaseRingBook::from_rings(rings).unwrap(),
            IntersectionBook::new(),
        )
        .unwrap()
    }

    fn current(rn: &RoadNetwork, ring: &str) -> String {
        rn.phase_provider()
            .get_phase(&PhaseRingId::new(ring))
            .unwrap()
            .state
            .to_string()
    }

    fn handler(timer: &Arc<FakeTimer>) -> FixedPhaseIterationHandler {
        FixedPhaseIterationHandler::new(timer.clone(), PHASE_DURATION).unwrap()
    }

    #[test]
    fn test_constructor_validates_duration() {
        let timer: Arc<dyn Timer> = Arc::new(FakeTimer::new());
        for bad in [-5.0, 0.0, -0.0, f64::NAN, f64::INFINITY] {
            let result = FixedPhaseIterationHandler::new(timer.clone(), bad);
            assert!(
                matches!(result, Err(PhaseError::InvalidArgument(_))),
                "duration {bad} should be rejected"
            );
        }
        let handler = FixedPhaseIterationHandler::new(timer, PHASE_DURATION).unwrap();
        assert!((handler.phase_duration() - PHASE_DURATION).abs() < f64::EPSILON);
    }

    #[test]
    fn test_idle_poll_leaves_phases_unchanged() {
        let timer = Arc::new(FakeTimer::new());
        let mut rn = network(vec![crosswalk_ring()]);
        let mut dut = handler(&timer);

        timer.set(0.1);
        dut.update(&mut rn);
        assert_eq!(current(&rn, "CrosswalkRing"), "AllGo");

        timer.set(PHASE_DURATION);
        dut.update(&mut rn);
        assert_eq!(current(&rn, "CrosswalkRing"), "AllGo");
        assert!(dut.last_elapsed_time().abs() < f64::EPSILON);
    }

    #[test]
    fn test_cycles_through_phases() {
        let timer = Arc::new(FakeTimer::new());
        let mut rn = network(vec![crosswalk_ring()]);
        let mut dut = handler(&timer);

        timer.set(0.55);
        dut.update(&mut rn);
        let state = rn
            .phase_provider()
            .get_phase(&PhaseRingId::new("CrosswalkRing"))
            .unwrap();
        assert_eq!(state.state.as_str(), "AllStop");
        let next = state.next.unwrap();
        assert_eq!(next.state.as_str(), "AllGo");
        assert_eq!(next.duration_until, Some(15.0));

        timer.set(1.1);
        dut.update(&mut rn);
        assert_eq!(current(&rn, "CrosswalkRing"), "AllGo");
    }

    #[test]
    fn test_one_transition_per_window() {
        let timer = Arc::new(FakeTimer::new());
        let mut rn = network(vec![crosswalk_ring()]);
        let mut dut = handler(&timer);

        timer.set(0.6);
        dut.update(&mut rn);
        for t in [0.7, 0.8, 0.9, 1.0, 1.1] {
            timer.set(t);
            dut.update(&mut rn);
            assert_eq!(current(&rn, "CrosswalkRing"), "AllStop", "at t={t}");
        }
        assert!((dut.last_elapsed_time() - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ring_without_pending_phase_is_skipped() {
        let timer = Arc::new(FakeTimer::new());
        let manual = ring(
            r"
id: ManualRing
phases:
  - id: Steady
  - id: Other
",
        );
        let mut rn = network(vec![manual, crosswalk_ring()]);
        let mut dut = handler(&timer);

        timer.set(0.6);
        dut.update(&mut rn);
        assert_eq!(current(&rn, "ManualRing"), "Steady");
        assert_eq!(current(&rn, "CrosswalkRing"), "AllStop");
    }

    #[test]
    fn test_first_declared_successor_wins() {
        let timer = Arc::new(FakeTimer::new());
        let three_way = ring(
            r"
id: ThreeWay
phases:
  - id: A
  - id: B
  - id: C
next_phases:
  A: [{ id: B }]
  B: [{ id: C, duration_until: 5 }, { id: A, duration_until: 7 }]
  C: [{ id: A }]
",
        );
        let mut rn = network(vec![three_way]);
        let mut dut = handler(&timer);

        timer.set(0.6);
        dut.update(&mut rn);
        let state = rn
            .phase_provider()
            .get_phase(&PhaseRingId::new("ThreeWay"))
            .unwrap();
        assert_eq!(state.state.as_str(), "B");
        assert_eq!(state.next.as_ref().unwrap().state.as_str(), "C");
        assert_eq!(state.next.unwrap().duration_until, Some(5.0));

        timer.set(1.2);
        dut.update(&mut rn);
        assert_eq!(current(&rn, "ThreeWay"), "C");
    }

    #[test]
    fn test_pending_phase_without_successors_becomes_untimed() {
        let timer = Arc::new(FakeTimer::new());
        let one_shot = ring(
            r"
id: OneShot
phases:
  - id: Start
  - id: End
next_phases:
  Start: [{ id: End }]
",
        );
        let mut rn = network(vec![one_shot]);
        let mut dut = handler(&timer);

        timer.set(0.6);
        dut.update(&mut rn);
        let state = rn
            .phase_provider()
            .get_phase(&PhaseRingId::new("OneShot"))
            .unwrap();
        assert_eq!(state.state, PhaseId::new("End"));
        assert!(state.next.is_none());

        timer.set(1.2);
        dut.update(&mut rn);
        assert_eq!(current(&rn, "OneShot"), "End");
    }

    #[test]
    fn test_timer_reset_below_last_transition_is_idle() {
        let timer = Arc::new(FakeTimer::new());
        let mut rn = network(vec![crosswalk_ring()]);
        let mut dut = handler(&timer);

        timer.set(0.6);
        dut.update(&mut rn);
        timer.reset();
        timer.set(0.3);
        dut.update(&mut rn);
        assert_eq!(current(&rn, "CrosswalkRing"), "AllStop");
    }

    #[test]
    #[should_panic(expected = "has no registered phase state")]
    fn test_missing_provider_entry_panics() {
        let timer = Arc::new(FakeTimer::new());
        let mut rn = network(vec![crosswalk_ring()]);
        *rn.phase_provider_mut() = crate::network::PhaseProvider::new();
        let mut dut = handler(&timer);

        timer.set(0.6);
        dut.update(&mut rn);
    }
}
