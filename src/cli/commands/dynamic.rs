//! `dynamic-environment` command
//!
//! Loads a network, prints its static rules, then polls a
//! [`FixedPhaseIterationHandler`](crate::dynamic::FixedPhaseIterationHandler)
//! every `--period` and prints the active phase of every ring.

use std::fmt::Write as _;
use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::info;

use crate::cli::args::DynamicEnvironmentArgs;
use crate::dynamic::{HandlerType, create_dynamic_environment_handler};
use crate::error::RoadnetError;
use crate::network::RoadNetwork;
use crate::timer::{TimerType, create_timer};

/// Run the phase iteration loop until Ctrl+C or `--run-for` elapses.
///
/// # Errors
///
/// Returns a phase error if `--phase-duration` is not positive, or the
/// loader's error if the network cannot be built.
pub async fn run(args: &DynamicEnvironmentArgs) -> Result<(), RoadnetError> {
    let timer = create_timer(TimerType::Chrono);
    let mut handler = create_dynamic_environment_handler(
        HandlerType::FixedPhaseIteration,
        timer.clone(),
        args.phase_duration,
    )?;

    let mut network = super::load_network(&args.backend)?;
    info!("road network loaded successfully");

    print!("{}", render_static_rules(&network));
    timer.reset();

    let deadline = run_deadline(Instant::now(), args.run_for);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            () = sleep(args.period) => {}
            _ = &mut ctrl_c => {
                info!("interrupted; stopping phase iteration");
                return Ok(());
            }
        }

        println!("Time: {:.3}", timer.elapsed());
        handler.update(&mut network);
        print!("{}", render_phases(&network));

        if deadline.is_some_and(|d| Instant::now() >= d) {
            info!("run duration elapsed; stopping phase iteration");
            return Ok(());
        }
    }
}

/// Instant at which `--run-for` expires. `None` runs until interrupted,
/// including when the duration reaches past what an [`Instant`] can hold.
#[must_use]
pub fn run_deadline(now: Instant, run_for: Option<Duration>) -> Option<Instant> {
    run_for.and_then(|d| now.checked_add(d))
}

/// Lists the discrete and range value rules that have a single state.
#[must_use]
pub fn render_static_rules(network: &RoadNetwork) -> String {
    let mut out = String::from("Static DiscreteValueRules\n");
    for rule in network.rulebook().static_discrete_value_rules() {
        let _ = writeln!(
            out,
            "\tDiscrete Value Rule: {} | State: {}",
            rule.id, rule.values[0]
        );
    }
    out.push_str("Static RangeValueRules\n");
    for rule in network.rulebook().static_range_value_rules() {
        let range = &rule.ranges[0];
        let _ = writeln!(
            out,
            "\tRange Value Rule: {} | State: [{}, {}]",
            rule.id, range.min, range.max
        );
    }
    out
}

/// Current phase of every ring with its rule states and bulb states.
#[must_use]
pub fn render_phases(network: &RoadNetwork) -> String {
    let mut out = String::new();
    for ring in network.phase_ring_book().iter() {
        let Some(phase) = network.current_phase(&ring.id) else {
            continue;
        };
        let _ = writeln!(out, "PhaseRingId: {} | Current Phase: {}", ring.id, phase.id);
        for (rule, state) in &phase.rule_states {
            let _ = writeln!(out, "\tDiscrete Value Rule: {rule} | State: {state}");
        }
        for (bulb, state) in phase.bulb_states.iter().flatten() {
            let _ = writeln!(out, "\tBulbUniqueId: {bulb} | State: {state}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BookFile, network_from_books};
    use crate::network::{Backend, RoadGeometrySummary};

    fn network() -> RoadNetwork {
        let book: BookFile = serde_yaml::from_str(
            r"
road_rulebook:
  discrete_value_rules:
    - { id: Crosswalk/East, type: Right-Of-Way Rule Type, values: [Go, Stop] }
    - { id: Vehicle/Stop, type: Vehicle-Stop-In-Zone-Behavior Rule Type, values: [DoNotStop] }
  range_value_rules:
    - id: SpeedLimit/1
      type: Speed-Limit Rule Type
      ranges: [{ min: 0, max: 16.6 }]
phase_rings:
  - id: CrosswalkRing
    phases:
      - id: AllGo
        rule_states: { Crosswalk/East: Go }
        bulb_states: { EastFacing-Main-GreenBulb: On }
      - id: AllStop
        rule_states: { Crosswalk/East: Stop }
    next_phases:
      AllGo: [{ id: AllStop }]
      AllStop: [{ id: AllGo }]
",
        )
        .unwrap();
        network_from_books(RoadGeometrySummary::new(Backend::Malidrive, "test"), book).unwrap()
    }

    #[test]
    fn test_run_deadline() {
        let now = Instant::now();
        assert_eq!(run_deadline(now, None), None);
        assert_eq!(
            run_deadline(now, Some(Duration::from_millis(700))),
            Some(now + Duration::from_millis(700))
        );
        assert_eq!(run_deadline(now, Some(Duration::MAX)), None);

        let far = humantime::parse_duration("500000000000y").unwrap();
        assert_eq!(run_deadline(now, Some(far)), None);
    }

    #[test]
    fn test_render_static_rules() {
        let out = render_static_rules(&network());
        assert_eq!(
            out,
            "Static DiscreteValueRules\n\
             \tDiscrete Value Rule: Vehicle/Stop | State: DoNotStop\n\
             Static RangeValueRules\n\
             \tRange Value Rule: SpeedLimit/1 | State: [0, 16.6]\n"
        );
    }

    #[test]
    fn test_render_phases() {
        let out = render_phases(&network());
        assert_eq!(
            out,
            "PhaseRingId: CrosswalkRing | Current Phase: AllGo\n\
             \tDiscrete Value Rule: Crosswalk/East | State: Go\n\
             \tBulbUniqueId: EastFacing-Main-GreenBulb | State: On\n"
        );
    }
}
