//! `query` command
//!
//! Answers rule and phase questions about a loaded network. Unknown ids
//! fail with a did-you-mean hint.

use std::fmt::Write as _;

use serde_json::json;

use crate::cli::args::{OutputFormat, QueryCommand, QuerySubcommand};
use crate::config::suggest_similar;
use crate::error::{PhaseError, RoadnetError};
use crate::network::{PhaseId, PhaseRing, PhaseRingId, RoadNetwork, RuleId};

/// Run the requested query.
///
/// # Errors
///
/// Returns the loader's error, or a phase error if an id is unknown.
pub fn run(cmd: &QueryCommand) -> Result<(), RoadnetError> {
    let network = super::load_network(&cmd.backend)?;
    let answer = answer(&network, &cmd.query)?;
    match cmd.format {
        OutputFormat::Human => print!("{}", answer.human),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&answer.json)?),
    }
    Ok(())
}

/// Rendered result of a query.
#[derive(Debug)]
pub struct Answer {
    pub human: String,
    pub json: serde_json::Value,
}

/// Evaluates `query` against `network`.
///
/// # Errors
///
/// Returns [`PhaseError::NotFound`] if a ring, phase, or rule id is unknown.
pub fn answer(network: &RoadNetwork, query: &QuerySubcommand) -> Result<Answer, PhaseError> {
    match query {
        QuerySubcommand::PhaseRings => Ok(phase_rings(network)),
        QuerySubcommand::PhaseRightOfWay { ring, phase } => {
            let ring = find_ring(network, ring)?;
            let phase_id = PhaseId::new(phase.as_str());
            let phase = ring.get_phase(&phase_id).ok_or_else(|| {
                let candidates: Vec<&str> = ring.phases.iter().map(|p| p.id.as_str()).collect();
                not_found(&format!("phase in ring '{}'", ring.id), phase, &candidates)
            })?;

            let mut human = String::new();
            for (rule, state) in &phase.rule_states {
                let _ = writeln!(human, "{rule:<32}{state}");
            }
            Ok(Answer {
                human,
                json: json!({
                    "phase_ring": ring.id,
                    "phase": phase.id,
                    "rule_states": phase.rule_states,
                }),
            })
        }
        QuerySubcommand::DiscreteRule { id } => {
            let rulebook = network.rulebook();
            let rule = rulebook
                .get_discrete_value_rule(&RuleId::new(id.as_str()))
                .ok_or_else(|| {
                    let candidates: Vec<&str> =
                        rulebook.discrete_value_rules().map(|r| r.id.as_str()).collect();
                    not_found("discrete value rule", id, &candidates)
                })?;
            Ok(Answer {
                human: format!(
                    "{}\n  type:   {}\n  values: [{}]\n",
                    rule.id,
                    rule.type_id,
                    rule.values.join(", ")
                ),
                json: json!(rule),
            })
        }
        QuerySubcommand::RangeRule { id } => {
            let rulebook = network.rulebook();
            let rule = rulebook
                .get_range_value_rule(&RuleId::new(id.as_str()))
                .ok_or_else(|| {
                    let candidates: Vec<&str> =
                        rulebook.range_value_rules().map(|r| r.id.as_str()).collect();
                    not_found("range value rule", id, &candidates)
                })?;
            let mut human = format!("{}\n  type:   {}\n", rule.id, rule.type_id);
            for range in &rule.ranges {
                let _ = write!(human, "  range:  [{}, {}]", range.min, range.max);
                if !range.description.is_empty() {
                    let _ = write!(human, " {}", range.description);
                }
                human.push('\n');
            }
            Ok(Answer {
                human,
                json: json!(rule),
            })
        }
        QuerySubcommand::CurrentPhase { ring } => {
            let ring = find_ring(network, ring)?;
            let state = network
                .phase_provider()
                .get_phase(&ring.id)
                .ok_or_else(|| {
                    PhaseError::NotFound(format!("phase ring '{}' has no phase state", ring.id))
                })?;

            let mut human = format!("{}: {}", ring.id, state.state);
            if let Some(next) = &state.next {
                let _ = write!(human, " (next: {}", next.state);
                if let Some(d) = next.duration_until {
                    let _ = write!(human, " after {d}s");
                }
                human.push(')');
            }
            human.push('\n');

            Ok(Answer {
                human,
                json: json!({
                    "phase_ring": ring.id,
                    "phase": state.state,
                    "next": state.next.as_ref().map(|n| json!({
                        "phase": n.state,
                        "duration_until": n.duration_until,
                    })),
                }),
            })
        }
    }
}

fn phase_rings(network: &RoadNetwork) -> Answer {
    let mut human = String::new();
    let mut rings = Vec::new();
    for ring in network.phase_ring_book().iter() {
        let phases: Vec<&str> = ring.phases.iter().map(|p| p.id.as_str()).collect();
        let _ = writeln!(human, "{:<32}{}", ring.id, phases.join(", "));
        rings.push(json!({ "id": ring.id, "phases": phases }));
    }
    Answer {
        human,
        json: serde_json::Value::Array(rings),
    }
}

fn find_ring<'a>(network: &'a RoadNetwork, id: &str) -> Result<&'a PhaseRing, PhaseError> {
    let book = network.phase_ring_book();
    book.get_phase_ring(&PhaseRingId::new(id)).ok_or_else(|| {
        let candidates: Vec<&str> = book.iter().map(|r| r.id.as_str()).collect();
        not_found("phase ring", id, &candidates)
    })
}

fn not_found(kind: &str, id: &str, candidates: &[&str]) -> PhaseError {
    let mut message = format!("unknown {kind} '{id}'");
    if let Some(suggestion) = suggest_similar(id, candidates) {
        let _ = write!(message, "; did you mean '{suggestion}'?");
    }
    PhaseError::NotFound(message)
}
