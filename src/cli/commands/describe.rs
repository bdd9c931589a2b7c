//! `describe` command
//!
//! Prints the geometry summary and the books of a network.

use std::fmt::Write as _;

use crate::cli::args::{DescribeArgs, OutputFormat};
use crate::error::RoadnetError;
use crate::network::RoadNetwork;

/// Print a description of the selected network.
///
/// # Errors
///
/// Returns the loader's error, or a JSON error if serialization fails.
pub fn run(args: &DescribeArgs) -> Result<(), RoadnetError> {
    let network = super::load_network(&args.backend)?;
    match args.format {
        OutputFormat::Human => print!("{}", describe(&network)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&network)?),
    }
    Ok(())
}

/// Human-readable description of `network`.
#[must_use]
pub fn describe(network: &RoadNetwork) -> String {
    let mut out = String::new();
    let geometry = network.geometry();

    let _ = writeln!(out, "Road network: {} ({})", geometry.id, geometry.backend);
    if let Some(lanes) = geometry.num_lanes {
        let _ = writeln!(out, "  Lanes:            {lanes}");
    }
    if let Some(length) = geometry.length {
        let _ = writeln!(out, "  Length:           {length} m");
    }
    if let Some(width) = geometry.width {
        let _ = writeln!(out, "  Width:            {width} m");
    }
    if let Some(tolerance) = geometry.linear_tolerance {
        let _ = writeln!(out, "  Linear tolerance: {tolerance} m");
    }
    if let Some(source) = &geometry.source {
        let _ = writeln!(out, "  Source:           {}", source.display());
    }

    let rulebook = network.rulebook();
    if !rulebook.is_empty() {
        out.push_str("\nRules\n");
        for rule in rulebook.discrete_value_rules() {
            let _ = writeln!(
                out,
                "  {:<32}{:<40}[{}]",
                rule.id,
                rule.type_id,
                rule.values.join(", ")
            );
        }
        for rule in rulebook.range_value_rules() {
            let ranges: Vec<String> = rule
                .ranges
                .iter()
                .map(|r| format!("[{}, {}]", r.min, r.max))
                .collect();
            let _ = writeln!(out, "  {:<32}{:<40}{}", rule.id, rule.type_id, ranges.join(" "));
        }
    }

    let lights = network.traffic_light_book();
    if !lights.is_empty() {
        out.push_str("\nTraffic lights\n");
        for light in lights.iter() {
            let _ = writeln!(out, "  {}", light.id);
            for bulb in light.bulb_unique_ids() {
                let _ = writeln!(out, "    {bulb}");
            }
        }
    }

    let rings = network.phase_ring_book();
    if !rings.is_empty() {
        out.push_str("\nPhase rings\n");
        for ring in rings.iter() {
            let current = network
                .phase_provider()
                .get_phase(&ring.id)
                .map(|s| s.state.to_string())
                .unwrap_or_default();
            let _ = writeln!(out, "  {} (current: {current})", ring.id);
            for phase in &ring.phases {
                let successors: Vec<String> = ring
                    .next_phases
                    .get(&phase.id)
                    .into_iter()
                    .flatten()
                    .map(|n| match n.duration_until {
                        Some(d) => format!("{} after {d}s", n.id),
                        None => n.id.to_string(),
                    })
                    .collect();
                if successors.is_empty() {
                    let _ = writeln!(out, "    {}", phase.id);
                } else {
                    let _ = writeln!(out, "    {} -> {}", phase.id, successors.join(", "));
                }
            }
        }
    }

    let intersections = network.intersection_book();
    if !intersections.is_empty() {
        out.push_str("\nIntersections\n");
        for intersection in intersections.iter() {
            let phase = network
                .intersection_phase(&intersection.id)
                .map(|s| s.state.to_string())
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "  {:<24}ring {}, phase {phase}",
                intersection.id, intersection.phase_ring
            );
        }
    }

    out
}
