//! Book validation
//!
//! Checks the assembled books for dangling references and malformed
//! entries before a network is built from them. Validation collects ALL
//! issues instead of stopping at the first one.
//!
//! Cross-book checks only run when the referenced book is present: rule
//! states are checked against the rule book only if one was loaded, and
//! bulb states against the traffic light book likewise.

use std::collections::{HashMap, HashSet};

use crate::config::loader::BookLimits;
use crate::config::schema::{BookFile, RulebookSection};
use crate::error::{Severity, ValidationIssue};
use crate::network::{BulbUniqueId, Intersection, PhaseRing, TrafficLight};

// ============================================================================
// Public API
// ============================================================================

/// Result of book validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent loading).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Book validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates every section of `book`.
    pub fn validate(&mut self, book: &BookFile, limits: &BookLimits) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        if let Some(rulebook) = &book.road_rulebook {
            self.validate_rulebook(rulebook);
        }
        if let Some(lights) = &book.traffic_lights {
            self.validate_traffic_lights(lights);
        }

        let rings = book.phase_rings.as_deref().unwrap_or_default();
        if rings.len() > limits.max_phase_rings {
            self.error(
                "phase_rings",
                format!(
                    "{} phase rings exceed the limit of {}",
                    rings.len(),
                    limits.max_phase_rings
                ),
            );
        }

        let rule_values = book.road_rulebook.as_ref().map(|rulebook| {
            rulebook
                .discrete_value_rules
                .iter()
                .map(|rule| (rule.id.as_str(), rule.values.as_slice()))
                .collect::<HashMap<_, _>>()
        });
        let bulbs = book.traffic_lights.as_ref().map(|lights| {
            lights
                .iter()
                .flat_map(TrafficLight::bulb_unique_ids)
                .collect::<HashSet<BulbUniqueId>>()
        });

        let mut seen_rings = HashSet::new();
        for (i, ring) in rings.iter().enumerate() {
            let path = format!("phase_rings[{i}]");
            if !seen_rings.insert(ring.id.as_str()) {
                self.error(&path, format!("duplicate phase ring id '{}'", ring.id));
            }
            self.validate_phase_ring(&path, ring, rule_values.as_ref(), bulbs.as_ref());
        }

        if let Some(intersections) = &book.intersections {
            self.validate_intersections(intersections, rings);
        }

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    // ========================================================================
    // Sections
    // ========================================================================

    fn validate_rulebook(&mut self, rulebook: &RulebookSection) {
        let mut seen = HashSet::new();
        for (i, rule) in rulebook.discrete_value_rules.iter().enumerate() {
            let path = format!("road_rulebook.discrete_value_rules[{i}]");
            if !seen.insert(rule.id.as_str()) {
                self.error(&path, format!("duplicate discrete value rule id '{}'", rule.id));
            }
            if rule.values.is_empty() {
                self.error(&path, format!("rule '{}' declares no values", rule.id));
            }
        }

        let mut seen = HashSet::new();
        for (i, rule) in rulebook.range_value_rules.iter().enumerate() {
            let path = format!("road_rulebook.range_value_rules[{i}]");
            if !seen.insert(rule.id.as_str()) {
                self.error(&path, format!("duplicate range value rule id '{}'", rule.id));
            }
            if rule.ranges.is_empty() {
                self.error(&path, format!("rule '{}' declares no ranges", rule.id));
            }
            for (j, range) in rule.ranges.iter().enumerate() {
                if range.min > range.max {
                    self.error(
                        format!("{path}.ranges[{j}]"),
                        format!("min {} is greater than max {}", range.min, range.max),
                    );
                }
            }
        }
    }

    fn validate_traffic_lights(&mut self, lights: &[TrafficLight]) {
        let mut seen = HashSet::new();
        for (i, light) in lights.iter().enumerate() {
            let path = format!("traffic_lights[{i}]");
            if !seen.insert(light.id.as_str()) {
                self.error(&path, format!("duplicate traffic light id '{}'", light.id));
            }

            let mut groups = HashSet::new();
            for (j, group) in light.bulb_groups.iter().enumerate() {
                let group_path = format!("{path}.bulb_groups[{j}]");
                if !groups.insert(group.id.as_str()) {
                    self.error(&group_path, format!("duplicate bulb group id '{}'", group.id));
                }
                let mut bulbs = HashSet::new();
                for (k, bulb) in group.bulbs.iter().enumerate() {
                    if !bulbs.insert(bulb.id.as_str()) {
                        self.error(
                            format!("{group_path}.bulbs[{k}]"),
                            format!("duplicate bulb id '{}'", bulb.id),
                        );
                    }
                }
            }
        }
    }

    fn validate_phase_ring(
        &mut self,
        path: &str,
        ring: &PhaseRing,
        rule_values: Option<&HashMap<&str, &[String]>>,
        bulbs: Option<&HashSet<BulbUniqueId>>,
    ) {
        if ring.phases.is_empty() {
            self.error(path, format!("phase ring '{}' has no phases", ring.id));
            return;
        }

        let phase_ids: Vec<&str> = ring.phases.iter().map(|p| p.id.as_str()).collect();
        let mut seen = HashSet::new();

        for (i, phase) in ring.phases.iter().enumerate() {
            let phase_path = format!("{path}.phases[{i}]");
            if !seen.insert(phase.id.as_str()) {
                self.error(&phase_path, format!("duplicate phase id '{}'", phase.id));
            }

            if let Some(rule_values) = rule_values {
                for (rule, value) in &phase.rule_states {
                    let state_path = format!("{phase_path}.rule_states.{rule}");
                    match rule_values.get(rule.as_str()) {
                        None => {
                            let candidates: Vec<&str> = rule_values.keys().copied().collect();
                            self.error(
                                &state_path,
                                unknown("rule", rule.as_str(), &candidates),
                            );
                        }
                        Some(values) if !values.contains(value) => self.error(
                            &state_path,
                            format!("value '{value}' is not one of the values of rule '{rule}'"),
                        ),
                        Some(_) => {}
                    }
                }
            }

            if let (Some(bulbs), Some(bulb_states)) = (bulbs, &phase.bulb_states) {
                for bulb in bulb_states.keys() {
                    if !bulbs.contains(bulb) {
                        self.error(
                            format!("{phase_path}.bulb_states.{bulb}"),
                            format!("unknown bulb '{bulb}'"),
                        );
                    }
                }
            }
        }

        if ring.next_phases.is_empty() {
            self.warning(
                path,
                format!(
                    "phase ring '{}' declares no transitions; it will not be iterated",
                    ring.id
                ),
            );
            return;
        }

        for (from, successors) in &ring.next_phases {
            let next_path = format!("{path}.next_phases.{from}");
            if !phase_ids.contains(&from.as_str()) {
                self.error(&next_path, unknown("phase", from.as_str(), &phase_ids));
            }
            for (j, next) in successors.iter().enumerate() {
                let entry_path = format!("{next_path}[{j}]");
                if !phase_ids.contains(&next.id.as_str()) {
                    self.error(&entry_path, unknown("phase", next.id.as_str(), &phase_ids));
                }
                if let Some(duration) = next.duration_until
                    && !(duration >= 0.0 && duration.is_finite())
                {
                    self.error(
                        &entry_path,
                        format!("duration_until must be a non-negative number, got {duration}"),
                    );
                }
            }
        }

        for phase in &ring.phases {
            if ring.next_phases.get(&phase.id).is_none_or(Vec::is_empty) {
                self.warning(
                    path,
                    format!(
                        "phase '{}' has no successor; ring '{}' stops iterating there",
                        phase.id, ring.id
                    ),
                );
            }
        }
    }

    fn validate_intersections(&mut self, intersections: &[Intersection], rings: &[PhaseRing]) {
        let ring_ids: Vec<&str> = rings.iter().map(|r| r.id.as_str()).collect();
        let mut seen = HashSet::new();

        for (i, intersection) in intersections.iter().enumerate() {
            let path = format!("intersections[{i}]");
            if !seen.insert(intersection.id.as_str()) {
                self.error(
                    &path,
                    format!("duplicate intersection id '{}'", intersection.id),
                );
            }

            let Some(ring) = rings.iter().find(|r| r.id == intersection.phase_ring) else {
                self.error(
                    format!("{path}.phase_ring"),
                    unknown("phase ring", intersection.phase_ring.as_str(), &ring_ids),
                );
                continue;
            };

            if let Some(initial) = &intersection.initial_phase
                && ring.get_phase(initial).is_none()
            {
                let phase_ids: Vec<&str> = ring.phases.iter().map(|p| p.id.as_str()).collect();
                self.error(
                    format!("{path}.initial_phase"),
                    unknown("phase", initial.as_str(), &phase_ids),
                );
            }
        }
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ValidationIssue {
            path: path.into(),
            message: message.into(),
            severity: Severity::Error,
        });
    }

    fn warning(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationIssue {
            path: path.into(),
            message: message.into(),
            severity: Severity::Warning,
        });
    }
}

/// Suggests the candidate closest to `input` for typo correction.
///
/// Returns the closest match if its Damerau-Levenshtein distance is ≤ 3.
#[must_use]
pub fn suggest_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .map(|c| (*c, strsim::damerau_levenshtein(input, c)))
        .filter(|(_, dist)| *dist <= 3)
        .min_by_key(|(_, dist)| *dist)
        .map(|(name, _)| name)
}

fn unknown(kind: &str, id: &str, candidates: &[&str]) -> String {
    suggest_similar(id, candidates).map_or_else(
        || format!("unknown {kind} '{id}'"),
        |s| format!("unknown {kind} '{id}' (did you mean '{s}'?)"),
    )
}
