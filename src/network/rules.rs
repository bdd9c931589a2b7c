//! Road rule book: discrete value rules and range value rules.
//!
//! A rule whose state can never change (exactly one value or one range)
//! is *static*; everything else is driven by phases.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::PhaseError;

use super::ids::RuleId;

/// Rule whose state is one of a discrete set of values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscreteValueRule {
    /// Rule identifier
    pub id: RuleId,
    /// Rule type (e.g. "Right-Of-Way Rule Type")
    #[serde(rename = "type")]
    pub type_id: String,
    /// Allowed values, in declared order
    pub values: Vec<String>,
}

impl DiscreteValueRule {
    /// Returns `true` when the rule has a single possible value.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.values.len() == 1
    }
}

/// A numeric range a [`RangeValueRule`] can take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Range {
    /// Lower bound
    pub min: f64,
    /// Upper bound
    pub max: f64,
    /// Free-form description
    #[serde(default)]
    pub description: String,
}

/// Rule whose state is one of a set of numeric ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeValueRule {
    /// Rule identifier
    pub id: RuleId,
    /// Rule type (e.g. "Speed-Limit Rule Type")
    #[serde(rename = "type")]
    pub type_id: String,
    /// Allowed ranges, in declared order
    pub ranges: Vec<Range>,
}

impl RangeValueRule {
    /// Returns `true` when the rule has a single possible range.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.ranges.len() == 1
    }
}

/// Catalog of the rules of a road network.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RoadRulebook {
    discrete_value_rules: IndexMap<RuleId, DiscreteValueRule>,
    range_value_rules: IndexMap<RuleId, RangeValueRule>,
}

impl RoadRulebook {
    /// Creates an empty rule book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a rule book from rule lists.
    ///
    /// # Errors
    ///
    /// Returns [`PhaseError::InvalidArgument`] on a duplicated rule id.
    pub fn from_rules(
        discrete: Vec<DiscreteValueRule>,
        range: Vec<RangeValueRule>,
    ) -> Result<Self, PhaseError> {
        let mut book = Self::new();
        for rule in discrete {
            book.add_discrete_value_rule(rule)?;
        }
        for rule in range {
            book.add_range_value_rule(rule)?;
        }
        Ok(book)
    }

    /// Adds a discrete value rule.
    ///
    /// # Errors
    ///
    /// Returns [`PhaseError::InvalidArgument`] if the id is already used.
    pub fn add_discrete_value_rule(&mut self, rule: DiscreteValueRule) -> Result<(), PhaseError> {
        if self.discrete_value_rules.contains_key(&rule.id) {
            return Err(PhaseError::InvalidArgument(format!(
                "duplicate discrete value rule '{}'",
                rule.id
            )));
        }
        self.discrete_value_rules.insert(rule.id.clone(), rule);
        Ok(())
    }

    /// Adds a range value rule.
    ///
    /// # Errors
    ///
    /// Returns [`PhaseError::InvalidArgument`] if the id is already used.
    pub fn add_range_value_rule(&mut self, rule: RangeValueRule) -> Result<(), PhaseError> {
        if self.range_value_rules.contains_key(&rule.id) {
            return Err(PhaseError::InvalidArgument(format!(
                "duplicate range value rule '{}'",
                rule.id
            )));
        }
        self.range_value_rules.insert(rule.id.clone(), rule);
        Ok(())
    }

    #[must_use]
    pub fn get_discrete_value_rule(&self, id: &RuleId) -> Option<&DiscreteValueRule> {
        self.discrete_value_rules.get(id)
    }

    #[must_use]
    pub fn get_range_value_rule(&self, id: &RuleId) -> Option<&RangeValueRule> {
        self.range_value_rules.get(id)
    }

    /// All discrete value rules, in declared order.
    pub fn discrete_value_rules(&self) -> impl Iterator<Item = &DiscreteValueRule> {
        self.discrete_value_rules.values()
    }

    /// All range value rules, in declared order.
    pub fn range_value_rules(&self) -> impl Iterator<Item = &RangeValueRule> {
        self.range_value_rules.values()
    }

    /// Discrete value rules with exactly one value.
    #[must_use]
    pub fn static_discrete_value_rules(&self) -> Vec<&DiscreteValueRule> {
        self.discrete_value_rules()
            .filter(|rule| rule.is_static())
            .collect()
    }

    /// Range value rules with exactly one range.
    #[must_use]
    pub fn static_range_value_rules(&self) -> Vec<&RangeValueRule> {
        self.range_value_rules()
            .filter(|rule| rule.is_static())
            .collect()
    }

    /// Returns `true` if the book has no rules at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.discrete_value_rules.is_empty() && self.range_value_rules.is_empty()
    }
}
