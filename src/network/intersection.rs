//! Intersections and traffic lights.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::PhaseError;

use super::ids::{BulbUniqueId, IntersectionId, PhaseId, PhaseRingId, TrafficLightId};

/// An area whose right-of-way is governed by one phase ring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intersection {
    /// Intersection identifier
    pub id: IntersectionId,
    /// Ring that drives the intersection
    pub phase_ring: PhaseRingId,
    /// Phase active after loading; defaults to the ring's first phase
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_phase: Option<PhaseId>,
}

/// Catalog of intersections.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct IntersectionBook {
    intersections: IndexMap<IntersectionId, Intersection>,
}

impl IntersectionBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a book from intersections, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`PhaseError::InvalidArgument`] on a duplicated id.
    pub fn from_intersections(intersections: Vec<Intersection>) -> Result<Self, PhaseError> {
        let mut book = Self::new();
        for intersection in intersections {
            if book.intersections.contains_key(&intersection.id) {
                return Err(PhaseError::InvalidArgument(format!(
                    "duplicate intersection '{}'",
                    intersection.id
                )));
            }
            book.intersections
                .insert(intersection.id.clone(), intersection);
        }
        Ok(book)
    }

    #[must_use]
    pub fn get_intersection(&self, id: &IntersectionId) -> Option<&Intersection> {
        self.intersections.get(id)
    }

    /// First intersection driven by `ring`, if any.
    #[must_use]
    pub fn find_by_phase_ring(&self, ring: &PhaseRingId) -> Option<&Intersection> {
        self.intersections
            .values()
            .find(|intersection| &intersection.phase_ring == ring)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Intersection> {
        self.intersections.values()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.intersections.is_empty()
    }
}

// ============================================================================
// Traffic lights
// ============================================================================

/// Bulb color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulbColor {
    Red,
    Yellow,
    Green,
}

/// Bulb shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BulbType {
    #[default]
    Round,
    Arrow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bulb {
    pub id: String,
    pub color: BulbColor,
    #[serde(rename = "type", default)]
    pub bulb_type: BulbType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulbGroup {
    pub id: String,
    pub bulbs: Vec<Bulb>,
}

/// A traffic light made of bulb groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficLight {
    pub id: TrafficLightId,
    pub bulb_groups: Vec<BulbGroup>,
}

impl TrafficLight {
    /// Unique ids of every bulb of this light, in declared order.
    #[must_use]
    pub fn bulb_unique_ids(&self) -> Vec<BulbUniqueId> {
        self.bulb_groups
            .iter()
            .flat_map(|group| {
                group.bulbs.iter().map(move |bulb| {
                    BulbUniqueId::new(format!("{}-{}-{}", self.id, group.id, bulb.id))
                })
            })
            .collect()
    }
}

/// Catalog of traffic lights.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct TrafficLightBook {
    lights: IndexMap<TrafficLightId, TrafficLight>,
}

impl TrafficLightBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a book from traffic lights.
    ///
    /// # Errors
    ///
    /// Returns [`PhaseError::InvalidArgument`] on a duplicated id.
    pub fn from_lights(lights: Vec<TrafficLight>) -> Result<Self, PhaseError> {
        let mut book = Self::new();
        for light in lights {
            if book.lights.contains_key(&light.id) {
                return Err(PhaseError::InvalidArgument(format!(
                    "duplicate traffic light '{}'",
                    light.id
                )));
            }
            book.lights.insert(light.id.clone(), light);
        }
        Ok(book)
    }

    #[must_use]
    pub fn get_traffic_light(&self, id: &TrafficLightId) -> Option<&TrafficLight> {
        self.lights.get(id)
    }

    /// Returns `true` if some light owns a bulb with this unique id.
    #[must_use]
    pub fn contains_bulb(&self, bulb: &BulbUniqueId) -> bool {
        self.lights
            .values()
            .any(|light| light.bulb_unique_ids().contains(bulb))
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrafficLight> {
        self.lights.values()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn light() -> TrafficLight {
        serde_yaml::from_str(
            r"
id: EastFacing
bulb_groups:
  - id: Main
    bulbs:
      - { id: RedBulb, color: Red }
      - { id: GreenBulb, color: Green, type: Arrow }
",
        )
        .unwrap()
    }

    #[test]
    fn test_bulb_unique_ids() {
        let ids = light().bulb_unique_ids();
        assert_eq!(
            ids,
            vec![
                BulbUniqueId::new("EastFacing-Main-RedBulb"),
                BulbUniqueId::new("EastFacing-Main-GreenBulb"),
            ]
        );
    }

    #[test]
    fn test_bulb_type_defaults_to_round() {
        let light = light();
        assert_eq!(light.bulb_groups[0].bulbs[0].bulb_type, BulbType::Round);
        assert_eq!(light.bulb_groups[0].bulbs[1].bulb_type, BulbType::Arrow);
    }

    #[test]
    fn test_light_book_contains_bulb() {
        let book = TrafficLightBook::from_lights(vec![light()]).unwrap();
        assert!(book.contains_bulb(&BulbUniqueId::new("EastFacing-Main-GreenBulb")));
        assert!(!book.contains_bulb(&BulbUniqueId::new("EastFacing-Main-YellowBulb")));
        assert!(TrafficLightBook::from_lights(vec![light(), light()]).is_err());
    }

    #[test]
    fn test_intersection_book_lookup() {
        let book = IntersectionBook::from_intersections(vec![Intersection {
            id: IntersectionId::new("Crosswalk"),
            phase_ring: PhaseRingId::new("CrosswalkRing"),
            initial_phase: None,
        }])
        .unwrap();

        assert!(book.get_intersection(&IntersectionId::new("Crosswalk")).is_some());
        let found = book.find_by_phase_ring(&PhaseRingId::new("CrosswalkRing"));
        assert_eq!(found.unwrap().id.as_str(), "Crosswalk");
        assert!(book.find_by_phase_ring(&PhaseRingId::new("Other")).is_none());
    }
}
