//! Typed identifiers for road network entities.
//!
//! Each identifier is a string newtype so a rule id can't be passed where a
//! phase id is expected.

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Creates a new identifier from a string.
            #[must_use]
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.pad(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

string_id!(
    /// Identifier of a [`PhaseRing`](super::PhaseRing).
    PhaseRingId
);

string_id!(
    /// Identifier of a [`Phase`](super::Phase) within its ring.
    PhaseId
);

string_id!(
    /// Identifier of a discrete or range value rule.
    RuleId
);

string_id!(
    /// Identifier of an [`Intersection`](super::Intersection).
    IntersectionId
);

string_id!(
    /// Identifier of a [`TrafficLight`](super::TrafficLight).
    TrafficLightId
);

string_id!(
    /// Globally unique bulb identifier: `traffic_light-bulb_group-bulb`.
    BulbUniqueId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_as_str() {
        let id = PhaseId::new("AllGoPhase");
        assert_eq!(id.to_string(), "AllGoPhase");
        assert_eq!(id.as_str(), "AllGoPhase");
    }

    #[test]
    fn test_from_str_slice() {
        let id: PhaseRingId = "CrosswalkRing".into();
        assert_eq!(id, PhaseRingId::new("CrosswalkRing"));
    }

    #[test]
    fn test_serde_transparent() {
        let id = RuleId::new("RightOfWayRule/East");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"RightOfWayRule/East\"");
        let back: RuleId = serde_yaml::from_str("RightOfWayRule/East").unwrap();
        assert_eq!(back, id);
    }
}
