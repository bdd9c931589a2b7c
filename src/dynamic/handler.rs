//! Handler abstraction and factory.

use std::sync::Arc;

use crate::error::PhaseError;
use crate::network::RoadNetwork;
use crate::timer::Timer;

use super::fixed_phase::FixedPhaseIterationHandler;

/// Drives the time-varying rule state of a road network.
///
/// `update` is meant to be called repeatedly from a polling loop. It must
/// not block, and calls on one handler must be serialized.
pub trait DynamicEnvironmentHandler: std::fmt::Debug {
    /// Advances the phase state of `network` according to elapsed time.
    fn update(&mut self, network: &mut RoadNetwork);
}

/// Available handler implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandlerType {
    /// Every phase lasts the same fixed duration.
    #[default]
    FixedPhaseIteration,
}

/// Creates a handler of the requested type.
///
/// # Errors
///
/// Returns [`PhaseError::InvalidArgument`] if `phase_duration` is not a
/// positive, finite number of seconds.
pub fn create_dynamic_environment_handler(
    handler_type: HandlerType,
    timer: Arc<dyn Timer>,
    phase_duration: f64,
) -> Result<Box<dyn DynamicEnvironmentHandler>, PhaseError> {
    match handler_type {
        HandlerType::FixedPhaseIteration => Ok(Box::new(FixedPhaseIterationHandler::new(
            timer,
            phase_duration,
        )?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::{FakeTimer, TimerType, create_timer};

    #[test]
    fn test_factory_builds_fixed_phase_handler() {
        let timer = create_timer(TimerType::Chrono);
        let handler =
            create_dynamic_environment_handler(HandlerType::FixedPhaseIteration, timer, 2.0)
                .unwrap();
        assert!(format!("{handler:?}").contains("FixedPhaseIterationHandler"));
    }

    #[test]
    fn test_factory_forwards_validation() {
        let timer: Arc<dyn Timer> = Arc::new(FakeTimer::new());
        let result =
            create_dynamic_environment_handler(HandlerType::FixedPhaseIteration, timer, -5.0);
        assert!(matches!(result, Err(PhaseError::InvalidArgument(_))));
    }
}
