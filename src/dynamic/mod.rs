//! Dynamic environment handling
//!
//! Handlers that change the rule state of a road network over time. The
//! caller owns the polling loop and calls
//! [`DynamicEnvironmentHandler::update`] at whatever cadence it likes; no
//! handler schedules anything on its own.
//!
//! - [`DynamicEnvironmentHandler`]: the polling interface
//! - [`FixedPhaseIterationHandler`]: one phase transition per fixed duration
//! - [`create_dynamic_environment_handler`]: factory over [`HandlerType`]

pub mod fixed_phase;
pub mod handler;

pub use fixed_phase::FixedPhaseIterationHandler;
pub use handler::{DynamicEnvironmentHandler, HandlerType, create_dynamic_environment_handler};
