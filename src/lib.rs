//! `roadnet` - road network inspection and dynamic environment tools
//!
//! This library provides the road network model, book loading, and the
//! timed phase iteration handler used by the `roadnet` binary.

pub mod cli;
pub mod config;
pub mod dynamic;
pub mod error;
pub mod network;
pub mod observability;
pub mod timer;
