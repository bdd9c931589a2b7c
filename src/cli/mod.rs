//! Command-line interface
//!
//! Clap argument tree in [`args`] and one handler module per command in
//! [`commands`].

pub mod args;
pub mod commands;
