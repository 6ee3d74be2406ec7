//! Session module - Backend session lifecycle.
//!
//! The session itself lives in the application layer; this module holds the
//! pure pieces: the lifecycle state machine and the launch target.

mod launch_spec;
mod state;

pub use launch_spec::{LaunchSpec, ACCEPTED_SCRIPT_EXTENSION};
pub use state::SessionState;
