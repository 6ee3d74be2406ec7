//! Interaction module - Interactive loop states and input classification.

mod loop_state;

pub use loop_state::{classify_input, LoopInput, LoopState};
