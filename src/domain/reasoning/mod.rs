//! Reasoning module - What the model says back.

mod model_turn;
mod prompt;

pub use model_turn::{ModelTurn, TurnBlock};
pub use prompt::{render_query_prompt, QUERY_PROMPT_TEMPLATE};
