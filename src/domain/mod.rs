//! Domain layer containing retrieval types and rules.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (error kinds, state machine trait)
//! - `session` - Backend session lifecycle states and launch target
//! - `tools` - Tool descriptors, catalog, invocations and results
//! - `reasoning` - Model turns and the query prompt
//! - `extraction` - Document references and the result extractor
//! - `interaction` - Interactive loop states

pub mod extraction;
pub mod foundation;
pub mod interaction;
pub mod reasoning;
pub mod session;
pub mod tools;
