//! Doc Retrieval - Interactive documentation retrieval over an MCP tool backend
//!
//! This crate connects to a document-search tool backend, lets a reasoning
//! model decide which tool to invoke for a free-text query, and extracts the
//! source document references from the tool output.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
