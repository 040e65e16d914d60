//! Core types and definitions for the capture-the-flag simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometric types, enums, configuration, errors, field geometry, state
//! snapshots, and constants. It has no dependency on any runtime framework.

pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod field;
pub mod state;
pub mod types;
