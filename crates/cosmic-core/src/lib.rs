//! Core types and definitions for the cosmic battle simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, commands, snapshots, events, configuration and constants.
//! It has no dependency on any renderer or platform runtime.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;
